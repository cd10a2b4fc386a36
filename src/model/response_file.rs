// 该文件是 Shanan （山南西风） 项目的一部分。
// src/model/response_file.rs - 基于已保存响应文件的标签检测
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme, url_file_path,
  model::{DetectionParams, DetectionResult, LabelDetector, ModelError},
};

/// 读取预先保存的 `DetectLabels` JSON 响应作为检测结果。
///
/// 请求参数的校验与过滤方式与在线服务保持一致：
/// 空图像与越界参数会被拒绝，结果按最低置信度与标签数上限裁剪。
pub struct ResponseFileDetector {
  path: PathBuf,
}

impl FromUrlWithScheme for ResponseFileDetector {
  const SCHEME: &'static str = "labels";
}

impl FromUrl for ResponseFileDetector {
  type Error = ModelError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(ModelError::SchemeMismatch(format!(
        "期望检测方式 '{}', 实际检测方式 '{}'",
        Self::SCHEME,
        url.scheme()
      )));
    }

    Ok(Self::new(url_file_path(url)))
  }
}

impl ResponseFileDetector {
  pub fn new(path: impl AsRef<Path>) -> Self {
    Self {
      path: path.as_ref().to_path_buf(),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn load(&self) -> Result<DetectionResult, ModelError> {
    let data = std::fs::read(&self.path).map_err(|e| {
      ModelError::Service(format!("无法读取响应文件 {}: {}", self.path.display(), e))
    })?;
    serde_json::from_slice(&data).map_err(|e| {
      ModelError::Service(format!("响应文件格式错误 {}: {}", self.path.display(), e))
    })
  }
}

impl LabelDetector for ResponseFileDetector {
  fn detect_labels(
    &self,
    image_bytes: &[u8],
    params: &DetectionParams,
  ) -> Result<DetectionResult, ModelError> {
    params.validate()?;
    if image_bytes.is_empty() {
      return Err(ModelError::RequestRejected("图像数据为空".to_string()));
    }

    debug!(
      "检测请求: {} 字节, MaxLabels={}, MinConfidence={}",
      image_bytes.len(),
      params.max_labels,
      params.min_confidence
    );
    let response = self.load()?;
    let total = response.len();
    let result = params.apply(response);
    info!("检测到 {} 个标签（过滤前 {} 个）", result.len(), total);

    Ok(result)
  }
}
