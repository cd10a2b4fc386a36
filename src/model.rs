// 该文件是 Shanan （山南西风） 项目的一部分。
// src/model.rs - 检测结果数据模型与标签检测接口
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

use serde::Deserialize;
use thiserror::Error;

/// 标签检测服务的默认返回标签数上限
pub const DEFAULT_MAX_LABELS: u32 = 10;
/// 标签检测服务的默认最低置信度（百分比）
pub const DEFAULT_MIN_CONFIDENCE: f32 = 70.0;

/// 归一化边界框，各字段均为相对图像宽高的比例。
///
/// 检测服务输出的边界框可能贴边或因舍入略微越界，
/// 因此 `left + width`、`top + height` 不保证不超过 1。
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoundingBox {
  pub left: f32,
  pub top: f32,
  pub width: f32,
  pub height: f32,
}

impl BoundingBox {
  pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
    Self {
      left,
      top,
      width,
      height,
    }
  }
}

/// 标签在图像中的一次定位出现
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Instance {
  /// 缺失时表示该实例没有定位区域
  #[serde(default)]
  pub bounding_box: Option<BoundingBox>,
  #[serde(default)]
  pub confidence: Option<f32>,
}

impl Instance {
  pub fn located(bounding_box: BoundingBox) -> Self {
    Self {
      bounding_box: Some(bounding_box),
      confidence: None,
    }
  }

  pub fn unlocated() -> Self {
    Self::default()
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DetectionLabel {
  pub name: String,
  /// 置信度，取值 0 ~ 100
  pub confidence: f32,
  #[serde(default)]
  pub instances: Vec<Instance>,
}

impl DetectionLabel {
  pub fn new(name: impl Into<String>, confidence: f32, instances: Vec<Instance>) -> Self {
    Self {
      name: name.into(),
      confidence,
      instances,
    }
  }

  /// 带有边界框的实例
  pub fn located_boxes(&self) -> impl Iterator<Item = &BoundingBox> {
    self
      .instances
      .iter()
      .filter_map(|instance| instance.bounding_box.as_ref())
  }
}

/// 检测结果，标签顺序保持检测服务的输出顺序
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct DetectionResult {
  #[serde(rename = "Labels", default)]
  pub labels: Vec<DetectionLabel>,
}

impl DetectionResult {
  pub fn new(labels: Vec<DetectionLabel>) -> Self {
    Self { labels }
  }

  pub fn is_empty(&self) -> bool {
    self.labels.is_empty()
  }

  pub fn len(&self) -> usize {
    self.labels.len()
  }

  /// 所有带边界框的实例数
  pub fn located_count(&self) -> usize {
    self
      .labels
      .iter()
      .map(|label| label.located_boxes().count())
      .sum()
  }
}

/// 标签检测请求参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionParams {
  pub max_labels: u32,
  pub min_confidence: f32,
}

impl Default for DetectionParams {
  fn default() -> Self {
    Self {
      max_labels: DEFAULT_MAX_LABELS,
      min_confidence: DEFAULT_MIN_CONFIDENCE,
    }
  }
}

impl DetectionParams {
  pub fn validate(&self) -> Result<(), ModelError> {
    if self.max_labels == 0 {
      return Err(ModelError::RequestRejected(
        "MaxLabels 必须大于 0".to_string(),
      ));
    }
    if !(0.0..=100.0).contains(&self.min_confidence) {
      return Err(ModelError::RequestRejected(format!(
        "MinConfidence 必须在 0 ~ 100 之间, 实际为 {}",
        self.min_confidence
      )));
    }
    Ok(())
  }

  /// 按最低置信度过滤，再截取前 `max_labels` 个标签，保持原有顺序
  pub fn apply(&self, result: DetectionResult) -> DetectionResult {
    let labels = result
      .labels
      .into_iter()
      .filter(|label| label.confidence >= self.min_confidence)
      .take(self.max_labels as usize)
      .collect();
    DetectionResult { labels }
  }
}

#[derive(Error, Debug)]
pub enum ModelError {
  #[error("检测请求被拒绝: {0}")]
  RequestRejected(String),
  #[error("检测服务错误: {0}")]
  Service(String),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

pub trait LabelDetector {
  fn detect_labels(
    &self,
    image_bytes: &[u8],
    params: &DetectionParams,
  ) -> Result<DetectionResult, ModelError>;
}

#[cfg(feature = "response_file")]
mod response_file;
#[cfg(feature = "response_file")]
pub use self::response_file::ResponseFileDetector;
