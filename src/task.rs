// 该文件是 Shanan （山南西风） 项目的一部分。
// src/task.rs - 标注任务
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

use anyhow::Context;
use image::RgbImage;
use tracing::{debug, info, warn};

use crate::{
  input::{ImageSource, ObjectLocation, decode_image},
  model::{DetectionParams, DetectionResult, LabelDetector},
  output::{Annotation, Annotator, Render},
};

pub trait Task<S, D, O>: Sized {
  type Output;
  type Error;
  fn run_task(self, source: S, detector: D, output: O) -> Result<Self::Output, Self::Error>;
}

/// 一次标注的结果汇总
#[derive(Debug, Clone)]
pub struct AnnotateSummary {
  pub location: ObjectLocation,
  pub width: u32,
  pub height: u32,
  pub result: DetectionResult,
  pub annotation: Annotation,
}

/// 读取单张图像，检测标签，绘制并输出
pub struct OneShotTask {
  location: ObjectLocation,
  params: DetectionParams,
  annotator: Annotator,
}

impl OneShotTask {
  pub fn new(location: ObjectLocation, params: DetectionParams, annotator: Annotator) -> Self {
    Self {
      location,
      params,
      annotator,
    }
  }
}

impl<S, D, O, RE> Task<S, D, Option<O>> for OneShotTask
where
  S: ImageSource,
  D: LabelDetector,
  O: Render<RgbImage, Annotation, Error = RE>,
  RE: std::error::Error + Sync + Send + 'static,
{
  type Output = AnnotateSummary;
  type Error = anyhow::Error;

  fn run_task(
    self,
    source: S,
    detector: D,
    output: Option<O>,
  ) -> Result<Self::Output, Self::Error> {
    info!("开始任务: {}", self.location);
    let bytes = source.fetch(&self.location).with_context(|| {
      format!(
        "无法从存储桶 {} 读取图像 {}",
        self.location.bucket, self.location.key
      )
    })?;
    debug!("图像读取成功: {} 字节", bytes.len());

    let now = std::time::Instant::now();
    let result = detector
      .detect_labels(&bytes, &self.params)
      .context("标签检测失败")?;
    info!("检测完成，耗时: {:.2?}", now.elapsed());

    let mut image = decode_image(&bytes).context("图像解码失败")?;
    let (width, height) = image.dimensions();

    let now = std::time::Instant::now();
    let annotation = self
      .annotator
      .annotate(&mut image, &result)
      .context("标注失败")?;
    info!(
      "绘制完成，{} 个检测框，耗时: {:.2?}",
      annotation.drawn_boxes,
      now.elapsed()
    );

    match output {
      Some(output) => output
        .render_result(&image, &annotation)
        .context("保存输出失败")?,
      None => warn!("未配置输出，标注图像不会被保存"),
    }

    Ok(AnnotateSummary {
      location: self.location,
      width,
      height,
      result,
      annotation,
    })
  }
}
