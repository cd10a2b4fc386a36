// 该文件是 Shanan （山南西风） 项目的一部分。
// src/output/annotate.rs - 检测结果标注
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

use image::RgbImage;

use crate::{
  model::DetectionResult,
  output::{AnnotateError, draw::Draw, report::format_report},
};

/// 一次标注的文本输出
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Annotation {
  pub report: Vec<String>,
  pub drawn_boxes: usize,
}

/// 将检测结果绘制到图像上并生成报告
pub struct Annotator {
  draw: Draw,
}

impl Annotator {
  pub fn new(draw: Draw) -> Self {
    Self { draw }
  }

  /// 在原图上直接绘制。
  ///
  /// 图像尺寸无效时整个调用失败，既不绘制也不生成报告。
  pub fn annotate(
    &self,
    image: &mut RgbImage,
    result: &DetectionResult,
  ) -> Result<Annotation, AnnotateError> {
    let drawn_boxes = self.draw.draw_detections_on_image(image, result)?;
    Ok(Annotation {
      report: format_report(result),
      drawn_boxes,
    })
  }

  /// 在副本上绘制，原图保持不变
  pub fn annotate_copy(
    &self,
    image: &RgbImage,
    result: &DetectionResult,
  ) -> Result<(RgbImage, Annotation), AnnotateError> {
    let mut output = image.clone();
    let annotation = self.annotate(&mut output, result)?;
    Ok((output, annotation))
  }
}
