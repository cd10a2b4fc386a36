// 该文件是 Shanan （山南西风） 项目的一部分。
// src/output/geometry.rs - 归一化边界框到像素坐标的映射
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

use crate::{model::BoundingBox, output::AnnotateError};

/// 像素坐标下的矩形，`(x0, y0)` 为左上角，`(x1, y1)` 为右下角。
///
/// 不做裁剪，坐标可能为负或超出图像范围。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
  pub x0: f32,
  pub y0: f32,
  pub x1: f32,
  pub y1: f32,
}

pub fn check_dimensions(width: u32, height: u32) -> Result<(), AnnotateError> {
  if width == 0 || height == 0 {
    return Err(AnnotateError::InvalidDimensions { width, height });
  }
  Ok(())
}

/// 将归一化边界框按图像尺寸映射为像素矩形
pub fn map_bounding_box(
  bbox: &BoundingBox,
  width: u32,
  height: u32,
) -> Result<PixelRect, AnnotateError> {
  check_dimensions(width, height)?;

  let (w, h) = (width as f32, height as f32);
  let x0 = w * bbox.left;
  let y0 = h * bbox.top;

  Ok(PixelRect {
    x0,
    y0,
    x1: x0 + w * bbox.width,
    y1: y0 + h * bbox.height,
  })
}
