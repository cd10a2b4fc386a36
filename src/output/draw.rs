// 该文件是 Shanan （山南西风） 项目的一部分。
// src/output/draw.rs - 检测结果可视化
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

use std::path::Path;

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use thiserror::Error;
use tracing::debug;

use crate::{
  model::DetectionResult,
  output::{
    AnnotateError,
    geometry::{PixelRect, check_dimensions, map_bounding_box},
  },
};

// 绘制常量
const LABEL_FONT_SIZE: f32 = 12.0;
const LABEL_COLOR: [u8; 3] = [255, 0, 0]; // 红色
const STROKE_WIDTH: u32 = 3;
const CAPTION_OFFSET: i32 = 10;

// 像素坐标的安全范围，超出部分本就在画布之外
const COORD_LIMIT: i64 = (i32::MAX / 2) as i64;

#[derive(Error, Debug)]
pub enum FontLoadError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("字体无效: {0}")]
  InvalidFont(#[from] ab_glyph::InvalidFont),
}

/// 在图像上绘制检测框与标签名
pub struct Draw {
  font: FontArc,
  font_scale: PxScale,
  color: Rgb<u8>,
  stroke_width: u32,
  caption_offset: i32,
}

impl Draw {
  /// 使用内置字体
  pub fn new() -> Result<Self, FontLoadError> {
    let font_data: &'static [u8] = include_bytes!("../../assets/DejaVuSans.ttf");
    let font = FontArc::try_from_slice(font_data)?;
    Ok(Self::with_font(font))
  }

  pub fn from_font_file(path: impl AsRef<Path>) -> Result<Self, FontLoadError> {
    let data = std::fs::read(path.as_ref())?;
    let font = FontArc::try_from_vec(data)?;
    debug!("已加载字体: {}", path.as_ref().display());
    Ok(Self::with_font(font))
  }

  pub fn with_font(font: FontArc) -> Self {
    Self {
      font,
      font_scale: PxScale::from(LABEL_FONT_SIZE),
      color: Rgb(LABEL_COLOR),
      stroke_width: STROKE_WIDTH,
      caption_offset: CAPTION_OFFSET,
    }
  }

  /// 按检测结果顺序绘制所有带边界框的实例，返回绘制的框数。
  ///
  /// 尺寸无效时直接返回错误，不会绘制任何内容。
  pub fn draw_detections_on_image(
    &self,
    image: &mut RgbImage,
    result: &DetectionResult,
  ) -> Result<usize, AnnotateError> {
    let (width, height) = image.dimensions();
    check_dimensions(width, height)?;

    let mut drawn = 0;
    for label in result.labels.iter() {
      for bbox in label.located_boxes() {
        let rect = map_bounding_box(bbox, width, height)?;
        self.draw_bbox_with_label(image, &rect, &label.name);
        drawn += 1;
      }
    }

    debug!("绘制了 {} 个检测框", drawn);
    Ok(drawn)
  }

  fn draw_bbox_with_label(&self, image: &mut RgbImage, rect: &PixelRect, name: &str) {
    let (x_min, x_max) = ordered(snap(rect.x0), snap(rect.x1));
    let (y_min, y_max) = ordered(snap(rect.y0), snap(rect.y1));

    // 逐层向内绘制边框
    for thickness in 0..self.stroke_width as i64 {
      let (left, right) = (x_min + thickness, x_max - thickness);
      let (top, bottom) = (y_min + thickness, y_max - thickness);
      if left > right || top > bottom {
        break;
      }

      self.draw_horizontal(image, top, left, right);
      self.draw_horizontal(image, bottom, left, right);
      self.draw_vertical(image, left, top, bottom);
      self.draw_vertical(image, right, top, bottom);
    }

    // 标签位于框上方，可能落在画布外，不做钳制
    let text_x = snap(rect.x0) as i32;
    let text_y = (snap(rect.y0) - self.caption_offset as i64) as i32;
    draw_text_mut(
      image,
      self.color,
      text_x,
      text_y,
      self.font_scale,
      &self.font,
      name,
    );
  }

  fn draw_horizontal(&self, image: &mut RgbImage, y: i64, x_from: i64, x_to: i64) {
    let (w, h) = (image.width() as i64, image.height() as i64);
    if y < 0 || y >= h {
      return;
    }
    for x in x_from.max(0)..=x_to.min(w - 1) {
      image.put_pixel(x as u32, y as u32, self.color);
    }
  }

  fn draw_vertical(&self, image: &mut RgbImage, x: i64, y_from: i64, y_to: i64) {
    let (w, h) = (image.width() as i64, image.height() as i64);
    if x < 0 || x >= w {
      return;
    }
    for y in y_from.max(0)..=y_to.min(h - 1) {
      image.put_pixel(x as u32, y as u32, self.color);
    }
  }
}

// 限制在安全范围内，后续的描边与标签偏移不会溢出
fn snap(v: f32) -> i64 {
  (v.round() as i64).clamp(-COORD_LIMIT, COORD_LIMIT)
}

fn ordered(a: i64, b: i64) -> (i64, i64) {
  if a <= b { (a, b) } else { (b, a) }
}
