// 该文件是 Shanan （山南西风） 项目的一部分。
// src/input.rs - 图像来源
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

use std::fmt;

use image::RgbImage;
use thiserror::Error;
use tracing::debug;

#[cfg(feature = "directory_bucket")]
mod directory_bucket;
#[cfg(feature = "directory_bucket")]
pub use self::directory_bucket::DirectoryBucket;

#[derive(Error, Debug)]
pub enum InputError {
  #[error("对象不存在: {0}")]
  ObjectNotFound(ObjectLocation),
  #[error("无效的对象位置: {0}")]
  InvalidKey(String),
  #[error("I/O error: {0}")]
  IoError(#[from] std::io::Error),
  #[error("Image decoding error: {0}")]
  ImageDecodeError(#[from] image::ImageError),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

/// 对象存储中的位置（存储桶 + 键）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
  pub bucket: String,
  pub key: String,
}

impl ObjectLocation {
  pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
    Self {
      bucket: bucket.into(),
      key: key.into(),
    }
  }
}

impl fmt::Display for ObjectLocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.bucket, self.key)
  }
}

pub trait ImageSource {
  /// 读取对象的原始（编码后的）图像字节
  fn fetch(&self, location: &ObjectLocation) -> Result<Vec<u8>, InputError>;
}

/// 解码图像字节并转换为 RGB 图像
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, InputError> {
  let image = image::load_from_memory(bytes)?;
  debug!("图像解码完成: {}x{}", image.width(), image.height());
  Ok(image.into_rgb8())
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::{ImageFormat, Rgb};
  use std::io::Cursor;

  #[test]
  fn decode_png_bytes() {
    let mut source = RgbImage::new(4, 3);
    source.put_pixel(1, 2, Rgb([10, 20, 30]));
    let mut bytes = Vec::new();
    source
      .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
      .unwrap();

    let decoded = decode_image(&bytes).unwrap();
    assert_eq!(decoded.dimensions(), (4, 3));
    assert_eq!(decoded.get_pixel(1, 2), &Rgb([10, 20, 30]));
  }

  #[test]
  fn decode_garbage_fails() {
    assert!(matches!(
      decode_image(b"definitely not an image"),
      Err(InputError::ImageDecodeError(_))
    ));
  }

  #[test]
  fn location_display() {
    let location = ObjectLocation::new("photos", "2026/cat.jpg");
    assert_eq!(location.to_string(), "photos/2026/cat.jpg");
  }
}
