// 该文件是 Shanan （山南西风） 项目的一部分。
// src/output/save_image_file.rs - 保存图像文件
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

use image::RgbImage;
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  output::{Render, annotate::Annotation},
  url_file_path,
};

/// 保存标注后的图像，并在同目录写入同名 `.txt` 报告
pub struct SaveImageFileOutput {
  path: PathBuf,
}

#[derive(Error, Debug)]
pub enum SaveImageFileError {
  #[error("I/O 错误: {0}")]
  IoError(std::io::Error),
  #[error("图像错误: {0}")]
  ImageError(image::ImageError),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

impl FromUrlWithScheme for SaveImageFileOutput {
  const SCHEME: &'static str = "image";
}

impl FromUrl for SaveImageFileOutput {
  type Error = SaveImageFileError;

  fn from_url(uri: &Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(SaveImageFileError::SchemeMismatch(format!(
        "期望保存方式 '{}', 实际保存方式 '{}'",
        Self::SCHEME,
        uri.scheme()
      )));
    }

    Ok(Self::new(url_file_path(uri)))
  }
}

impl SaveImageFileOutput {
  pub fn new(path: impl AsRef<Path>) -> Self {
    Self {
      path: path.as_ref().to_path_buf(),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn report_path(&self) -> PathBuf {
    self.path.with_extension("txt")
  }

  fn save_image(&self, image: &RgbImage) -> Result<(), SaveImageFileError> {
    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent).map_err(SaveImageFileError::IoError)?;
    }

    image
      .save(&self.path)
      .map_err(SaveImageFileError::ImageError)?;

    info!("保存图像到文件: {}", self.path.display());
    Ok(())
  }

  fn save_report(&self, report: &[String]) -> Result<(), SaveImageFileError> {
    let path = self.report_path();
    std::fs::write(&path, report.join("\n")).map_err(SaveImageFileError::IoError)?;
    info!("保存报告到文件: {}", path.display());
    Ok(())
  }
}

impl Render<RgbImage, Annotation> for SaveImageFileOutput {
  type Error = SaveImageFileError;

  fn render_result(&self, frame: &RgbImage, result: &Annotation) -> Result<(), Self::Error> {
    self.save_image(frame)?;
    self.save_report(&result.report)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn saves_image_and_report() {
    let dir = std::env::temp_dir().join(format!("shanan-labeler-save-{}", std::process::id()));
    let output = SaveImageFileOutput::new(dir.join("nested/out.png"));
    let image = RgbImage::new(8, 6);
    let annotation = Annotation {
      report: vec!["Cat (93.46%)".to_string(), "Dog (71.00%)".to_string()],
      drawn_boxes: 1,
    };

    output.render_result(&image, &annotation).unwrap();

    let saved = image::open(output.path()).unwrap();
    assert_eq!((saved.width(), saved.height()), (8, 6));
    let report = std::fs::read_to_string(output.report_path()).unwrap();
    assert_eq!(report, "Cat (93.46%)\nDog (71.00%)");
  }

  #[test]
  fn from_url_checks_scheme() {
    let url = Url::parse("image:///tmp/labeled.png").unwrap();
    let output = SaveImageFileOutput::from_url(&url).unwrap();
    assert_eq!(output.report_path(), PathBuf::from("/tmp/labeled.txt"));

    let url = Url::parse("image:///tmp/my%20output/labeled.png").unwrap();
    let output = SaveImageFileOutput::from_url(&url).unwrap();
    assert_eq!(output.path(), Path::new("/tmp/my output/labeled.png"));

    let url = Url::parse("labels:///tmp/labeled.png").unwrap();
    assert!(matches!(
      SaveImageFileOutput::from_url(&url),
      Err(SaveImageFileError::SchemeMismatch(_))
    ));
  }
}
