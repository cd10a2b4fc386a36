// 该文件是 Shanan （山南西风） 项目的一部分。
// src/input/directory_bucket.rs - 本地目录存储桶
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

use std::path::{Component, Path, PathBuf};

use tracing::{debug, error};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme, url_file_path,
  input::{ImageSource, InputError, ObjectLocation},
};

/// 以本地目录模拟对象存储，对象 `bucket/key` 对应 `<root>/<bucket>/<key>`
pub struct DirectoryBucket {
  root: PathBuf,
}

impl FromUrlWithScheme for DirectoryBucket {
  const SCHEME: &'static str = "bucket";
}

impl FromUrl for DirectoryBucket {
  type Error = InputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(InputError::SchemeMismatch(url.scheme().to_string()));
    }

    Ok(Self::new(url_file_path(url)))
  }
}

// 只允许普通的相对路径分量
fn is_plain_relative(path: &Path) -> bool {
  path.components().next().is_some()
    && path
      .components()
      .all(|component| matches!(component, Component::Normal(_)))
}

impl DirectoryBucket {
  pub fn new(root: impl AsRef<Path>) -> Self {
    Self {
      root: root.as_ref().to_path_buf(),
    }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn resolve(&self, location: &ObjectLocation) -> Result<PathBuf, InputError> {
    let bucket = Path::new(&location.bucket);
    if location.bucket.contains('/') || !is_plain_relative(bucket) {
      return Err(InputError::InvalidKey(format!(
        "存储桶名称无效: '{}'",
        location.bucket
      )));
    }
    let key = Path::new(&location.key);
    if !is_plain_relative(key) {
      return Err(InputError::InvalidKey(format!(
        "对象键无效: '{}'",
        location.key
      )));
    }
    Ok(self.root.join(bucket).join(key))
  }
}

impl ImageSource for DirectoryBucket {
  fn fetch(&self, location: &ObjectLocation) -> Result<Vec<u8>, InputError> {
    let path = self.resolve(location)?;
    debug!("读取对象 {} -> {}", location, path.display());

    if !path.is_file() {
      return Err(InputError::ObjectNotFound(location.clone()));
    }
    match std::fs::read(&path) {
      Ok(bytes) => Ok(bytes),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        Err(InputError::ObjectNotFound(location.clone()))
      }
      Err(e) => Err(InputError::IoError(e)),
    }
  }
}
