// 该文件是 Shanan （山南西风） 项目的一部分。
// src/config.rs - 项目参数配置
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

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;
use url::Url;

use crate::{
  input::ObjectLocation,
  model::{DEFAULT_MAX_LABELS, DEFAULT_MIN_CONFIDENCE, DetectionParams},
};

/// Shanan Labeler 参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 待分析图像在存储桶中的键
  #[arg(value_name = "IMAGE_KEY")]
  pub image_key: String,

  /// 存储桶名称
  #[arg(long, env = "S3_BUCKET_NAME", value_name = "BUCKET")]
  pub bucket: Option<String>,

  /// 存储桶所在的根目录，例如 bucket:///srv/buckets
  #[arg(long, value_name = "STORE")]
  pub store: Url,

  /// 标签检测来源，例如 labels:///srv/responses/cat.json
  #[arg(long, value_name = "DETECTOR")]
  pub detector: Url,

  /// 标注图像的保存路径，例如 image:///tmp/cat-labeled.png
  #[arg(long, value_name = "OUTPUT")]
  pub output: Option<Url>,

  /// 最多返回的标签数
  #[arg(long, default_value_t = DEFAULT_MAX_LABELS, value_name = "COUNT")]
  pub max_labels: u32,

  /// 最低置信度 (0 - 100)
  #[arg(long, default_value_t = DEFAULT_MIN_CONFIDENCE, value_name = "PERCENT")]
  pub min_confidence: f32,

  /// 标签文字使用的 TrueType 字体，默认使用内置字体
  #[arg(long, value_name = "FILE")]
  pub font: Option<PathBuf>,
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
  #[error("未设置存储桶名称，请使用 --bucket 或环境变量 S3_BUCKET_NAME")]
  MissingBucket,
  #[error("图像键为空")]
  MissingImageKey,
  #[error("检测参数无效: {0}")]
  InvalidParams(String),
}

/// 经过校验的运行配置，由调用方显式传入各组件
#[derive(Debug, Clone)]
pub struct LabelerConfig {
  pub location: ObjectLocation,
  pub store: Url,
  pub detector: Url,
  pub output: Option<Url>,
  pub params: DetectionParams,
  pub font: Option<PathBuf>,
}

impl LabelerConfig {
  pub fn from_args(args: Args) -> Result<Self, ConfigError> {
    let bucket = args
      .bucket
      .map(|b| b.trim().to_string())
      .filter(|b| !b.is_empty())
      .ok_or(ConfigError::MissingBucket)?;
    if args.image_key.trim().is_empty() {
      return Err(ConfigError::MissingImageKey);
    }

    let params = DetectionParams {
      max_labels: args.max_labels,
      min_confidence: args.min_confidence,
    };
    params
      .validate()
      .map_err(|e| ConfigError::InvalidParams(e.to_string()))?;

    Ok(Self {
      location: ObjectLocation::new(bucket, args.image_key),
      store: args.store,
      detector: args.detector,
      output: args.output,
      params,
      font: args.font,
    })
  }
}
