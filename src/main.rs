// 该文件是 Shanan （山南西风） 项目的一部分。
// src/main.rs - 项目主程序
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

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shanan_labeler::{
  FromUrl,
  config::{Args, LabelerConfig},
  input::DirectoryBucket,
  model::ResponseFileDetector,
  output::{Annotator, Draw, SaveImageFileOutput},
  task::{OneShotTask, Task},
};

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let config = LabelerConfig::from_args(Args::parse())?;

  info!("存储位置: {}", config.store);
  info!("检测来源: {}", config.detector);
  if let Some(output) = &config.output {
    info!("输出路径: {}", output);
  }

  let source = DirectoryBucket::from_url(&config.store)?;
  let detector = ResponseFileDetector::from_url(&config.detector)?;
  let output = config
    .output
    .as_ref()
    .map(SaveImageFileOutput::from_url)
    .transpose()?;
  let draw = match &config.font {
    Some(path) => Draw::from_font_file(path)?,
    None => Draw::new()?,
  };

  let task = OneShotTask::new(config.location.clone(), config.params, Annotator::new(draw));
  let summary = task.run_task(source, detector, output)?;

  println!();
  println!("分析完成!");
  println!("存储桶: {}", summary.location.bucket);
  println!(
    "图像: {} ({}x{})",
    summary.location.key, summary.width, summary.height
  );
  println!();
  println!("检测到的标签");
  for line in &summary.annotation.report {
    println!("- {}", line);
  }

  Ok(())
}
