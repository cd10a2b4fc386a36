use std::path::PathBuf;

use image::{ImageFormat, Rgb, RgbImage};
use shanan_labeler::input::{DirectoryBucket, InputError, ObjectLocation};
use shanan_labeler::model::{
  BoundingBox, DetectionLabel, DetectionParams, DetectionResult, Instance, ModelError,
  ResponseFileDetector,
};
use shanan_labeler::output::{
  AnnotateError, Annotator, Draw, SaveImageFileOutput, format_report, map_bounding_box,
};
use shanan_labeler::task::{OneShotTask, Task};

const RED: Rgb<u8> = Rgb([255, 0, 0]);
const GREY: Rgb<u8> = Rgb([128, 128, 128]);

const RESPONSE: &str = r#"{
  "Labels": [
    {
      "Name": "Cat",
      "Confidence": 93.456,
      "Instances": [
        {"BoundingBox": {"Width": 0.3, "Height": 0.4, "Left": 0.1, "Top": 0.2}, "Confidence": 93.0}
      ]
    },
    {"Name": "Blurry", "Confidence": 12.0},
    {"Name": "Indoors", "Confidence": 71.0, "Instances": [{"Confidence": 71.0}]}
  ]
}"#;

fn workspace(name: &str) -> PathBuf {
  let root = std::env::temp_dir().join(format!(
    "shanan-labeler-it-{}-{}",
    name,
    std::process::id()
  ));
  std::fs::create_dir_all(root.join("photos")).unwrap();
  root
}

fn write_fixture(root: &PathBuf) -> PathBuf {
  let image = RgbImage::from_pixel(100, 200, GREY);
  image
    .save_with_format(root.join("photos/cat.png"), ImageFormat::Png)
    .unwrap();
  let response = root.join("cat.json");
  std::fs::write(&response, RESPONSE).unwrap();
  response
}

fn annotator() -> Annotator {
  Annotator::new(Draw::new().unwrap())
}

#[test]
fn test_one_shot_pipeline() {
  let root = workspace("pipeline");
  let response = write_fixture(&root);
  let output_path = root.join("out/cat-labeled.png");

  let task = OneShotTask::new(
    ObjectLocation::new("photos", "cat.png"),
    DetectionParams::default(),
    annotator(),
  );
  let summary = task
    .run_task(
      DirectoryBucket::new(&root),
      ResponseFileDetector::new(&response),
      Some(SaveImageFileOutput::new(&output_path)),
    )
    .unwrap();

  // 低于 70% 的标签被过滤，无定位的标签仍出现在报告中
  assert_eq!((summary.width, summary.height), (100, 200));
  assert_eq!(
    summary.annotation.report,
    vec!["Cat (93.46%)", "Indoors (71.00%)"]
  );
  assert_eq!(summary.annotation.drawn_boxes, 1);

  let saved = image::open(&output_path).unwrap().into_rgb8();
  assert_eq!(saved.dimensions(), (100, 200));
  assert_eq!(saved.get_pixel(25, 40), &RED);
  assert_eq!(saved.get_pixel(25, 120), &RED);
  assert_eq!(saved.get_pixel(25, 80), &GREY);

  let report = std::fs::read_to_string(output_path.with_extension("txt")).unwrap();
  assert_eq!(report, "Cat (93.46%)\nIndoors (71.00%)");
}

#[test]
fn test_pipeline_without_output_still_annotates() {
  let root = workspace("no-output");
  let response = write_fixture(&root);

  let task = OneShotTask::new(
    ObjectLocation::new("photos", "cat.png"),
    DetectionParams::default(),
    annotator(),
  );
  let summary = task
    .run_task(
      DirectoryBucket::new(&root),
      ResponseFileDetector::new(&response),
      None::<SaveImageFileOutput>,
    )
    .unwrap();

  assert_eq!(summary.annotation.drawn_boxes, 1);
  assert_eq!(
    summary.annotation.report,
    vec!["Cat (93.46%)", "Indoors (71.00%)"]
  );
  assert!(!root.join("out").exists());
}

#[test]
fn test_missing_object_is_reported() {
  let root = workspace("missing");
  let response = write_fixture(&root);

  let task = OneShotTask::new(
    ObjectLocation::new("photos", "dog.png"),
    DetectionParams::default(),
    annotator(),
  );
  let err = task
    .run_task(
      DirectoryBucket::new(&root),
      ResponseFileDetector::new(&response),
      None::<SaveImageFileOutput>,
    )
    .unwrap_err();
  assert!(matches!(
    err.downcast_ref::<InputError>(),
    Some(InputError::ObjectNotFound(_))
  ));
}

#[test]
fn test_rejected_detection_is_reported() {
  let root = workspace("rejected");
  let response = write_fixture(&root);

  let params = DetectionParams {
    max_labels: 0,
    ..Default::default()
  };
  let task = OneShotTask::new(ObjectLocation::new("photos", "cat.png"), params, annotator());
  let err = task
    .run_task(
      DirectoryBucket::new(&root),
      ResponseFileDetector::new(&response),
      None::<SaveImageFileOutput>,
    )
    .unwrap_err();
  assert!(matches!(
    err.downcast_ref::<ModelError>(),
    Some(ModelError::RequestRejected(_))
  ));
}

#[test]
fn test_mapping_example() {
  let rect = map_bounding_box(&BoundingBox::new(0.1, 0.2, 0.3, 0.4), 100, 200).unwrap();
  let expected = (10.0, 40.0, 40.0, 120.0);
  assert!((rect.x0 - expected.0).abs() < 1e-4);
  assert!((rect.y0 - expected.1).abs() < 1e-4);
  assert!((rect.x1 - expected.2).abs() < 1e-4);
  assert!((rect.y1 - expected.3).abs() < 1e-4);
}

#[test]
fn test_empty_result_is_a_no_op() {
  let mut image = RgbImage::from_pixel(32, 32, GREY);
  let annotation = annotator()
    .annotate(&mut image, &DetectionResult::default())
    .unwrap();
  assert!(image.pixels().all(|p| p == &GREY));
  assert!(annotation.report.is_empty());
}

#[test]
fn test_zero_width_draws_nothing() {
  let mut image = RgbImage::new(0, 5);
  let result = DetectionResult::new(vec![DetectionLabel::new(
    "Cat",
    90.0,
    vec![Instance::located(BoundingBox::new(0.0, 0.0, 1.0, 1.0))],
  )]);
  assert_eq!(
    annotator().annotate(&mut image, &result),
    Err(AnnotateError::InvalidDimensions {
      width: 0,
      height: 5
    })
  );
}

#[test]
fn test_many_instances_in_order() {
  let instances: Vec<_> = (0..500)
    .map(|i| {
      let f = (i % 10) as f32 / 10.0;
      Instance::located(BoundingBox::new(f, f, 0.05, 0.05))
    })
    .collect();
  let result = DetectionResult::new(vec![
    DetectionLabel::new("Bird", 80.0, instances),
    DetectionLabel::new("Bird", 75.5, vec![Instance::unlocated()]),
  ]);
  let mut image = RgbImage::new(320, 240);
  let annotation = annotator().annotate(&mut image, &result).unwrap();
  assert_eq!(annotation.drawn_boxes, 500);
  assert_eq!(annotation.report, format_report(&result));
  assert_eq!(annotation.report, vec!["Bird (80.00%)", "Bird (75.50%)"]);
}
