use yolopost::{detect, DetectConfig, GridCell, GridLayout};

/// Builds an all-background prediction buffer for `input_shape` with
/// `num_classes` classes: zero offsets, unit sizes (log 0) and zero scores.
fn background(input_shape: (usize, usize), num_classes: usize) -> (Vec<f32>, usize) {
    let layout = GridLayout::new(input_shape.0, input_shape.1);
    let cols = 5 + num_classes;
    (vec![0.0; layout.num_cells() * cols], cols)
}

/// Writes one candidate into the row of the given cell.
#[allow(clippy::too_many_arguments)]
fn put_candidate(
    pred: &mut [f32],
    layout: &GridLayout,
    cols: usize,
    cell: GridCell,
    offsets: (f32, f32),
    log_sizes: (f32, f32),
    objectness: f32,
    class_probs: &[f32],
) {
    let row_idx = layout
        .cells()
        .position(|c| c == cell)
        .expect("cell not in layout");
    let row = &mut pred[row_idx * cols..(row_idx + 1) * cols];
    row[0] = offsets.0;
    row[1] = offsets.1;
    row[2] = log_sizes.0;
    row[3] = log_sizes.1;
    row[4] = objectness;
    row[5..].copy_from_slice(class_probs);
}

#[test]
fn all_background_returns_no_detections() {
    let (pred, _) = background((64, 64), 3);
    let result = detect(&pred, (64, 64), (64, 64), &DetectConfig::default()).unwrap();
    assert!(result.is_none());
}

#[test]
fn below_threshold_candidates_return_no_detections() {
    let (mut pred, cols) = background((64, 64), 2);
    let layout = GridLayout::new(64, 64);
    // combined score 0.5 * 0.5 = 0.25, below the 0.3 default
    put_candidate(
        &mut pred,
        &layout,
        cols,
        GridCell { x: 1, y: 1, stride: 8 },
        (0.0, 0.0),
        (0.0, 0.0),
        0.5,
        &[0.5, 0.1],
    );
    let result = detect(&pred, (64, 64), (64, 64), &DetectConfig::default()).unwrap();
    assert!(result.is_none());
}

#[test]
fn single_candidate_decodes_to_expected_box() {
    let (mut pred, cols) = background((64, 64), 2);
    let layout = GridLayout::new(64, 64);
    // center (2.5, 3.5) * 8 = (20, 28); sizes exp(ln 2) * 8 = 16 and exp(0) * 8 = 8
    put_candidate(
        &mut pred,
        &layout,
        cols,
        GridCell { x: 2, y: 3, stride: 8 },
        (0.5, 0.5),
        (2.0f32.ln(), 0.0),
        0.9,
        &[0.1, 0.8],
    );

    let detections = detect(&pred, (64, 64), (64, 64), &DetectConfig::default())
        .unwrap()
        .expect("one detection expected");
    assert_eq!(detections.len(), 1);

    let d = &detections[0];
    // image shape equals input shape, so rescaling is the identity
    assert!((d.x1 - 12.0).abs() < 1e-4);
    assert!((d.y1 - 24.0).abs() < 1e-4);
    assert!((d.x2 - 28.0).abs() < 1e-4);
    assert!((d.y2 - 32.0).abs() < 1e-4);
    assert!((d.score - 0.72).abs() < 1e-6);
    assert_eq!(d.class_idx, 1);
}

#[test]
fn duplicate_across_strides_is_suppressed() {
    let (mut pred, cols) = background((64, 64), 1);
    let layout = GridLayout::new(64, 64);
    // same box (center (20, 28), 16x8) emitted by a stride-8 and a stride-16 cell
    put_candidate(
        &mut pred,
        &layout,
        cols,
        GridCell { x: 2, y: 3, stride: 8 },
        (0.5, 0.5),
        (2.0f32.ln(), 0.0),
        0.9,
        &[0.9],
    );
    put_candidate(
        &mut pred,
        &layout,
        cols,
        GridCell { x: 1, y: 1, stride: 16 },
        (0.25, 0.75),
        (0.0, 0.5f32.ln()),
        0.8,
        &[0.8],
    );

    let detections = detect(&pred, (64, 64), (64, 64), &DetectConfig::default())
        .unwrap()
        .expect("detections expected");
    assert_eq!(detections.len(), 1);
    assert!((detections[0].score - 0.81).abs() < 1e-6);
}

#[test]
fn disjoint_detections_survive_in_score_order() {
    let (mut pred, cols) = background((128, 128), 2);
    let layout = GridLayout::new(128, 128);
    put_candidate(
        &mut pred,
        &layout,
        cols,
        GridCell { x: 1, y: 1, stride: 8 },
        (0.0, 0.0),
        (0.0, 0.0),
        0.8,
        &[0.9, 0.0],
    );
    put_candidate(
        &mut pred,
        &layout,
        cols,
        GridCell { x: 12, y: 12, stride: 8 },
        (0.0, 0.0),
        (0.0, 0.0),
        0.9,
        &[0.0, 0.95],
    );

    let detections = detect(&pred, (128, 128), (128, 128), &DetectConfig::default())
        .unwrap()
        .expect("detections expected");
    assert_eq!(detections.len(), 2);
    assert!(detections[0].score >= detections[1].score);
    assert_eq!(detections[0].class_idx, 1);
    assert_eq!(detections[1].class_idx, 0);
}

#[test]
fn rescaling_uses_reference_axis_mapping() {
    // non-square input and image to pin the cross-applied axes: x coordinates
    // divide by the input height and scale by the image width, y coordinates
    // divide by the input width and scale by the image height
    let (mut pred, cols) = background((64, 32), 1);
    let layout = GridLayout::new(64, 32);
    // center (8, 16), size 8x8 in input pixels
    put_candidate(
        &mut pred,
        &layout,
        cols,
        GridCell { x: 1, y: 2, stride: 8 },
        (0.0, 0.0),
        (0.0, 0.0),
        0.9,
        &[0.9],
    );

    let detections = detect(&pred, (64, 32), (100, 200), &DetectConfig::default())
        .unwrap()
        .expect("one detection expected");
    let d = &detections[0];
    assert!((d.x1 - 4.0 / 64.0 * 200.0).abs() < 1e-4);
    assert!((d.x2 - 12.0 / 64.0 * 200.0).abs() < 1e-4);
    assert!((d.y1 - 12.0 / 32.0 * 100.0).abs() < 1e-4);
    assert!((d.y2 - 20.0 / 32.0 * 100.0).abs() < 1e-4);
}

#[test]
fn lower_confidence_threshold_admits_more_detections() {
    let (mut pred, cols) = background((64, 64), 1);
    let layout = GridLayout::new(64, 64);
    put_candidate(
        &mut pred,
        &layout,
        cols,
        GridCell { x: 1, y: 1, stride: 8 },
        (0.0, 0.0),
        (0.0, 0.0),
        0.5,
        &[0.5],
    );

    let strict = DetectConfig::default();
    assert!(detect(&pred, (64, 64), (64, 64), &strict).unwrap().is_none());

    let loose = DetectConfig {
        conf_threshold: 0.2,
        ..DetectConfig::default()
    };
    let detections = detect(&pred, (64, 64), (64, 64), &loose).unwrap().unwrap();
    assert_eq!(detections.len(), 1);
}

#[cfg(feature = "rayon")]
#[test]
fn batch_detect_matches_sequential() {
    let (mut a, cols) = background((64, 64), 1);
    let layout = GridLayout::new(64, 64);
    put_candidate(
        &mut a,
        &layout,
        cols,
        GridCell { x: 2, y: 2, stride: 8 },
        (0.0, 0.0),
        (0.0, 0.0),
        0.9,
        &[0.9],
    );
    let (b, _) = background((64, 64), 1);

    let cfg = DetectConfig::default();
    let batch =
        yolopost::detect_batch(&[a.as_slice(), b.as_slice()], (64, 64), (64, 64), &cfg).unwrap();
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0], detect(&a, (64, 64), (64, 64), &cfg).unwrap());
    assert!(batch[1].is_none());
}
