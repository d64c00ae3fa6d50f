//! Benchmarks for the landmark-to-diagnosis pipeline.
//!
//! Inputs are fixed synthetic poses so numbers are reproducible.
//!
//! Run with:
//!
//! ```bash
//! cargo bench -p neck-mobility-core
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use neck_mobility_core::prelude::*;
use neck_mobility_core::stabilize::median_aggregate;
use neck_mobility_core::DEFAULT_VISIBILITY_THRESHOLD;

fn pose(head_degrees: f64, jitter: f64) -> LandmarkSet {
    let (sin, cos) = head_degrees.to_radians().sin_cos();
    let mut set = LandmarkSet::empty();
    for (index, x, y) in [
        (LandmarkIndex::Nose, 0.50, 0.29),
        (LandmarkIndex::LeftEye, 0.53, 0.27),
        (LandmarkIndex::RightEye, 0.47, 0.27),
        (LandmarkIndex::LeftEar, 0.56, 0.30),
        (LandmarkIndex::RightEar, 0.44, 0.30),
        (LandmarkIndex::MouthLeft, 0.52, 0.33),
        (LandmarkIndex::MouthRight, 0.48, 0.33),
    ] {
        let (dx, up) = (x - 0.5, 0.44 - y);
        let kp = Keypoint::with_visibility(
            0.5 + dx * cos + up * sin + jitter,
            0.44 - (up * cos - dx * sin),
            0.0,
            0.9,
        );
        set.set(index, Some(kp));
    }
    for (index, x, y) in [
        (LandmarkIndex::LeftShoulder, 0.65, 0.50),
        (LandmarkIndex::RightShoulder, 0.35, 0.50),
        (LandmarkIndex::LeftElbow, 0.72, 0.70),
        (LandmarkIndex::RightElbow, 0.28, 0.70),
    ] {
        set.set(index, Some(Keypoint::with_visibility(x + jitter, y, 0.0, 0.9)));
    }
    set
}

fn bench_single_capture(c: &mut Criterion) {
    let analyzer = MeasurementAnalyzer::default();
    let detection = PoseDetection::Detected(pose(25.0, 0.0).into());

    c.bench_function("analyze_single_capture", |b| {
        b.iter(|| {
            let _ = analyzer.analyze(black_box(CaptureType::LeftTilt), black_box(&detection));
        });
    });
}

fn bench_full_session(c: &mut Criterion) {
    let detections = [
        (CaptureType::Neutral, PoseDetection::Detected(pose(0.0, 0.0).into())),
        (CaptureType::RightTilt, PoseDetection::Detected(pose(-35.0, 0.0).into())),
        (CaptureType::LeftTilt, PoseDetection::Detected(pose(20.0, 0.0).into())),
    ];

    c.bench_function("three_capture_diagnosis", |b| {
        b.iter(|| {
            let mut session = DiagnosisSession::new();
            for (capture, detection) in &detections {
                let _ = session.capture(*capture, black_box(detection));
            }
            session.compute_diagnosis()
        });
    });
}

fn bench_median_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("median_aggregate");

    for passes in [3_usize, 5, 9, 15] {
        #[allow(clippy::cast_precision_loss)]
        let samples: Vec<LandmarkSet> = (0..passes)
            .map(|i| pose(10.0, (i as f64 - passes as f64 / 2.0) * 0.001))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(passes), &samples, |b, samples| {
            b.iter(|| median_aggregate(black_box(samples), DEFAULT_VISIBILITY_THRESHOLD));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_capture, bench_full_session, bench_median_aggregate);
criterion_main!(benches);
