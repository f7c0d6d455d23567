//! Criterion benchmarks for the per-pair hot paths
//!
//! Covers: QTC sequencing, motif detection, and a full eight-pair session.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use qtc_motif::analysis::qtc_sequencer::QtcSequencer;
use qtc_motif::app::config::Config;
use qtc_motif::capture::types::{Frame, JointPosition, MotionCapture};
use qtc_motif::motifs::motif_detector::MotifDetector;
use qtc_motif::workflow::analyzer::MotionAnalyzer;

const JOINTS: &[&str] = &[
    "head", "sternum", "pelvis", "l_hand", "r_hand", "l_elbow", "r_elbow", "l_foot", "r_foot",
    "spine_mid",
];

/// Every joint circling at its own speed, so all pairs change distance
fn generate_frames(n: usize) -> Vec<Frame> {
    (0..n)
        .map(|i| {
            let t = i as f64 / 60.0;
            JOINTS
                .iter()
                .enumerate()
                .fold(Frame::new(i as u64), |frame, (j, name)| {
                    let speed = 0.5 + j as f64 * 0.3;
                    let radius = 200.0 + 40.0 * j as f64;
                    frame.with_joint(
                        *name,
                        JointPosition::new(
                            radius * (speed * t).cos(),
                            1000.0 + 100.0 * j as f64,
                            radius * (speed * t).sin(),
                        ),
                    )
                })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Sequencer benchmarks
// ---------------------------------------------------------------------------

fn bench_sequencer(c: &mut Criterion) {
    let sequencer = QtcSequencer::new();

    let mut group = c.benchmark_group("qtc_sequence");
    for count in [600, 3600, 18000] {
        let frames = generate_frames(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &frames, |b, frames| {
            b.iter(|| {
                let seq = sequencer.compute(black_box(frames), "l_hand", "head", 60.0);
                black_box(seq)
            });
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Motif detector benchmarks
// ---------------------------------------------------------------------------

fn bench_motif_detection(c: &mut Criterion) {
    let sequencer = QtcSequencer::new();
    let detector = MotifDetector::with_limits(0.5, usize::MAX);

    let mut group = c.benchmark_group("motif_detect");
    for count in [600, 3600, 18000] {
        let frames = generate_frames(count);
        let Ok(sequence) = sequencer.compute(&frames, "l_hand", "r_hand", 60.0) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::from_parameter(count), &sequence, |b, seq| {
            b.iter(|| black_box(detector.detect(black_box(seq), "l_hand-r_hand")));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Full session
// ---------------------------------------------------------------------------

fn bench_session(c: &mut Criterion) {
    let config = Config::default();
    let pairs = config.joint_pairs();
    let analyzer = MotionAnalyzer::new(config.analyzer_config());
    let capture = MotionCapture::new(60.0, generate_frames(3600));

    c.bench_function("session_8_pairs_3600_frames", |b| {
        b.iter(|| black_box(analyzer.analyze(black_box(&capture), &pairs)));
    });
}

criterion_group!(benches, bench_sequencer, bench_motif_detection, bench_session);
criterion_main!(benches);
