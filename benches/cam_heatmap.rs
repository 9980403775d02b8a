use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use cam_heatmap_rs::cam_pipeline::{
    engine::{resize_cubic, normalize_to_u8, DEFAULT_EPSILON},
    CamEngine, PointwiseGapNet,
};
use ndarray::{arr1, arr2, Array2, Array4};

fn generate_mock_image(height: usize, width: usize) -> Array4<f32> {
    Array4::from_shape_fn((1, 3, height, width), |(_, c, y, x)| {
        (((x + 2 * y + 5 * c) % 256) as f32 / 255.0 - 0.5) / 0.5
    })
}

fn demo_net(stride: usize) -> PointwiseGapNet {
    PointwiseGapNet::new(
        arr2(&[[2.0, -1.0, -1.0], [-1.0, 2.0, -1.0], [-1.0, -1.0, 2.0]]),
        arr1(&[0.0, 0.0, 0.0]),
        arr2(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]),
        arr1(&[0.0, 0.0, 0.0]),
        stride,
    )
    .expect("valid demo network")
}

fn benchmark_heatmap_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("heatmap_by_size");
    let model = demo_net(16);

    let sizes = vec![
        (64, 64, "64x64"),
        (256, 256, "256x256"),
        (512, 512, "512x512"),
    ];

    for (height, width, label) in sizes {
        let image = generate_mock_image(height, width);

        group.bench_with_input(
            BenchmarkId::from_parameter(label),
            &image,
            |b, image| {
                let mut engine = CamEngine::new(&model).expect("single pooling stage");

                b.iter(|| {
                    let _ = engine.compute_heatmap(black_box(image.view()));
                });
            },
        );
    }

    group.finish();
}

fn benchmark_feature_stride(c: &mut Criterion) {
    let mut group = c.benchmark_group("feature_stride");
    let image = generate_mock_image(256, 256);

    for stride in [8usize, 16, 32] {
        let model = demo_net(stride);
        group.bench_with_input(
            BenchmarkId::from_parameter(stride),
            &image,
            |b, image| {
                let mut engine = CamEngine::new(&model).expect("single pooling stage");

                b.iter(|| {
                    let _ = engine.compute_heatmap(black_box(image.view()));
                });
            },
        );
    }

    group.finish();
}

fn benchmark_resize_and_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("post_processing");
    let raw = Array2::from_shape_fn((8, 8), |(y, x)| (x * y) as f32);

    group.bench_function("resize_8_to_256", |b| {
        b.iter(|| {
            let _ = resize_cubic(black_box(raw.view()), 256, 256);
        });
    });

    let resized = resize_cubic(raw.view(), 256, 256).expect("valid sizes");
    group.bench_function("normalize_256", |b| {
        b.iter(|| {
            let _ = normalize_to_u8(black_box(resized.view()), DEFAULT_EPSILON);
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_heatmap_sizes,
    benchmark_feature_stride,
    benchmark_resize_and_normalize
);
criterion_main!(benches);
