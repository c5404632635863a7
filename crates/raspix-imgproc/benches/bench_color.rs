use criterion::{criterion_group, criterion_main, Criterion};
use raspix_image::{CpuAllocator, Image, ImageShape};
use raspix_imgproc::color;
use std::hint::black_box;

fn sample_image() -> Image<f32> {
    Image::from_shape_val(
        ImageShape {
            rows: 1080,
            cols: 1920,
            channels: 3,
        },
        0.5,
        CpuAllocator,
    )
    .unwrap()
}

fn bench_color(c: &mut Criterion) {
    let mut group = c.benchmark_group("Color");

    group.bench_function("hsv_from_rgb", |b| {
        b.iter_batched(
            sample_image,
            |mut image| {
                color::hsv_from_rgb(black_box(&mut image)).unwrap();
                image
            },
            criterion::BatchSize::LargeInput,
        )
    });

    group.bench_function("hsl_from_rgb", |b| {
        b.iter_batched(
            sample_image,
            |mut image| {
                color::hsl_from_rgb(black_box(&mut image)).unwrap();
                image
            },
            criterion::BatchSize::LargeInput,
        )
    });

    group.bench_function("linear_from_srgb", |b| {
        b.iter_batched(
            sample_image,
            |mut image| {
                color::linear_from_srgb(black_box(&mut image)).unwrap();
                image
            },
            criterion::BatchSize::LargeInput,
        )
    });

    group.bench_function("xyz_from_rgb", |b| {
        b.iter_batched(
            sample_image,
            |mut image| {
                color::xyz_from_rgb(black_box(&mut image)).unwrap();
                image
            },
            criterion::BatchSize::LargeInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_color);
criterion_main!(benches);
