use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dc6::{compose_direction, dc6_decode, dc6_encode, EncodeFrame, Palette, MAX_CANVAS_BYTES};
use std::fs;
use std::hint::black_box;

/// Sprite with a transparent border and a dithered body, like most inventory art.
fn generate_sprite(width: u32, height: u32, seed: u32) -> EncodeFrame {
    let mut pixels = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let border = x < 2 || y < 2 || x + 2 >= width || y + 2 >= height;
            let value = if border {
                0
            } else {
                ((x * 7 + y * 13 + seed) % 255 + 1) as u8
            };
            pixels.push(value);
        }
    }
    EncodeFrame::new(width, height, pixels)
}

fn generate_file(directions: u32, per: u32, width: u32, height: u32) -> Vec<u8> {
    let frames: Vec<EncodeFrame> = (0..directions * per)
        .map(|i| generate_sprite(width, height, i))
        .collect();
    dc6_encode(directions, per, &frames).expect("generated frames are consistent")
}

fn bench_single_frame(c: &mut Criterion) {
    let data = generate_file(1, 1, 28, 28);
    c.bench_function("decode_single_28x28", |b| {
        b.iter(|| {
            let result = dc6_decode(black_box(&data));
            assert!(result.is_ok());
            result
        })
    });
}

fn bench_animation_sheet(c: &mut Criterion) {
    let data = generate_file(8, 16, 96, 96);
    c.bench_function("decode_8x16_96x96", |b| {
        b.iter(|| {
            let result = dc6_decode(black_box(&data));
            assert!(result.is_ok());
            result
        })
    });
}

fn bench_varying_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("varying_sizes");

    for size in [16u32, 64, 256, 640].iter() {
        let data = generate_file(1, 1, *size, *size);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{size}x{size}")),
            &data,
            |b, data| {
                b.iter(|| {
                    let result = dc6_decode(black_box(data));
                    assert!(result.is_ok());
                    result
                })
            },
        );
    }

    group.finish();
}

fn bench_compose_direction(c: &mut Criterion) {
    let data = generate_file(1, 16, 96, 96);
    let image = dc6_decode(&data).expect("generated file decodes");
    let palette = Palette::grayscale();

    c.bench_function("compose_direction_16x96x96", |b| {
        b.iter(|| {
            let result = compose_direction(black_box(image.frames()), &palette, MAX_CANVAS_BYTES);
            assert!(result.is_ok());
            result
        })
    });
}

fn bench_real_files(c: &mut Criterion) {
    let mut group = c.benchmark_group("real_files");

    // Game assets are not redistributable; drop files into tests/data to include them
    if let Ok(entries) = fs::read_dir("tests/data") {
        for entry in entries.flatten() {
            let path = entry.path();
            if !path
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case("dc6"))
            {
                continue;
            }
            let Ok(data) = fs::read(&path) else { continue };
            let name = path.file_stem().unwrap_or_default().to_string_lossy().into_owned();
            group.bench_with_input(BenchmarkId::new("decode", name), &data, |b, data| {
                b.iter(|| dc6_decode(black_box(data)))
            });
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_frame,
    bench_animation_sheet,
    bench_varying_sizes,
    bench_compose_direction,
    bench_real_files
);

criterion_main!(benches);
