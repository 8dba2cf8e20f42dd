//! Basic benchmarks for vecplot-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use vecplot_core::{process, AdvancedOptions, Mode, Options, Raster};

fn checkerboard_raster(size: u32) -> Raster {
    let cell_size = (size / 8).max(1);
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let cell_x = x / cell_size;
            let cell_y = y / cell_size;
            let v = if (cell_x + cell_y) % 2 == 0 { 255u8 } else { 0u8 };
            pixels.extend_from_slice(&[v, v, v, 255]);
        }
    }
    Raster::new(size, size, pixels).unwrap()
}

fn benchmark_extraction(c: &mut Criterion) {
    let sizes = vec![64, 128, 256];

    let mut group = c.benchmark_group("extraction");

    for size in sizes {
        let pixels = (size * size) as u64;
        group.throughput(Throughput::Elements(pixels));

        let raster = checkerboard_raster(size);

        group.bench_with_input(BenchmarkId::new("color_regions", size), &size, |b, _| {
            let options = Options {
                num_colors: 4,
                ..Options::default()
            };
            let advanced = AdvancedOptions::default();
            b.iter(|| {
                black_box(process(&raster, Mode::ColorRegions, &options, &advanced).unwrap());
            });
        });

        group.bench_with_input(BenchmarkId::new("centerline", size), &size, |b, _| {
            let options = Options::default();
            let advanced = AdvancedOptions::default();
            b.iter(|| {
                black_box(process(&raster, Mode::Centerline, &options, &advanced).unwrap());
            });
        });

        group.bench_with_input(BenchmarkId::new("hatching", size), &size, |b, _| {
            let options = Options {
                num_colors: 4,
                hatch_spacing: 4.0,
                ..Options::default()
            };
            let advanced = AdvancedOptions::default();
            b.iter(|| {
                black_box(process(&raster, Mode::Hatching, &options, &advanced).unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_extraction);
criterion_main!(benches);
