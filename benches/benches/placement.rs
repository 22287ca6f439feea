// Copyright 2025 the Troposphere Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Box versus pixel placement on the software surface.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use troposphere::{CloudLayout, Config, Word, filter_words};
use troposphere_raster::RasterSurface;

fn corpus(n: usize, seed: u64) -> Vec<Word> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let len = rng.gen_range(3..10);
            let text: String = (0..len)
                .map(|_| char::from(b'a' + rng.gen_range(0..26_u8)))
                .collect();
            // Zipf-like weights, like real word counts.
            let weight = u32::try_from(1_000 / (i + 1)).unwrap_or(1).max(1);
            Word::new(format!("{text}{i}"), weight)
        })
        .collect()
}

fn bench_placement(c: &mut Criterion) {
    let mut group = c.benchmark_group("troposphere_placement");
    group.sample_size(10);

    for &n in &[25_usize, 100] {
        let words = corpus(n, 0x7E0_0001);
        for cuddle in [false, true] {
            let config = Config {
                width: 600,
                height: 600,
                cuddle,
                ..Config::default()
            };
            let mode = if cuddle { "pixel" } else { "box" };
            group.bench_function(format!("{mode}(n={n})"), |b| {
                b.iter_batched(
                    || {
                        let surface = RasterSurface::new(config.width, config.height)
                            .expect("600x600 is a valid canvas");
                        let mut cloud = CloudLayout::new(
                            config.clone(),
                            surface,
                            SmallRng::seed_from_u64(0x7E0_0002),
                        );
                        cloud.start(words.clone());
                        cloud
                    },
                    |mut cloud| {
                        let events = cloud.run_to_completion();
                        black_box((cloud.layout().len(), events.len()));
                    },
                    BatchSize::LargeInput,
                );
            });
        }
    }

    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let words = corpus(5_000, 0x7E0_0003);
    c.bench_function("filter_words(n=5000,max=200)", |b| {
        b.iter(|| black_box(filter_words(black_box(&words), 200)));
    });
}

criterion_group!(benches, bench_placement, bench_filter);
criterion_main!(benches);
