mod common;

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use folio_core::layout::{divide_into_paragraphs, make_words};
use folio_core::{LayoutParams, PageInput, analyze_page, extract_page, extract_pages};

use common::{BenchTier, bench_config, bench_criterion, configure_group, pages_throughput, synthetic_page};

fn bench_divide(c: &mut Criterion) {
    let cfg = bench_config();
    let params = LayoutParams::default();
    let columns: &[usize] = if cfg.tier == BenchTier::Quick {
        &[1, 3]
    } else {
        &[1, 2, 3, 4]
    };

    let mut group = c.benchmark_group("layout_divide");
    configure_group(&mut group, &cfg);
    for &n in columns {
        let page = synthetic_page(cfg.seed ^ n as u64, n);
        let top = page.bbox.ury;
        let words = make_words(&page.marks, top, &params);
        group.throughput(pages_throughput(1));
        group.bench_with_input(BenchmarkId::new("columns", n), &words, |b, words| {
            b.iter(|| {
                let bags = divide_into_paragraphs(words, top, &params);
                black_box(bags.len());
            })
        });
    }
    group.finish();
}

fn bench_analyze(c: &mut Criterion) {
    let cfg = bench_config();
    let params = LayoutParams::default();

    let mut group = c.benchmark_group("layout_analyze");
    configure_group(&mut group, &cfg);
    for n in [1, 2, 3] {
        let page = synthetic_page(cfg.seed ^ (n as u64) << 8, n);
        group.throughput(pages_throughput(1));
        group.bench_with_input(BenchmarkId::new("page", n), &page, |b, page| {
            b.iter(|| {
                let layout = analyze_page(page, &params);
                black_box(layout.paragraphs().len());
            })
        });
        group.bench_with_input(BenchmarkId::new("text", n), &page, |b, page| {
            b.iter(|| {
                let text = extract_page(page, &params);
                black_box(text.map(|t| t.text.len()).unwrap_or(0));
            })
        });
    }
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let cfg = bench_config();
    let params = LayoutParams::default();
    let count = if cfg.tier == BenchTier::Quick { 8 } else { 32 };
    let pages: Vec<PageInput> = (0..count)
        .map(|i| synthetic_page(cfg.seed.wrapping_add(i as u64), 1 + i % 3))
        .collect();

    let mut group = c.benchmark_group("layout_batch");
    configure_group(&mut group, &cfg);
    group.throughput(pages_throughput(pages.len()));
    group.bench_function("extract_pages", |b| {
        b.iter(|| {
            let results = extract_pages(&pages, &params);
            black_box(results.len());
        })
    });
    group.finish();
}

criterion_group!(
    name = layout_benches;
    config = bench_criterion();
    targets = bench_divide, bench_analyze, bench_batch
);
criterion_main!(layout_benches);
