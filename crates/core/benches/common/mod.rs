use std::env;
use std::time::Duration;

use criterion::measurement::Measurement;
use criterion::{BenchmarkGroup, Criterion, Throughput};

use folio_core::geometry::Rect;
use folio_core::{Mark, PageInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchTier {
    Quick,
    Full,
}

impl BenchTier {
    pub fn from_env() -> Self {
        match env::var("FOLIO_BENCH_TIER").as_deref() {
            Ok("full") => Self::Full,
            _ => Self::Quick,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub tier: BenchTier,
    pub seed: u64,
    pub sample_size: usize,
    pub measurement: Duration,
}

pub fn bench_config() -> BenchConfig {
    let tier = BenchTier::from_env();
    let seed = env::var("FOLIO_BENCH_SEED")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0xC0FFEE);
    let (sample_size, measurement) = match tier {
        BenchTier::Quick => (20, Duration::from_secs(3)),
        BenchTier::Full => (40, Duration::from_secs(8)),
    };
    BenchConfig {
        tier,
        seed,
        sample_size,
        measurement,
    }
}

pub fn configure_group<M: Measurement>(group: &mut BenchmarkGroup<'_, M>, cfg: &BenchConfig) {
    group.sample_size(cfg.sample_size);
    group.measurement_time(cfg.measurement);
}

pub fn bench_criterion() -> Criterion {
    Criterion::default().configure_from_args()
}

pub fn pages_throughput(pages: usize) -> Throughput {
    Throughput::Elements(pages as u64)
}

#[derive(Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    pub fn gen_f64(&mut self, min: f64, max: f64) -> f64 {
        let n = self.next_u64() as f64 / u64::MAX as f64;
        min + (max - min) * n
    }

    pub fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

pub const PAGE_BBOX: Rect = Rect::new(0.0, 0.0, 612.0, 792.0);

/// A page of `columns` prose columns, each holding paragraphs of random
/// words down to the bottom margin. Glyph positions jitter slightly.
pub fn synthetic_page(seed: u64, columns: usize) -> PageInput {
    let mut rng = XorShift64::new(seed);
    let gutter = 18.0;
    let width = (PAGE_BBOX.width() - 72.0 - gutter * (columns as f64 - 1.0)) / columns as f64;
    let mut marks = Vec::new();

    for col in 0..columns {
        let x0 = 36.0 + col as f64 * (width + gutter);
        let mut y = 740.0 - rng.gen_f64(0.0, 6.0);
        while y > 60.0 {
            let lines = 3 + rng.below(6);
            for _ in 0..lines {
                if y <= 60.0 {
                    break;
                }
                let mut x = x0;
                loop {
                    let len = 1 + rng.below(9) as usize;
                    let advance = 4.0 + rng.gen_f64(0.0, 1.5);
                    if x + len as f64 * advance > x0 + width {
                        break;
                    }
                    for _ in 0..len {
                        let c = (b'a' + rng.below(26) as u8) as char;
                        marks.push(Mark::new(
                            &c.to_string(),
                            Rect::new(x, y, x + advance, y + 9.0),
                            "Times-Roman",
                            9.0,
                        ));
                        x += advance;
                    }
                    x += 2.5;
                }
                y -= 11.0;
            }
            y -= 9.0 + rng.gen_f64(0.0, 6.0);
        }
    }
    PageInput::new(1, PAGE_BBOX, marks)
}
