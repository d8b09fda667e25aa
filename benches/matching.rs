//! Benchmarks for the match cycle
//!
//! Measures compiling once and then:
//! 1. A single match plus result materialization
//! 2. Iterating every match in a subject (including empty matches)
//!
//! Run with: cargo bench --bench matching

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pcre2_context::binding::options::PCRE2_UTF;
use pcre2_context::{RegexContext, RegexOptions};

// ============================================================================
// Test Data
// ============================================================================

mod data {
    pub fn log_line() -> &'static [u8] {
        b"2024-11-05 12:30:01 INFO request id=42 path=/api/v1/users status=200"
    }

    pub fn words(count: usize) -> Vec<u8> {
        "lorem ipsum dolor sit amet ".repeat(count).into_bytes()
    }

    pub fn unicode(count: usize) -> Vec<u8> {
        "naïve café résumé ".repeat(count).into_bytes()
    }
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_single_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_match");

    let mut ctx = RegexContext::new();
    assert!(ctx.compile(br"(?<date>\d{4}-\d{2}-\d{2}) (?<time>[\d:]+) (\w+)"));

    group.bench_function("named_groups", |b| {
        b.iter(|| {
            let subject = black_box(data::log_line());
            ctx.match_at(subject, 0);
            ctx.fetch_match_results();
            ctx.get_next_offset(subject);
            let count = ctx.matched_group_count();
            ctx.free_for_next_match();
            count
        })
    });

    group.finish();
}

fn bench_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("iteration");

    for size in [10usize, 100, 1000] {
        let subject = data::words(size);
        group.throughput(Throughput::Bytes(subject.len() as u64));

        let mut ctx = RegexContext::new();
        assert!(ctx.compile(br"\w+"));
        group.bench_with_input(BenchmarkId::new("words", size), &subject, |b, subject| {
            b.iter(|| ctx.find_iter(black_box(subject)).count())
        });

        let mut ctx = RegexContext::new();
        assert!(ctx.compile(b"x*"));
        group.bench_with_input(BenchmarkId::new("empty", size), &subject, |b, subject| {
            b.iter(|| ctx.find_iter(black_box(subject)).count())
        });
    }

    let subject = data::unicode(100);
    let mut ctx =
        RegexContext::with_options(RegexOptions::new().with_regex_options(PCRE2_UTF));
    assert!(ctx.compile(b""));
    group.bench_function("empty_utf8", |b| {
        b.iter(|| ctx.find_iter(black_box(&subject)).count())
    });

    group.finish();
}

criterion_group!(benches, bench_single_match, bench_iteration);
criterion_main!(benches);
