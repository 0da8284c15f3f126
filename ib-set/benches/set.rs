use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use ib_set::{Anchor, RegexSet};

const PATTERNS: &[&str] = &[
    r"[a-z]+@[a-z]+\.(com|org|net)",
    r"[a-z]+\.(com|org|net)",
    r"\d{4}-\d{2}-\d{2}",
    r"https?://[^\s]+",
    r"foo(bar)?",
    r"\w+",
];

fn build<E: ib_set::engine::Engine>(anchor: Anchor, engine: E) -> RegexSet<E> {
    let mut set = RegexSet::with_engine(anchor, engine);
    for pattern in PATTERNS {
        set.add(pattern).unwrap();
    }
    set.compile().unwrap();
    set
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let hay = "contact foo@example.com or visit https://example.org since 2010-03-14";

    for (name, anchor) in [
        ("unanchored", Anchor::Unanchored),
        ("start", Anchor::Start),
        ("both", Anchor::Both),
    ] {
        let set = build(anchor, ib_set::engine::Meta::new());
        assert_eq!(set.is_match(hay).unwrap(), anchor != Anchor::Both);
        c.bench_function(&format!("meta_{name}_is_match"), |b| {
            b.iter(|| set.is_match(black_box(hay)))
        });
        c.bench_function(&format!("meta_{name}_matches"), |b| {
            b.iter(|| set.matches(black_box(hay)))
        });
    }

    {
        let set = build(Anchor::Unanchored, ib_set::engine::Dfa::new());
        assert!(set.is_match(hay).unwrap());
        c.bench_function("dfa_unanchored_matches", |b| {
            b.iter(|| set.matches(black_box(hay)))
        });
    }

    c.bench_function("meta_compile", |b| {
        b.iter(|| build(Anchor::Both, ib_set::engine::Meta::new()))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
