use criterion::{black_box, criterion_group, criterion_main, Criterion};
use retrace_core::Regex;

fn bench_literal_scan(c: &mut Criterion) {
    let pattern = Regex::new("needle").unwrap();
    let input = "hay hay hay hay needle hay hay";

    c.bench_function("literal_scan", |b| {
        b.iter(|| black_box(pattern.search(black_box(input))))
    });
}

fn bench_greedy_star(c: &mut Criterion) {
    let pattern = Regex::new("(a|b)*c").unwrap();
    let input = "abababababababababababc";

    c.bench_function("greedy_star", |b| {
        b.iter(|| black_box(pattern.match_(black_box(input))))
    });
}

fn bench_backreference(c: &mut Criterion) {
    let pattern = Regex::new(r"(ab+) \1").unwrap();
    let input = "abbb abbb abb ab";

    c.bench_function("backref_match", |b| {
        b.iter(|| black_box(pattern.search(black_box(input))))
    });
}

fn bench_char_class(c: &mut Criterion) {
    let pattern = Regex::new("[a-z]+").unwrap();
    let input = "let x = forty two; call(site) + y";

    c.bench_function("char_class_findall", |b| {
        b.iter(|| black_box(pattern.findall(black_box(input))))
    });
}

fn bench_finditer_sweep(c: &mut Criterion) {
    let pattern = Regex::new("a*").unwrap();
    let input = "bcdaaaabcdaaaabcdaaaabcdaaaa";

    c.bench_function("finditer_sweep", |b| {
        b.iter(|| black_box(pattern.finditer(black_box(input)).count()))
    });
}

criterion_group!(
    benches,
    bench_literal_scan,
    bench_greedy_star,
    bench_backreference,
    bench_char_class,
    bench_finditer_sweep,
);

criterion_main!(benches);
