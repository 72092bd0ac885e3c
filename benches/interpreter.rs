use criterion::{criterion_group, criterion_main, Criterion};
use rill::Rill;

fn fibonacci() {
    let src = r#"
        fun fib(n) {
            if (n < 2) return n;
            return fib(n - 2) + fib(n - 1);
        }

        fib(20);
    "#;

    let mut rill = Rill::new();
    rill.run(src);
}

fn counters() {
    let src = r#"
        fun makeCounter() {
            var count = 0;
            fun increment() {
                count = count + 1;
                return count;
            }
            return increment;
        }

        var tick = makeCounter();
        while (tick() < 10000) {}
    "#;

    let mut rill = Rill::new();
    rill.run(src);
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpreter");
    group.sample_size(20);
    group.bench_function("fib 20", |b| b.iter(fibonacci));
    group.bench_function("counters", |b| b.iter(counters));
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
