use std::{env, path::PathBuf};

use criterion::{criterion_group, criterion_main, Criterion};
use lrzero::{grammar::Grammar, lr0::lr0, syntax::ParseOptions, table::ParseTable};

criterion_main!(benches);
criterion_group!(benches, bench_lr0, bench_conflicts);

fn bench_lr0(c: &mut Criterion) {
    bench_table_gen(c, "simple");
    bench_table_gen(c, "textbook");
    bench_table_gen(c, "parens");
}

fn bench_conflicts(c: &mut Criterion) {
    bench_table_gen(c, "expr");
    bench_table_gen(c, "epsilon");
}

fn bench_table_gen(c: &mut Criterion, grammar_name: &str) {
    let project_root = env::var_os("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .expect("missing environment variable: `CARGO_MANIFEST_DIR'");
    let grammar = Grammar::from_file(
        project_root.join(format!("tests/grammars/{}.txt", grammar_name)),
        ParseOptions::default(),
    )
    .unwrap();

    let mut group = c.benchmark_group(grammar_name);
    group.bench_function("LR0", |b| {
        b.iter(|| lr0(&grammar));
    });
    group.bench_function("Table", |b| {
        b.iter(|| ParseTable::generate(&grammar, &lr0(&grammar)));
    });
    group.finish();
}
