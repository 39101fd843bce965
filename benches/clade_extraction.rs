use cladomark::{CladeList, SpeciesSet, parse_reference_tree};
use criterion::{
    BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};
use std::hint::black_box;
use std::path::PathBuf;
use std::sync::Arc;

fn balanced_newick(depth: u32) -> String {
    let mut out = String::new();
    let mut next_tip: usize = 0;
    grow(depth, &mut next_tip, &mut out);
    out.push(';');
    out
}

fn grow(depth: u32, next_tip: &mut usize, out: &mut String) {
    if depth == 0 {
        *next_tip += 1;
        out.push_str("SP");
        out.push_str(&next_tip.to_string());
        return;
    }
    out.push('(');
    grow(depth - 1, next_tip, out);
    out.push(',');
    grow(depth - 1, next_tip, out);
    out.push(')');
}

fn bench_reference_tree_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("reference_tree_parser");
    let _ = group.sample_size(30);

    for depth in [6u32, 8, 10] {
        let newick_string = balanced_newick(depth);
        let _ = group.throughput(Throughput::Bytes(newick_string.len() as u64));
        let _ = group.bench_with_input(
            BenchmarkId::new("parse_reference_tree", 1usize << depth),
            &newick_string,
            |b, newick| {
                b.iter(|| {
                    let _ = black_box(parse_reference_tree(newick));
                });
            },
        );
    }

    group.finish();
}

fn bench_clade_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("clade_extraction");
    let _ = group.sample_size(30);

    for depth in [6u32, 8, 10] {
        let newick_string = balanced_newick(depth);
        let tree = match parse_reference_tree(&newick_string) {
            Ok(tree) => tree,
            Err(error) => panic!("Failed to build the benchmark tree: {}", error),
        };
        let _ = group.bench_with_input(
            BenchmarkId::new("clade_list_from_tree", 1usize << depth),
            &tree,
            |b, tree| {
                b.iter(|| {
                    let _ = black_box(CladeList::from_tree(tree));
                });
            },
        );

        let clades = CladeList::from_tree(&tree);
        let subset: SpeciesSet =
            ["SP1", "SP2", "SP3"].iter().map(|name| Arc::from(*name)).collect();
        let _ = group.bench_with_input(
            BenchmarkId::new("enclosing_clade", 1usize << depth),
            &clades,
            |b, clades| {
                b.iter(|| {
                    let _ = black_box(clades.enclosing_clade(&subset, "BENCH"));
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    name = benches;
    config = {
        let mut criterion = Criterion::default();
        let benchmark_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("benchmark_results");
        criterion = criterion.output_directory(&benchmark_dir);
        criterion = criterion.warm_up_time(std::time::Duration::from_millis(500));
        criterion = criterion.measurement_time(std::time::Duration::from_secs(5));
        criterion
    };
    targets = bench_reference_tree_parser, bench_clade_extraction
);
criterion_main!(benches);
