use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gridplan::mdp::{policy_iteration, scenario, value_iteration, GridModel, SolverConfig};

fn open_field(n: usize) -> GridModel {
    let n_i = n as isize;
    GridModel::new(
        n,
        n,
        &[(n_i / 2, n_i / 2)],
        &[(n_i - 1, n_i - 1, 10.0), (0, n_i - 1, -10.0)],
    )
    .unwrap()
}

fn bench_solvers(c: &mut Criterion) {
    let reference = scenario::reference_grid().unwrap();
    let config = SolverConfig::default();

    let mut group = c.benchmark_group("reference_grid");
    group.bench_function("value_iteration", |b| {
        b.iter(|| value_iteration(black_box(&reference), black_box(&config)).unwrap())
    });
    group.bench_function("policy_iteration", |b| {
        b.iter(|| policy_iteration(black_box(&reference), black_box(&config)).unwrap())
    });
    group.finish();

    let mut group = c.benchmark_group("open_field");
    for &n in &[8, 16, 32] {
        let grid = open_field(n);
        group.bench_function(format!("value_iteration_{n}"), |b| {
            b.iter(|| value_iteration(black_box(&grid), black_box(&config)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_solvers);
criterion_main!(benches);
