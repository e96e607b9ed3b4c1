use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mdp_dp::dynamic::{
    AsynchronousValueIterationAgent, GridCell, GridWorld, PrioritizedSweepingValueIterationAgent,
    TabularMdp, ValueIterationAgent, ValueIterationConfig,
};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

/// Open `size` x `size` room with a single +1 exit in the far corner.
fn open_room(size: usize) -> GridWorld {
    let mut rows = vec![vec![GridCell::Empty; size]; size];
    rows[0][size - 1] = GridCell::Exit(1.0);
    rows[size - 1][0] = GridCell::Start;
    GridWorld::new(rows).unwrap().with_living_reward(-0.01)
}

fn random_mdp(num_states: usize, num_actions: usize) -> TabularMdp<usize, usize> {
    let mut rng = StdRng::seed_from_u64(12345);
    let mut builder = TabularMdp::builder().terminal(0);

    for s in 1..num_states {
        for a in 0..num_actions {
            let branching = rng.gen_range(1..=3);
            for next in sample(&mut rng, num_states, branching) {
                let reward = rng.gen_range(-1.0..1.0);
                builder = builder.transition(s, a, next, 1.0 / branching as f64, reward);
            }
        }
    }

    builder.build().unwrap()
}

fn bench_gridworld(c: &mut Criterion) {
    let mut group = c.benchmark_group("value_iteration/gridworld");

    for size in [8, 16, 32] {
        let grid = open_room(size);
        let config = ValueIterationConfig::new().with_iterations(100);
        let sweeping_config = ValueIterationConfig::new()
            .with_iterations(100 * size * size)
            .with_theta(1e-5);

        group.bench_with_input(BenchmarkId::new("synchronous", size), &grid, |b, grid| {
            b.iter(|| black_box(ValueIterationAgent::new(grid, config).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("cyclic", size), &grid, |b, grid| {
            let cyclic_config = config.with_iterations(100 * size * size);
            b.iter(|| {
                let agent = AsynchronousValueIterationAgent::new(grid, cyclic_config);
                black_box(agent.unwrap())
            })
        });
        group.bench_with_input(BenchmarkId::new("prioritized", size), &grid, |b, grid| {
            b.iter(|| {
                let agent = PrioritizedSweepingValueIterationAgent::new(grid, sweeping_config);
                black_box(agent.unwrap())
            })
        });
    }

    group.finish();
}

fn bench_random_mdp(c: &mut Criterion) {
    let mdp = random_mdp(500, 4);
    let mut group = c.benchmark_group("value_iteration/random_mdp");

    group.bench_function("synchronous_100", |b| {
        let config = ValueIterationConfig::new().with_iterations(100);
        b.iter(|| black_box(ValueIterationAgent::new(&mdp, config).unwrap()))
    });

    group.bench_function("prioritized_theta_1e-5", |b| {
        let config = ValueIterationConfig::new()
            .with_iterations(1_000_000)
            .with_theta(1e-5);
        b.iter(|| black_box(PrioritizedSweepingValueIterationAgent::new(&mdp, config).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_gridworld, bench_random_mdp);
criterion_main!(benches);
