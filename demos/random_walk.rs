//! A handful of random walkers with short trailing traces.
//!
//! Run with: cargo run --example random_walk

use anyhow::Result;
use rand::Rng;

use scope3d::host::{Scheduler, Signal};
use scope3d::surface::rerun::RerunSurface;
use scope3d::{BlockId, Scope, ScopeParams};

const NUM_WALKERS: usize = 5;
const STEP_SIZE: f64 = 0.05;

struct RandomWalk {
    positions: Vec<[f64; 3]>,
}

impl RandomWalk {
    fn new() -> Self {
        Self {
            positions: vec![[0.0; 3]; NUM_WALKERS],
        }
    }
}

impl Signal for RandomWalk {
    fn name(&self) -> &'static str {
        "random_walk"
    }

    fn sample(&mut self, _step: usize, _t: f64, out: &mut [f64]) -> Result<()> {
        let mut rng = rand::rng();
        for (pos, triple) in self.positions.iter_mut().zip(out.chunks_exact_mut(3)) {
            for (axis, value) in pos.iter_mut().zip(triple.iter_mut()) {
                *axis = (*axis + rng.random_range(-STEP_SIZE..STEP_SIZE)).clamp(-2.0, 2.0);
                *value = *axis;
            }
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut params = ScopeParams::new();
    params.bounds = vec![-2.0, 2.0, -2.0, 2.0, -2.0, 2.0];
    params.num_objects = NUM_WALKERS as f64;
    params.capacity = 50.0;
    params.step_period = 0.01;

    let mut scope = Scope::new(RerunSurface::new());
    let id = BlockId::new();

    Scheduler::new().run(
        &mut scope,
        &id,
        "random walk",
        &params,
        &mut RandomWalk::new(),
        5000,
    )?;

    scope.delete(&id);
    Ok(())
}
