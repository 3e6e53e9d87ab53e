//! Three objects on Lissajous orbits, streamed to the Rerun viewer.
//!
//! Run with: cargo run --example orbit

use anyhow::Result;

use scope3d::host::{Scheduler, Signal};
use scope3d::surface::rerun::RerunSurface;
use scope3d::{BlockId, Scope, ScopeParams};

struct Lissajous;

impl Signal for Lissajous {
    fn name(&self) -> &'static str {
        "lissajous"
    }

    fn sample(&mut self, _step: usize, t: f64, out: &mut [f64]) -> Result<()> {
        for (i, triple) in out.chunks_exact_mut(3).enumerate() {
            let phase = i as f64 * 2.0;
            triple[0] = (1.0 + i as f64 * 0.5) * (t + phase).sin();
            triple[1] = (1.0 + i as f64 * 0.5) * (1.3 * t + phase).cos();
            triple[2] = ((0.7 * t + phase).sin() + 1.0) * 2.0;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut params = ScopeParams::new();
    params.bounds = vec![-3.0, 3.0, -3.0, 3.0, 0.0, 5.0];
    params.num_objects = 3.0;
    params.capacity = 200.0;
    params.step_period = 0.02;
    params.marker_style = "o".to_string();

    let mut scope = Scope::new(RerunSurface::new());
    let id = BlockId::new();

    Scheduler::new().run(&mut scope, &id, "lissajous", &params, &mut Lissajous, 2000)?;

    scope.delete(&id);
    Ok(())
}
