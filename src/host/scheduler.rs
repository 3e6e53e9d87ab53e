use anyhow::Result;

use crate::config::{ScopeParams, StepPeriod};
use crate::id::BlockId;
use crate::scope::Scope;
use crate::surface::RenderSurface;

use super::Signal;

/// Cooperative, single-threaded driver: setup, then one update per step.
///
/// A block whose descriptor requests an inherited step period runs at the
/// scheduler's own default period.
pub struct Scheduler {
    pub default_period: f64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            default_period: 0.1,
        }
    }

    pub fn with_period(period: f64) -> Self {
        Self {
            default_period: period,
        }
    }

    /// Runs one block for `num_steps` steps.
    pub fn run<S: RenderSurface>(
        &self,
        scope: &mut Scope<S>,
        id: &BlockId,
        display_name: &str,
        params: &ScopeParams,
        signal: &mut dyn Signal,
        num_steps: usize,
    ) -> Result<()> {
        let config = params.resolve()?;
        let period = match config.step_period {
            StepPeriod::Fixed(p) => p,
            StepPeriod::Inherited => self.default_period,
        };

        let port = scope.setup(id, display_name, params)?;
        signal.init()?;

        let mut u = vec![0.0; port.input_width];
        for step in 0..num_steps {
            signal.sample(step, step as f64 * period, &mut u)?;
            scope.update(id, &u)?;
        }
        Ok(())
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
