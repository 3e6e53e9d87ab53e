use anyhow::Result;

/// A source of per-step input vectors.
///
/// `sample` fills `out` (one x, y, z triple per tracked object) for the
/// given step index and simulation time.
pub trait Signal {
    /// Human-readable identifier for debugging / telemetry.
    fn name(&self) -> &'static str;

    /// Optional one-time initialization hook.
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Produces the input vector for one step.
    fn sample(&mut self, step: usize, t: f64, out: &mut [f64]) -> Result<()>;
}
