use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Point;
use crate::style::{LineStyle, Marker};

/// Invalid descriptor field, reported before any rendering resource is
/// allocated. Carries the parameter name and the violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{parameter}: expected exactly {expected} values, got {actual}")]
    WrongLength {
        parameter: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{parameter}: all values must be finite")]
    NotFinite { parameter: &'static str },
    #[error("{parameter}: must be a non-negative integer")]
    Negative { parameter: &'static str },
    #[error("{parameter}: must be a positive integer")]
    NotPositive { parameter: &'static str },
    #[error("{parameter}: unknown style token {token:?}")]
    UnknownToken {
        parameter: &'static str,
        token: String,
    },
}

/// Step period requested in the descriptor.
///
/// A negative raw value is the "inherit from the host scheduler" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StepPeriod {
    Inherited,
    Fixed(f64),
}

/// Axis bounds of the 3D axes, in axis order (min, max per dimension).
///
/// min < max is deliberately NOT enforced here; the rendering surface is
/// free to interpret degenerate or inverted ranges. Only finiteness is
/// required.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBounds {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub zmin: f64,
    pub zmax: f64,
}

impl AxisBounds {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64, zmin: f64, zmax: f64) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
            zmin,
            zmax,
        }
    }
}

/// Raw block descriptor, as delivered by the parameter dialog.
///
/// Numeric fields arrive as plain numbers (counts may be fractional and are
/// truncated toward zero); style fields arrive as dialog tokens. Resolve
/// into a [`ScopeConfig`] with [`ScopeParams::resolve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeParams {
    /// Axis bounds: exactly [xmin, xmax, ymin, ymax, zmin, zmax].
    pub bounds: Vec<f64>,
    /// Step period in seconds; any negative value means "inherited".
    pub step_period: f64,
    /// Number of tracked objects (N). Truncated toward zero.
    pub num_objects: f64,
    /// Camera position: exactly [x, y, z].
    pub camera: Vec<f64>,
    /// Grid visibility on the 3D axes.
    pub grid: bool,
    /// Line style token ("-", "--", ":", "-."). Empty means solid.
    pub line_style: String,
    /// Marker token ("o", "x", "+", "*", "s", "d"). Empty means no marker.
    pub marker_style: String,
    /// Per-trace buffer capacity (M). Truncated toward zero.
    pub capacity: f64,
    /// Draw a head marker at each object's current position.
    pub head_markers: bool,
    /// Window toolbar visibility.
    pub toolbar: bool,
}

impl ScopeParams {
    pub fn new() -> Self {
        Self {
            bounds: vec![-10.0, 10.0, -10.0, 10.0, -10.0, 10.0],
            step_period: -1.0,
            num_objects: 1.0,
            camera: vec![10.0, 10.0, 10.0],
            grid: true,
            line_style: "-".to_string(),
            marker_style: String::new(),
            capacity: 100.0,
            head_markers: true,
            toolbar: false,
        }
    }

    /// Validates and normalizes the descriptor.
    ///
    /// Fails with [`ConfigError`] naming the offending parameter; no side
    /// effects on failure.
    pub fn resolve(&self) -> Result<ScopeConfig, ConfigError> {
        let bounds = resolve_bounds(&self.bounds)?;
        let step_period = resolve_period(self.step_period)?;
        let num_objects = resolve_count("num_objects", self.num_objects)?;
        let camera = resolve_camera(&self.camera)?;
        let capacity = resolve_capacity("capacity", self.capacity)?;

        let line_style = if self.line_style.is_empty() {
            LineStyle::Solid
        } else {
            LineStyle::from_token(&self.line_style).ok_or_else(|| ConfigError::UnknownToken {
                parameter: "line_style",
                token: self.line_style.clone(),
            })?
        };

        let marker_style = if self.marker_style.is_empty() {
            None
        } else {
            let marker =
                Marker::from_token(&self.marker_style).ok_or_else(|| ConfigError::UnknownToken {
                    parameter: "marker_style",
                    token: self.marker_style.clone(),
                })?;
            Some(marker)
        };

        Ok(ScopeConfig {
            bounds,
            step_period,
            num_objects,
            camera,
            grid: self.grid,
            line_style,
            marker_style,
            capacity,
            head_markers: self.head_markers,
            toolbar: self.toolbar,
        })
    }
}

impl Default for ScopeParams {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_bounds(raw: &[f64]) -> Result<AxisBounds, ConfigError> {
    if raw.len() != 6 {
        return Err(ConfigError::WrongLength {
            parameter: "bounds",
            expected: 6,
            actual: raw.len(),
        });
    }
    if raw.iter().any(|v| !v.is_finite()) {
        return Err(ConfigError::NotFinite { parameter: "bounds" });
    }
    Ok(AxisBounds::new(raw[0], raw[1], raw[2], raw[3], raw[4], raw[5]))
}

fn resolve_period(raw: f64) -> Result<StepPeriod, ConfigError> {
    if raw.is_nan() {
        return Err(ConfigError::NotFinite {
            parameter: "step_period",
        });
    }
    if raw < 0.0 {
        return Ok(StepPeriod::Inherited);
    }
    if !raw.is_finite() {
        return Err(ConfigError::NotFinite {
            parameter: "step_period",
        });
    }
    Ok(StepPeriod::Fixed(raw))
}

fn resolve_count(parameter: &'static str, raw: f64) -> Result<usize, ConfigError> {
    if !raw.is_finite() {
        return Err(ConfigError::NotFinite { parameter });
    }
    let truncated = raw.trunc();
    if truncated < 0.0 {
        return Err(ConfigError::Negative { parameter });
    }
    Ok(truncated as usize)
}

fn resolve_capacity(parameter: &'static str, raw: f64) -> Result<usize, ConfigError> {
    if !raw.is_finite() {
        return Err(ConfigError::NotFinite { parameter });
    }
    let truncated = raw.trunc();
    if truncated < 1.0 {
        return Err(ConfigError::NotPositive { parameter });
    }
    Ok(truncated as usize)
}

fn resolve_camera(raw: &[f64]) -> Result<Point, ConfigError> {
    if raw.len() != 3 {
        return Err(ConfigError::WrongLength {
            parameter: "camera",
            expected: 3,
            actual: raw.len(),
        });
    }
    if raw.iter().any(|v| !v.is_finite()) {
        return Err(ConfigError::NotFinite { parameter: "camera" });
    }
    Ok(Point::new(raw[0], raw[1], raw[2]))
}

/// Validated configuration snapshot, immutable for the life of a Scene.
///
/// Changing any field requires tearing the Scene down and re-running setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeConfig {
    pub bounds: AxisBounds,
    pub step_period: StepPeriod,
    pub num_objects: usize,
    pub camera: Point,
    pub grid: bool,
    pub line_style: LineStyle,
    pub marker_style: Option<Marker>,
    pub capacity: usize,
    pub head_markers: bool,
    pub toolbar: bool,
}

impl ScopeConfig {
    /// Width of the single input port: one (x, y, z) triple per object.
    pub fn input_width(&self) -> usize {
        3 * self.num_objects
    }
}
