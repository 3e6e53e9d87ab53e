pub mod config;
pub mod directory;
pub mod geom;
pub mod host;
pub mod id;
pub mod scene;
pub mod scope;
pub mod style;
pub mod surface;
pub mod trace;

// Prelude
pub use config::{AxisBounds, ConfigError, ScopeConfig, ScopeParams, StepPeriod};
pub use directory::{Resolve, SceneDirectory};
pub use geom::Point;
pub use id::BlockId;
pub use scene::Scene;
pub use scope::{ContractViolation, PortSpec, Scope};
pub use surface::RenderSurface;
