pub mod config;
pub mod error;
pub mod grid;
pub mod types;

pub use config::{CouplerConfig, HydrusConfig, OverlapPolicy};
pub use error::{CouplerError, Result};
pub use grid::{Grid, Mask};
pub use types::{ProjectId, ShapeId};
