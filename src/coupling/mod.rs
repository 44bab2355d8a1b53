//! Column-to-groundwater recharge coupling
//!
//! Sources are resolved from the project mapping, each source becomes a
//! daily flux series or a constant, and the series is averaged per stress
//! period into the masked cells of the recharge grids.

pub mod propagate;
pub mod resolver;
pub mod series;
pub mod writer;

pub use propagate::{compute_recharge, load_project_model, propagate_recharge, PropagateOptions};
pub use resolver::{resolve_sources, used_simulator_instances, SourceGroup};
pub use series::{build_source_series, cumulative_to_flux, daily_series, trim_spin_up, SourceSeries};
pub use writer::{apply_to_recharge, period_value, period_values, write_source_to_periods};
