//! Turns a recharge source into the values the writer averages
//!
//! Column simulators report bottom outflow as a running total that falls
//! as water leaves the column. Recharge is the negated daily change of
//! that total, with the spin-up days dropped from the front.

use crate::core::error::{CouplerError, Result};
use crate::core::types::ProjectId;
use crate::hydrus::read_tlevel;
use crate::project::metadata::Source;
use crate::project::ProjectStore;

#[derive(Debug, Clone, PartialEq)]
pub enum SourceSeries {
    /// Same value for every stress period
    Constant(f64),
    /// One flux value per simulated day after spin-up
    Daily(Vec<f64>),
}

/// `flux[i] = -(c[i+1] - c[i])`, one element shorter than the input
pub fn cumulative_to_flux(cumulative: &[f64]) -> Vec<f64> {
    cumulative.windows(2).map(|w| -(w[1] - w[0])).collect()
}

/// Drop the first `spin_up` days of a differenced series
pub fn trim_spin_up(flux: Vec<f64>, spin_up: usize, model: &str) -> Result<Vec<f64>> {
    if spin_up >= flux.len() {
        return Err(CouplerError::InsufficientSpinUpData {
            model: model.to_string(),
            spin_up,
            available: flux.len(),
        });
    }
    Ok(flux[spin_up..].to_vec())
}

/// Build the averaging series from a cumulative outflow column
pub fn daily_series(cumulative: &[f64], spin_up: usize, model: &str) -> Result<Vec<f64>> {
    trim_spin_up(cumulative_to_flux(cumulative), spin_up, model)
}

pub fn build_source_series<S: ProjectStore>(
    store: &S,
    project: &ProjectId,
    source: &Source,
    spin_up: usize,
    flux_column: &str,
) -> Result<SourceSeries> {
    match source {
        Source::Constant(value) => Ok(SourceSeries::Constant(value.0)),
        Source::Simulator(name) => {
            let path = store.simulator_output_path(project, name);
            let cumulative = read_tlevel(&path)?.column(flux_column)?;
            let series = daily_series(&cumulative, spin_up, name)?;
            tracing::debug!(
                "Series for {}: {} raw values, {} days after spin-up of {}",
                name,
                cumulative.len(),
                series.len(),
                spin_up
            );
            Ok(SourceSeries::Daily(series))
        }
    }
}
