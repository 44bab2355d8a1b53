//! Project-level recharge propagation
//!
//! Everything is computed in memory first. The recharge package is
//! rewritten once, after every source and shape succeeded, so a failure
//! leaves the file on disk as it was.

use crate::core::config::{CouplerConfig, OverlapPolicy};
use crate::core::error::{CouplerError, Result};
use crate::core::grid::{Grid, Mask};
use crate::core::types::{ProjectId, ShapeId};
use crate::coupling::resolver::resolve_sources;
use crate::coupling::series::build_source_series;
use crate::coupling::writer::{apply_to_recharge, period_values};
use crate::modflow::{scan_for_model_file, ModflowModel, Package};
use crate::project::{ProjectMetadata, ProjectStore};

#[derive(Debug, Clone, PartialEq)]
pub struct PropagateOptions {
    pub flux_column: String,
    pub overlap: OverlapPolicy,
}

impl Default for PropagateOptions {
    fn default() -> Self {
        Self::from(&CouplerConfig::default())
    }
}

impl From<&CouplerConfig> for PropagateOptions {
    fn from(config: &CouplerConfig) -> Self {
        Self {
            flux_column: config.hydrus.flux_column.clone(),
            overlap: config.overlap,
        }
    }
}

/// Load the project's flow model with only what propagation needs
pub fn load_project_model<S: ProjectStore>(
    store: &S,
    project: &ProjectId,
    metadata: &ProjectMetadata,
) -> Result<ModflowModel> {
    let model_dir = store.model_path(project, &metadata.modflow_metadata.modflow_id);
    let nam = scan_for_model_file(&model_dir)?;
    ModflowModel::load(&nam, &[Package::Rch])
}

/// Compute the updated recharge grids without touching any file
pub fn compute_recharge<S: ProjectStore>(
    store: &S,
    project: &ProjectId,
    metadata: &ProjectMetadata,
    model: &ModflowModel,
    options: &PropagateOptions,
) -> Result<Vec<Grid<f64>>> {
    let periods = model.stress_periods();
    let (rows, cols) = model.grid_dims();
    let mut recharge = model.recharge()?.rech.clone();

    if recharge.len() != periods.len() {
        return Err(CouplerError::PeriodCountMismatch {
            periods: periods.len(),
            arrays: recharge.len(),
        });
    }

    let groups = resolve_sources(metadata)?;
    if groups.is_empty() {
        tracing::info!("Project {} maps no shapes, recharge unchanged", project);
        return Ok(recharge);
    }

    // (shape, source index, mask) of everything written so far
    let mut written: Vec<(ShapeId, usize, Mask)> = Vec::new();

    for (group_idx, group) in groups.iter().enumerate() {
        let source_name = group.source.to_string();
        tracing::info!(
            "Applying {} to {} shape(s) over {} stress periods",
            source_name,
            group.shape_ids.len(),
            periods.len()
        );

        let series = build_source_series(
            store,
            project,
            &group.source,
            metadata.spin_up,
            &options.flux_column,
        )?;
        let values = period_values(&series, periods, &source_name)?;

        for shape_id in &group.shape_ids {
            let shape = store.shape(project, shape_id)?;
            if shape.dims() != (rows, cols) {
                return Err(CouplerError::ShapeDimensionMismatch {
                    shape_id: shape_id.clone(),
                    rows,
                    cols,
                    found_rows: shape.rows(),
                    found_cols: shape.cols(),
                });
            }
            let mask = Mask::from_shape(&shape);

            for (other_id, other_group, other_mask) in &written {
                if *other_group != group_idx && mask.overlaps(other_mask) {
                    match options.overlap {
                        OverlapPolicy::Reject => {
                            return Err(CouplerError::OverlappingMasks {
                                first: other_id.clone(),
                                second: shape_id.clone(),
                            });
                        }
                        OverlapPolicy::LastWriteWins => tracing::warn!(
                            "Shape {} overwrites cells of shape {} ({} wins)",
                            shape_id,
                            other_id,
                            source_name
                        ),
                    }
                }
            }

            apply_to_recharge(&mut recharge, &mask, &values)?;
            tracing::debug!("Shape {}: {} cells updated", shape_id, mask.count());
            written.push((shape_id.clone(), group_idx, mask));
        }
    }

    Ok(recharge)
}

/// Propagate recharge for `project` and rewrite its recharge package
pub fn propagate_recharge<S: ProjectStore>(
    store: &S,
    project: &ProjectId,
    options: &PropagateOptions,
) -> Result<()> {
    let metadata = store.read_metadata(project)?;
    if metadata.shapes_to_source.is_empty() {
        tracing::info!("Project {} maps no shapes, nothing to write", project);
        return Ok(());
    }

    let mut model = load_project_model(store, project, &metadata)?;
    let recharge = compute_recharge(store, project, &metadata, &model, options)?;
    model.write_recharge(recharge)
}
