//! Access to persisted project data
//!
//! `ProjectStore` is the seam between the coupling core and however a
//! project is laid out. `FsProjectStore` reads the on-disk workspace:
//!
//! ```text
//! <workspace>/<project>/metadata.json
//! <workspace>/<project>/shapes/<shape>.json
//! <workspace>/<project>/modflow/<modflow_id>/
//! <workspace>/<project>/hydrus/<instance>/T_Level.out
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::error::{CouplerError, Result};
use crate::core::grid::{Grid, MASK_INCLUDED};
use crate::core::types::{ProjectId, ShapeId};
use crate::project::metadata::ProjectMetadata;

pub trait ProjectStore {
    fn read_metadata(&self, project: &ProjectId) -> Result<ProjectMetadata>;

    fn project_path(&self, project: &ProjectId) -> PathBuf;

    /// Directory holding the flow model's files
    fn model_path(&self, project: &ProjectId, model_id: &str) -> PathBuf;

    fn shape(&self, project: &ProjectId, shape_id: &ShapeId) -> Result<Grid<f64>>;

    /// Water-balance output file of a column simulator instance
    fn simulator_output_path(&self, project: &ProjectId, instance: &str) -> PathBuf;
}

#[derive(Debug, Clone)]
pub struct FsProjectStore {
    workspace: PathBuf,
    output_file: String,
}

impl FsProjectStore {
    pub fn new(workspace: impl Into<PathBuf>, output_file: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            output_file: output_file.into(),
        }
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }
}

impl ProjectStore for FsProjectStore {
    fn read_metadata(&self, project: &ProjectId) -> Result<ProjectMetadata> {
        let path = self.project_path(project).join("metadata.json");
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn project_path(&self, project: &ProjectId) -> PathBuf {
        self.workspace.join(project.as_str())
    }

    fn model_path(&self, project: &ProjectId, model_id: &str) -> PathBuf {
        self.project_path(project).join("modflow").join(model_id)
    }

    fn shape(&self, project: &ProjectId, shape_id: &ShapeId) -> Result<Grid<f64>> {
        let path = self
            .project_path(project)
            .join("shapes")
            .join(format!("{}.json", shape_id));
        let content = std::fs::read_to_string(&path)?;
        parse_shape(&content, path)
    }

    fn simulator_output_path(&self, project: &ProjectId, instance: &str) -> PathBuf {
        self.project_path(project)
            .join("hydrus")
            .join(instance)
            .join(&self.output_file)
    }
}

/// One raster cell of a stored shape; boolean rasters are accepted too
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum ShapeCell {
    Number(f64),
    Flag(bool),
}

impl From<ShapeCell> for f64 {
    fn from(cell: ShapeCell) -> Self {
        match cell {
            ShapeCell::Number(value) => value,
            ShapeCell::Flag(true) => MASK_INCLUDED,
            ShapeCell::Flag(false) => 0.0,
        }
    }
}

fn parse_shape(content: &str, path: PathBuf) -> Result<Grid<f64>> {
    let cells: Vec<Vec<ShapeCell>> = serde_json::from_str(content)?;
    let rows: Vec<Vec<f64>> = cells
        .into_iter()
        .map(|row| row.into_iter().map(f64::from).collect())
        .collect();
    Grid::from_rows(rows).map_err(|e| CouplerError::Parse {
        file: path,
        line: e.row + 1,
        message: e.to_string(),
    })
}
