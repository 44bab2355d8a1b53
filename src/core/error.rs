use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::ShapeId;

#[derive(Error, Debug)]
pub enum CouplerError {
    /// A shape maps to something that is neither an instance name nor a number
    #[error("Unknown mapping in simulation: shape {shape_id} maps to {value}")]
    UnknownMapping { shape_id: ShapeId, value: String },

    #[error("Spin up is longer than hydrus model time for model: {model} (spin up {spin_up}, {available} days available)")]
    InsufficientSpinUpData {
        model: String,
        spin_up: usize,
        available: usize,
    },

    /// `period` is the 0-based stress period index
    #[error("Stress period {} exceeds simulation time in hydrus model: {model}", .period + 1)]
    StressPeriodOverrun { period: usize, model: String },

    #[error("Shape {shape_id} is {found_rows}x{found_cols}, recharge grid is {rows}x{cols}")]
    ShapeDimensionMismatch {
        shape_id: ShapeId,
        rows: usize,
        cols: usize,
        found_rows: usize,
        found_cols: usize,
    },

    #[error("Mask is {found_rows}x{found_cols}, recharge grid is {rows}x{cols}")]
    MaskDimensionMismatch {
        rows: usize,
        cols: usize,
        found_rows: usize,
        found_cols: usize,
    },

    #[error("Model defines {periods} stress periods but recharge package has {arrays} arrays")]
    PeriodCountMismatch { periods: usize, arrays: usize },

    #[error("Shapes {first} and {second} overlap but map to different sources")]
    OverlappingMasks { first: ShapeId, second: ShapeId },

    #[error("Column '{column}' not found in {path}")]
    MissingSeries { path: PathBuf, column: String },

    #[error("No model name file found in {0}")]
    ModelFileNotFound(PathBuf),

    #[error("Package {package} not listed in name file {nam}")]
    MissingPackage { package: String, nam: PathBuf },

    #[error("Parse error in {file}:{line}: {message}")]
    Parse {
        file: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, CouplerError>;
