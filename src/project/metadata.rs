//! Project metadata as persisted in `metadata.json`

use std::collections::BTreeMap;
use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::types::{ProjectId, ShapeId};

/// Root structure of a project's metadata file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectMetadata {
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    /// Leading simulated days to discard from every column series
    #[serde(default)]
    pub spin_up: usize,
    pub modflow_metadata: ModflowMetadata,
    /// Shape id -> recharge source, exactly as the frontend wrote it
    #[serde(rename = "shapes_to_hydrus", alias = "shapes_to_source", default)]
    pub shapes_to_source: BTreeMap<ShapeId, MappingValue>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModflowMetadata {
    pub modflow_id: String,
}

/// Raw mapping value before classification
///
/// Anything that is not a string or a number lands in `Other` so the
/// resolver can report it instead of failing the whole document parse.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MappingValue {
    Instance(String),
    Constant(f64),
    Other(serde_json::Value),
}

/// A classified recharge source
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Source {
    /// Column simulator instance, named by its directory
    Simulator(String),
    /// Fixed recharge rate applied to every stress period
    Constant(OrderedFloat<f64>),
}

impl Source {
    pub fn constant(value: f64) -> Self {
        Source::Constant(OrderedFloat(value))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Simulator(name) => f.write_str(name),
            Source::Constant(value) => write!(f, "constant {}", value.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metadata() {
        let json = r#"{
            "project_id": "demo",
            "spin_up": 30,
            "modflow_metadata": { "modflow_id": "regional" },
            "shapes_to_hydrus": {
                "north": "loam_column",
                "south": 0.0025,
                "lake": 2,
                "broken": [1, 2]
            }
        }"#;

        let metadata: ProjectMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.spin_up, 30);
        assert_eq!(metadata.modflow_metadata.modflow_id, "regional");
        assert_eq!(
            metadata.shapes_to_source[&ShapeId::new("north")],
            MappingValue::Instance("loam_column".into())
        );
        assert_eq!(
            metadata.shapes_to_source[&ShapeId::new("south")],
            MappingValue::Constant(0.0025)
        );
        assert_eq!(
            metadata.shapes_to_source[&ShapeId::new("lake")],
            MappingValue::Constant(2.0)
        );
        assert!(matches!(
            metadata.shapes_to_source[&ShapeId::new("broken")],
            MappingValue::Other(_)
        ));
    }

    #[test]
    fn test_missing_optional_fields() {
        let json = r#"{ "modflow_metadata": { "modflow_id": "m" } }"#;
        let metadata: ProjectMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.spin_up, 0);
        assert!(metadata.shapes_to_source.is_empty());
        assert!(metadata.project_id.is_none());
    }

    #[test]
    fn test_source_ordering_puts_simulators_first() {
        let mut sources = vec![
            Source::constant(1.0),
            Source::Simulator("b".into()),
            Source::constant(-2.0),
            Source::Simulator("a".into()),
        ];
        sources.sort();
        assert_eq!(
            sources,
            vec![
                Source::Simulator("a".into()),
                Source::Simulator("b".into()),
                Source::constant(-2.0),
                Source::constant(1.0),
            ]
        );
    }
}
