//! Groups mapped shapes by the recharge source they receive

use std::collections::{BTreeMap, BTreeSet};

use crate::core::error::{CouplerError, Result};
use crate::core::types::ShapeId;
use crate::project::metadata::{MappingValue, ProjectMetadata, Source};

/// A source together with every shape mapped to it
#[derive(Debug, Clone, PartialEq)]
pub struct SourceGroup {
    pub source: Source,
    pub shape_ids: Vec<ShapeId>,
}

pub fn classify(shape_id: &ShapeId, value: &MappingValue) -> Result<Source> {
    match value {
        MappingValue::Instance(name) => Ok(Source::Simulator(name.clone())),
        MappingValue::Constant(flux) => Ok(Source::constant(*flux)),
        MappingValue::Other(other) => Err(CouplerError::UnknownMapping {
            shape_id: shape_id.clone(),
            value: other.to_string(),
        }),
    }
}

/// Distinct sources referenced by the mapping, each with its shapes
///
/// Simulators come first ordered by name, then constants ordered by
/// value. Shapes within a group are ordered by id. This is the order in
/// which overlapping masks are written.
pub fn resolve_sources(metadata: &ProjectMetadata) -> Result<Vec<SourceGroup>> {
    let mut groups: BTreeMap<Source, Vec<ShapeId>> = BTreeMap::new();
    for (shape_id, value) in &metadata.shapes_to_source {
        let source = classify(shape_id, value)?;
        groups.entry(source).or_default().push(shape_id.clone());
    }

    Ok(groups
        .into_iter()
        .map(|(source, shape_ids)| SourceGroup { source, shape_ids })
        .collect())
}

/// Simulator instances referenced by any shape; constants are ignored
pub fn used_simulator_instances(metadata: &ProjectMetadata) -> BTreeSet<String> {
    metadata
        .shapes_to_source
        .values()
        .filter_map(|value| match value {
            MappingValue::Instance(name) => Some(name.clone()),
            _ => None,
        })
        .collect()
}
