//! Project metadata and persisted shapes

pub mod metadata;
mod store;

pub use metadata::{MappingValue, ModflowMetadata, ProjectMetadata, Source};
pub use store::{FsProjectStore, ProjectStore};
