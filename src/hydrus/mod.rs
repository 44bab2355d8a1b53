//! HYDRUS-1D column simulator output

pub mod tlevel;

pub use tlevel::{parse_tlevel, read_tlevel, TLevel};
