//! Minimal MODFLOW-2005 support: name file, DIS and RCH packages

pub mod dis;
pub mod model;
pub mod rch;
pub mod reader;

pub use dis::{Discretization, StressPeriod};
pub use model::{scan_for_model_file, ModflowModel, NameEntry, Package};
pub use rch::RechargePackage;
