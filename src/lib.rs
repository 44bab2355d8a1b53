//! Recharge Coupler - column simulator output to groundwater recharge

pub mod core;
pub mod coupling;
pub mod hydrus;
pub mod modflow;
pub mod project;
