//! Shared identifier types for the contract manager workspace.

pub mod address;

pub use address::*;
