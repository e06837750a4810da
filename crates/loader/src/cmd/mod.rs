//! Command implementations for the memc-load CLI

pub mod check;
pub mod load;
