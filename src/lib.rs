pub mod analytical;
pub mod bgd;
pub mod dataset;
pub mod error;
pub mod plots;
