//! CLI command implementations

pub mod export;
pub mod play;
pub mod train;
