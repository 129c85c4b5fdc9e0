//! Elimination tournament for dilemma agents.
//!
//! This crate provides infrastructure for:
//! - Running batches of independent round-robin runs concurrently
//! - Merging per-run records into cross-run aggregates
//! - The generation loop that evicts the weakest agent until one survives
//! - Reports for rankings and per-generation score tables
//!
//! # Usage
//!
//! ```bash
//! # Run a tournament described by a TOML config
//! cargo run -p tournament -- run tournament.toml --out report.json
//!
//! # Quick demo over the built-in policy library
//! cargo run -p tournament -- demo --runs 20 --rounds 50
//! ```

mod batch;
mod config;
mod elimination;
mod error;
mod results;

pub use batch::*;
pub use config::*;
pub use elimination::*;
pub use error::*;
pub use results::*;
