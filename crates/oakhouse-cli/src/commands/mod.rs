//! CLI command implementations for oakhouse.
//!
//! Each module corresponds to a subcommand (`oakhouse <command>`).

pub mod build;
pub mod generate;
pub mod integrate;
pub mod new;
pub mod serve;
