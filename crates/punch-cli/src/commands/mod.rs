//! CLI subcommand implementations.

pub mod status;
pub mod track;
pub mod util;
