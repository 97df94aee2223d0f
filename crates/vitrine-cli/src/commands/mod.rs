//! One-shot CLI commands.

pub mod query;
pub mod status;
