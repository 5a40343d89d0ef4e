//! CLI command implementations.

pub mod common;
pub mod end;
pub mod run;
pub mod serialize;
pub mod version;
