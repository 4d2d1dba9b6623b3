//! sdfplot core
//!
//! Logging and profiling setup shared by every crate in the workspace.

pub mod logging;
pub mod profiling;
