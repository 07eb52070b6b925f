//! Utility modules shared by the compiler and the watcher.

pub mod exec;
pub mod path;
