pub mod artifact;
pub mod config;
pub mod constants;
pub mod container;
pub mod error;
pub mod generator;
pub mod inventory;
pub mod orchestrator;
pub mod reaper;
pub mod schedule;
pub mod storage;
pub mod target;
pub mod uploader;

#[cfg(test)]
mod test_support;

pub use error::{DumpError, Result};
