//! Integration tests for medprune
//!
//! These tests run the prune and stats pipelines end to end over real XML
//! corpora written to temporary directories.

pub mod cli;
pub mod config_override;
pub mod helpers;
pub mod prune_apply;
pub mod stats;
