//! Gridsketch Core - Domain models, configuration, and errors
//!
//! This crate contains the domain types shared by the gridsketch workbench
//! crates: sketch geometry, AOI statistics, segmentation parameters, the
//! workflow state vocabulary, and the layered configuration.

pub mod config;
pub mod error;
pub mod models;

pub use error::{GridsketchError, Result};
