//! Gridsketch Client - HTTP adapter for the AOI processing service
//!
//! This crate holds the `AoiService` port and the reqwest-backed adapter
//! that talks to the remote geometry-processing service.

pub mod http;
pub mod ports;

pub use http::HttpAoiService;
pub use ports::AoiService;
