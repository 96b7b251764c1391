//! HashSwitch library.
//!
//! Exposes the poll-and-toggle core for the binary, integration tests and
//! fuzz targets.  Network and serial adapters are compiled only with the
//! `runtime` feature; everything else builds without them.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod backoff;
pub mod config;
pub mod error;
pub mod shutdown;
