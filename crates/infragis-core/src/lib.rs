//! InfraGIS Core - Domain models, configuration, and format readers
//!
//! This crate contains the canonical GeoJSON and tabular models shared by the
//! coordinate normalizer, the schema mapper, and the CLI.

pub mod config;
pub mod error;
pub mod formats;
pub mod models;

pub use error::{InfragisError, Result};
