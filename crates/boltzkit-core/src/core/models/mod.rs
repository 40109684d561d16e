//! # Core Models Module
//!
//! This module contains the data structures that describe a prediction job and
//! its results, independent of how they are read from or written to disk.
//!
//! ## Key Components
//!
//! - [`run_config`] - Validated predictor settings built from a parameter file
//! - [`sequence`] - Protein and ligand entries destined for the predictor's YAML input
//! - [`artifacts`] - The conventional layout of a job's output directory tree
//! - [`confidence`] - Per-chain pLDDT and PAE data with summary statistics
//! - [`affinity`] - Binding affinity estimates and their derived quantities
//!
//! ## Usage
//!
//! ```ignore
//! use boltzkit::core::io::params::ParamsFile;
//! use boltzkit::core::models::run_config::RunConfig;
//!
//! let params = ParamsFile::read_from_path("run_params.txt")?;
//! let config = RunConfig::from_params(&params)?;
//! ```

pub mod affinity;
pub mod artifacts;
pub mod confidence;
pub mod run_config;
pub mod sequence;
