//! Provides readers and writers for the files that surround a prediction job.
//!
//! This module covers the flat run-parameter file, the predictor's YAML input,
//! and the artifacts the predictor leaves behind: the PDB structure, the
//! compressed NumPy confidence arrays and the affinity JSON record.

pub mod affinity;
pub mod npz;
pub mod params;
pub mod pdb;
pub mod yaml;
