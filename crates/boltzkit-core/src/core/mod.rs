//! # Core Module
//!
//! This module provides the data models and file formats shared by every stage
//! of a Boltz prediction job.
//!
//! ## Overview
//!
//! A job starts from two user-authored inputs, the flat run-parameter file and
//! the sequence description, and ends with a tree of predictor artifacts. The
//! core module owns the typed representation of all of them and the parsers and
//! writers that move them between disk and memory. Nothing here spawns
//! processes or renders output.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Run configuration, sequence specifications,
//!   per-chain confidence summaries and affinity estimates
//! - **File I/O** ([`io`]) - `key = value` parameter files, YAML emission, PDB
//!   chain layout, NPZ confidence arrays and the affinity JSON record
//! - **Utilities** ([`utils`]) - Terminal escape stripping and HTML escaping
//!
//! ## Key Capabilities
//!
//! - **Typed parameter parsing** with the same inference rules the parameter
//!   form relies on
//! - **Validated sequence specifications** with globally unique chain IDs
//! - **Deterministic YAML output** with inline ID lists and quoted SMILES
//! - **Artifact readers** for structure, confidence, error and affinity data

pub mod io;
pub mod models;
pub mod utils;
