//! # Workflows Module
//!
//! High-level entry points that run a complete prediction job or analyse its
//! results.
//!
//! ## Overview
//!
//! Each workflow receives an explicit [`RunContext`](crate::engine::context::RunContext),
//! reports progress through a [`ProgressReporter`](crate::engine::progress::ProgressReporter)
//! and writes its HTML report into the job directory.
//!
//! ## Architecture
//!
//! - **Prediction Workflow** ([`predict`]) - Input staging, predictor invocation,
//!   structure discovery and the run report with its 3D viewer.
//! - **Analysis Workflow** ([`analyze`]) - Per-chain confidence figures,
//!   statistics export and affinity cards.

pub mod analyze;
pub mod predict;
