//! # Engine Module
//!
//! This module drives the external structure predictor and finds what it leaves
//! behind on disk.
//!
//! ## Overview
//!
//! A prediction run is a single blocking child process. The engine prepares its
//! input, assembles the command line from a validated [`RunConfig`], runs it in
//! the job's working directory and classifies the outcome. Once the process has
//! exited, the locator resolves the artifact files that rendering needs.
//!
//! ## Architecture
//!
//! - **Run Context** ([`context`]) - Working directory, session id and predictor program
//! - **Invocation** ([`invoker`]) - Input staging, command construction and process execution
//! - **Artifact Discovery** ([`locator`]) - Canonical paths first, recursive glob second
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting for front ends
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! [`RunConfig`]: crate::core::models::run_config::RunConfig

pub mod context;
pub mod error;
pub mod invoker;
pub mod locator;
pub mod progress;
