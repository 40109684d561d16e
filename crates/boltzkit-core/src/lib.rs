//! # boltzkit Core Library
//!
//! Run preparation, invocation and result reporting for the Boltz biomolecular
//! structure predictor.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict layered architecture so that every stage of a
//! prediction job can be tested on its own:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`RunConfig`,
//!   `SequenceSpec`, confidence and affinity records) and file I/O for the
//!   formats the predictor consumes and produces.
//!
//! - **[`engine`]: The Logic Core.** Everything that touches the outside world
//!   on behalf of a job: the explicit `RunContext`, the predictor invocation,
//!   the result locator and progress reporting.
//!
//! - **[`report`]: The Presentation Layer.** Renders HTML reports, SVG charts
//!   and the embedded 3D structure viewer from the artifacts of a run.
//!
//! - **[`workflows`]: The Public API.** Ties the layers together into the two
//!   end-to-end procedures: running a prediction and analysing its results.

pub mod core;
pub mod engine;
pub mod report;
pub mod workflows;
