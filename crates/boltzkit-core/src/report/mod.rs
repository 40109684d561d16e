//! # Report Module
//!
//! Renders prediction results as self-contained HTML documents.
//!
//! ## Overview
//!
//! Every section is rendered independently into an HTML fragment, so a section
//! whose inputs are missing can be left out without affecting the others. The
//! fragments are then wrapped in a shared page shell.
//!
//! ## Architecture
//!
//! - **Page Shell** ([`page`]) - Document skeleton, shared styles and footer
//! - **Job Report** ([`job`]) - Predictor log and the interactive 3Dmol.js structure viewer
//! - **Confidence Section** ([`confidence`]) - Per-chain statistics cards and CSV export
//! - **Affinity Section** ([`affinity`]) - Binding probability and affinity cards
//! - **Figures** ([`figures`]) - SVG pLDDT line charts and PAE heatmaps drawn with plotters
//! - **Analysis Report** ([`analysis`]) - Assembly of the confidence and affinity sections

pub mod affinity;
pub mod analysis;
pub mod confidence;
pub mod figures;
pub mod job;
pub mod page;
