//! Orchestration engine for a fixed pipeline of external data-collection scripts.
//!
//! Steps run strictly in sequence. Each attempt archives the previous outputs, runs the script
//! under a timeout and validates the JSON files it declares. Critical steps get a bounded
//! retry. The final outcome of every step is folded into a [`summary::RunSummary`], which
//! [`report::ReportWriter`] persists.

pub mod api;
pub mod archive;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod pipeline;
pub mod preflight;
pub mod report;
pub mod retry;
pub mod runner;
pub mod step;
pub mod summary;
pub mod verify;
