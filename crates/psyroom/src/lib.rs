//! Psychometric test scoring for facilitated training rooms.
//!
//! The [`scoring`] engine turns raw answers into ranked categories, [`attempts`] wraps it in
//! a persistence-backed service and router, and [`interpretation`] renders a scored attempt
//! as a prompt for an external text-generation service.

pub mod attempts;
pub mod catalog;
pub mod config;
pub mod error;
pub mod import;
pub mod interpretation;
pub mod scoring;
pub mod telemetry;
