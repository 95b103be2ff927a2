//! Power Dashboard - energy indicator CSV to chart dashboard
//!
//! Loads a per-country indicator table and renders a line, donut, grouped bar
//! and stacked area chart, composed into one annotated dashboard image.

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
