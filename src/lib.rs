//! Water Quality Dashboard - measurement trends and monitoring station map
//!
//! Two independent pipelines, each Loader -> Transformer -> Renderer:
//! measurement CSV -> per-site trend series -> stacked line charts, and
//! station CSV -> unique located stations -> marker map.

pub mod charts;
pub mod config;
pub mod data;
pub mod export;
pub mod gui;
pub mod pipeline;
