//! Size bounded, column oriented batch building.
//!
//! See [`batch_builder::BatchBuilder`] for the entry point.
pub mod arrays;
pub mod batch_builder;
pub mod config;
pub mod size_tracker;
