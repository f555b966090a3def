/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - Batch planning and token-guarded result tracking (batch.rs)

pub mod batch;
pub mod data;
