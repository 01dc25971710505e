//! State module for tracking run progress
//!
//! # Components
//!
//! - `RunState`: Lifecycle of one pipeline run (idle, running, draining, done)

mod run_state;

// Re-export main types
pub use run_state::RunState;
