//! State module for tracking traversal progress
//!
//! # Components
//!
//! - `Checkpoint`: the persisted cursor (alphabet letter, keyword ordinal, page number)
//! - `CrawlState`: the orchestrator's position in the alphabet → keyword → page walk

mod checkpoint;
mod crawl_state;

// Re-export main types
pub use checkpoint::{next_letter, previous_letter, Checkpoint};
pub use crawl_state::CrawlState;
