//! Feed Event Module
//!
//! Collects tokenizer callbacks into owned events for the NIF layer.
//!
//! ## Architecture
//!
//! ```text
//! FeedTokenizer ---> EventCollector ---> FeedEvent[]
//!                          |
//!                          v
//!                    Elixir Terms (via NIF)
//! ```
//!
//! ## Event Types
//!
//! - `Text` - Trimmed character data
//! - `Instruction` - PI name and attributes
//! - `OpenTag` - Element opening tag with name and attributes
//! - `CloseTag` - Element closing tag with name and attributes
//! - `CData` - CDATA section content
//!
//! Comments produce no events.

pub mod collector;
pub mod events;

pub use collector::{tokenize, EventCollector};
pub use events::FeedEvent;
