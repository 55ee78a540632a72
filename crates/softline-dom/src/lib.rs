//! # Softline DOM
//!
//! A live, externally mutated document and the operations Softline performs
//! on it:
//!
//! - [`Dom`] / [`Document`] - node arena with generational handles and a
//!   mutation observer queue
//! - [`SpliceEngine`] - swaps a text node for a revertible wrapper element
//! - [`hover`] - delegated pointer handling that toggles original/rewritten text
//! - [`render`] - escaped HTML serialization
//!
//! Handles ([`NodeId`]) are weak: a handle to a freed node never aliases a
//! newer node, and every operation re-validates it.

mod document;
mod error;
pub mod hover;
mod mutation;
mod node;
pub mod render;
pub mod splice;

pub use document::{Document, Dom};
pub use error::DomError;
pub use hover::{HoverOutcome, PointerEventKind};
pub use mutation::{MutationKind, MutationOrigin, MutationRecord};
pub use node::{NodeId, NodeKind};
pub use render::{escape_html, render_html};
pub use splice::{SkipReason, SpliceEngine, SpliceMeta, SpliceOutcome};
