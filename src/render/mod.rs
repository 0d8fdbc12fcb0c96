//! HTML document tree and markdown rendering

mod markdown;
mod node;

pub use markdown::{render, render_html};
pub use node::{DocumentNode, NodeKind};
