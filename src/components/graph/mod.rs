//! Claim-graph data model, aggregation and interactive canvas.

pub mod aggregate;
mod component;
pub mod highlight;
mod render;
mod state;
mod types;

pub use aggregate::build_graph;
pub use component::GraphCanvas;
pub use highlight::Highlighter;
pub use types::{ClaimRecord, ClusterId, GraphEdge, GraphNode, TopicEntry, TopicMap};
