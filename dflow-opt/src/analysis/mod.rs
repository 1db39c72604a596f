//! Structural analyses of a control-flow graph.
mod cfg_order;
mod graph;

pub use cfg_order::{
    BackEdge, back_edges, is_reducible, path_lengths, reverse_postorder,
};
pub use graph::GraphAnalysis;
