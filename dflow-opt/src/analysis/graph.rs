use dflow_ir::{Cfg, Id};
use itertools::Itertools;
use petgraph::{
    algo,
    dot::{Config, Dot},
    graph::{DiGraph, NodeIndex},
};
use std::collections::HashMap;

type Node = Id;
type Edge = ();

/// A petgraph::DiGraph where blocks are the nodes and edges carry no
/// information.
pub type BlockGraph = DiGraph<Node, Edge>;

/// Graph representation of a [Cfg] for queries that petgraph answers
/// directly: cycle detection, strongly connected components and DOT output.
///
/// Every block is a node, and so is every branch target that does not name
/// a block.
#[derive(Clone, Default, Debug)]
pub struct GraphAnalysis {
    nodes: HashMap<Id, NodeIndex>,
    graph: BlockGraph,
}

impl From<&Cfg> for GraphAnalysis {
    fn from(cfg: &Cfg) -> Self {
        let mut analysis = GraphAnalysis::default();
        for node in cfg.succs().nodes() {
            analysis.node(node);
        }
        for (src, dst) in cfg.edges() {
            let (s, d) = (analysis.node(src), analysis.node(dst));
            analysis.graph.add_edge(s, d, ());
        }
        analysis
    }
}

impl GraphAnalysis {
    fn node(&mut self, name: Id) -> NodeIndex {
        *self
            .nodes
            .entry(name)
            .or_insert_with(|| self.graph.add_node(name))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Does the graph contain a cycle? Unlike back edges, this does not
    /// depend on where the traversal starts.
    pub fn has_cycles(&self) -> bool {
        algo::is_cyclic_directed(&self.graph)
    }

    /// Groups of blocks that can reach each other: strongly connected
    /// components with more than one node, or a single node with an edge to
    /// itself. Members of each group are sorted by name and the groups are
    /// sorted by their first member.
    pub fn loops(&self) -> Vec<Vec<Id>> {
        algo::kosaraju_scc(&self.graph)
            .into_iter()
            .filter(|scc| match scc.as_slice() {
                [single] => self.graph.contains_edge(*single, *single),
                _ => true,
            })
            .map(|scc| {
                scc.into_iter()
                    .map(|idx| self.graph[idx])
                    .sorted()
                    .collect::<Vec<_>>()
            })
            .sorted()
            .collect()
    }

    /// Render the graph in Graphviz syntax.
    pub fn to_dot(&self) -> String {
        format!("{:?}", Dot::with_config(&self.graph, &[Config::EdgeNoLabel]))
    }
}

#[cfg(test)]
mod tests {
    use super::GraphAnalysis;
    use dflow_ir::{BlockMap, Cfg, Id, Instruction, Operation};

    fn analysis(instrs: Vec<Instruction>) -> GraphAnalysis {
        let blocks = BlockMap::from_instrs(instrs).unwrap();
        GraphAnalysis::from(&Cfg::from(&blocks))
    }

    fn looping() -> GraphAnalysis {
        analysis(vec![
            Instruction::label("head"),
            Operation::branch("c", "body", "exit").into(),
            Instruction::label("body"),
            Operation::jump("head").into(),
            Instruction::label("exit"),
            Operation::ret().into(),
        ])
    }

    #[test]
    fn detects_loops() {
        let g = looping();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 3);
        assert!(g.has_cycles());
        let body: Id = "body".into();
        let head: Id = "head".into();
        assert_eq!(g.loops(), vec![vec![body, head]]);
    }

    #[test]
    fn straight_line_code_has_no_loops() {
        let g = analysis(vec![
            Operation::jump("next").into(),
            Instruction::label("next"),
            Operation::ret().into(),
        ]);
        assert!(!g.has_cycles());
        assert!(g.loops().is_empty());
    }

    #[test]
    fn dangling_targets_become_nodes() {
        let g = analysis(vec![Operation::jump("nowhere").into()]);
        assert_eq!(g.node_count(), 2);
        assert!(g.to_dot().contains("nowhere"));
    }

    #[test]
    fn dot_output_lists_edges() {
        let dot = looping().to_dot();
        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("->"));
    }
}
