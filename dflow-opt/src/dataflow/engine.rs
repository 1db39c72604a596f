use dflow_ir::{BasicBlock, BlockMap, Cfg, Id};
use linked_hash_map::LinkedHashMap;
use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;

/// Which way facts flow along the edges of the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Facts flow from a block to its successors. The boundary is the first
    /// block.
    Forward,
    /// Facts flow from a block to its predecessors. The boundary is the last
    /// block.
    Backward,
}

/// A dataflow problem: a lattice of facts, a way to combine the facts of
/// several neighbours and a per-block transfer function.
///
/// For the solver to terminate, `transfer` must be monotone with respect to
/// the ordering induced by `merge`, and the lattice must have finite height
/// over the names that appear in a function.
pub trait Analysis {
    type Fact: Clone + PartialEq + Debug;

    fn direction(&self) -> Direction;

    /// The fact assumed at the boundary block and the initial output of
    /// every block.
    fn init(&self) -> Self::Fact;

    /// Combine the output facts of the neighbours that flow into a block.
    /// `facts` is empty for blocks with no such neighbours.
    fn merge(&self, facts: &[&Self::Fact]) -> Self::Fact;

    /// Compute the fact at the far side of `block` from the fact at its
    /// near side.
    fn transfer(&self, block: &BasicBlock, input: &Self::Fact) -> Self::Fact;
}

/// Fixpoint of an analysis over one function.
///
/// `entry` holds the fact at the start of each block and `exit` the fact at
/// its end, regardless of the direction of the analysis. Both are in block
/// order.
#[derive(Clone, Debug, PartialEq)]
pub struct DataflowResult<F> {
    entry: LinkedHashMap<Id, F>,
    exit: LinkedHashMap<Id, F>,
    steps: usize,
}

impl<F> DataflowResult<F> {
    pub fn entry(&self, block: &Id) -> Option<&F> {
        self.entry.get(block)
    }

    pub fn exit(&self, block: &Id) -> Option<&F> {
        self.exit.get(block)
    }

    /// `(block, entry fact, exit fact)` in block order.
    pub fn iter(&self) -> impl Iterator<Item = (Id, &F, &F)> {
        self.entry.iter().filter_map(|(name, entry)| {
            Some((*name, entry, self.exit.get(name)?))
        })
    }

    pub fn len(&self) -> usize {
        self.entry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_empty()
    }

    /// Number of blocks the solver processed before reaching the fixpoint.
    pub fn steps(&self) -> usize {
        self.steps
    }
}

/// Solve `analysis` over `blocks`.
pub fn solve<A: Analysis>(
    blocks: &BlockMap,
    analysis: &A,
) -> DataflowResult<A::Fact> {
    let cfg = Cfg::from(blocks);
    solve_with_cfg(blocks, &cfg, analysis)
}

/// Solve `analysis` over `blocks` with a precomputed graph.
///
/// The worklist starts with every block in block order. Each time a block's
/// output changes, the blocks its output flows into are appended. Names that
/// appear in the graph but not in `blocks` are skipped.
pub fn solve_with_cfg<A: Analysis>(
    blocks: &BlockMap,
    cfg: &Cfg,
    analysis: &A,
) -> DataflowResult<A::Fact> {
    let direction = analysis.direction();
    // Backward problems run over the reversed graph.
    let (boundary, in_edges, out_edges) = match direction {
        Direction::Forward => (blocks.first(), cfg.preds(), cfg.succs()),
        Direction::Backward => (blocks.last(), cfg.succs(), cfg.preds()),
    };

    let mut in_facts: HashMap<Id, A::Fact> = HashMap::new();
    if let Some(block) = boundary {
        in_facts.insert(block.name, analysis.init());
    }
    let mut out_facts: HashMap<Id, A::Fact> =
        blocks.names().map(|name| (name, analysis.init())).collect();

    let mut worklist: VecDeque<Id> = blocks.names().collect();
    let mut steps = 0;
    while let Some(name) = worklist.pop_front() {
        let Some(block) = blocks.get(&name) else {
            continue;
        };
        steps += 1;

        let incoming: Vec<&A::Fact> = in_edges
            .targets(&name)
            .iter()
            .filter_map(|pred| out_facts.get(pred))
            .collect();
        let input = analysis.merge(&incoming);
        let output = analysis.transfer(block, &input);
        in_facts.insert(name, input);

        if out_facts.get(&name) != Some(&output) {
            log::debug!("{name}: {output:?}");
            out_facts.insert(name, output);
            worklist.extend(out_edges.targets(&name).iter().copied());
        }
    }
    log::info!("Fixpoint after {steps} steps over {} blocks", blocks.len());

    let in_order = |mut facts: HashMap<Id, A::Fact>| {
        blocks
            .names()
            .filter_map(|name| Some((name, facts.remove(&name)?)))
            .collect::<LinkedHashMap<_, _>>()
    };
    let (entry, exit) = match direction {
        Direction::Forward => (in_order(in_facts), in_order(out_facts)),
        Direction::Backward => (in_order(out_facts), in_order(in_facts)),
    };
    DataflowResult { entry, exit, steps }
}

#[cfg(test)]
mod tests {
    use super::{Analysis, Direction, solve};
    use dflow_ir::{BasicBlock, BlockMap, Instruction, Operation};

    /// Counts the blocks on the longest path seen so far, saturating at a
    /// bound so that loops converge.
    struct Depth;

    impl Analysis for Depth {
        type Fact = u32;

        fn direction(&self) -> Direction {
            Direction::Forward
        }

        fn init(&self) -> u32 {
            0
        }

        fn merge(&self, facts: &[&u32]) -> u32 {
            facts.iter().map(|f| **f).max().unwrap_or(0)
        }

        fn transfer(&self, _: &BasicBlock, input: &u32) -> u32 {
            (input + 1).min(5)
        }
    }

    struct BackwardDepth;

    impl Analysis for BackwardDepth {
        type Fact = u32;

        fn direction(&self) -> Direction {
            Direction::Backward
        }

        fn init(&self) -> u32 {
            0
        }

        fn merge(&self, facts: &[&u32]) -> u32 {
            facts.iter().map(|f| **f).max().unwrap_or(0)
        }

        fn transfer(&self, _: &BasicBlock, input: &u32) -> u32 {
            input + 1
        }
    }

    fn chain() -> BlockMap {
        BlockMap::from_instrs(vec![
            Instruction::label("a"),
            Operation::jump("b").into(),
            Instruction::label("b"),
            Operation::jump("c").into(),
            Instruction::label("c"),
            Operation::ret().into(),
        ])
        .unwrap()
    }

    #[test]
    fn forward_facts_flow_to_successors() {
        let res = solve(&chain(), &Depth);
        assert_eq!(res.entry(&"a".into()), Some(&0));
        assert_eq!(res.exit(&"a".into()), Some(&1));
        assert_eq!(res.entry(&"c".into()), Some(&2));
        assert_eq!(res.exit(&"c".into()), Some(&3));
    }

    #[test]
    fn backward_facts_flow_to_predecessors() {
        let res = solve(&chain(), &BackwardDepth);
        assert_eq!(res.exit(&"c".into()), Some(&0));
        assert_eq!(res.entry(&"c".into()), Some(&1));
        assert_eq!(res.entry(&"a".into()), Some(&3));
        assert_eq!(res.exit(&"a".into()), Some(&2));
    }

    #[test]
    fn results_are_in_block_order() {
        let res = solve(&chain(), &BackwardDepth);
        let names: Vec<String> =
            res.iter().map(|(name, _, _)| name.to_string()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn loops_reach_a_fixpoint() {
        let blocks = BlockMap::from_instrs(vec![
            Instruction::label("head"),
            Operation::branch("c", "body", "exit").into(),
            Instruction::label("body"),
            Operation::jump("head").into(),
            Instruction::label("exit"),
            Operation::ret().into(),
        ])
        .unwrap();
        let res = solve(&blocks, &Depth);
        assert_eq!(res.exit(&"head".into()), Some(&5));
        assert_eq!(res.exit(&"exit".into()), Some(&5));
        assert!(res.steps() >= blocks.len());
    }

    #[test]
    fn empty_function_has_no_facts() {
        let res = solve(&BlockMap::default(), &Depth);
        assert!(res.is_empty());
        assert_eq!(res.steps(), 0);
    }

    #[test]
    fn dangling_targets_are_skipped() {
        let blocks =
            BlockMap::from_instrs(vec![Operation::jump("nowhere").into()])
                .unwrap();
        let res = solve(&blocks, &Depth);
        assert_eq!(res.len(), 1);
        assert!(res.entry(&"nowhere".into()).is_none());
        assert_eq!(res.steps(), 1);
    }
}
