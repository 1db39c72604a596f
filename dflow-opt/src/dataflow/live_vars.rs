use super::{Analysis, Direction, Named, lattice};
use dflow_ir::{BasicBlock, Id};
use std::collections::BTreeSet;

/// Variables whose current value may be read later on some path.
#[derive(Default)]
pub struct LiveVariables;

impl LiveVariables {
    /// Variables read in `block` before any write to them in `block`, and
    /// all the variables written in `block`.
    fn uses_and_defs(block: &BasicBlock) -> (BTreeSet<Id>, BTreeSet<Id>) {
        let mut uses = BTreeSet::new();
        let mut defs = BTreeSet::new();
        for op in block {
            uses.extend(op.args.iter().filter(|arg| !defs.contains(*arg)));
            if let Some(dest) = op.dest {
                defs.insert(dest);
            }
        }
        (uses, defs)
    }
}

impl Named for LiveVariables {
    fn name() -> &'static str {
        "live-variables"
    }

    fn description() -> &'static str {
        "variables that may be read before their next write"
    }
}

impl Analysis for LiveVariables {
    type Fact = BTreeSet<Id>;

    fn direction(&self) -> Direction {
        Direction::Backward
    }

    fn init(&self) -> Self::Fact {
        BTreeSet::new()
    }

    fn merge(&self, facts: &[&Self::Fact]) -> Self::Fact {
        lattice::union(facts)
    }

    fn transfer(&self, block: &BasicBlock, input: &Self::Fact) -> Self::Fact {
        let (uses, defs) = Self::uses_and_defs(block);
        uses.into_iter()
            .chain(input.difference(&defs).copied())
            .collect()
    }
}
