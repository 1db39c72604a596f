use super::{Analysis, Direction, Named, lattice};
use dflow_ir::{BasicBlock, Id, Opcode, Operation};
use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt;

/// A pure computation over variables. Prints as `(op arg ...)`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Expr {
    pub op: Opcode,
    pub args: Vec<Id>,
}

impl Expr {
    /// The expression computed by `op`, if it computes one. Effects,
    /// control flow and operations without arguments do not.
    pub fn of(op: &Operation) -> Option<Expr> {
        if !op.op.is_pure() || op.args.is_empty() {
            return None;
        }
        Some(Expr {
            op: op.op,
            args: op.args.clone(),
        })
    }

    /// Does this expression read `var`?
    pub fn reads(&self, var: &Id) -> bool {
        self.args.contains(var)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {})", self.op, self.args.iter().join(" "))
    }
}

/// Expressions computed on every path to a point with none of their
/// arguments written since.
#[derive(Default)]
pub struct AvailableExpressions;

impl Named for AvailableExpressions {
    fn name() -> &'static str {
        "available-expressions"
    }

    fn description() -> &'static str {
        "expressions computed on every path and not invalidated since"
    }
}

impl Analysis for AvailableExpressions {
    type Fact = BTreeSet<Expr>;

    fn direction(&self) -> Direction {
        Direction::Forward
    }

    fn init(&self) -> Self::Fact {
        BTreeSet::new()
    }

    fn merge(&self, facts: &[&Self::Fact]) -> Self::Fact {
        if facts.is_empty() {
            return self.init();
        }
        lattice::intersection(facts)
    }

    fn transfer(&self, block: &BasicBlock, input: &Self::Fact) -> Self::Fact {
        let written: BTreeSet<Id> = block.defs().collect();
        input
            .iter()
            .filter(|expr| !written.iter().any(|var| expr.reads(var)))
            .cloned()
            .chain(block.iter().filter_map(Expr::of))
            .collect()
    }
}
