use super::{Analysis, Direction, Named};
use dflow_ir::{BasicBlock, Id, Literal, Opcode};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;

/// Value of a variable as far as constant propagation can tell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConstValue {
    /// Every path agrees on this literal.
    Known(Literal),
    /// Paths disagree, or the value is computed at run time.
    Unknown,
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Known(lit) => write!(f, "{lit}"),
            ConstValue::Unknown => write!(f, "?"),
        }
    }
}

/// Map from the variables defined on some path to their value.
pub type ConstMap = BTreeMap<Id, ConstValue>;

/// Forward constant propagation. A variable that is absent from some
/// incoming map does not conflict with the others.
#[derive(Default)]
pub struct ConstantPropagation;

impl Named for ConstantPropagation {
    fn name() -> &'static str {
        "constant-propagation"
    }

    fn description() -> &'static str {
        "variables that hold the same literal on every path"
    }
}

impl Analysis for ConstantPropagation {
    type Fact = ConstMap;

    fn direction(&self) -> Direction {
        Direction::Forward
    }

    fn init(&self) -> Self::Fact {
        ConstMap::new()
    }

    fn merge(&self, facts: &[&Self::Fact]) -> Self::Fact {
        let mut out = ConstMap::new();
        for (var, val) in facts.iter().flat_map(|f| f.iter()) {
            match out.entry(*var) {
                Entry::Vacant(slot) => {
                    slot.insert(*val);
                }
                Entry::Occupied(mut slot) => {
                    if slot.get() != val {
                        slot.insert(ConstValue::Unknown);
                    }
                }
            }
        }
        out
    }

    fn transfer(&self, block: &BasicBlock, input: &Self::Fact) -> Self::Fact {
        let mut out = input.clone();
        for op in block {
            let Some(dest) = op.dest else {
                continue;
            };
            let val = match (op.op, op.value) {
                (Opcode::Const, Some(lit)) => ConstValue::Known(lit),
                _ => ConstValue::Unknown,
            };
            out.insert(dest, val);
        }
        out
    }
}
