use super::{Analysis, Direction, Named, lattice};
use dflow_ir::{BasicBlock, Id};
use std::collections::BTreeSet;

/// Variables that have been written on at least one path reaching each
/// point.
#[derive(Default)]
pub struct DefinedVariables;

impl Named for DefinedVariables {
    fn name() -> &'static str {
        "defined-variables"
    }

    fn description() -> &'static str {
        "variables written on some path to each block boundary"
    }
}

impl Analysis for DefinedVariables {
    type Fact = BTreeSet<Id>;

    fn direction(&self) -> Direction {
        Direction::Forward
    }

    fn init(&self) -> Self::Fact {
        BTreeSet::new()
    }

    fn merge(&self, facts: &[&Self::Fact]) -> Self::Fact {
        lattice::union(facts)
    }

    fn transfer(&self, block: &BasicBlock, input: &Self::Fact) -> Self::Fact {
        input.iter().copied().chain(block.defs()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::DefinedVariables;
    use crate::dataflow::{PrettyFact, solve};
    use dflow_ir::{BlockMap, Instruction, Literal, Operation};

    #[test]
    fn definitions_accumulate_along_paths() {
        let blocks = BlockMap::from_instrs(vec![
            Operation::constant("c", Literal::Bool(true)).into(),
            Operation::branch("c", "left", "right").into(),
            Instruction::label("left"),
            Operation::constant("x", Literal::Int(1)).into(),
            Operation::jump("join").into(),
            Instruction::label("right"),
            Operation::constant("y", Literal::Int(2)).into(),
            Instruction::label("join"),
            Operation::print(["c"]).into(),
        ])
        .unwrap();
        let res = solve(&blocks, &DefinedVariables);
        assert_eq!(res.entry(&"b0".into()).unwrap().pretty(), "∅");
        assert_eq!(res.exit(&"b0".into()).unwrap().pretty(), "c");
        assert_eq!(res.entry(&"join".into()).unwrap().pretty(), "c, x, y");
        assert_eq!(res.exit(&"join".into()).unwrap().pretty(), "c, x, y");
    }
}
