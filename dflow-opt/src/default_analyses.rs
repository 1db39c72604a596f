//! Defines the default analyses available to [AnalysisManager].
use crate::analysis_manager::AnalysisManager;
use crate::dataflow::{
    AvailableExpressions, ConstantPropagation, DefinedVariables, LiveVariables,
    Named, ReachingDefinitions,
};
use dflow_utils::DflowResult;

impl AnalysisManager {
    pub fn default_analyses() -> DflowResult<Self> {
        // Construct the analysis manager and register all analyses.
        let mut am = AnalysisManager::default();

        am.register_analysis::<DefinedVariables>()?;
        am.register_analysis::<LiveVariables>()?;
        am.register_analysis::<ConstantPropagation>()?;
        am.register_analysis::<ReachingDefinitions>()?;
        am.register_analysis::<AvailableExpressions>()?;

        // Short names accepted on the command line.
        am.add_alias("defined", DefinedVariables::name())?;
        am.add_alias("live", LiveVariables::name())?;
        am.add_alias("cprop", ConstantPropagation::name())?;
        am.add_alias("rd", ReachingDefinitions::name())?;
        am.add_alias("ae", AvailableExpressions::name())?;

        Ok(am)
    }
}

#[cfg(test)]
mod tests {
    use crate::analysis_manager::AnalysisManager;
    use dflow_ir::{BlockMap, Instruction, Literal, Opcode, Operation};
    use proptest::prelude::*;

    const NAMES: [&str; 10] = [
        "defined",
        "live",
        "cprop",
        "rd",
        "ae",
        "defined-variables",
        "live-variables",
        "constant-propagation",
        "reaching-definitions",
        "available-expressions",
    ];

    #[test]
    fn all_names_and_aliases_are_registered() {
        let am = AnalysisManager::default_analyses().unwrap();
        for name in NAMES {
            assert!(am.lookup(name).is_ok(), "{name} is not registered");
        }
    }

    #[test]
    fn every_block_gets_both_facts() {
        let am = AnalysisManager::default_analyses().unwrap();
        let blocks = BlockMap::from_instrs(vec![
            Operation::constant("n", Literal::Int(3)).into(),
            Instruction::label("loop"),
            Operation::compute(Opcode::Sub, "n", ["n", "n"]).into(),
            Operation::branch("n", "loop", "exit").into(),
            Instruction::label("exit"),
            Operation::print(["n"]).into(),
        ])
        .unwrap();
        for name in NAMES {
            let report = am.run(name, &blocks).unwrap();
            let names: Vec<_> =
                report.rows().iter().map(|row| row.block.to_string()).collect();
            assert_eq!(names, vec!["b0", "loop", "exit"], "{name}");
        }
    }

    /// Operations a generated function is built from. Variables and labels
    /// come from small pools so that writes, reads and jumps collide.
    fn instruction() -> impl Strategy<Value = Instruction> {
        let var = prop::sample::select(vec!["a", "b", "c", "d"]);
        let label = prop::sample::select(vec!["l0", "l1", "l2"]);
        let op = prop::sample::select(vec![Opcode::Add, Opcode::Mul, Opcode::Lt]);
        prop_oneof![
            (var.clone(), any::<i8>()).prop_map(|(dest, v)| {
                Instruction::from(Operation::constant(dest, Literal::Int(v.into())))
            }),
            (op, var.clone(), var.clone(), var.clone()).prop_map(
                |(op, dest, x, y)| {
                    Instruction::from(Operation::compute(op, dest, [x, y]))
                }
            ),
            var.clone()
                .prop_map(|x| Instruction::from(Operation::print([x]))),
            label
                .clone()
                .prop_map(|l| Instruction::from(Operation::jump(l))),
            (var, label.clone(), label).prop_map(|(c, t, e)| {
                Instruction::from(Operation::branch(c, t, e))
            }),
            Just(Instruction::from(Operation::ret())),
        ]
    }

    /// A function with the three labels placed at fixed points so that
    /// every branch target exists.
    fn function() -> impl Strategy<Value = BlockMap> {
        prop::collection::vec(prop::collection::vec(instruction(), 0..6), 4)
            .prop_map(|chunks| {
                let mut instrs = Vec::new();
                for (idx, chunk) in chunks.into_iter().enumerate() {
                    if idx > 0 {
                        instrs.push(Instruction::label(format!("l{}", idx - 1)));
                    }
                    instrs.extend(chunk);
                }
                instrs
            })
            .prop_filter_map("block names collide", |instrs| {
                BlockMap::from_instrs(instrs).ok()
            })
    }

    proptest! {
        #[test]
        fn analyses_are_deterministic(blocks in function()) {
            let am = AnalysisManager::default_analyses().unwrap();
            for name in &NAMES[..5] {
                let first = am.run(name, &blocks).unwrap();
                let second = am.run(name, &blocks).unwrap();
                prop_assert_eq!(first, second);
            }
        }

        #[test]
        fn worklist_terminates_within_bound(blocks in function()) {
            use crate::dataflow::*;
            // Every fact is drawn from a finite set, so each block's output
            // can change only a bounded number of times.
            let bound = 64 * blocks.len() * blocks.len() + blocks.len();
            prop_assert!(solve(&blocks, &DefinedVariables).steps() <= bound);
            prop_assert!(solve(&blocks, &LiveVariables).steps() <= bound);
            prop_assert!(
                solve(&blocks, &ConstantPropagation).steps() <= bound
            );
            let rd = ReachingDefinitions::new(&blocks);
            prop_assert!(solve(&blocks, &rd).steps() <= bound);
            prop_assert!(
                solve(&blocks, &AvailableExpressions).steps() <= bound
            );
        }
    }
}
