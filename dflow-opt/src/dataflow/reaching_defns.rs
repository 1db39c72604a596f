use super::{Analysis, ConstructAnalysis, Direction, Named, lattice};
use dflow_ir::{BasicBlock, BlockMap, Id};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// Identifier of one definition site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DefId(u32);

impl fmt::Display for DefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out definition ids. Each run of the analysis owns one, so ids are
/// unique within a run and numbering restarts for every function.
#[derive(Debug, Default)]
pub struct DefIdGenerator {
    next: u32,
}

impl DefIdGenerator {
    pub fn fresh(&mut self) -> DefId {
        let id = DefId(self.next);
        self.next += 1;
        id
    }
}

/// A write to `var` at the site `site`. Prints as `var@site`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Definition {
    pub var: Id,
    pub site: DefId,
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.var, self.site)
    }
}

/// Forward reaching definitions.
///
/// Definition sites are numbered once, in program order, when the analysis
/// is constructed for a function. A block generates the last definition of
/// each variable it writes and kills every other definition of those
/// variables.
pub struct ReachingDefinitions {
    /// Definitions that leave each block, keyed by block name.
    generated: HashMap<Id, BTreeSet<Definition>>,
}

impl ReachingDefinitions {
    pub fn new(blocks: &BlockMap) -> Self {
        let mut ids = DefIdGenerator::default();
        let generated = blocks
            .iter()
            .map(|block| {
                // Later writes replace earlier ones, but every write gets
                // its own id.
                let mut last: BTreeMap<Id, DefId> = BTreeMap::new();
                for dest in block.defs() {
                    last.insert(dest, ids.fresh());
                }
                let defs = last
                    .into_iter()
                    .map(|(var, site)| Definition { var, site })
                    .collect();
                (block.name, defs)
            })
            .collect();
        ReachingDefinitions { generated }
    }
}

impl ConstructAnalysis for ReachingDefinitions {
    fn from_blocks(blocks: &BlockMap) -> Self {
        Self::new(blocks)
    }
}

impl Named for ReachingDefinitions {
    fn name() -> &'static str {
        "reaching-definitions"
    }

    fn description() -> &'static str {
        "definition sites whose value may reach each block boundary"
    }
}

impl Analysis for ReachingDefinitions {
    type Fact = BTreeSet<Definition>;

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
        let killed: BTreeSet<Id> = block.defs().collect();
        let survivors = input.iter().filter(|def| !killed.contains(&def.var));
        match self.generated.get(&block.name) {
            Some(generated) => survivors.chain(generated).copied().collect(),
            None => {
                log::warn!(
                    "Block `{}' was not numbered; its definitions are dropped",
                    block.name
                );
                survivors.copied().collect()
            }
        }
    }
}
