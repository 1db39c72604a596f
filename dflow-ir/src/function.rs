use crate::{BlockMap, Instruction};
use dflow_utils::{DflowResult, Id};

/// A function: a name and a flat instruction stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    pub name: Id,
    pub instrs: Vec<Instruction>,
}

impl Function {
    /// Partition this function into named basic blocks. The result is built
    /// fresh on every call.
    pub fn block_map(&self) -> DflowResult<BlockMap> {
        BlockMap::from_instrs(self.instrs.iter().cloned())
    }
}

/// A whole program. Functions are analyzed independently of each other.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    pub functions: Vec<Function>,
}
