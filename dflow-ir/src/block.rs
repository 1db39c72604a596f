//! Basic blocks and the per-function block map.
use crate::{Instruction, Operation};
use dflow_utils::{DflowResult, Error, Id};
use linked_hash_map::LinkedHashMap;
use std::mem;

/// A block produced by [form_blocks] before it has been named.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawBlock {
    /// Label that opened this block, if any.
    pub label: Option<Id>,
    pub instrs: Vec<Operation>,
}

impl RawBlock {
    fn is_empty(&self) -> bool {
        self.label.is_none() && self.instrs.is_empty()
    }
}

/// Partition a function's instruction stream into basic blocks.
///
/// A block ends right after a terminator or right before a label. Labels
/// open the block that follows them. Empty runs (for example, the space
/// between a terminator and the next label) do not produce blocks.
pub fn form_blocks<I>(instrs: I) -> Vec<RawBlock>
where
    I: IntoIterator<Item = Instruction>,
{
    let mut blocks = Vec::new();
    let mut cur = RawBlock::default();

    for instr in instrs {
        match instr {
            Instruction::Operation(op) => {
                let ends_block = op.is_terminator();
                cur.instrs.push(op);
                if ends_block {
                    blocks.push(mem::take(&mut cur));
                }
            }
            Instruction::Label(name) => {
                if !cur.is_empty() {
                    blocks.push(mem::take(&mut cur));
                }
                cur.label = Some(name);
            }
        }
    }

    if !cur.is_empty() {
        blocks.push(cur);
    }
    blocks
}

/// Straight-line run of operations. At most the last operation is a
/// terminator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicBlock {
    pub name: Id,
    pub instrs: Vec<Operation>,
    /// Was the name taken from a label in the source?
    pub labelled: bool,
}

impl BasicBlock {
    /// The operation that decides where control goes next.
    pub fn last(&self) -> Option<&Operation> {
        self.instrs.last()
    }

    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.instrs.iter()
    }

    /// Variables written anywhere in this block, in order of definition.
    pub fn defs(&self) -> impl Iterator<Item = Id> + '_ {
        self.instrs.iter().filter_map(|op| op.dest)
    }
}

impl<'a> IntoIterator for &'a BasicBlock {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.instrs.iter()
    }
}

/// Ordered mapping from block names to blocks.
///
/// The order is the order in which blocks appear in the program. It decides
/// fallthrough successors and which block is the entry (first) and exit
/// (last) of the function.
#[derive(Clone, Debug, Default)]
pub struct BlockMap {
    blocks: LinkedHashMap<Id, BasicBlock>,
}

impl BlockMap {
    /// Name the blocks. Labelled blocks take their label; the others are
    /// called `b<n>` where `n` is the number of blocks named before them.
    ///
    /// Returns an error if two blocks end up with the same name.
    pub fn from_raw<I>(raw: I) -> DflowResult<Self>
    where
        I: IntoIterator<Item = RawBlock>,
    {
        let mut blocks: LinkedHashMap<Id, BasicBlock> = LinkedHashMap::new();
        for RawBlock { label, instrs } in raw {
            let labelled = label.is_some();
            let name =
                label.unwrap_or_else(|| Id::from(format!("b{}", blocks.len())));
            if blocks.contains_key(&name) {
                return Err(Error::duplicate_block(name));
            }
            blocks.insert(
                name,
                BasicBlock {
                    name,
                    instrs,
                    labelled,
                },
            );
        }
        Ok(BlockMap { blocks })
    }

    /// Partition and name a function's instruction stream.
    pub fn from_instrs<I>(instrs: I) -> DflowResult<Self>
    where
        I: IntoIterator<Item = Instruction>,
    {
        Self::from_raw(form_blocks(instrs))
    }

    pub fn get(&self, name: &Id) -> Option<&BasicBlock> {
        self.blocks.get(name)
    }

    pub fn contains(&self, name: &Id) -> bool {
        self.blocks.contains_key(name)
    }

    /// Block names in program order.
    pub fn names(&self) -> impl Iterator<Item = Id> + '_ {
        self.blocks.keys().copied()
    }

    /// Blocks in program order.
    pub fn iter(&self) -> impl Iterator<Item = &BasicBlock> {
        self.blocks.values()
    }

    /// The entry block.
    pub fn first(&self) -> Option<&BasicBlock> {
        self.blocks.front().map(|(_, block)| block)
    }

    /// The block that closes the function in program order.
    pub fn last(&self) -> Option<&BasicBlock> {
        self.blocks.back().map(|(_, block)| block)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Flatten the blocks back into an instruction stream. Labels are
    /// emitted at the start of the blocks that were labelled in the source.
    pub fn instructions(&self) -> Vec<Instruction> {
        self.iter()
            .flat_map(|block| {
                block
                    .labelled
                    .then(|| Instruction::Label(block.name))
                    .into_iter()
                    .chain(block.iter().cloned().map(Instruction::Operation))
            })
            .collect()
    }
}
