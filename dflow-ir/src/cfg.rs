//! Control-flow graph over a [BlockMap].
use crate::{BlockMap, Opcode};
use dflow_utils::Id;
use linked_hash_map::LinkedHashMap;
use smallvec::SmallVec;

/// Targets of the edges leaving (or entering) one block. Most blocks have
/// at most two.
pub type Targets = SmallVec<[Id; 2]>;

/// Adjacency lists keyed by block name, in block order.
///
/// Looking up a name that has no entry yields an empty list, so names that
/// only appear as branch targets can be queried like any other block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Edges {
    adj: LinkedHashMap<Id, Targets>,
}

impl Edges {
    /// Adjacent blocks of `node`, in edge order.
    pub fn targets(&self, node: &Id) -> &[Id] {
        self.adj.get(node).map(|t| t.as_slice()).unwrap_or(&[])
    }

    pub fn contains(&self, node: &Id) -> bool {
        self.adj.contains_key(node)
    }

    /// Nodes with an adjacency entry, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = Id> + '_ {
        self.adj.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Id, &[Id])> {
        self.adj.iter().map(|(node, targets)| (*node, targets.as_slice()))
    }

    fn push(&mut self, node: Id, target: Id) {
        self.entry(node).push(target);
    }

    fn entry(&mut self, node: Id) -> &mut Targets {
        self.adj.entry(node).or_insert_with(Targets::new)
    }
}

/// Successor and predecessor lists for every block of a function.
///
/// Successors of a block come from its last operation:
/// - `jmp`/`br`: the operation's labels, in order.
/// - `ret`: none.
/// - anything else (or an empty block): falls through to the next block in
///   program order, if there is one. Empty blocks have no successors.
///
/// Branch targets that do not name a block are kept as they are. They have
/// no successors of their own and are ignored by the analyses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cfg {
    succs: Edges,
    preds: Edges,
}

impl From<&BlockMap> for Cfg {
    fn from(blocks: &BlockMap) -> Self {
        let names: Vec<Id> = blocks.names().collect();
        let mut succs = Edges::default();
        for (idx, block) in blocks.iter().enumerate() {
            let targets: Targets = match block.last() {
                None => Targets::new(),
                Some(last) if last.op.is_branch() => {
                    last.labels.iter().copied().collect()
                }
                Some(last) if last.op == Opcode::Ret => Targets::new(),
                Some(_) => names.get(idx + 1).copied().into_iter().collect(),
            };
            *succs.entry(block.name) = targets;
        }

        // Every block has a predecessor list, even if it stays empty.
        let mut preds = Edges::default();
        for name in &names {
            preds.entry(*name);
        }
        for (src, dsts) in succs.iter() {
            for dst in dsts {
                preds.push(*dst, src);
            }
        }

        Cfg { succs, preds }
    }
}

impl Cfg {
    pub fn successors(&self, node: &Id) -> &[Id] {
        self.succs.targets(node)
    }

    pub fn predecessors(&self, node: &Id) -> &[Id] {
        self.preds.targets(node)
    }

    /// The full successor map.
    pub fn succs(&self) -> &Edges {
        &self.succs
    }

    /// The full predecessor map, the exact inverse of [Cfg::succs].
    pub fn preds(&self) -> &Edges {
        &self.preds
    }

    /// All edges `(src, dst)` in block order and then edge order.
    pub fn edges(&self) -> impl Iterator<Item = (Id, Id)> + '_ {
        self.succs
            .iter()
            .flat_map(|(src, dsts)| dsts.iter().map(move |dst| (src, *dst)))
    }
}
