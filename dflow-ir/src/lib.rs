//! Internal representation for dflow.
//!
//! The representation is generated from the frontend AST.
//! The key differences between the frontend AST and the IR are:
//! 1. Instructions are a tagged union of operations and labels instead of
//!    records that may or may not carry an `op` field.
//! 2. Names are interned [`Id`]s and operators are typed [`Opcode`]s.
//!
//! Functions are turned into a [`BlockMap`] of basic blocks and a [`Cfg`]
//! that the analyses run over.

// Modules defining internal structures.
mod block;
mod cfg;
mod function;
mod instruction;
mod printer;

// Re-export types at the module level.
pub use block::{BasicBlock, BlockMap, RawBlock, form_blocks};
pub use cfg::{Cfg, Edges, Targets};
pub use dflow_utils::Id;
pub use function::{Function, Program};
pub use instruction::{Instruction, Literal, Opcode, Operation};
pub use printer::Printer;

/// Module to transform AST programs into IR.
pub mod from_ast;
