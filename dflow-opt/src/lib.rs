//! # Analyses over the control-flow graph
//!
//! Graph orderings over a [dflow_ir::Cfg], a generic worklist solver for
//! dataflow problems, and the analyses that are registered by default.
//!
//! ```rust
//! use dflow_ir::{BlockMap, Literal, Operation};
//! use dflow_opt::{dataflow, dataflow::LiveVariables};
//! use dflow_utils::DflowResult;
//! fn main() -> DflowResult<()> {
//!   let blocks = BlockMap::from_instrs(vec![
//!       Operation::constant("x", Literal::Int(1)).into(),
//!       Operation::print(["x"]).into(),
//!   ])?;
//!   let live = dataflow::solve(&blocks, &LiveVariables);
//!   assert!(live.entry(&"b0".into()).unwrap().is_empty());
//!   Ok(())
//! }
//! ```
pub mod analysis;
pub mod analysis_manager;
pub mod dataflow;
pub mod default_analyses;
