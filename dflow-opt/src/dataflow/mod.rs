//! Worklist solver for dataflow problems and the analyses built on it.
mod available_exprs;
mod const_prop;
mod construct;
mod defined_vars;
mod engine;
mod live_vars;
mod pretty;
mod reaching_defns;

pub mod lattice;

pub use available_exprs::{AvailableExpressions, Expr};
pub use const_prop::{ConstMap, ConstValue, ConstantPropagation};
pub use construct::{ConstructAnalysis, Named};
pub use defined_vars::DefinedVariables;
pub use engine::{
    Analysis, DataflowResult, Direction, solve, solve_with_cfg,
};
pub use live_vars::LiveVariables;
pub use pretty::{EMPTY, PrettyFact};
pub use reaching_defns::{
    DefId, DefIdGenerator, Definition, ReachingDefinitions,
};
