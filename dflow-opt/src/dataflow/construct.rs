use super::Analysis;
use dflow_ir::BlockMap;

/// Trait that describes named analyses.
pub trait Named {
    /// The name of an analysis. Is used for identifying analyses.
    fn name() -> &'static str;
    /// A short description of the analysis.
    fn description() -> &'static str;
}

/// Trait defining method that can be used to construct an analysis from the
/// blocks of the function it will run over.
/// This is useful when an analysis needs to number or index the function
/// *before* the solver runs.
///
/// For analyses that don't need the blocks, this trait is automatically
/// derived from [Default].
pub trait ConstructAnalysis {
    fn from_blocks(blocks: &BlockMap) -> Self;
}

impl<T: Default + Analysis> ConstructAnalysis for T {
    fn from_blocks(_: &BlockMap) -> Self {
        T::default()
    }
}
