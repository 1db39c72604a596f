//! Define the AnalysisManager structure that is used to register analyses and
//! run them by name.
use crate::dataflow::{
    self, Analysis, ConstructAnalysis, DataflowResult, Named, PrettyFact,
};
use dflow_ir::{BlockMap, Id};
use dflow_utils::{DflowResult, Error};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::io;
use std::time::Instant;

/// Type-erased analysis: solves a function and renders the fixpoint.
pub type AnalysisClosure = Box<dyn Fn(&BlockMap) -> FactReport>;

/// Rendered facts of one block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FactRow {
    pub block: Id,
    pub entry: String,
    pub exit: String,
}

/// Rendered fixpoint of one analysis over one function, in block order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FactReport {
    rows: Vec<FactRow>,
}

impl<F: PrettyFact> From<&DataflowResult<F>> for FactReport {
    fn from(res: &DataflowResult<F>) -> Self {
        let rows = res
            .iter()
            .map(|(block, entry, exit)| FactRow {
                block,
                entry: entry.pretty(),
                exit: exit.pretty(),
            })
            .collect();
        FactReport { rows }
    }
}

impl FactReport {
    pub fn rows(&self) -> &[FactRow] {
        &self.rows
    }

    /// Write the report, one stanza per block:
    ///
    /// ```text
    /// b0:
    ///   in:  ∅
    ///   out: x, y
    /// ```
    pub fn write<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        for FactRow { block, entry, exit } in &self.rows {
            writeln!(out, "{block}:")?;
            writeln!(out, "  in:  {entry}")?;
            writeln!(out, "  out: {exit}")?;
        }
        Ok(())
    }
}

/// Structure that tracks all registered analyses.
#[derive(Default)]
pub struct AnalysisManager {
    /// All registered analyses
    analyses: HashMap<String, AnalysisClosure>,
    /// Short names for registered analyses.
    aliases: HashMap<String, String>,
    // Track the help information for analyses
    help: HashMap<String, String>,
}

impl AnalysisManager {
    /// Register a new analysis and return an error if another analysis or
    /// alias with the same name has already been registered.
    ///
    /// ## Example
    /// ```rust
    /// # use dflow_opt::{analysis_manager::AnalysisManager, dataflow::LiveVariables};
    /// let mut am = AnalysisManager::default();
    /// am.register_analysis::<LiveVariables>()?;
    /// # Ok::<(), dflow_utils::Error>(())
    /// ```
    pub fn register_analysis<A>(&mut self) -> DflowResult<()>
    where
        A: Analysis + ConstructAnalysis + Named + 'static,
        A::Fact: PrettyFact,
    {
        let name = A::name().to_string();
        if self.analyses.contains_key(&name) || self.aliases.contains_key(&name)
        {
            return Err(Error::AlreadyRegistered(name));
        }
        self.analyses.insert(
            name.clone(),
            Box::new(|blocks: &BlockMap| {
                let analysis = A::from_blocks(blocks);
                FactReport::from(&dataflow::solve(blocks, &analysis))
            }),
        );
        self.help
            .insert(name.clone(), format!("- {}: {}", name, A::description()));
        Ok(())
    }

    /// Adds a short name for a registered analysis.
    pub fn add_alias(&mut self, alias: &str, analysis: &str) -> DflowResult<()> {
        if self.aliases.contains_key(alias) || self.analyses.contains_key(alias)
        {
            return Err(Error::AlreadyRegistered(alias.to_string()));
        }
        if !self.analyses.contains_key(analysis) {
            return Err(Error::unknown_analysis(analysis));
        }
        self.aliases
            .insert(alias.to_string(), analysis.to_string());
        Ok(())
    }

    /// Resolve an alias. Names that are not aliases are returned as they are.
    fn resolve_alias<'a>(&'a self, maybe_alias: &'a str) -> &'a str {
        self.aliases
            .get(maybe_alias)
            .map(String::as_str)
            .unwrap_or(maybe_alias)
    }

    /// Find the analysis called `name`, which may be an alias.
    pub fn lookup(&self, name: &str) -> DflowResult<&AnalysisClosure> {
        self.analyses
            .get(self.resolve_alias(name))
            .ok_or_else(|| Error::unknown_analysis(name))
    }

    /// Run the analysis called `name` over one function.
    pub fn run(&self, name: &str, blocks: &BlockMap) -> DflowResult<FactReport> {
        let analysis = self.lookup(name)?;
        let start = Instant::now();
        let report = analysis(blocks);
        log::info!(
            "{}: {} blocks in {}ms",
            self.resolve_alias(name),
            blocks.len(),
            start.elapsed().as_millis()
        );
        Ok(report)
    }

    /// Return the help string for a specific analysis or alias.
    pub fn specific_help(&self, name: &str) -> Option<String> {
        self.help.get(name).cloned().or_else(|| {
            self.aliases.get(name).map(|analysis| {
                format!("`{name}' is an alias for:\n{}", self.help[analysis])
            })
        })
    }

    /// Return a string representation to show all available analyses and
    /// aliases. Appropriate for help text.
    pub fn complete_help(&self) -> String {
        let mut ret = String::with_capacity(1000);

        let mut names = self.analyses.keys().collect::<Vec<_>>();
        names.sort();
        ret.push_str("Analyses:\n");
        for name in names {
            let _ = writeln!(ret, "{}", self.help[name]);
        }

        let mut aliases = self.aliases.iter().collect::<Vec<_>>();
        aliases.sort();
        ret.push_str("\nAliases:\n");
        for (alias, analysis) in aliases {
            let _ = writeln!(ret, "- {alias}: {analysis}");
        }
        ret
    }
}

#[cfg(test)]
mod tests {
    use super::{AnalysisManager, FactReport, FactRow};
    use crate::dataflow::{DefinedVariables, LiveVariables, Named};
    use dflow_ir::{BlockMap, Literal, Operation};
    use dflow_utils::Error;

    fn manager() -> AnalysisManager {
        let mut am = AnalysisManager::default();
        am.register_analysis::<DefinedVariables>().unwrap();
        am.register_analysis::<LiveVariables>().unwrap();
        am.add_alias("live", LiveVariables::name()).unwrap();
        am
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut am = manager();
        assert!(matches!(
            am.register_analysis::<LiveVariables>(),
            Err(Error::AlreadyRegistered(_))
        ));
        assert!(matches!(
            am.add_alias("live", DefinedVariables::name()),
            Err(Error::AlreadyRegistered(_))
        ));
        assert!(matches!(
            am.add_alias("x", "no-such-analysis"),
            Err(Error::UnknownAnalysis(_))
        ));
    }

    #[test]
    fn aliases_resolve() {
        let am = manager();
        assert!(am.lookup("live").is_ok());
        assert!(am.lookup("live-variables").is_ok());
        assert!(matches!(am.lookup("dead"), Err(Error::UnknownAnalysis(_))));
    }

    #[test]
    fn runs_and_renders() {
        let am = manager();
        let blocks = BlockMap::from_instrs(vec![
            Operation::constant("x", Literal::Int(1)).into(),
        ])
        .unwrap();
        let report = am.run("defined-variables", &blocks).unwrap();
        assert_eq!(
            report.rows(),
            &[FactRow {
                block: "b0".into(),
                entry: "∅".to_string(),
                exit: "x".to_string(),
            }]
        );
        let mut out = Vec::new();
        report.write(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "b0:\n  in:  ∅\n  out: x\n"
        );
    }

    #[test]
    fn empty_report_writes_nothing() {
        let mut out = Vec::new();
        FactReport::default().write(&mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn help_lists_everything() {
        let am = manager();
        let help = am.complete_help();
        assert!(help.contains("- defined-variables: "));
        assert!(help.contains("- live: live-variables"));
        let specific = am.specific_help("live").unwrap();
        assert!(specific.contains("alias"));
        assert!(am.specific_help("nothing").is_none());
    }
}
