//! Driver for the dflow analyses.
use crate::cmdline::Opts;
use dflow_frontend as frontend;
use dflow_ir::{self as ir, BlockMap, Program};
use dflow_opt::analysis_manager::AnalysisManager;
use dflow_utils::{DflowResult, Error};
use std::io;

/// Run the analyses from the command line.
pub fn run_driver() -> DflowResult<()> {
    // parse the command line arguments into Opts struct
    let opts = Opts::get_opts()?;

    // enable tracing
    env_logger::Builder::new()
        .format_timestamp(None)
        .filter_level(opts.log_level)
        .target(env_logger::Target::Stderr)
        .init();

    let am = AnalysisManager::default_analyses()?;

    // list all the available analyses when flag --list-analyses is enabled
    if opts.list_analyses {
        print!("{}", am.complete_help());
        return Ok(());
    }
    if let Some(name) = &opts.analysis_help {
        let help = am
            .specific_help(name)
            .ok_or_else(|| Error::unknown_analysis(name))?;
        println!("{help}");
        return Ok(());
    }

    let Some(name) = &opts.analysis else {
        return Err(Error::misc("No analysis given."));
    };
    // Fail on unknown names before touching the input.
    am.lookup(name)?;

    let prog = ir::from_ast::ast_to_ir(frontend::ProgramDef::construct(
        &opts.input,
    )?)?;
    let out = &mut opts.output.get_write()?;
    analyze_program(&am, name, &prog, out)
}

/// Run the analysis `name` over every function of `prog` and write the
/// facts of each block to `out`, functions in program order.
///
/// Every function is partitioned into blocks before anything is written, so
/// a malformed function produces no output at all.
pub fn analyze_program<W: io::Write>(
    am: &AnalysisManager,
    name: &str,
    prog: &Program,
    out: &mut W,
) -> DflowResult<()> {
    let analysis = am.lookup(name)?;
    let functions = prog
        .functions
        .iter()
        .map(|func| Ok((func.name, func.block_map()?)))
        .collect::<DflowResult<Vec<(ir::Id, BlockMap)>>>()?;

    for (func, blocks) in &functions {
        log::info!("{name}: function `{func}' has {} blocks", blocks.len());
        analysis(blocks).write(out)?;
    }
    out.flush()?;
    Ok(())
}
