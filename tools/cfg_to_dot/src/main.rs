use argh::FromArgs;
use dflow_frontend as frontend;
use dflow_ir::{self as ir, BlockMap, Cfg, Function, Printer, Program};
use dflow_opt::analysis::{self, GraphAnalysis};
use dflow_utils::{DflowResult, OutputFile};
use itertools::Itertools;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, FromArgs)]
/// Print the control-flow graph of every function in a JSON program
struct Args {
    /// path to the program (default: stdin)
    #[argh(positional)]
    file_path: Option<PathBuf>,

    /// output file path (default: stdout)
    #[argh(option, short = 'o', default = "OutputFile::Stdout")]
    output: OutputFile,

    /// emit Graphviz syntax instead of the plain graph listing
    #[argh(switch)]
    dot: bool,

    /// also print path lengths, reverse postorder, back edges and
    /// reducibility, starting from the first block
    #[argh(switch)]
    orders: bool,

    /// also list the instructions of every block
    #[argh(switch)]
    blocks: bool,

    /// logging level (default: warn)
    #[argh(option, long = "log-level", default = "log::LevelFilter::Warn")]
    log_level: log::LevelFilter,
}

/// Write the traversal orders of one function's graph.
fn write_orders<W: Write>(
    blocks: &BlockMap,
    cfg: &Cfg,
    out: &mut W,
) -> DflowResult<()> {
    let Some(entry) = blocks.first().map(|b| b.name) else {
        return Ok(());
    };
    let lengths = analysis::path_lengths(cfg, entry);
    writeln!(
        out,
        "path lengths: {}",
        lengths.iter().map(|(n, d)| format!("{n}: {d}")).join(", ")
    )?;
    let rpo = analysis::reverse_postorder(cfg, entry);
    writeln!(out, "reverse postorder: {}", Printer::names_to_str(&rpo))?;
    let back = analysis::back_edges(cfg, entry);
    writeln!(
        out,
        "back edges: {}",
        back.iter().map(|(t, h)| format!("{t} -> {h}")).join(", ")
    )?;
    writeln!(out, "reducible: {}", analysis::is_reducible(cfg, entry))?;

    let graph = GraphAnalysis::from(cfg);
    let loops = graph.loops();
    writeln!(
        out,
        "loops: {}",
        loops
            .iter()
            .map(|members| format!("{{{}}}", Printer::names_to_str(members)))
            .join(", ")
    )?;
    Ok(())
}

/// Write every block's name followed by its operations, one per line.
fn write_blocks<W: Write>(blocks: &BlockMap, out: &mut W) -> DflowResult<()> {
    for block in blocks.iter() {
        writeln!(out, "{}:", block.name)?;
        for op in block {
            writeln!(out, "  {}", Printer::operation_to_str(op))?;
        }
    }
    Ok(())
}

fn write_function<W: Write>(
    func: &Function,
    blocks: &BlockMap,
    cfg: &Cfg,
    args: &Args,
    out: &mut W,
) -> DflowResult<()> {
    log::info!(
        "{}: {} blocks, {} edges",
        func.name,
        blocks.len(),
        cfg.edges().count()
    );
    if args.dot {
        writeln!(out, "// {}", func.name)?;
        writeln!(out, "{}", GraphAnalysis::from(cfg).to_dot())?;
    } else {
        Printer::write_cfg(&func.name, blocks, cfg, out)?;
    }
    if args.blocks {
        write_blocks(blocks, out)?;
    }
    if args.orders {
        write_orders(blocks, cfg, out)?;
    }
    Ok(())
}

/// Write the graph of every function of `prog`, in program order.
///
/// Every function is partitioned before anything is written, so a malformed
/// function produces no output at all.
fn write_program<W: Write>(
    prog: &Program,
    args: &Args,
    out: &mut W,
) -> DflowResult<()> {
    let functions = prog
        .functions
        .iter()
        .map(|func| {
            let blocks = func.block_map()?;
            let cfg = Cfg::from(&blocks);
            Ok((func, blocks, cfg))
        })
        .collect::<DflowResult<Vec<_>>>()?;

    for (func, blocks, cfg) in &functions {
        write_function(func, blocks, cfg, args, out)?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> DflowResult<()> {
    let args: Args = argh::from_env();

    env_logger::Builder::new()
        .format_timestamp(None)
        .filter_level(args.log_level)
        .target(env_logger::Target::Stderr)
        .init();

    let prog = ir::from_ast::ast_to_ir(frontend::ProgramDef::construct(
        &args.file_path,
    )?)?;
    let out = &mut args.output.get_write()?;
    write_program(&prog, &args, out)
}
