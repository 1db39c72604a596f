//! Command line parsing for the dflow driver.
use argh::FromArgs;
use dflow_utils::{DflowResult, Error, OutputFile};
use std::path::PathBuf;

#[derive(FromArgs, Debug)]
/// Run a dataflow analysis over every function of a JSON program and print
/// the facts at the boundaries of each basic block.
pub struct Opts {
    /// name or alias of the analysis to run (see --list-analyses)
    #[argh(positional)]
    pub analysis: Option<String>,

    /// input program, default is stdin
    #[argh(option, short = 'i')]
    pub input: Option<PathBuf>,

    /// output file, default is stdout
    #[argh(
        option,
        short = 'o',
        long = "output",
        default = "OutputFile::Stdout"
    )]
    pub output: OutputFile,

    /// logging level: off, error, warn, info, debug or trace
    #[argh(
        option,
        long = "log-level",
        default = "log::LevelFilter::Warn"
    )]
    pub log_level: log::LevelFilter,

    /// list all registered analyses and aliases
    #[argh(switch)]
    pub list_analyses: bool,

    /// print the description of one analysis
    #[argh(option)]
    pub analysis_help: Option<String>,
}

impl Opts {
    /// Parse the command line arguments into an [Opts] struct.
    pub fn get_opts() -> DflowResult<Opts> {
        let opts: Opts = argh::from_env();
        if opts.analysis.is_none()
            && !opts.list_analyses
            && opts.analysis_help.is_none()
        {
            return Err(Error::misc(
                "No analysis given. Run with --list-analyses to see the registered analyses.",
            ));
        }
        Ok(opts)
    }
}
