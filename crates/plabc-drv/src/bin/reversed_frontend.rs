//! `reversed-frontend <input.ast> [output.physlab]`
//!
//! Without an output path the reconstructed source goes to standard output.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

/// PhysLab reverse frontend: reconstruct source text from a tree file.
#[derive(Parser, Debug)]
#[command(name = "reversed-frontend", version)]
struct Args {
    /// Tree input file (.ast)
    input: PathBuf,

    /// Source output file; stdout when omitted
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    plabc_drv::init_tracing();
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let usage_error = err.use_stderr();
            let _ = err.print();
            return if usage_error {
                ExitCode::from(1)
            } else {
                // --help / --version
                ExitCode::SUCCESS
            };
        }
    };
    match plabc_drv::reverse(&args.input, args.output.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}
