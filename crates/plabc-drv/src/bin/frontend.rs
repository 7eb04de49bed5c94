//! `frontend <input.physlab> [output.ast]`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

/// PhysLab frontend: compile a lab report to its tree form.
#[derive(Parser, Debug)]
#[command(name = "frontend", version)]
struct Args {
    /// Source file (.physlab)
    input: PathBuf,

    /// Tree output file (.ast)
    #[arg(default_value = "out.ast")]
    output: PathBuf,
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
    match plabc_drv::compile(&args.input, &args.output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}
