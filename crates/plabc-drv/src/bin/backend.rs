//! `backend <input.ast> [output.asm]`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

/// PhysLab backend: translate a tree file to stack-VM assembly.
#[derive(Parser, Debug)]
#[command(name = "backend", version)]
struct Args {
    /// Tree input file (.ast)
    input: PathBuf,

    /// Assembly output file (.asm)
    #[arg(default_value = "out.asm")]
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
    match plabc_drv::assemble(&args.input, &args.output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}
