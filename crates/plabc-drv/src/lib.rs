//! plabc-drv - Pipeline orchestration for the PhysLab tools.
//!
//! Three one-shot batch tools share this library:
//!
//! - `frontend <input.physlab> [output.ast]`: lex + parse + dump the tree
//! - `backend <input.ast> [output.asm]`: reload the tree + emit assembly
//! - `reversed-frontend <input.ast> [output.physlab]`: reload + print source
//!
//! Each stage reads its input fully, transforms in memory and writes on
//! success; failures return one-line diagnostics naming the file (and for
//! frontend failures, line/column). Set `RUST_LOG=debug` for phase traces.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use plabc_ast::LoadedAst;

/// Installs the stderr tracing subscriber honoring `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .try_init();
}

/// Frontend pipeline: source text to the serialized tree file.
pub fn compile(input: &Path, output: &Path) -> Result<()> {
    let bytes = fs::read(input).with_context(|| format!("cannot read {}", input.display()))?;

    let name = input.display().to_string();
    let mut unit = plabc_lex::tokenize_bytes(Some(&name), &bytes)
        .with_context(|| format!("{name}: lexing failed"))?;
    debug!(tokens = unit.token_count(), symbols = unit.symbols.len(), "lexed");

    plabc_par::parse(&mut unit).with_context(|| format!("{name}: parsing failed"))?;
    let root = unit.root.context("parser finished without a tree root")?;
    debug!(nodes = unit.arena.len(), "parsed");

    let text = plabc_ast::serialize(&unit.arena, &unit.symbols, root);
    fs::write(output, text).with_context(|| format!("cannot write {}", output.display()))?;
    info!(input = %input.display(), output = %output.display(), "frontend done");
    Ok(())
}

/// Loads a serialized tree file.
fn load_tree(input: &Path) -> Result<LoadedAst> {
    let text =
        fs::read_to_string(input).with_context(|| format!("cannot read {}", input.display()))?;
    let loaded = plabc_ast::deserialize(&text)
        .with_context(|| format!("{}: loading tree failed", input.display()))?;
    debug!(nodes = loaded.arena.len(), symbols = loaded.symbols.len(), "tree loaded");
    Ok(loaded)
}

/// Backend pipeline: serialized tree to stack-VM assembly.
pub fn assemble(input: &Path, output: &Path) -> Result<()> {
    let loaded = load_tree(input)?;
    let asm = plabc_gen::emit_program(&loaded.arena, &loaded.symbols, loaded.root)
        .with_context(|| format!("{}: code generation failed", input.display()))?;
    fs::write(output, asm).with_context(|| format!("cannot write {}", output.display()))?;
    info!(input = %input.display(), output = %output.display(), "backend done");
    Ok(())
}

/// Reverse pipeline: serialized tree back to surface syntax. Writes to
/// standard output when no path is given.
pub fn reverse(input: &Path, output: Option<&Path>) -> Result<()> {
    let loaded = load_tree(input)?;
    let source = plabc_rev::emit_source(&loaded.arena, &loaded.symbols, loaded.root)
        .with_context(|| format!("{}: source reconstruction failed", input.display()))?;
    match output {
        Some(path) => {
            fs::write(path, source)
                .with_context(|| format!("cannot write {}", path.display()))?;
            info!(input = %input.display(), output = %path.display(), "reverse done");
        }
        None => print!("{source}"),
    }
    Ok(())
}
