//! Export the player character's appearance from a save file to JSON, or
//! import it back.
//!
//! ```text
//! hlse export -i HL-00-00.sav -o appearance.json
//! hlse import -i appearance.json -o HL-01-00.sav --orig-name
//! ```
//!
//! On import the save file given with `-o` is both the base that is edited
//! and the destination, and is replaced in place.

use anyhow::{bail, Context, Result};
use clap::Parser;
use hlse::{Appearance, ImportOptions};
use log::info;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// import (i) or export (e)
    command: String,

    /// Path of input file. JSON appearance if import, save file if export.
    #[arg(short = 'i', long = "input")]
    in_path: PathBuf,

    /// Path of output file. Save file if import, JSON appearance if export.
    #[arg(short = 'o', long = "output")]
    out_path: PathBuf,

    /// Keep original character name.
    #[arg(long = "orig-name")]
    orig_name: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Export,
    Import,
}

impl Command {
    fn resolve(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "export" | "e" => Ok(Command::Export),
            "import" | "i" => Ok(Command::Import),
            _ => bail!("invalid command, must be import (i) or export (e)"),
        }
    }

    fn extensions(&self) -> (&'static str, &'static str) {
        match self {
            Command::Export => ("sav", "json"),
            Command::Import => ("json", "sav"),
        }
    }
}

/// Suffix match on the whole path, so a file named exactly `.sav` is accepted
fn has_extension(path: &Path, ext: &str) -> bool {
    let suffix = format!(".{}", ext);
    path.as_os_str().to_string_lossy().ends_with(&suffix)
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("unable to create temporary file in {}", dir.display()))?;
    file.write_all(data)?;

    // Replacing an existing file keeps its mode
    if let Ok(metadata) = std::fs::metadata(path) {
        file.as_file().set_permissions(metadata.permissions())?;
    }
    file.as_file().sync_all()?;
    file.persist(path)
        .with_context(|| format!("unable to write {}", path.display()))?;
    Ok(())
}

fn export(args: &Args) -> Result<()> {
    let save = std::fs::read(&args.in_path)
        .with_context(|| format!("unable to read {}", args.in_path.display()))?;
    let appearance = hlse::export(&save)
        .with_context(|| format!("unable to export from {}", args.in_path.display()))?;

    let json = appearance.to_vec_pretty()?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&json)?;
    writeln!(stdout)?;

    write_atomic(&args.out_path, &json)?;
    info!("wrote {}", args.out_path.display());
    Ok(())
}

fn import(args: &Args) -> Result<()> {
    let json = std::fs::read(&args.in_path)
        .with_context(|| format!("unable to read {}", args.in_path.display()))?;
    let appearance = Appearance::from_slice(&json)
        .with_context(|| format!("unable to parse {}", args.in_path.display()))?;

    let save = std::fs::read(&args.out_path)
        .with_context(|| format!("unable to read {}", args.out_path.display()))?;
    let options = ImportOptions::new().with_keep_names(args.orig_name);
    let edited = hlse::import(&save, &appearance, options)
        .with_context(|| format!("unable to import into {}", args.out_path.display()))?;

    write_atomic(&args.out_path, &edited)?;
    info!("wrote {}", args.out_path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let command = Command::resolve(&args.command)?;
    let (input_ext, output_ext) = command.extensions();
    if !has_extension(&args.in_path, input_ext) || !has_extension(&args.out_path, output_ext) {
        bail!(
            "invalid input/output file extension, expected .{} input and .{} output",
            input_ext,
            output_ext
        );
    }

    match command {
        Command::Export => export(&args),
        Command::Import => import(&args),
    }
}
