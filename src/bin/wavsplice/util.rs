use crate::error::{CliError, Result};
use crate::Context;
use clap::ValueEnum;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use wavsplice::{Placement, WaveContainer};

/// Path value meaning stdin/stdout.
const STDIO: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliPlacement {
    Beginning,
    End,
}

impl CliPlacement {
    pub const fn to_placement(self) -> Placement {
        match self {
            Self::Beginning => Placement::AtBeginning,
            Self::End => Placement::AtEnd,
        }
    }
}

pub fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO
}

pub fn read_input(input: &Path) -> Result<Vec<u8>> {
    if is_stdio(input) {
        let mut bytes = Vec::new();
        io::stdin().lock().read_to_end(&mut bytes)?;
        return Ok(bytes);
    }
    if !input.is_file() {
        return Err(CliError::InputNotFound(input.display().to_string()));
    }
    Ok(fs::read(input)?)
}

pub fn write_output(target: &Path, bytes: &[u8]) -> Result<()> {
    if is_stdio(target) {
        let mut stdout = io::stdout().lock();
        stdout.write_all(bytes)?;
        stdout.flush()?;
        return Ok(());
    }
    fs::write(target, bytes)?;
    Ok(())
}

/// `<dir>/<stem>_<suffix>.wav` next to the input.
pub fn default_output_path(input: &Path, suffix: &str) -> Result<PathBuf> {
    if is_stdio(input) {
        return Err(CliError::OutputRequired);
    }
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| CliError::Message(format!("invalid input path: {}", input.display())))?;
    Ok(input.with_file_name(format!("{stem}_{suffix}.wav")))
}

pub fn resolve_output(input: &Path, output: Option<&Path>, suffix: &str) -> Result<PathBuf> {
    output.map_or_else(|| default_output_path(input, suffix), |p| Ok(p.to_path_buf()))
}

/// Write the result and report where it went.
pub fn emit(ctx: &Context, target: &Path, wave: &WaveContainer) -> Result<()> {
    write_output(target, wave.bytes())?;
    if !is_stdio(target) {
        ctx.out.note_user(format!(
            "wrote {} ({} bytes, {:.3} s)",
            target.display(),
            wave.bytes().len(),
            wave.duration_secs()
        ));
    }
    Ok(())
}
