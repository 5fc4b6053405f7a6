use crate::error::Result;
use crate::util::{emit, read_input, resolve_output};
use crate::Context;
use clap::Args;
use std::path::PathBuf;
use wavsplice::{ParseOptions, WaveContainer};

#[derive(Args)]
/// Internal struct.
pub struct CmdArgs {
    /// Input wave file (`-` for stdin).
    pub input: PathBuf,

    /// Output file (`-` for stdout, defaults to `<stem>_repaired.wav`).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Rewrite size fields even when they look consistent.
    #[arg(long)]
    pub force: bool,
}

/// Internal helper function.
pub fn run(ctx: &Context, args: &CmdArgs) -> Result<()> {
    let target = resolve_output(&args.input, args.output.as_deref(), "repaired")?;
    let bytes = read_input(&args.input)?;

    let raw = WaveContainer::parse_with(
        bytes,
        ParseOptions {
            automatic_repair: false,
        },
    )?;

    let wave = if raw.needs_repair() || args.force {
        let data_offset = raw.data_offset();
        let repaired = wavsplice::repair(raw.into_bytes(), data_offset)?;
        let wave = WaveContainer::parse_with(
            repaired,
            ParseOptions {
                automatic_repair: false,
            },
        )?;
        ctx.out.info_diag(format!(
            "riff size -> {}, data length -> {}",
            wave.declared_riff_size(),
            wave.data_len()
        ));
        wave
    } else {
        ctx.out.note_user("header sizes already consistent");
        raw
    };

    emit(ctx, &target, &wave)
}
