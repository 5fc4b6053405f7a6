use crate::error::Result;
use crate::util::read_input;
use crate::Context;
use clap::Args;
use std::path::PathBuf;
use wavsplice::{ParseOptions, WaveContainer};

#[derive(Args)]
/// Internal struct.
pub struct CmdArgs {
    /// Input wave file (`-` for stdin).
    pub input: PathBuf,
}

/// Internal helper function.
pub fn run(ctx: &Context, args: &CmdArgs) -> Result<()> {
    let bytes = read_input(&args.input)?;
    let actual_len = bytes.len();

    let raw = WaveContainer::parse_with(
        bytes,
        ParseOptions {
            automatic_repair: false,
        },
    )?;
    let declared_riff = raw.declared_riff_size();
    let declared_data = raw.data_len();
    let needs_repair = raw.needs_repair();

    let wave = if needs_repair && ctx.settings.automatic_repair {
        ctx.out.info_diag("header carries streaming sizes; repairing before measuring");
        WaveContainer::parse_with(raw.into_bytes(), ctx.settings.parse_options())?
    } else {
        raw
    };

    let format = wave.format();
    ctx.out.info_user(format!("format: {format}"));
    ctx.out.info_user(format!(
        "encoding: {} (tag 0x{:04X})",
        format.encoding(),
        format.encoding().tag()
    ));
    ctx.out.info_user(format!(
        "byte rate: {} B/s, block align: {}",
        format.average_bytes_per_second(),
        format.block_align()
    ));
    if format.extra_size() > 0 {
        ctx.out
            .info_user(format!("extra format bytes: {}", format.extra_size()));
    }
    if let Some(declared) = format.extra_size_mismatch() {
        ctx.out.warn_user(format!(
            "format chunk declares {declared} extra bytes, using {}",
            format.extra_size()
        ));
    }
    ctx.out.info_user(format!(
        "riff size: declared {declared_riff}, actual {}",
        actual_len.saturating_sub(8)
    ));
    ctx.out.info_user(format!(
        "data: declared {declared_data} bytes at offset {}, payload {} bytes",
        wave.data_offset(),
        wave.pcm().len()
    ));
    ctx.out
        .info_user(format!("duration: {:.3} s", wave.duration_secs()));
    ctx.out.info_user(format!(
        "needs repair: {}",
        if needs_repair { "yes" } else { "no" }
    ));
    Ok(())
}
