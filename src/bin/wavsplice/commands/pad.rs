use crate::error::Result;
use crate::util::{emit, read_input, resolve_output, CliPlacement};
use crate::Context;
use clap::Args;
use std::path::PathBuf;
use wavsplice::WaveContainer;

#[derive(Args)]
/// Internal struct.
pub struct CmdArgs {
    /// Input wave file (`-` for stdin).
    pub input: PathBuf,

    /// Seconds of silence; negative values remove audio.
    #[arg(long, allow_negative_numbers = true)]
    pub seconds: f64,

    /// Where to splice (defaults to the `placement` setting).
    #[arg(long, value_enum)]
    pub at: Option<CliPlacement>,

    /// Output file (`-` for stdout, defaults to `<stem>_padded.wav`).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Internal helper function.
pub fn run(ctx: &Context, args: &CmdArgs) -> Result<()> {
    let target = resolve_output(&args.input, args.output.as_deref(), "padded")?;
    let bytes = read_input(&args.input)?;

    let mut wave = WaveContainer::parse_with(bytes, ctx.settings.parse_options())?;
    let placement = args
        .at
        .map_or(ctx.settings.placement, CliPlacement::to_placement);

    let before = wave.data_len();
    wave.splice(args.seconds, placement)?;
    ctx.out.info_diag(format!(
        "{placement:?}: data length {before} -> {}",
        wave.data_len()
    ));

    emit(ctx, &target, &wave)
}
