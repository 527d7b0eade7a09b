use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use pvtsm::io::wav::{read_wav_file, write_wav_file, WavEncoding};
use pvtsm::report::write_report_json;
use pvtsm::stretch::params::{
    DEFAULT_COOLDOWN_FRAMES, DEFAULT_FFT_SIZE, DEFAULT_TRANSIENT_THRESHOLD,
};
use pvtsm::StretchParams;

/// Change the duration of a WAV file without changing its pitch.
#[derive(Debug, Parser)]
#[command(name = "pvtsm", version, about)]
struct Cli {
    /// Input WAV file.
    input: PathBuf,

    /// Output WAV file.
    output: PathBuf,

    /// Duration ratio (1.5 = 50% longer).
    #[arg(short, long, conflicts_with = "speed", required_unless_present = "speed")]
    ratio: Option<f64>,

    /// Playback speed (0.8 = 20% slower).
    #[arg(short, long)]
    speed: Option<f64>,

    /// Transform size (power of two).
    #[arg(long, default_value_t = DEFAULT_FFT_SIZE)]
    fft_size: usize,

    /// Frame energy ratio that triggers a phase reset.
    #[arg(long, default_value_t = DEFAULT_TRANSIENT_THRESHOLD)]
    threshold: f32,

    /// Cooldown after a phase reset, in frames (the reset frame counts).
    #[arg(long, default_value_t = DEFAULT_COOLDOWN_FRAMES)]
    cooldown: usize,

    /// Write 32-bit float samples.
    #[arg(long, conflicts_with = "pcm24")]
    float: bool,

    /// Write 24-bit PCM samples.
    #[arg(long = "24bit")]
    pcm24: bool,

    /// Write a JSON processing report to this path.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log processing details.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn params(&self) -> Result<StretchParams> {
        let params = match (self.ratio, self.speed) {
            (Some(ratio), _) => StretchParams::new(ratio),
            (None, Some(speed)) if speed > 0.0 => StretchParams::from_speed(speed),
            (None, Some(speed)) => bail!("speed must be positive, got {}", speed),
            (None, None) => bail!("one of --ratio or --speed is required"),
        };
        Ok(params
            .with_fft_size(self.fft_size)
            .with_transient_threshold(self.threshold)
            .with_cooldown_frames(self.cooldown))
    }

    fn encoding(&self) -> WavEncoding {
        if self.float {
            WavEncoding::Float32
        } else if self.pcm24 {
            WavEncoding::Pcm24
        } else {
            WavEncoding::Pcm16
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let params = cli.params()?;

    let input = read_wav_file(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    info!(
        "input: {} channels, {} Hz, {} samples, {:.2}s",
        input.num_channels(),
        input.sample_rate,
        input.num_frames(),
        input.duration_secs()
    );
    info!("stretching by {:.4}x", params.stretch_ratio);

    let start = Instant::now();
    let (output, report) =
        pvtsm::stretch_buffer_with_report(&input, &params).context("stretching failed")?;
    let elapsed = start.elapsed().as_secs_f64();

    info!(
        "output: {} samples, {:.2}s, {} phase resets",
        output.num_frames(),
        output.duration_secs(),
        report.total_phase_resets()
    );
    info!(
        "processed in {:.3}s ({:.1}x realtime)",
        elapsed,
        input.duration_secs() / elapsed.max(f64::EPSILON)
    );

    write_wav_file(&cli.output, &output, cli.encoding())
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    info!("written to {}", cli.output.display());

    if let Some(path) = &cli.report {
        write_report_json(path, &report)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        info!("report written to {}", path.display());
    }

    Ok(())
}
