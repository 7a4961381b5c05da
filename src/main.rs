/*
 Copyright (c) 2026 symfir contributors

 This file is part of symfir

 symfir is free software: you can redistribute it and/or modify it
 under the terms of the GNU General Public License as published by the
 Free Software Foundation, either version 3 of the License, or
 (at your option) any later version.

 symfir is distributed in the hope that it will be useful, but
 WITHOUT ANY WARRANTY; without even the implied warranty of
 MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 GNU General Public License for more details.
 You should have received a copy of the GNU General Public License
 along with symfir. If not, see <https://www.gnu.org/licenses/>.
*/

use clap::Parser;
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use log::{info, trace, warn};
use rand::prelude::*;
use rayon::prelude::*;
use std::fmt::Display;
use std::fs;
use std::io::{self, Read, Write};
use std::str::FromStr;
use std::thread::available_parallelism;
use std::{error::Error, path::PathBuf, time::Instant};

use symfir::engine::min_casc_len;
use symfir::{ColorLogger, FilterSpec, FirSym, RoundMode, SatMode, Scalar, TermResult};

#[derive(Parser)]
#[command(name = "symfir", version)]
struct Cli {
    /// Coefficient file: one tap per line, the full symmetric impulse
    /// response (it is checked for symmetry and folded internally)
    #[arg(short = 't', long = "taps")]
    taps: PathBuf,

    /// Raw input file of little-endian samples with channels interleaved
    /// (use - for stdin). Omit to filter generated white noise.
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Raw output file of little-endian filtered samples,
    /// channels interleaved [default: stdout]
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Sample format: i16 or f32
    #[arg(short = 'f', long = "format", default_value = "f32")]
    format: String,

    /// Number of interleaved channels
    #[arg(short = 'c', long = "channels", default_value = "2")]
    channels: usize,

    /// Samples per processing chunk. Must be a multiple of the
    /// format's output lane count.
    #[arg(long = "chunk", default_value = "256")]
    chunk: usize,

    /// Number of chained compute units the filter is split across
    /// [default: fewest that fit the tap count]
    #[arg(long = "cascade")]
    cascade: Option<usize>,

    /// Output right-shift in bits. Integer formats only; must be 0 for f32.
    #[arg(short = 's', long = "shift", default_value = "0")]
    shift: u32,

    /// Rounding mode: floor, ceil, pos-inf, neg-inf, sym-inf, sym-zero,
    /// conv-even, conv-odd, sym-floor, or sym-ceil
    #[arg(long = "round", default_value = "neg-inf")]
    round: RoundMode,

    /// Saturation mode: none, saturate, or symmetric
    #[arg(long = "sat", default_value = "saturate")]
    sat: SatMode,

    /// Noise samples per channel when no input file is given
    #[arg(short = 'n', long = "samples", default_value = "65536")]
    samples: usize,

    /// Noise generator seed
    #[arg(long = "seed", default_value = "0")]
    seed: u64,

    /// Print diagnostic messages
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Quiet mode: suppress all log output
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn main() -> TermResult {
    match run() {
        Ok(()) => TermResult(Ok(())),
        Err(e) => TermResult(Err(e.into())),
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let logger = ColorLogger::new(cli.quiet, cli.verbose);
    let multi = MultiProgress::new();
    LogWrapper::new(multi.clone(), logger).try_init()?;

    let avail_par = available_parallelism().map(|n| n.get()).unwrap_or(1);
    let thread_count = (avail_par / 2).max(1);

    // Configure Rayon pool size to our computed thread_count.
    // build_global can only be called once; ignore error if already set.
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build_global()
    {
        warn!(
            "Rayon pool initialization error ({} threads). Details: {:?}",
            thread_count, e
        );
    } else {
        trace!("Configured Rayon pool with {} threads", thread_count);
    }

    if cli.channels == 0 {
        return Err("Channel count must be at least 1".into());
    }

    let wall_start = Instant::now();

    match cli.format.as_str() {
        "i16" => run_typed::<i16>(&cli, &multi)?,
        "f32" => run_typed::<f32>(&cli, &multi)?,
        other => {
            return Err(format!("Invalid format '{}'; must be i16 or f32", other).into());
        }
    }

    let total_elapsed = wall_start.elapsed();
    let total_secs = total_elapsed.as_secs();
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    info!(
        "Filtered {} channels in {:02}:{:02}:{:02}",
        cli.channels, h, m, s
    );

    Ok(())
}

/// Bridge between the engine's scalar types and the raw sample stream.
trait RawSample: Scalar + FromStr + Noise {
    const BYTES: usize;
    fn from_le(bytes: &[u8]) -> Self;
    fn to_le(self, out: &mut Vec<u8>);
}

trait Noise: Sized {
    fn noise(rng: &mut StdRng) -> Self;
}

impl RawSample for i16 {
    const BYTES: usize = 2;

    fn from_le(bytes: &[u8]) -> i16 {
        i16::from_le_bytes([bytes[0], bytes[1]])
    }

    fn to_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl Noise for i16 {
    fn noise(rng: &mut StdRng) -> i16 {
        rng.gen_range(i16::MIN / 2..i16::MAX / 2)
    }
}

impl RawSample for f32 {
    const BYTES: usize = 4;

    fn from_le(bytes: &[u8]) -> f32 {
        f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    fn to_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl Noise for f32 {
    fn noise(rng: &mut StdRng) -> f32 {
        rng.gen_range(-1.0..1.0)
    }
}

fn run_typed<D>(cli: &Cli, multi: &MultiProgress) -> Result<(), Box<dyn Error>>
where
    D: RawSample,
    <D as FromStr>::Err: Display,
{
    let (fir_len, half) = load_taps::<D>(&cli.taps)?;

    let mut spec = FilterSpec::new(fir_len, cli.chunk);
    spec.shift = cli.shift;
    spec.round = cli.round;
    spec.sat = cli.sat;
    spec.casc_len = cli.cascade.unwrap_or_else(|| min_casc_len(fir_len));
    // Validate the configuration once up front so errors surface before any
    // input is consumed; the per-channel engines below cannot fail.
    let probe = FirSym::<D, D>::new(spec, &half)?;
    info!(
        "{} taps over {} cascade unit(s), margin {}, group delay {}",
        fir_len,
        spec.casc_len,
        probe.margin(),
        probe.group_delay()
    );
    trace!("unit architectures: {:?}", probe.unit_archs());

    let channels = read_channels::<D>(cli)?;
    let frames = channels[0].len();

    let style = ProgressStyle::with_template("{prefix} {bar:20.cyan/blue} {percent}{msg}")
        .map_err(|e| e.to_string())?;

    let filtered = channels
        .into_par_iter()
        .enumerate()
        .map(|(ch, samples)| {
            let mut engine =
                FirSym::<D, D>::new(spec, &half).map_err(|e| e.to_string())?;
            let pg = if cli.quiet {
                None
            } else {
                Some(
                    multi
                        .add(ProgressBar::new(samples.len().div_ceil(cli.chunk) as u64))
                        .with_style(style.clone())
                        .with_prefix(format!(
                            "{} {}",
                            "[Filtering]".bold(),
                            format!("channel {}", ch).bold()
                        ))
                        .with_message("%"),
                )
            };
            let out = filter_channel(&mut engine, &samples, pg.as_ref());
            if let Some(pg) = pg {
                pg.finish_and_clear();
            }
            Ok(out)
        })
        .collect::<Result<Vec<_>, String>>()
        .map_err(|e| -> Box<dyn Error> { Box::new(io::Error::other(e)) })?;

    write_interleaved(cli, &filtered, frames)
}

/// Filter one channel chunk by chunk. The stream is preceded by the margin
/// of silence and padded out to a whole chunk at the tail; output length
/// equals input length.
fn filter_channel<D: Scalar>(
    engine: &mut FirSym<D, D>,
    samples: &[D],
    pg: Option<&ProgressBar>,
) -> Vec<D> {
    let chunk = engine.spec().chunk;
    let margin = engine.margin();
    let padded_len = samples.len().div_ceil(chunk) * chunk;

    let mut signal = vec![D::default(); margin];
    signal.extend_from_slice(samples);
    signal.resize(margin + padded_len, D::default());

    let mut out = Vec::with_capacity(padded_len);
    let mut buf = vec![D::default(); chunk];
    for t in 0..padded_len / chunk {
        engine.process(&signal[t * chunk..t * chunk + margin + chunk], &mut buf);
        out.extend_from_slice(&buf);
        if let Some(pg) = pg {
            pg.inc(1);
        }
    }
    out.truncate(samples.len());
    out
}

/// Parse the full symmetric impulse response and fold it to its
/// non-redundant half.
fn load_taps<D>(path: &PathBuf) -> Result<(usize, Vec<D>), Box<dyn Error>>
where
    D: RawSample,
    <D as FromStr>::Err: Display,
{
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Cannot read taps file \"{}\": {}", path.display(), e))?;
    let mut full = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let tap = line
            .parse::<D>()
            .map_err(|e| format!("Bad coefficient on line {}: {}", i + 1, e))?;
        full.push(tap);
    }
    if full.is_empty() {
        return Err("Taps file contains no coefficients".into());
    }
    let len = full.len();
    for i in 0..len / 2 {
        if full[i] != full[len - 1 - i] {
            return Err(format!(
                "Impulse response is not symmetric: tap {} != tap {}",
                i,
                len - 1 - i
            )
            .into());
        }
    }
    full.truncate((len + 1) / 2);
    Ok((len, full))
}

/// Read and deinterleave the input, or synthesize noise when none is given.
fn read_channels<D: RawSample>(cli: &Cli) -> Result<Vec<Vec<D>>, Box<dyn Error>> {
    let bytes = match &cli.input {
        None => {
            info!(
                "No input file; generating {} noise samples per channel",
                cli.samples
            );
            let mut rng = StdRng::seed_from_u64(cli.seed);
            let mut out = Vec::with_capacity(cli.samples * cli.channels * D::BYTES);
            for _ in 0..cli.samples * cli.channels {
                D::noise(&mut rng).to_le(&mut out);
            }
            out
        }
        Some(path) if path.as_os_str() == "-" => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
        Some(path) => fs::read(path)
            .map_err(|e| format!("Cannot read input \"{}\": {}", path.display(), e))?,
    };

    let frame_bytes = D::BYTES * cli.channels;
    if bytes.len() % frame_bytes != 0 {
        warn!(
            "Input length {} is not a whole number of {}-channel frames; \
             trailing bytes ignored",
            bytes.len(),
            cli.channels
        );
    }
    let frames = bytes.len() / frame_bytes;
    if frames == 0 {
        return Err("Input contains no complete sample frames".into());
    }

    let mut channels = vec![Vec::with_capacity(frames); cli.channels];
    for f in 0..frames {
        for (c, channel) in channels.iter_mut().enumerate() {
            let at = f * frame_bytes + c * D::BYTES;
            channel.push(D::from_le(&bytes[at..at + D::BYTES]));
        }
    }
    Ok(channels)
}

/// Reinterleave the filtered channels and write them out.
fn write_interleaved<D: RawSample>(
    cli: &Cli,
    channels: &[Vec<D>],
    frames: usize,
) -> Result<(), Box<dyn Error>> {
    let mut bytes = Vec::with_capacity(frames * cli.channels * D::BYTES);
    for f in 0..frames {
        for channel in channels {
            channel[f].to_le(&mut bytes);
        }
    }
    match &cli.output {
        Some(path) => fs::write(path, &bytes)
            .map_err(|e| format!("Cannot write output \"{}\": {}", path.display(), e))?,
        None => io::stdout().write_all(&bytes)?,
    }
    Ok(())
}
