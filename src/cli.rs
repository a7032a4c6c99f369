use clap::{Parser, Subcommand};
use clipboard::{ClipboardContext, ClipboardProvider};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arraykit::array::{self, DType, NumericArray};
use arraykit::codec::{self, ArrayCodec, CodecError};
use arraykit::config::{self, Config};
use arraykit::peaks::{self, MinDistance};

/// Peak finding, array merging and JSON array encoding
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find peaks in an encoded array or a WAV file
    Peaks(PeaksArgs),

    /// Add two encoded arrays of different lengths
    Merge(MergeArgs),

    /// Encode a plain JSON list of numbers
    Encode(EncodeArgs),

    /// Decode an encoded array to a plain JSON list
    Decode(DecodeArgs),
}

/// Find peaks in an encoded array or a WAV file
#[derive(Parser)]
struct PeaksArgs {
    /// Encoded array JSON file, or a .wav file
    #[arg(required = true)]
    input: String,

    /// Number of peaks to find [default: from config.toml]
    #[arg(short, long)]
    n_peaks: Option<usize>,

    /// Minimum distance between peaks, one value or one per axis (e.g. 3,5)
    #[arg(long, value_delimiter = ',', num_args = 1..=2)]
    min_dist: Vec<usize>,

    /// Search for minima instead of maxima
    #[arg(long)]
    minimum: bool,

    /// Normalized threshold [default: from config.toml]
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Print peak values instead of indices
    #[arg(long)]
    values: bool,

    /// For WAV input, search the magnitude spectrum instead of the samples
    #[arg(long)]
    spectrum: bool,

    /// For WAV input, search a spectrogram (frames x bins)
    #[arg(long, conflicts_with = "spectrum")]
    spectrogram: bool,

    /// FFT size for spectral WAV analysis [default: from config.toml]
    #[arg(long)]
    fft_size: Option<usize>,

    /// Hop size for spectrograms [default: from config.toml]
    #[arg(long)]
    hop: Option<usize>,

    /// Copy output to clipboard instead of console
    #[arg(short, long)]
    copy: bool,
}

/// Add two encoded arrays of different lengths
#[derive(Parser)]
struct MergeArgs {
    /// First encoded array JSON file
    #[arg(required = true)]
    first: String,

    /// Second encoded array JSON file
    #[arg(required = true)]
    second: String,

    /// Cut the result to the shorter input instead of keeping the longer tail
    #[arg(long)]
    truncate: bool,

    /// Copy output to clipboard instead of console
    #[arg(short, long)]
    copy: bool,
}

/// Encode a plain JSON list of numbers
#[derive(Parser)]
struct EncodeArgs {
    /// JSON file holding a number or a nested list of numbers
    #[arg(required = true)]
    input: String,

    /// Element type of the encoded array
    #[arg(long, default_value = "float64")]
    dtype: String,

    /// Copy output to clipboard instead of console
    #[arg(short, long)]
    copy: bool,
}

/// Decode an encoded array to a plain JSON list
#[derive(Parser)]
struct DecodeArgs {
    /// Encoded array JSON file
    #[arg(required = true)]
    input: String,
}

/// Reads a file, reporting a missing file with its path
fn read_input(path: &str) -> io::Result<String> {
    if !Path::new(path).exists() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Input file not found: {}", path),
        ));
    }
    fs::read_to_string(path)
}

fn load_encoded(path: &str, codec: &ArrayCodec) -> Result<NumericArray, Box<dyn std::error::Error>> {
    let text = read_input(path)?;
    Ok(codec.decode_from_text(&text)?)
}

#[cfg(feature = "audio")]
fn load_wav(args: &PeaksArgs, config: &Config) -> Result<NumericArray, Box<dyn std::error::Error>> {
    use arraykit::audio::{self, SpectrumConfig};

    read_input(&args.input)?;
    let wav_data = audio::read_wav_file(Path::new(&args.input))?;
    let mono = audio::to_mono_array(&wav_data)?;
    let samples = mono.as_slice::<f32>().unwrap_or_default();

    let spectrum_config = SpectrumConfig {
        fft_size: args.fft_size.unwrap_or(config.audio.fft_size),
        hop_size: args.hop.unwrap_or(config.audio.hop_size),
    };

    let array = if args.spectrogram {
        audio::spectrogram(samples, &spectrum_config)?
    } else if args.spectrum {
        audio::magnitude_spectrum(samples, spectrum_config.fft_size)?
    } else {
        mono.clone()
    };
    Ok(array)
}

#[cfg(not(feature = "audio"))]
fn load_wav(_args: &PeaksArgs, _config: &Config) -> Result<NumericArray, Box<dyn std::error::Error>> {
    Err("WAV input requires the `audio` feature".into())
}

/// Writes `output` to the console or the clipboard
fn emit(output: String, copy: bool) -> Result<(), Box<dyn std::error::Error>> {
    if copy {
        ClipboardContext::new()
            .and_then(|mut ctx| ctx.set_contents(output))
            .map_err(|e| format!("Failed to copy to clipboard: {}", e))?;
        println!("Successfully copied to clipboard!");
    } else {
        io::stdout().write_all(output.as_bytes())?;
        println!();
    }
    Ok(())
}

fn run_peaks_command(args: &PeaksArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let is_wav = args.input.to_lowercase().ends_with(".wav");
    let array = if is_wav {
        load_wav(args, config)?
    } else {
        load_encoded(&args.input, &config.codec.codec())?
    };
    info!(
        "Searching {} array of shape {:?}",
        array.dtype(),
        array.shape()
    );

    let mut options = config.peaks.options();
    if args.minimum {
        options = options.find_minimum(true);
    }
    if let Some(threshold) = args.threshold {
        options = options.with_threshold(threshold);
    }
    if !args.min_dist.is_empty() {
        options.min_dist = Some(MinDistance::from_slice(&args.min_dist)?);
    }
    let n_peaks = args.n_peaks.unwrap_or(config.peaks.n_peaks);

    let output = if args.values {
        let values = peaks::find_peak_values(&array, n_peaks, &options)?;
        match codec::to_plain_json(&values)? {
            serde_json::Value::Array(items) => items
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<String>>()
                .join(","),
            other => other.to_string(),
        }
    } else {
        let indices = peaks::find_peak_indices(&array, n_peaks, &options)?;
        indices
            .iter()
            .map(|idx| idx.to_string())
            .collect::<Vec<String>>()
            .join(",")
    };

    emit(output, args.copy)
}

fn run_merge_command(args: &MergeArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let codec = config.codec.codec();
    let first = load_encoded(&args.first, &codec)?;
    let second = load_encoded(&args.second, &codec)?;

    let merged = array::add_mismatched(&first, &second, args.truncate)?;
    info!("Merged into {} array of shape {:?}", merged.dtype(), merged.shape());

    emit(codec.encode_to_text(&merged)?, args.copy)
}

fn run_encode_command(args: &EncodeArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let dtype: DType = args.dtype.parse()?;
    let text = read_input(&args.input)?;
    let value: serde_json::Value = serde_json::from_str(&text).map_err(CodecError::from)?;

    let array = codec::from_plain_json(&value, dtype)?;
    emit(config.codec.codec().encode_to_text(&array)?, args.copy)
}

fn run_decode_command(args: &DecodeArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let array = load_encoded(&args.input, &config.codec.codec())?;
    info!("Decoded {} array of shape {:?}", array.dtype(), array.shape());

    let plain = codec::to_plain_json(&array)?;
    emit(serde_json::to_string(&plain)?, false)
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = config::load_config()?;

    match &cli.command {
        Commands::Peaks(args) => run_peaks_command(args, &config)?,
        Commands::Merge(args) => run_merge_command(args, &config)?,
        Commands::Encode(args) => run_encode_command(args, &config)?,
        Commands::Decode(args) => run_decode_command(args, &config)?,
    }

    Ok(())
}

fn main() {
    // Logs go to stderr so stdout stays clean for piping
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arraykit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run() {
        Ok(_) => {}
        Err(err) => {
            eprintln!("\nERROR: {}\n", err);
            match err.downcast_ref::<io::Error>() {
                Some(io_err) if io_err.kind() == io::ErrorKind::NotFound => {
                    eprintln!("Please check that:");
                    eprintln!("1. The file path is correct");
                    eprintln!("2. The file exists");
                    eprintln!("3. You have permission to read the file");
                }
                _ => {}
            }
            process::exit(1);
        }
    }
}
