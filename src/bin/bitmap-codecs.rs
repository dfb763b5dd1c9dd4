//! bitmap-codecs CLI - compress and restore bitmap indexes with WAH or BBC.

use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use bitmap_codecs::bridge::{analyze_bitmap, compress_bitmap, decompress_bitmap};
use bitmap_codecs::config::DEFAULT_WORD_SIZE;
use bitmap_codecs::kernels::dispatch_compress;
use bitmap_codecs::{BitVector, CodecConfig, CodecKind, EmptyInputPolicy};

/// Index-friendly bitmap compression (WAH / BBC)
#[derive(Parser, Debug)]
#[command(name = "bitmap-codecs")]
#[command(version, about = "Compress bitmap indexes with WAH or BBC", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Accept zero-length input instead of failing
    #[arg(long, global = true)]
    allow_empty: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compress a bitmap
    Compress {
        #[command(flatten)]
        codec: CodecChoice,

        /// Word size for WAH (ignored by BBC)
        #[arg(long, default_value_t = DEFAULT_WORD_SIZE)]
        word_size: usize,

        /// Treat input as '0'/'1' text instead of raw bytes
        #[arg(long)]
        text: bool,

        /// Write only the compressed bits, without the artifact header
        #[arg(long)]
        raw: bool,

        /// Input file (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Restore a bitmap from an artifact written by `compress`
    Decompress {
        /// Write '0'/'1' text instead of raw bytes
        #[arg(long)]
        text: bool,

        /// Input file (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print artifact statistics as JSON
    Inspect {
        /// Input file (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct CodecChoice {
    /// Word-aligned hybrid compression
    #[arg(long)]
    wah: bool,

    /// Byte-aligned bitmap code compression
    #[arg(long)]
    bbc: bool,
}

impl CodecChoice {
    fn kind(&self) -> CodecKind {
        if self.bbc {
            CodecKind::Bbc
        } else {
            CodecKind::Wah
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_file.as_deref())?;

    let empty_input = if cli.allow_empty {
        EmptyInputPolicy::Allow
    } else {
        EmptyInputPolicy::Reject
    };

    match cli.command {
        Commands::Compress {
            codec,
            word_size,
            text,
            raw,
            input,
            output,
        } => {
            let config = CodecConfig {
                codec: codec.kind(),
                word_size,
                empty_input,
            };
            config.validate()?;

            let data = read_input(input.as_deref())?;
            let bits = if text {
                parse_text(&data)?
            } else {
                BitVector::from_bytes(&data)
            };

            let out = if raw {
                let result = dispatch_compress(&bits, &config)?;
                log::info!("Bits used in final word: {}", result.final_length());
                render(result.bits(), text)
            } else {
                compress_bitmap(&bits, &config)?
            };
            write_output(output.as_deref(), &out)?;
        }
        Commands::Decompress {
            text,
            input,
            output,
        } => {
            let data = read_input(input.as_deref())?;
            let bits = decompress_bitmap(&data).context("Failed to decompress artifact")?;
            write_output(output.as_deref(), &render(&bits, text))?;
        }
        Commands::Inspect { input } => {
            let data = read_input(input.as_deref())?;
            let stats = analyze_bitmap(&data).context("Failed to read artifact header")?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}

fn init_logging(level: &str, log_file: Option<&Path>) -> Result<()> {
    let level = LevelFilter::from_str(level)
        .map_err(|_| anyhow::anyhow!("Invalid log level: {}", level))?;

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);

    // Custom formatter: just print the level and message
    builder.format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()));

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("Could not open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    let _ = builder.try_init();
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        None => {
            let mut data = Vec::new();
            io::stdin()
                .read_to_end(&mut data)
                .context("Failed to read stdin")?;
            Ok(data)
        }
    }
}

fn write_output(path: Option<&Path>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Parses '0'/'1' text, ignoring whitespace and line breaks.
fn parse_text(data: &[u8]) -> Result<BitVector> {
    let text = std::str::from_utf8(data).context("Text input is not valid UTF-8")?;
    let bits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(bits.parse()?)
}

fn render(bits: &BitVector, text: bool) -> Vec<u8> {
    if text {
        format!("{}\n", bits).into_bytes()
    } else {
        bits.to_bytes()
    }
}
