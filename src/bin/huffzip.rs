use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::builder::NonEmptyStringValueParser;
use clap::{ArgAction, Parser, Subcommand};
use huffzip::{CodecConfig, CodecStats, FileCodec};
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

#[derive(Parser, Debug)]
#[command(name = "huffzip")]
#[command(about = "Compress and decompress text files with Huffman coding")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only report errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a text file into <INPUT><SUFFIX>
    Compress {
        /// Input text file
        input: PathBuf,

        /// Threads for frequency counting (0 = auto, 1 = single pass)
        #[arg(short = 't', long, default_value = "1")]
        threads: usize,

        /// Artifact suffix appended to the input path
        #[arg(
            long,
            default_value = huffzip::DEFAULT_ARTIFACT_SUFFIX,
            value_parser = NonEmptyStringValueParser::new()
        )]
        suffix: String,
    },
    /// Decompress an artifact into <INPUT without SUFFIX>_decompressed.txt
    Decompress {
        /// Input artifact
        input: PathBuf,

        /// Artifact suffix to strip from the input path
        #[arg(
            long,
            default_value = huffzip::DEFAULT_ARTIFACT_SUFFIX,
            value_parser = NonEmptyStringValueParser::new()
        )]
        suffix: String,
    },
    /// Print an artifact's code table and payload layout
    Inspect {
        /// Input artifact
        input: PathBuf,

        /// Maximum number of table entries to print (0 = all)
        #[arg(short = 'n', long, default_value = "0")]
        limit: usize,
    },
}

const EXIT_OK: u8 = 0;
const EXIT_ERROR: u8 = 1;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    match run(args) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn init_logging(args: &Args) {
    let level = if args.quiet {
        LevelFilter::Error
    } else {
        match args.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    if let Err(e) =
        TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)
    {
        eprintln!("Warning: could not initialize logging: {}", e);
    }
}

fn run(args: Args) -> Result<u8, Box<dyn std::error::Error>> {
    let verbose = args.verbose > 0;

    match args.command {
        Command::Compress { input, threads, suffix } => {
            let config =
                CodecConfig { num_threads: threads, artifact_suffix: suffix, ..Default::default() };
            let start = std::time::Instant::now();
            let (output, stats) = FileCodec::new(config).compress_file(&input)?;
            if verbose {
                print_stats("Compression", &output, &stats, start.elapsed());
            }
            println!("{}", output.display());
        }
        Command::Decompress { input, suffix } => {
            let config = CodecConfig { artifact_suffix: suffix, ..Default::default() };
            let start = std::time::Instant::now();
            let (output, stats) = FileCodec::new(config).decompress_file(&input)?;
            if verbose {
                print_stats("Decompression", &output, &stats, start.elapsed());
            }
            println!("{}", output.display());
        }
        Command::Inspect { input, limit } => inspect(&input, limit)?,
    }

    Ok(EXIT_OK)
}

fn print_stats(label: &str, output: &Path, stats: &CodecStats, elapsed: std::time::Duration) {
    eprintln!("{} complete:", label);
    eprintln!("  Output:           {}", output.display());
    eprintln!("  Input bytes:      {}", stats.input_bytes);
    eprintln!("  Output bytes:     {}", stats.output_bytes);
    eprintln!("  Distinct symbols: {}", stats.distinct_symbols);
    eprintln!("  Encoded bits:     {}", stats.encoded_bits);
    eprintln!("  Padding bits:     {}", stats.padding_bits);
    eprintln!("  Time:             {:.2?}", elapsed);
}

fn inspect(path: &Path, limit: usize) -> Result<(), Box<dyn std::error::Error>> {
    let (artifact, size) = FileCodec::default().read_artifact_file(path)?;
    let padding = artifact.payload.first().copied().unwrap_or(0);
    let encoded_bits =
        (artifact.payload.len().saturating_sub(1) * 8).saturating_sub(padding as usize);

    println!("Artifact:         {}", path.display());
    println!("Size:             {} bytes", size);
    println!("Symbols:          {}", artifact.table.len());
    println!("Longest code:     {} bits", artifact.table.max_code_len());
    println!("Payload:          {} bytes", artifact.payload.len());
    println!("Encoded bits:     {}", encoded_bits);
    println!("Padding bits:     {}", padding);

    let entries = artifact.table.entries_by_code();
    let shown = if limit == 0 { entries.len() } else { limit.min(entries.len()) };
    if shown > 0 {
        println!();
        println!("{:<12} {:>5}  code", "symbol", "bits");
    }
    for (code, symbol) in entries.iter().take(shown) {
        println!("{:<12} {:>5}  {}", format!("{:?}", symbol), code.len(), code);
    }
    if shown < entries.len() {
        println!("... {} more", entries.len() - shown);
    }
    Ok(())
}
