use clap::{Parser, ValueEnum};
use log::LevelFilter;
use mp2k_meta::report::{self, IndexTable, ReportWriter};
use mp2k_meta::{DurationMode, Extractor};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mp2k-meta")]
#[command(version = "0.1.0")]
#[command(about = "Extract track metadata from MusicPlayer2000 sound scripts", long_about = None)]
struct Args {
    /// Directory containing .s sound scripts (searched recursively)
    script_dir: PathBuf,

    /// Optional Name,Index table used to fill the Index column
    indices: Option<PathBuf>,

    /// Output file (writes to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report lengths in seconds instead of ticks
    #[arg(long)]
    seconds: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Output compact JSON (default is pretty-printed)
    #[arg(short, long)]
    compact: bool,

    /// Print warnings about unexpected script structure
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Csv,
    Json,
}

fn main() -> Result<(), mp2k_meta::Error> {
    let args = Args::parse();

    env_logger::builder()
        .filter_level(if args.verbose {
            LevelFilter::Warn
        } else {
            LevelFilter::Error
        })
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "* {}: {}", record.level(), record.args()))
        .init();

    let mode = if args.seconds {
        DurationMode::Seconds
    } else {
        DurationMode::Ticks
    };

    let mut extractor = Extractor::new(mode);
    if let Some(path) = &args.indices {
        extractor = extractor.with_indices(IndexTable::load(path)?);
    }

    // No output is written until every script has been read
    let tracks = extractor.extract_dir(&args.script_dir)?;

    let mut output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    match args.format {
        Format::Csv => {
            let mut writer = ReportWriter::new(&mut output, mode)?;
            for track in &tracks {
                writer.write(track)?;
            }
            writer.finish()?;
        }
        Format::Json => {
            report::write_json(&mut output, &tracks, !args.compact)?;
            output.flush()?;
        }
    }

    Ok(())
}
