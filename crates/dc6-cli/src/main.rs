//! dc6 - Bulk convert DC6 sprites
//!
//! A command-line tool that turns DC6 sprite files into PNG stills or
//! animated GIFs.

mod batch;
mod output;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dc6::{ConversionMode, ConvertOptions, Dc6Error, Disposal, Palette};
use log::{error, info};
use thiserror::Error;

use crate::batch::Job;

#[derive(Parser)]
#[command(name = "dc6")]
#[command(version)]
#[command(about = "Convert DC6 sprites to PNG or GIF", long_about = None)]
#[command(after_help = "Without -f, single-frame sprites become PNG and animations become GIF.")]
struct Cli {
    /// DC6 file, or a directory whose *.dc6 files are converted
    input: PathBuf,

    /// Output directory, created if missing (default: current directory)
    output: Option<PathBuf>,

    /// Force the output format (auto, png or gif)
    #[arg(short = 'f', long = "force-format", default_value = "auto")]
    format: ConversionMode,

    /// Palette file: pal.dat (256 BGR entries) or a 1024-byte BGRX table
    #[arg(short, long)]
    palette: Option<PathBuf>,

    /// GIF frame delay in centiseconds
    #[arg(short, long, default_value_t = 10)]
    delay: u16,

    /// Number of worker threads (default: one per core)
    #[arg(short, long)]
    jobs: Option<usize>,
}

/// Errors for a whole run or a single file.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("the path {0} does not exist")]
    MissingInput(PathBuf),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Decode(#[from] Dc6Error),

    #[error("PNG encoding failed: {0}")]
    Png(#[from] image::ImageError),

    #[error("GIF encoding failed: {0}")]
    Gif(#[from] gif::EncodingError),

    #[error("{width}x{height} exceeds the GIF size limit")]
    GifDimensions { width: usize, height: usize },

    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Returns the number of files that failed.
fn run(cli: Cli) -> Result<usize, CliError> {
    let palette = match &cli.palette {
        Some(path) => {
            let data = fs::read(path).map_err(|source| CliError::Io {
                path: path.clone(),
                source,
            })?;
            Palette::from_pal_dat(&data)?
        }
        None => Palette::grayscale(),
    };

    if let Some(threads) = cli.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    let files = batch::discover(&cli.input)?;

    let output_dir = cli.output.unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir).map_err(|source| CliError::Io {
        path: output_dir.clone(),
        source,
    })?;

    if cli.input.is_dir() {
        info!(
            "Converting {} files from: {}, to: {}...",
            files.len(),
            cli.input.display(),
            output_dir.display()
        );
    }

    let job = Job {
        output_dir,
        palette,
        options: ConvertOptions {
            mode: cli.format,
            delay: cli.delay,
            disposal: Disposal::RestoreToBackground,
            ..ConvertOptions::default()
        },
    };

    let reports = batch::convert_all(&files, &job);
    let failed = reports.iter().filter(|r| r.result.is_err()).count();
    let images: usize = reports
        .iter()
        .filter_map(|r| r.result.as_ref().ok())
        .map(|(_, saved)| saved.len())
        .sum();

    info!(
        "Done: {} of {} files converted, {} images written, {} failed",
        reports.len() - failed,
        reports.len(),
        images,
        failed
    );
    Ok(failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_original_argument_layout() {
        let cli = Cli::try_parse_from(["dc6", "sprites", "out", "-f", "GIF"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("sprites"));
        assert_eq!(cli.output, Some(PathBuf::from("out")));
        assert_eq!(cli.format, ConversionMode::Gif);
        assert_eq!(cli.delay, 10);

        let cli = Cli::try_parse_from(["dc6", "invgold.dc6", "--force-format", "png"]).unwrap();
        assert_eq!(cli.output, None);
        assert_eq!(cli.format, ConversionMode::Png);
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["dc6", "x.dc6", "-f", "bmp"]).is_err());
        assert!(Cli::try_parse_from(["dc6", "x.dc6", "-f"]).is_err());
    }

    #[test]
    fn run_reports_failed_files() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("broken.dc6"), [6u8, 0, 0, 0]).unwrap();
        let cli = Cli::try_parse_from([
            "dc6".into(),
            tmp.path().as_os_str().to_owned(),
            tmp.path().join("out").into_os_string(),
        ])
        .unwrap();
        assert_eq!(run(cli).unwrap(), 1);
        assert!(tmp.path().join("out").is_dir());
    }
}
