use std::fs;
use std::path::{Path, PathBuf};

use dc6::{convert, dc6_decode, ConvertError, ConvertOptions, OutputKind, Palette};
use log::{error, info};
use rayon::prelude::*;

use crate::output::ImageFileSink;
use crate::CliError;

/// Everything a single file conversion needs; shared read-only across workers.
pub struct Job {
    pub output_dir: PathBuf,
    pub palette: Palette,
    pub options: ConvertOptions,
}

/// Result of one file conversion.
pub struct FileReport {
    pub input: PathBuf,
    pub result: Result<(OutputKind, Vec<PathBuf>), CliError>,
}

/// Returns `input` itself for a file, or every `*.dc6` file (any case)
/// directly inside a directory, sorted by name.
pub fn discover(input: &Path) -> Result<Vec<PathBuf>, CliError> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(CliError::MissingInput(input.to_path_buf()));
    }

    let entries = fs::read_dir(input).map_err(|source| CliError::Io {
        path: input.to_path_buf(),
        source,
    })?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("dc6"))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Decodes and writes one file.
pub fn convert_file(path: &Path, job: &Job) -> Result<(OutputKind, Vec<PathBuf>), CliError> {
    info!("Converting image: {}...", path.display());

    let data = fs::read(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = dc6_decode(&data)?;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sprite".to_string());
    let mut sink = ImageFileSink::new(&job.output_dir, &stem);

    let kind = convert(&image, &job.palette, &job.options, &mut sink).map_err(|e| match e {
        ConvertError::Decode(e) => CliError::Decode(e),
        ConvertError::Sink(e) => e,
    })?;
    Ok((kind, sink.into_saved()))
}

/// Converts all files in parallel. A failing file is logged and reported,
/// the remaining files are still converted.
pub fn convert_all(files: &[PathBuf], job: &Job) -> Vec<FileReport> {
    files
        .par_iter()
        .map(|path| {
            let result = convert_file(path, job);
            if let Err(e) = &result {
                error!("{}: {}", path.display(), e);
            }
            FileReport {
                input: path.clone(),
                result,
            }
        })
        .collect()
}
