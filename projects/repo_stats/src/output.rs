use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const DEFAULT_OUTPUT_PATH: &str = "data.csv";

#[derive(Debug, Error)]
pub enum WriteStatsCsvError {
    #[error("CreateFile: {path}: {source}")]
    CreateFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("WriteFile: {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Creates (or truncates) `path` and writes the repository name then the
/// star count, one per line.
pub fn write_stats_csv(
    path: &Path,
    repo_name: &str,
    stars: u64,
) -> Result<(), WriteStatsCsvError> {
    let file = File::create(path).map_err(|source| WriteStatsCsvError::CreateFile {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = BufWriter::new(file);
    writeln!(writer, "{repo_name}\n{stars}")
        .and_then(|()| writer.flush())
        .map_err(|source| WriteStatsCsvError::WriteFile {
            path: path.to_path_buf(),
            source,
        })
}
