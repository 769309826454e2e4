//! Output directory management and replay file serialization.
//!
//! One file per generated [`ReplayFile`], named by an incrementing index
//! with an optional prefix. Serialization is generic over any `Write`
//! sink so tests can target a `Vec<u8>`.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use mockwire_core::ReplayFile;

/// On-disk serialization format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// YAML, the default.
    Yaml,
    /// Pretty-printed JSON (2-space indent).
    Json,
}

impl OutputFormat {
    /// File extension for the format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }
}

/// Writes a corpus into an output directory, one file per call.
pub struct CorpusWriter {
    dir: PathBuf,
    prefix: Option<String>,
    format: OutputFormat,
    index: u64,
}

impl CorpusWriter {
    /// Prepare the output directory.
    ///
    /// An existing directory is a configuration error unless `force` is
    /// set, in which case it is removed first. A file at the output path
    /// is always an error.
    pub fn create(
        dir: &Path,
        prefix: Option<&str>,
        format: OutputFormat,
        force: bool,
    ) -> Result<Self> {
        if dir.is_file() {
            bail!("output path {} is a file, expected a directory", dir.display());
        }
        if dir.exists() {
            if !force {
                bail!(
                    "output directory {} already exists (pass --force to replace it)",
                    dir.display()
                );
            }
            fs::remove_dir_all(dir)
                .with_context(|| format!("remove existing output directory {}", dir.display()))?;
        }
        fs::create_dir_all(dir)
            .with_context(|| format!("create output directory {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            prefix: prefix.map(str::to_string),
            format,
            index: 0,
        })
    }

    /// Serialize one replay file, returning the path written.
    pub fn write(&mut self, file: &ReplayFile) -> Result<PathBuf> {
        let path = self
            .dir
            .join(file_name(self.prefix.as_deref(), self.index, self.format));
        let out = fs::File::create(&path)
            .with_context(|| format!("create replay file {}", path.display()))?;
        write_records(BufWriter::new(out), file, self.format)
            .with_context(|| format!("serialize replay file {}", path.display()))?;
        self.index += 1;
        Ok(path)
    }
}

/// Serialize a replay file to any sink in the given format.
pub fn write_records<W: Write>(mut sink: W, file: &ReplayFile, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => serde_json::to_writer_pretty(&mut sink, file)?,
        OutputFormat::Yaml => serde_yaml::to_writer(&mut sink, file)?,
    }
    sink.flush()?;
    Ok(())
}

fn file_name(prefix: Option<&str>, index: u64, format: OutputFormat) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}_{index}.{}", format.extension()),
        None => format!("{index}.{}", format.extension()),
    }
}
