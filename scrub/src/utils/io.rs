// scrub/src/utils/io.rs
//! Input sources and output sinks selected by `-i`/`-o`.
//!
//! Both sides work on whole buffers. The source is read completely before
//! anything is redacted. File outputs are staged in a temporary file next to
//! their target and only renamed into place by [`Staged::commit`], once every
//! output of the run has been prepared.

use anyhow::{bail, Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Path argument that selects stdin or stdout.
pub const STDIO_SENTINEL: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some(STDIO_SENTINEL) => Self::Stdin,
            Some(path) => Self::File(PathBuf::from(path)),
        }
    }

    /// Identifier used in messages and errors.
    pub fn id(&self) -> String {
        match self {
            Self::Stdin => "<stdin>".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }

    /// Reads the whole input as raw bytes.
    pub fn read(&self) -> Result<Vec<u8>> {
        match self {
            Self::Stdin => {
                let stdin = io::stdin();
                if stdin.is_terminal() {
                    bail!("No input provided: pass -i <PATH> or pipe text on stdin.");
                }
                info!("Reading input from stdin...");
                let mut buf = Vec::new();
                stdin.lock().read_to_end(&mut buf).context("Failed to read from stdin")?;
                Ok(buf)
            }
            Self::File(path) => {
                info!("Reading input from file: {}", path.display());
                fs::read(path).with_context(|| format!("Failed to read input file {}", path.display()))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    Stdout,
    File(PathBuf),
}

impl OutputSink {
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some(STDIO_SENTINEL) => Self::Stdout,
            Some(path) => Self::File(PathBuf::from(path)),
        }
    }

    /// Prepares `content` for this sink without touching the target. Content
    /// is written exactly, without adding a trailing newline.
    ///
    /// File content is written and synced to a temporary file in the target's
    /// directory. Stdout content is held in memory until commit.
    pub fn stage(&self, content: String) -> Result<Staged> {
        match self {
            Self::Stdout => Ok(Staged::Stdout(content)),
            Self::File(path) => {
                let parent = match path.parent() {
                    Some(dir) if !dir.as_os_str().is_empty() => dir,
                    _ => Path::new("."),
                };
                let mut temp = NamedTempFile::new_in(parent).with_context(|| {
                    format!("Failed to create a temporary file in {}", parent.display())
                })?;
                temp.write_all(content.as_bytes())
                    .and_then(|_| temp.as_file().sync_all())
                    .with_context(|| format!("Failed to stage output for {}", path.display()))?;
                debug!("Staged {} bytes for {}.", content.len(), path.display());
                Ok(Staged::File { temp, path: path.clone() })
            }
        }
    }
}

/// Output that is ready to be published.
#[derive(Debug)]
pub enum Staged {
    Stdout(String),
    File { temp: NamedTempFile, path: PathBuf },
}

impl Staged {
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    /// Publishes the output. A staged file replaces its target by rename.
    pub fn commit(self) -> Result<()> {
        match self {
            Self::Stdout(content) => {
                debug!("Writing {} bytes to stdout.", content.len());
                let stdout = io::stdout();
                let mut writer = stdout.lock();
                writer.write_all(content.as_bytes()).context("Failed to write to stdout")?;
                writer.flush().context("Failed to flush stdout")
            }
            Self::File { temp, path } => {
                info!("Writing output to file: {}", path.display());
                temp.persist(&path)
                    .with_context(|| format!("Failed to write output file {}", path.display()))?;
                Ok(())
            }
        }
    }
}

/// Commits file outputs first, then stdout. Dropping the list instead discards
/// every staged file.
pub fn commit_all(staged: Vec<Staged>) -> Result<()> {
    let (files, streams): (Vec<Staged>, Vec<Staged>) = staged.into_iter().partition(Staged::is_file);
    for output in files.into_iter().chain(streams) {
        output.commit()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_selects_stdio() {
        assert_eq!(InputSource::from_arg(Some("-")), InputSource::Stdin);
        assert_eq!(InputSource::from_arg(None), InputSource::Stdin);
        assert_eq!(OutputSink::from_arg(Some("-")), OutputSink::Stdout);
        assert_eq!(
            OutputSink::from_arg(Some("out.txt")),
            OutputSink::File(PathBuf::from("out.txt"))
        );
    }

    #[test]
    fn file_round_trip() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.txt");
        OutputSink::File(path.clone()).stage("no newline".to_string())?.commit()?;
        assert_eq!(InputSource::File(path).read()?, b"no newline");
        Ok(())
    }

    #[test]
    fn staged_file_is_invisible_until_commit() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.txt");
        fs::write(&path, "previous")?;

        let staged = OutputSink::File(path.clone()).stage("redacted".to_string())?;
        assert_eq!(fs::read_to_string(&path)?, "previous");

        staged.commit()?;
        assert_eq!(fs::read_to_string(&path)?, "redacted");
        assert_eq!(fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }

    #[test]
    fn dropped_stage_leaves_nothing_behind() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.txt");
        drop(OutputSink::File(path.clone()).stage("redacted".to_string())?);
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path())?.count(), 0);
        Ok(())
    }

    #[test]
    fn staging_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/report.json");
        assert!(OutputSink::File(path).stage("{}".to_string()).is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = InputSource::from_arg(Some("/no/such/input.txt")).read().unwrap_err();
        assert!(err.to_string().contains("/no/such/input.txt"));
    }
}
