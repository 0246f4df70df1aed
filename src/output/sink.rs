use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, LineWriter, Write};
use std::path::PathBuf;

/// Indentation written per depth level
pub const INDENT: &str = "  ";

/// Where the link hierarchy is written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    /// Opens the target for writing
    ///
    /// Files are truncated for a fresh trace and appended to when `append`
    /// is set, so a resumed trace continues the earlier hierarchy. Both
    /// targets are line-buffered: every completed record is on disk before
    /// the next fetch, even if the process exits without flushing.
    pub fn open(&self, append: bool) -> io::Result<Box<dyn Write + Send>> {
        match self {
            Self::Stdout => Ok(Box::new(io::stdout())),
            Self::File(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .write(true)
                    .append(append)
                    .truncate(!append)
                    .open(path)?;
                Ok(Box::new(LineWriter::new(file)))
            }
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("<stdout>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Writes link records: indentation proportional to depth, then the URL
pub struct LinkWriter<W: Write> {
    inner: W,
}

impl<W: Write> LinkWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Writes one link record
    pub fn write_link(&mut self, depth: u32, url: &str) -> io::Result<()> {
        for _ in 0..depth {
            self.inner.write_all(INDENT.as_bytes())?;
        }
        writeln!(self.inner, "{}", url)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
