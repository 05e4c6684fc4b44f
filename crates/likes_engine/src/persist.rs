use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use likes_core::{ItemLink, LinkSet};
use tempfile::NamedTempFile;
use thiserror::Error;

pub const RAW_LINKS_FILE: &str = "links.txt";
pub const FILTERED_LINKS_FILE: &str = "filtered_links.txt";
pub const FAILED_LINKS_FILE: &str = "failed_links.txt";
pub const LOG_FILE: &str = "log.txt";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PersistError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Create `dir` if missing and check that it is a writable directory.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Newline-delimited UTF-8 link lists plus the append-only user log.
///
/// Lists are replaced atomically (temp file then rename) so a crash never
/// leaves a half-written replay source behind.
#[derive(Debug, Clone)]
pub struct LinkStore {
    dir: PathBuf,
    log_file: String,
    /// Set once the directory passed the writability check for log appends.
    log_dir_checked: OnceLock<()>,
}

impl LinkStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            log_file: LOG_FILE.to_string(),
            log_dir_checked: OnceLock::new(),
        }
    }

    pub fn with_log_file(mut self, name: impl Into<String>) -> Self {
        self.log_file = name.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// All discovered links, sorted.
    pub fn write_raw(&self, links: &LinkSet) -> Result<PathBuf, PersistError> {
        self.replace(RAW_LINKS_FILE, &join_lines(links.iter()))
    }

    /// Links that survived filtering; expected to be sorted already.
    pub fn write_filtered(&self, links: &[ItemLink]) -> Result<PathBuf, PersistError> {
        self.replace(FILTERED_LINKS_FILE, &join_lines(links))
    }

    pub fn read_filtered(&self) -> Result<Vec<ItemLink>, PersistError> {
        self.read_list(FILTERED_LINKS_FILE)
    }

    /// Failed links in attempt order.
    pub fn write_failed(&self, links: &[ItemLink]) -> Result<PathBuf, PersistError> {
        self.replace(FAILED_LINKS_FILE, &join_lines(links))
    }

    /// Empty when no failed list exists.
    pub fn read_failed(&self) -> Result<Vec<ItemLink>, PersistError> {
        match self.read_list(FAILED_LINKS_FILE) {
            Err(PersistError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Ok(Vec::new())
            }
            other => other,
        }
    }

    pub fn clear_failed(&self) -> Result<(), PersistError> {
        let path = self.path_of(FAILED_LINKS_FILE);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(PersistError::io(&path, err)),
        }
    }

    pub fn append_log_line(&self, line: &str) -> Result<(), PersistError> {
        if self.log_dir_checked.get().is_none() {
            ensure_output_dir(&self.dir)?;
            let _ = self.log_dir_checked.set(());
        }
        let path = self.path_of(&self.log_file);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| PersistError::io(&path, e))?;
        // Multi-line messages (captured stderr) still land one text line each.
        for text_line in line.lines() {
            writeln!(file, "{text_line}").map_err(|e| PersistError::io(&path, e))?;
        }
        Ok(())
    }

    fn read_list(&self, name: &str) -> Result<Vec<ItemLink>, PersistError> {
        let path = self.path_of(name);
        let content = fs::read_to_string(&path).map_err(|e| PersistError::io(&path, e))?;
        Ok(content.lines().filter_map(ItemLink::normalize).collect())
    }

    fn replace(&self, name: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.path_of(name);
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| PersistError::io(&self.dir, e))?;
        write_synced(&mut tmp, content).map_err(|e| PersistError::io(&target, e))?;
        tmp.persist(&target)
            .map_err(|e| PersistError::io(&target, e.error))?;
        Ok(target)
    }
}

fn write_synced(tmp: &mut NamedTempFile, content: &str) -> io::Result<()> {
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()
}

fn join_lines<'a, I>(links: I) -> String
where
    I: IntoIterator<Item = &'a ItemLink>,
{
    links
        .into_iter()
        .map(ItemLink::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}
