//! Reading cmdline sources into a descriptor registry

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use dracut_net_core::{DescriptorRegistry, Result, SourceError};

use crate::context::ParseContext;
use crate::hostname::{FixedHostname, HostnameLookup};
use crate::scanner::LineScanner;
use crate::variables::dispatch;
use crate::words::ParameterWords;

/// Sources read when no explicit path is given, in order
pub const DEFAULT_SOURCES: &[&str] = &["/etc/cmdline", "/etc/cmdline.d/", "/proc/cmdline"];

/// Extension of the files read from a cmdline directory
const CONF_EXTENSION: &str = "conf";

/// Reader settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReaderOptions {
    /// Prefix for every source path, e.g. the root of an initrd image
    pub root: Option<PathBuf>,
    /// Hostname sent along with DHCP requests
    pub hostname: Option<String>,
}

/// Outcome of reading one or more sources
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadSummary {
    pub sources: Vec<PathBuf>,
    pub accepted: usize,
    pub rejected: usize,
    /// Set when the default locations were consulted
    pub defaults: bool,
}

impl ReadSummary {
    /// True when a source was processed or the defaults were used
    pub fn ok(&self) -> bool {
        self.defaults || !self.sources.is_empty()
    }

    fn merge(&mut self, other: ReadSummary) {
        self.sources.extend(other.sources);
        self.accepted += other.accepted;
        self.rejected += other.rejected;
    }
}

/// Parser for dracut cmdline sources
pub struct CmdlineReader {
    options: ReaderOptions,
    lookup: Box<dyn HostnameLookup>,
}

impl CmdlineReader {
    /// Reader using the configured hostname, if any, for DHCP
    pub fn new(options: ReaderOptions) -> Self {
        let lookup = Box::new(FixedHostname(options.hostname.clone()));
        Self { options, lookup }
    }

    /// Reader with a custom hostname lookup
    pub fn with_lookup(options: ReaderOptions, lookup: impl HostnameLookup + 'static) -> Self {
        Self {
            options,
            lookup: Box::new(lookup),
        }
    }

    /// Parse cmdline text; `filename` is recorded as the descriptors' origin
    pub fn parse_str(
        &self,
        text: &str,
        filename: &str,
        registry: &mut DescriptorRegistry,
    ) -> ReadSummary {
        let mut ctx = ParseContext::new(registry, filename, self.lookup.as_ref());
        let mut summary = ReadSummary::default();

        for (lineno, line) in text.lines().enumerate() {
            let mut scanner = LineScanner::new();
            scanner.feed_line(line);
            if scanner.unterminated_quotes() > 0 {
                log::warn!(
                    "{}:{}: unterminated quote closed at end of line",
                    filename,
                    lineno + 1
                );
            }

            for assignment in scanner.finish() {
                log::trace!("{}:{}: {}", filename, lineno + 1, assignment);
                let words = match assignment.value.as_deref() {
                    Some(value) => {
                        let (words, valid) = ParameterWords::from_value(value);
                        if !valid {
                            log::warn!(
                                "{}:{}: invalid quoting in {}",
                                filename,
                                lineno + 1,
                                assignment
                            );
                        }
                        words
                    }
                    None => ParameterWords::default(),
                };

                match dispatch(&assignment.name, &words, &mut ctx) {
                    Ok(()) => summary.accepted += 1,
                    Err(_) => summary.rejected += 1,
                }
            }
        }

        log::debug!(
            "{}: {} assignments accepted, {} rejected",
            filename,
            summary.accepted,
            summary.rejected
        );
        summary
    }

    /// Read and parse one file
    pub fn read_file(&self, path: &Path, registry: &mut DescriptorRegistry) -> Result<ReadSummary> {
        let bytes = fs::read(path).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes);

        log::debug!("Reading cmdline from {}", path.display());
        let mut summary = self.parse_str(&text, &path.display().to_string(), registry);
        summary.sources.push(path.to_path_buf());
        Ok(summary)
    }

    /// Read every `*.conf` file of a directory, in filename order
    ///
    /// An unreadable file is skipped with a warning.
    pub fn read_dir(&self, path: &Path, registry: &mut DescriptorRegistry) -> Result<ReadSummary> {
        let read_err = |source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(path).map_err(read_err)? {
            let file = entry.map_err(read_err)?.path();
            if file.is_file() && file.extension().is_some_and(|ext| ext == CONF_EXTENSION) {
                files.push(file);
            }
        }
        files.sort();

        let mut summary = ReadSummary::default();
        for file in &files {
            match self.read_file(file, registry) {
                Ok(file_summary) => summary.merge(file_summary),
                Err(err) => log::warn!("Skipping {}: {}", file.display(), err),
            }
        }

        if summary.sources.is_empty() {
            log::debug!("No cmdline configuration files found in {}", path.display());
        }
        Ok(summary)
    }

    /// Read an explicit source, or the default locations when `path` is None
    ///
    /// A missing explicit source is an error; missing default locations are
    /// skipped.
    pub fn read(&self, path: Option<&Path>, registry: &mut DescriptorRegistry) -> Result<ReadSummary> {
        match path {
            Some(path) => {
                let full = self.resolve(path);
                self.read_source(&full, registry)?.ok_or_else(|| {
                    log::error!("Cmdline source {} is not available", full.display());
                    SourceError::Unavailable { path: full }.into()
                })
            }
            None => {
                let mut summary = ReadSummary {
                    defaults: true,
                    ..ReadSummary::default()
                };
                for source in DEFAULT_SOURCES {
                    let full = self.resolve(Path::new(source));
                    match self.read_source(&full, registry) {
                        Ok(Some(source_summary)) => summary.merge(source_summary),
                        Ok(None) => log::trace!("{} does not exist", full.display()),
                        Err(err) => log::warn!("Skipping {}: {}", full.display(), err),
                    }
                }
                Ok(summary)
            }
        }
    }

    /// Read a file or directory; `None` when the path is neither
    fn read_source(
        &self,
        path: &Path,
        registry: &mut DescriptorRegistry,
    ) -> Result<Option<ReadSummary>> {
        if path.is_file() {
            self.read_file(path, registry).map(Some)
        } else if path.is_dir() {
            self.read_dir(path, registry).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Place a path below the configured root
    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.options.root {
            Some(root) => root.join(path.strip_prefix("/").unwrap_or(path)),
            None => path.to_path_buf(),
        }
    }
}
