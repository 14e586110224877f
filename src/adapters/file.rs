// SPDX-License-Identifier: MIT OR Apache-2.0

//! File-backed configuration provider, generic over the file format.
//!
//! [`FileConfigProvider`] handles everything about a configuration file except
//! its syntax: resolving the path, optional files, size limits, load error
//! handling, and reloading when the file changes. The syntax is delegated to a
//! [`ConfigParser`].

use crate::domain::{ChangeToken, ConfigData, ConfigError, ProviderData, Result};
use crate::ports::{ConfigParser, ConfigProvider, ConfigSource};
use crate::service::ConfigBuilder;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Maximum allowed file size for configuration files (10MB)
/// This prevents denial of service attacks via extremely large files
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Default delay between a file change and the reload it triggers.
pub const DEFAULT_RELOAD_DELAY: Duration = Duration::from_millis(250);

/// What a load error handler sees.
///
/// Setting `ignore` swallows the error: the load succeeds and the provider
/// keeps whatever data it holds (empty on a reload).
#[derive(Debug)]
pub struct FileLoadErrorContext<'a> {
    /// Name of the failing provider.
    pub provider: &'a str,
    /// The file that failed to load.
    pub path: &'a Path,
    /// The error.
    pub error: &'a ConfigError,
    /// Set to `true` to swallow the error.
    pub ignore: bool,
}

/// Callback consulted when a file fails to load.
pub type FileLoadErrorHandler = Arc<dyn Fn(&mut FileLoadErrorContext<'_>) + Send + Sync>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A configuration file provider.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::FileConfigProvider;
/// use layercfg::domain::{ConfigData, Result};
/// use layercfg::ports::{ConfigParser, ConfigProvider};
///
/// struct NoSyntax;
///
/// impl ConfigParser for NoSyntax {
///     fn parse(&self, _content: &str, _source_name: &str) -> Result<ConfigData> {
///         Ok(ConfigData::new())
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["cfg"]
///     }
/// }
///
/// let provider = FileConfigProvider::new("/nonexistent/app.cfg", NoSyntax).optional(true);
/// provider.load().unwrap();
/// assert!(provider.data().is_empty());
/// ```
pub struct FileConfigProvider<P> {
    name: String,
    path: PathBuf,
    optional: bool,
    reload_on_change: bool,
    reload_delay: Duration,
    on_load_error: Option<FileLoadErrorHandler>,
    parser: P,
    data: ProviderData,
    /// Serializes loads started by callers and by the watcher.
    reload_lock: Mutex<()>,
    #[cfg(feature = "reload")]
    watcher: Mutex<Option<crate::adapters::watchers::FileWatcher>>,
}

impl<P: ConfigParser> FileConfigProvider<P> {
    /// Creates a provider for the file at `path`, read with `parser`.
    pub fn new(path: impl Into<PathBuf>, parser: P) -> Self {
        let path = path.into();
        Self {
            name: format!("file:{}", path.display()),
            path,
            optional: false,
            reload_on_change: false,
            reload_delay: DEFAULT_RELOAD_DELAY,
            on_load_error: None,
            parser,
            data: ProviderData::new(),
            reload_lock: Mutex::new(()),
            #[cfg(feature = "reload")]
            watcher: Mutex::new(None),
        }
    }

    /// A missing optional file loads as empty instead of failing.
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Sets the handler consulted when a load fails.
    pub fn on_load_error(mut self, handler: FileLoadErrorHandler) -> Self {
        self.on_load_error = Some(handler);
        self
    }

    /// Sets whether `watch` (with the `reload` feature) reloads the file when it
    /// changes, and the quiet period to wait before reloading.
    pub fn reload_on_change(mut self, enabled: bool, delay: Duration) -> Self {
        self.reload_on_change = enabled;
        self.reload_delay = delay;
        self
    }

    /// The path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self, reload: bool) -> Result<ConfigData> {
        let metadata = match fs::metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if self.optional || reload {
                    return Ok(ConfigData::new());
                }
                return Err(ConfigError::SourceNotFound {
                    source_name: self.name.clone(),
                    location: self.path.display().to_string(),
                });
            }
            Err(e) => {
                return Err(ConfigError::SourceError {
                    source_name: self.name.clone(),
                    message: format!("Failed to read file metadata: {}", self.path.display()),
                    source: Some(Box::new(e)),
                })
            }
        };

        // Check file size before reading to prevent DoS via large files
        if metadata.len() > MAX_FILE_SIZE {
            return Err(ConfigError::SourceError {
                source_name: self.name.clone(),
                message: format!(
                    "Configuration file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_FILE_SIZE
                ),
                source: None,
            });
        }

        let content = fs::read_to_string(&self.path).map_err(|e| ConfigError::SourceError {
            source_name: self.name.clone(),
            message: format!("Failed to read configuration file: {}", self.path.display()),
            source: Some(Box::new(e)),
        })?;

        self.parser.parse(&content, &self.name)
    }

    /// Loads the file. `reload` marks a load triggered by a change, where a
    /// missing or unreadable file clears the data instead of keeping stale
    /// entries.
    fn load_file(&self, reload: bool) -> Result<()> {
        {
            let _guard = lock(&self.reload_lock);

            match self.read(reload) {
                Ok(data) => {
                    tracing::debug!("Loaded {} entries from {}", data.len(), self.path.display());
                    self.data.replace(data);
                }
                Err(error) => {
                    if reload {
                        self.data.clear();
                    }
                    self.handle_error(error)?;
                }
            }
        }

        // Fired unlocked; subscribers may load this provider again.
        self.data.on_reload();
        Ok(())
    }

    fn handle_error(&self, error: ConfigError) -> Result<()> {
        let Some(handler) = &self.on_load_error else {
            return Err(error);
        };

        let mut context = FileLoadErrorContext {
            provider: &self.name,
            path: &self.path,
            error: &error,
            ignore: false,
        };
        handler(&mut context);

        if context.ignore {
            tracing::debug!("Ignoring load error for {}: {}", self.path.display(), error);
            Ok(())
        } else {
            Err(error)
        }
    }
}

#[cfg(feature = "reload")]
impl<P: ConfigParser + 'static> FileConfigProvider<P> {
    /// Starts watching the file if reloading on change is enabled.
    ///
    /// The watcher holds only a weak reference, so dropping the last handle to
    /// the provider stops it. Reload failures are logged, never propagated.
    pub fn watch(self: &Arc<Self>) -> Result<()> {
        use crate::adapters::watchers::FileWatcher;
        use crate::ports::ConfigWatcher;

        if !self.reload_on_change {
            return Ok(());
        }

        let mut slot = lock(&self.watcher);
        if slot.is_some() {
            return Ok(());
        }

        let mut watcher = FileWatcher::new(&self.path, Some(self.reload_delay))?;
        let provider = Arc::downgrade(self);
        watcher.watch(Arc::new(move |path: &Path| {
            if let Some(provider) = provider.upgrade() {
                if let Err(e) = provider.load_file(true) {
                    tracing::warn!("Failed to reload '{}': {}", path.display(), e);
                }
            }
        }))?;
        *slot = Some(watcher);
        Ok(())
    }
}

impl<P: ConfigParser> ConfigProvider for FileConfigProvider<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn data(&self) -> &ProviderData {
        &self.data
    }

    fn load(&self) -> Result<()> {
        self.load_file(false)
    }

    fn reload_token(&self) -> Option<ChangeToken> {
        self.reload_on_change.then(|| self.data.reload_token())
    }
}

impl<P> fmt::Debug for FileConfigProvider<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileConfigProvider")
            .field("path", &self.path)
            .field("optional", &self.optional)
            .field("reload_on_change", &self.reload_on_change)
            .finish_non_exhaustive()
    }
}

/// Source for a [`FileConfigProvider`].
///
/// Relative paths are resolved against the builder's base path, and the
/// builder's load error handler is used when the source has none of its own.
#[derive(Clone)]
pub struct FileSource<P> {
    path: PathBuf,
    optional: bool,
    reload_on_change: bool,
    reload_delay: Duration,
    on_load_error: Option<FileLoadErrorHandler>,
    parser: P,
}

impl<P: ConfigParser + Clone + Default + 'static> FileSource<P> {
    /// Creates a source for a required file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_parser(path, P::default())
    }
}

impl<P: ConfigParser + Clone + 'static> FileSource<P> {
    /// Creates a source read with an explicit parser instance.
    pub fn with_parser(path: impl Into<PathBuf>, parser: P) -> Self {
        Self {
            path: path.into(),
            optional: false,
            reload_on_change: false,
            reload_delay: DEFAULT_RELOAD_DELAY,
            on_load_error: None,
            parser,
        }
    }

    /// Marks the file as optional.
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Reloads the file when it changes. Needs the `reload` feature.
    pub fn reload_on_change(mut self, enabled: bool) -> Self {
        self.reload_on_change = enabled;
        self
    }

    /// Sets the quiet period between a change and the reload.
    pub fn reload_delay(mut self, delay: Duration) -> Self {
        self.reload_delay = delay;
        self
    }

    /// Sets the handler consulted when the file fails to load.
    pub fn on_load_error(mut self, handler: FileLoadErrorHandler) -> Self {
        self.on_load_error = Some(handler);
        self
    }

    /// The configured path, before base path resolution.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn resolve_path(&self, builder: &ConfigBuilder) -> PathBuf {
        match builder.base_path() {
            Some(base) if self.path.is_relative() => base.join(&self.path),
            _ => self.path.clone(),
        }
    }
}

impl<P: ConfigParser + Clone + 'static> ConfigSource for FileSource<P> {
    fn build(&self, builder: &ConfigBuilder) -> Result<Arc<dyn ConfigProvider>> {
        let mut provider = FileConfigProvider::new(self.resolve_path(builder), self.parser.clone())
            .optional(self.optional)
            .reload_on_change(self.reload_on_change, self.reload_delay);
        if let Some(handler) = self
            .on_load_error
            .clone()
            .or_else(|| builder.file_load_error_handler())
        {
            provider = provider.on_load_error(handler);
        }

        let provider = Arc::new(provider);

        #[cfg(feature = "reload")]
        provider.watch()?;
        if cfg!(not(feature = "reload")) && self.reload_on_change {
            tracing::warn!(
                "Reloading {} on change needs the `reload` feature; watching is disabled",
                provider.path().display()
            );
        }

        Ok(provider)
    }
}

impl<P> fmt::Debug for FileSource<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSource")
            .field("path", &self.path)
            .field("optional", &self.optional)
            .field("reload_on_change", &self.reload_on_change)
            .finish_non_exhaustive()
    }
}
