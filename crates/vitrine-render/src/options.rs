//! View configuration.
//!
//! [`ViewOptions`] collects the settings shared by the view locator, the
//! default view engine and template name normalization. Options can be built
//! in code with the `with_*` setters or loaded from YAML:
//!
//! ```rust
//! use vitrine_render::ViewOptions;
//!
//! let options = ViewOptions::from_yaml(r#"
//! view_extension: .html
//! view_locations:
//!   - /themes/default
//!   - /views
//! "#).unwrap();
//!
//! assert_eq!(options.view_extension, ".html");
//! assert_eq!(options.view_locations.len(), 2);
//! assert!(options.auto_escape);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The extension given to every template name before lookup.
pub const DEFAULT_VIEW_EXTENSION: &str = ".jinja";

/// Convention roots searched when a direct lookup misses.
pub const DEFAULT_VIEW_LOCATIONS: &[&str] = &["/views", "/views/shared"];

/// Errors raised while loading [`ViewOptions`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The options file could not be read.
    #[error("failed to read view options from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The options document is not valid YAML for [`ViewOptions`].
    #[error("invalid view options: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Settings for template resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    /// Extension applied to template names during normalization.
    pub view_extension: String,

    /// Additional template file extensions contributed by extension providers.
    ///
    /// Files with these extensions are loaded into the template store and can
    /// be addressed by their full path, but normalization always applies
    /// [`view_extension`](Self::view_extension).
    pub extra_extensions: Vec<String>,

    /// Convention roots, searched in order after the direct lookup misses.
    pub view_locations: Vec<String>,

    /// Directories loaded into the default template store.
    pub template_dirs: Vec<PathBuf>,

    /// Whether interpolated values are HTML-escaped.
    pub auto_escape: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            view_extension: DEFAULT_VIEW_EXTENSION.to_string(),
            extra_extensions: Vec::new(),
            view_locations: DEFAULT_VIEW_LOCATIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            template_dirs: Vec::new(),
            auto_escape: true,
        }
    }
}

impl ViewOptions {
    /// Creates options with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from a YAML document. Missing keys take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses options from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Sets the extension applied during normalization.
    pub fn with_view_extension(mut self, extension: impl Into<String>) -> Self {
        self.view_extension = extension.into();
        self
    }

    /// Registers an additional template file extension.
    pub fn with_extra_extension(mut self, extension: impl Into<String>) -> Self {
        self.extra_extensions.push(extension.into());
        self
    }

    /// Appends a convention root.
    pub fn with_view_location(mut self, location: impl Into<String>) -> Self {
        self.view_locations.push(location.into());
        self
    }

    /// Replaces all convention roots.
    pub fn with_view_locations<I, S>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.view_locations = locations.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a directory to load templates from.
    pub fn with_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dirs.push(dir.into());
        self
    }

    /// Enables or disables HTML auto-escaping.
    pub fn with_auto_escape(mut self, auto_escape: bool) -> Self {
        self.auto_escape = auto_escape;
        self
    }

    /// Returns every recognized template file extension, the view extension
    /// first.
    pub fn template_file_extensions(&self) -> Vec<String> {
        let mut extensions = vec![self.view_extension.clone()];
        for ext in &self.extra_extensions {
            if !extensions.contains(ext) {
                extensions.push(ext.clone());
            }
        }
        extensions
    }
}
