//! Template store for inline, embedded and file-based templates.
//!
//! [`TemplateStore`] maps absolute template paths (`"/widgets/card.jinja"`) to
//! their source. It backs [`JinjaViewEngine`](super::JinjaViewEngine): direct
//! and convention lookups both end up as a path probe against the store.
//!
//! # Sources
//!
//! 1. Inline templates (added via [`TemplateStore::add_inline`]) have highest priority
//! 2. File templates from directories, in directory registration order
//!
//! Files are keyed by their path relative to the directory they were found in,
//! with a leading `/` and their extension kept: `templates/widgets/card.jinja`
//! under root `templates` becomes `"/widgets/card.jinja"`. Only files with a
//! recognized extension are registered.
//!
//! # Collision Handling
//!
//! The same path found in two different directories is a configuration error
//! ([`RegistryError::Collision`]) rather than a silent first-wins.
//!
//! # Example
//!
//! ```rust
//! use vitrine_render::template::TemplateStore;
//!
//! let mut store = TemplateStore::new([".jinja"]);
//! store.add_inline("widgets/card.jinja", "<div>{{ title }}</div>");
//!
//! assert!(store.contains("/widgets/card.jinja"));
//! assert_eq!(store.get_content("/widgets/card.jinja").unwrap(), "<div>{{ title }}</div>");
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::name::{normalize, TemplateName};

/// A template file discovered during directory walking.
///
/// For a file at `/app/templates/todos/list.jinja` with root `/app/templates`:
///
/// ```rust,ignore
/// TemplateFile {
///     path: "/todos/list.jinja".to_string(),
///     absolute_path: PathBuf::from("/app/templates/todos/list.jinja"),
///     source_dir: PathBuf::from("/app/templates"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// Store key: root-relative path with leading `/` and extension.
    pub path: String,
    /// Absolute path to the template file
    pub absolute_path: PathBuf,
    /// The template directory root this file belongs to
    pub source_dir: PathBuf,
}

impl TemplateFile {
    pub fn new(
        path: impl Into<String>,
        absolute_path: impl Into<PathBuf>,
        source_dir: impl Into<PathBuf>,
    ) -> Self {
        let path: String = path.into();
        Self {
            path: TemplateName::from_path(&path).into_string(),
            absolute_path: absolute_path.into(),
            source_dir: source_dir.into(),
        }
    }
}

/// How a template's content is stored or accessed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTemplate {
    /// Template content stored directly in memory.
    Inline(String),

    /// Template read from the filesystem on demand.
    File(PathBuf),
}

/// Error type for template store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Two template directories contain the same template path.
    #[error(
        "Template collision detected for \"{name}\":\n  - {} (from {})\n  - {} (from {})",
        .existing_path.display(),
        .existing_dir.display(),
        .conflicting_path.display(),
        .conflicting_dir.display()
    )]
    Collision {
        /// The template path that has conflicting sources
        name: String,
        /// Path to the existing template
        existing_path: PathBuf,
        /// Directory containing the existing template
        existing_dir: PathBuf,
        /// Path to the conflicting template
        conflicting_path: PathBuf,
        /// Directory containing the conflicting template
        conflicting_dir: PathBuf,
    },

    /// Template not found in the store.
    #[error("Template not found: \"{name}\"")]
    NotFound { name: String },

    /// Failed to read a template file or directory.
    #[error("Failed to read template \"{}\": {message}", .path.display())]
    ReadError { path: PathBuf, message: String },

    /// A registered template directory does not exist.
    #[error("Template directory not found: {}", .path.display())]
    DirectoryNotFound { path: PathBuf },
}

/// Store for template sources keyed by absolute path.
///
/// The store is immutable once shared with a view engine; add every source
/// before building the engine.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    /// Recognized extensions; the first one is the view extension.
    extensions: Vec<String>,
    inline: HashMap<String, String>,
    files: HashMap<String, PathBuf>,
    /// Tracks source directories for collision detection: path → (file, dir).
    sources: HashMap<String, (PathBuf, PathBuf)>,
    dirs: Vec<PathBuf>,
}

impl TemplateStore {
    /// Creates an empty store recognizing the given extensions.
    ///
    /// The first extension is used to resolve extensionless include names.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Creates a store from `(path, content)` pairs embedded at compile time.
    pub fn from_embedded_entries<I, S>(extensions: I, entries: &[(&str, &str)]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut store = Self::new(extensions);
        for (path, content) in entries {
            store.add_inline(*path, *content);
        }
        store
    }

    /// Returns the recognized extensions.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Adds an inline template at `path`.
    ///
    /// The path is made absolute but keeps its extension. Inline templates
    /// shadow file templates at the same path.
    pub fn add_inline(&mut self, path: impl AsRef<str>, content: impl Into<String>) {
        let key = TemplateName::from_path(path.as_ref()).into_string();
        self.inline.insert(key, content.into());
    }

    /// Walks a directory and registers every template file in it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DirectoryNotFound`] if the directory doesn't
    /// exist, and [`RegistryError::Collision`] if one of its templates is
    /// already registered from another directory.
    pub fn add_template_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<(), RegistryError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(RegistryError::DirectoryNotFound {
                path: dir.to_path_buf(),
            });
        }

        let files = walk_template_dir(dir, &self.extensions)?;
        self.add_from_files(files)?;
        self.dirs.push(dir.to_path_buf());
        Ok(())
    }

    /// Registers templates discovered by [`walk_template_dir`].
    ///
    /// The batch is all or nothing: on error the store is left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Collision`] if a path is already registered
    /// from a different source directory.
    pub fn add_from_files(&mut self, files: Vec<TemplateFile>) -> Result<(), RegistryError> {
        let mut staged: HashMap<String, (PathBuf, PathBuf)> = HashMap::new();
        for file in files {
            let existing = self
                .sources
                .get(&file.path)
                .or_else(|| staged.get(&file.path));
            match existing {
                Some((existing_path, existing_dir)) if existing_dir != &file.source_dir => {
                    return Err(RegistryError::Collision {
                        name: file.path,
                        existing_path: existing_path.clone(),
                        existing_dir: existing_dir.clone(),
                        conflicting_path: file.absolute_path,
                        conflicting_dir: file.source_dir,
                    });
                }
                Some(_) => continue,
                None => {
                    staged.insert(file.path, (file.absolute_path, file.source_dir));
                }
            }
        }

        for (path, (absolute_path, source_dir)) in staged {
            self.files.insert(path.clone(), absolute_path.clone());
            self.sources.insert(path, (absolute_path, source_dir));
        }
        Ok(())
    }

    /// Re-walks every registered directory, picking up added and removed files.
    ///
    /// The directories are walked into a fresh store that replaces the file
    /// entries only if every directory succeeds. Inline templates are kept.
    ///
    /// This is a store-level operation: a [`JinjaViewEngine`](super::JinjaViewEngine)
    /// shares its store immutably and caches compiled templates, so build a
    /// new engine from the refreshed store to serve the changes.
    pub fn refresh(&mut self) -> Result<(), RegistryError> {
        let mut rebuilt = Self::new(self.extensions.iter().cloned());
        for dir in &self.dirs {
            rebuilt.add_template_dir(dir)?;
        }
        self.files = rebuilt.files;
        self.sources = rebuilt.sources;
        self.dirs = rebuilt.dirs;
        Ok(())
    }

    /// Looks up a template by exact path.
    pub fn get(&self, path: &str) -> Result<ResolvedTemplate, RegistryError> {
        if let Some(content) = self.inline.get(path) {
            return Ok(ResolvedTemplate::Inline(content.clone()));
        }
        if let Some(file) = self.files.get(path) {
            return Ok(ResolvedTemplate::File(file.clone()));
        }
        Err(RegistryError::NotFound {
            name: path.to_string(),
        })
    }

    /// Returns true if a template exists at exactly `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.inline.contains_key(path) || self.files.contains_key(path)
    }

    /// Gets the content of a template, reading file templates from disk on
    /// every call.
    ///
    /// An engine built over the store compiles each template once, so edits
    /// made after the first render are not seen through the engine.
    pub fn get_content(&self, path: &str) -> Result<String, RegistryError> {
        match self.get(path)? {
            ResolvedTemplate::Inline(content) => Ok(content),
            ResolvedTemplate::File(file) => {
                std::fs::read_to_string(&file).map_err(|e| RegistryError::ReadError {
                    path: file,
                    message: e.to_string(),
                })
            }
        }
    }

    /// Loads the source for a name used by the template engine.
    ///
    /// Tries `name` as an exact path first, then normalized with the view
    /// extension, so `{% include "partials/row" %}` finds
    /// `/partials/row.jinja`. Returns `Ok(None)` when neither exists.
    pub fn load(&self, name: &str) -> Result<Option<String>, RegistryError> {
        if self.contains(name) {
            return self.get_content(name).map(Some);
        }
        let extension = self.extensions.first().map(String::as_str).unwrap_or("");
        let normalized = normalize(name, extension);
        if self.contains(&normalized) {
            return self.get_content(&normalized).map(Some);
        }
        Ok(None)
    }

    /// Returns the number of registered templates.
    pub fn len(&self) -> usize {
        self.names().count()
    }

    /// Returns true if no templates are registered.
    pub fn is_empty(&self) -> bool {
        self.inline.is_empty() && self.files.is_empty()
    }

    /// Returns an iterator over registered paths, without duplicates.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inline.keys().map(|s| s.as_str()).chain(
            self.files
                .keys()
                .filter(|k| !self.inline.contains_key(*k))
                .map(|s| s.as_str()),
        )
    }

    /// Returns the registered template directories.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Clears all templates and directories.
    pub fn clear(&mut self) {
        self.inline.clear();
        self.files.clear();
        self.sources.clear();
        self.dirs.clear();
    }
}

/// Walks a template directory and collects files with recognized extensions.
///
/// The result is not sorted.
pub fn walk_template_dir(
    root: impl AsRef<Path>,
    extensions: &[String],
) -> Result<Vec<TemplateFile>, RegistryError> {
    let root = root.as_ref();
    let root_canonical = root.canonicalize().map_err(|e| RegistryError::ReadError {
        path: root.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut files = Vec::new();
    walk_dir_recursive(&root_canonical, &root_canonical, extensions, &mut files)?;
    Ok(files)
}

fn walk_dir_recursive(
    current: &Path,
    root: &Path,
    extensions: &[String],
    files: &mut Vec<TemplateFile>,
) -> Result<(), RegistryError> {
    let entries = std::fs::read_dir(current).map_err(|e| RegistryError::ReadError {
        path: current.to_path_buf(),
        message: e.to_string(),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| RegistryError::ReadError {
            path: current.to_path_buf(),
            message: e.to_string(),
        })?;
        let path = entry.path();

        if path.is_dir() {
            walk_dir_recursive(&path, root, extensions, files)?;
        } else if path.is_file() {
            if let Some(file) = try_parse_file(&path, root, extensions) {
                files.push(file);
            }
        }
    }

    Ok(())
}

fn try_parse_file(path: &Path, root: &Path, extensions: &[String]) -> Option<TemplateFile> {
    if !has_recognized_extension(path, extensions) {
        return None;
    }

    let relative = path.strip_prefix(root).ok()?;
    let relative = relative
        .to_string_lossy()
        .replace(std::path::MAIN_SEPARATOR, "/");

    Some(TemplateFile::new(relative, path, root))
}

/// Compares the file's own extension against `extensions`, with or without a
/// leading dot. An empty entry recognizes nothing.
fn has_recognized_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(actual) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions.iter().any(|ext| {
        let ext = ext.trim_start_matches('.');
        !ext.is_empty() && ext == actual
    })
}
