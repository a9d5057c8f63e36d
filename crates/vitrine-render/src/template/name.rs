//! Template name normalization.
//!
//! Callers address templates by logical, slash-separated names such as
//! `"widgets/card"`. Before lookup a name is made absolute (leading `/`) and
//! its extension is replaced by the configured view extension:
//!
//! | Input | Normalized (`.jinja`) |
//! |-------|-----------------------|
//! | `widgets/card` | `/widgets/card.jinja` |
//! | `/widgets/card` | `/widgets/card.jinja` |
//! | `widgets/card.html` | `/widgets/card.jinja` |
//! | `themes.v2/card` | `/themes.v2/card.jinja` |
//!
//! Normalization is idempotent: normalizing an already normalized name
//! returns it unchanged.

use std::fmt;

/// A normalized, absolute template name.
///
/// The inner string always begins with `/` and, when the view extension is
/// non-empty, ends with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateName(String);

impl TemplateName {
    /// Normalizes `name` with the given view extension.
    pub fn new(name: &str, extension: &str) -> Self {
        let normalized = normalize(name, extension);
        if let Some(previous) = foreign_extension(name, extension) {
            tracing::warn!(
                template = %name,
                replaced = %previous,
                normalized = %normalized,
                "template name extension replaced by view extension"
            );
        }
        Self(normalized)
    }

    /// Wraps a name that is already absolute, keeping its extension.
    ///
    /// A leading `/` is added if missing.
    pub fn from_path(path: &str) -> Self {
        Self(root(path))
    }

    /// Returns the normalized name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the name without its leading separator.
    pub fn relative(&self) -> &str {
        &self.0[1..]
    }

    /// Consumes the name, returning the normalized string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TemplateName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalizes a template name: absolute, forward slashes, view extension.
///
/// An empty `extension` leaves the file name untouched.
///
/// ```rust
/// use vitrine_render::template::normalize;
///
/// assert_eq!(normalize("widgets/card", ".jinja"), "/widgets/card.jinja");
/// assert_eq!(normalize("/widgets/card.html", ".jinja"), "/widgets/card.jinja");
/// assert_eq!(normalize("widgets/card", ""), "/widgets/card");
/// ```
pub fn normalize(name: &str, extension: &str) -> String {
    change_extension(&root(name), extension)
}

fn root(name: &str) -> String {
    let name = name.replace('\\', "/");
    if name.starts_with('/') {
        name
    } else {
        format!("/{}", name)
    }
}

/// Byte offset where the file name's extension starts, or the path length.
fn extension_start(path: &str) -> usize {
    let file_start = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    match path[file_start..].rfind('.') {
        Some(dot) => file_start + dot,
        None => path.len(),
    }
}

fn change_extension(path: &str, extension: &str) -> String {
    let ext = extension.trim_start_matches('.');
    if ext.is_empty() {
        return path.to_string();
    }
    format!("{}.{}", &path[..extension_start(path)], ext)
}

/// Returns the extension of `name` when normalization would replace it with a
/// different one.
fn foreign_extension<'a>(name: &'a str, extension: &str) -> Option<&'a str> {
    let ext = extension.trim_start_matches('.');
    if ext.is_empty() {
        return None;
    }
    let current = &name[extension_start(name)..];
    let current_ext = current.strip_prefix('.')?;
    if current_ext.is_empty() || current_ext == ext {
        None
    } else {
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_name_is_rooted() {
        assert_eq!(normalize("widgets/card", ".jinja"), "/widgets/card.jinja");
    }

    #[test]
    fn test_rooted_name_keeps_single_separator() {
        assert_eq!(normalize("/widgets/card", ".jinja"), "/widgets/card.jinja");
    }

    #[test]
    fn test_existing_extension_is_replaced() {
        assert_eq!(normalize("widgets/card.html", ".jinja"), "/widgets/card.jinja");
        assert_eq!(normalize("widgets/card.tpl", "tpl"), "/widgets/card.tpl");
    }

    #[test]
    fn test_dot_in_directory_is_not_an_extension() {
        assert_eq!(normalize("themes.v2/card", ".jinja"), "/themes.v2/card.jinja");
    }

    #[test]
    fn test_backslashes_become_separators() {
        assert_eq!(normalize("widgets\\card", ".jinja"), "/widgets/card.jinja");
    }

    #[test]
    fn test_empty_extension_leaves_file_name() {
        assert_eq!(normalize("a.b.c", ""), "/a.b.c");
        assert_eq!(normalize(&normalize("a.b.c", ""), ""), "/a.b.c");
    }

    #[test]
    fn test_idempotent_on_normalized_names() {
        for name in ["/widgets/card", "/a.b.c", "/", "/x/.hidden", "/trailing."] {
            let once = normalize(name, ".jinja");
            assert_eq!(normalize(&once, ".jinja"), once, "input: {}", name);
        }
    }

    #[test]
    fn test_template_name_accessors() {
        let name = TemplateName::new("widgets/card", ".jinja");
        assert_eq!(name.as_str(), "/widgets/card.jinja");
        assert_eq!(name.relative(), "widgets/card.jinja");
        assert_eq!(name.to_string(), "/widgets/card.jinja");
    }

    #[test]
    fn test_from_path_keeps_extension() {
        let name = TemplateName::from_path("partials/row.html");
        assert_eq!(name.as_str(), "/partials/row.html");
    }

    #[test]
    fn test_foreign_extension_detection() {
        assert_eq!(foreign_extension("card.html", ".jinja"), Some(".html"));
        assert_eq!(foreign_extension("card.jinja", ".jinja"), None);
        assert_eq!(foreign_extension("card", ".jinja"), None);
        assert_eq!(foreign_extension("card.html", ""), None);
    }
}
