use crate::error::Result;
use crate::language::LanguageTable;
use ignore::overrides::{Override, OverrideBuilder};
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

/// User-supplied selection criteria. Empty lists select everything.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub extensions: Vec<String>,
    pub languages: Vec<String>,
    pub exclude: Vec<String>,
    pub restrict_to: Vec<String>,
}

/// Decides which repository paths get attributed.
pub struct FileFilter<'a> {
    extensions: HashSet<String>,
    languages: HashSet<String>,
    table: &'a LanguageTable,
    exclude: Option<Override>,
    restrict_to: Option<Override>,
}

impl<'a> FileFilter<'a> {
    pub fn new(options: &FilterOptions, table: &'a LanguageTable) -> Result<Self> {
        let extensions = options
            .extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .map(|e| format!(".{e}"))
            .collect();

        let languages: HashSet<String> = options
            .languages
            .iter()
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .collect();
        for language in &languages {
            if !table.has_language(language) {
                warn!(language = %language, "language is not in the language table; it matches no file");
            }
        }

        Ok(Self {
            extensions,
            languages,
            table,
            exclude: build_globs(&options.exclude)?,
            restrict_to: build_globs(&options.restrict_to)?,
        })
    }

    /// `path` is repository-relative with `/` separators.
    pub fn accepts<P: AsRef<Path>>(&self, path: P) -> bool {
        let path = path.as_ref();
        if !self.extensions.is_empty() {
            let ext = path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()));
            if !ext.is_some_and(|e| self.extensions.contains(&e)) {
                return false;
            }
        }

        if !self.languages.is_empty() {
            match self.table.language_of(&path.to_string_lossy()) {
                Some(lang) if self.languages.contains(lang) => {}
                _ => return false,
            }
        }

        if let Some(exclude) = &self.exclude {
            if glob_matches(exclude, path) {
                return false;
            }
        }

        if let Some(restrict_to) = &self.restrict_to {
            if !glob_matches(restrict_to, path) {
                return false;
            }
        }

        true
    }
}

fn build_globs(patterns: &[String]) -> Result<Option<Override>> {
    let patterns: Vec<&str> = patterns
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect();
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = OverrideBuilder::new(".");
    for pattern in patterns {
        builder.add(pattern)?;
    }
    Ok(Some(builder.build()?))
}

/// Gitignore-style match against the path or any of its parent directories.
fn glob_matches(globs: &Override, path: &Path) -> bool {
    if globs.matched(path, false).is_whitelist() {
        return true;
    }
    path.ancestors()
        .skip(1)
        .filter(|dir| !dir.as_os_str().is_empty())
        .any(|dir| globs.matched(dir, true).is_whitelist())
}
