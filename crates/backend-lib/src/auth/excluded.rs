// ============================
// crates/backend-lib/src/auth/excluded.rs
// ============================
//! Paths that bypass authentication.
//!
//! A pattern is compared against the request path after both have been
//! normalized to end in `/`, so `/api/v1/status` matches `/api/v1/status/`.
//! A pattern ending in `*` matches every path that starts with the text
//! before the `*`. Nothing else matches: `/api/v1/users/` does not exclude
//! `/api/v1/users/me`.

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pattern {
    Exact(String),
    Prefix(String),
}

/// Compiled list of excluded path patterns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludedPaths {
    patterns: Vec<Pattern>,
}

fn normalize(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}

impl ExcludedPaths {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                match p.strip_suffix('*') {
                    Some(prefix) => Pattern::Prefix(prefix.to_string()),
                    None => Pattern::Exact(normalize(p)),
                }
            })
            .collect();
        Self { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether `path` matches any pattern
    pub fn matches(&self, path: &str) -> bool {
        let normalized = normalize(path);
        self.patterns.iter().any(|pattern| match pattern {
            Pattern::Exact(p) => *p == normalized,
            Pattern::Prefix(p) => path.starts_with(p.as_str()),
        })
    }
}

/// Decide whether `path` needs authentication.
///
/// An unknown path is always protected. With no patterns every path is
/// protected.
pub fn require_auth(path: Option<&str>, excluded: &ExcludedPaths) -> bool {
    match path {
        None => true,
        Some(path) => !excluded.matches(path),
    }
}
