// ============================
// crates/backend-lib/src/auth/request.rs
// ============================
//! The parts of an HTTP request the auth layer looks at.
use axum::http::{
    header::{AUTHORIZATION, COOKIE},
    request::Parts,
    HeaderMap,
};

/// Borrowed view of a request: its path (if known) and its headers.
#[derive(Debug, Clone, Copy)]
pub struct AuthRequest<'a> {
    path: Option<&'a str>,
    headers: &'a HeaderMap,
}

impl<'a> AuthRequest<'a> {
    pub fn new(path: &'a str, headers: &'a HeaderMap) -> Self {
        Self {
            path: Some(path),
            headers,
        }
    }

    /// A request whose path is unknown; the gate treats it as protected
    pub fn without_path(headers: &'a HeaderMap) -> Self {
        Self {
            path: None,
            headers,
        }
    }

    pub fn from_parts(parts: &'a Parts) -> Self {
        Self::new(parts.uri.path(), &parts.headers)
    }

    pub fn path(&self) -> Option<&'a str> {
        self.path
    }

    /// Whether an `Authorization` header was sent at all, readable or not
    pub fn has_authorization(&self) -> bool {
        self.headers.contains_key(AUTHORIZATION)
    }

    /// Raw `Authorization` header value; `None` for non-UTF-8 values
    pub fn authorization(&self) -> Option<&'a str> {
        self.headers.get(AUTHORIZATION)?.to_str().ok()
    }

    /// Value of the cookie called `name`, searching every `Cookie` header
    pub fn cookie(&self, name: &str) -> Option<&'a str> {
        self.headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .find_map(|pair| {
                let (key, val) = pair.trim().split_once('=')?;
                (key.trim() == name).then(|| val.trim())
            })
    }
}
