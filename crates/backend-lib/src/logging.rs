// ============================
// crates/backend-lib/src/logging.rs
// ============================
//! Masking of personal data in log lines.
//!
//! Log lines carry `name=value` pairs. For every configured field name the
//! value up to the next separator (or the end of the line) is replaced with
//! the redaction string; the field name and separator are kept.
use std::{borrow::Cow, fmt};

use regex::Regex;
use tracing::{Event, Subscriber};
use tracing_subscriber::{
    fmt::{
        format::{FormatEvent, FormatFields, Writer},
        FmtContext,
    },
    registry::LookupSpan,
};

use crate::config::RedactionSettings;

/// Compiled form of a field list, redaction string and separator
#[derive(Debug, Clone)]
pub struct Redactor {
    /// `None` when no field is listed
    pattern: Option<Regex>,
    redaction: String,
}

impl Redactor {
    pub fn new<I, S>(fields: I, redaction: &str, separator: &str) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = fields
            .into_iter()
            .map(|f| regex::escape(f.as_ref()))
            .collect::<Vec<_>>();
        let pattern = if names.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(
                r"(?m)(?P<key>\b(?:{})=).*?(?P<end>{}|$)",
                names.join("|"),
                regex::escape(separator)
            ))?)
        };

        Ok(Self {
            pattern,
            // `$` is special in replacement strings
            redaction: redaction.replace('$', "$$"),
        })
    }

    pub fn from_settings(settings: &RedactionSettings) -> Result<Self, regex::Error> {
        Self::new(&settings.fields, &settings.redaction, &settings.separator)
    }

    /// `message` with every configured value masked
    pub fn redact<'a>(&self, message: &'a str) -> Cow<'a, str> {
        match &self.pattern {
            Some(pattern) => {
                pattern.replace_all(message, format!("${{key}}{}${{end}}", self.redaction))
            },
            None => Cow::Borrowed(message),
        }
    }
}

/// One-shot masking of `message`
pub fn filter_datum<S: AsRef<str>>(
    fields: &[S],
    redaction: &str,
    message: &str,
    separator: &str,
) -> Result<String, regex::Error> {
    Ok(Redactor::new(fields, redaction, separator)?
        .redact(message)
        .into_owned())
}

/// Event formatter that renders with `inner`, then masks the rendered line
#[derive(Debug, Clone)]
pub struct RedactingFormat<F> {
    inner: F,
    redactor: Redactor,
}

impl<F> RedactingFormat<F> {
    pub fn new(inner: F, redactor: Redactor) -> Self {
        Self { inner, redactor }
    }
}

impl<S, N, F> FormatEvent<S, N> for RedactingFormat<F>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    F: FormatEvent<S, N>,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut line = String::new();
        self.inner.format_event(ctx, Writer::new(&mut line), event)?;
        fmt::Write::write_str(&mut writer, &self.redactor.redact(&line))
    }
}
