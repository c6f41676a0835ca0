use crate::error::{ConsoleError, Result};
use crate::model::{Operation, Parameter, ParameterLocation};
use regex::{Captures, Regex};
use tracing::debug;

pub const DEFAULT_PARAM_PREFIX: &str = "{";
pub const DEFAULT_PARAM_SUFFIX: &str = "}";

/// Markers around a parameter name in a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    prefix: String,
    suffix: String,
}

impl Default for Delimiters {
    fn default() -> Self {
        Delimiters {
            prefix: DEFAULT_PARAM_PREFIX.to_string(),
            suffix: DEFAULT_PARAM_SUFFIX.to_string(),
        }
    }
}

impl Delimiters {
    /// An empty prefix falls back to the default. An empty suffix is kept,
    /// so templates like `/pets/:id` work.
    pub fn new(prefix: Option<String>, suffix: Option<String>) -> Self {
        let prefix = prefix
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PARAM_PREFIX.to_string());
        let suffix = suffix.unwrap_or_else(|| DEFAULT_PARAM_SUFFIX.to_string());
        Delimiters { prefix, suffix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Matches one placeholder, capturing the parameter name. Without a
    /// suffix the name runs to the end of the word, so `:i` never matches
    /// inside `:id`.
    fn pattern(&self) -> Result<Regex> {
        let prefix = regex::escape(self.prefix());
        let pattern = if self.suffix().is_empty() {
            format!(r"{prefix}(\w+)")
        } else {
            format!("{prefix}(.*?){}", regex::escape(self.suffix()))
        };
        Ok(Regex::new(&pattern)?)
    }
}

/// Picks the base URL for `operation`: the selected server, or `fallback_host`
/// when the operation lists no servers at all.
pub fn base_url(
    operation: &Operation,
    server_index: usize,
    fallback_host: Option<&str>,
) -> Result<String> {
    if operation.servers.is_empty() {
        return match fallback_host {
            Some(host) => Ok(host.trim_end_matches('/').to_string()),
            None => Err(ConsoleError::NoServer),
        };
    }

    operation
        .servers
        .get(server_index)
        .map(|s| s.url.clone())
        .ok_or(ConsoleError::ServerIndexOutOfRange {
            index: server_index,
            count: operation.servers.len(),
        })
}

/// Substitutes path parameter values into the `template` in a single pass,
/// so substituted values are never scanned again.
///
/// Fails when a placeholder has no value or a stray prefix is left, so a
/// half-resolved URL never goes out on the wire.
pub fn resolve_path(
    template: &str,
    params: &[Parameter],
    delimiters: &Delimiters,
) -> Result<String> {
    let pattern = delimiters.pattern()?;
    let mut missing = Vec::<String>::new();

    let resolved = pattern
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            let value = params.iter().find(|p| {
                p.location == ParameterLocation::Path && p.has_value() && p.name == name
            });
            match value {
                Some(param) => param.value.clone(),
                None => {
                    if !missing.iter().any(|m| m == name) {
                        missing.push(name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        })
        .into_owned();

    let stray_prefix = pattern
        .replace_all(template, "")
        .contains(delimiters.prefix());
    if !missing.is_empty() || stray_prefix {
        debug!(url = %resolved, ?missing, "unresolved path placeholders");
        return Err(ConsoleError::MissingPathParameter {
            url: resolved,
            missing,
        });
    }

    Ok(resolved)
}

pub fn append_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        url.to_string()
    } else if url.contains('?') {
        format!("{url}&{query}")
    } else {
        format!("{url}?{query}")
    }
}
