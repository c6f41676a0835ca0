use crate::error::{ConsoleError, Result};
use crate::model::{Operation, SecuritySchemes};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, warn};

pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Merges request headers. Later sources replace earlier ones whatever the
/// casing of their names: additional headers in order, then the body content
/// type, then the bearer token of every security requirement whose first
/// scheme is known.
pub fn assemble(
    operation: &Operation,
    schemes: &SecuritySchemes,
    additional: &[(String, String)],
) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in additional {
        headers.insert(header_name(name)?, header_value(name, value)?);
    }

    let content_type = operation
        .active_media_type()
        .map(|m| m.name.as_str())
        .unwrap_or(DEFAULT_CONTENT_TYPE);
    headers.insert(CONTENT_TYPE, header_value(CONTENT_TYPE.as_str(), content_type)?);

    for requirement in &operation.security {
        let Some(id) = requirement.schemes.first() else {
            continue;
        };
        match schemes.get(id) {
            Some(scheme) => match &scheme.token {
                Some(token) => {
                    let mut value = header_value(AUTHORIZATION.as_str(), &format!("Bearer {token}"))?;
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                None => warn!(scheme = %id, "security scheme has no token, skipping"),
            },
            None => debug!(scheme = %id, "no security scheme configured, skipping"),
        }
    }

    Ok(headers)
}

fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| ConsoleError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| ConsoleError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

/// Parses `Name: value` strings as given on the command line, keeping their
/// order.
pub fn parse_header_args(args: &[String]) -> Result<Vec<(String, String)>> {
    args.iter()
        .map(|s| match s.split_once(':') {
            Some((name, value)) if !name.trim().is_empty() => {
                Ok((name.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(ConsoleError::InvalidHeader {
                name: s.clone(),
                reason: "expected 'Name: value'".to_string(),
            }),
        })
        .collect()
}
