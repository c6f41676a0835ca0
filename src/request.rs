use crate::body;
use crate::error::{ConsoleError, Result};
use crate::headers;
use crate::model::{Operation, SecuritySchemes};
use crate::query;
use crate::url::{self, Delimiters};
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::Value;

/// Inputs of a console that stay fixed across sends.
#[derive(Debug, Clone, Default)]
pub struct RequestSettings {
    /// Applied in order; a later entry replaces an earlier one of the same name.
    pub additional_headers: Vec<(String, String)>,
    pub delimiters: Delimiters,
    pub server_index: usize,
    pub fallback_host: Option<String>,
}

/// A request ready to go out on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl PreparedRequest {
    pub fn build(
        operation: &Operation,
        schemes: &SecuritySchemes,
        settings: &RequestSettings,
        body_text: Option<&str>,
    ) -> Result<Self> {
        let body = body::resolve(body_text)?;

        let method = Method::from_bytes(operation.method.to_ascii_uppercase().as_bytes())
            .map_err(|_| ConsoleError::InvalidMethod(operation.method.clone()))?;

        let base = url::base_url(
            operation,
            settings.server_index,
            settings.fallback_host.as_deref(),
        )?;
        let path = url::resolve_path(&operation.path, &operation.parameters, &settings.delimiters)?;
        let mut resolved = format!("{base}{path}");

        let payload = body.or_else(|| {
            let fields = query::fields_object(&operation.parameters);
            if fields.is_empty() {
                None
            } else {
                Some(Value::Object(fields))
            }
        });

        let body = if operation.is_get() {
            if let Some(p) = &payload {
                resolved = url::append_query(&resolved, &query::stringify(p));
            }
            None
        } else {
            payload
        };

        let headers = headers::assemble(operation, schemes, &settings.additional_headers)?;

        Ok(PreparedRequest {
            method,
            url: resolved,
            headers,
            body,
        })
    }
}
