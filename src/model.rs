//! Operation description consumed by the console.
//!
//! The document is a single operation plus the security schemes it may refer
//! to, written as JSON or YAML:
//!
//! ```yaml
//! method: get
//! path: /pets/{id}
//! servers:
//!   - url: https://petstore.example.com/v1
//! parameters:
//!   - name: id
//!     in: path
//!     required: true
//! security:
//!   - [bearerAuth]
//! securitySchemes:
//!   - id: bearerAuth
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default)]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(alias = "httpVerb")]
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub request_body: Option<RequestBody>,
    #[serde(default)]
    pub security: Vec<SecurityRequirement>,
    #[serde(default)]
    pub servers: Vec<Server>,
}

impl Operation {
    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("get")
    }

    /// Media type currently selected for the request body, if any.
    pub fn active_media_type(&self) -> Option<&MediaType> {
        self.request_body.as_ref().and_then(|b| b.active())
    }

    pub fn parameter_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.parameters.iter_mut().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub schema: Option<Value>,
}

impl Parameter {
    #[cfg(test)]
    pub fn new(name: &str, location: ParameterLocation, value: &str) -> Self {
        Parameter {
            name: name.to_string(),
            location,
            value: value.to_string(),
            required: false,
            description: None,
            schema: None,
        }
    }

    pub fn has_value(&self) -> bool {
        !self.value.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl Display for ParameterLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterLocation::Path => write!(f, "path"),
            ParameterLocation::Query => write!(f, "query"),
            ParameterLocation::Header => write!(f, "header"),
            ParameterLocation::Cookie => write!(f, "cookie"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    #[serde(default)]
    pub media_types: Vec<MediaType>,
    #[serde(default)]
    pub active_mime_idx: usize,
    #[serde(default)]
    pub required: bool,
}

impl RequestBody {
    pub fn active(&self) -> Option<&MediaType> {
        self.media_types.get(self.active_mime_idx)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    pub name: String,
    #[serde(default)]
    pub sample: Option<Value>,
}

/// Scheme ids an operation may be authorized with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecurityRequirement {
    pub schemes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityScheme {
    pub id: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecuritySchemes {
    schemes: Vec<SecurityScheme>,
}

impl SecuritySchemes {
    pub fn new(schemes: Vec<SecurityScheme>) -> Self {
        SecuritySchemes { schemes }
    }

    pub fn get(&self, id: &str) -> Option<&SecurityScheme> {
        self.schemes.iter().find(|s| s.id == id)
    }

    /// Sets the token of `id`, registering the scheme when it is unknown.
    pub fn set_token(&mut self, id: &str, token: &str) {
        match self.schemes.iter_mut().find(|s| s.id == id) {
            Some(scheme) => scheme.token = Some(token.to_string()),
            None => self.schemes.push(SecurityScheme {
                id: id.to_string(),
                token: Some(token.to_string()),
                description: None,
            }),
        }
    }
}

/// Content of an operation file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDocument {
    #[serde(flatten)]
    pub operation: Operation,
    #[serde(default)]
    pub security_schemes: SecuritySchemes,
}

impl OperationDocument {
    pub fn from_file(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path).to_string();
        let content = std::fs::read_to_string(Path::new(&expanded))
            .with_context(|| format!("Failed to read operation file {expanded}"))?;

        if expanded.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse operation file {expanded}"))
        } else {
            Self::from_str(&content)
                .with_context(|| format!("Failed to parse operation file {expanded}"))
        }
    }

    /// Parses JSON first, then YAML.
    pub fn from_str(content: &str) -> Result<Self> {
        match serde_json::from_str(content) {
            Ok(doc) => Ok(doc),
            Err(_) => Ok(serde_yaml::from_str(content)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::Builder;

    const TEST_YAML: &str = r#"
operationId: getPet
summary: Find pet by ID
method: get
path: /pets/{id}
servers:
  - url: https://petstore.example.com/v1
  - url: http://localhost:8080
parameters:
  - name: id
    in: path
    required: true
  - name: verbose
    in: query
    value: "true"
requestBody:
  activeMimeIdx: 1
  mediaTypes:
    - name: application/xml
    - name: application/json
      sample:
        name: doggie
security:
  - [bearerAuth]
securitySchemes:
  - id: bearerAuth
    token: T
"#;

    #[test]
    fn from_str_should_parse_yaml_document() {
        let doc = OperationDocument::from_str(TEST_YAML).unwrap();
        let op = &doc.operation;

        assert_eq!(op.operation_id.as_deref(), Some("getPet"));
        assert!(op.is_get());
        assert_eq!(op.path, "/pets/{id}");
        assert_eq!(op.servers.len(), 2);
        assert_eq!(op.parameters[0].location, ParameterLocation::Path);
        assert!(op.parameters[0].required);
        assert!(!op.parameters[0].has_value());
        assert_eq!(op.parameters[1].value, "true");
        assert_eq!(op.security[0].schemes, vec!["bearerAuth".to_string()]);

        let media = op.active_media_type().unwrap();
        assert_eq!(media.name, "application/json");
        assert_eq!(media.sample, Some(json!({"name": "doggie"})));

        let scheme = doc.security_schemes.get("bearerAuth").unwrap();
        assert_eq!(scheme.token.as_deref(), Some("T"));
    }

    #[test]
    fn from_str_should_accept_json_and_http_verb_alias() {
        let doc = OperationDocument::from_str(
            r#"{"httpVerb": "POST", "path": "/pets", "parameters": []}"#,
        )
        .unwrap();
        assert_eq!(doc.operation.method, "POST");
        assert!(!doc.operation.is_get());
        assert!(doc.operation.servers.is_empty());
        assert!(doc.security_schemes.get("any").is_none());
    }

    #[test]
    fn from_str_should_fail_without_path() {
        assert!(OperationDocument::from_str("method: get\n").is_err());
    }

    #[test]
    fn from_file_should_load_json_file() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{"method": "delete", "path": "/pets/{id}"}"#)
            .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let doc = OperationDocument::from_file(&path).unwrap();
        assert_eq!(doc.operation.method, "delete");
    }

    #[test]
    fn active_media_type_should_be_none_when_index_out_of_range() {
        let body = RequestBody {
            media_types: vec![MediaType {
                name: "text/plain".to_string(),
                sample: None,
            }],
            active_mime_idx: 3,
            required: false,
        };
        assert!(body.active().is_none());
    }

    #[test]
    fn set_token_should_update_or_register_scheme() {
        let mut schemes = SecuritySchemes::new(vec![SecurityScheme {
            id: "a".to_string(),
            token: None,
            description: None,
        }]);
        schemes.set_token("a", "one");
        schemes.set_token("b", "two");

        assert_eq!(schemes.get("a").unwrap().token.as_deref(), Some("one"));
        assert_eq!(schemes.get("b").unwrap().token.as_deref(), Some("two"));
        assert_eq!(schemes.schemes.len(), 2);
    }
}
