use crate::model::Operation;
use crate::outcome::{RequestOutcome, StatusKind};
use colored::*;
use std::fmt::Write;

/// Status line and payload, the way the console panel shows them.
pub fn outcome_text(outcome: &RequestOutcome) -> String {
    let mut out = String::new();

    let status_line = match (outcome.status(), outcome.status_text()) {
        (Some(status), Some(text)) => format!("{status} {text}"),
        (Some(status), None) => status.to_string(),
        _ => "not sent".to_string(),
    };
    let status_line = match outcome.kind() {
        StatusKind::Success => status_line.green(),
        StatusKind::Redirect => status_line.yellow(),
        StatusKind::Info => status_line.blue(),
        StatusKind::Error => status_line.red(),
    };

    let _ = writeln!(out, "{} {}", "Status:".bold(), status_line);
    let _ = writeln!(out, "{}", "Response Payload:".bold());
    let _ = writeln!(out, "{}", outcome.content().to_pretty_string());
    out
}

/// Endpoint metadata: verb, path, servers, parameters, security and body.
pub fn describe(operation: &Operation, server_index: usize) -> String {
    let mut out = String::new();

    let mut title = format!(
        "{} {}",
        operation.method.to_uppercase().bold(),
        operation.path
    );
    if operation.deprecated {
        title.push_str(&format!(" {}", "[deprecated]".yellow()));
    }
    let _ = writeln!(out, "{title}");

    if let Some(summary) = &operation.summary {
        let _ = writeln!(out, "{summary}");
    }
    if let Some(description) = &operation.description {
        let _ = writeln!(out, "\n{description}");
    }

    if !operation.servers.is_empty() {
        let _ = writeln!(out, "\n{}", "Servers:".bold());
        for (i, server) in operation.servers.iter().enumerate() {
            let marker = if i == server_index { "*" } else { " " };
            let _ = write!(out, " {marker} [{i}] {}", server.url);
            if let Some(d) = &server.description {
                let _ = write!(out, " ({d})");
            }
            let _ = writeln!(out);
        }
    }

    if !operation.parameters.is_empty() {
        let _ = writeln!(out, "\n{}", "Parameters:".bold());
        for param in &operation.parameters {
            let required = if param.required { ", required" } else { "" };
            let _ = write!(out, "   {} ({}{required})", param.name, param.location);
            if param.has_value() {
                let _ = write!(out, " = {}", param.value);
            }
            let _ = writeln!(out);
        }
    }

    if !operation.security.is_empty() {
        let schemes: Vec<String> = operation
            .security
            .iter()
            .map(|r| r.schemes.join(" + "))
            .collect();
        let _ = writeln!(out, "\n{} {}", "Security:".bold(), schemes.join(", "));
    }

    if let Some(body) = &operation.request_body {
        let names: Vec<String> = body
            .media_types
            .iter()
            .enumerate()
            .map(|(i, m)| {
                if i == body.active_mime_idx {
                    format!("{} (active)", m.name)
                } else {
                    m.name.clone()
                }
            })
            .collect();
        let _ = writeln!(out, "\n{} {}", "Request body:".bold(), names.join(", "));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OperationDocument;
    use crate::outcome::{Content, ResponseOutcome};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn outcome_text_should_show_status_and_pretty_payload() {
        plain();
        let outcome = RequestOutcome::Response(ResponseOutcome {
            content: Content::Json(json!({"id": 7})),
            ok: true,
            status: 200,
            status_text: "OK".to_string(),
            redirected: false,
            headers: BTreeMap::new(),
            url: "http://localhost/pets/7".to_string(),
        });

        assert_eq!(
            outcome_text(&outcome),
            "Status: 200 OK\nResponse Payload:\n{\n  \"id\": 7\n}\n"
        );
    }

    #[test]
    fn outcome_text_should_show_failures() {
        plain();
        let text = outcome_text(&RequestOutcome::failed());
        assert!(text.starts_with("Status: 400 Bad Request\n"));
        assert!(text.contains("Request error"));

        let text = outcome_text(&RequestOutcome::Rejected {
            message: "missing".to_string(),
        });
        assert!(text.starts_with("Status: not sent\n"));
        assert!(text.ends_with("missing\n"));
    }

    #[test]
    fn describe_should_list_endpoint_metadata() {
        plain();
        let doc = OperationDocument::from_str(
            r#"
method: get
path: /pets/{id}
summary: Find pet by ID
deprecated: true
servers:
  - url: https://a.example.com
  - url: https://b.example.com
    description: staging
parameters:
  - name: id
    in: path
    required: true
    value: "7"
  - name: verbose
    in: query
security:
  - [bearerAuth]
requestBody:
  mediaTypes:
    - name: application/json
"#,
        )
        .unwrap();

        let text = describe(&doc.operation, 1);
        assert!(text.starts_with("GET /pets/{id} [deprecated]\nFind pet by ID\n"));
        assert!(text.contains("   [0] https://a.example.com\n"));
        assert!(text.contains(" * [1] https://b.example.com (staging)\n"));
        assert!(text.contains("   id (path, required) = 7\n"));
        assert!(text.contains("   verbose (query)\n"));
        assert!(text.contains("Security: bearerAuth\n"));
        assert!(text.contains("Request body: application/json (active)\n"));
    }
}
