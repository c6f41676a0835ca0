use crate::decoder::{decode_body, ContentEncoding};
use crate::outcome::{Content, ResponseOutcome};
use crate::request::PreparedRequest;

use anyhow::{anyhow, Context, Result};
use bytes::Bytes;
use reqwest::{
    header::{HeaderMap, CONTENT_ENCODING, CONTENT_TYPE},
    redirect, Certificate, Client,
};
use std::collections::BTreeMap;
use std::fmt::Debug;
use tracing::debug;

pub trait HttpConnectionProfile {
    fn insecure(&self) -> bool;
    fn ca_cert(&self) -> Option<&String>;
}

pub struct HttpClient {
    client: Client,
}

impl Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("client", &"Client")
            .finish()
    }
}

impl HttpClient {
    pub fn new(profile: &impl HttpConnectionProfile) -> Result<Self> {
        let insecure_access = profile.insecure();
        let mut cli_builder = Client::builder()
            .redirect(redirect::Policy::none())
            .danger_accept_invalid_certs(insecure_access)
            .danger_accept_invalid_hostnames(insecure_access);

        if let Some(ca_cert) = profile.ca_cert() {
            let ca_cert = shellexpand::tilde(ca_cert).to_string();
            let pem = std::fs::read(&ca_cert)
                .with_context(|| format!("Failed to read CA certificate {ca_cert}"))?;
            let cert = Certificate::from_pem(&pem)?;
            cli_builder = cli_builder.use_rustls_tls().add_root_certificate(cert);
        }

        let client = cli_builder.build()?;
        Ok(HttpClient { client })
    }

    /// Sends `req` and shapes the answer. Redirects are returned as they are.
    pub async fn execute(&self, req: &PreparedRequest) -> Result<ResponseOutcome> {
        let mut req_builder = self
            .client
            .request(req.method.clone(), &req.url)
            .headers(req.headers.clone());

        if let Some(body) = &req.body {
            req_builder = req_builder.json(body);
        }

        let res = req_builder.send().await?;
        let status = res.status();
        let headers = res.headers().clone();
        let redirected = reqwest::Url::parse(&req.url)
            .map(|requested| &requested != res.url())
            .unwrap_or(false);
        let url = res.url().to_string();
        let body_bytes: Bytes = res.bytes().await?;
        debug!(%status, bytes = body_bytes.len(), "response received");

        let encoding = ContentEncoding::from_header(header_str(&headers, CONTENT_ENCODING.as_str()));
        let text = decode_body(&body_bytes, encoding)?;
        let content = parse_content(&text, header_str(&headers, CONTENT_TYPE.as_str()))?;

        Ok(ResponseOutcome {
            content,
            ok: status.is_success(),
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            redirected,
            headers: flatten_headers(&headers),
            url,
        })
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Multiple values of one header are joined with ", ".
fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut flat = BTreeMap::<String, String>::new();
    for (name, value) in headers.iter() {
        let value = String::from_utf8_lossy(value.as_bytes()).to_string();
        flat.entry(name.to_string())
            .and_modify(|v| {
                v.push_str(", ");
                v.push_str(&value);
            })
            .or_insert(value);
    }
    flat
}

fn parse_content(text: &str, content_type: Option<&str>) -> Result<Content> {
    if text.is_empty() {
        return Ok(Content::Text(String::new()));
    }

    match content_type {
        Some(ct) if ct.to_ascii_lowercase().contains("json") => serde_json::from_str(text)
            .map(Content::Json)
            .map_err(|e| anyhow!("Response declared as {ct} is not valid JSON: {e}")),
        Some(_) => Ok(Content::Text(text.to_string())),
        None => Ok(serde_json::from_str(text)
            .map(Content::Json)
            .unwrap_or_else(|_| Content::Text(text.to_string()))),
    }
}
