mod args;
mod body;
mod console;
mod decoder;
mod error;
mod headers;
mod http;
mod ini;
mod model;
mod outcome;
mod query;
mod render;
mod request;
mod url;

use crate::args::{CommandLineArgs, OutputFormat};
use crate::console::Console;
use crate::http::HttpClient;
use crate::ini::IniProfile;
use crate::model::OperationDocument;
use crate::outcome::RequestOutcome;
use crate::request::RequestSettings;
use crate::url::Delimiters;
use anyhow::{Context, Result};
use std::io::{self, IsTerminal, Read};
use std::process::ExitCode;
use tracing::{debug, warn};
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = CommandLineArgs::parse();
    init_logging(args.verbose);

    if !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let mut profile = IniProfile::load(&args.config, &args.profile)?.unwrap_or_default();
    debug!(?profile, "profile loaded");
    merge_connection_args(&mut profile, &args);

    let doc = OperationDocument::from_file(&args.operation)?;
    let settings = request_settings(&profile, &args)?;

    let mut schemes = doc.security_schemes;
    for (id, token) in profile.tokens.iter().chain(args.tokens.iter()) {
        schemes.set_token(id, token);
    }

    let client = HttpClient::new(&profile)?;
    let mut console = Console::new(client, doc.operation, schemes, settings);
    for (name, value) in &args.params {
        if !console.set_parameter(name, value) {
            warn!(parameter = %name, "operation has no such parameter, ignored");
        }
    }

    if args.describe {
        let server_index = console.settings().server_index;
        print!("{}", crate::render::describe(console.operation(), server_index));
        return Ok(ExitCode::SUCCESS);
    }

    let body_text = match (&args.body, args.stdin) {
        (Some(text), _) => Some(text.clone()),
        (None, true) => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read the body from stdin")?;
            Some(buffer)
        }
        (None, false) if args.no_sample => None,
        (None, false) => crate::body::sample_text(console.operation()),
    };

    if args.verbose {
        if let Ok(req) = console.prepare(body_text.as_deref()) {
            eprintln!("> {} {}", req.method, req.url);
            let mut headers: Vec<_> = req
                .headers
                .iter()
                .map(|(name, value)| (name.as_str(), value.to_str().unwrap_or("<binary>")))
                .collect();
            headers.sort();
            for (name, value) in headers {
                eprintln!("> {name}: {value}");
            }
        }
    }

    let outcome = console.send(body_text.as_deref()).await;
    debug!(state = ?console.state(), "send finished");

    if args.verbose {
        if let RequestOutcome::Response(res) = &outcome {
            for (name, value) in &res.headers {
                eprintln!("< {name}: {value}");
            }
        }
    }

    match args.output {
        OutputFormat::Text => print!("{}", crate::render::outcome_text(&outcome)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome.to_json())?),
    }

    Ok(if outcome.ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::rfc_3339())
        .with_writer(io::stderr)
        .init();
}

/// Command-line TLS options override the profile.
fn merge_connection_args(profile: &mut IniProfile, args: &CommandLineArgs) {
    profile.insecure |= args.insecure;
    if args.ca_cert.is_some() {
        profile.ca_cert = args.ca_cert.clone();
    }
}

fn request_settings(profile: &IniProfile, args: &CommandLineArgs) -> Result<RequestSettings> {
    let mut additional_headers: Vec<(String, String)> = profile
        .headers
        .iter()
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
    additional_headers.sort();
    additional_headers.extend(crate::headers::parse_header_args(&args.headers)?);

    Ok(RequestSettings {
        additional_headers,
        delimiters: Delimiters::new(
            args.param_prefix.clone().or_else(|| profile.param_prefix.clone()),
            args.param_suffix.clone().or_else(|| profile.param_suffix.clone()),
        ),
        server_index: args.server.or(profile.server_index).unwrap_or(0),
        fallback_host: profile.host.clone(),
    })
}
