use crate::ini::{DEFAULT_INI_FILE_PATH, DEFAULT_INI_SECTION};
use clap::ValueEnum;
use std::collections::HashMap;

pub use clap::Parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Status line followed by the payload
    Text,
    /// The whole outcome as one JSON object
    Json,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    #[clap(help = "Operation file (JSON or YAML)")]
    operation: String,
    #[clap(help = "JSON body text to send with the request")]
    body: Option<String>,
    #[clap(short = 'p', long, default_value = DEFAULT_INI_SECTION, help = "profile name")]
    profile: String,
    #[clap(long, default_value = DEFAULT_INI_FILE_PATH, help = "profile file path")]
    config: String,
    #[clap(short = 's', long, help = "index of the server to send the request to")]
    server: Option<usize>,
    #[clap(
        short = 'P',
        long = "param",
        value_name = "NAME=VALUE",
        value_parser = parse_key_value,
        help = "parameter value"
    )]
    params: Vec<(String, String)>,
    #[clap(
        short = 'H',
        long = "header",
        value_name = "KEY: VALUE",
        help = "additional HTTP header to send with the request"
    )]
    headers: Vec<String>,
    #[clap(
        short = 't',
        long = "token",
        value_name = "SCHEME=TOKEN",
        value_parser = parse_key_value,
        help = "bearer token for a security scheme"
    )]
    tokens: Vec<(String, String)>,
    #[clap(long, help = "marker opening a path parameter (default '{')")]
    param_prefix: Option<String>,
    #[clap(long, help = "marker closing a path parameter (default '}')")]
    param_suffix: Option<String>,
    #[clap(long, help = "read the body from stdin")]
    stdin: bool,
    #[clap(long, help = "do not fall back to the request body sample")]
    no_sample: bool,
    #[clap(short = 'r', long, help = "CA certificate PEM file path")]
    ca_cert: Option<String>,
    #[clap(
        short = 'k',
        long,
        help = "Allow insecure server connections when using SSL"
    )]
    insecure: bool,
    #[clap(short = 'd', long, help = "print the endpoint description and exit")]
    describe: bool,
    #[clap(short = 'o', long, value_enum, default_value_t = OutputFormat::Text, help = "output format")]
    output: OutputFormat,
    #[clap(
        short = 'v',
        long,
        help = "Print verbose message",
        default_value = "false"
    )]
    verbose: bool,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{s}'")),
    }
}

#[derive(Debug)]
pub struct CommandLineArgs {
    pub operation: String,
    pub body: Option<String>,
    pub profile: String,
    pub config: String,
    pub server: Option<usize>,
    pub params: Vec<(String, String)>,
    pub headers: Vec<String>,
    pub tokens: HashMap<String, String>,
    pub param_prefix: Option<String>,
    pub param_suffix: Option<String>,
    pub stdin: bool,
    pub no_sample: bool,
    pub ca_cert: Option<String>,
    pub insecure: bool,
    pub describe: bool,
    pub output: OutputFormat,
    pub verbose: bool,
}

impl From<ClapArgs> for CommandLineArgs {
    fn from(args: ClapArgs) -> Self {
        Self {
            operation: args.operation,
            body: args.body,
            profile: args.profile,
            config: args.config,
            server: args.server,
            params: args.params,
            headers: args.headers,
            tokens: args.tokens.into_iter().collect(),
            param_prefix: args.param_prefix,
            param_suffix: args.param_suffix,
            stdin: args.stdin,
            no_sample: args.no_sample,
            ca_cert: args.ca_cert,
            insecure: args.insecure,
            describe: args.describe,
            output: args.output,
            verbose: args.verbose,
        }
    }
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        ClapArgs::parse().into()
    }

    #[cfg(test)]
    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        ClapArgs::parse_from(itr).into()
    }
}
