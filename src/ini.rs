use crate::http::HttpConnectionProfile;

use anyhow::{Context, Result};
use ini::{Ini, Properties};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_INI_FILE_PATH: &str = "~/.apiconsole";
pub const DEFAULT_INI_SECTION: &str = "default";

const INI_HOST: &str = "host";
const INI_SERVER_INDEX: &str = "server_index";
const INI_INSECURE: &str = "insecure";
const INI_CA_CERT: &str = "ca_cert";
const INI_PARAM_PREFIX: &str = "param_prefix";
const INI_PARAM_SUFFIX: &str = "param_suffix";
const HEADER_KEY_PREFIX: &str = "@";
const TOKEN_KEY_PREFIX: &str = "token.";

/// One section of the profile file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IniProfile {
    pub host: Option<String>,
    pub server_index: Option<usize>,
    pub insecure: bool,
    pub ca_cert: Option<String>,
    pub param_prefix: Option<String>,
    pub param_suffix: Option<String>,
    pub headers: HashMap<String, String>,
    pub tokens: HashMap<String, String>,
}

impl HttpConnectionProfile for IniProfile {
    fn insecure(&self) -> bool {
        self.insecure
    }

    fn ca_cert(&self) -> Option<&String> {
        self.ca_cert.as_ref()
    }
}

impl IniProfile {
    /// Loads section `name` from `file_path`. A missing file or section is
    /// not an error.
    pub fn load(file_path: &str, name: &str) -> Result<Option<IniProfile>> {
        let extended_path = shellexpand::tilde(file_path).to_string();
        if !Path::new(&extended_path).exists() {
            debug!(path = %extended_path, "profile file not found");
            return Ok(None);
        }
        let ini = Ini::load_from_file(&extended_path)
            .with_context(|| format!("Failed to load profile file {extended_path}"))?;
        let section = match ini.section(Some(name)) {
            Some(s) => s,
            None => {
                debug!(profile = %name, "profile section not found");
                return Ok(None);
            }
        };

        fn try_get<T>(section: &Properties, key: &str) -> Result<Option<T>>
        where
            T: std::str::FromStr,
            T::Err: std::error::Error + Send + Sync + 'static,
        {
            section
                .get(key)
                .map(|s| {
                    s.trim()
                        .parse::<T>()
                        .with_context(|| format!("Invalid value for '{key}': {s}"))
                })
                .transpose()
        }

        let mut headers = HashMap::<String, String>::new();
        let mut tokens = HashMap::<String, String>::new();
        for (key, value) in section.iter() {
            if let Some(header) = key.strip_prefix(HEADER_KEY_PREFIX) {
                headers.insert(header.to_string(), value.to_string());
            } else if let Some(scheme) = key.strip_prefix(TOKEN_KEY_PREFIX) {
                tokens.insert(scheme.to_string(), value.to_string());
            }
        }

        let profile = IniProfile {
            host: try_get(section, INI_HOST)?,
            server_index: try_get(section, INI_SERVER_INDEX)?,
            insecure: try_get::<bool>(section, INI_INSECURE)?.unwrap_or(false),
            ca_cert: try_get(section, INI_CA_CERT)?,
            param_prefix: try_get(section, INI_PARAM_PREFIX)?,
            param_suffix: try_get(section, INI_PARAM_SUFFIX)?,
            headers,
            tokens,
        };

        Ok(Some(profile))
    }
}
