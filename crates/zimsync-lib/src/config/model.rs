use crate::transfer::MatcherDef;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Index page listing the archives.
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub output: OutputConfig,
    /// URLs to never download. Evaluated in order, first match wins.
    #[serde(default)]
    pub denylist: Vec<MatcherDef>,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            read_timeout_secs: 120,
            user_agent: None,
        }
    }
}
