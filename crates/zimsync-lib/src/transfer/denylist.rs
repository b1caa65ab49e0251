use crate::error::ZimSyncError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// A denylist entry as written in configuration or on the command line.
///
/// On the command line the kind is given as a `kind:` prefix
/// (`contains:`, `prefix:` or `regex:`); a bare value means `contains`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherDef {
    Contains(String),
    Prefix(String),
    Regex(String),
}

impl FromStr for MatcherDef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let def = match s.split_once(':') {
            Some(("contains", value)) => Self::Contains(value.to_string()),
            Some(("prefix", value)) => Self::Prefix(value.to_string()),
            Some(("regex", value)) => Self::Regex(value.to_string()),
            _ => Self::Contains(s.to_string()),
        };

        let empty = match &def {
            Self::Contains(v) | Self::Prefix(v) | Self::Regex(v) => v.is_empty(),
        };
        if empty {
            return Err(format!("empty denylist pattern: {s:?}"));
        }
        Ok(def)
    }
}

#[derive(Clone, Debug)]
pub enum Matcher {
    Contains(String),
    Prefix(String),
    Regex(Regex),
}

impl Matcher {
    pub fn compile(def: &MatcherDef) -> Result<Self, ZimSyncError> {
        Ok(match def {
            MatcherDef::Contains(s) => Self::Contains(s.clone()),
            MatcherDef::Prefix(s) => Self::Prefix(s.clone()),
            MatcherDef::Regex(s) => {
                Self::Regex(Regex::new(s).map_err(|e| ZimSyncError::InvalidPattern {
                    pattern: s.clone(),
                    reason: e.to_string(),
                })?)
            }
        })
    }

    pub fn is_match(&self, url: &Url) -> bool {
        let url = url.as_str();
        match self {
            Self::Contains(s) => url.contains(s.as_str()),
            Self::Prefix(s) => url.starts_with(s.as_str()),
            Self::Regex(re) => re.is_match(url),
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains(s) => write!(f, "contains:{s}"),
            Self::Prefix(s) => write!(f, "prefix:{s}"),
            Self::Regex(re) => write!(f, "regex:{}", re.as_str()),
        }
    }
}

/// Ordered set of URL matchers; the first match wins.
#[derive(Clone, Debug, Default)]
pub struct Denylist {
    matchers: Vec<Matcher>,
}

impl Denylist {
    pub fn compile<'a>(defs: impl IntoIterator<Item = &'a MatcherDef>) -> Result<Self, ZimSyncError> {
        let matchers = defs
            .into_iter()
            .map(Matcher::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { matchers })
    }

    pub fn first_match(&self, url: &Url) -> Option<&Matcher> {
        self.matchers.iter().find(|m| m.is_match(url))
    }

    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}
