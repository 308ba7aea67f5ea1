//! Application package locators

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// References an application package by name and version, rendered as
/// "name:version" on the wire and in phase payloads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Locator {
    pub name: String,
    pub version: String,
}

impl Locator {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.name, self.version)
    }
}

impl FromStr for Locator {
    type Err = ParseLocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((name, version)) if !name.is_empty() && !version.is_empty() => {
                Ok(Self::new(name, version))
            }
            _ => Err(ParseLocatorError(s.to_string())),
        }
    }
}

impl From<Locator> for String {
    fn from(locator: Locator) -> Self {
        locator.to_string()
    }
}

impl TryFrom<String> for Locator {
    type Error = ParseLocatorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Input did not have the "name:version" form
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseLocatorError(pub String);

impl std::fmt::Display for ParseLocatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid package locator '{}', expected name:version", self.0)
    }
}

impl std::error::Error for ParseLocatorError {}
