use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigurationError, ProviderError};

pub const MNEMONIC_ENV: &str = "MNEMONIC";
pub const API_KEY_ENV: &str = "INFURA_API_KEY";

const VALID_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// A BIP-39 phrase. Never printed, `Debug` and `Display` are redacted.
///
/// Parsing only normalizes whitespace. The phrase is checked when a wallet
/// is derived from it, so commands that never touch a remote network keep
/// working with a malformed value in the environment.
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic {
    phrase: String,
}

impl Mnemonic {
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn word_count(&self) -> usize {
        self.phrase.split_whitespace().count()
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        let words = self.word_count();

        if !VALID_WORD_COUNTS.contains(&words) {
            return Err(ProviderError::InvalidMnemonic(format!(
                "expected 12, 15, 18, 21 or 24 words, got {words}"
            )));
        }

        Ok(())
    }
}

impl FromStr for Mnemonic {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = s.split_whitespace().collect();

        Ok(Self {
            phrase: words.join(" "),
        })
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mnemonic({} words, redacted)", self.word_count())
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} word mnemonic>", self.word_count())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl FromStr for ApiKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().to_string()))
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey(redacted)")
    }
}

/// Secrets a remote profile needs. Blank values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub mnemonic: Option<Mnemonic>,
    pub api_key: Option<ApiKey>,
}

impl Credentials {
    pub fn new(mnemonic: Option<Mnemonic>, api_key: Option<ApiKey>) -> Self {
        Self {
            mnemonic: mnemonic.filter(|m| !m.phrase.is_empty()),
            api_key: api_key.filter(|key| !key.0.is_empty()),
        }
    }

    /// Wraps raw values, treating empty or whitespace-only strings as unset.
    pub fn parse(mnemonic: Option<&str>, api_key: Option<&str>) -> Self {
        let mnemonic = non_blank(mnemonic).map(|phrase| Mnemonic {
            phrase: phrase.split_whitespace().collect::<Vec<_>>().join(" "),
        });
        let api_key = non_blank(api_key).map(|key| ApiKey(key.trim().to_string()));

        Self::new(mnemonic, api_key)
    }

    /// Reads `MNEMONIC` and `INFURA_API_KEY` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mnemonic = lookup(MNEMONIC_ENV);
        let api_key = lookup(API_KEY_ENV);

        Self::parse(mnemonic.as_deref(), api_key.as_deref())
    }

    pub fn require_mnemonic(
        &self,
        network: &str,
    ) -> Result<&Mnemonic, ConfigurationError> {
        self.mnemonic
            .as_ref()
            .ok_or_else(|| ConfigurationError::MissingMnemonic {
                network: network.to_string(),
            })
    }

    pub fn require_api_key(
        &self,
        network: &str,
    ) -> Result<&ApiKey, ConfigurationError> {
        self.api_key
            .as_ref()
            .ok_or_else(|| ConfigurationError::MissingApiKey {
                network: network.to_string(),
            })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
