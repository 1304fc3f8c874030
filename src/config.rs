use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::compiler::Compilers;
use crate::error::ConfigurationError;
use crate::serde_utils;
use crate::types::{Gas, GasPrice, NetworkId};

pub const DEFAULT_HOST: &str = "localhost";
pub const MATIC_TESTNET_URL: &str = "https://testnet.matic.network";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(deserialize_with = "serde_utils::unique_map::deserialize")]
    pub networks: BTreeMap<String, NetworkProfile>,
    pub compilers: Compilers,
    pub mocha: ReporterConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkProfile {
    #[serde(flatten)]
    pub connection: Connection,
    pub network_id: NetworkId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<Gas>,
    #[serde(
        default,
        rename = "gasPrice",
        skip_serializing_if = "Option::is_none"
    )]
    pub gas_price: Option<GasPrice>,
    #[serde(
        default,
        rename = "skipDryRun",
        skip_serializing_if = "Option::is_none"
    )]
    pub skip_dry_run: Option<bool>,
}

/// How a profile reaches its node.
///
/// A profile sets either `host` and `port`, or `provider`. Mixing the two is
/// rejected instead of silently picking one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Connection {
    Local(LocalConnection),
    Remote { provider: RemoteEndpoint },
}

impl<'de> Deserialize<'de> for Connection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawConnection {
            host: Option<String>,
            port: Option<u16>,
            provider: Option<RemoteEndpoint>,
        }

        let raw = RawConnection::deserialize(deserializer)?;

        match (raw.host, raw.port, raw.provider) {
            (None, None, Some(provider)) => Ok(Self::Remote { provider }),
            (Some(host), Some(port), None) => {
                Ok(Self::Local(LocalConnection { host, port }))
            }
            (_, _, Some(_)) => Err(D::Error::custom(
                "`provider` cannot be combined with `host` or `port`",
            )),
            (Some(_), None, None) => Err(D::Error::missing_field("port")),
            (None, Some(_), None) => Err(D::Error::missing_field("host")),
            (None, None, None) => Err(D::Error::custom(
                "expected `host` and `port`, or `provider`",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalConnection {
    pub host: String,
    pub port: u16,
}

/// Where a remote provider points once it is built.
///
/// Nothing here is resolved eagerly: the Infura variant needs an API key
/// that only has to exist when the profile is actually selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RemoteEndpoint {
    Infura {
        /// Defaults to the network name
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subdomain: Option<String>,
    },
    Url { url: Url },
}

impl RemoteEndpoint {
    pub const fn infura() -> Self {
        Self::Infura { subdomain: None }
    }

    pub const fn requires_api_key(&self) -> bool {
        matches!(self, Self::Infura { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReporterConfig {
    pub reporter: String,
    #[serde(rename = "reporterOptions")]
    pub reporter_options: ReporterOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReporterOptions {
    pub currency: String,
    /// In gwei
    pub gas_price: u64,
    pub output_file: PathBuf,
    pub show_time_spent: bool,
}

impl NetworkProfile {
    pub fn local(port: u16) -> Self {
        Self {
            connection: Connection::Local(LocalConnection {
                host: DEFAULT_HOST.to_string(),
                port,
            }),
            network_id: NetworkId::Any,
            gas: None,
            gas_price: None,
            skip_dry_run: None,
        }
    }

    pub fn remote(endpoint: RemoteEndpoint, network_id: NetworkId) -> Self {
        Self {
            connection: Connection::Remote { provider: endpoint },
            network_id,
            gas: None,
            gas_price: None,
            skip_dry_run: None,
        }
    }

    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas = Some(Gas(gas));
        self
    }

    pub fn with_gas_price(mut self, gas_price: u64) -> Self {
        self.gas_price = Some(GasPrice(gas_price));
        self
    }

    pub fn with_skip_dry_run(mut self, skip_dry_run: bool) -> Self {
        self.skip_dry_run = Some(skip_dry_run);
        self
    }
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            reporter: "eth-gas-reporter".to_string(),
            reporter_options: ReporterOptions {
                currency: "USD".to_string(),
                gas_price: 21,
                output_file: PathBuf::from("/dev/null"),
                show_time_spent: true,
            },
        }
    }
}

impl Config {
    /// The stock network table. Contains no secrets.
    pub fn builtin() -> Self {
        let matic_url = Url::parse(MATIC_TESTNET_URL)
            .expect("matic testnet url is a valid constant");

        let networks = maplit::btreemap! {
            "development".to_string() => NetworkProfile::local(8545)
                .with_skip_dry_run(true),
            "matic_dev".to_string() => NetworkProfile::local(8546),
            "ropsten".to_string() => NetworkProfile::remote(
                RemoteEndpoint::infura(),
                NetworkId::id(3),
            )
            .with_gas(8_000_000)
            .with_gas_price(100_000_000_000)
            .with_skip_dry_run(true),
            "kovan".to_string() => NetworkProfile::remote(
                RemoteEndpoint::infura(),
                NetworkId::id(42),
            )
            .with_gas(8_000_000),
            "mainnet".to_string() => NetworkProfile::remote(
                RemoteEndpoint::infura(),
                NetworkId::id(1),
            )
            .with_gas(4_000_000),
            "matic".to_string() => NetworkProfile::remote(
                RemoteEndpoint::Url { url: matic_url },
                NetworkId::id(13),
            )
            .with_gas(400_000_000),
        };

        Self {
            networks,
            compilers: Compilers::default(),
            mocha: ReporterConfig::default(),
        }
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();

        serde_utils::read_deserialize(path).await.map_err(|reason| {
            ConfigurationError::InvalidFile {
                path: path.to_owned(),
                reason,
            }
        })
    }

    pub fn network(&self, name: &str) -> Result<&NetworkProfile, ConfigurationError> {
        self.networks
            .get(name)
            .ok_or_else(|| ConfigurationError::UnknownNetwork {
                name: name.to_string(),
                available: self.network_names(),
            })
    }

    pub fn network_names(&self) -> Vec<String> {
        self.networks.keys().cloned().collect()
    }
}
