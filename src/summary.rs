use ethers::types::Address;
use serde::Serialize;

use crate::provider::HdWalletConnection;
use crate::resolver::{ResolvedConnection, ResolvedNetwork};
use crate::types::{Gas, GasPrice, NetworkId};

/// Printable view of a resolved network. Secrets are never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkSummary {
    pub name: String,
    pub network_id: NetworkId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<Gas>,
    #[serde(rename = "gasPrice", skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<GasPrice>,
    #[serde(rename = "skipDryRun")]
    pub skip_dry_run: bool,
    pub endpoint: EndpointSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EndpointSummary {
    Local { host: String, port: u16 },
    Remote { url: String, from: Address },
}

impl From<&ResolvedNetwork<HdWalletConnection>> for NetworkSummary {
    fn from(network: &ResolvedNetwork<HdWalletConnection>) -> Self {
        let endpoint = match &network.connection {
            ResolvedConnection::Local(local) => EndpointSummary::Local {
                host: local.host.clone(),
                port: local.port,
            },
            ResolvedConnection::Remote(remote) => EndpointSummary::Remote {
                url: remote.redacted_url(),
                from: remote.address(),
            },
        };

        Self {
            name: network.name.clone(),
            network_id: network.network_id,
            gas: network.gas,
            gas_price: network.gas_price,
            skip_dry_run: network.skip_dry_run,
            endpoint,
        }
    }
}
