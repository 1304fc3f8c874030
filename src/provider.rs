use std::sync::Arc;

use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::coins_bip39::English;
use ethers::signers::{LocalWallet, MnemonicBuilder, Signer};
use ethers::types::Address;
use tracing::{info, instrument};
use url::Url;

use crate::credentials::Mnemonic;
use crate::error::ProviderError;
use crate::types::{AddressIndex, ChainId, NetworkId};

pub const INFURA_DOMAIN: &str = "infura.io";

pub type HdSigner = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Everything a factory gets to build a connection for one profile.
#[derive(Debug, Clone)]
pub struct ProviderRequest<'a> {
    pub network: &'a str,
    pub mnemonic: &'a Mnemonic,
    pub url: Url,
    pub network_id: NetworkId,
}

/// Builds a signing connection from credentials and an RPC url.
///
/// Called only for the profile that gets resolved, so profiles that are
/// never selected never need their secrets.
pub trait ProviderFactory {
    type Connection;

    fn build(
        &self,
        request: ProviderRequest<'_>,
    ) -> Result<Self::Connection, ProviderError>;
}

/// HD wallet over HTTP, derived at `m/44'/60'/0'/0/<index>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HdWalletFactory {
    pub address_index: AddressIndex,
}

impl HdWalletFactory {
    pub fn new(address_index: AddressIndex) -> Self {
        Self { address_index }
    }
}

#[derive(Debug, Clone)]
pub struct HdWalletConnection {
    pub url: Url,
    pub signer: Arc<HdSigner>,
}

impl ProviderFactory for HdWalletFactory {
    type Connection = HdWalletConnection;

    #[instrument(name = "hd_wallet_provider", skip_all, fields(network = request.network))]
    fn build(
        &self,
        request: ProviderRequest<'_>,
    ) -> Result<HdWalletConnection, ProviderError> {
        request.mnemonic.validate()?;

        let mut wallet = MnemonicBuilder::<English>::default()
            .phrase(request.mnemonic.phrase())
            .index(self.address_index.0)?
            .build()?;

        if let Some(chain_id) = request.network_id.chain_id() {
            wallet = wallet.with_chain_id(chain_id.0);
        }

        let provider =
            Provider::<Http>::try_from(request.url.as_str()).map_err(|err| {
                ProviderError::InvalidUrl {
                    url: redacted(&request.url),
                    reason: err.to_string(),
                }
            })?;

        info!(
            url = %redacted(&request.url),
            address = ?wallet.address(),
            "Built HD wallet provider"
        );

        Ok(HdWalletConnection {
            url: request.url,
            signer: Arc::new(SignerMiddleware::new(provider, wallet)),
        })
    }
}

impl HdWalletConnection {
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn redacted_url(&self) -> String {
        redacted(&self.url)
    }

    /// Asks the node for its chain id and compares it to the profile.
    #[instrument(skip_all, fields(url = %self.redacted_url()))]
    pub async fn verify_chain_id(
        &self,
        expected: NetworkId,
    ) -> Result<ChainId, ProviderError> {
        let actual = self
            .signer
            .get_chainid()
            .await
            .map_err(|err| ProviderError::Rpc(err.to_string()))?;

        let actual = ChainId(actual.as_u64());

        if !expected.matches(actual) {
            return Err(ProviderError::ChainIdMismatch { expected, actual });
        }

        info!(chain_id = %actual, "Chain id verified");

        Ok(actual)
    }
}

/// `https://<subdomain>.infura.io/v3/<api_key>`.
///
/// The subdomain must be a single DNS label and the key always ends up as one
/// path segment, so neither can move the request to another host.
pub fn infura_url(subdomain: &str, api_key: &str) -> Result<Url, ProviderError> {
    let shown = format!("https://{subdomain}.{INFURA_DOMAIN}/v3/***");
    let invalid = |reason: &str| ProviderError::InvalidUrl {
        url: shown.clone(),
        reason: reason.to_string(),
    };

    if !is_dns_label(subdomain) {
        return Err(invalid("subdomain must be a single DNS label"));
    }

    let mut url = Url::parse(&format!("https://{subdomain}.{INFURA_DOMAIN}"))
        .map_err(|err| invalid(&err.to_string()))?;

    url.path_segments_mut()
        .map_err(|()| invalid("url cannot carry a path"))?
        .clear()
        .push("v3")
        .push(api_key);

    if !is_infura_host(&url) {
        return Err(invalid("host is not an Infura endpoint"));
    }

    Ok(url)
}

/// Hides the Infura project id and any basic-auth password.
pub fn redacted(url: &Url) -> String {
    let mut url = url.clone();

    if url.password().is_some() {
        let _ = url.set_password(Some("***"));
    }

    if is_infura_host(&url) {
        let segments: Vec<String> = url
            .path_segments()
            .map(|segments| segments.map(str::to_string).collect())
            .unwrap_or_default();

        if let Some(v3) = segments.iter().position(|segment| segment == "v3") {
            if let Ok(mut path) = url.path_segments_mut() {
                path.clear().extend(&segments[..=v3]).push("***");
            }
        }

        url.set_query(None);
    }

    url.to_string()
}

fn is_dns_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn is_infura_host(url: &Url) -> bool {
    url.host_str().map_or(false, |host| {
        host == INFURA_DOMAIN || host.ends_with(&format!(".{INFURA_DOMAIN}"))
    })
}
