use std::sync::Arc;

use tracing::{debug, instrument};
use url::Url;

use crate::compiler::SolcConfig;
use crate::config::{
    Config, Connection, LocalConnection, NetworkProfile, RemoteEndpoint,
    ReporterConfig,
};
use crate::credentials::Credentials;
use crate::error::ResolveError;
use crate::provider::{
    infura_url, HdWalletFactory, ProviderFactory, ProviderRequest,
};
use crate::types::{Gas, GasPrice, NetworkId};

/// A selected profile with its connection built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNetwork<C> {
    pub name: String,
    pub network_id: NetworkId,
    pub gas: Option<Gas>,
    pub gas_price: Option<GasPrice>,
    pub skip_dry_run: bool,
    pub connection: ResolvedConnection<C>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedConnection<C> {
    Local(LocalConnection),
    Remote(C),
}

impl<C> ResolvedConnection<C> {
    pub fn as_local(&self) -> Option<&LocalConnection> {
        match self {
            Self::Local(local) => Some(local),
            Self::Remote(_) => None,
        }
    }

    pub fn as_remote(&self) -> Option<&C> {
        match self {
            Self::Local(_) => None,
            Self::Remote(remote) => Some(remote),
        }
    }
}

/// Immutable configuration plus the secrets and factory needed to turn a
/// network name into a connection.
#[derive(Debug, Clone)]
pub struct Resolver<F = HdWalletFactory> {
    config: Arc<Config>,
    credentials: Credentials,
    factory: F,
}

impl<F> Resolver<F>
where
    F: ProviderFactory,
{
    pub fn new(config: Config, credentials: Credentials, factory: F) -> Self {
        Self {
            config: Arc::new(config),
            credentials,
            factory,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn compiler(&self) -> &SolcConfig {
        &self.config.compilers.solc
    }

    pub fn reporter(&self) -> &ReporterConfig {
        &self.config.mocha
    }

    /// Looks up `name` and builds its connection.
    ///
    /// Secrets are checked before the factory runs, so a missing mnemonic
    /// or API key is a configuration error and never reaches the provider.
    #[instrument(skip(self))]
    pub fn resolve(
        &self,
        name: &str,
    ) -> Result<ResolvedNetwork<F::Connection>, ResolveError> {
        let profile = self.config.network(name)?;

        let connection = match &profile.connection {
            Connection::Local(local) => {
                debug!(host = %local.host, port = local.port, "Local network");
                ResolvedConnection::Local(local.clone())
            }
            Connection::Remote { provider } => {
                let mnemonic = self.credentials.require_mnemonic(name)?;
                let url = self.endpoint_url(name, provider)?;

                let connection = self.factory.build(ProviderRequest {
                    network: name,
                    mnemonic,
                    url,
                    network_id: profile.network_id,
                })?;

                ResolvedConnection::Remote(connection)
            }
        };

        Ok(resolved(name, profile, connection))
    }

    /// The RPC url a remote profile points at.
    pub fn endpoint_url(
        &self,
        name: &str,
        endpoint: &RemoteEndpoint,
    ) -> Result<Url, ResolveError> {
        match endpoint {
            RemoteEndpoint::Infura { subdomain } => {
                let api_key = self.credentials.require_api_key(name)?;
                let subdomain = subdomain.as_deref().unwrap_or(name);

                Ok(infura_url(subdomain, api_key.expose())?)
            }
            RemoteEndpoint::Url { url } => Ok(url.clone()),
        }
    }
}

fn resolved<C>(
    name: &str,
    profile: &NetworkProfile,
    connection: ResolvedConnection<C>,
) -> ResolvedNetwork<C> {
    ResolvedNetwork {
        name: name.to_string(),
        network_id: profile.network_id,
        gas: profile.gas,
        gas_price: profile.gas_price,
        skip_dry_run: profile.skip_dry_run.unwrap_or_default(),
        connection,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::{ConfigurationError, ProviderError};

    const PHRASE: &str =
        "test test test test test test test test test test test junk";

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct FakeConnection {
        network: String,
        url: Url,
        phrase: String,
        network_id: NetworkId,
    }

    #[derive(Debug, Default)]
    struct RecordingFactory {
        calls: AtomicUsize,
    }

    impl ProviderFactory for RecordingFactory {
        type Connection = FakeConnection;

        fn build(
            &self,
            request: ProviderRequest<'_>,
        ) -> Result<FakeConnection, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            Ok(FakeConnection {
                network: request.network.to_string(),
                url: request.url,
                phrase: request.mnemonic.phrase().to_string(),
                network_id: request.network_id,
            })
        }
    }

    fn resolver(
        mnemonic: Option<&str>,
        api_key: Option<&str>,
    ) -> Resolver<RecordingFactory> {
        Resolver::new(
            Config::builtin(),
            Credentials::parse(mnemonic, api_key),
            RecordingFactory::default(),
        )
    }

    fn calls(resolver: &Resolver<RecordingFactory>) -> usize {
        resolver.factory.calls.load(Ordering::SeqCst)
    }

    #[test]
    fn documented_chain_ids() {
        let resolver = resolver(Some(PHRASE), Some("key"));

        for (name, id) in [("mainnet", 1), ("kovan", 42), ("ropsten", 3), ("matic", 13)] {
            let network = resolver.resolve(name).unwrap();

            assert_eq!(network.network_id, NetworkId::id(id), "{name}");
            assert_eq!(network.name, name);
        }
    }

    #[test]
    fn local_networks_skip_the_factory() {
        let resolver = resolver(None, None);

        let development = resolver.resolve("development").unwrap();
        let matic_dev = resolver.resolve("matic_dev").unwrap();

        assert_eq!(
            development.connection,
            ResolvedConnection::Local(LocalConnection {
                host: "localhost".to_string(),
                port: 8545,
            })
        );
        assert!(development.skip_dry_run);
        assert_eq!(matic_dev.connection.as_local().unwrap().port, 8546);
        assert!(!matic_dev.skip_dry_run);
        assert_eq!(calls(&resolver), 0);
    }

    #[test]
    fn unknown_network_is_a_configuration_error() {
        let resolver = resolver(Some(PHRASE), Some("key"));

        let err = resolver.resolve("unknown_name").unwrap_err();

        assert!(matches!(
            err,
            ResolveError::Configuration(ConfigurationError::UnknownNetwork { .. })
        ));
        assert_eq!(calls(&resolver), 0);
    }

    #[test]
    fn ropsten_targets_infura() {
        let resolver = resolver(Some(PHRASE), Some("abc123"));

        let ropsten = resolver.resolve("ropsten").unwrap();
        let connection = ropsten.connection.as_remote().unwrap();

        assert_eq!(connection.url.as_str(), "https://ropsten.infura.io/v3/abc123");
        assert_eq!(connection.phrase, PHRASE);
        assert_eq!(connection.network_id, NetworkId::id(3));
        assert_eq!(ropsten.gas, Some(Gas(8_000_000)));
        assert_eq!(ropsten.gas_price, Some(GasPrice(100_000_000_000)));
        assert!(ropsten.skip_dry_run);
    }

    #[test]
    fn matic_uses_fixed_url_without_api_key() {
        let resolver = resolver(Some(PHRASE), None);

        let matic = resolver.resolve("matic").unwrap();

        assert_eq!(
            matic.connection.as_remote().unwrap().url.as_str(),
            "https://testnet.matic.network/"
        );
        assert_eq!(matic.gas, Some(Gas(400_000_000)));
    }

    #[test]
    fn missing_api_key_fails_before_the_factory() {
        let resolver = resolver(Some(PHRASE), Some("  "));

        let err = resolver.resolve("mainnet").unwrap_err();

        assert!(matches!(
            err,
            ResolveError::Configuration(ConfigurationError::MissingApiKey { .. })
        ));
        assert_eq!(calls(&resolver), 0);
    }

    #[test]
    fn missing_mnemonic_fails_before_the_factory() {
        let resolver = resolver(None, Some("key"));

        let err = resolver.resolve("kovan").unwrap_err();

        assert!(matches!(
            err,
            ResolveError::Configuration(ConfigurationError::MissingMnemonic { .. })
        ));
        assert_eq!(calls(&resolver), 0);
    }

    #[test]
    fn bad_subdomain_is_a_provider_error() {
        let mut config = Config::builtin();
        config.networks.insert(
            "broken".to_string(),
            NetworkProfile::remote(
                RemoteEndpoint::Infura {
                    subdomain: Some("not a host".to_string()),
                },
                NetworkId::id(5),
            ),
        );
        let resolver = Resolver::new(
            config,
            Credentials::parse(Some(PHRASE), Some("key")),
            RecordingFactory::default(),
        );

        let err = resolver.resolve("broken").unwrap_err();

        assert!(matches!(
            err,
            ResolveError::ProviderConstruction(ProviderError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn subdomain_cannot_redirect_the_api_key() {
        let mut config = Config::builtin();
        config.networks.insert(
            "hijacked".to_string(),
            NetworkProfile::remote(
                RemoteEndpoint::Infura {
                    subdomain: Some("attacker.example/x?".to_string()),
                },
                NetworkId::id(1),
            ),
        );
        let resolver = Resolver::new(
            config,
            Credentials::parse(Some(PHRASE), Some("secret-key")),
            RecordingFactory::default(),
        );

        let err = resolver.resolve("hijacked").unwrap_err();

        assert!(matches!(
            err,
            ResolveError::ProviderConstruction(ProviderError::InvalidUrl { .. })
        ));
        assert!(!err.to_string().contains("secret-key"));
        assert_eq!(calls(&resolver), 0);
    }

    #[test]
    fn subdomain_override() {
        let mut config = Config::builtin();
        config.networks.insert(
            "goerli_alias".to_string(),
            NetworkProfile::remote(
                RemoteEndpoint::Infura {
                    subdomain: Some("goerli".to_string()),
                },
                NetworkId::id(5),
            ),
        );
        let resolver = Resolver::new(
            config,
            Credentials::parse(Some(PHRASE), Some("key")),
            RecordingFactory::default(),
        );

        let url = resolver.resolve("goerli_alias").unwrap().connection;

        assert_eq!(
            url.as_remote().unwrap().url.as_str(),
            "https://goerli.infura.io/v3/key"
        );
    }

    #[test]
    fn resolution_is_idempotent() {
        let resolver = resolver(Some(PHRASE), Some("key"));

        for name in resolver.config().network_names() {
            let first = resolver.resolve(&name).unwrap();
            let second = resolver.resolve(&name).unwrap();

            assert_eq!(first, second, "{name}");
        }
    }

    #[test]
    fn factory_runs_once_per_remote_resolution() {
        let resolver = resolver(Some(PHRASE), Some("key"));

        resolver.resolve("kovan").unwrap();

        assert_eq!(calls(&resolver), 1);
        assert_eq!(
            resolver.resolve("kovan").unwrap().connection.as_remote().unwrap().network,
            "kovan"
        );
    }

    #[test]
    fn exposes_compiler_and_reporter_settings() {
        let resolver = resolver(None, None);

        assert_eq!(resolver.compiler().version, "0.5.7");
        assert_eq!(resolver.compiler().settings.optimizer.runs, 200);
        assert_eq!(resolver.reporter().reporter, "eth-gas-reporter");
        assert_eq!(resolver.reporter().reporter_options.gas_price, 21);
    }

    #[test]
    fn resolver_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}

        assert_send_sync::<Resolver>();
        assert_send_sync::<Resolver<RecordingFactory>>();
    }

    #[test]
    fn real_factory_builds_ropsten_provider() {
        let resolver = Resolver::new(
            Config::builtin(),
            Credentials::parse(Some(PHRASE), Some("abc123")),
            HdWalletFactory::default(),
        );

        let ropsten = resolver.resolve("ropsten").unwrap();

        assert_eq!(
            ropsten.connection.as_remote().unwrap().url.as_str(),
            "https://ropsten.infura.io/v3/abc123"
        );
    }

    #[test]
    fn malformed_mnemonic_does_not_block_local_networks() {
        let resolver = Resolver::new(
            Config::builtin(),
            Credentials::parse(Some("one two three"), None),
            HdWalletFactory::default(),
        );

        let development = resolver.resolve("development").unwrap();

        assert_eq!(development.connection.as_local().unwrap().port, 8545);
    }

    #[test]
    fn malformed_mnemonic_fails_remote_construction() {
        let resolver = Resolver::new(
            Config::builtin(),
            Credentials::parse(Some("one two three"), Some("abc123")),
            HdWalletFactory::default(),
        );

        let err = resolver.resolve("ropsten").unwrap_err();

        assert!(matches!(
            err,
            ResolveError::ProviderConstruction(ProviderError::InvalidMnemonic(_))
        ));
    }
}
