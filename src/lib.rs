//! Network profiles for contract deployments.
//!
//! A [`Config`] holds the named networks, solc settings and gas reporter
//! options. A [`Resolver`] turns a network name into a connection, building
//! the HD wallet provider for remote networks only when they are selected.

pub mod compiler;
pub mod config;
pub mod credentials;
pub mod error;
pub mod provider;
pub mod resolver;
pub mod serde_utils;
pub mod summary;
pub mod types;

pub use config::{Config, Connection, LocalConnection, NetworkProfile, RemoteEndpoint};
pub use credentials::Credentials;
pub use error::{ConfigurationError, ProviderError, ResolveError};
pub use provider::{HdWalletConnection, HdWalletFactory, ProviderFactory};
pub use resolver::{ResolvedConnection, ResolvedNetwork, Resolver};
