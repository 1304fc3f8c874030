use std::path::PathBuf;

use thiserror::Error;

use crate::types::{ChainId, NetworkId};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    ProviderConstruction(#[from] ProviderError),
}

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("unknown network {name:?}, available networks: {}", available.join(", "))]
    UnknownNetwork {
        name: String,
        available: Vec<String>,
    },

    #[error("network {network:?} needs a mnemonic, set MNEMONIC")]
    MissingMnemonic { network: String },

    #[error("network {network:?} needs an Infura API key, set INFURA_API_KEY")]
    MissingApiKey { network: String },

    #[error("failed to load configuration from {}: {reason:#}", path.display())]
    InvalidFile { path: PathBuf, reason: eyre::Report },
}

/// Failures building or talking to a remote provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("invalid RPC URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("could not derive wallet from mnemonic: {0}")]
    Wallet(#[from] ethers::signers::WalletError),

    #[error("RPC request failed: {0}")]
    Rpc(String),

    #[error("chain id mismatch: expected {expected}, node reports {actual}")]
    ChainIdMismatch { expected: NetworkId, actual: ChainId },
}
