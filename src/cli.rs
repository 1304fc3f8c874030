use std::path::PathBuf;

use clap::{Parser, Subcommand};
use deploy_config::credentials::{API_KEY_ENV, MNEMONIC_ENV};
use deploy_config::serde_utils::Format;
use deploy_config::types::AddressIndex;

#[derive(Debug, Clone, Parser)]
#[clap(rename_all = "kebab-case", version, about)]
pub struct Args {
    /// Path to a network configuration file (yaml, json or toml)
    ///
    /// The built-in profiles are used when omitted
    #[clap(short, long, env)]
    pub config: Option<PathBuf>,

    /// BIP-39 phrase the deployer account is derived from
    #[clap(long, env = MNEMONIC_ENV, hide_env_values = true)]
    pub mnemonic: Option<String>,

    /// Infura project id used by the infura endpoints
    #[clap(long, env = API_KEY_ENV, hide_env_values = true)]
    pub infura_api_key: Option<String>,

    /// HD derivation index of the deployer account
    #[clap(long, env, default_value = "0")]
    pub address_index: AddressIndex,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// List the configured networks
    List,

    /// Resolve a network and print its connection
    Resolve {
        /// Network name, prompts when omitted
        network: Option<String>,

        /// Ask the node for its chain id and compare it to the profile
        #[clap(long)]
        check: bool,
    },

    /// Print the effective configuration
    Show {
        #[clap(short, long, value_enum, default_value_t = Format::Yaml)]
        format: Format,

        /// Write to a file instead, the format follows its extension
        #[clap(short, long, conflicts_with = "format")]
        output: Option<PathBuf>,
    },

    /// Print the solc settings as `forge build` flags
    CompilerArgs,
}
