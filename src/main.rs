use clap::Parser;
use cli::{Args, Command};
use deploy_config::config::Config;
use deploy_config::credentials::Credentials;
use deploy_config::provider::HdWalletFactory;
use deploy_config::resolver::{ResolvedConnection, Resolver};
use deploy_config::serde_utils::{self, Format};
use deploy_config::summary::NetworkSummary;
use eyre::Context;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

mod cli;
mod interactive;

async fn start() -> eyre::Result<()> {
    let args = Args::parse();

    let config = match args.config.as_ref() {
        Some(path) => {
            info!("Using config at: {}", path.display());
            Config::load(path).await?
        }
        None => Config::builtin(),
    };

    let credentials = Credentials::parse(
        args.mnemonic.as_deref(),
        args.infura_api_key.as_deref(),
    );

    let resolver = Resolver::new(
        config,
        credentials,
        HdWalletFactory::new(args.address_index),
    );

    match args.command {
        Command::List => interactive::print_networks(resolver.config()),
        Command::Resolve { network, check } => {
            let network = match network {
                Some(network) => network,
                None => interactive::select_network(resolver.config())?,
            };

            let resolved = resolver
                .resolve(&network)
                .with_context(|| format!("Resolving network {network}"))?;

            if check {
                match &resolved.connection {
                    ResolvedConnection::Remote(remote) => {
                        remote.verify_chain_id(resolved.network_id).await?;
                    }
                    ResolvedConnection::Local(_) => {
                        info!("Skipping chain id check for local network");
                    }
                }
            }

            let summary = NetworkSummary::from(&resolved);
            print!("{}", Format::Yaml.serialize_to_string(&summary)?);
        }
        Command::Show { format, output } => match output {
            Some(path) => {
                serde_utils::write_serialize(&path, resolver.config()).await?;
                info!("Wrote configuration to {}", path.display());
            }
            None => {
                println!("{}", format.serialize_to_string(resolver.config())?);
            }
        },
        Command::CompilerArgs => {
            println!("{}", resolver.compiler().forge_args().join(" "));
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    dotenv::dotenv().ok();

    let filter = EnvFilter::from_default_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .with(ErrorLayer::default())
        .init();

    match start().await {
        Ok(()) => Ok(()),
        Err(err) => {
            tracing::error!("{:?}", err);
            std::process::exit(1)
        }
    }
}
