use deploy_config::config::{Config, Connection, RemoteEndpoint};

/// Lets the user pick a network when none was given on the command line.
pub fn select_network(config: &Config) -> eyre::Result<String> {
    let names = config.network_names();

    if names.is_empty() {
        eyre::bail!("No networks configured");
    }

    let Some(name) =
        inquire::Select::new("Network (Esc to quit):", names).prompt_skippable()?
    else {
        std::process::exit(0);
    };

    Ok(name)
}

pub fn print_networks(config: &Config) {
    println!("Networks:");
    for (name, profile) in &config.networks {
        let endpoint = match &profile.connection {
            Connection::Local(local) => format!("{}:{}", local.host, local.port),
            Connection::Remote {
                provider: RemoteEndpoint::Infura { subdomain },
            } => format!("infura ({})", subdomain.as_deref().unwrap_or(name)),
            Connection::Remote {
                provider: RemoteEndpoint::Url { url },
            } => url.to_string(),
        };

        println!("  {name}");
        println!("    Network id: {}", profile.network_id);
        println!("    Endpoint: {endpoint}");
        if let Some(gas) = profile.gas {
            println!("    Gas: {gas}");
        }
        if let Some(gas_price) = profile.gas_price {
            println!("    Gas price: {gas_price}");
        }
    }
}
