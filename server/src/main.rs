use clap::Parser;
use server::network::Server;
use server::registry::GameRegistry;
use server::session::SessionManager;

/// Authoritative room server for turn-based multiplayer games.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Server IP address to bind to
    #[clap(short = 'H', long, default_value = "127.0.0.1")]
    host: String,
    /// Server port to listen on
    #[clap(short, long, default_value = "8080")]
    port: u16,
    /// Maximum concurrent client connections
    #[clap(short, long, default_value = "64")]
    max_clients: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let registry = GameRegistry::new();
    log::info!("{} game(s) registered", registry.len());
    let session = SessionManager::new(registry);

    let address = format!("{}:{}", args.host, args.port);
    let mut server = Server::new(&address, args.max_clients, session).await?;

    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                log::error!("server stopped with error: {e}");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            log::info!("received ctrl-c, shutting down");
        }
    }

    Ok(())
}
