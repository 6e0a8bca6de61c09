//! Accepts raw TCP connections and logs each parsed request.

use httpfromtcp::config::Config;
use httpfromtcp::http::connection::read_request;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("Listening on {}", cfg.listen_addr);

    loop {
        let (mut socket, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);

        match read_request(&mut socket, cfg.limits()).await {
            Ok(request) => println!("{}", request),
            Err(e) => tracing::error!("Failed to parse request from {}: {}", peer, e),
        }
        info!("Connection from {} closed", peer);
    }
}
