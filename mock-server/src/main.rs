use mock_server::Credentials;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let defaults = Credentials::default();
    let credentials = Credentials::new(
        std::env::var("SHIPWIRE_USERNAME").unwrap_or(defaults.username),
        std::env::var("SHIPWIRE_PASSWORD").unwrap_or(defaults.password),
    );
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, username = %credentials.username, "mock shipwire api listening");
    mock_server::run(listener, credentials).await
}
