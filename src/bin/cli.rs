use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // reqwest is built without a default TLS provider
    let _ = rustls::crypto::ring::default_provider().install_default();

    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    gyanrich::cli::run().await
}
