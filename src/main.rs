use clap::Parser;
use imagegate::{cli::Cli, logger, GatewayConfig, GatewayError, StabilityClient};
use std::fs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    // Parse after dotenv so STABILITY_API_KEY can come from .env
    let cli = Cli::parse();

    logger::init_with_config(logger::LoggerConfig::from_env())?;
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    if !dotenv_loaded {
        log::debug!("No .env file found, using system environment variables");
    }

    let config = GatewayConfig::from_env();
    logger::log_config_info(&config);

    let client = StabilityClient::new(config)?;
    let session = cli.session();
    let output = cli.output_path();

    let result = match cli.load_request() {
        Ok(request) => client.generate(&session, request).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(image) => {
            fs::write(&output, image.as_bytes())?;
            log::info!("Image saved to: {} ({} bytes)", output.display(), image.len());
            println!("{}", output.display());
            Ok(())
        }
        Err(GatewayError::MissingCredential) => {
            eprintln!("Please set STABILITY_API_KEY or pass --api-key with your Stability AI key");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
