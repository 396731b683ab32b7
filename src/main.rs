use clap::Parser;

#[tokio::main]
async fn main() {
    // A missing .env file is fine; real env vars still apply.
    let _ = dotenvy::dotenv();

    let cli = imaging_proxy::cli::Cli::parse();
    if let Err(e) = imaging_proxy::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
