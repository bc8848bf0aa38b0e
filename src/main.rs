use clap::Parser;
use shellwright::cli::Cli;
use shellwright::commands;
use shellwright::core::exit;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shellwright=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match commands::dispatch(cli.command).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            exit::code_for(&err)
        }
    };
    std::process::exit(code);
}
