// calc-client: answer the grading server's expressions and print the secret
use anyhow::{Context, Result};
use calc_client::{Client, ClientConfig, DEFAULT_PORT};
use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "calc-client")]
#[command(about = "Solve the server's arithmetic expressions over TLS", long_about = None)]
#[command(version = "0.1.0")]
struct Cli {
    /// Use an encrypted (TLS) connection
    #[arg(short = 's', required = true)]
    tls: bool,

    /// Server port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Server hostname
    hostname: String,

    /// Username sent in the HELLO message
    username: String,
}

fn init_tracing() {
    // stdout carries only the secret
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = ClientConfig::from_env(&cli.hostname, cli.port).with_tls(cli.tls);

    let mut client = Client::connect(&config)
        .with_context(|| format!("failed to connect to {}", config.address()))?;
    let secret = client
        .run(&cli.username)
        .context("session with server failed")?;

    println!("{}", secret);
    Ok(())
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
