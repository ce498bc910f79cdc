use std::env;
use std::io;
use std::iter;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use waymark::api::{ScenarioCli, evaluate_cli, run_http_server};

fn init_tracing() {
    // RUST_LOG overrides the default level, e.g. RUST_LOG=waymark=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let raw_args: Vec<String> = env::args().collect();
    match raw_args.get(1).map(|s| s.as_str()) {
        Some("serve") => {
            let port = raw_args
                .get(2)
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(8080);
            info!(port, "starting waymark");
            if let Err(e) = run_http_server(port).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Some("evaluate") => {
            let cli = ScenarioCli::parse_from(
                iter::once("waymark evaluate".to_string()).chain(raw_args.into_iter().skip(2)),
            );
            match evaluate_cli(cli) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }
        _ => {
            eprintln!("Usage: waymark serve [port]");
            eprintln!("       waymark evaluate --city <CITY> --income <INCOME> [OPTIONS]");
            std::process::exit(1);
        }
    }
}
