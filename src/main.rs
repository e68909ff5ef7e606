// src/main.rs

use remon::{cli, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run(cli::parse()).await {
        eprintln!("remon error: {err:?}");
        std::process::exit(1);
    }
}
