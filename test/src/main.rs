mod client;
mod tests;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use client::DotnoteClient;
use context::TestContext;

#[derive(Parser)]
#[command(
    name = "dotnote-test",
    about = "Acceptance tests for a live DotNote daemon"
)]
struct Cli {
    /// Daemon address as host:port (required unless --list)
    #[arg(long)]
    host: Option<String>,
}

async fn setup(host: &str) -> Result<Arc<TestContext>> {
    let client = DotnoteClient::new(host);
    client
        .wait_for_ready(Duration::from_secs(10))
        .await
        .context("initial connection to daemon failed")?;
    eprintln!("Connected to daemon at {host}");
    Ok(Arc::new(TestContext { client }))
}

fn register_all() -> Vec<libtest_mimic::Trial> {
    let mut tests = Vec::new();
    tests.extend(tests::index::register());
    tests.extend(tests::messages::register());
    tests.extend(tests::validation::register());
    tests
}

fn main() {
    let all_args: Vec<String> = std::env::args().collect();

    // clap handles --host, libtest-mimic handles --list/filters/etc.
    let mut our_args = vec![all_args[0].clone()];
    let mut test_args = vec![all_args[0].clone()];
    let mut i = 1;
    while i < all_args.len() {
        match all_args[i].as_str() {
            "--host" => {
                our_args.push(all_args[i].clone());
                if i + 1 < all_args.len() {
                    i += 1;
                    our_args.push(all_args[i].clone());
                }
            }
            _ if all_args[i].starts_with("--host=") => {
                our_args.push(all_args[i].clone());
            }
            _ => {
                test_args.push(all_args[i].clone());
            }
        }
        i += 1;
    }

    let cli = Cli::parse_from(&our_args);
    let mimic_args = libtest_mimic::Arguments::from_iter(test_args);

    if mimic_args.list {
        libtest_mimic::run(&mimic_args, register_all()).exit();
    }

    let host = cli.host.as_deref().unwrap_or_else(|| {
        eprintln!("error: --host is required when running tests");
        eprintln!("usage: dotnote-test --host <ADDRESS:PORT>");
        std::process::exit(1);
    });

    let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");
    let ctx = rt.block_on(setup(host)).unwrap_or_else(|e| {
        eprintln!("Failed to connect to daemon: {e:#}");
        std::process::exit(1);
    });

    context::set_context(ctx);
    libtest_mimic::run(&mimic_args, register_all()).exit();
}
