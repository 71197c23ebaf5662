//! Banqi engine entry point: build the lookup tables, then speak the text
//! protocol on stdin/stdout. Logging goes to stderr so protocol output
//! stays clean.

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "banqi", version, about = "Chinese dark chess engine")]
struct Cli {
    /// Seed for the search driver's random flip fallback
    #[arg(long, default_value_t = 9)]
    seed: u64,

    /// Fix the search depth instead of the 6/12-ply policy
    #[arg(long)]
    depth: Option<i32>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    banqi::init();

    if let Err(e) = banqi::protocol::run_loop(cli.seed, cli.depth) {
        eprintln!("protocol loop failed: {e:?}");
    }
}
