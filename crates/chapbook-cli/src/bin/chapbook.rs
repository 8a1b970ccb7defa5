//! Chapbook CLI Binary Entry Point

use chapbook_cli::{run, Cli};
use clap::Parser;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout();

    if let Err(err) = run(cli, &mut stdout) {
        eprintln!("❌ {:#}", err);
        std::process::exit(1);
    }
}
