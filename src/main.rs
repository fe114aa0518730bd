use clap::Parser;
use ordena::cli::{Cli, run};
use ordena::output::OutputFormatter;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        OutputFormatter::error(&e);
        std::process::exit(1);
    }
}
