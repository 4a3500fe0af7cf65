use clap::Parser;
use kioku::cli::Cli;

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(err) = cli.run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
