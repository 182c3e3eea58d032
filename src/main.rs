use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "th", about = concat!("[#] thicket v", env!("CARGO_PKG_VERSION"), " - tasks with tag trees"), version)]
struct Cli {
    /// Keep the task database under a different directory
    #[arg(short = 'C', long = "data-dir")]
    data_dir: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = thicket::session::run_interactive(cli.data_dir.as_deref()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
