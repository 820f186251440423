use tracing_subscriber::EnvFilter;

use interface_model::cli;

fn main() {
    let command_line_interface = cli::CommandLineInterface::load();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if command_line_interface.verbose {
            EnvFilter::new("interface_model=debug")
        } else {
            EnvFilter::new("interface_model=info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    if let Err(e) = command_line_interface.run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
