//! Process-level entry helpers and error handling.

/// Install a panic hook that routes panics through the log before the
/// default hook prints them.
pub fn init_panic_handling() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        bevy::log::error!("towerview panicked: {}", info);
        default_hook(info);
    }));
}

/// Report an application error and exit with code 1.
pub fn handle_error(error: anyhow::Error) {
    eprintln!();
    eprintln!("Error running towerview:");
    eprintln!("{error:#}");
    eprintln!();
    eprintln!("Try running with --help for usage information.");
    std::process::exit(1);
}

/// Parse the command line arguments.
pub fn get_cli_args() -> crate::core::cli::CliArgs {
    use clap::Parser;
    crate::core::cli::CliArgs::parse()
}
