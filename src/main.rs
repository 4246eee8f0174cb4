use std::io;

use tracing_subscriber::EnvFilter;

fn main() -> io::Result<()> {
    // Logs go to stderr so stdout carries only console output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    plum_arbiter::console::console_top::run_stdio_loop()
}
