/// Main entry point for the matchbook simulator
///
/// Thin wrapper delegating to the interfaces layer; the application logic
/// lives in `interfaces::cli`.

use matchbook::interfaces::cli;

fn main() {
    cli::run();
}
