//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = osmap_cli::run() {
        eprintln!("osmap: {err}");
        std::process::exit(1);
    }
}
