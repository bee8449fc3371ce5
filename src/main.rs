use tracing_subscriber::EnvFilter;

mod shell;
#[cfg(test)]
mod test;

use shell::Shell;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Keep the shell alive on ctrl-c. Foreground children share the
    // terminal's process group and still receive the signal.
    if let Err(e) = ctrlc::set_handler(|| {}) {
        eprintln!("Error setting Ctrl-C handler: {e}");
    }

    let status = Shell::new().run();
    std::process::exit(status);
}
