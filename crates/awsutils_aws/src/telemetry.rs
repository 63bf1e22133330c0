use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Installs the global `fmt` subscriber writing to stderr.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` is used (e.g. `info`
/// or `awsutils_core=debug`).
pub fn init_tracing(default_filter: &str) -> Result<(), ParseError> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(default_filter)?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

