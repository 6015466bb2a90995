use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the process-wide JSON subscriber.
///
/// `RUST_LOG` wins over `log_level` when set. Every event carries the
/// service name through the root span opened by the binary.
pub fn init_tracing(service_name: &str, log_level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .json()
                .flatten_event(true),
        )
        .try_init();

    if let Err(e) = installed {
        eprintln!(
            "Tracing for service '{}' was already initialised: {}",
            service_name, e
        );
    }
}
