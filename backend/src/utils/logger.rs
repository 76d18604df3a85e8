use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// `foodgram` is the binary's own target; the library crates log under theirs.
const DEFAULT_FILTER: &str = "foodgram=info,foodgram_backend=info,foodgram_adapters=info,tower_http=info";

pub fn init_logger(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .json(),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .init();
    }
}
