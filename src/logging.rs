use tracing_subscriber::filter::EnvFilter;

/// the crates whose events are shown at the requested verbosity
const CRATES: [&str; 2] = ["monz0_pots", "monz0_api"];

pub fn set_up(verbosity: u8) {
    let formatter = tracing_subscriber::fmt::format::debug_fn(|writer, _field, value| {
        write!(writer, "{:?}", value)
    });

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter(verbosity));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(true)
        .fmt_fields(formatter)
        .init();
}

fn filter(verbosity: u8) -> EnvFilter {
    EnvFilter::new(directives(verbosity))
}

fn directives(verbosity: u8) -> String {
    let level = max_level(verbosity);
    CRATES
        .iter()
        .fold("warn".to_string(), |directives, krate| {
            format!("{},{}={}", directives, krate, level)
        })
}

fn max_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
