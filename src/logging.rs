use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize structured logging once. Safe to call repeatedly; later calls
/// are no-ops (matters for the CLI, which may re-enter through subcommands).
pub fn init() {
    let level = match std::env::var("CALLBOARD_LOG").as_deref() {
        Ok("debug") => Level::DEBUG,
        Ok("trace") => Level::TRACE,
        Ok("warn") => Level::WARN,
        Ok("error") => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}
