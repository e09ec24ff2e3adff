use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Initialise logging. With `debug` the default level is `debug` and can be
/// overridden via `RUST_LOG`; otherwise the level is fixed at `info`.
/// When `log_file` is given, output is written there instead of stdout.
pub fn init(debug: bool, log_file: Option<PathBuf>) {
    // Without debug we ignore `RUST_LOG` so a stray variable in the user's
    // environment cannot turn on verbose output.
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let _ = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "gm_screen.log".into());
            let appender = tracing_appender::rolling::never(dir, name);
            builder.with_writer(appender).with_ansi(false).try_init()
        }
        None => builder.try_init(),
    };
}
