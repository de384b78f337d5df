use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::prelude::*;

/// Install the global log subscriber.
///
/// `log` records are bridged into `tracing`. The filter comes from
/// `RUST_LOG` when set, else from `directive`, else `info`. Timestamps are
/// left out.
pub fn init(directive: Option<&str>) {
    struct EmptyTime;
    impl FormatTime for EmptyTime {
        fn format_time(&self, _: &mut format::Writer<'_>) -> std::fmt::Result {
            Ok(())
        }
    }

    let format = format()
        .with_timer(EmptyTime)
        .with_level(true)
        .with_target(true)
        .with_ansi(true);

    let mut filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive.unwrap_or("info")))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    for noisy in ["wgpu_core", "wgpu_hal", "winit"] {
        if let Ok(d) = format!("{}=warn", noisy).parse() {
            filter = filter.add_directive(d);
        }
    }

    let installed = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().event_format(format).with_filter(filter))
        .try_init();
    if installed.is_err() {
        log::debug!("log subscriber already installed");
    }
}
