//! Logging: single-line records on stdout, tagged with a system and component label.
//!
//! A [`LogHandle`] is built once in `main` and entered on every thread that logs.
//! Dropping the guard returned by [`LogHandle::enter`] tears the scope down.

use std::fmt;
use tracing::dispatcher::DefaultGuard;
use tracing::{Dispatch, Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{ChronoUtc, FormatTime};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

pub const SYSTEM: &str = "STRESSING-CEPH";
pub const COMPONENT: &str = "stressor";

const DEFAULT_FILTER: &str = "info";
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Event formatter: `<timestamp> <LEVEL padded to 8> <system> <component> <message>`.
pub struct LineFormat {
    system: String,
    component: String,
    timer: ChronoUtc,
}

impl LineFormat {
    pub fn new(system: &str, component: &str) -> Self {
        Self {
            system: system.to_string(),
            component: component.to_string(),
            timer: ChronoUtc::new(TIME_FORMAT.to_string()),
        }
    }
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        self.timer.format_time(&mut writer)?;
        let level = event.metadata().level().to_string();
        write!(writer, " {:<8} {} {} ", level, self.system, self.component)?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Explicitly constructed logging handle. Cheap to clone; share it with worker threads.
#[derive(Clone)]
pub struct LogHandle {
    dispatch: Dispatch,
}

impl LogHandle {
    /// Log to stdout. Level comes from `RUST_LOG`, defaulting to `info`.
    pub fn stdout() -> Self {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        Self::new(std::io::stdout, env_filter)
    }

    pub fn new<W>(make_writer: W, env_filter: EnvFilter) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(make_writer)
            .with_ansi(false)
            .event_format(LineFormat::new(SYSTEM, COMPONENT))
            .finish();
        Self {
            dispatch: Dispatch::new(subscriber),
        }
    }

    /// Make this handle the current thread's logger until the guard is dropped.
    pub fn enter(&self) -> DefaultGuard {
        tracing::dispatcher::set_default(&self.dispatch)
    }
}
