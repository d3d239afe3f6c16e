use std::fmt;
use std::io::IsTerminal;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::{format::Writer, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// ANSI color codes for console output
const COLOR_RESET: &str = "\x1b[0m";
const COLOR_CYAN: &str = "\x1b[36m";
const COLOR_MAGENTA: &str = "\x1b[35m";
const COLOR_GREEN: &str = "\x1b[32m";
const COLOR_BRIGHT_YELLOW: &str = "\x1b[93m";
const COLOR_BRIGHT_RED: &str = "\x1b[91m";
const COLOR_BRIGHT_GRAY: &str = "\x1b[90m";

const SOURCE_WIDTH: usize = 14;
const LEVEL_WIDTH: usize = 5;

/// Log line formatter for the ccnl tool.
///
/// Lines read `[time] [source] [LEVEL] [suite len=N] message`. The source is
/// the explicit `component` field when present, otherwise the module that
/// logged (`ccnl_wire::packet` shows as `ccnl-packet`). The suite block
/// appears only for events that carry packet fields.
pub struct CcnlLogFormatter {
    service_name: String,
    color_enabled: bool,
}

/// Log with a component tag at info level
#[macro_export]
macro_rules! component_info {
    ($component:expr, $($arg:tt)*) => {
        tracing::info!(component = $component, $($arg)*)
    };
}

/// Log with a component tag at debug level
#[macro_export]
macro_rules! component_debug {
    ($component:expr, $($arg:tt)*) => {
        tracing::debug!(component = $component, $($arg)*)
    };
}

/// Log with a component tag at error level
#[macro_export]
macro_rules! component_error {
    ($component:expr, $($arg:tt)*) => {
        tracing::error!(component = $component, $($arg)*)
    };
}

impl CcnlLogFormatter {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            color_enabled: colors_supported(),
        }
    }

    /// Source label for an event: explicit component, then ccnl module, then service name
    fn source(&self, component: Option<&str>, target: &str) -> String {
        if let Some(comp) = component {
            return format!("{}-{}", self.service_name, comp);
        }
        match target.split_once("::") {
            Some((krate, module)) if krate.starts_with("ccnl") => {
                let module = module.rsplit("::").next().unwrap_or(module);
                format!("{}-{}", self.service_name, module)
            }
            _ => self.service_name.clone(),
        }
    }

    fn paint<'a>(&self, color: &'a str) -> &'a str {
        if self.color_enabled {
            color
        } else {
            ""
        }
    }
}

fn level_style(level: &Level) -> (&'static str, &'static str) {
    match *level {
        Level::ERROR => ("ERROR", COLOR_BRIGHT_RED),
        Level::WARN => ("WARN", COLOR_BRIGHT_YELLOW),
        Level::INFO => ("INFO", COLOR_GREEN),
        Level::DEBUG => ("DEBUG", COLOR_BRIGHT_GRAY),
        Level::TRACE => ("TRACE", COLOR_BRIGHT_GRAY),
    }
}

fn fit(name: &str, width: usize) -> String {
    if name.chars().count() > width {
        let short: String = name.chars().take(width - 1).collect();
        format!("{}…", short)
    } else {
        format!("{:<width$}", name, width = width)
    }
}

impl<S, N> FormatEvent<S, N> for CcnlLogFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        let mut fields = EventFields::default();
        event.record(&mut fields);

        let (label, color) = level_style(metadata.level());
        let reset = self.paint(COLOR_RESET);

        write!(
            writer,
            "{}[{}]{} [{}] [{}{:<width$}{}] ",
            self.paint(COLOR_CYAN),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            reset,
            fit(&self.source(fields.component.as_deref(), metadata.target()), SOURCE_WIDTH),
            self.paint(color),
            label,
            reset,
            width = LEVEL_WIDTH,
        )?;

        if let Some(block) = fields.packet_block() {
            write!(writer, "{}[{}]{} ", self.paint(COLOR_MAGENTA), block, reset)?;
        }

        writeln!(writer, "{}", fields.message)
    }
}

/// Fields of one event the formatter knows how to place
#[derive(Debug, Default, PartialEq, Eq)]
struct EventFields {
    message: String,
    component: Option<String>,
    suite: Option<String>,
    len: Option<u64>,
    payload_offset: Option<u64>,
    components: Option<u64>,
}

impl EventFields {
    /// `suite len=N ...` for packet and prefix events
    fn packet_block(&self) -> Option<String> {
        let mut block = self.suite.clone()?;
        if let Some(len) = self.len {
            block.push_str(&format!(" len={}", len));
        }
        if let Some(offset) = self.payload_offset {
            block.push_str(&format!(" payload@{}", offset));
        }
        if let Some(count) = self.components {
            block.push_str(&format!(" comps={}", count));
        }
        Some(block)
    }

    fn set_text(&mut self, name: &str, value: String) {
        match name {
            "message" => self.message = value,
            "component" => self.component = Some(value),
            "suite" => self.suite = Some(value),
            _ => {}
        }
    }
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.set_text(field.name(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "len" => self.len = Some(value),
            "payload_offset" => self.payload_offset = Some(value),
            "components" => self.components = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        if let Ok(value) = u64::try_from(value) {
            self.record_u64(field, value);
        }
    }

    // `%value` and format_args messages arrive here already rendered
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.set_text(field.name(), format!("{:?}", value));
    }
}

/// Colors only when stderr is a terminal
fn colors_supported() -> bool {
    if std::env::var("TERM").unwrap_or_default() == "dumb" {
        return false;
    }
    std::io::stderr().is_terminal()
}
