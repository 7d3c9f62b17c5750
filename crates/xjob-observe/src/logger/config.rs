use crate::logger::format::LoggerFormat;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// `EnvFilter` directive, e.g. `info` or `info,xjob.job=debug`.
    pub level: String,
    pub with_targets: bool,
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::new(LoggerFormat::Text, "info")
    }
}

impl LoggerConfig {
    /// Colour is on only when stdout is a terminal.
    pub fn new(format: LoggerFormat, level: impl Into<String>) -> Self {
        let use_color = cfg!(test) || atty::is(atty::Stream::Stdout);
        Self {
            format,
            level: level.into(),
            with_targets: true,
            use_color,
        }
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }
}
