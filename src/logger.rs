//! Build log stream
//!
//! Buildpack output goes to two optional sinks: `info` for the lines a
//! user sees during `pack build`, and `debug` for detail that is only
//! written when debug output is requested. Sinks are injectable so tests
//! can capture and assert on exactly what was logged.

use console::{style, StyledObject};
use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Marker printed before every first line
pub const FIRST_LINE_MARKER: &str = "----->";

/// Indent for lines that continue a first line (width of the marker plus a space)
pub const SUBSEQUENT_LINE_INDENT: &str = "       ";

type Sink = Arc<Mutex<Box<dyn Write + Send>>>;

/// Logger writing buildpack output to injectable streams
#[derive(Clone, Default)]
pub struct Logger {
    debug: Option<Sink>,
    info: Option<Sink>,
    /// Forced styling; `None` follows the console crate's terminal detection
    colors: Option<bool>,
}

impl Logger {
    /// Route info output to `writer`
    pub fn with_info(mut self, writer: impl Write + Send + 'static) -> Self {
        self.info = Some(Arc::new(Mutex::new(Box::new(writer))));
        self
    }

    /// Route debug output to `writer`
    pub fn with_debug(mut self, writer: impl Write + Send + 'static) -> Self {
        self.debug = Some(Arc::new(Mutex::new(Box::new(writer))));
        self
    }

    /// Force colored output on or off
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Apply the configured color setting, leaving it unchanged when unset
    pub fn with_color_setting(mut self, colors: Option<bool>) -> Self {
        if colors.is_some() {
            self.colors = colors;
        }
        self
    }

    pub fn is_info_enabled(&self) -> bool {
        self.info.is_some()
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.debug.is_some()
    }

    /// Write a headline, prefixed with the red marker
    pub fn first_line(&self, message: impl fmt::Display) {
        let marker = self.paint(style(FIRST_LINE_MARKER).red().bold());
        write_line(self.info.as_ref(), format_args!("{} {}", marker, message));
    }

    /// Write a line that belongs to the preceding first line
    pub fn subsequent_line(&self, message: impl fmt::Display) {
        write_line(
            self.info.as_ref(),
            format_args!("{}{}", SUBSEQUENT_LINE_INDENT, message),
        );
    }

    pub fn info(&self, message: impl fmt::Display) {
        write_line(self.info.as_ref(), format_args!("{}", message));
    }

    pub fn debug(&self, message: impl fmt::Display) {
        write_line(self.debug.as_ref(), format_args!("{}", message));
    }

    /// Cyan-highlight a value (process types, layer names)
    pub fn highlight(&self, text: &str) -> String {
        self.paint(style(text).cyan()).to_string()
    }

    fn paint<D>(&self, styled: StyledObject<D>) -> StyledObject<D> {
        match self.colors {
            Some(colors) => styled.force_styling(colors),
            None => styled,
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("debug", &self.debug.is_some())
            .field("info", &self.info.is_some())
            .field("colors", &self.colors)
            .finish()
    }
}

fn write_line(sink: Option<&Sink>, line: fmt::Arguments<'_>) {
    let Some(sink) = sink else {
        return;
    };
    // Log output is best effort; a broken sink must not fail the build
    if let Ok(mut writer) = sink.lock() {
        let _ = writeln!(writer, "{}", line);
        let _ = writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Buffer;

    #[test]
    fn first_line_has_marker() {
        let info = Buffer::new();
        let logger = Logger::default().with_info(info.clone()).with_colors(false);

        logger.first_line("Contributing to layer");

        assert_eq!(info.contents(), "-----> Contributing to layer\n");
    }

    #[test]
    fn first_line_colored_marker() {
        let info = Buffer::new();
        let logger = Logger::default().with_info(info.clone()).with_colors(true);

        logger.first_line("Process types:");

        let marker = style(FIRST_LINE_MARKER).red().bold().force_styling(true);
        assert_eq!(info.contents(), format!("{} Process types:\n", marker));
    }

    #[test]
    fn subsequent_line_indented() {
        let info = Buffer::new();
        let logger = Logger::default().with_info(info.clone());

        logger.subsequent_line("detail");

        assert_eq!(info.contents(), "       detail\n");
    }

    #[test]
    fn debug_only_written_when_enabled() {
        let info = Buffer::new();
        let logger = Logger::default().with_info(info.clone());
        assert!(!logger.is_debug_enabled());

        logger.debug("hidden");
        assert!(info.contents().is_empty());

        let debug = Buffer::new();
        let logger = logger.with_debug(debug.clone());
        logger.debug("shown");
        assert_eq!(debug.contents(), "shown\n");
        assert!(info.contents().is_empty());
    }

    #[test]
    fn default_logger_discards() {
        let logger = Logger::default();
        assert!(!logger.is_info_enabled());
        logger.first_line("nowhere");
        logger.info("nowhere");
    }

    #[test]
    fn highlight_respects_color_setting() {
        let logger = Logger::default().with_colors(false);
        assert_eq!(logger.highlight("web"), "web");

        let logger = Logger::default().with_colors(true);
        assert_eq!(
            logger.highlight("web"),
            style("web").cyan().force_styling(true).to_string()
        );
    }

    #[test]
    fn color_setting_none_keeps_forced_value() {
        let logger = Logger::default().with_colors(false).with_color_setting(None);
        assert_eq!(logger.highlight("web"), "web");
    }
}
