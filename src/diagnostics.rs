//! Operator-facing configuration transcript.
//!
//! The resolver reports each value as it becomes known. Sinks decide where the
//! lines go; the order of `report` calls is the order of the transcript.

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const REDACTED: &str = "(value hidden)";
pub const NOT_SET: &str = "(not set)";
pub const HEADING: &str = " Using configuration:";

const LABEL_WIDTH: usize = 27;

pub trait DiagnosticsSink: Send + Sync {
    fn report(&self, label: &str, value: &str, redact: bool);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticLine {
    pub label: String,
    pub value: String,
}

impl DiagnosticLine {
    pub fn new(label: &str, value: &str, redact: bool) -> Self {
        Self {
            label: label.to_string(),
            value: displayed_value(value, redact).to_string(),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "  {:<width$}{}",
            format!("{}:  ", self.label),
            self.value,
            width = LABEL_WIDTH
        )
    }
}

fn displayed_value(value: &str, redact: bool) -> &str {
    if redact { REDACTED } else { value }
}

pub fn format_line(label: &str, value: &str, redact: bool) -> String {
    DiagnosticLine::new(label, value, redact).render()
}

/// Routes the transcript into the `tracing` pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn report(&self, label: &str, value: &str, redact: bool) {
        tracing::info!(target: "dbpatch::config", "{}", format_line(label, value, redact));
    }
}

/// Writes formatted lines to a writer, optionally preceded by a heading.
#[derive(Debug)]
pub struct WriterSink<W> {
    state: Mutex<WriterState<W>>,
}

#[derive(Debug)]
struct WriterState<W> {
    writer: W,
    heading: Option<&'static str>,
    error: Option<io::Error>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            state: Mutex::new(WriterState {
                writer,
                heading: None,
                error: None,
            }),
        }
    }

    pub fn with_heading(writer: W) -> Self {
        Self {
            state: Mutex::new(WriterState {
                writer,
                heading: Some(HEADING),
                error: None,
            }),
        }
    }

    pub fn into_inner(self) -> W {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .writer
    }

    /// First write failure since the last call. Nothing more is written after
    /// a failure.
    pub fn take_error(&self) -> io::Result<()> {
        match self.lock().error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, WriterState<W>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> DiagnosticsSink for WriterSink<W> {
    fn report(&self, label: &str, value: &str, redact: bool) {
        let mut state = self.lock();
        if state.error.is_some() {
            return;
        }
        let result = match state.heading.take() {
            Some(heading) => writeln!(state.writer, "{}", heading),
            None => Ok(()),
        }
        .and_then(|()| writeln!(state.writer, "{}", format_line(label, value, redact)));
        if let Err(err) = result {
            tracing::warn!(error = %err, "failed to write configuration transcript");
            state.error = Some(err);
        }
    }
}

/// Captures the transcript in memory.
#[derive(Debug, Default)]
pub struct TranscriptSink {
    lines: Mutex<Vec<DiagnosticLine>>,
}

impl TranscriptSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<DiagnosticLine> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn labels(&self) -> Vec<String> {
        self.lines().into_iter().map(|line| line.label).collect()
    }

    pub fn render(&self) -> Vec<String> {
        self.lines().iter().map(DiagnosticLine::render).collect()
    }
}

impl DiagnosticsSink for TranscriptSink {
    fn report(&self, label: &str, value: &str, redact: bool) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(DiagnosticLine::new(label, value, redact));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_label_column() {
        let line = format_line("JDBC URL", "jdbc:test", false);
        assert_eq!(line, "  JDBC URL:                  jdbc:test");
        assert_eq!(line.find("jdbc:test"), Some(2 + LABEL_WIDTH));
    }

    #[test]
    fn long_labels_are_not_truncated() {
        let line = format_line("Password (overridden) extra", "x", false);
        assert!(line.starts_with("  Password (overridden) extra:  x"));
    }

    #[test]
    fn redaction_replaces_value() {
        let line = format_line("Password", "hunter2", true);
        assert!(line.ends_with(REDACTED));
        assert!(!line.contains("hunter2"));
    }

    #[test]
    fn writer_sink_prints_heading_once() {
        let sink = WriterSink::with_heading(Vec::new());
        sink.report("Username", "alice", false);
        sink.report("Password", "secret", true);
        let out = String::from_utf8(sink.into_inner()).expect("utf8");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADING);
        assert!(lines[1].contains("alice"));
        assert!(!out.contains("secret"));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writer_sink_keeps_first_write_error() {
        let sink = WriterSink::with_heading(BrokenPipe);
        sink.report("Username", "alice", false);
        sink.report("Password", "secret", true);
        let err = sink.take_error().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(sink.take_error().is_ok());
    }

    #[test]
    fn transcript_keeps_call_order() {
        let sink = TranscriptSink::new();
        sink.report("B", "2", false);
        sink.report("A", "1", false);
        assert_eq!(sink.labels(), vec!["B".to_string(), "A".to_string()]);
    }
}
