//! User-facing reporting.
//!
//! The runner streams per-spec signals to a [`Reporter`] as execution
//! proceeds and hands it the aggregated report at the end. Reporters must
//! tolerate interleaving: sibling execution units run concurrently, so
//! calls arrive in no cross-unit order. The console implementation renders
//! a bordered title, one colored glyph per spec, and structured failure
//! detail as pretty-printed JSON.

use std::io::Write;
use std::sync::Mutex;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::assert::FailureDetail;
use crate::outcome::RunReport;

/// Receives run events. Implementations must not block the run.
pub trait Reporter: Send + Sync {
    /// Announces the run: suite name, number of specs that will produce
    /// outcomes, and whether the run was narrowed by focus.
    fn title(&self, suite: &str, specs: usize, focused: bool);

    fn spec_passed(&self, name: &str);

    fn spec_failed(&self, name: &str, failures: &[FailureDetail]);

    fn spec_skipped(&self, name: &str);

    /// Receives the aggregated report once every unit has joined.
    fn summary(&self, report: &RunReport);
}

/// Renders the title line shared by both reporters.
///
/// Pluralization is part of the contract: "1 test", "2 tests", with a
/// `(focused)` marker when the run was narrowed.
pub(crate) fn title_line(suite: &str, specs: usize, focused: bool) -> String {
    let noun = if specs == 1 { "test" } else { "tests" };
    if focused {
        format!("{suite}: {specs} {noun} (focused)")
    } else {
        format!("{suite}: {specs} {noun}")
    }
}

// ----------------------------------------------------------------------
// Console reporter
// ----------------------------------------------------------------------

/// Writes colored output to stdout.
pub struct ConsoleReporter {
    choice: ColorChoice,
}

impl ConsoleReporter {
    /// Colors when stdout is a terminal, plain text otherwise.
    pub fn auto() -> Self {
        let choice = if atty::is(atty::Stream::Stdout) {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self { choice }
    }

    pub fn with_choice(choice: ColorChoice) -> Self {
        Self { choice }
    }

    fn write_glyph(&self, color: Color) {
        let mut stdout = StandardStream::stdout(self.choice);
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)));
        let _ = write!(stdout, "\u{2022}");
        let _ = stdout.reset();
        let _ = stdout.flush();
    }
}

impl Reporter for ConsoleReporter {
    fn title(&self, suite: &str, specs: usize, focused: bool) {
        let line = title_line(suite, specs, focused);
        let border = "-".repeat(line.len());
        let color = if focused {
            // Orange, matching the narrowed-run convention.
            Color::Ansi256(208)
        } else {
            Color::Cyan
        };

        let mut stdout = StandardStream::stdout(self.choice);
        let _ = writeln!(stdout, "{border}");
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
        let _ = writeln!(stdout, "{line}");
        let _ = stdout.reset();
        let _ = writeln!(stdout, "{border}");
    }

    fn spec_passed(&self, _name: &str) {
        self.write_glyph(Color::Green);
    }

    fn spec_failed(&self, name: &str, failures: &[FailureDetail]) {
        let detail = match serde_json::to_string_pretty(failures) {
            Ok(json) => json,
            Err(_) => format!("{failures:?}"),
        };
        let mut stdout = StandardStream::stdout(self.choice);
        let _ = writeln!(stdout);
        let _ = writeln!(stdout, "{name}");
        let _ = writeln!(stdout, "{detail}");
        drop(stdout);
        self.write_glyph(Color::Red);
    }

    fn spec_skipped(&self, _name: &str) {
        self.write_glyph(Color::Yellow);
    }

    fn summary(&self, report: &RunReport) {
        let mut stdout = StandardStream::stdout(self.choice);
        let _ = writeln!(stdout);
        let _ = write!(stdout, "total {}", report.total());

        let parts = [
            (Color::Green, "passed", report.passed()),
            (Color::Red, "failed", report.failed()),
            (Color::Yellow, "skipped", report.skipped()),
        ];
        for (color, label, count) in parts {
            let _ = write!(stdout, ", ");
            let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)));
            let _ = write!(stdout, "{label}");
            let _ = stdout.reset();
            let _ = write!(stdout, " {count}");
        }
        let _ = writeln!(stdout);
    }
}

// ----------------------------------------------------------------------
// Buffer reporter
// ----------------------------------------------------------------------

/// Collects run events as plain lines, for tests and programmatic capture.
#[derive(Default)]
pub struct BufferReporter {
    events: Mutex<Vec<String>>,
}

impl BufferReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every event recorded so far.
    pub fn events(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// True when any recorded event mentions `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.lock().iter().any(|e| e.contains(needle))
    }

    fn push(&self, event: String) {
        self.lock().push(event);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Reporter for BufferReporter {
    fn title(&self, suite: &str, specs: usize, focused: bool) {
        self.push(format!("title {}", title_line(suite, specs, focused)));
    }

    fn spec_passed(&self, name: &str) {
        self.push(format!("passed {name}"));
    }

    fn spec_failed(&self, name: &str, failures: &[FailureDetail]) {
        self.push(format!("failed {name} ({} checks)", failures.len()));
    }

    fn spec_skipped(&self, name: &str) {
        self.push(format!("skipped {name}"));
    }

    fn summary(&self, report: &RunReport) {
        self.push(format!(
            "summary total {} passed {} failed {} skipped {}",
            report.total(),
            report.passed(),
            report.failed(),
            report.skipped()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_pluralizes() {
        assert_eq!(title_line("s", 1, false), "s: 1 test");
        assert_eq!(title_line("s", 3, false), "s: 3 tests");
    }

    #[test]
    fn focused_title_is_marked() {
        assert_eq!(title_line("s", 2, true), "s: 2 tests (focused)");
    }

    #[test]
    fn buffer_reporter_records_events_in_order() {
        let reporter = BufferReporter::new();
        reporter.title("s", 2, false);
        reporter.spec_passed("s/a");
        reporter.spec_skipped("s/b");
        assert_eq!(
            reporter.events(),
            vec![
                "title s: 2 tests".to_string(),
                "passed s/a".to_string(),
                "skipped s/b".to_string(),
            ]
        );
        assert!(reporter.mentions("s/b"));
        assert!(!reporter.mentions("s/c"));
    }
}
