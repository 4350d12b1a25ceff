//! User-facing status output.
//!
//! Status lines go to stderr as `{status:>12} {message}`, cargo style.
//! Long-running steps (CMake configure/build) get a spinner in normal
//! verbosity; in verbose mode the tool output is streamed instead.

use std::fmt::Display;
use std::io::{self, IsTerminal};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: errors only
    Quiet,
    #[default]
    Normal,
    /// --verbose: stream tool output, no spinners
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "invalid color choice '{}'; expected 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

/// Semantic status of an output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Exporting,
    Fetching,
    Extracting,
    Generating,
    Configuring,
    Building,
    Packaging,
    Finished,
    Fresh,
    Removed,
    Info,
    Warning,
    Error,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Exporting => "Exporting",
            Status::Fetching => "Fetching",
            Status::Extracting => "Extracting",
            Status::Generating => "Generating",
            Status::Configuring => "Configuring",
            Status::Building => "Building",
            Status::Packaging => "Packaging",
            Status::Finished => "Finished",
            Status::Fresh => "Fresh",
            Status::Removed => "Removed",
            Status::Info => "Info",
            Status::Warning => "Warning",
            Status::Error => "error",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Status::Finished | Status::Fresh | Status::Removed => "\x1b[1;32m",
            Status::Exporting
            | Status::Fetching
            | Status::Extracting
            | Status::Generating
            | Status::Configuring
            | Status::Building
            | Status::Packaging => "\x1b[1;36m",
            Status::Info => "\x1b[1;34m",
            Status::Warning => "\x1b[1;33m",
            Status::Error => "\x1b[1;31m",
        }
    }
}

/// Central shell for CLI output.
#[derive(Debug)]
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
}

impl Shell {
    pub fn new(verbosity: Verbosity, color: ColorChoice) -> Self {
        let use_color = match color {
            ColorChoice::Auto => io::stderr().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        };
        Shell {
            verbosity,
            use_color,
        }
    }

    /// Quiet wins over verbose.
    pub fn from_flags(quiet: bool, verbose: bool, color: ColorChoice) -> Self {
        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        Shell::new(verbosity, color)
    }

    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Print a status line. In quiet mode only errors are printed.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_quiet() && status != Status::Error {
            return;
        }
        eprintln!("{} {}", self.format_status(status), msg);
    }

    pub fn note(&self, msg: impl Display) {
        self.status(Status::Info, msg);
    }

    pub fn warn(&self, msg: impl Display) {
        self.status(Status::Warning, msg);
    }

    fn format_status(&self, status: Status) -> String {
        if self.use_color {
            format!("{}{:>12}\x1b[0m", status.color_code(), status.as_str())
        } else {
            format!("{:>12}", status.as_str())
        }
    }

    /// Print `status msg` and show a spinner until the returned guard is finished.
    pub fn spinner(&self, status: Status, msg: impl Display) -> Spinner {
        let message = msg.to_string();
        self.status(status, &message);

        let bar = if self.verbosity == Verbosity::Normal && io::stderr().is_terminal() {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg} {elapsed}") {
                bar.set_style(style);
            }
            bar.set_message(message);
            bar.enable_steady_tick(Duration::from_millis(120));
            Some(bar)
        } else {
            None
        };

        Spinner {
            bar,
            start: Instant::now(),
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(Verbosity::Normal, ColorChoice::Auto)
    }
}

/// Spinner guard returned by [`Shell::spinner`]. Cleared on drop.
pub struct Spinner {
    bar: Option<ProgressBar>,
    start: Instant,
}

impl Spinner {
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// Format a duration in a human-readable way.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_choice_parse() {
        assert_eq!("auto".parse::<ColorChoice>().unwrap(), ColorChoice::Auto);
        assert_eq!("ALWAYS".parse::<ColorChoice>().unwrap(), ColorChoice::Always);
        assert_eq!("never".parse::<ColorChoice>().unwrap(), ColorChoice::Never);
        assert!("sometimes".parse::<ColorChoice>().is_err());
    }

    #[test]
    fn test_from_flags() {
        assert!(Shell::from_flags(true, true, ColorChoice::Never).is_quiet());
        assert!(Shell::from_flags(false, true, ColorChoice::Never).is_verbose());
        let normal = Shell::from_flags(false, false, ColorChoice::Never);
        assert!(!normal.is_quiet() && !normal.is_verbose());
    }

    #[test]
    fn test_status_formatting() {
        let shell = Shell::new(Verbosity::Normal, ColorChoice::Never);
        let formatted = shell.format_status(Status::Packaging);
        assert_eq!(formatted.trim(), "Packaging");
        assert_eq!(formatted.len(), 12);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(500)), "0.50s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1.5m");
    }
}
