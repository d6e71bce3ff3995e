//! Terminal capability checks and tracing setup.

use std::io::{self, IsTerminal};

/// What the attached stderr can render, read once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TerminalCaps {
    pub stderr_is_terminal: bool,
    pub dumb: bool,
    pub no_color_env: bool,
}

impl TerminalCaps {
    pub fn detect() -> Self {
        Self {
            stderr_is_terminal: io::stderr().is_terminal(),
            dumb: std::env::var("TERM").is_ok_and(|term| term.eq_ignore_ascii_case("dumb")),
            no_color_env: std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty()),
        }
    }

    /// ANSI colors in log output unless `--no-color`, `NO_COLOR` or a dumb terminal says otherwise.
    pub fn ansi_logs(self, no_color_flag: bool) -> bool {
        !(no_color_flag || self.no_color_env || self.dumb)
    }

    /// The redrawn progress line needs an interactive, capable stderr.
    pub fn progress_line(self, quiet: bool) -> bool {
        self.stderr_is_terminal && !quiet && !self.dumb
    }
}

pub(crate) fn init_tracing(default_level: &str, ansi: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_ansi(ansi)
        .with_env_filter(filter)
        .try_init();
}
