use crate::cli::ColorChoice;
use std::io::IsTerminal;

/// Which streams get ANSI styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorMode {
    /// Drives the `colored` override used by command output
    pub stdout: bool,
    /// Log lines written by the tracing subscriber
    pub stderr: bool,
}

impl ColorMode {
    fn resolve(choice: ColorChoice, no_color: bool, stdout_tty: bool, stderr_tty: bool) -> Self {
        match choice {
            ColorChoice::Always => Self {
                stdout: true,
                stderr: true,
            },
            ColorChoice::Never => Self {
                stdout: false,
                stderr: false,
            },
            // Respect NO_COLOR standard (https://no-color.org/)
            ColorChoice::Auto if no_color => Self {
                stdout: false,
                stderr: false,
            },
            ColorChoice::Auto => Self {
                stdout: stdout_tty,
                stderr: stderr_tty,
            },
        }
    }
}

/// Initialize color mode based on CLI choice and environment.
///
/// Returns the mode so logging can style stderr independently of stdout.
pub fn init(choice: ColorChoice) -> ColorMode {
    let mode = ColorMode::resolve(
        choice,
        std::env::var_os("NO_COLOR").is_some(),
        std::io::stdout().is_terminal(),
        std::io::stderr().is_terminal(),
    );

    colored::control::set_override(mode.stdout);
    mode
}
