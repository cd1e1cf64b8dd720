use std::{fmt::Display, io::IsTerminal, io::Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Cargo-style status output on stderr.
pub struct Shell {
    err: StandardStream,
}

impl Shell {
    pub fn new() -> Self {
        let choice = if std::io::stderr().is_terminal() {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self {
            err: StandardStream::stderr(choice),
        }
    }

    pub fn status(&mut self, status: impl Display, message: impl Display) -> std::io::Result<()> {
        self.status_with_color(status, message, Color::Green)
    }

    pub fn status_with_color(
        &mut self,
        status: impl Display,
        message: impl Display,
        color: Color,
    ) -> std::io::Result<()> {
        self.err
            .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(self.err, "{:>12}", status)?;
        self.err.reset()?;
        writeln!(self.err, " {}", message)
    }

    pub fn error(&mut self, message: impl Display) -> std::io::Result<()> {
        self.err
            .set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(self.err, "error")?;
        self.err.reset()?;
        writeln!(self.err, ": {}", message)
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}
