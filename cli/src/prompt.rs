use std::io;

use console::Term;
use pdf_text_helper::PasswordPrompt;

/// Reads the password from the controlling terminal without echo.
pub struct TerminalPrompt {
    term: Term,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        // stderr keeps the prompt out of redirected report output
        TerminalPrompt {
            term: Term::stderr(),
        }
    }
}

impl PasswordPrompt for TerminalPrompt {
    fn read_password(&mut self) -> io::Result<String> {
        if !self.term.is_term() {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "no terminal attached for password entry",
            ));
        }
        self.term.write_str("Enter PDF password: ")?;
        self.term.read_secure_line()
    }
}
