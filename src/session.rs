use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::backend::PdfBackend;
use crate::extract::PdfExtractor;
use crate::types::ExtractionResult;

/// Source of an interactively entered password.
pub trait PasswordPrompt {
    fn read_password(&mut self) -> io::Result<String>;
}

impl<F> PasswordPrompt for F
where
    F: FnMut() -> io::Result<String>,
{
    fn read_password(&mut self) -> io::Result<String> {
        self()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Initial,
    /// The first attempt reported an encrypted document.
    AwaitingPassword(ExtractionResult),
    Done(ExtractionResult),
}

/// One run of the tool: extract, ask for a password at most once, finish.
pub struct Session<'a, B> {
    extractor: &'a PdfExtractor<B>,
    path: PathBuf,
    password: Option<String>,
    state: SessionState,
}

impl<'a, B: PdfBackend> Session<'a, B> {
    pub fn new(
        extractor: &'a PdfExtractor<B>,
        path: impl AsRef<Path>,
        password: Option<String>,
    ) -> Self {
        Session {
            extractor,
            path: path.as_ref().to_path_buf(),
            password,
            state: SessionState::Initial,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Advance by one transition. `Done` is terminal.
    pub fn step<P: PasswordPrompt>(&mut self, prompt: &mut P) {
        let next = match std::mem::replace(&mut self.state, SessionState::Initial) {
            SessionState::Initial => {
                let result = self.extractor.extract(&self.path, self.password.as_deref());
                if result.needs_password() {
                    SessionState::AwaitingPassword(result)
                } else {
                    SessionState::Done(result)
                }
            }
            SessionState::AwaitingPassword(first) => match prompt.read_password() {
                Ok(password) => {
                    debug!("retrying {:?} with prompted password", self.path);
                    SessionState::Done(self.extractor.extract(&self.path, Some(&password)))
                }
                Err(e) => {
                    warn!("could not read password: {}", e);
                    SessionState::Done(first)
                }
            },
            done @ SessionState::Done(_) => done,
        };
        self.state = next;
    }

    /// Drive the session to `Done` and return the final result.
    pub fn run<P: PasswordPrompt>(mut self, prompt: &mut P) -> ExtractionResult {
        loop {
            match self.state {
                SessionState::Done(result) => return result,
                _ => self.step(prompt),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::error::ExtractError;
    use crate::extract::tests::FakeBackend;

    struct Scripted {
        answer: io::Result<String>,
        asked: Cell<usize>,
    }

    impl Scripted {
        fn answering(answer: &str) -> Self {
            Scripted {
                answer: Ok(answer.to_string()),
                asked: Cell::new(0),
            }
        }
    }

    impl PasswordPrompt for Scripted {
        fn read_password(&mut self) -> io::Result<String> {
            self.asked.set(self.asked.get() + 1);
            match &self.answer {
                Ok(s) => Ok(s.clone()),
                Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
            }
        }
    }

    fn locked_pdf(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("locked.pdf");
        fs::write(&path, b"%PDF-1.5\n").unwrap();
        path
    }

    fn locked_extractor() -> PdfExtractor<FakeBackend> {
        PdfExtractor::builder()
            .backend(
                FakeBackend::with_pages(&["a page with enough text to not look scanned at all"])
                    .encrypted("secret"),
            )
            .build()
    }

    #[test]
    fn unencrypted_file_never_prompts() {
        let dir = TempDir::new().unwrap();
        let ex = PdfExtractor::builder()
            .backend(FakeBackend::with_pages(&["plain"]))
            .build();
        let mut prompt = Scripted::answering("unused");

        let result = Session::new(&ex, locked_pdf(&dir), None).run(&mut prompt);

        assert!(result.is_success());
        assert_eq!(prompt.asked.get(), 0);
    }

    #[test]
    fn prompts_once_then_succeeds() {
        let dir = TempDir::new().unwrap();
        let ex = locked_extractor();
        let mut prompt = Scripted::answering("secret");
        let mut session = Session::new(&ex, locked_pdf(&dir), None);

        session.step(&mut prompt);
        assert!(matches!(session.state(), SessionState::AwaitingPassword(_)));
        session.step(&mut prompt);
        assert!(matches!(session.state(), SessionState::Done(r) if r.is_success()));

        assert_eq!(prompt.asked.get(), 1);
        assert_eq!(ex.backend().opens.get(), 2);
    }

    #[test]
    fn supplied_password_skips_prompt() {
        let dir = TempDir::new().unwrap();
        let ex = locked_extractor();
        let mut prompt = Scripted::answering("unused");

        let result = Session::new(&ex, locked_pdf(&dir), Some("secret".into())).run(&mut prompt);

        assert!(result.is_success());
        assert_eq!(prompt.asked.get(), 0);
    }

    #[test]
    fn wrong_prompted_password_is_terminal() {
        let dir = TempDir::new().unwrap();
        let ex = locked_extractor();
        let mut prompt = Scripted::answering("guess");

        let result = Session::new(&ex, locked_pdf(&dir), None).run(&mut prompt);

        assert_eq!(result.error(), Some(&ExtractError::WrongPassword));
        assert_eq!(prompt.asked.get(), 1);
    }

    // Known edge case: a second needs-password result is reported as-is.
    #[test]
    fn second_needs_password_does_not_loop() {
        let dir = TempDir::new().unwrap();
        let ex = locked_extractor();
        let mut prompt = Scripted::answering("");

        let result = Session::new(&ex, locked_pdf(&dir), None).run(&mut prompt);

        assert!(result.needs_password());
        assert_eq!(prompt.asked.get(), 1);
        assert_eq!(ex.backend().opens.get(), 2);
    }

    #[test]
    fn prompt_failure_keeps_first_result() {
        let dir = TempDir::new().unwrap();
        let ex = locked_extractor();
        let mut prompt = Scripted {
            answer: Err(io::Error::new(io::ErrorKind::NotFound, "no tty")),
            asked: Cell::new(0),
        };

        let result = Session::new(&ex, locked_pdf(&dir), None).run(&mut prompt);

        assert!(result.needs_password());
        assert_eq!(ex.backend().opens.get(), 1);
    }

    #[test]
    fn closures_work_as_prompts() {
        let dir = TempDir::new().unwrap();
        let ex = locked_extractor();
        let mut prompt = || Ok::<_, io::Error>("secret".to_string());

        let result = Session::new(&ex, locked_pdf(&dir), None).run(&mut prompt);

        assert!(result.is_success());
    }
}
