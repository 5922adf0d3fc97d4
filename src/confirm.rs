//! The interactive `[y/N]` confirmation.
//!
//! The confirmation is an explicit state machine over single input bytes.
//! [`ConfirmState::step`] is the pure transition function; [`Confirmation`]
//! drives it against a [`Console`], printing the prompts it asks for.
//!
//! ```text
//!            y/Y                 EOF
//! Awaiting ───────▶ Draining ──────────▶ Accepted
//!  │   ▲
//!  │   │ \n (prompt again)
//!  │   │
//!  │  Discarding ◀── any other byte (re-prompt)
//!  │
//!  └── n/N/\r/\n/EOF ──▶ Declined
//! ```
//!
//! After an unrecognized answer the rest of its line is discarded before
//! asking again, so `"x\ny\n"` produces exactly one re-prompt. An empty
//! answer picks the default, which is "no". A "yes" drains all pending input,
//! see [`Console::read_pending_byte`].

use std::io;

use crate::{console::Console, severity::Stream};

/// The question printed before each answer is read.
pub(crate) const PROMPT: &str = " -> Continue? [y/N]";

/// The instruction printed after an unrecognized answer.
pub(crate) const REPROMPT: &str = "    Please answer [y]es or [N]o.";

/// State of a confirmation in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfirmState {
    /// Waiting for the first byte of an answer.
    Awaiting,
    /// An unrecognized answer was given; skipping the rest of its line.
    Discarding,
    /// The user said yes; consuming the remaining input so it does not leak
    /// into later reads.
    Draining,
    /// Final state: continue.
    Accepted,
    /// Final state: the user declined.
    Declined,
}

/// Output requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfirmAction {
    /// Print nothing.
    Nothing,
    /// Print the question again.
    Prompt,
    /// Print the "please answer" instruction.
    Reprompt,
}

/// The result of a finished confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Answer {
    /// The user answered yes.
    Yes,
    /// The user answered no, gave an empty answer, or input ended.
    No,
}

impl ConfirmState {
    /// Feeds one byte of input, or `None` at end of input, and returns the
    /// next state together with what should be printed.
    ///
    /// Final states absorb all input.
    pub const fn step(self, input: Option<u8>) -> (ConfirmState, ConfirmAction) {
        use ConfirmAction::{Nothing, Prompt, Reprompt};
        use ConfirmState::{Accepted, Awaiting, Declined, Discarding, Draining};

        match (self, input) {
            (Awaiting, Some(b'y' | b'Y')) => (Draining, Nothing),
            (Awaiting, Some(b'n' | b'N' | b'\r' | b'\n') | None) => (Declined, Nothing),
            (Awaiting, Some(_)) => (Discarding, Reprompt),

            (Discarding, Some(b'\n')) => (Awaiting, Prompt),
            (Discarding, None) => (Declined, Nothing),
            (Discarding, Some(_)) => (Discarding, Nothing),

            (Draining, None) => (Accepted, Nothing),
            (Draining, Some(_)) => (Draining, Nothing),

            (Accepted, _) => (Accepted, Nothing),
            (Declined, _) => (Declined, Nothing),
        }
    }

    /// The answer, if this is a final state.
    pub const fn answer(self) -> Option<Answer> {
        match self {
            ConfirmState::Accepted => Some(Answer::Yes),
            ConfirmState::Declined => Some(Answer::No),
            ConfirmState::Awaiting | ConfirmState::Discarding | ConfirmState::Draining => None,
        }
    }
}

/// Drives a [`ConfirmState`] machine against a console.
///
/// # Examples
///
/// ```
/// use xutils::{Answer, Confirmation, MemoryConsole};
///
/// let mut console = MemoryConsole::with_input("maybe\nY\n");
/// assert_eq!(Confirmation::new().run(&mut console), Answer::Yes);
/// assert_eq!(
///     console.stdout_text(),
///     " -> Continue? [y/N]    Please answer [y]es or [N]o. -> Continue? [y/N]"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    /// Current state
    state: ConfirmState,
}

impl Confirmation {
    /// Creates a confirmation waiting for its first answer.
    pub const fn new() -> Self {
        Self {
            state: ConfirmState::Awaiting,
        }
    }

    /// The current state.
    pub const fn state(&self) -> ConfirmState {
        self.state
    }

    /// Prompts on stdout and reads answers until the user decides.
    ///
    /// Blocks for as long as the console's input blocks. Read errors other
    /// than interruptions are treated like end of input, i.e. as "no".
    /// Write errors are ignored.
    pub fn run<C: Console + ?Sized>(&mut self, console: &mut C) -> Answer {
        print_best_effort(console, PROMPT);

        loop {
            if let Some(answer) = self.state.answer() {
                tracing::debug!(?answer, "confirmation finished");
                return answer;
            }

            let read = match self.state {
                ConfirmState::Draining => console.read_pending_byte(),
                _ => console.read_byte(),
            };
            let input = match read {
                Ok(input) => input,
                Err(error) => {
                    tracing::debug!(%error, "reading confirmation input failed");
                    None
                }
            };

            let (next, action) = self.state.step(input);
            self.state = next;

            match action {
                ConfirmAction::Nothing => {}
                ConfirmAction::Prompt => print_best_effort(console, PROMPT),
                ConfirmAction::Reprompt => print_best_effort(console, REPROMPT),
            }
        }
    }
}

impl Default for Confirmation {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes `text` to stdout and flushes it, so it is visible before the next
/// blocking read.
fn print_best_effort<C: Console + ?Sized>(console: &mut C, text: &str) {
    let writer = console.writer(Stream::Stdout);
    let result: io::Result<()> = writer.write_all(text.as_bytes()).and_then(|()| writer.flush());
    if let Err(error) = result {
        tracing::debug!(%error, "writing confirmation prompt failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::MemoryConsole;

    fn run(input: &str) -> (Answer, MemoryConsole) {
        let mut console = MemoryConsole::with_input(input);
        let answer = Confirmation::new().run(&mut console);
        (answer, console)
    }

    fn reprompts(console: &MemoryConsole) -> usize {
        console.stdout_text().matches(REPROMPT).count()
    }

    #[test]
    fn test_yes() {
        for input in ["y\n", "Y\n", "yes please\n"] {
            let (answer, console) = run(input);
            assert_eq!(answer, Answer::Yes, "{input:?}");
            assert_eq!(console.stdout_text(), PROMPT);
        }
    }

    #[test]
    fn test_prompt_text() {
        let (_, console) = run("?\nn\n");
        assert_eq!(
            console.stdout_text(),
            " -> Continue? [y/N]    Please answer [y]es or [N]o. -> Continue? [y/N]"
        );
    }

    #[test]
    fn test_no() {
        for input in ["n\n", "N\n", "\r\n", "\n", ""] {
            let (answer, console) = run(input);
            assert_eq!(answer, Answer::No, "{input:?}");
            assert_eq!(reprompts(&console), 0);
        }
    }

    #[test]
    fn test_one_reprompt_then_yes() {
        let (answer, console) = run("x\ny\n");
        assert_eq!(answer, Answer::Yes);
        assert_eq!(reprompts(&console), 1);
        assert_eq!(
            console.stdout_text(),
            format!("{PROMPT}{REPROMPT}{PROMPT}")
        );
    }

    #[test]
    fn test_unbounded_reprompts() {
        let input = "?\n".repeat(50) + "n\n";
        let (answer, console) = run(&input);
        assert_eq!(answer, Answer::No);
        assert_eq!(reprompts(&console), 50);
    }

    #[test]
    fn test_eof_while_discarding_declines() {
        let (answer, console) = run("what");
        assert_eq!(answer, Answer::No);
        assert_eq!(reprompts(&console), 1);
    }

    #[test]
    fn test_yes_drains_to_end_of_input() {
        let (answer, console) = run("y\nleftover\n");
        assert_eq!(answer, Answer::Yes);
        assert!(console.remaining_input().is_empty());
    }

    #[test]
    fn test_yes_drains_only_pending_input() {
        /// Treats input up to the first line feed as pending, the way a
        /// terminal delivers it.
        struct LineAtATime {
            inner: MemoryConsole,
            last_read: Option<u8>,
        }

        impl Console for LineAtATime {
            fn writer(&mut self, stream: Stream) -> &mut dyn io::Write {
                self.inner.writer(stream)
            }

            fn read_byte(&mut self) -> io::Result<Option<u8>> {
                self.last_read = self.inner.read_byte()?;
                Ok(self.last_read)
            }

            fn read_pending_byte(&mut self) -> io::Result<Option<u8>> {
                match self.last_read {
                    None | Some(b'\n') => Ok(None),
                    Some(_) => self.read_byte(),
                }
            }
        }

        let mut console = LineAtATime {
            inner: MemoryConsole::with_input("yes\nnot typed yet\n"),
            last_read: None,
        };
        assert_eq!(Confirmation::new().run(&mut console), Answer::Yes);
        assert_eq!(console.inner.remaining_input(), b"not typed yet\n");
    }

    #[test]
    fn test_yes_at_end_of_input() {
        let (answer, _) = run("y");
        assert_eq!(answer, Answer::Yes);
    }

    #[test]
    fn test_final_states_absorb_input() {
        for input in [Some(b'y'), Some(b'n'), Some(b'\n'), None] {
            assert_eq!(
                ConfirmState::Accepted.step(input),
                (ConfirmState::Accepted, ConfirmAction::Nothing)
            );
            assert_eq!(
                ConfirmState::Declined.step(input),
                (ConfirmState::Declined, ConfirmAction::Nothing)
            );
        }
    }

    #[test]
    fn test_transitions() {
        use ConfirmAction::*;
        use ConfirmState::*;

        assert_eq!(Awaiting.step(Some(b'y')), (Draining, Nothing));
        assert_eq!(Awaiting.step(Some(b'N')), (Declined, Nothing));
        assert_eq!(Awaiting.step(Some(b'\r')), (Declined, Nothing));
        assert_eq!(Awaiting.step(Some(b'q')), (Discarding, Reprompt));
        assert_eq!(Discarding.step(Some(b'y')), (Discarding, Nothing));
        assert_eq!(Discarding.step(Some(b'\n')), (Awaiting, Prompt));
        assert_eq!(Draining.step(Some(b'x')), (Draining, Nothing));
        assert_eq!(Draining.step(Some(b'\n')), (Draining, Nothing));
        assert_eq!(Draining.step(None), (Accepted, Nothing));
        assert_eq!(Awaiting.answer(), None);
        assert_eq!(Accepted.answer(), Some(Answer::Yes));
        assert_eq!(Declined.answer(), Some(Answer::No));
    }
}
