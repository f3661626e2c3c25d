//! Interactive prompt loop.
//!
//! Reads one prompt per line, sends it to the assistant and prints the reply.
//! Failures are reported and the loop carries on; only end of input (or
//! Ctrl-C while waiting for input) ends it.

use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::debug;

use crate::backend::Assistant;
use crate::conversation::Interrupt;
use crate::invoke::ProcessInvoker;

const QUIT_WORDS: [&str; 3] = ["quit", "exit", "q"];

fn rule() -> String {
    "-".repeat(50)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

pub struct Repl<'a, I: ProcessInvoker + ?Sized> {
    invoker: &'a I,
    assistant: &'a Assistant,
    interrupt: Interrupt,
}

impl<'a, I: ProcessInvoker + ?Sized> Repl<'a, I> {
    pub fn new(invoker: &'a I, assistant: &'a Assistant, interrupt: Interrupt) -> Self {
        Self {
            invoker,
            assistant,
            interrupt,
        }
    }

    pub async fn run<R, W>(&self, input: R, out: &mut W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(
            out,
            "Summoner - Interactive Mode ({} {})",
            self.assistant.backend(),
            self.assistant.model()
        )?;
        writeln!(out, "{}", "=".repeat(40))?;
        writeln!(out, "Enter your prompt (or 'quit' to exit):")?;

        let mut lines = input.lines();

        loop {
            write!(out, "\n> ")?;
            out.flush()?;

            let Some(line) = self.next_line(&mut lines).await? else {
                return goodbye(out);
            };

            let prompt = line.trim();
            if QUIT_WORDS.contains(&prompt.to_lowercase().as_str()) {
                writeln!(out, "Goodbye!")?;
                return Ok(());
            }
            if prompt.is_empty() {
                writeln!(out, "Please enter a prompt.")?;
                continue;
            }

            writeln!(
                out,
                "\nExecuting: {}",
                self.assistant.request(prompt).display_command()
            )?;
            writeln!(out, "{}", rule())?;

            match self.assistant.ask(self.invoker, prompt).await {
                Ok(reply) => writeln!(out, "{}", reply)?,
                Err(e) => {
                    writeln!(out, "Error: {}", e)?;

                    if e.is_retryable() {
                        write!(out, "Retry? [y/N] ")?;
                        out.flush()?;

                        let Some(answer) = self.next_line(&mut lines).await? else {
                            return goodbye(out);
                        };
                        if is_yes(&answer) {
                            debug!("retrying prompt at user request");
                            match self.assistant.ask(self.invoker, prompt).await {
                                Ok(reply) => writeln!(out, "{}", reply)?,
                                Err(e) => writeln!(out, "Error: {}", e)?,
                            }
                        }
                    }
                }
            }

            writeln!(out, "{}", rule())?;
        }
    }

    /// Next input line, or `None` on end of input or interrupt.
    async fn next_line<R>(&self, lines: &mut Lines<R>) -> io::Result<Option<String>>
    where
        R: AsyncBufRead + Unpin,
    {
        if self.interrupt.is_raised() {
            return Ok(None);
        }
        tokio::select! {
            line = lines.next_line() => line,
            _ = self.interrupt.raised() => Ok(None),
        }
    }
}

fn goodbye<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "\n\nGoodbye!")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Backend;
    use crate::invoke::InvocationOutcome;
    use crate::invoke::invoker::MockProcessInvoker;
    use std::time::Duration;

    async fn run_session(invoker: &MockProcessInvoker, input: &str) -> String {
        let assistant = Assistant::new(Backend::Gemini, Duration::from_secs(5));
        let repl = Repl::new(invoker, &assistant, Interrupt::new());
        let mut out = Vec::new();
        repl.run(input.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_quit_words_end_session() {
        for word in ["quit", "EXIT", " q "] {
            let mut invoker = MockProcessInvoker::new();
            invoker.expect_invoke().never();

            let output = run_session(&invoker, &format!("{}\nnever sent\n", word)).await;
            assert!(output.trim_end().ends_with("Goodbye!"), "word {:?}", word);
        }
    }

    #[tokio::test]
    async fn test_empty_line_asks_again() {
        let mut invoker = MockProcessInvoker::new();
        invoker.expect_invoke().never();

        let output = run_session(&invoker, "\n   \nquit\n").await;
        assert_eq!(output.matches("Please enter a prompt.").count(), 2);
    }

    #[tokio::test]
    async fn test_end_of_input_says_goodbye() {
        let mut invoker = MockProcessInvoker::new();
        invoker.expect_invoke().never();

        let output = run_session(&invoker, "").await;
        assert!(output.ends_with("\n\nGoodbye!\n"));
    }

    #[tokio::test]
    async fn test_reply_is_printed() {
        let mut invoker = MockProcessInvoker::new();
        invoker
            .expect_invoke()
            .withf(|req| req.arguments().last().unwrap() == "what time is it")
            .times(1)
            .returning(|_| InvocationOutcome::Success {
                stdout: "Tea time.".to_string(),
                stderr: String::new(),
                exit_code: 0,
            });

        let output = run_session(&invoker, "what time is it\nq\n").await;
        assert!(output.contains("Executing: gemini -m gemini-2.5-pro -p \"what time is it\""));
        assert!(output.contains("Tea time."));
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("nope"));
    }
}
