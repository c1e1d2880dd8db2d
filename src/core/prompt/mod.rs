mod types;

pub use types::*;

use std::io::{self, BufRead, Write};

use crate::error::{Error, Result};

/// Asks the user questions.
///
/// Every question returns `Ok(None)` when the user cancels instead of
/// answering; `Err` is reserved for terminal I/O failures.
pub trait Prompter {
    fn text(&mut self, prompt: &TextPrompt) -> Result<Option<String>>;
    fn confirm(&mut self, prompt: &YesNoPrompt) -> Result<Option<bool>>;
    /// Returns the `value` of the chosen option.
    fn select(&mut self, prompt: &SelectPrompt) -> Result<Option<String>>;
    fn message(&mut self, message: &str) -> Result<()>;
    fn warn(&mut self, message: &str) -> Result<()>;
}

/// Line-oriented prompt engine over any reader/writer pair.
///
/// End of input cancels the pending question. At a select prompt `q` also
/// cancels.
pub struct PromptEngine<R, W> {
    input: R,
    output: W,
}

impl PromptEngine<io::StdinLock<'static>, io::Stdout> {
    /// Engine reading stdin and writing stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptEngine<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn write(&mut self, text: &str) -> Result<()> {
        self.output
            .write_all(text.as_bytes())
            .and_then(|_| self.output.flush())
            .map_err(|e| Error::internal_io(e.to_string(), Some("write prompt".to_string())))
    }

    fn line(&mut self, text: &str) -> Result<()> {
        self.write(&format!("{}\n", text))
    }

    /// Next trimmed answer line; `None` at end of input.
    fn read_answer(&mut self) -> Result<Option<String>> {
        let mut buf = String::new();
        let read = self
            .input
            .read_line(&mut buf)
            .map_err(|e| Error::internal_io(e.to_string(), Some("read answer".to_string())))?;

        if read == 0 {
            self.write("\n")?;
            return Ok(None);
        }

        Ok(Some(buf.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> Prompter for PromptEngine<R, W> {
    fn text(&mut self, prompt: &TextPrompt) -> Result<Option<String>> {
        loop {
            match &prompt.default {
                Some(default) => self.write(&format!("? {} ({}) ", prompt.question, default))?,
                None => self.write(&format!("? {} ", prompt.question))?,
            }

            let Some(answer) = self.read_answer()? else {
                return Ok(None);
            };

            let value = if answer.is_empty() {
                prompt.default.clone().unwrap_or_default()
            } else {
                answer
            };

            if let Some(validate) = prompt.validate {
                if let Err(problem) = validate(&value) {
                    self.line(&format!("  {}", problem))?;
                    continue;
                }
            }

            return Ok(Some(value));
        }
    }

    fn confirm(&mut self, prompt: &YesNoPrompt) -> Result<Option<bool>> {
        let suffix = if prompt.default { "[Y/n]" } else { "[y/N]" };

        loop {
            self.write(&format!("? {} {} ", prompt.question, suffix))?;

            let Some(answer) = self.read_answer()? else {
                return Ok(None);
            };

            match answer.to_lowercase().as_str() {
                "" => return Ok(Some(prompt.default)),
                "y" | "yes" => return Ok(Some(true)),
                "n" | "no" => return Ok(Some(false)),
                _ => self.line("  Please answer y or n")?,
            }
        }
    }

    fn select(&mut self, prompt: &SelectPrompt) -> Result<Option<String>> {
        if prompt.options.is_empty() {
            return Ok(None);
        }

        self.line(&format!("? {}", prompt.question))?;
        for (i, opt) in prompt.options.iter().enumerate() {
            let marker = if Some(i) == prompt.default_index { "*" } else { " " };
            match &opt.hint {
                Some(hint) => self.line(&format!("  {}[{}] {} ({})", marker, i + 1, opt.label, hint))?,
                None => self.line(&format!("  {}[{}] {}", marker, i + 1, opt.label))?,
            }
        }

        let count = prompt.options.len();
        loop {
            self.write(&format!("Enter choice (1-{}, q to cancel): ", count))?;

            let Some(answer) = self.read_answer()? else {
                return Ok(None);
            };

            if answer.eq_ignore_ascii_case("q") {
                return Ok(None);
            }

            let chosen = if answer.is_empty() {
                prompt.default_index
            } else {
                answer
                    .parse::<usize>()
                    .ok()
                    .filter(|n| (1..=count).contains(n))
                    .map(|n| n - 1)
            };

            match chosen.and_then(|i| prompt.options.get(i)) {
                Some(opt) => return Ok(Some(opt.value.clone())),
                None => self.line(&format!("  Please enter a number between 1 and {}", count))?,
            }
        }
    }

    fn message(&mut self, message: &str) -> Result<()> {
        self.line(message)
    }

    fn warn(&mut self, message: &str) -> Result<()> {
        self.line(&format!("! {}", message))
    }
}
