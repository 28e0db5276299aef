//! Interactive prompts
//!
//! The wizard talks to the user only through [`Prompter`]. Two
//! implementations exist:
//!
//! - [`TermPrompter`]: dialoguer widgets, used on an interactive terminal
//! - [`LinePrompter`]: plain numbered menus over any reader/writer pair,
//!   used when input is piped and in tests
//!
//! All prompts block until valid input arrives. End of input and Ctrl-C
//! surface as [`PromptError::Interrupted`].

use std::io::{BufRead, Write};

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use crate::error::PromptError;

/// Tokens accepted as "yes" by [`Prompter::confirm`]
pub const YES_TOKENS: [&str; 2] = ["y", "yes"];
/// Tokens accepted as "no" by [`Prompter::confirm`]
pub const NO_TOKENS: [&str; 2] = ["n", "no"];

/// The three prompt primitives used throughout the wizard
pub trait Prompter {
    /// Ask a yes/no question.
    fn confirm(&mut self, message: &str) -> Result<bool, PromptError>;

    /// Pick one of `options`, returned by value.
    fn choose(&mut self, message: &str, options: &[String]) -> Result<String, PromptError>;

    /// Ask for free text; empty input yields `default` (or an empty string).
    fn ask(&mut self, message: &str, default: Option<&str>) -> Result<String, PromptError>;
}

impl<P: Prompter + ?Sized> Prompter for Box<P> {
    fn confirm(&mut self, message: &str) -> Result<bool, PromptError> {
        (**self).confirm(message)
    }

    fn choose(&mut self, message: &str, options: &[String]) -> Result<String, PromptError> {
        (**self).choose(message, options)
    }

    fn ask(&mut self, message: &str, default: Option<&str>) -> Result<String, PromptError> {
        (**self).ask(message, default)
    }
}

/// Interpret a yes/no answer; `None` if it is neither
pub fn parse_yes_no(input: &str) -> Option<bool> {
    let answer = input.trim().to_lowercase();
    if YES_TOKENS.contains(&answer.as_str()) {
        Some(true)
    } else if NO_TOKENS.contains(&answer.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Interpret a 1-based menu selection; `None` if out of range or not a number
pub fn parse_selection(input: &str, count: usize) -> Option<usize> {
    let n: usize = input.trim().parse().ok()?;
    (1..=count).contains(&n).then(|| n - 1)
}

/// Line-oriented prompter over any reader and writer
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the prompter and return the writer
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Interrupted);
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn confirm(&mut self, message: &str) -> Result<bool, PromptError> {
        let prompt = format!("{} ", style(format!("{} (y/n):", message)).yellow());
        loop {
            let answer = self.read_line(&prompt)?;
            match parse_yes_no(&answer) {
                Some(choice) => return Ok(choice),
                None => writeln!(self.output, "Please enter 'y' or 'n'")?,
            }
        }
    }

    fn choose(&mut self, message: &str, options: &[String]) -> Result<String, PromptError> {
        if options.is_empty() {
            return Err(PromptError::NoOptions);
        }

        loop {
            writeln!(self.output)?;
            writeln!(self.output, "{}", style(message).yellow())?;
            for (i, option) in options.iter().enumerate() {
                writeln!(self.output, "  {}. {}", i + 1, option)?;
            }
            writeln!(self.output)?;

            let prompt = format!(
                "{} ",
                style(format!("Enter selection (1-{}):", options.len())).bold()
            );
            let answer = self.read_line(&prompt)?;
            match answer.parse::<usize>() {
                Ok(_) => match parse_selection(&answer, options.len()) {
                    Some(index) => return Ok(options[index].clone()),
                    None => writeln!(
                        self.output,
                        "Please enter a number between 1 and {}",
                        options.len()
                    )?,
                },
                Err(_) => writeln!(self.output, "Please enter a valid number")?,
            }
        }
    }

    fn ask(&mut self, message: &str, default: Option<&str>) -> Result<String, PromptError> {
        let default = default.filter(|d| !d.is_empty());
        let prompt = match default {
            Some(d) => format!(
                "{} [{}]{} ",
                style(message).yellow(),
                style(d).green(),
                style(":").yellow()
            ),
            None => format!("{} ", style(format!("{}:", message)).yellow()),
        };

        let answer = self.read_line(&prompt)?;
        if answer.is_empty() {
            Ok(default.unwrap_or_default().to_string())
        } else {
            Ok(answer)
        }
    }
}

/// Prompter backed by dialoguer widgets
pub struct TermPrompter {
    theme: ColorfulTheme,
}

impl TermPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TermPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TermPrompter {
    fn confirm(&mut self, message: &str) -> Result<bool, PromptError> {
        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt(message)
            .wait_for_newline(true)
            .interact()?;
        Ok(confirmed)
    }

    fn choose(&mut self, message: &str, options: &[String]) -> Result<String, PromptError> {
        if options.is_empty() {
            return Err(PromptError::NoOptions);
        }
        let index = Select::with_theme(&self.theme)
            .with_prompt(message)
            .items(options)
            .default(0)
            .interact()?;
        Ok(options[index].clone())
    }

    fn ask(&mut self, message: &str, default: Option<&str>) -> Result<String, PromptError> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(message)
            .allow_empty(true);
        if let Some(d) = default.filter(|d| !d.is_empty()) {
            input = input.default(d.to_string());
        }
        let answer = input.interact_text()?;
        let answer = answer.trim();
        if answer.is_empty() {
            Ok(default.unwrap_or_default().to_string())
        } else {
            Ok(answer.to_string())
        }
    }
}
