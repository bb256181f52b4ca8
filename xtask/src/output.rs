//! Terminal output and confirmation prompts.

use std::fmt::Display;

use dialoguer::Confirm;

const RESET: &str = "\x1b[0m";

/// Foreground colors used for command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Added,
    Removed,
    Unchanged,
    Heading,
}

impl Tone {
    fn code(self) -> &'static str {
        match self {
            Tone::Added => "\x1b[32m",
            Tone::Removed => "\x1b[31m",
            Tone::Unchanged => "\x1b[2m",
            Tone::Heading => "\x1b[1;34m",
        }
    }
}

pub fn tint(tone: Tone, text: impl Display) -> String {
    format!("{}{text}{RESET}", tone.code())
}

/// Where command progress goes; `anstream` strips colors when not on a tty.
pub struct Output {
    quiet: bool,
    assume_yes: bool,
}

impl Output {
    pub fn new(quiet: bool, assume_yes: bool) -> Self {
        Self { quiet, assume_yes }
    }

    pub fn say(&self, text: impl Display) {
        if !self.quiet {
            anstream::println!("{text}");
        }
    }

    pub fn say_in(&self, tone: Tone, text: impl Display) {
        self.say(tint(tone, text));
    }

    pub fn failure(&self, err: &dyn Display) {
        anstream::eprintln!("{} {err}", tint(Tone::Removed, "error:"));
    }

    /// Asks before a change; `--yes` answers for the user.
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool, dialoguer::Error> {
        if self.assume_yes {
            return Ok(true);
        }
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
    }
}
