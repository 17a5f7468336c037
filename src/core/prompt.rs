use crate::domain::error::SerialLoggerResult;
use std::io::{self, BufRead, Write};

/// Interactive text channel to the user
pub trait Console {
    /// Print a line of output
    fn say(&mut self, message: &str);

    /// Show `prompt` and read one line. `None` means input has ended.
    fn ask(&mut self, prompt: &str) -> SerialLoggerResult<Option<String>>;
}

/// Console bound to the process's stdin and stdout
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn say(&mut self, message: &str) {
        println!("{}", message);
    }

    fn ask(&mut self, prompt: &str) -> SerialLoggerResult<Option<String>> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut input = String::new();
        let read = io::stdin().lock().read_line(&mut input)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(input.trim().to_string()))
    }
}

/// Console fed from a fixed list of answers, recording everything shown
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: std::collections::VecDeque<String>,
    pub transcript: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    pub fn printed(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }
}

impl Console for ScriptedConsole {
    fn say(&mut self, message: &str) {
        self.transcript.push(message.to_string());
    }

    fn ask(&mut self, prompt: &str) -> SerialLoggerResult<Option<String>> {
        self.transcript.push(prompt.to_string());
        Ok(self.answers.pop_front().map(|answer| answer.trim().to_string()))
    }
}
