use crate::domain::config::ConnectionConfig;

pub const GOODBYE: &str = "\nGoodbye!";

pub const HELP_TEXT: &str = "\
Available commands:
  help  - show this list
  info  - show the current connection
  exit  - disconnect and quit";

/// A line typed by the user in interactive text mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCommand {
    Exit,
    Help,
    Info,
    Empty,
    Unknown(String),
}

impl TerminalCommand {
    pub fn parse(input: &str) -> Self {
        let command = input.trim().to_lowercase();
        match command.as_str() {
            "" => TerminalCommand::Empty,
            "exit" => TerminalCommand::Exit,
            "help" => TerminalCommand::Help,
            "info" => TerminalCommand::Info,
            _ => TerminalCommand::Unknown(command),
        }
    }
}

/// What executing a command produced
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutcome {
    pub output: Option<String>,
    pub exit: bool,
}

/// Run a command. The only effect besides output is the exit request.
pub fn execute(command: &TerminalCommand, connection: &ConnectionConfig) -> CommandOutcome {
    match command {
        TerminalCommand::Exit => CommandOutcome {
            output: Some(GOODBYE.to_string()),
            exit: true,
        },
        TerminalCommand::Help => CommandOutcome {
            output: Some(HELP_TEXT.to_string()),
            exit: false,
        },
        TerminalCommand::Info => CommandOutcome {
            output: Some(format!(
                "Connected to '{}' at {} baud.",
                connection.port, connection.baud_rate
            )),
            exit: false,
        },
        TerminalCommand::Empty => CommandOutcome::default(),
        TerminalCommand::Unknown(command) => CommandOutcome {
            output: Some(format!(
                "Unknown command '{}'\nUse 'help' for a list of valid commands.",
                command
            )),
            exit: false,
        },
    }
}
