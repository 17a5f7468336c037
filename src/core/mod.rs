// Core module - Connection resolution and the read loop
pub mod command;
pub mod prompt;
pub mod resolver;
pub mod session;
pub mod shutdown;
pub mod terminal;

pub use resolver::{ConnectionResolver, Resolution};
pub use session::{TerminalSession, SessionState};
pub use shutdown::ShutdownSignal;
pub use terminal::TextTerminal;
