// Session module - Device session, line buffering and output sinks
pub mod line_buffer;
pub mod session;
pub mod sink;
pub mod state;

pub use line_buffer::LineBuffer;
pub use session::{ReadOutcome, TerminalSession};
pub use sink::{ConsoleSink, DisplayEvent, QueueSink, Sink};
pub use state::{SessionState, SessionStatistics};
