use std::fmt::Write as _;

/// Characters received since the last newline.
///
/// `\r` is dropped and `\n` completes the line. Bytes outside printable ASCII
/// are stored escaped (`\t`, `\\`, `\xNN`) so a completed line is always
/// single-line plain text.
#[derive(Debug, Default, Clone)]
pub struct LineBuffer {
    text: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte. Returns the completed line when `byte` is a newline.
    pub fn push(&mut self, byte: u8) -> Option<String> {
        match byte {
            b'\n' => Some(std::mem::take(&mut self.text)),
            b'\r' => None,
            _ => {
                push_escaped(&mut self.text, byte);
                None
            }
        }
    }

    /// Feed a chunk, collecting every line it completes in order
    pub fn extend(&mut self, bytes: &[u8]) -> Vec<String> {
        bytes.iter().filter_map(|&byte| self.push(byte)).collect()
    }

    /// Take whatever is buffered without a terminator
    pub fn take_pending(&mut self) -> Option<String> {
        if self.text.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

fn push_escaped(text: &mut String, byte: u8) {
    match byte {
        b'\t' => text.push_str("\\t"),
        b'\\' => text.push_str("\\\\"),
        0x20..=0x7e => text.push(byte as char),
        _ => {
            let _ = write!(text, "\\x{:02x}", byte);
        }
    }
}
