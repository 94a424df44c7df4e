//! Slash commands.
//!
//! A line starting with `/` is a command. A line starting with `//` is chat
//! text with the first slash removed, so `//r/rust` sends `/r/rust`. Anything
//! else is chat text and is sent exactly as typed.

/// Parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/connect`: open the room socket.
    Connect,
    /// `/disconnect`: close the room socket.
    Disconnect,
    /// `/quit`: exit.
    Quit,
    /// Text for the room.
    Message {
        /// Line as typed.
        content: String,
    },
    /// A `/word` that is not a known command.
    Unknown {
        /// Line as typed.
        input: String,
    },
}

/// Parse an input line.
pub fn parse(line: &str) -> Command {
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Message { content: line.to_string() };
    };
    if rest.starts_with('/') {
        return Command::Message { content: rest.to_string() };
    }

    match rest.split_whitespace().next() {
        Some("connect") => Command::Connect,
        Some("disconnect") => Command::Disconnect,
        Some("quit" | "q") => Command::Quit,
        _ => Command::Unknown { input: line.to_string() },
    }
}
