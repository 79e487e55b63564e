use std::{borrow::Cow, fmt};

/// Anything that can be sent as the first token of a request.
pub trait ProtocolCommand {
    /// Wire-format bytes of the command token.
    fn raw(&self) -> &[u8];
}

/// A custom command identified only by its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandDescriptor {
    raw: Cow<'static, [u8]>,
}

impl CommandDescriptor {
    pub const fn new(name: &'static str) -> Self {
        Self {
            raw: Cow::Borrowed(name.as_bytes()),
        }
    }

    /// Builds a descriptor from a name only known at runtime.
    pub fn from_raw<T: Into<Cow<'static, [u8]>>>(raw: T) -> Self {
        Self { raw: raw.into() }
    }

    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.raw)
    }
}

impl ProtocolCommand for CommandDescriptor {
    fn raw(&self) -> &[u8] {
        &self.raw
    }
}

impl fmt::Display for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Commands the base client issues on its own behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    Select,
    Multi,
    Exec,
    Discard,
}

impl ProtocolCommand for Command {
    fn raw(&self) -> &[u8] {
        match self {
            Command::Ping => b"PING",
            Command::Select => b"SELECT",
            Command::Multi => b"MULTI",
            Command::Exec => b"EXEC",
            Command::Discard => b"DISCARD",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.raw()))
    }
}
