// crates/optolink-rs/src/model/protocol.rs

//! Protocols and their macro / internal-command vocabulary.

/// A named family of device commands sharing a numeric identifier.
#[derive(Debug)]
pub struct Protocol {
    /// `@name`: unique among protocols.
    pub name: String,
    /// `<pid>`: the protocol's numeric id, parsed from hex text.
    pub id: u8,
    /// `<macros>` children, in declaration order.
    pub macros: Vec<Macro>,
    /// `<commands>` children (internal commands), in declaration order.
    pub internal_commands: Vec<InternalCommand>,
}

impl Protocol {
    /// Looks up a macro by name.
    pub fn find_macro(&self, name: &str) -> Option<&Macro> {
        self.macros.iter().find(|m| m.name == name)
    }

    /// Looks up an internal command by name.
    pub fn internal_command(&self, name: &str) -> Option<&InternalCommand> {
        self.internal_commands.iter().find(|c| c.name == name)
    }
}

/// A reusable, named protocol-level command string.
#[derive(Debug)]
pub struct Macro {
    /// `@name`: unique within the owning protocol.
    pub name: String,
    /// `<command>` text content.
    pub command: String,
}

/// A protocol-level send/retry/timeout triple for handshake-style exchanges.
#[derive(Debug)]
pub struct InternalCommand {
    /// `@name`: unique within the owning protocol.
    pub name: String,
    /// `<send>`: the raw send-byte specification.
    pub send: String,
    /// `<retry>`: 0 when absent.
    pub retry: u32,
    /// `<recvTimeout>`: 0 means "no timeout override".
    pub recv_timeout: u32,
}
