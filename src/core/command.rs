//! Command parser for the `:` palette

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Activate an application by id or display name
    Open(String),
    /// Flip the sidebar
    Sidebar,
    /// Retry a failed view
    Retry,
    /// Drop all notifications
    Clear,
    /// Mark notifications as read
    Read,
    Help,
    Quit,

    // Unknown command
    Unknown(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let args = parts
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    match cmd.to_lowercase().as_str() {
        "open" | "o" | "go" => {
            if let Some(target) = args {
                Command::Open(target)
            } else {
                Command::Unknown(input.to_string())
            }
        }
        "sidebar" | "sb" => Command::Sidebar,
        "retry" | "reset" => Command::Retry,
        "clear" | "cls" => Command::Clear,
        "read" | "ack" => Command::Read,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(input.to_string()),
    }
}
