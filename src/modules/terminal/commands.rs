//! Mesh terminal command line parsing

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermCommand {
    Help,
    Echo(String),
    Ls,
    Pwd,
    Whoami,
    Clear,
    Date,
    /// Free-form command handed to the service
    Exec(String),
    /// Goal for the autonomous agent pipeline
    Plan(String),
    /// Push the last agent output to the code lab under this file name
    Push(String),
    Notify(String),
    Open(String),
    /// Known command whose required argument was missing
    Usage(&'static str),
    Unknown(String),
}

pub const HELP_LINES: &[&str] = &[
    "help                 show this list",
    "echo <text>          print text",
    "ls | pwd | whoami    inspect the mesh",
    "date                 current local time",
    "clear                wipe the screen",
    "exec <command>       run a neural command",
    "plan <goal>          plan and run an autonomous task",
    "push <file>          send the last agent output to Code Lab",
    "notify <message>     raise a notification",
    "open <app>           switch application",
];

pub fn parse(line: &str) -> Option<TermCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let command = match name.to_lowercase().as_str() {
        "help" | "?" => TermCommand::Help,
        "echo" => TermCommand::Echo(unquote(rest).to_string()),
        "ls" => TermCommand::Ls,
        "pwd" => TermCommand::Pwd,
        "whoami" => TermCommand::Whoami,
        "clear" | "cls" => TermCommand::Clear,
        "date" => TermCommand::Date,
        "exec" => with_arg(rest, "exec", TermCommand::Exec),
        "plan" | "agent" => with_arg(rest, "plan", TermCommand::Plan),
        "push" => with_arg(rest, "push", TermCommand::Push),
        "notify" => with_arg(rest, "notify", TermCommand::Notify),
        "open" => with_arg(rest, "open", TermCommand::Open),
        _ => TermCommand::Unknown(name.to_string()),
    };
    Some(command)
}

fn with_arg(rest: &str, name: &'static str, build: fn(String) -> TermCommand) -> TermCommand {
    let arg = unquote(rest);
    if arg.is_empty() {
        TermCommand::Usage(name)
    } else {
        build(arg.to_string())
    }
}

fn unquote(text: &str) -> &str {
    let text = text.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = text
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_echo_strips_quotes() {
        assert_eq!(
            parse("echo \"Hello World\""),
            Some(TermCommand::Echo("Hello World".to_string()))
        );
        assert_eq!(parse("echo"), Some(TermCommand::Echo(String::new())));
    }

    #[test]
    fn test_parse_arguments_required() {
        assert_eq!(parse("plan"), Some(TermCommand::Usage("plan")));
        assert_eq!(
            parse("plan  build a landing page "),
            Some(TermCommand::Plan("build a landing page".to_string()))
        );
        assert_eq!(parse("open chat"), Some(TermCommand::Open("chat".to_string())));
    }

    #[test]
    fn test_parse_blank_and_unknown() {
        assert_eq!(parse("   "), None);
        assert_eq!(parse("rm -rf /"), Some(TermCommand::Unknown("rm".to_string())));
        assert_eq!(parse("CLEAR"), Some(TermCommand::Clear));
    }
}
