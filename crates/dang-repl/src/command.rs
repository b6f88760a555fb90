//! The `:`-prefixed REPL command table (spec.md §4.6).

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Exit,
    Clear,
    Reset,
    Debug,
    DebugRender,
    Env { filter: Option<String> },
    Version,
    Type(String),
    Find(String),
    History,
    Doc,
    Unknown(String),
}

/// Parses a line already known to start with `:`. `exit` and `quit` are
/// synonyms, matching common REPL convention.
pub fn parse_command(line: &str) -> Command {
    let rest = line.strip_prefix(':').unwrap_or(line).trim();
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((n, a)) => (n, a.trim()),
        None => (rest, ""),
    };
    match name {
        "help" => Command::Help,
        "exit" | "quit" => Command::Exit,
        "clear" => Command::Clear,
        "reset" => Command::Reset,
        "debug" => Command::Debug,
        "debug-render" => Command::DebugRender,
        "env" => Command::Env { filter: if arg.is_empty() { None } else { Some(arg.to_string()) } },
        "version" => Command::Version,
        "type" => Command::Type(arg.to_string()),
        "find" => Command::Find(arg.to_string()),
        "history" => Command::History,
        "doc" => Command::Doc,
        other => Command::Unknown(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_and_quit_are_synonyms() {
        assert_eq!(parse_command(":exit"), Command::Exit);
        assert_eq!(parse_command(":quit"), Command::Exit);
    }

    #[test]
    fn env_with_filter_captures_argument() {
        assert_eq!(parse_command(":env foo"), Command::Env { filter: Some("foo".to_string()) });
        assert_eq!(parse_command(":env"), Command::Env { filter: None });
    }

    #[test]
    fn type_command_captures_expression_argument() {
        assert_eq!(parse_command(":type 1 + 1"), Command::Type("1 + 1".to_string()));
    }

    #[test]
    fn unrecognized_command_name_is_unknown() {
        assert_eq!(parse_command(":bogus"), Command::Unknown("bogus".to_string()));
    }
}
