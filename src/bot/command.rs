//! Chat command parsing

/// A parsed chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Set(String),
    List,
    Remove(String),
    Clear,
    Confirm,
    Cancel,
    Recommend(String),
    Unknown(String),
}

impl Command {
    /// Parses `"/set Nirvana"`, `"set Nirvana"` or `"/set@taste_bot Nirvana"`.
    ///
    /// The command word is case-insensitive. Arguments are re-joined with
    /// single spaces, so runs of whitespace collapse.
    pub fn parse(text: &str) -> Self {
        let mut words = text.split_whitespace();
        let Some(head) = words.next() else {
            return Command::Unknown(String::new());
        };
        let argument = words.collect::<Vec<_>>().join(" ");

        let word = head.strip_prefix('/').unwrap_or(head);
        let word = word.split('@').next().unwrap_or(word).to_lowercase();

        match word.as_str() {
            "start" => Command::Start,
            "help" => Command::Help,
            "set" => Command::Set(argument),
            "list" => Command::List,
            "remove" => Command::Remove(argument),
            "clear" => Command::Clear,
            "confirm" => Command::Confirm,
            "cancel" => Command::Cancel,
            "recommend" => Command::Recommend(argument),
            _ => Command::Unknown(head.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_and_without_slash() {
        assert_eq!(Command::parse("/set Nirvana"), Command::Set("Nirvana".to_string()));
        assert_eq!(Command::parse("set Nirvana"), Command::Set("Nirvana".to_string()));
        assert_eq!(Command::parse("/list"), Command::List);
    }

    #[test]
    fn test_parse_bot_suffix_and_case() {
        assert_eq!(
            Command::parse("/Recommend@taste_bot music"),
            Command::Recommend("music".to_string())
        );
        assert_eq!(Command::parse("CLEAR"), Command::Clear);
    }

    #[test]
    fn test_parse_collapses_whitespace_in_argument() {
        assert_eq!(
            Command::parse("  /set   The   Smiths  "),
            Command::Set("The Smiths".to_string())
        );
    }

    #[test]
    fn test_parse_missing_argument_is_empty() {
        assert_eq!(Command::parse("/remove"), Command::Remove(String::new()));
        assert_eq!(Command::parse("/recommend"), Command::Recommend(String::new()));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(Command::parse("/dance now"), Command::Unknown("/dance".to_string()));
        assert_eq!(Command::parse("   "), Command::Unknown(String::new()));
    }

    #[test]
    fn test_parse_confirmation_commands() {
        assert_eq!(Command::parse("/confirm"), Command::Confirm);
        assert_eq!(Command::parse("/cancel"), Command::Cancel);
        assert_eq!(Command::parse("/start"), Command::Start);
        assert_eq!(Command::parse("/help"), Command::Help);
    }
}
