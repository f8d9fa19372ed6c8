//! Parsing of the text commands a client sends, one per line.
//!
//! Grammar (case-sensitive, arguments separated by single spaces):
//! - `read [index]`
//! - `add [-id index] <body...>`
//! - `change <index> <body...>`
//! - `delete [index]`
//! - `exit`
//!
//! Anything else parses as [`Command::Unknown`] and is echoed back.

use crate::error::{Result, StoreError};

const LINE_ENDINGS: &[char] = &['\n', '\r'];
const INDEX_MARKER: &str = "-id";

/// One parsed request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Read { index: Option<usize> },
    Add { index: Option<usize>, body: String },
    Change { index: usize, body: String },
    Delete { index: Option<usize> },
    Exit,
    Unknown(String),
}

impl Command {
    /// Parses one input line.
    ///
    /// Index tokens that are not a positive number become index `0`, which
    /// the store always rejects as out of bounds. Only missing required
    /// arguments are reported here, as [`StoreError::MalformedCommand`].
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim_end_matches(LINE_ENDINGS);
        let tokens: Vec<&str> = line.split(' ').collect();
        let Some((&name, args)) = tokens.split_first() else {
            return Ok(Command::Unknown(line.to_string()));
        };

        match name {
            "read" => Ok(Command::Read {
                index: optional_index(args),
            }),
            "delete" => Ok(Command::Delete {
                index: optional_index(args),
            }),
            "change" => parse_change(args),
            "add" => parse_add(args),
            "exit" => Ok(Command::Exit),
            _ => Ok(Command::Unknown(line.to_string())),
        }
    }
}

fn parse_change(args: &[&str]) -> Result<Command> {
    let Some((&index, body)) = args.split_first() else {
        return Err(StoreError::MalformedCommand(
            "usage: change <index> <body...>".to_string(),
        ));
    };
    Ok(Command::Change {
        index: parse_index(index),
        body: body.join(" "),
    })
}

// `-id` is matched as a whole token only, so a body such as `my-idea` never
// turns into an indexed insert. Tokens on either side of `-id <index>` form
// the body.
fn parse_add(args: &[&str]) -> Result<Command> {
    let Some(marker) = args.iter().position(|&token| token == INDEX_MARKER) else {
        return Ok(Command::Add {
            index: None,
            body: args.join(" "),
        });
    };

    let Some(&index) = args.get(marker + 1) else {
        return Err(StoreError::MalformedCommand(
            "usage: add -id <index> <body...>".to_string(),
        ));
    };

    let body: Vec<&str> = args[..marker]
        .iter()
        .chain(&args[marker + 2..])
        .copied()
        .collect();
    Ok(Command::Add {
        index: Some(parse_index(index)),
        body: body.join(" "),
    })
}

// An absent or empty first argument means "no index".
fn optional_index(args: &[&str]) -> Option<usize> {
    args.first()
        .filter(|token| !token.is_empty())
        .map(|token| parse_index(token))
}

fn parse_index(token: &str) -> usize {
    token.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Command::parse(line).expect("command should parse")
    }

    #[test]
    fn read_and_delete_take_optional_index() {
        assert_eq!(parse("read"), Command::Read { index: None });
        assert_eq!(parse("read 3"), Command::Read { index: Some(3) });
        assert_eq!(parse("read "), Command::Read { index: None });
        assert_eq!(parse("delete"), Command::Delete { index: None });
        assert_eq!(parse("delete 2"), Command::Delete { index: Some(2) });
    }

    #[test]
    fn non_numeric_index_becomes_zero() {
        assert_eq!(parse("read two"), Command::Read { index: Some(0) });
        assert_eq!(parse("delete -1"), Command::Delete { index: Some(0) });
        assert_eq!(
            parse("change x body"),
            Command::Change {
                index: 0,
                body: "body".into()
            }
        );
    }

    #[test]
    fn change_joins_remaining_tokens() {
        assert_eq!(
            parse("change 2 new  body text"),
            Command::Change {
                index: 2,
                body: "new  body text".into()
            }
        );
        assert_eq!(
            parse("change 1"),
            Command::Change {
                index: 1,
                body: String::new()
            }
        );
    }

    #[test]
    fn change_without_index_is_malformed() {
        assert!(matches!(
            Command::parse("change"),
            Err(StoreError::MalformedCommand(_))
        ));
    }

    #[test]
    fn add_without_marker_appends_whole_remainder() {
        assert_eq!(
            parse("add hello world"),
            Command::Add {
                index: None,
                body: "hello world".into()
            }
        );
        assert_eq!(
            parse("add my-idea"),
            Command::Add {
                index: None,
                body: "my-idea".into()
            }
        );
    }

    #[test]
    fn add_with_marker_takes_following_index() {
        assert_eq!(
            parse("add -id 2 inserted record"),
            Command::Add {
                index: Some(2),
                body: "inserted record".into()
            }
        );
        assert_eq!(
            parse("add note -id 1 later"),
            Command::Add {
                index: Some(1),
                body: "note later".into()
            }
        );
        assert!(matches!(
            Command::parse("add body -id"),
            Err(StoreError::MalformedCommand(_))
        ));
    }

    #[test]
    fn exit_and_unknown_lines() {
        assert_eq!(parse("exit"), Command::Exit);
        assert_eq!(parse("exit\r\n"), Command::Exit);
        assert_eq!(parse("READ"), Command::Unknown("READ".into()));
        assert_eq!(parse(""), Command::Unknown(String::new()));
        assert_eq!(parse("hello there"), Command::Unknown("hello there".into()));
    }
}
