//! Migration definition parsing.
//!
//! A migration file is a small XML document:
//!
//! ```xml
//! <patch>
//!   <up>
//!     <sql><![CDATA[ CREATE TABLE t (id INT) ]]></sql>
//!   </up>
//!   <down>
//!     <sql><![CDATA[ DROP TABLE t ]]></sql>
//!   </down>
//! </patch>
//! ```
//!
//! Each `<sql>` element directly under `<patch><up>` or `<patch><down>` is one
//! statement. Statements keep document order; whitespace-only statements are
//! dropped. Any other elements are ignored.

use crate::direction::Direction;
use crate::error::{CoreError, CoreResult};
use quick_xml::events::Event;
use quick_xml::Reader;

const ROOT: &str = "patch";
const STATEMENT: &str = "sql";

/// Parsed contents of one migration file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationDefinition {
    /// Statements applied by `up`, in document order
    pub up: Vec<String>,

    /// Statements applied by `down`, in document order
    pub down: Vec<String>,
}

impl MigrationDefinition {
    /// Parse a migration document. `id` is only used for error messages.
    pub fn parse(id: &str, content: &str) -> CoreResult<Self> {
        let parse_err = |message: String| CoreError::DefinitionParse {
            id: id.to_string(),
            message,
        };

        let mut reader = Reader::from_str(content);
        let mut path: Vec<String> = Vec::new();
        let mut root_seen = false;
        let mut current: Option<String> = None;
        let mut definition = MigrationDefinition::default();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    if path.is_empty() {
                        check_root(&name, root_seen).map_err(parse_err)?;
                        root_seen = true;
                    }
                    path.push(name);
                    if statement_section(&path).is_some() {
                        current = Some(String::new());
                    }
                }
                Ok(Event::Empty(e)) => {
                    // <sql/> is an empty statement and is dropped
                    if path.is_empty() {
                        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                        check_root(&name, root_seen).map_err(parse_err)?;
                        root_seen = true;
                    }
                }
                Ok(Event::End(_)) => {
                    if let Some(direction) = statement_section(&path) {
                        if let Some(buf) = current.take() {
                            definition.push(direction, &buf);
                        }
                    }
                    path.pop();
                }
                Ok(Event::Text(e)) => {
                    if let Some(buf) = current.as_mut() {
                        let text = e
                            .unescape()
                            .map_err(|err| parse_err(format!("invalid text: {err}")))?;
                        buf.push_str(&text);
                    } else if path.is_empty() && !e.iter().all(u8::is_ascii_whitespace) {
                        return Err(parse_err(format!(
                            "text outside the <{ROOT}> element at position {}",
                            reader.buffer_position()
                        )));
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(buf) = current.as_mut() {
                        let text = std::str::from_utf8(&e)
                            .map_err(|err| parse_err(format!("CDATA is not UTF-8: {err}")))?;
                        buf.push_str(text);
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(parse_err(format!(
                        "{e} at position {}",
                        reader.buffer_position()
                    )))
                }
            }
        }

        if let Some(open) = path.last() {
            return Err(parse_err(format!(
                "unexpected end of document, <{open}> is not closed"
            )));
        }
        if !root_seen {
            return Err(parse_err(format!("missing <{ROOT}> root element")));
        }

        Ok(definition)
    }

    /// Statements to run for `direction`
    pub fn statements(&self, direction: Direction) -> &[String] {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }

    fn push(&mut self, direction: Direction, raw: &str) {
        let stmt = raw.trim();
        if stmt.is_empty() {
            return;
        }
        match direction {
            Direction::Up => self.up.push(stmt.to_string()),
            Direction::Down => self.down.push(stmt.to_string()),
        }
    }
}

fn check_root(name: &str, root_seen: bool) -> Result<(), String> {
    if root_seen {
        return Err(format!("found second root element <{name}>"));
    }
    if name != ROOT {
        return Err(format!("root element must be <{ROOT}>, found <{name}>"));
    }
    Ok(())
}

/// Direction of the statement element at the end of `path`, if it is one.
fn statement_section(path: &[String]) -> Option<Direction> {
    match path {
        [root, section, leaf] if root == ROOT && leaf == STATEMENT => match section.as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
#[path = "definition_test.rs"]
mod tests;
