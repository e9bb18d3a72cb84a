//! Python literal grammar used by EasyConfig values
//!
//! Only the subset needed to read `toolchain`, `dependencies` and
//! `builddependencies` is supported:
//!
//! ```text
//! value   := primary ('+' primary)*
//! primary := string+ | number | name | tuple | list | dict
//! tuple   := '(' [value (',' value)* [',']] ')'
//! list    := '[' [value (',' value)* [',']] ']'
//! dict    := '{' [value ':' value (',' value ':' value)* [',']] '}'
//! ```
//!
//! Whitespace, newlines and `#` comments may appear between any two tokens.

use std::collections::HashMap;

use thiserror::Error;

/// A parsed literal value
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Number(String),
    /// A bare identifier such as `SYSTEM` or `local_pyver`
    Name(String),
    Tuple(Vec<Literal>),
    List(Vec<Literal>),
    Dict(Vec<(Literal, Literal)>),
    /// `a + b` where the operands are not both text
    Concat(Vec<Literal>),
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message} (line {line})")]
pub struct LiteralError {
    pub message: String,
    /// 1-based line, relative to the start of the parsed text
    pub line: usize,
}

impl Literal {
    /// Text of a string literal, or of an identifier resolved through `names`
    pub fn as_text(&self, names: &HashMap<String, String>) -> Option<String> {
        match self {
            Literal::Str(s) | Literal::Number(s) => Some(s.clone()),
            Literal::Name(n) => Some(names.get(n).cloned().unwrap_or_else(|| n.clone())),
            Literal::Concat(parts) => parts
                .iter()
                .map(|p| p.as_text(names))
                .collect::<Option<Vec<_>>>()
                .map(|texts| texts.concat()),
            _ => None,
        }
    }

    /// Items of a tuple or list
    pub fn items(&self) -> Option<&[Literal]> {
        match self {
            Literal::Tuple(items) | Literal::List(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a string key in a dict literal
    pub fn get(&self, key: &str) -> Option<&Literal> {
        match self {
            Literal::Dict(entries) => entries
                .iter()
                .find(|(k, _)| matches!(k, Literal::Str(s) if s == key))
                .map(|(_, v)| v),
            _ => None,
        }
    }
}

/// Parse one literal from the start of `input`.
///
/// Returns the value and the number of bytes consumed. Anything after the
/// value is left for the caller.
pub fn parse_prefix(input: &str) -> Result<(Literal, usize), LiteralError> {
    let mut parser = Parser::new(input);
    let value = parser.value()?;
    Ok((value, parser.pos))
}

/// Parse `input` as exactly one literal, allowing trailing whitespace and comments
pub fn parse(input: &str) -> Result<Literal, LiteralError> {
    let mut parser = Parser::new(input);
    let value = parser.value()?;
    parser.skip_trivia();
    match parser.peek() {
        None => Ok(value),
        Some(c) => Err(parser.error(format!("unexpected '{}' after value", c))),
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> LiteralError {
        LiteralError {
            message: message.into(),
            line: self.input[..self.pos].matches('\n').count() + 1,
        }
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == '\\' {
                self.bump();
            } else if c == '#' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn value(&mut self) -> Result<Literal, LiteralError> {
        let first = self.primary()?;
        let mut parts = vec![first];

        loop {
            let save = self.pos;
            self.skip_trivia();
            if self.peek() != Some('+') {
                self.pos = save;
                break;
            }
            self.bump();
            parts.push(self.primary()?);
        }

        if parts.len() == 1 {
            return Ok(parts.remove(0));
        }
        if parts.iter().all(|p| matches!(p, Literal::Str(_))) {
            let joined = parts
                .into_iter()
                .filter_map(|p| match p {
                    Literal::Str(s) => Some(s),
                    _ => None,
                })
                .collect();
            return Ok(Literal::Str(joined));
        }
        Ok(Literal::Concat(parts))
    }

    fn primary(&mut self) -> Result<Literal, LiteralError> {
        self.skip_trivia();
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some('\'') | Some('"') => self.strings(),
            Some('(') => {
                self.bump();
                self.sequence(')').map(Literal::Tuple)
            }
            Some('[') => {
                self.bump();
                self.sequence(']').map(Literal::List)
            }
            Some('{') => {
                self.bump();
                self.dict()
            }
            Some(c) if c.is_ascii_digit() || c == '-' || c == '.' => Ok(self.number()),
            Some(c) if c.is_alphabetic() || c == '_' => self.name_or_prefixed_string(),
            Some(c) => Err(self.error(format!("unexpected '{}'", c))),
        }
    }

    fn sequence(&mut self, close: char) -> Result<Vec<Literal>, LiteralError> {
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                Some(c) if c == close => {
                    self.bump();
                    return Ok(items);
                }
                None => return Err(self.error(format!("missing closing '{}'", close))),
                _ => {}
            }

            items.push(self.value()?);

            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(c) if c == close => {}
                None => return Err(self.error(format!("missing closing '{}'", close))),
                Some(c) => {
                    return Err(self.error(format!("expected ',' or '{}', found '{}'", close, c)))
                }
            }
        }
    }

    fn dict(&mut self) -> Result<Literal, LiteralError> {
        let mut entries = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                Some('}') => {
                    self.bump();
                    return Ok(Literal::Dict(entries));
                }
                None => return Err(self.error("missing closing '}'")),
                _ => {}
            }

            let key = self.value()?;
            self.skip_trivia();
            if self.bump() != Some(':') {
                return Err(self.error("expected ':' in dict"));
            }
            let value = self.value()?;
            entries.push((key, value));

            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {}
                None => return Err(self.error("missing closing '}'")),
                Some(c) => return Err(self.error(format!("expected ',' or '}}', found '{}'", c))),
            }
        }
    }

    /// One or more adjacent string literals, concatenated
    fn strings(&mut self) -> Result<Literal, LiteralError> {
        let mut text = self.string()?;
        loop {
            let save = self.pos;
            self.skip_trivia();
            match self.peek() {
                Some('\'') | Some('"') => text.push_str(&self.string()?),
                _ => {
                    self.pos = save;
                    return Ok(Literal::Str(text));
                }
            }
        }
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let quote = match self.bump() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("expected string")),
        };
        let triple: String = std::iter::repeat(quote).take(3).collect();
        let is_triple = self.input[self.pos..].starts_with(&triple[..2]);
        if is_triple {
            self.pos += 2;
        }

        let mut text = String::new();
        loop {
            if is_triple && self.input[self.pos..].starts_with(&triple) {
                self.pos += 3;
                return Ok(text);
            }
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some('\n') if !is_triple => return Err(self.error("unterminated string")),
                Some(c) if c == quote && !is_triple => return Ok(text),
                Some('\\') => match self.bump() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some('\n') => {}
                    Some(c @ ('\\' | '\'' | '"')) => text.push(c),
                    Some(c) => {
                        text.push('\\');
                        text.push(c);
                    }
                    None => return Err(self.error("unterminated string")),
                },
                Some(c) => text.push(c),
            }
        }
    }

    fn number(&mut self) -> Literal {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        Literal::Number(self.input[start..self.pos].to_string())
    }

    fn name_or_prefixed_string(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '.' {
                self.bump();
            } else {
                break;
            }
        }
        let name = &self.input[start..self.pos];

        // r'...' and similar prefixes
        if matches!(self.peek(), Some('\'') | Some('"'))
            && name.len() <= 2
            && name.chars().all(|c| "rRbBuUfF".contains(c))
        {
            return self.strings();
        }

        Ok(Literal::Name(name.to_string()))
    }
}
