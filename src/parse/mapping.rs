//! Embedded mapping parser
//!
//! Rider-info and ride-start log lines wrap their payload in a descriptive
//! prefix followed by a brace-delimited mapping in the hardware's own literal
//! syntax: single- or double-quoted strings, integers, floats, `None`,
//! `True`/`False`. This is close to JSON but not JSON, so it gets its own
//! small scanner rather than a lossy quote-substitution pass.
//!
//! The scanner is grammar-driven: each rule either consumes a well-formed
//! token or stops the scan. A malformed tail aborts cleanly, keeping the
//! entries recovered so far; callers treat anything missing as absent.

use std::collections::HashMap;

/// A value recovered from the embedded mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    None,
}

impl LiteralValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LiteralValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view; numeric text is accepted since some firmware revisions
    /// quote their numbers.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            LiteralValue::Int(i) => Some(*i),
            LiteralValue::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            LiteralValue::Float(f) => Some(*f),
            LiteralValue::Int(i) => Some(*i as f64),
            LiteralValue::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Parse the first brace-delimited mapping embedded in a log line.
///
/// Returns an empty map when the line carries no mapping. Never errors.
pub fn parse_embedded_mapping(line: &str) -> HashMap<String, LiteralValue> {
    let mut entries = HashMap::new();

    let Some(start) = line.find('{') else {
        return entries;
    };
    let mut scanner = Scanner::new(&line[start + 1..]);

    loop {
        scanner.skip_ws();
        match scanner.peek() {
            Some('}') | None => break,
            Some(',') => {
                scanner.bump();
                continue;
            }
            _ => {}
        }

        // key ':' value
        let Some(key) = scanner.parse_string() else {
            break;
        };
        scanner.skip_ws();
        if !scanner.eat(':') {
            break;
        }
        scanner.skip_ws();
        let Some(value) = scanner.parse_value() else {
            break;
        };
        entries.insert(key, value);
    }

    entries
}

struct Scanner<'a> {
    rest: &'a str,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Scanner { rest: input }
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.rest = &self.rest[c.len_utf8()..];
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|c| c.is_whitespace()) {
            self.bump();
        }
    }

    /// Quoted string, single or double quotes, backslash escapes.
    fn parse_string(&mut self) -> Option<String> {
        let quote = self.peek()?;
        if quote != '\'' && quote != '"' {
            return None;
        }
        self.bump();

        let mut out = String::new();
        loop {
            match self.bump()? {
                c if c == quote => return Some(out),
                '\\' => match self.bump()? {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    // unknown escapes pass through verbatim
                    c => out.push(c),
                },
                c => out.push(c),
            }
        }
    }

    /// Bare token: number, `None`, `True`, `False`.
    fn parse_bare(&mut self) -> Option<LiteralValue> {
        let token: String = self
            .rest
            .chars()
            .take_while(|c| !matches!(c, ',' | '}' | ':') && !c.is_whitespace())
            .collect();
        if token.is_empty() {
            return None;
        }
        self.rest = &self.rest[token.len()..];

        match token.as_str() {
            "None" => return Some(LiteralValue::None),
            "True" => return Some(LiteralValue::Bool(true)),
            "False" => return Some(LiteralValue::Bool(false)),
            _ => {}
        }

        if token.contains('.') || token.contains('e') || token.contains('E') {
            token.parse().ok().map(LiteralValue::Float)
        } else {
            token.parse().ok().map(LiteralValue::Int)
        }
    }

    fn parse_value(&mut self) -> Option<LiteralValue> {
        match self.peek()? {
            '\'' | '"' => self.parse_string().map(LiteralValue::Str),
            _ => self.parse_bare(),
        }
    }
}
