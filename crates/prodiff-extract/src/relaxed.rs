//! Permissive literal parser
//!
//! Last-resort fallback for quasi-JSON: models occasionally emit values with
//! host-language literal syntax instead of strict JSON, most commonly
//! single-quoted strings and Python's `True`/`False`/`None`. This is a small
//! recursive-descent parser scoped strictly to object/array/string/number/
//! bool/null literals; it additionally tolerates trailing commas. It is not
//! an interpreter for anything beyond those literals.

use serde_json::{Map, Number, Value};
use std::iter::Peekable;
use std::str::Chars;

/// Maximum container nesting depth, matching serde_json's recursion limit.
/// Pathological bracket runs must come back as an error, not a stack
/// overflow.
const MAX_DEPTH: usize = 128;

/// Parse a relaxed literal, requiring the whole input to be consumed
pub(crate) fn parse_relaxed(input: &str) -> Result<Value, String> {
    let mut parser = Parser {
        chars: input.chars().peekable(),
    };
    parser.skip_ws();
    let value = parser.parse_value(0)?;
    parser.skip_ws();
    if parser.chars.peek().is_some() {
        return Err("trailing characters after value".to_string());
    }
    Ok(value)
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl Parser<'_> {
    fn skip_ws(&mut self) {
        while matches!(self.chars.peek(), Some(c) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn expect(&mut self, wanted: char) -> Result<(), String> {
        match self.chars.next() {
            Some(c) if c == wanted => Ok(()),
            Some(c) => Err(format!("expected '{}', found '{}'", wanted, c)),
            None => Err(format!("expected '{}', found end of input", wanted)),
        }
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value, String> {
        if depth > MAX_DEPTH {
            return Err("value nesting too deep".to_string());
        }
        match self.chars.peek() {
            Some('{') => self.parse_object(depth),
            Some('[') => self.parse_array(depth),
            Some(&q @ ('"' | '\'')) => self.parse_string(q).map(Value::String),
            Some(c) if *c == '-' || c.is_ascii_digit() => self.parse_number(),
            Some(c) if c.is_alphabetic() => self.parse_word(),
            Some(c) => Err(format!("unexpected character '{}'", c)),
            None => Err("unexpected end of input".to_string()),
        }
    }

    fn parse_object(&mut self, depth: usize) -> Result<Value, String> {
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_ws();
            match self.chars.peek() {
                Some('}') => {
                    self.chars.next();
                    return Ok(Value::Object(map));
                }
                Some(&q @ ('"' | '\'')) => {
                    let key = self.parse_string(q)?;
                    self.skip_ws();
                    self.expect(':')?;
                    self.skip_ws();
                    let value = self.parse_value(depth + 1)?;
                    map.insert(key, value);
                    self.skip_ws();
                    match self.chars.peek() {
                        // Trailing comma before '}' is tolerated by the loop
                        Some(',') => {
                            self.chars.next();
                        }
                        Some('}') => {}
                        _ => return Err("expected ',' or '}' in object".to_string()),
                    }
                }
                Some(c) => return Err(format!("expected object key, found '{}'", c)),
                None => return Err("unterminated object".to_string()),
            }
        }
    }

    fn parse_array(&mut self, depth: usize) -> Result<Value, String> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            match self.chars.peek() {
                Some(']') => {
                    self.chars.next();
                    return Ok(Value::Array(items));
                }
                Some(_) => {
                    items.push(self.parse_value(depth + 1)?);
                    self.skip_ws();
                    match self.chars.peek() {
                        Some(',') => {
                            self.chars.next();
                        }
                        Some(']') => {}
                        _ => return Err("expected ',' or ']' in array".to_string()),
                    }
                }
                None => return Err("unterminated array".to_string()),
            }
        }
    }

    fn parse_string(&mut self, quote: char) -> Result<String, String> {
        self.expect(quote)?;
        let mut out = String::new();
        loop {
            match self.chars.next() {
                Some(c) if c == quote => return Ok(out),
                Some('\\') => out.push(self.parse_escape()?),
                Some(c) => out.push(c),
                None => return Err("unterminated string".to_string()),
            }
        }
    }

    fn parse_escape(&mut self) -> Result<char, String> {
        match self.chars.next() {
            Some('n') => Ok('\n'),
            Some('t') => Ok('\t'),
            Some('r') => Ok('\r'),
            Some('b') => Ok('\u{0008}'),
            Some('f') => Ok('\u{000C}'),
            Some('\\') => Ok('\\'),
            Some('/') => Ok('/'),
            Some('"') => Ok('"'),
            Some('\'') => Ok('\''),
            Some('u') => self.parse_unicode_escape(),
            Some(c) => Err(format!("unknown escape '\\{}'", c)),
            None => Err("unterminated escape".to_string()),
        }
    }

    fn parse_unicode_escape(&mut self) -> Result<char, String> {
        let high = self.parse_hex4()?;
        if (0xD800..=0xDBFF).contains(&high) {
            // UTF-16 surrogate pair
            if self.chars.next() != Some('\\') || self.chars.next() != Some('u') {
                return Err("lone high surrogate in \\u escape".to_string());
            }
            let low = self.parse_hex4()?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err("invalid low surrogate in \\u escape".to_string());
            }
            let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
            char::from_u32(code).ok_or_else(|| "invalid surrogate pair".to_string())
        } else {
            char::from_u32(high).ok_or_else(|| format!("invalid \\u escape {:04x}", high))
        }
    }

    fn parse_hex4(&mut self) -> Result<u32, String> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self
                .chars
                .next()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| "invalid \\u escape".to_string())?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    fn parse_number(&mut self) -> Result<Value, String> {
        let mut text = String::new();
        while matches!(
            self.chars.peek(),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E')
        ) {
            text.push(self.chars.next().ok_or("end of input")?);
        }
        if let Ok(n) = text.parse::<i64>() {
            return Ok(Value::Number(Number::from(n)));
        }
        if let Ok(n) = text.parse::<u64>() {
            return Ok(Value::Number(Number::from(n)));
        }
        let n = text
            .parse::<f64>()
            .map_err(|_| format!("invalid number '{}'", text))?;
        Number::from_f64(n)
            .map(Value::Number)
            .ok_or_else(|| format!("non-finite number '{}'", text))
    }

    fn parse_word(&mut self) -> Result<Value, String> {
        let mut word = String::new();
        while matches!(self.chars.peek(), Some(c) if c.is_alphabetic()) {
            word.push(self.chars.next().ok_or("end of input")?);
        }
        match word.as_str() {
            "true" | "True" => Ok(Value::Bool(true)),
            "false" | "False" => Ok(Value::Bool(false)),
            "null" | "None" => Ok(Value::Null),
            other => Err(format!("unexpected word '{}'", other)),
        }
    }
}
