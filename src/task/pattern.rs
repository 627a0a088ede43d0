// src/task/pattern.rs

//! Glob pattern compiler.
//!
//! Patterns are a small grammar over relative, `/`-separated paths:
//!
//! - `*` matches one or more characters within a single segment (no `/`),
//! - `**` matches one or more characters of any kind, including `/`,
//! - `(` ... `)` marks an explicit capture group,
//! - anything else is matched literally.
//!
//! The compiled matcher is anchored, so the pattern must cover the whole
//! relative path. Captures feed the `$1..$N` placeholders of a destination
//! template: when a pattern contains explicit groups (`src/(**).scss`) those
//! are the captures, otherwise every wildcard captures in order of appearance.

use std::fmt;

use regex::Regex;

use crate::errors::{GlobtaskError, Result};

/// Prefix requesting content-hash renaming of the destination.
pub const HASH_PREFIX: &str = "hash:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    /// `*`
    Star,
    /// `**`
    DoubleStar,
    GroupOpen,
    GroupClose,
}

/// A compiled glob pattern.
#[derive(Clone)]
pub struct GlobPattern {
    source: String,
    regex: Regex,
}

impl fmt::Debug for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobPattern")
            .field("source", &self.source)
            .field("regex", &self.regex.as_str())
            .finish()
    }
}

impl GlobPattern {
    /// Compile a pattern (without any `hash:` prefix).
    pub fn compile(pattern: &str) -> Result<Self> {
        let tokens = tokenize(pattern);
        let regex_src = to_regex(&tokens);
        let regex = Regex::new(&regex_src).map_err(|e| GlobtaskError::Pattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern text this matcher was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The generated regular expression, for diagnostics.
    pub fn regex_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, rel_path: &str) -> bool {
        self.regex.is_match(rel_path)
    }

    /// Match a relative path and return its captures in order, or `None`.
    pub fn captures(&self, rel_path: &str) -> Option<Vec<String>> {
        let caps = self.regex.captures(rel_path)?;
        Some(
            caps.iter()
                .skip(1)
                .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect(),
        )
    }

    /// Directory where traversal for this pattern starts: its first path
    /// segment, or `.` when the pattern has no `/`.
    pub fn source_root(&self) -> &str {
        match self.source.find('/') {
            Some(idx) => &self.source[..idx],
            None => ".",
        }
    }
}

/// Strip an optional `hash:` prefix, returning the bare pattern and whether
/// it was present.
pub fn split_hash_prefix(pattern: &str) -> (&str, bool) {
    match pattern.strip_prefix(HASH_PREFIX) {
        Some(rest) => (rest, true),
        None => (pattern, false),
    }
}

/// Split a pattern into grammar tokens.
///
/// Parentheses that do not pair up are demoted to literal characters, so
/// tokenizing never fails.
pub fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut open_groups: Vec<usize> = Vec::new();
    let mut chars = pattern.chars().peekable();

    let flush = |literal: &mut String, tokens: &mut Vec<Token>| {
        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(literal)));
        }
    };

    while let Some(c) = chars.next() {
        match c {
            '*' => {
                flush(&mut literal, &mut tokens);
                if chars.peek() == Some(&'*') {
                    chars.next();
                    tokens.push(Token::DoubleStar);
                } else {
                    tokens.push(Token::Star);
                }
            }
            '(' => {
                flush(&mut literal, &mut tokens);
                open_groups.push(tokens.len());
                tokens.push(Token::GroupOpen);
            }
            ')' if !open_groups.is_empty() => {
                flush(&mut literal, &mut tokens);
                open_groups.pop();
                tokens.push(Token::GroupClose);
            }
            other => literal.push(other),
        }
    }
    flush(&mut literal, &mut tokens);

    // Unclosed groups become literal text.
    for idx in open_groups {
        tokens[idx] = Token::Literal("(".to_string());
    }

    tokens
}

fn to_regex(tokens: &[Token]) -> String {
    let explicit_groups = tokens.contains(&Token::GroupOpen);
    let mut out = String::from("^");

    for token in tokens {
        match token {
            Token::Literal(text) => out.push_str(&regex::escape(text)),
            Token::Star if explicit_groups => out.push_str("[^/]+"),
            Token::Star => out.push_str("([^/]+)"),
            Token::DoubleStar if explicit_groups => out.push_str(".+"),
            Token::DoubleStar => out.push_str("(.+)"),
            Token::GroupOpen => out.push('('),
            Token::GroupClose => out.push(')'),
        }
    }

    out.push('$');
    out
}
