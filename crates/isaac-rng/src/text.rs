//! Plain-text state dump and reload
//!
//! Base-10 words separated by whitespace: `a b c cursor` on the first line,
//! then the 256 results and the 256 memory words, eight per line. Memory is
//! part of the dump so a reloaded generator compares equal to the original.

use core::fmt;
use core::str::FromStr;

use crate::error::StateError;
use crate::isaac::{Isaac, RAND_SIZE, Words};

const WORDS_PER_LINE: usize = 8;

impl Isaac {
    /// Dump the full state as text.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Rebuild a generator from a dump produced by [`Isaac::to_text`].
    pub fn from_text(text: &str) -> Result<Self, StateError> {
        let mut tokens = text.split_whitespace();

        let a = header_field(&mut tokens, "a")?;
        let b = header_field(&mut tokens, "b")?;
        let c = header_field(&mut tokens, "c")?;
        let cursor = header_field(&mut tokens, "cursor")?;
        let results = section(&mut tokens, "results")?;
        let memory = section(&mut tokens, "memory")?;

        if let Some(token) = tokens.next() {
            return Err(StateError::TrailingData {
                token: token.to_string(),
            });
        }

        Isaac::from_parts(a, b, c, cursor as usize, results, memory)
    }
}

fn parse_word(field: &'static str, token: &str) -> Result<u32, StateError> {
    token.parse().map_err(|_| StateError::Parse {
        field,
        token: token.to_string(),
    })
}

fn header_field<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    field: &'static str,
) -> Result<u32, StateError> {
    let token = tokens.next().ok_or(StateError::MissingField { field })?;
    parse_word(field, token)
}

fn section<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    section: &'static str,
) -> Result<Words, StateError> {
    let mut words = [0; RAND_SIZE];
    for (found, word) in words.iter_mut().enumerate() {
        let token = tokens.next().ok_or(StateError::Incomplete {
            section,
            expected: RAND_SIZE,
            found,
        })?;
        *word = parse_word(section, token)?;
    }
    Ok(words)
}

fn write_words(f: &mut fmt::Formatter<'_>, words: &Words) -> fmt::Result {
    for row in words.chunks(WORDS_PER_LINE) {
        let line: Vec<String> = row.iter().map(u32::to_string).collect();
        writeln!(f, "{}", line.join(" "))?;
    }
    Ok(())
}

impl fmt::Display for Isaac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {} {} {}", self.a, self.b, self.c, self.cursor)?;
        write_words(f, &self.results)?;
        write_words(f, &self.memory)
    }
}

impl FromStr for Isaac {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}
