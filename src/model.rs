use std::fmt::{Display, Formatter};
use std::str::FromStr;

use indexmap::IndexMap;
use indexmap::map::{Iter, Keys, Values};

use crate::error::Error;

/// Separator configuration for a single parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParseConfig {
    pair_separator: char,
    value_separator: char,
}

impl ParseConfig {
    pub const DEFAULT_PAIR_SEPARATOR: char = ' ';
    pub const DEFAULT_VALUE_SEPARATOR: char = '=';

    pub fn new() -> Self {
        Self::default()
    }

    /// CSS-style declarations: `key:value;key:value;`.
    pub fn css() -> Self {
        Self {
            pair_separator: ';',
            value_separator: ':',
        }
    }

    pub fn pair_separator(mut self, pair_separator: char) -> Self {
        self.pair_separator = pair_separator;
        self
    }

    pub fn value_separator(mut self, value_separator: char) -> Self {
        self.value_separator = value_separator;
        self
    }

    pub fn pair_sep(&self) -> char {
        self.pair_separator
    }

    pub fn value_sep(&self) -> char {
        self.value_separator
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            pair_separator: Self::DEFAULT_PAIR_SEPARATOR,
            value_separator: Self::DEFAULT_VALUE_SEPARATOR,
        }
    }
}

/// Named separator configurations for known sub-grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// `key=value key=value`.
    #[default]
    Default,
    /// `key:value;key:value;`.
    Css,
}

impl Preset {
    pub fn config(self) -> ParseConfig {
        match self {
            Self::Default => ParseConfig::default(),
            Self::Css => ParseConfig::css(),
        }
    }
}

impl From<Preset> for ParseConfig {
    fn from(value: Preset) -> Self {
        value.config()
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("default") {
            Ok(Self::Default)
        } else if s.eq_ignore_ascii_case("css") {
            Ok(Self::Css)
        } else {
            Err(Error::UnknownPreset(s.to_owned()))
        }
    }
}

/// Interpret `raw` as a single separator character.
pub fn separator(raw: &str) -> Result<char, Error> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(Error::InvalidSeparator(raw.to_owned())),
    }
}

/// Result of parsing an option list.
///
/// Keys iterate in the order they were first seen. When a key repeats, the
/// value of its last occurrence is kept at the first occurrence's position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedOptions {
    source: String,
    config: ParseConfig,
    options: IndexMap<String, String>,
}

impl ParsedOptions {
    pub(crate) fn new(source: &str, config: ParseConfig) -> Self {
        Self {
            source: source.to_owned(),
            config,
            options: IndexMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, key: &str, value: &str) {
        self.options.insert(key.to_owned(), value.to_owned());
    }

    /// The input exactly as it was passed to the parser.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn config(&self) -> ParseConfig {
        self.config
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, String> {
        self.options.iter()
    }

    pub fn keys(&self) -> Keys<'_, String, String> {
        self.options.keys()
    }

    pub fn values(&self) -> Values<'_, String, String> {
        self.options.values()
    }

    pub fn into_map(self) -> IndexMap<String, String> {
        self.options
    }
}

impl<'a> IntoIterator for &'a ParsedOptions {
    type Item = (&'a String, &'a String);
    type IntoIter = Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Display for ParsedOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}
