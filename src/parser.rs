use std::io::BufRead;

use log::{debug, trace};

use crate::error::Error;
use crate::model::{ParseConfig, ParsedOptions};

/// Parse an option list using the default separators (`' '` and `'='`).
pub fn parse_str(input: &str) -> ParsedOptions {
    parse_str_with_config(input, ParseConfig::default())
}

/// Parse CSS-style declarations (`';'` and `':'`).
pub fn parse_css(input: &str) -> ParsedOptions {
    parse_str_with_config(input, ParseConfig::css())
}

/// Parse an option list using a specific separator configuration.
///
/// Parsing never fails. Input without a value separator becomes a key with
/// an empty value, and a quote that is never closed extends the value to
/// the end of the input.
pub fn parse_str_with_config(input: &str, config: ParseConfig) -> ParsedOptions {
    let mut options = ParsedOptions::new(input, config);
    let len = input.len();
    let value_sep = config.value_sep();
    let mut offset = 0usize;

    while offset < len {
        offset = skip_blanks(input, offset);

        let key_end = find_from(input, offset, value_sep);
        let key = &input[offset..key_end];
        offset = key_end;

        if offset == len {
            debug!("no value separator after key {key:?}");
            options.insert(key, "");
            break;
        }
        offset += value_sep.len_utf8();

        let terminator = match input[offset..].chars().next() {
            Some(quote @ ('"' | '\'')) => {
                offset += quote.len_utf8();
                quote
            }
            _ => config.pair_sep(),
        };

        let value_end = find_from(input, offset, terminator);
        if value_end == len && terminator != config.pair_sep() {
            debug!("unterminated {terminator} quote in value of key {key:?}");
        }

        let value = &input[offset..value_end];
        trace!("{key:?} => {value:?}");
        options.insert(key, value);

        // May step past `len` when no terminator was found.
        offset = value_end + terminator.len_utf8();
    }

    options
}

/// Parse an option list from UTF-8 bytes using the default separators.
pub fn parse_bytes(input: &[u8]) -> Result<ParsedOptions, Error> {
    parse_bytes_with_config(input, ParseConfig::default())
}

/// Parse an option list from UTF-8 bytes using a specific configuration.
pub fn parse_bytes_with_config(
    input: &[u8],
    config: ParseConfig,
) -> Result<ParsedOptions, Error> {
    let text = std::str::from_utf8(input)?;
    Ok(parse_str_with_config(text, config))
}

/// Parse an option list from a buffered reader using the default separators.
pub fn parse_reader<R: BufRead>(reader: R) -> Result<ParsedOptions, Error> {
    parse_reader_with_config(reader, ParseConfig::default())
}

/// Parse an option list from a buffered reader using a specific configuration.
pub fn parse_reader_with_config<R: BufRead>(
    mut reader: R,
    config: ParseConfig,
) -> Result<ParsedOptions, Error> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    parse_bytes_with_config(&buf, config)
}

fn skip_blanks(input: &str, mut offset: usize) -> usize {
    let bytes = input.as_bytes();
    while offset < bytes.len() && matches!(bytes[offset], b' ' | b'\n') {
        offset += 1;
    }
    offset
}

fn find_from(input: &str, offset: usize, needle: char) -> usize {
    input[offset..]
        .find(needle)
        .map_or(input.len(), |idx| offset + idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(options: &ParsedOptions) -> Vec<(&str, &str)> {
        options
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect()
    }

    #[test]
    fn parses_plain_pairs() {
        let parsed = parse_str("foo=bar bar=baz");
        assert_eq!(pairs(&parsed), vec![("foo", "bar"), ("bar", "baz")]);
    }

    #[test]
    fn quoted_value_keeps_pair_separator() {
        let parsed = parse_str("foo=\"a b\" bar=baz");
        assert_eq!(pairs(&parsed), vec![("foo", "a b"), ("bar", "baz")]);
    }

    #[test]
    fn single_quotes_delimit_values_too() {
        let parsed = parse_str("a='it\"s here' b=2");
        assert_eq!(pairs(&parsed), vec![("a", "it\"s here"), ("b", "2")]);
    }

    #[test]
    fn quote_inside_plain_value_is_literal() {
        let parsed = parse_str("a=x\"y b=1");
        assert_eq!(pairs(&parsed), vec![("a", "x\"y"), ("b", "1")]);
    }

    #[test]
    fn quoted_value_followed_directly_by_key() {
        let parsed = parse_str("a=\"x\"b=2");
        assert_eq!(pairs(&parsed), vec![("a", "x"), ("b", "2")]);
    }

    #[test]
    fn css_preset_parses_declarations() {
        let parsed = parse_css("foo:bar;bar:baz;");
        assert_eq!(pairs(&parsed), vec![("foo", "bar"), ("bar", "baz")]);
        assert_eq!(parsed.config(), ParseConfig::css());
    }

    #[test]
    fn css_values_keep_inner_whitespace() {
        let parsed = parse_css("color: red; margin:0");
        assert_eq!(pairs(&parsed), vec![("color", " red"), ("margin", "0")]);
    }

    #[test]
    fn duplicate_keys_keep_last_value_at_first_position() {
        let parsed = parse_str("a=1 b=2 a=3");
        assert_eq!(pairs(&parsed), vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn key_without_separator_gets_empty_value() {
        let parsed = parse_str("onlykey");
        assert_eq!(pairs(&parsed), vec![("onlykey", "")]);
    }

    #[test]
    fn trailing_key_without_separator_swallows_remainder() {
        let parsed = parse_str("a=1 dangling tail");
        assert_eq!(pairs(&parsed), vec![("a", "1"), ("dangling tail", "")]);
    }

    #[test]
    fn key_may_contain_spaces() {
        let parsed = parse_str("foo bar=baz");
        assert_eq!(pairs(&parsed), vec![("foo bar", "baz")]);
    }

    #[test]
    fn separator_at_end_yields_empty_value() {
        let parsed = parse_str("a=");
        assert_eq!(pairs(&parsed), vec![("a", "")]);
    }

    #[test]
    fn unterminated_quote_runs_to_end() {
        let parsed = parse_str("a=\"never closed b=2");
        assert_eq!(pairs(&parsed), vec![("a", "never closed b=2")]);
    }

    #[test]
    fn skips_spaces_and_newlines_before_keys() {
        let parsed = parse_str("  a=1 \n b=2");
        assert_eq!(pairs(&parsed), vec![("a", "1"), ("b", "2")]);
    }

    #[test]
    fn newline_is_not_a_pair_separator() {
        let parsed = parse_str("a=1\nb=2");
        assert_eq!(pairs(&parsed), vec![("a", "1\nb=2")]);
    }

    #[test]
    fn empty_input_yields_empty_mapping() {
        let parsed = parse_str("");
        assert!(parsed.is_empty());
        assert_eq!(parsed.as_str(), "");
    }

    #[test]
    fn trailing_blanks_after_terminator_yield_empty_key() {
        let parsed = parse_str("a=1  ");
        assert_eq!(pairs(&parsed), vec![("a", "1"), ("", "")]);
    }

    #[test]
    fn single_trailing_separator_is_consumed() {
        let parsed = parse_str("a=1 ");
        assert_eq!(pairs(&parsed), vec![("a", "1")]);
    }

    #[test]
    fn multibyte_separators_are_supported() {
        let config = ParseConfig::new().pair_separator('・').value_separator('→');
        let parsed = parse_str_with_config("名前→太郎・挨拶→こんにちは", config);
        assert_eq!(pairs(&parsed), vec![("名前", "太郎"), ("挨拶", "こんにちは")]);
    }

    #[test]
    fn original_input_is_retained() {
        let input = "  x='1 2'   y=3";
        let parsed = parse_str(input);
        assert_eq!(parsed.as_str(), input);
        assert_eq!(parsed.to_string(), input);
    }

    #[test]
    fn parsing_is_idempotent() {
        let input = "foo=\"a b\" bar=baz foo=x";
        assert_eq!(parse_str(input), parse_str(input));
    }

    #[test]
    fn parse_bytes_rejects_invalid_utf8() {
        let err = parse_bytes(b"a=\xff").expect_err("expected encoding error");
        match err {
            Error::InvalidEncoding(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_reader_with_config_uses_given_separators() {
        let reader = std::io::Cursor::new("a:1;b:2;");
        let parsed =
            parse_reader_with_config(reader, ParseConfig::css()).expect("parse should succeed");
        assert_eq!(parsed.get("a"), Some("1"));
        assert_eq!(parsed.get("b"), Some("2"));
    }
}
