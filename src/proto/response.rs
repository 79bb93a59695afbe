use std::str;

use super::{ProtoError, Result};

/// Prompt emitted by the device in front of every answer.
const PROMPT: char = '>';

/// Decode the raw bytes of one exchange.
///
/// Returns `None` when nothing arrived. Otherwise all leading prompt
/// characters and all trailing line terminators are removed.
pub fn normalize_response(raw: &[u8]) -> Result<Option<String>> {
    let text = str::from_utf8(raw)?;
    if text.is_empty() {
        return Ok(None);
    }
    let text = text
        .trim_start_matches(PROMPT)
        .trim_end_matches(['\n', '\r']);
    Ok(Some(text.to_string()))
}

/// Strip a trailing unit suffix and parse the remainder as a float.
///
/// The suffix is optional, the device sometimes omits it.
pub fn strip_unit_and_parse(text: &str, unit: &str) -> Result<f64> {
    let value = text.strip_suffix(unit).unwrap_or(text).trim();
    value
        .parse::<f64>()
        .map_err(|_| ProtoError::MalformedNumber(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_response(b"").unwrap(), None);
    }

    #[test]
    fn test_normalize_prompt_and_newline() {
        assert_eq!(
            normalize_response(b">test\n").unwrap().as_deref(),
            Some("test")
        );
    }

    #[test]
    fn test_normalize_repeated_framing() {
        assert_eq!(
            normalize_response(b">>1.5V\r\n").unwrap().as_deref(),
            Some("1.5V")
        );
    }

    #[test]
    fn test_normalize_bare_prompt() {
        assert_eq!(normalize_response(b">\n").unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_normalize_invalid_utf8() {
        assert!(matches!(
            normalize_response(&[b'>', 0xff, 0xfe, b'\n']),
            Err(ProtoError::Decode(_))
        ));
    }

    #[test]
    fn test_parse_with_unit() {
        assert_eq!(strip_unit_and_parse("0.789A", "A").unwrap(), 0.789);
        assert_eq!(strip_unit_and_parse("200.4OHM", "OHM").unwrap(), 200.4);
    }

    #[test]
    fn test_parse_without_unit() {
        assert_eq!(strip_unit_and_parse("10.2", "A").unwrap(), 10.2);
    }

    #[test]
    fn test_parse_malformed() {
        match strip_unit_and_parse("ERR", "V") {
            Err(ProtoError::MalformedNumber(text)) => assert_eq!(text, "ERR"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(strip_unit_and_parse("", "V").is_err());
        assert!(strip_unit_and_parse("1.2W", "V").is_err());
    }
}
