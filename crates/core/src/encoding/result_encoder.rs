//! Compact JSON payloads returned across the bridge boundary.
//!
//! Escaping works on raw bytes: only ASCII control characters, quotes and
//! backslashes are rewritten.

use crate::session::inference_session::InferenceResult;
use crate::shared::errors::BridgeError;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Appends `input` to `out` with JSON string escaping applied.
pub fn escape_into(input: &str, out: &mut String) {
    let bytes = input.as_bytes();
    // Every escaped byte is ASCII, so `run_start..i` always lands on char boundaries.
    let mut run_start = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        let short = match byte {
            b'"' => "\\\"",
            b'\\' => "\\\\",
            0x08 => "\\b",
            0x0C => "\\f",
            b'\n' => "\\n",
            b'\r' => "\\r",
            b'\t' => "\\t",
            0x00..=0x1F => "",
            _ => continue,
        };
        out.push_str(&input[run_start..i]);
        run_start = i + 1;
        if short.is_empty() {
            out.push_str("\\u00");
            out.push(HEX_DIGITS[(byte >> 4) as usize] as char);
            out.push(HEX_DIGITS[(byte & 0x0F) as usize] as char);
        } else {
            out.push_str(short);
        }
    }
    out.push_str(&input[run_start..]);
}

/// `{"transcript":…,"translation":…,"language":…}`
pub fn encode_result(result: &InferenceResult) -> String {
    let mut json = String::from("{\"transcript\":\"");
    escape_into(&result.transcript, &mut json);
    json.push_str("\",\"translation\":\"");
    escape_into(&result.translation, &mut json);
    json.push_str("\",\"language\":\"");
    escape_into(&result.language, &mut json);
    json.push_str("\"}");
    json
}

/// `{"error":"<code>"}`
pub fn encode_error(error: BridgeError) -> String {
    let mut json = String::from("{\"error\":\"");
    escape_into(error.code(), &mut json);
    json.push_str("\"}");
    json
}

pub fn encode(outcome: Result<InferenceResult, BridgeError>) -> String {
    match outcome {
        Ok(result) => encode_result(&result),
        Err(error) => encode_error(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn escape(input: &str) -> String {
        let mut out = String::new();
        escape_into(input, &mut out);
        out
    }

    fn result(transcript: &str, translation: &str, language: &str) -> InferenceResult {
        InferenceResult {
            transcript: transcript.to_string(),
            translation: translation.to_string(),
            language: language.to_string(),
        }
    }

    #[test]
    fn test_printable_ascii_unchanged() {
        let printable: String = (0x20u8..0x7F)
            .map(|b| b as char)
            .filter(|c| *c != '"' && *c != '\\')
            .collect();
        assert_eq!(escape(&printable), printable);
    }

    #[rstest]
    #[case::quote("a\"b", "a\\\"b")]
    #[case::backslash("a\\b", "a\\\\b")]
    #[case::backspace("\u{08}", "\\b")]
    #[case::form_feed("\u{0C}", "\\f")]
    #[case::newline("line\nbreak", "line\\nbreak")]
    #[case::carriage_return("\r", "\\r")]
    #[case::tab("\t", "\\t")]
    #[case::soh("\u{01}", "\\u0001")]
    #[case::nul("\u{00}", "\\u0000")]
    #[case::unit_separator("\u{1F}", "\\u001f")]
    #[case::escape_char("\u{1B}", "\\u001b")]
    #[case::delete_passes_through("\u{7F}", "\u{7F}")]
    #[case::empty("", "")]
    fn test_escape(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape(input), expected);
    }

    #[test]
    fn test_multibyte_passes_through() {
        assert_eq!(escape("héllo 世界\n"), "héllo 世界\\n");
    }

    #[test]
    fn test_escape_into_appends() {
        let mut out = String::from("prefix:");
        escape_into("\"x\"", &mut out);
        assert_eq!(out, "prefix:\\\"x\\\"");
    }

    #[test]
    fn test_encode_result_field_order() {
        let json = encode_result(&result(" Hello.", " Hello.", "en"));
        assert_eq!(
            json,
            r#"{"transcript":" Hello.","translation":" Hello.","language":"en"}"#
        );
    }

    #[test]
    fn test_encode_result_empty_fields_present() {
        let json = encode_result(&result("", "", ""));
        assert_eq!(json, r#"{"transcript":"","translation":"","language":""}"#);
    }

    #[test]
    fn test_encode_result_escapes_values() {
        let json = encode_result(&result("say \"hi\"\n", "a\\b", "\u{01}"));
        assert_eq!(
            json,
            r#"{"transcript":"say \"hi\"\n","translation":"a\\b","language":"\u0001"}"#
        );
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["transcript"], "say \"hi\"\n");
        assert_eq!(parsed["translation"], "a\\b");
        assert_eq!(parsed["language"], "\u{01}");
    }

    #[rstest]
    #[case(BridgeError::ContextNotInitialized, r#"{"error":"context_not_initialized"}"#)]
    #[case(BridgeError::EmptyAudio, r#"{"error":"empty_audio"}"#)]
    #[case(BridgeError::InferenceFailed, r#"{"error":"inference_failed"}"#)]
    fn test_encode_error(#[case] error: BridgeError, #[case] expected: &str) {
        assert_eq!(encode_error(error), expected);
        assert_eq!(encode(Err(error)), expected);
    }

    #[test]
    fn test_encode_ok_delegates_to_result() {
        let r = result("a", "a", "fr");
        assert_eq!(encode(Ok(r.clone())), encode_result(&r));
    }
}
