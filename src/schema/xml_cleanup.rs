//! XML cleanup for autopilot schema preprocessing
//!
//! Real-world schema files routinely contain unescaped special characters in
//! free-text description fields, which breaks strict XML parsers:
//! - bare `&` characters that are not part of a recognized entity
//! - stray `<` inside attribute-value strings
//!
//! This module provides low-level cleanup without parsing. Well-formed input
//! passes through unchanged.

/// Escape a bare `&` / stray `<` so the document parses as XML.
///
/// Returns the cleaned schema text ready for parsing.
pub fn clean_schema_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    // Quote state only matters inside a tag; `<` in element text is assumed
    // to open a tag, matching how the original recordings are written.
    let mut in_tag = false;
    let mut quote: Option<char> = None;

    let mut chars = text.char_indices();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '&' if !is_entity_start(&text[idx + 1..]) => {
                result.push_str("&amp;");
            }
            '"' | '\'' if in_tag => {
                match quote {
                    Some(q) if q == ch => quote = None,
                    None => quote = Some(ch),
                    _ => {}
                }
                result.push(ch);
            }
            '<' if quote.is_some() => {
                // Attribute values must not contain raw '<'
                result.push_str("&lt;");
            }
            '<' => {
                in_tag = true;
                result.push(ch);
            }
            '>' if quote.is_none() => {
                in_tag = false;
                result.push(ch);
            }
            _ => {
                result.push(ch);
            }
        }
    }

    result
}

/// Whether `rest` begins with the tail of a recognized entity reference,
/// i.e. `[a-zA-Z0-9#][a-zA-Z0-9]*;`.
fn is_entity_start(rest: &str) -> bool {
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphanumeric() || c == '#' => {}
        _ => return false,
    }
    for c in chars {
        if c == ';' {
            return true;
        }
        if !c.is_ascii_alphanumeric() {
            return false;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_bare_ampersands() {
        let input = r#"<field NAME="x">pitch & roll</field>"#;
        let cleaned = clean_schema_text(input);
        assert!(cleaned.contains("pitch &amp; roll"));
    }

    #[test]
    fn keeps_recognized_entities() {
        let input = "<d>a &amp; b &#38; c &lt;= d</d>";
        assert_eq!(clean_schema_text(input), input);
    }

    #[test]
    fn escapes_angle_bracket_in_attribute_value() {
        let input = r#"<field NAME="thr" UNIT="x<y"/>"#;
        let cleaned = clean_schema_text(input);
        assert!(cleaned.contains("x&lt;y"));
        assert!(cleaned.starts_with("<field"));
    }

    #[test]
    fn well_formed_input_is_unchanged() {
        let input = r#"<protocol><msg_class NAME="telemetry"><message NAME="GPS" ID="8"><field NAME="lat" TYPE="float"/></message></msg_class></protocol>"#;
        assert_eq!(clean_schema_text(input), input);
    }

    #[test]
    fn cleaned_output_parses() {
        let input = r#"<protocol><field NAME="v" UNIT="a<b">volts & amps</field></protocol>"#;
        let cleaned = clean_schema_text(input);
        assert!(roxmltree::Document::parse(&cleaned).is_ok());
    }
}
