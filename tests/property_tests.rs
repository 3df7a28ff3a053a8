//! Property-based tests for queued_template_logger using proptest

use chrono::{Local, TimeZone};
use proptest::prelude::*;
use queued_template_logger::core::template::{render, RenderContext, Template};
use queued_template_logger::prelude::*;
use queued_template_logger::BoundedString;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Trace),
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
    ]
}

fn fixed_context(level: LogLevel, message: &str) -> RenderContext<'_> {
    let time = Local
        .with_ymd_and_hms(2024, 3, 15, 13, 5, 9)
        .single()
        .expect("valid local datetime");
    RenderContext::new(level, time, message)
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Level names parse back to the same level
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Numeric conversion agrees with ordering
    #[test]
    fn test_log_level_ordering(a in any_level(), b in any_level()) {
        prop_assert_eq!(a < b, (a as u8) < (b as u8));
        prop_assert_eq!(LogLevel::try_from(a as u8).unwrap(), a);
    }

    /// Out-of-range numeric levels are configuration errors
    #[test]
    fn test_log_level_invalid_u8(value in 6u8..=u8::MAX) {
        let result = LogLevel::try_from(value);
        let is_invalid_config = matches!(result, Err(LoggerError::InvalidConfiguration { .. }));
        prop_assert!(is_invalid_config);
    }
}

// ============================================================================
// Renderer Tests
// ============================================================================

proptest! {
    /// Rendered output never exceeds the capacity
    #[test]
    fn test_render_respects_capacity(
        template in "[#a-zA-Z0-9{} :]{0,40}",
        message in ".{0,80}",
        capacity in 0usize..64,
        level in any_level(),
    ) {
        let out = render(&template, &fixed_context(level, &message), capacity);
        prop_assert!(out.len() <= capacity);
    }

    /// Text without a sigil is reproduced verbatim
    #[test]
    fn test_plain_text_verbatim(text in "[^#]{0,60}", level in any_level()) {
        let out = render(&text, &fixed_context(level, "unused"), 1024);
        prop_assert_eq!(out, text);
    }

    /// The message is inserted exactly as given, directives included
    #[test]
    fn test_message_not_rescanned(message in "[#a-zA-Z{} ]{0,40}", level in any_level()) {
        let template = Template::parse("<#t>");
        let out = template.render(&fixed_context(level, &message), 1024);
        prop_assert_eq!(out, format!("<{}>", message));
    }

    /// Parsing never loses the source text
    #[test]
    fn test_parse_keeps_source(source in ".{0,60}") {
        let template = Template::parse(&source);
        prop_assert_eq!(template.source(), source.as_str());
    }

    /// Every #t receives the full message
    #[test]
    fn test_repeated_message_placeholder(message in "[a-z]{0,16}") {
        let out = render("#t|#t", &fixed_context(LogLevel::Info, &message), 1024);
        prop_assert_eq!(out, format!("{0}|{0}", message));
    }
}

// ============================================================================
// Bounded Buffer Tests
// ============================================================================

proptest! {
    /// Appends never exceed the capacity and always end on a char boundary
    #[test]
    fn test_bounded_string_capacity(
        pieces in prop::collection::vec(".{0,20}", 0..10),
        capacity in 0usize..64,
    ) {
        let mut buf = BoundedString::new(capacity);
        for piece in &pieces {
            buf.push_str(piece);
        }
        let joined: String = pieces.concat();
        prop_assert_eq!(buf.is_truncated(), joined.len() > capacity);

        let out = buf.into_string();
        prop_assert!(out.len() <= capacity);
        prop_assert!(joined.starts_with(&out));
    }
}
