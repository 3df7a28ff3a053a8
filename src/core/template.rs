//! Output template mini-language
//!
//! A template is plain text with `#`-prefixed placeholders:
//!
//! | placeholder | output |
//! |---|---|
//! | `#s` `#m` `#h` | seconds, minutes, hours (two digits) |
//! | `#d` `#M` | day of month, month counted from zero (two digits) |
//! | `#y` | calendar year |
//! | `#l` | level name, e.g. `INFO` |
//! | `#n` | logger name, empty when unnamed |
//! | `#{` `#}` | open the level's default style / reset styling |
//! | `#t` | the message text |
//!
//! Any other character after `#` is kept verbatim together with the `#`.
//! The message is inserted as-is and never scanned for placeholders, so user
//! supplied text cannot inject directives.
//!
//! # Example
//!
//! ```
//! use chrono::{Local, TimeZone};
//! use queued_template_logger::core::template::{RenderContext, Template};
//! use queued_template_logger::LogLevel;
//!
//! let time = Local.with_ymd_and_hms(2024, 3, 15, 13, 5, 9).single().unwrap();
//! let template = Template::parse("#h:#m:#s #t");
//! let ctx = RenderContext::new(LogLevel::Info, time, "hello");
//! assert_eq!(template.render(&ctx, 1024), "13:05:09 hello");
//! ```

use super::bounded::BoundedString;
use super::log_level::{LogLevel, STYLE_RESET};
use chrono::{DateTime, Datelike, Local, Timelike};
use std::fmt::Write;

const SIGIL: char = '#';

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Seconds,
    Minutes,
    Hours,
    Day,
    Month,
    Year,
    LevelName,
    LoggerName,
    StyleOpen,
    StyleReset,
    Message,
}

/// Everything a template may draw on when rendered
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub level: LogLevel,
    pub time: DateTime<Local>,
    pub message: &'a str,
    pub logger_name: Option<&'a str>,
}

impl<'a> RenderContext<'a> {
    pub fn new(level: LogLevel, time: DateTime<Local>, message: &'a str) -> Self {
        Self {
            level,
            time,
            message,
            logger_name: None,
        }
    }

    #[must_use]
    pub fn with_logger_name(mut self, name: Option<&'a str>) -> Self {
        self.logger_name = name;
        self
    }
}

/// A template compiled into a token list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    tokens: Vec<Token>,
}

impl Template {
    /// Compile `source` in a single left-to-right scan. Never fails: unknown
    /// specifiers become literal text.
    pub fn parse(source: &str) -> Self {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars();

        while let Some(c) = chars.next() {
            if c != SIGIL {
                literal.push(c);
                continue;
            }

            let token = match chars.next() {
                Some('s') => Token::Seconds,
                Some('m') => Token::Minutes,
                Some('h') => Token::Hours,
                Some('d') => Token::Day,
                Some('M') => Token::Month,
                Some('y') => Token::Year,
                Some('l') => Token::LevelName,
                Some('n') => Token::LoggerName,
                Some('{') => Token::StyleOpen,
                Some('}') => Token::StyleReset,
                Some('t') => Token::Message,
                Some(other) => {
                    literal.push(SIGIL);
                    literal.push(other);
                    continue;
                }
                None => {
                    literal.push(SIGIL);
                    continue;
                }
            };

            if !literal.is_empty() {
                tokens.push(Token::Literal(std::mem::take(&mut literal)));
            }
            tokens.push(token);
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Self {
            source: source.to_string(),
            tokens,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render into at most `capacity` bytes.
    ///
    /// Every placeholder other than `#t` is resolved first; the message is
    /// spliced into the finished frame afterwards.
    pub fn render(&self, ctx: &RenderContext<'_>, capacity: usize) -> String {
        let mut out = BoundedString::new(capacity);
        for piece in self.resolve_frame(ctx) {
            match piece {
                Some(text) => out.push_str(&text),
                None => out.push_str(ctx.message),
            };
            if out.is_truncated() {
                break;
            }
        }
        out.into_string()
    }

    /// Resolve all non-message tokens; `None` marks a message slot.
    fn resolve_frame(&self, ctx: &RenderContext<'_>) -> Vec<Option<String>> {
        self.tokens
            .iter()
            .map(|token| {
                let mut s = String::new();
                // Writing into a String cannot fail.
                let _ = match token {
                    Token::Literal(text) => return Some(text.clone()),
                    Token::Message => return None,
                    Token::Seconds => write!(s, "{:02}", ctx.time.second()),
                    Token::Minutes => write!(s, "{:02}", ctx.time.minute()),
                    Token::Hours => write!(s, "{:02}", ctx.time.hour()),
                    Token::Day => write!(s, "{:02}", ctx.time.day()),
                    Token::Month => write!(s, "{:02}", ctx.time.month0()),
                    Token::Year => write!(s, "{}", ctx.time.year()),
                    Token::LevelName => s.write_str(ctx.level.to_str()),
                    Token::LoggerName => s.write_str(ctx.logger_name.unwrap_or_default()),
                    Token::StyleOpen => s.write_str(ctx.level.style_code()),
                    Token::StyleReset => s.write_str(STYLE_RESET),
                };
                Some(s)
            })
            .collect()
    }
}

/// One-shot render of a raw template string
pub fn render(template: &str, ctx: &RenderContext<'_>, capacity: usize) -> String {
    Template::parse(template).render(ctx, capacity)
}

/// Compiled templates for every level
#[derive(Debug, Clone)]
pub struct TemplateSet {
    templates: [Template; LogLevel::COUNT],
}

impl TemplateSet {
    pub fn new(templates: [Template; LogLevel::COUNT]) -> Self {
        Self { templates }
    }

    pub fn get(&self, level: LogLevel) -> &Template {
        &self.templates[level.index()]
    }
}
