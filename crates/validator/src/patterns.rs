//! Named, fixed regular expressions shared by format validators and
//! coercion modules.
//!
//! All patterns are case-insensitive and accept Cyrillic letters where the
//! format allows free text. Digit and word classes are ASCII only, so a
//! matching `int` or `float` always parses.

use std::sync::LazyLock;

use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern is a valid regex")
}

static DIGITS: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)^[0-9]+$"));

static URL: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)^(http|https)://(([a-zа-яё0-9-]+\.)+([a-zа-яё0-9]{2,})(/.*)?)$")
});

static SHORT_URL: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)^((http|https)://)?(([a-zа-яё0-9-]+\.)+([a-zа-яё0-9]{2,})(/.*)?)$")
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r#"(?i)^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
});

static TEXT_STRING: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"(?i)^[а-яёҐґЄєІіЇї–a-z0-9_\s$#№;:"_.+!*?'\\/\[\]><%@^&=~(),-]*$"#)
});

static FLOAT: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)^[+-]?([0-9]+)([.,][0-9]+)?$"));

static INT: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)^[+-]?[0-9]+$"));

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^((8|\+38)-?)?(\(?[0-9]{3}\)?)?-?[0-9]{3}-?[0-9]{2}-?[0-9]{2}$"));

/// The named patterns known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    Digits,
    Url,
    ShortUrl,
    Email,
    TextString,
    Float,
    Int,
    Phone,
}

impl Pattern {
    /// Every pattern, in declaration order.
    pub const ALL: [Pattern; 8] = [
        Pattern::Digits,
        Pattern::Url,
        Pattern::ShortUrl,
        Pattern::Email,
        Pattern::TextString,
        Pattern::Float,
        Pattern::Int,
        Pattern::Phone,
    ];

    /// Looks a pattern up by the name rule maps use for it.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Name of the pattern.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Digits => "digits",
            Self::Url => "url",
            Self::ShortUrl => "shortURL",
            Self::Email => "email",
            Self::TextString => "textString",
            Self::Float => "float",
            Self::Int => "int",
            Self::Phone => "phone",
        }
    }

    /// The compiled expression.
    #[must_use]
    pub fn regex(self) -> &'static Regex {
        match self {
            Self::Digits => &DIGITS,
            Self::Url => &URL,
            Self::ShortUrl => &SHORT_URL,
            Self::Email => &EMAIL,
            Self::TextString => &TEXT_STRING,
            Self::Float => &FLOAT,
            Self::Int => &INT,
            Self::Phone => &PHONE,
        }
    }

    #[must_use]
    pub fn is_match(self, text: &str) -> bool {
        self.regex().is_match(text)
    }
}
