//! Reply post-processing: PII scrub, tone softening, length cap and polite
//! sentence endings, applied in that order.

use regex::Regex;

use intune_types::ConfigError;

use super::traits::Sanitizer;

/// Maximum reply length in characters.
pub const MAX_REPLY_CHARS: usize = 500;

const ELLIPSIS: &str = "...";

/// Ordered PII rules. Broad rules come last so specific ones claim their
/// matches first.
const PII_RULES: &[(&str, &str)] = &[
    (r"\d{3}-\d{4}-\d{4}", "[전화번호]"),
    (r"\d{6}-\d{7}", "[주민번호]"),
    (r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}", "[이메일]"),
    (r"\d{5,}", "[번호]"),
];

const SOFTENING: &[(&str, &str)] = &[
    ("절대", "가능하면"),
    ("반드시", "되도록"),
    ("틀렸", "다르게 생각해볼 수 있"),
    ("안돼", "어려울 수 있어"),
];

const POLITE_ENDINGS: &[&str] = &["요", "까요?", "네요", "어요"];

/// The default [`Sanitizer`].
#[derive(Debug, Clone)]
pub struct TextSanitizer {
    pii: Vec<(Regex, &'static str)>,
}

impl TextSanitizer {
    pub fn new() -> Result<Self, ConfigError> {
        let pii = PII_RULES
            .iter()
            .map(|(pattern, placeholder)| {
                Regex::new(pattern)
                    .map(|re| (re, *placeholder))
                    .map_err(|e| ConfigError::InvalidLexicon {
                        reason: format!("bad PII pattern {pattern:?}: {e}"),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { pii })
    }

    fn scrub_pii(&self, text: &str) -> String {
        self.pii
            .iter()
            .fold(text.to_string(), |acc, (re, placeholder)| {
                re.replace_all(&acc, *placeholder).into_owned()
            })
    }
}

impl Sanitizer for TextSanitizer {
    fn sanitize(&self, text: &str) -> String {
        let scrubbed = self.scrub_pii(text);
        let softened = soften(&scrubbed);
        let capped = truncate(softened);
        polite_ending(capped)
    }
}

fn soften(text: &str) -> String {
    SOFTENING
        .iter()
        .fold(text.to_string(), |acc, (harsh, gentle)| acc.replace(harsh, gentle))
}

fn truncate(text: String) -> String {
    if text.chars().count() <= MAX_REPLY_CHARS {
        return text;
    }
    let keep = MAX_REPLY_CHARS - ELLIPSIS.len();
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Turn a bare trailing `.` into `요.`.
///
/// A trailing `요.` already counts as polite. Text at the length cap, which
/// includes every truncated reply, is left alone so the cap holds.
fn polite_ending(text: String) -> String {
    let body = text.strip_suffix('.').unwrap_or(&text);
    let already_polite = POLITE_ENDINGS.iter().any(|e| body.ends_with(e) || text.ends_with(e));
    if already_polite || !text.ends_with('.') || text.chars().count() >= MAX_REPLY_CHARS {
        return text;
    }
    let mut out = body.to_string();
    out.push_str("요.");
    out
}
