//! Keyword matching - turning an introduction into channel suggestions.

use std::collections::HashMap;

/// Built-in keyword to channel-name map.
pub const DEFAULT_KEYWORDS: &[(&str, &str)] = &[
    ("hike", "hiking"),
    ("hiking", "hiking"),
    ("outdoors", "hiking"),
    ("climbing", "climbing"),
    ("design", "design"),
    ("designer", "design"),
    ("ux", "design"),
    ("frontend", "frontend"),
    ("react", "frontend"),
    ("javascript", "frontend"),
    ("backend", "backend"),
    ("python", "backend"),
    ("api", "backend"),
    ("data", "data-science"),
    ("analytics", "data-science"),
    ("devops", "devops"),
    ("cloud", "devops"),
    ("aws", "devops"),
    ("marketing", "marketing"),
    ("writing", "content"),
    ("writer", "content"),
    ("research", "research"),
    ("mentor", "mentorship"),
    ("mentoring", "mentorship"),
];

/// A single matched channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// The keyword that triggered the match, lowercased
    pub keyword: String,
    /// Channel name without the leading `#`
    pub channel: String,
}

/// Keyword to channel matcher.
#[derive(Debug, Clone)]
pub struct Suggester {
    keywords: HashMap<String, String>,
}

impl Default for Suggester {
    fn default() -> Self {
        Self::new(
            DEFAULT_KEYWORDS
                .iter()
                .map(|(k, c)| (k.to_string(), c.to_string())),
        )
    }
}

impl Suggester {
    pub fn new(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            keywords: pairs
                .into_iter()
                .map(|(k, c)| (k.to_lowercase(), c.trim_start_matches('#').to_string()))
                .collect(),
        }
    }

    /// Match whole words in `text` against the keyword map.
    ///
    /// Results are deduplicated by channel and keep the order in which the
    /// keywords first appear in the text.
    pub fn suggest(&self, text: &str) -> Vec<Suggestion> {
        let mut found: Vec<Suggestion> = Vec::new();

        for word in words(text) {
            if let Some(channel) = self.keywords.get(&word) {
                if found.iter().all(|s| &s.channel != channel) {
                    found.push(Suggestion {
                        keyword: word,
                        channel: channel.clone(),
                    });
                }
            }
        }

        found
    }
}

/// Lowercased words of `text`. `#`, `<`, `|` and other punctuation are
/// separators, so `#hiking` and `<#C123|hiking>` both yield `hiking`.
fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
        .map(|w| w.trim_matches('-'))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

/// Whether `keyword` can ever match: it must survive `words()` as exactly
/// one word, so phrases and punctuation-only entries are rejected.
pub fn is_matchable(keyword: &str) -> bool {
    let mut split = words(keyword);
    matches!(split.next(), Some(word) if word == keyword.to_lowercase()) && split.next().is_none()
}

/// Render the threaded reply for a non-empty suggestion list.
pub fn reply_text(suggestions: &[Suggestion]) -> String {
    let channels: Vec<String> = suggestions
        .iter()
        .map(|s| format!("#{}", s.channel))
        .collect();

    format!(
        "Thanks for the introduction! Based on what you shared, you might like to join: {}",
        channels.join(", ")
    )
}
