//! Item-name to pool-label matching cascade.

use super::pool::{ImagePool, PoolEntry};

const MIN_TOKEN_LEN: usize = 4;
const PREFIX_WORDS: usize = 3;
const SHORT_PREFIX_CHARS: usize = 6;
const STRIPPED_SYMBOLS: [char; 5] = ['™', '®', '©', '&', '-'];

/// Which step of the cascade produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Substring,
    TokenOverlap,
    Normalized,
    Prefix,
}

/// Finds an image for `name`, trying each matcher over the whole pool before
/// moving to the next one.
#[must_use]
pub fn find_image<'p>(name: &str, pool: &'p ImagePool) -> Option<(&'p PoolEntry, MatchKind)> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let entries = pool.entries();

    MatchKind::CASCADE.iter().find_map(|kind| {
        entries
            .iter()
            .find(|entry| kind.matches(name, &entry.label))
            .map(|entry| (entry, *kind))
    })
}

impl MatchKind {
    const CASCADE: [MatchKind; 5] = [
        MatchKind::Exact,
        MatchKind::Substring,
        MatchKind::TokenOverlap,
        MatchKind::Normalized,
        MatchKind::Prefix,
    ];

    fn matches(self, name: &str, label: &str) -> bool {
        match self {
            MatchKind::Exact => label.to_lowercase() == name.to_lowercase(),
            MatchKind::Substring => substring_either(&label.to_lowercase(), &name.to_lowercase()),
            MatchKind::TokenOverlap => tokens_overlap(name, label),
            MatchKind::Normalized => substring_either(&normalize(label), &normalize(name)),
            MatchKind::Prefix => prefix_matches(name, label),
        }
    }
}

fn substring_either(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

fn long_tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
        .map(str::to_lowercase)
        .collect()
}

/// Shared long tokens must number at least `min(2, item tokens)`.
fn tokens_overlap(name: &str, label: &str) -> bool {
    let item_tokens = long_tokens(name);
    if item_tokens.is_empty() {
        return false;
    }
    let label_tokens = long_tokens(label);
    let shared = item_tokens.iter().filter(|t| label_tokens.contains(t)).count();
    shared >= item_tokens.len().min(2)
}

fn normalize(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| !STRIPPED_SYMBOLS.contains(c))
        .collect();
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// First three words of the name, or its first six characters when it has
/// fewer words, found in the label.
fn prefix_matches(name: &str, label: &str) -> bool {
    let words: Vec<&str> = name.split_whitespace().collect();
    let prefix = if words.len() >= PREFIX_WORDS {
        words[..PREFIX_WORDS].join(" ")
    } else {
        name.chars().take(SHORT_PREFIX_CHARS).collect()
    };
    let prefix = prefix.to_lowercase();
    !prefix.is_empty() && label.to_lowercase().contains(&prefix)
}
