//! Word-frequency aggregation over a batch of review texts.

use std::collections::HashMap;

use serde::Serialize;

/// Punctuation removed before splitting into words.
const STRIPPED_PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ';', ':', '(', ')', '"', '\'', '[', ']', '{', '}',
];

/// A display-ready word and how many times it occurred.
///
/// Serializes as a two-element JSON array: `["Great", 12]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount(pub String, pub usize);

/// Count words across `texts` and return the `limit` most frequent.
///
/// Punctuation in [`STRIPPED_PUNCTUATION`] is deleted (not replaced), text is
/// lowercased and split on whitespace. Words with equal counts keep the order
/// in which they were first seen. Returned words are capitalized.
#[must_use]
pub fn top_words<'a, I>(texts: I, limit: usize) -> Vec<WordCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for text in texts {
        let cleaned: String = text
            .chars()
            .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
            .collect::<String>()
            .to_lowercase();

        for word in cleaned.split_whitespace() {
            if let Some(&slot) = index.get(word) {
                counts[slot].1 += 1;
            } else {
                index.insert(word.to_string(), counts.len());
                counts.push((word.to_string(), 1));
            }
        }
    }

    // Stable sort keeps first-seen order among ties.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);

    counts
        .into_iter()
        .map(|(word, count)| WordCount(capitalize(&word), count))
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
