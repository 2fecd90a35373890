//! N-gram aggregation: contiguous token-sequence frequencies per party with
//! stop-word filtering, outer-joined for the comparison chart.

use std::collections::{BTreeMap, HashMap, HashSet};

use regex::Regex;

use crate::error::Result;
use crate::ingest::{MessageTable, PARTICIPANTS};
use crate::models::{ComparisonTable, PairedCount};

/// Supported window sizes; requests outside this range are clamped.
pub const NGRAM_RANGE: std::ops::RangeInclusive<usize> = 1..=5;

/// Chart slice size for the comparison table.
const TOP_N: usize = 10;

/// Builds stop-word-filtered n-gram frequency tables.
pub struct NgramCounter {
    strip: Regex,
}

impl NgramCounter {
    /// Compile the token-stripping class.
    pub fn new() -> Result<Self> {
        let strip = Regex::new(r"[^\w\s]")?;
        Ok(Self { strip })
    }

    /// Two-party n-gram frequency comparison for windows of `n` tokens,
    /// dropping any token in `stop_words` before windows are formed.
    ///
    /// Removing a stop word closes the gap: tokens separated only by removed
    /// stop words become adjacent. A party whose filtered stream holds fewer
    /// than `n` tokens contributes no windows; the join proceeds with the
    /// other party's entries alone.
    #[must_use]
    pub fn compare(&self, table: &MessageTable, n: usize, stop_words: &[String]) -> ComparisonTable {
        let n = n.clamp(*NGRAM_RANGE.start(), *NGRAM_RANGE.end());
        let stop: HashSet<&str> = stop_words.iter().map(String::as_str).collect();

        let mut joined: BTreeMap<String, [u64; 2]> = BTreeMap::new();
        for (idx, party) in PARTICIPANTS.iter().enumerate() {
            let corpus = table
                .messages()
                .iter()
                .filter(|m| m.party == *party)
                .filter_map(|m| m.text.as_deref())
                .collect::<Vec<_>>()
                .join(" ");
            let stream = self.filtered_tokens(&corpus, &stop);

            let mut counts: HashMap<String, u64> = HashMap::new();
            for window in stream.windows(n) {
                *counts.entry(window.join(" ")).or_insert(0) += 1;
            }
            for (key, count) in counts {
                joined.entry(key).or_default()[idx] = count;
            }
        }

        let mut rows: Vec<PairedCount> = joined
            .into_iter()
            .map(|(key, counts)| PairedCount { key, counts })
            .collect();
        rows.sort_by(|a, b| {
            let total_a: u64 = a.counts.iter().sum();
            let total_b: u64 = b.counts.iter().sum();
            total_b.cmp(&total_a).then_with(|| a.key.cmp(&b.key))
        });
        let top = rows.iter().take(TOP_N).cloned().collect();

        ComparisonTable {
            parties: [
                table.labels().label(PARTICIPANTS[0]).to_string(),
                table.labels().label(PARTICIPANTS[1]).to_string(),
            ],
            rows,
            top,
        }
    }

    /// The stop-word-filtered token stream of a corpus.
    ///
    /// Two passes: lower-case whitespace tokens are stripped of everything
    /// outside letters/digits/whitespace and checked against the stop list,
    /// then the survivors are re-joined and re-tokenized. A token emptied by
    /// stripping disappears, and window adjacency is computed on the
    /// filtered stream, not the original one.
    fn filtered_tokens(&self, corpus: &str, stop: &HashSet<&str>) -> Vec<String> {
        let kept: Vec<String> = corpus
            .split_whitespace()
            .map(|token| self.strip.replace_all(&token.to_lowercase(), "").into_owned())
            .filter(|token| !token.is_empty() && !stop.contains(token.as_str()))
            .collect();
        kept.join(" ")
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Message, Party, PartyLabels};
    use chrono::NaiveDateTime;

    fn counter() -> NgramCounter {
        NgramCounter::new().unwrap()
    }

    fn msg(party: Party, text: &str) -> Message {
        let ts = NaiveDateTime::parse_from_str("2023-01-01 08:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        Message::new(ts, party, Some(text.to_string()))
    }

    fn table(messages: Vec<Message>) -> MessageTable {
        MessageTable::from_messages(
            messages,
            PartyLabels {
                incoming: "A".to_string(),
                outgoing: "B".to_string(),
            },
        )
    }

    fn stops(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| (*w).to_string()).collect()
    }

    #[test]
    fn test_unigram_stop_word_filtering() {
        let c = counter();
        let t = table(vec![msg(Party::Incoming, "word hunt is fun")]);
        let cmp = c.compare(&t, 1, &stops(&["word", "hunt"]));
        let keys: Vec<&str> = cmp.rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["fun", "is"]);
        assert!(cmp.rows.iter().all(|r| r.counts == [1, 0]));
    }

    #[test]
    fn test_stop_word_removal_closes_the_gap() {
        let c = counter();
        let t = table(vec![msg(Party::Incoming, "apple the banana")]);
        let cmp = c.compare(&t, 2, &stops(&["the"]));
        assert_eq!(cmp.rows.len(), 1);
        assert_eq!(cmp.rows[0].key, "apple banana");
        assert_eq!(cmp.rows[0].counts, [1, 0]);
    }

    #[test]
    fn test_punctuation_stripped_and_emptied_tokens_dropped() {
        let c = counter();
        // "!!" strips to nothing and must not leave a hole either
        let t = table(vec![msg(Party::Incoming, "nice!! !! one, right?")]);
        let cmp = c.compare(&t, 2, &[]);
        let keys: Vec<&str> = cmp.rows.iter().map(|r| r.key.as_str()).collect();
        assert!(keys.contains(&"nice one"));
        assert!(keys.contains(&"one right"));
    }

    #[test]
    fn test_short_stream_contributes_nothing() {
        let c = counter();
        let t = table(vec![
            msg(Party::Incoming, "hi"),
            msg(Party::Outgoing, "good morning to you"),
        ]);
        let cmp = c.compare(&t, 3, &[]);
        // Party A has a single token, so only B's trigrams appear
        assert!(cmp.rows.iter().all(|r| r.counts[0] == 0));
        assert!(cmp
            .rows
            .iter()
            .any(|r| r.key == "good morning to" && r.counts == [0, 1]));
    }

    #[test]
    fn test_windows_span_message_boundaries_per_party() {
        let c = counter();
        let t = table(vec![
            msg(Party::Incoming, "see you"),
            msg(Party::Incoming, "tomorrow"),
        ]);
        let cmp = c.compare(&t, 2, &[]);
        let keys: Vec<&str> = cmp.rows.iter().map(|r| r.key.as_str()).collect();
        assert!(keys.contains(&"you tomorrow"));
    }

    #[test]
    fn test_n_is_clamped() {
        let c = counter();
        let t = table(vec![msg(Party::Incoming, "a b c d e f g")]);
        let cmp = c.compare(&t, 99, &[]);
        // Clamped to 5-grams
        assert!(cmp.rows.iter().any(|r| r.key == "a b c d e"));
    }
}
