//! Emoji aggregation: per-party emoji frequency and the two-party top-10
//! comparison.
//!
//! Text is segmented into extended grapheme clusters so multi-codepoint
//! sequences (flags, skin-tone modifiers, ZWJ families) count as one unit.
//! A cluster qualifies when it contains at least one emoji-classified
//! character; the colored puzzle-grid squares that fill game-result
//! screenshots are blocklisted outright.

use std::collections::{BTreeMap, HashMap};

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::Result;
use crate::ingest::{MessageTable, PARTICIPANTS};
use crate::models::{ComparisonTable, PairedCount};

/// Non-semantic symbols excluded from the emoji counts: the colored squares
/// of shared puzzle-game result grids.
const BLOCKLIST: &[&str] = &[
    "\u{2B1B}", // black large square
    "\u{2B1C}", // white large square
    "🟥", "🟧", "🟨", "🟩", "🟦", "🟪", "🟫",
];

/// Chart slice size for the comparison table.
const TOP_N: usize = 10;

/// Detects emoji grapheme clusters in message text.
pub struct EmojiScanner {
    emoji_char: Regex,
}

impl EmojiScanner {
    /// Compile the emoji character class.
    pub fn new() -> Result<Self> {
        // \p{Emoji} alone also covers ASCII digits, '#' and '*', so the
        // ASCII range is subtracted from the class.
        let emoji_char = Regex::new(r"[\p{Emoji}--[\x00-\x7F]]")?;
        Ok(Self { emoji_char })
    }

    /// Emoji grapheme clusters of a text fragment, in order of appearance.
    pub fn clusters<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        text.graphemes(true).filter(move |cluster| {
            !cluster.trim().is_empty()
                && !BLOCKLIST.contains(cluster)
                && self.emoji_char.is_match(cluster)
        })
    }

    /// Two-party emoji frequency comparison.
    ///
    /// The parties' counts are outer-joined on the cluster: an emoji used by
    /// only one side keeps a zero for the other. `top` is the combined-count
    /// top-10 slice used by the grouped bar chart; `rows` is the full join
    /// for the data table.
    #[must_use]
    pub fn compare(&self, table: &MessageTable) -> ComparisonTable {
        let mut joined: BTreeMap<String, [u64; 2]> = BTreeMap::new();
        for (idx, _) in PARTICIPANTS.iter().enumerate() {
            for (cluster, count) in self.party_counts(table, idx) {
                joined.entry(cluster).or_default()[idx] = count;
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

    fn party_counts(&self, table: &MessageTable, idx: usize) -> HashMap<String, u64> {
        let mut counts = HashMap::new();
        for message in table.messages() {
            if message.party != PARTICIPANTS[idx] {
                continue;
            }
            let Some(text) = &message.text else {
                continue;
            };
            for cluster in self.clusters(text) {
                *counts.entry(cluster.to_string()).or_insert(0) += 1;
            }
        }
        counts
    }
}
