//! Lexical aggregation: word frequencies, message-length distributions and
//! the fixed "word hunt" keyword count.
//!
//! Tokenization here is deliberately naive whitespace splitting; punctuation
//! survives attached to its token. The n-gram aggregator applies its own,
//! stricter filtering.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::ingest::{MessageTable, PARTICIPANTS};
use crate::models::{DailyWords, LengthCount, Party, WordCount};

/// Per-party word frequencies over all non-null text, sorted by count
/// descending (ties by word, then party, for deterministic output).
#[must_use]
pub fn word_frequencies(table: &MessageTable) -> Vec<WordCount> {
    let mut counts: HashMap<(usize, String), u64> = HashMap::new();
    for message in table.messages() {
        let Some(idx) = participant_index(message.party) else {
            continue;
        };
        let Some(text) = &message.text else {
            continue;
        };
        for token in tokens(text) {
            *counts.entry((idx, token)).or_insert(0) += 1;
        }
    }

    let mut rows: Vec<WordCount> = counts
        .into_iter()
        .map(|((idx, word), count)| WordCount {
            party: table.labels().label(PARTICIPANTS[idx]).to_string(),
            word,
            count,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.word.cmp(&b.word))
            .then_with(|| a.party.cmp(&b.party))
    });
    rows
}

/// Histogram of message lengths (in whitespace tokens) per party.
///
/// Notification rows and zero-length messages are excluded; the chart clamps
/// its display range, the data is complete.
#[must_use]
pub fn message_length_distribution(table: &MessageTable) -> Vec<LengthCount> {
    let mut counts: HashMap<(usize, usize), u64> = HashMap::new();
    for (idx, length) in message_lengths(table) {
        *counts.entry((idx, length)).or_insert(0) += 1;
    }

    let mut rows: Vec<LengthCount> = counts
        .into_iter()
        .map(|((idx, length), count)| LengthCount {
            party: table.labels().label(PARTICIPANTS[idx]).to_string(),
            length,
            count,
        })
        .collect();
    rows.sort_by(|a, b| a.party.cmp(&b.party).then_with(|| a.length.cmp(&b.length)));
    rows
}

/// Total words sent per (day, party), for the "words sent per day"
/// histogram. Uses the same message filter as the length distribution.
#[must_use]
pub fn daily_words_distribution(table: &MessageTable) -> Vec<DailyWords> {
    let mut totals: HashMap<(usize, NaiveDate), u64> = HashMap::new();
    for (message, (idx, length)) in table
        .messages()
        .iter()
        .filter_map(|m| qualifying_length(m.party, m.text.as_deref()).map(|q| (m, q)))
    {
        *totals.entry((idx, message.day)).or_insert(0) += length as u64;
    }

    let mut rows: Vec<DailyWords> = totals
        .into_iter()
        .map(|((idx, day), words)| DailyWords {
            day,
            party: table.labels().label(PARTICIPANTS[idx]).to_string(),
            words,
        })
        .collect();
    rows.sort_by(|a, b| a.party.cmp(&b.party).then_with(|| a.day.cmp(&b.day)));
    rows
}

/// Number of messages whose normalized text contains the fixed
/// "word hunt" keyword.
#[must_use]
pub fn game_count(table: &MessageTable) -> u64 {
    table
        .messages()
        .iter()
        .filter_map(|m| m.text.as_deref())
        .filter(|text| {
            tokens(text)
                .collect::<Vec<_>>()
                .join(" ")
                .contains("word hunt")
        })
        .count() as u64
}

/// Lower-cased whitespace tokens of a text fragment.
pub(crate) fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().map(str::to_lowercase)
}

fn participant_index(party: Party) -> Option<usize> {
    PARTICIPANTS.iter().position(|p| *p == party)
}

/// Participant index and token count for messages that qualify for the
/// length aggregates: a real party and at least one token.
fn qualifying_length(party: Party, text: Option<&str>) -> Option<(usize, usize)> {
    let idx = participant_index(party)?;
    let length = text.map_or(0, |t| t.split_whitespace().count());
    (length > 0).then_some((idx, length))
}

fn message_lengths(table: &MessageTable) -> impl Iterator<Item = (usize, usize)> + '_ {
    table
        .messages()
        .iter()
        .filter_map(|m| qualifying_length(m.party, m.text.as_deref()))
}
