//! Data models for the message table and the aggregate views derived from it.
//!
//! The row types in the second half of this module are what the JSON endpoints
//! serve; they are shaped for direct consumption by the dashboard charts and
//! tables.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Which side of the conversation a message belongs to.
///
/// The raw export carries a two-valued direction flag; anything that matches
/// neither value (group-rename events, system notices) is classified as
/// `Notification`. Notification rows are kept for raw counts but excluded
/// from the lexical, emoji and n-gram aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Party {
    /// Messages received from the other participant
    Incoming,
    /// Messages sent by the owner of the export
    Outgoing,
    /// System notifications and other non-participant rows
    Notification,
}

impl Party {
    /// True for the two real conversation participants.
    #[must_use]
    pub const fn is_participant(self) -> bool {
        matches!(self, Self::Incoming | Self::Outgoing)
    }
}

/// The two participants' display names, taken from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyLabels {
    /// Display name for incoming messages
    pub incoming: String,
    /// Display name for outgoing messages
    pub outgoing: String,
}

impl PartyLabels {
    /// Resolve a party to its display label.
    #[must_use]
    pub fn label(&self, party: Party) -> &str {
        match party {
            Party::Incoming => &self.incoming,
            Party::Outgoing => &self.outgoing,
            Party::Notification => "System",
        }
    }
}

/// One row of the normalized message table. Immutable once loaded.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Timestamp when the message was sent
    pub timestamp: NaiveDateTime,
    /// Calendar date, derived from the timestamp
    pub day: NaiveDate,
    /// Hour of day (0-23), derived from the timestamp
    pub hour: u32,
    /// Time of day, derived from the timestamp
    pub time: NaiveTime,
    /// Resolved direction of the message
    pub party: Party,
    /// Message text; `None` when the export row had no text field
    pub text: Option<String>,
}

impl Message {
    /// Build a message row, deriving the calendar fields from the timestamp.
    #[must_use]
    pub fn new(timestamp: NaiveDateTime, party: Party, text: Option<String>) -> Self {
        Self {
            timestamp,
            day: timestamp.date(),
            hour: timestamp.hour(),
            time: timestamp.time(),
            party,
            text,
        }
    }
}

/// Daily message count for one party, possibly smoothed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyCount {
    /// Calendar day
    pub day: NaiveDate,
    /// Party display label
    pub party: String,
    /// Message count; fractional once smoothing is applied
    pub count: f64,
}

/// Hourly message count for one party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyCount {
    /// Hour of day (0-23)
    pub hour: u32,
    /// Party display label
    pub party: String,
    /// Message count
    pub count: u64,
}

/// Occurrence count of one word for one party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    /// Party display label
    pub party: String,
    /// Lower-cased whitespace token
    pub word: String,
    /// Occurrence count
    pub count: u64,
}

/// Number of messages of a given word-length for one party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LengthCount {
    /// Party display label
    pub party: String,
    /// Message length in whitespace tokens
    pub length: usize,
    /// Number of messages with that length
    pub count: u64,
}

/// Total words sent on one day by one party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyWords {
    /// Calendar day
    pub day: NaiveDate,
    /// Party display label
    pub party: String,
    /// Total whitespace tokens sent that day
    pub words: u64,
}

/// One key (emoji or n-gram) with both parties' counts, outer-joined.
///
/// `counts[0]` belongs to the incoming party, `counts[1]` to the outgoing
/// party; a key used by only one side carries a zero for the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairedCount {
    /// The joined key (an emoji grapheme cluster or a space-joined n-gram)
    pub key: String,
    /// Per-party occurrence counts, incoming first
    pub counts: [u64; 2],
}

/// A two-party frequency comparison: the full outer join plus a
/// top-10 slice ready for a grouped bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonTable {
    /// Party display labels, incoming first
    pub parties: [String; 2],
    /// Full joined table, combined count descending
    pub rows: Vec<PairedCount>,
    /// Top-10 slice of `rows` for charting
    pub top: Vec<PairedCount>,
}

/// Total message count for one party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartyTotal {
    /// Party display label
    pub party: String,
    /// Total messages, including empty-text rows
    pub count: u64,
}

/// Scalar statistics over the whole table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Total rows in the table
    pub total_messages: u64,
    /// Per-party totals, notification bucket included
    pub party_totals: Vec<PartyTotal>,
    /// Rows with non-empty text
    pub messages_with_text: u64,
    /// Messages containing the fixed "word hunt" keyword
    pub word_hunt_messages: u64,
    /// First day in the table, if any messages exist
    pub first_day: Option<NaiveDate>,
    /// Last day in the table, if any messages exist
    pub last_day: Option<NaiveDate>,
}

/// One line of the periodic random-message panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleLine {
    /// Party display label
    pub party: String,
    /// Message text
    pub text: String,
}

/// A random sample of messages for the periodic panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageSample {
    /// Day of the first sampled message, shown as the panel date
    pub day: Option<NaiveDate>,
    /// The sampled messages in draw order
    pub lines: Vec<SampleLine>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_message_derives_calendar_fields() {
        let msg = Message::new(ts("2023-04-05 21:14:07"), Party::Incoming, None);
        assert_eq!(msg.day.to_string(), "2023-04-05");
        assert_eq!(msg.hour, 21);
        assert_eq!(msg.time.to_string(), "21:14:07");
    }

    #[test]
    fn test_party_participants() {
        assert!(Party::Incoming.is_participant());
        assert!(Party::Outgoing.is_participant());
        assert!(!Party::Notification.is_participant());
    }

    #[test]
    fn test_labels_resolve() {
        let labels = PartyLabels {
            incoming: "Them".to_string(),
            outgoing: "Me".to_string(),
        };
        assert_eq!(labels.label(Party::Incoming), "Them");
        assert_eq!(labels.label(Party::Outgoing), "Me");
        assert_eq!(labels.label(Party::Notification), "System");
    }
}
