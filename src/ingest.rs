//! Ingestion and normalization of the raw message export.
//!
//! The export is a delimited text file with a timestamp column, a two-valued
//! direction column and a text column. It is read exactly once at startup
//! into a [`MessageTable`] that stays immutable for the process lifetime.
//! Any unparseable timestamp rejects the whole load; this is a fixed,
//! pre-vetted personal dataset, so there is no partial-load recovery.

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use tracing::info;
use unicode_normalization::UnicodeNormalization;

use crate::config::DataConfig;
use crate::error::{DashboardError, Result};
use crate::models::{Message, Party, PartyLabels};

/// The two real conversation participants, in label order.
pub const PARTICIPANTS: [Party; 2] = [Party::Incoming, Party::Outgoing];

/// Timestamp formats accepted in the export, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%b %d, %Y %r",
];

/// The normalized message table and the party labels it was loaded with.
///
/// This is the analytics context: every aggregator takes it by reference and
/// derives its output in a single pass, so repeated calls with the same
/// parameters always produce identical results.
#[derive(Debug, Clone)]
pub struct MessageTable {
    messages: Vec<Message>,
    labels: PartyLabels,
    first_day: Option<NaiveDate>,
    last_day: Option<NaiveDate>,
}

impl MessageTable {
    /// Load and normalize the message export described by `data`.
    pub fn load(data: &DataConfig) -> Result<Self> {
        let quoted_reply = quoted_reply_regex()?;

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&data.csv_path)?;

        let headers = reader.headers()?.clone();
        let column = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DashboardError::MissingColumn(name.to_string()))
        };
        let ts_idx = column(&data.timestamp_column)?;
        let dir_idx = column(&data.direction_column)?;
        let text_idx = column(&data.text_column)?;

        let mut messages = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let row = i + 1;

            let raw_ts = record.get(ts_idx).unwrap_or("").trim();
            let timestamp =
                parse_timestamp(raw_ts).ok_or_else(|| DashboardError::InvalidTimestamp {
                    row,
                    value: raw_ts.to_string(),
                })?;

            let party = match record.get(dir_idx).map(str::trim) {
                Some(v) if v == data.incoming_value => Party::Incoming,
                Some(v) if v == data.outgoing_value => Party::Outgoing,
                _ => Party::Notification,
            };

            // A short row has no text field at all; that stays None. An empty
            // field stays an empty string.
            let text = record
                .get(text_idx)
                .map(|t| normalize_text(&quoted_reply, t));

            messages.push(Message::new(timestamp, party, text));
        }

        let labels = PartyLabels {
            incoming: data.incoming_party.clone(),
            outgoing: data.outgoing_party.clone(),
        };

        let table = Self::from_messages(messages, labels);
        info!(
            rows = table.len(),
            first_day = ?table.first_day(),
            last_day = ?table.last_day(),
            "Message table loaded"
        );
        Ok(table)
    }

    /// Build a table from already-normalized rows.
    #[must_use]
    pub fn from_messages(messages: Vec<Message>, labels: PartyLabels) -> Self {
        let first_day = messages.iter().map(|m| m.day).min();
        let last_day = messages.iter().map(|m| m.day).max();
        Self {
            messages,
            labels,
            first_day,
            last_day,
        }
    }

    /// All rows, in file order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The configured party labels.
    #[must_use]
    pub fn labels(&self) -> &PartyLabels {
        &self.labels
    }

    /// Number of rows in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when the table holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Earliest calendar day in the table.
    #[must_use]
    pub const fn first_day(&self) -> Option<NaiveDate> {
        self.first_day
    }

    /// Latest calendar day in the table.
    #[must_use]
    pub const fn last_day(&self) -> Option<NaiveDate> {
        self.last_day
    }
}

/// Matches an embedded quoted reply: any run of characters delimited by a
/// pair of curly quotes. Replies quoted in the export carry the quoted
/// fragment inline, which would pollute every lexical aggregate.
fn quoted_reply_regex() -> Result<Regex> {
    Ok(Regex::new("\u{201C}[^\u{201D}]*\u{201D}")?)
}

/// NFC-normalize the text and strip embedded quoted-reply fragments.
fn normalize_text(quoted_reply: &Regex, text: &str) -> String {
    let normalized = text.nfc().collect::<String>();
    quoted_reply.replace_all(&normalized, "").into_owned()
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}
