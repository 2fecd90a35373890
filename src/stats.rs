//! Simple scalar statistics over the whole table.

use crate::ingest::MessageTable;
use crate::lexical;
use crate::models::{Party, PartyTotal, Summary};

/// Headline numbers for the dashboard: totals per party, the overall span,
/// and the fixed "word hunt" keyword count.
#[must_use]
pub fn summary(table: &MessageTable) -> Summary {
    let mut totals = [0u64; 3];
    let mut with_text = 0u64;
    for message in table.messages() {
        let idx = match message.party {
            Party::Incoming => 0,
            Party::Outgoing => 1,
            Party::Notification => 2,
        };
        totals[idx] += 1;
        if message.text.as_deref().is_some_and(|t| !t.trim().is_empty()) {
            with_text += 1;
        }
    }

    let mut party_totals = vec![
        PartyTotal {
            party: table.labels().label(Party::Incoming).to_string(),
            count: totals[0],
        },
        PartyTotal {
            party: table.labels().label(Party::Outgoing).to_string(),
            count: totals[1],
        },
    ];
    // The notification bucket only shows up when the export actually has one
    if totals[2] > 0 {
        party_totals.push(PartyTotal {
            party: table.labels().label(Party::Notification).to_string(),
            count: totals[2],
        });
    }

    Summary {
        total_messages: table.len() as u64,
        party_totals,
        messages_with_text: with_text,
        word_hunt_messages: lexical::game_count(table),
        first_day: table.first_day(),
        last_day: table.last_day(),
    }
}
