//! Volume-over-time aggregation: daily and hourly message counts per party.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::ingest::{MessageTable, PARTICIPANTS};
use crate::models::{DailyCount, HourlyCount};

/// Daily message counts per party, smoothed with an exponential moving
/// average of the given span.
///
/// Every day between the first and last day of the table appears once per
/// party; days without messages count as zero, not as missing rows. A span
/// of 1 is a no-op and reproduces the raw counts. Output is party-major,
/// days ascending, ready for a multi-series line chart.
#[must_use]
pub fn by_day(table: &MessageTable, smoothing_span: u32) -> Vec<DailyCount> {
    let span = smoothing_span.max(1);

    let (Some(first), Some(last)) = (table.first_day(), table.last_day()) else {
        return Vec::new();
    };

    let mut counts: HashMap<NaiveDate, [u64; 2]> = HashMap::new();
    for message in table.messages() {
        if let Some(idx) = PARTICIPANTS.iter().position(|p| *p == message.party) {
            counts.entry(message.day).or_default()[idx] += 1;
        }
    }

    let days = day_range(first, last);
    let mut rows = Vec::with_capacity(days.len() * PARTICIPANTS.len());
    for (idx, party) in PARTICIPANTS.iter().enumerate() {
        let raw: Vec<f64> = days
            .iter()
            .map(|day| counts.get(day).map_or(0, |c| c[idx]) as f64)
            .collect();
        let smoothed = exponential_moving_average(&raw, span);
        for (day, count) in days.iter().zip(smoothed) {
            rows.push(DailyCount {
                day: *day,
                party: table.labels().label(*party).to_string(),
                count,
            });
        }
    }
    rows
}

/// Message counts per (hour, party) for a grouped bar chart.
///
/// Always returns exactly 24 rows per party, hours 0-23, with zero counts
/// for inactive hours.
#[must_use]
pub fn by_hour(table: &MessageTable) -> Vec<HourlyCount> {
    let mut counts = [[0u64; 24]; 2];
    for message in table.messages() {
        if let Some(idx) = PARTICIPANTS.iter().position(|p| *p == message.party) {
            counts[idx][message.hour as usize] += 1;
        }
    }

    let mut rows = Vec::with_capacity(24 * PARTICIPANTS.len());
    for (idx, party) in PARTICIPANTS.iter().enumerate() {
        for (hour, count) in counts[idx].iter().enumerate() {
            rows.push(HourlyCount {
                hour: hour as u32,
                party: table.labels().label(*party).to_string(),
                count: *count,
            });
        }
    }
    rows
}

/// Recursive exponential moving average with alpha = 2 / (span + 1), seeded
/// with the first raw value. Span 1 yields alpha 1, i.e. the input itself.
fn exponential_moving_average(values: &[f64], span: u32) -> Vec<f64> {
    if span <= 1 || values.is_empty() {
        return values.to_vec();
    }
    let alpha = 2.0 / (f64::from(span) + 1.0);
    let mut smoothed = Vec::with_capacity(values.len());
    let mut previous = values[0];
    smoothed.push(previous);
    for value in &values[1..] {
        previous = alpha * value + (1.0 - alpha) * previous;
        smoothed.push(previous);
    }
    smoothed
}

fn day_range(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = first;
    while day <= last {
        days.push(day);
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Message, Party, PartyLabels};
    use chrono::NaiveDateTime;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn labels() -> PartyLabels {
        PartyLabels {
            incoming: "A".to_string(),
            outgoing: "B".to_string(),
        }
    }

    fn table(messages: Vec<Message>) -> MessageTable {
        MessageTable::from_messages(messages, labels())
    }

    #[test]
    fn test_by_day_span_one_is_raw_counts() {
        // A: {day1: 3, day2: 0}, B: {day1: 1, day2: 2}
        let t = table(vec![
            Message::new(ts("2023-01-01 08:00:00"), Party::Incoming, None),
            Message::new(ts("2023-01-01 09:00:00"), Party::Incoming, None),
            Message::new(ts("2023-01-01 10:00:00"), Party::Incoming, None),
            Message::new(ts("2023-01-01 11:00:00"), Party::Outgoing, None),
            Message::new(ts("2023-01-02 08:00:00"), Party::Outgoing, None),
            Message::new(ts("2023-01-02 09:00:00"), Party::Outgoing, None),
        ]);
        let rows = by_day(&t, 1);
        let flat: Vec<(String, String, f64)> = rows
            .iter()
            .map(|r| (r.day.to_string(), r.party.clone(), r.count))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("2023-01-01".to_string(), "A".to_string(), 3.0),
                ("2023-01-02".to_string(), "A".to_string(), 0.0),
                ("2023-01-01".to_string(), "B".to_string(), 1.0),
                ("2023-01-02".to_string(), "B".to_string(), 2.0),
            ]
        );
    }

    #[test]
    fn test_by_day_zero_fills_gap_days() {
        let t = table(vec![
            Message::new(ts("2023-01-01 08:00:00"), Party::Incoming, None),
            Message::new(ts("2023-01-04 08:00:00"), Party::Incoming, None),
        ]);
        let rows = by_day(&t, 1);
        // 4 days x 2 parties
        assert_eq!(rows.len(), 8);
        let a_counts: Vec<f64> = rows
            .iter()
            .filter(|r| r.party == "A")
            .map(|r| r.count)
            .collect();
        assert_eq!(a_counts, vec![1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_by_day_excludes_notification_rows() {
        let t = table(vec![
            Message::new(ts("2023-01-01 08:00:00"), Party::Incoming, None),
            Message::new(ts("2023-01-01 08:01:00"), Party::Notification, None),
        ]);
        let rows = by_day(&t, 1);
        let total: f64 = rows.iter().map(|r| r.count).sum();
        assert!((total - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_by_day_empty_table() {
        assert!(by_day(&table(Vec::new()), 7).is_empty());
    }

    #[test]
    fn test_smoothing_recursion() {
        // span 3 -> alpha 0.5
        let smoothed = exponential_moving_average(&[0.0, 10.0, 10.0], 3);
        assert_eq!(smoothed, vec![0.0, 5.0, 7.5]);
    }

    #[test]
    fn test_by_hour_full_grid() {
        let t = table(vec![
            Message::new(ts("2023-01-01 08:00:00"), Party::Incoming, None),
            Message::new(ts("2023-01-01 08:30:00"), Party::Incoming, None),
            Message::new(ts("2023-01-02 23:59:59"), Party::Outgoing, None),
        ]);
        let rows = by_hour(&t);
        assert_eq!(rows.len(), 48);
        for party in ["A", "B"] {
            let hours: Vec<u32> = rows
                .iter()
                .filter(|r| r.party == party)
                .map(|r| r.hour)
                .collect();
            assert_eq!(hours, (0..24).collect::<Vec<u32>>());
        }
        let eight_a = rows
            .iter()
            .find(|r| r.party == "A" && r.hour == 8)
            .unwrap();
        assert_eq!(eight_a.count, 2);
        let noon_b = rows
            .iter()
            .find(|r| r.party == "B" && r.hour == 12)
            .unwrap();
        assert_eq!(noon_b.count, 0);
    }
}
