use std::fs;

use tempfile::tempdir;

use txt_dashboard::config::{AppConfig, DataConfig};
use txt_dashboard::error::DashboardError;
use txt_dashboard::ingest::MessageTable;
use txt_dashboard::models::Party;

fn data_config(csv_path: &str) -> DataConfig {
    let mut data = AppConfig::default().data;
    data.csv_path = csv_path.to_string();
    data.incoming_party = "Claire".to_string();
    data.outgoing_party = "Gabe".to_string();
    data
}

fn write_csv(contents: &str) -> (tempfile::TempDir, String) {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("messages.csv");
    fs::write(&path, contents).expect("Failed to write CSV fixture");
    let path = path.display().to_string();
    (dir, path)
}

#[test]
fn test_load_normalizes_rows() {
    let (_dir, path) = write_csv(
        "Message Date,Type,Text\n\
         2023-01-01 08:15:00,Incoming,Good morning!\n\
         2023-01-01 21:40:10,Outgoing,\"\u{201C}Good morning!\u{201D} right back at you\n\
over two lines\"\n\
         2023-01-02 09:00:00,Notification,You named the group chat\n\
         2023-01-02 10:00:00,Incoming,\n",
    );

    let table = MessageTable::load(&data_config(&path)).expect("load should succeed");
    assert_eq!(table.len(), 4);

    let messages = table.messages();
    assert_eq!(messages[0].party, Party::Incoming);
    assert_eq!(messages[0].day.to_string(), "2023-01-01");
    assert_eq!(messages[0].hour, 8);
    assert_eq!(messages[0].time.to_string(), "08:15:00");

    // The quoted-reply fragment is stripped, the rest of the multi-line
    // text survives
    let reply = messages[1].text.as_deref().expect("text present");
    assert!(!reply.contains("Good morning!"));
    assert!(reply.contains("right back at you"));
    assert!(reply.contains("over two lines"));

    // Unknown direction values become the notification party
    assert_eq!(messages[2].party, Party::Notification);

    // Empty text field stays an empty string, not None
    assert_eq!(messages[3].text.as_deref(), Some(""));

    assert_eq!(table.labels().label(Party::Incoming), "Claire");
    assert_eq!(table.labels().label(Party::Outgoing), "Gabe");
    assert_eq!(table.first_day().map(|d| d.to_string()), Some("2023-01-01".into()));
    assert_eq!(table.last_day().map(|d| d.to_string()), Some("2023-01-02".into()));
}

#[test]
fn test_unparseable_timestamp_rejects_whole_load() {
    let (_dir, path) = write_csv(
        "Message Date,Type,Text\n\
         2023-01-01 08:15:00,Incoming,fine\n\
         yesterday-ish,Outgoing,broken\n",
    );

    let err = MessageTable::load(&data_config(&path)).expect_err("load must fail");
    match err {
        DashboardError::InvalidTimestamp { row, value } => {
            assert_eq!(row, 2);
            assert_eq!(value, "yesterday-ish");
        }
        other => panic!("expected InvalidTimestamp, got {other:?}"),
    }
}

#[test]
fn test_missing_column_is_reported() {
    let (_dir, path) = write_csv("Message Date,Text\n2023-01-01 08:15:00,hello\n");

    let err = MessageTable::load(&data_config(&path)).expect_err("load must fail");
    match err {
        DashboardError::MissingColumn(name) => assert_eq!(name, "Type"),
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn test_missing_file_fails_startup() {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("nope.csv").display().to_string();
    assert!(MessageTable::load(&data_config(&path)).is_err());
}

#[test]
fn test_short_rows_have_null_text() {
    let (_dir, path) = write_csv(
        "Message Date,Type,Text\n\
         2023-01-01 08:15:00,Incoming\n",
    );

    let table = MessageTable::load(&data_config(&path)).expect("load should succeed");
    assert_eq!(table.messages()[0].text, None);
}
