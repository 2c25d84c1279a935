mod common;

use common::{attachment, ids, memory_db, message, NOW};
use herald_shared::{Attachment, Event, Message, Since, Topic};
use herald_store::{DeliveryState, StoreError};

#[test]
fn delivery_state_is_decided_at_insert() {
    let db = memory_db();
    db.add_message_at(&message("past", "t", NOW - 10), NOW).unwrap();
    db.add_message_at(&message("future", "t", NOW + 1000), NOW).unwrap();

    assert_eq!(db.message_state("past").unwrap(), Some(DeliveryState::Published));
    assert_eq!(db.message_state("future").unwrap(), Some(DeliveryState::Scheduled));

    assert!(db.mark_published("future").unwrap());
    assert_eq!(db.message_state("future").unwrap(), Some(DeliveryState::Published));
    assert_eq!(db.message_state("missing").unwrap(), None);
}

#[test]
fn wall_clock_insert_publishes_current_messages() {
    let db = memory_db();
    let msg = Message::new("alerts", "now");
    db.add_message(&msg).unwrap();
    assert_eq!(db.message_state(&msg.id).unwrap(), Some(DeliveryState::Published));
}

#[test]
fn scheduled_messages_hidden_unless_requested() {
    let db = memory_db();
    db.add_message_at(&message("m2", "t", NOW + 1000), NOW).unwrap();
    db.add_message_at(&message("m1", "t", NOW - 10), NOW).unwrap();

    let published = db.messages_since("t", Since::All, false).unwrap();
    assert_eq!(ids(&published), vec!["m1"]);

    let all = db.messages_since("t", Since::All, true).unwrap();
    assert_eq!(ids(&all), vec!["m1", "m2"]);
}

#[test]
fn messages_since_filters_topic_and_time() {
    let db = memory_db();
    db.add_message_at(&message("a", "t", NOW - 300), NOW).unwrap();
    db.add_message_at(&message("c", "t", NOW - 100), NOW).unwrap();
    db.add_message_at(&message("b", "t", NOW - 200), NOW).unwrap();
    db.add_message_at(&message("other", "u", NOW - 200), NOW).unwrap();

    let since = db.messages_since("t", Since::At(NOW - 200), false).unwrap();
    assert_eq!(ids(&since), vec!["b", "c"]);

    assert!(db.messages_since("t", Since::NoMessages, true).unwrap().is_empty());
    assert!(db.messages_since("nobody", Since::All, true).unwrap().is_empty());
}

#[test]
fn due_messages_are_unpublished_and_past_due() {
    let db = memory_db();
    db.add_message_at(&message("published", "t", NOW - 50), NOW - 100).unwrap();
    db.add_message_at(&message("due", "t", NOW - 10), NOW - 100).unwrap();
    db.add_message_at(&message("later", "t", NOW + 10), NOW - 100).unwrap();
    db.mark_published("published").unwrap();

    let due = db.messages_due(NOW).unwrap();
    assert_eq!(ids(&due), vec!["due"]);

    for m in &due {
        db.mark_published(&m.id).unwrap();
    }
    assert!(db.messages_due(NOW).unwrap().is_empty());
    assert_eq!(ids(&db.messages_due(NOW + 10).unwrap()), vec!["later"]);
}

#[test]
fn mark_published_is_idempotent() {
    let db = memory_db();
    db.add_message_at(&message("m", "t", NOW + 5), NOW).unwrap();
    assert!(db.mark_published("m").unwrap());
    assert!(db.mark_published("m").unwrap());
    assert_eq!(db.message_state("m").unwrap(), Some(DeliveryState::Published));
    assert!(!db.mark_published("gone").unwrap());
}

#[test]
fn prune_never_removes_scheduled_messages() {
    let db = memory_db();
    db.add_message_at(&message("old-published", "t", NOW - 1000), NOW).unwrap();
    // Same age, but it was still in the future when it was stored.
    db.add_message_at(&message("old-scheduled", "t", NOW - 1000), NOW - 2000).unwrap();
    db.add_message_at(&message("recent", "t", NOW - 10), NOW).unwrap();

    assert_eq!(db.prune(NOW - 500).unwrap(), 1);

    let left = db.messages_since("t", Since::All, true).unwrap();
    assert_eq!(ids(&left), vec!["old-scheduled", "recent"]);
}

#[test]
fn duplicate_id_is_rejected() {
    let db = memory_db();
    db.add_message_at(&message("dup", "t", NOW), NOW).unwrap();
    let err = db.add_message_at(&message("dup", "u", NOW + 1), NOW).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateId(ref id) if id == "dup"), "got {err}");
    assert_eq!(db.total_message_count().unwrap(), 1);
    assert_eq!(db.message_count("u").unwrap(), 0);
}

#[test]
fn non_message_events_are_rejected() {
    let db = memory_db();
    let err = db
        .add_message_at(&Message::event(Event::Keepalive, "t"), NOW)
        .unwrap_err();
    assert!(matches!(err, StoreError::TypeMismatch(Event::Keepalive)), "got {err}");
    assert_eq!(db.total_message_count().unwrap(), 0);
}

#[test]
fn tag_containing_separator_is_rejected() {
    let db = memory_db();
    let msg = message("m", "t", NOW).with_tags(["fine", "not,fine"]);
    let err = db.add_message_at(&msg, NOW).unwrap_err();
    assert!(matches!(err, StoreError::InvalidTag(_)), "got {err}");
    assert_eq!(db.total_message_count().unwrap(), 0);
}

#[test]
fn full_message_reads_back_unchanged() {
    let db = memory_db();
    let msg = message("full", "t", NOW - 1)
        .with_title("Backup done")
        .with_priority(5)
        .with_tags(["white_check_mark", "backup"])
        .with_click("https://example.com/backups")
        .with_encoding("base64")
        .with_attachment(attachment("A", 4096, NOW + 3600));
    db.add_message_at(&msg, NOW).unwrap();

    let stored = db.messages_since("t", Since::All, false).unwrap();
    assert_eq!(stored, vec![msg]);
}

#[test]
fn attachment_with_empty_name_is_kept() {
    let db = memory_db();
    let nameless = Attachment {
        name: String::new(),
        ..attachment("A", 10, 0)
    };
    db.add_message_at(&message("m", "t", NOW).with_attachment(nameless.clone()), NOW)
        .unwrap();

    let stored = db.messages_since("t", Since::All, false).unwrap();
    assert_eq!(stored[0].attachment, Some(nameless));
}

#[test]
fn topics_and_counts() {
    let db = memory_db();
    db.add_message_at(&message("1", "beta", NOW), NOW).unwrap();
    db.add_message_at(&message("2", "alpha", NOW), NOW).unwrap();
    db.add_message_at(&message("3", "alpha", NOW + 100), NOW).unwrap();

    assert_eq!(db.topics().unwrap(), vec![Topic::new("alpha"), Topic::new("beta")]);
    assert_eq!(db.message_count("alpha").unwrap(), 2);
    assert_eq!(db.message_count("beta").unwrap(), 1);
    assert_eq!(db.message_count("gamma").unwrap(), 0);
    assert_eq!(db.total_message_count().unwrap(), 3);
}

#[test]
fn corrupted_row_surfaces_decode_error() {
    let db = memory_db();
    db.add_message_at(&message("bad", "t", NOW), NOW).unwrap();
    db.conn()
        .execute("UPDATE messages SET priority = 999 WHERE id = 'bad'", [])
        .unwrap();

    let err = db.messages_since("t", Since::All, false).unwrap_err();
    assert!(matches!(err, StoreError::Decode(_)), "got {err}");
}
