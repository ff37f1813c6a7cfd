mod common;

use chatterbox::error::Result;
use chatterbox::store::{
    derive_title, generate_chat_id, ChatStore, Message, CHAT_STORAGE_KEY, RECENT_CHATS_KEY,
};
use chatterbox::substrate::{KeyValueSubstrate, MemorySubstrate, SledSubstrate};
use chatterbox::ChatterboxError;

/// Substrate wrapper that rejects writes to one specific key.
///
/// Models a quota failure landing between the two steps of a dual-write
/// saga: the record write succeeds, the index write does not.
#[derive(Clone)]
struct FailingKeySubstrate {
    inner: MemorySubstrate,
    failing_key: String,
}

impl FailingKeySubstrate {
    fn new(failing_key: &str) -> Self {
        Self {
            inner: MemorySubstrate::new(),
            failing_key: failing_key.to_string(),
        }
    }
}

impl KeyValueSubstrate for FailingKeySubstrate {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if key == self.failing_key {
            return Err(ChatterboxError::QuotaExceeded {
                key: key.to_string(),
                bytes: value.len(),
            }
            .into());
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }
}

#[test]
fn test_full_lifecycle_over_sled() {
    let (store, _tmp) = common::create_temp_store();

    let id = generate_chat_id();
    let messages = vec![
        Message::user(1, "Explain cellular respiration in detail please"),
        Message::bot(2, "Cellular respiration converts glucose into ATP."),
    ];
    let title = derive_title(&messages);
    assert_eq!(title, "Explain cellular respiration i...");

    store.save(&id, &messages, Some(&title)).expect("save failed");

    let record = store.get(&id).expect("record should exist");
    assert_eq!(record.title, title);
    assert_eq!(record.messages, messages);

    let entries = store.recent().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, id);

    store.delete(&id).expect("delete failed");
    assert!(store.get(&id).is_none());
    assert!(store.recent().entries().is_empty());
}

#[test]
fn test_records_survive_reopening_the_substrate() {
    let tmp = tempfile::TempDir::new().expect("failed to create tempdir");
    let db_path = tmp.path().join("chatterbox.db");
    let id = generate_chat_id();

    {
        let store = ChatStore::new(SledSubstrate::open(&db_path).expect("open failed"));
        store
            .save(&id, &[Message::user(1, "persist me")], Some("Durable"))
            .expect("save failed");
    }

    let store = ChatStore::new(SledSubstrate::open(&db_path).expect("reopen failed"));
    let record = store.get(&id).expect("record should survive reopen");
    assert_eq!(record.title, "Durable");
    assert_eq!(store.recent().entries().len(), 1);
}

#[test]
fn test_persisted_layout_matches_wire_format() {
    let substrate = MemorySubstrate::new();
    let store = ChatStore::new(substrate.clone());

    let messages = vec![Message::user(1, "hello").with_code("println!(\"hi\");", "rust")];
    store
        .save("chat_wire", &messages, Some("Wire check"))
        .expect("save failed");

    // The chat table is a JSON object mapping id to record, camelCase keys.
    let raw = substrate
        .get(CHAT_STORAGE_KEY)
        .expect("get failed")
        .expect("chat table should exist");
    let table: serde_json::Value = serde_json::from_str(&raw).expect("table should be JSON");
    let record = &table["chat_wire"];
    assert_eq!(record["id"], "chat_wire");
    assert_eq!(record["title"], "Wire check");
    assert!(record["createdAt"].is_string());
    assert!(record["updatedAt"].is_string());
    assert_eq!(record["messages"][0]["sender"], "user");
    assert_eq!(record["messages"][0]["language"], "rust");

    // The recency index is a JSON array, most recent first.
    let raw = substrate
        .get(RECENT_CHATS_KEY)
        .expect("get failed")
        .expect("recent list should exist");
    let entries: serde_json::Value = serde_json::from_str(&raw).expect("index should be JSON");
    let array = entries.as_array().expect("index should be an array");
    assert_eq!(array.len(), 1);
    assert_eq!(array[0]["id"], "chat_wire");
    assert!(array[0]["updatedAt"].is_string());
}

#[test]
fn test_save_succeeds_even_when_index_write_fails() {
    // Record write lands, index write is rejected: the documented weak
    // guarantee is that the index lags the table, not that save fails.
    let substrate = FailingKeySubstrate::new(RECENT_CHATS_KEY);
    let store = ChatStore::new(substrate);

    store
        .save("chat_saga", &[Message::user(1, "hi")], Some("Saga"))
        .expect("save should succeed despite index failure");

    assert!(store.get("chat_saga").is_some());
    assert!(store.recent().entries().is_empty());
}

#[test]
fn test_delete_leaves_stale_index_entry_when_prune_fails() {
    let substrate = MemorySubstrate::new();
    let store = ChatStore::new(substrate.clone());
    store
        .save("chat_stale", &[Message::user(1, "hi")], Some("Stale"))
        .expect("save failed");

    // Rebuild the store over a substrate that can no longer write the
    // index, sharing the already-populated backing map.
    let failing = FailingKeySubstrate {
        inner: substrate,
        failing_key: RECENT_CHATS_KEY.to_string(),
    };
    let store = ChatStore::new(failing);

    store
        .delete("chat_stale")
        .expect("delete should succeed despite prune failure");

    assert!(store.get("chat_stale").is_none());
    // Transiently inconsistent by design: entry outlives its record.
    let entries = store.recent().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, "chat_stale");
}

#[test]
fn test_record_write_failure_reports_error_and_skips_index() {
    let substrate = FailingKeySubstrate::new(CHAT_STORAGE_KEY);
    let store = ChatStore::new(substrate);

    let err = store
        .save("chat_q", &[Message::user(1, "hi")], None)
        .unwrap_err();
    let err = err
        .downcast_ref::<ChatterboxError>()
        .expect("error should be a ChatterboxError");
    assert!(matches!(err, ChatterboxError::QuotaExceeded { .. }));

    // First saga step failed, so the second never ran.
    assert!(store.recent().entries().is_empty());
}

#[test]
fn test_clear_then_seed_then_seed_again() {
    let (store, _tmp) = common::create_temp_store();
    store
        .save("chat_a", &[Message::user(1, "x")], Some("A"))
        .expect("save failed");

    store.clear_all().expect("clear failed");
    assert!(store.get_all().is_empty());
    assert!(store.recent().entries().is_empty());

    assert!(store.seed_sample_data().expect("seed failed"));
    assert_eq!(store.get_all().len(), 2);
    assert_eq!(store.recent().entries().len(), 2);

    // Repeat seeding must not duplicate anything.
    assert!(!store.seed_sample_data().expect("second seed failed"));
    assert_eq!(store.get_all().len(), 2);
    assert_eq!(store.recent().entries().len(), 2);
}

#[test]
fn test_update_does_not_create_missing_records() {
    let (store, _tmp) = common::create_temp_store();
    let updated = store
        .update("ghost", &[Message::user(1, "boo")])
        .expect("update failed");
    assert!(!updated);
    assert!(store.get_all().is_empty());
}

#[test]
fn test_fifteen_saves_keep_ten_most_recent_entries() {
    let (store, _tmp) = common::create_temp_store();

    for i in 0..15 {
        store
            .save(
                &format!("chat_{}", i),
                &[Message::user(i, format!("message {}", i))],
                Some(&format!("Chat {}", i)),
            )
            .expect("save failed");
    }

    // All fifteen records exist; only the ten most recent are indexed.
    assert_eq!(store.get_all().len(), 15);
    let entries = store.recent().entries();
    assert_eq!(entries.len(), 10);
    assert_eq!(entries[0].id, "chat_14");
    assert_eq!(entries[9].id, "chat_5");
}
