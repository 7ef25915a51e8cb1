mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use common::{Account, Document, LedgerEntry};
use regex::Regex;
use sqlmapper::keygen::EPOCH_MILLIS;
use sqlmapper::prelude::*;
use sqlmapper::{Clock, SnowflakeId};

/// A clock the test moves by hand. Sleeping advances it.
#[derive(Clone)]
struct HandClock(Arc<AtomicI64>);

impl HandClock {
    fn at(now: i64) -> Self {
        Self(Arc::new(AtomicI64::new(now)))
    }

    fn set(&self, now: i64) {
        self.0.store(now, Ordering::SeqCst);
    }
}

impl Clock for HandClock {
    fn now_millis(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }

    fn sleep(&self, duration: Duration) {
        let ms = i64::try_from(duration.as_millis()).unwrap();
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

const NOW: i64 = EPOCH_MILLIS + 1_000_000;

fn assigner_with(clock: HandClock) -> KeyAssigner {
    let generator = SnowflakeGenerator::with_clock(17, clock).unwrap();
    KeyAssigner::new(Arc::new(generator), Arc::new(GeneratorRegistry::new()))
}

#[test]
fn node_id_range() {
    assert!(SnowflakeGenerator::new(1024).is_err());
    assert!(SnowflakeGenerator::new(0).is_ok());
    assert!(SnowflakeGenerator::new(1023).is_ok());
}

#[test]
fn snowflake_ids_embed_time_and_node() {
    let clock = HandClock::at(NOW);
    let generator = SnowflakeGenerator::with_clock(17, clock.clone()).unwrap();
    let first = generator.next_id().unwrap();
    let second = generator.next_id().unwrap();
    assert!(second > first);

    let parts = SnowflakeId::decompose(second);
    assert_eq!(parts.timestamp_millis, NOW);
    assert_eq!(parts.node_id, 17);
}

#[test]
fn snowflake_clock_rollback() {
    let clock = HandClock::at(NOW);
    let generator = SnowflakeGenerator::with_clock(1, clock.clone()).unwrap();
    let before = generator.next_id().unwrap();

    clock.set(NOW - 3);
    let after = generator.next_id().unwrap();
    assert!(after > before);

    let last = SnowflakeId::decompose(after).timestamp_millis;
    clock.set(last - 50);
    assert!(matches!(
        generator.next_id(),
        Err(Error::ClockRollback { drift_ms: 50 })
    ));
}

#[test]
fn snowflake_key_assigned_only_when_null() {
    let assigner = assigner_with(HandClock::at(NOW));
    let mut fresh = Account::new("alice", 30);
    let mut kept = Account {
        id: Some(5),
        ..Account::new("bob", 40)
    };

    assigner.assign(&mut fresh).unwrap();
    assigner.assign(&mut kept).unwrap();

    let id = fresh.id.unwrap();
    assert_eq!(SnowflakeId::decompose(id).node_id, 17);
    assert_eq!(kept.id, Some(5));
}

#[test]
fn uuid_keys_are_32_lowercase_hex() {
    let pattern = Regex::new("^[0-9a-f]{32}$").unwrap();
    let assigner = assigner_with(HandClock::at(NOW));
    let mut docs = vec![Document::default(); 20];
    assert_eq!(assigner.assign_all(&mut docs).unwrap(), 20);

    for doc in &docs {
        assert!(pattern.is_match(doc.id.as_deref().unwrap()));
    }
    let mut ids: Vec<_> = docs.iter().filter_map(|d| d.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 20);
}

#[test]
fn insert_sql_includes_assigned_key() {
    let assigner = assigner_with(HandClock::at(NOW));
    let mut account = Account::new("carol", 25);
    let (sql, _) = InsertBuilder::new(&account).build().unwrap();
    assert!(!sql.contains("(id,"));

    assigner.assign(&mut account).unwrap();
    let (sql, params) = InsertBuilder::new(&account).build().unwrap();
    assert!(sql.starts_with("INSERT INTO account (id, user_name, age, status, is_deleted)"));
    assert_eq!(params[0], Value::BigInt(account.id.unwrap()));
}

#[test]
fn composite_key_is_rejected_by_the_assigner() {
    let assigner = assigner_with(HandClock::at(NOW));
    let mut entry = LedgerEntry::default();
    let err = assigner.assign(&mut entry).unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedCompositeKey { entity: "LedgerEntry", ref fields }
            if fields == &vec!["accountId", "entryNo"]
    ));
    assert_eq!(entry.account_id, None);
    assert!(assigner.assign_all(&mut [LedgerEntry::default()]).is_err());
}

#[test]
fn composite_key_is_rejected_by_the_builders() {
    let entry = LedgerEntry {
        account_id: Some(1),
        entry_no: Some(2),
    };
    assert!(matches!(
        InsertBuilder::new(&entry).build(),
        Err(Error::UnsupportedCompositeKey { .. })
    ));
    assert!(matches!(
        DeleteBuilder::<LedgerEntry>::by_ids([1_i64]).build(),
        Err(Error::UnsupportedCompositeKey { .. })
    ));
}
