//! Invariants of the load and save protocols, checked against a store that
//! records every access.

use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use lexis_cache::{
    CacheConfig, CacheEngine, CacheMode, Checksum, LoadState, MemoryStore, Meta, RequestCache,
    SaveOutcome, StoreAccess, TranslationMap,
};
use lexis_core::{Language, Translation};
use std::sync::Arc;
use std::time::Duration;

fn lang(tag: &str) -> Language {
    Language::parse(tag).unwrap()
}

fn entries(items: &[(&str, &str)], tag: &str) -> TranslationMap {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), Translation::new(*v).with_language(lang(tag))))
        .collect()
}

fn engine(store: &Arc<MemoryStore>) -> CacheEngine<Arc<MemoryStore>> {
    let config = CacheConfig::builder()
        .with_ttl(Duration::from_secs(3600))
        .with_mode(CacheMode::ReadWrite)
        .build();
    CacheEngine::new(Arc::clone(store), config)
}

/// A fresh record listing `keys` and `groups`, valid for an hour from now
fn fresh_meta(keys: &[&str], groups: &[Checksum]) -> Meta {
    let mut cache = RequestCache::new();
    for key in keys {
        cache.set_single(*key, Translation::new(*key));
    }
    Meta::new(
        Utc::now() + ChronoDuration::hours(1),
        cache.fingerprint(),
        keys.iter().map(|k| k.to_string()).collect(),
        groups.to_vec(),
    )
}

/// Invariant: a second save without intervening changes writes nothing
#[test]
fn invariant_idempotent_save() {
    let store = Arc::new(MemoryStore::new());
    let mut engine = engine(&store);
    let mut cache = RequestCache::new();
    cache.set(entries(&[("greeting", "Hello")], "en"));
    cache.set(entries(&[("title", "Title"), ("body", "Body")], "en"));

    assert!(matches!(
        engine.save("app", &cache).unwrap(),
        SaveOutcome::Written { .. }
    ));
    let writes_after_first = store.write_count();
    assert!(writes_after_first > 0);

    assert_eq!(engine.save("app", &cache).unwrap(), SaveOutcome::Unchanged);
    assert_eq!(store.write_count(), writes_after_first);

    // A new key changes the fingerprint and the next save writes again
    cache.set(entries(&[("footer", "Footer")], "en"));
    assert!(matches!(
        engine.save("app", &cache).unwrap(),
        SaveOutcome::Written { .. }
    ));
    assert!(store.write_count() > writes_after_first);
}

/// Invariant: a session that loads and changes nothing does not write
#[test]
fn invariant_load_then_save_without_changes_is_a_no_op() {
    let store = Arc::new(MemoryStore::new());
    let mut seeded = RequestCache::new();
    seeded.set(entries(&[("greeting", "Hello")], "en"));
    engine(&store).save("app", &seeded).unwrap();
    store.reset_counters();

    let mut engine = engine(&store);
    let mut cache = RequestCache::new();
    engine.load("app", &[lang("en")], &mut cache).unwrap();

    assert_eq!(engine.save("app", &cache).unwrap(), SaveOutcome::Unchanged);
    assert_eq!(store.write_count(), 0);
}

/// Invariant: each needed key comes from the first preference that has it,
/// and no language is read once every key is satisfied
#[test]
fn invariant_partial_satisfaction_short_circuit() {
    let store = Arc::new(MemoryStore::new());
    store.insert_meta("app", fresh_meta(&["a", "b", "c"], &[]));
    store.insert_single("app", &lang("es"), entries(&[("a", "a-es")], "es"));
    store.insert_single(
        "app",
        &lang("en-us"),
        entries(&[("a", "a-us"), ("b", "b-us")], "en-us"),
    );
    store.insert_single(
        "app",
        &lang("en-en"),
        entries(&[("a", "a-en"), ("b", "b-en"), ("c", "c-en")], "en-en"),
    );
    store.insert_single("app", &lang("fr"), entries(&[("c", "c-fr")], "fr"));

    let preferences = [lang("es"), lang("en-us"), lang("en-en"), lang("fr")];
    let mut cache = RequestCache::new();
    let report = engine(&store)
        .load("app", &preferences, &mut cache)
        .unwrap();

    assert_eq!(report.state, LoadState::Ready);
    assert_eq!(report.singles, 3);
    let single = cache.single_translations();
    assert_eq!(single["a"].text(), "a-es");
    assert_eq!(single["b"].text(), "b-us");
    assert_eq!(single["c"].text(), "c-en");

    let single_reads: Vec<Language> = store
        .reads()
        .into_iter()
        .filter_map(|access| match access {
            StoreAccess::Single(_, language) => Some(language),
            _ => None,
        })
        .collect();
    assert_eq!(single_reads, vec![lang("es"), lang("en-us"), lang("en-en")]);
}

/// Invariant: a group is loaded wholesale from the first preference that has it
#[test]
fn invariant_group_atomicity_across_languages() {
    let store = Arc::new(MemoryStore::new());
    let group = Checksum::of_key_set(["title", "body"]);
    store.insert_meta("app", fresh_meta(&[], &[group.clone()]));
    store.insert_group(
        &group,
        &lang("en-us"),
        entries(&[("title", "Title"), ("body", "Body")], "en-us"),
    );
    store.insert_group(
        &group,
        &lang("en-en"),
        entries(&[("title", "Title (en)"), ("body", "Body (en)")], "en-en"),
    );

    let preferences = [lang("es"), lang("en-us"), lang("en-en")];
    let mut cache = RequestCache::new();
    let report = engine(&store)
        .load("app", &preferences, &mut cache)
        .unwrap();

    assert_eq!(report.groups, 1);
    let lookup = cache.get(&["body", "title"]).unwrap();
    for translation in lookup.values() {
        let translation = translation.as_ref().unwrap();
        assert_eq!(translation.language(), Some(&lang("en-us")));
    }
    assert_eq!(lookup["title"].as_ref().unwrap().text(), "Title");

    let group_reads = store
        .reads()
        .into_iter()
        .filter(|access| matches!(access, StoreAccess::Group(..)))
        .count();
    assert_eq!(group_reads, 2);
}

/// Invariant: an expired record hydrates nothing, even with valid blobs on disk
#[test]
fn invariant_expired_meta_yields_cold_load() {
    let store = Arc::new(MemoryStore::new());
    let mut seeded = RequestCache::new();
    seeded.set(entries(&[("greeting", "Hello")], "en"));
    let saved_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    engine(&store)
        .save_at("app", &seeded, saved_at)
        .unwrap();

    let mut engine = engine(&store);
    let mut cache = RequestCache::new();
    let report = engine
        .load_at(
            "app",
            &[lang("en")],
            &mut cache,
            saved_at + ChronoDuration::hours(2),
        )
        .unwrap();

    assert_eq!(report.state, LoadState::Expired);
    assert!(cache.is_empty());
    assert!(engine.loaded_meta().is_none());

    // The dropped record is not trusted for the idempotency check either
    cache.set(entries(&[("greeting", "Hello")], "en"));
    assert!(matches!(
        engine.save("app", &cache).unwrap(),
        SaveOutcome::Written { .. }
    ));
}

/// Invariant: a failing group read costs only that group
#[test]
fn invariant_storage_failure_isolation() {
    let store = Arc::new(MemoryStore::new());
    let broken = Checksum::of_key_set(["x", "y"]);
    let healthy = Checksum::of_key_set(["title", "body"]);
    store.insert_meta(
        "app",
        fresh_meta(&["greeting"], &[broken.clone(), healthy.clone()]),
    );
    store.insert_single("app", &lang("en"), entries(&[("greeting", "Hello")], "en"));
    store.insert_group(&broken, &lang("en"), entries(&[("x", "X"), ("y", "Y")], "en"));
    store.insert_group(
        &healthy,
        &lang("en"),
        entries(&[("title", "Title"), ("body", "Body")], "en"),
    );
    store.fail_group(&broken);

    let mut cache = RequestCache::new();
    let report = engine(&store)
        .load("app", &[lang("en")], &mut cache)
        .unwrap();

    assert_eq!(report.state, LoadState::Ready);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].is_storage_unavailable());
    assert!(cache.has(&["greeting"]));
    assert!(cache.has(&["title", "body"]));
    assert!(!cache.has(&["x", "y"]));
}
