//! End-to-end sessions against the filesystem store

use lexis_cache::{
    CacheConfig, CacheEngine, CacheSession, Checksum, FileStore, LoadState, SaveOutcome,
    TranslationMap, TranslationStore,
};
use lexis_core::{Language, ProcessorId, Translation};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn lang(tag: &str) -> Language {
    Language::parse(tag).unwrap()
}

fn engine(base: &Path) -> CacheEngine<FileStore> {
    CacheEngine::from_config(
        CacheConfig::builder()
            .with_base_dir(base)
            .with_ttl(Duration::from_secs(600))
            .build(),
    )
}

fn batch(items: &[(&str, &str)], tag: &str) -> TranslationMap {
    items
        .iter()
        .map(|(k, v)| {
            let translation = Translation::new(*v)
                .with_language(lang(tag))
                .detect_processors();
            (k.to_string(), translation)
        })
        .collect()
}

#[test]
fn test_session_round_trip_through_files() {
    let temp = TempDir::new().unwrap();
    let preferences = [lang("de"), lang("en")];

    {
        let mut session = CacheSession::open(engine(temp.path()), "web", &preferences);
        let cache = session.request_cache_mut();
        cache.set(batch(&[("welcome", "Hallo {name}")], "de"));
        cache.set(batch(&[("logout", "Log out")], "en"));
        cache.set(batch(&[("title", "Titel"), ("body", "Inhalt")], "de"));
    }

    let root = temp.path();
    assert!(root.join("web/meta.json").is_file());
    assert!(root.join("web/de-de.json").is_file());
    assert!(root.join("web/en-en.json").is_file());
    let group = Checksum::of_key_set(["title", "body"]);
    assert!(root.join("groups").join(group.as_str()).join("de-de.json").is_file());

    let session = CacheSession::open(engine(temp.path()), "web", &preferences);
    let report = session.load_report().unwrap();
    assert_eq!(report.state, LoadState::Ready);
    assert_eq!((report.singles, report.groups), (2, 1));

    let cache = session.request_cache();
    let welcome = &cache.single_translations()["welcome"];
    assert_eq!(welcome.text(), "Hallo {name}");
    assert_eq!(welcome.language(), Some(&lang("de")));
    assert_eq!(welcome.processors(), &[ProcessorId::replace()]);
    assert!(cache.has(&["body", "title"]));

    assert_eq!(session.finish().unwrap(), SaveOutcome::Unchanged);
}

#[test]
fn test_corrupt_blob_is_treated_as_miss() {
    let temp = TempDir::new().unwrap();
    let preferences = [lang("fr"), lang("en")];

    {
        let mut session = CacheSession::open(engine(temp.path()), "web", &preferences);
        session.request_cache_mut().set(batch(&[("a", "A-fr")], "fr"));
        session.request_cache_mut().set(batch(&[("b", "B-en")], "en"));
    }
    fs::write(temp.path().join("web/fr-fr.json"), b"\x00garbage").unwrap();

    let session = CacheSession::open(engine(temp.path()), "web", &preferences);
    let report = session.load_report().unwrap();

    assert!(report.errors.is_empty());
    assert!(!session.request_cache().has(&["a"]));
    assert!(session.request_cache().has(&["b"]));
}

#[test]
fn test_unreachable_store_degrades_to_cold_session() {
    let temp = TempDir::new().unwrap();
    // A regular file where the cache root directory should be
    let blocked = temp.path().join("blocked");
    fs::write(&blocked, b"").unwrap();

    let mut session = CacheSession::open(engine(&blocked), "web", &[lang("en")]);
    assert!(session.request_cache().is_empty());
    session.request_cache_mut().set(batch(&[("a", "A")], "en"));

    let err = session.finish().unwrap_err();
    assert!(err.is_storage_unavailable());
}

#[test]
fn test_previous_record_survives_failed_group_save() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path());
    let good = batch(&[("a", "A")], "en");
    store.save_single("web", &good).unwrap();

    let mut mixed = batch(&[("x", "X")], "en");
    mixed.extend(batch(&[("y", "Y")], "de"));
    let id = Checksum::of_key_set(mixed.keys());
    assert!(store.save_group(&id, &mixed).is_err());

    assert_eq!(store.load_single("web", &lang("en")).unwrap(), good);
}
