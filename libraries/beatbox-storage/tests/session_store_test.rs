//! Integration tests for the session stores

use beatbox_core::{LastPlayed, SessionStore};
use beatbox_storage::{JsonSessionStore, MemorySessionStore};
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

#[test]
fn missing_file_reads_as_nothing_played() {
    let temp = TempDir::new().unwrap();
    let store = JsonSessionStore::new(temp.path().join("last_played.json"));

    let last = store.get().unwrap();
    assert_eq!(last.name, None);
    assert_eq!(last.artist, None);
}

#[test]
fn put_then_get_returns_latest_record() {
    let temp = TempDir::new().unwrap();
    let store = JsonSessionStore::new(temp.path().join("last_played.json"));

    store.put("So What", "Miles Davis").unwrap();
    store.put("Take Five", "Dave Brubeck").unwrap();

    assert_eq!(store.get().unwrap(), LastPlayed::new("Take Five", "Dave Brubeck"));
}

#[test]
fn record_survives_a_new_store_instance() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("last_played.json");

    JsonSessionStore::new(&path).put("Naima", "John Coltrane").unwrap();

    let reopened = JsonSessionStore::new(&path);
    assert_eq!(reopened.get().unwrap(), LastPlayed::new("Naima", "John Coltrane"));
}

#[test]
fn parent_directories_are_created() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("data").join("state").join("last_played.json");
    let store = JsonSessionStore::new(&path);

    store.put("Alone Together", "Chet Baker").unwrap();
    assert!(path.exists());
}

#[test]
fn file_uses_documented_field_names() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("last_played.json");
    JsonSessionStore::new(&path).put("Moanin'", "Art Blakey").unwrap();

    let json: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(json["last_track_name"], "Moanin'");
    assert_eq!(json["last_track_artist"], "Art Blakey");
    assert!(json["played_at"].is_string());
}

#[test]
fn corrupt_file_reads_as_nothing_played() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("last_played.json");
    fs::write(&path, b"{ half a record").unwrap();
    let store = JsonSessionStore::new(&path);

    assert!(store.read_record().is_err());
    assert!(store.get().unwrap().is_empty());

    // The next write replaces the damaged file
    store.put("Round Midnight", "Thelonious Monk").unwrap();
    assert_eq!(
        store.get().unwrap().name.as_deref(),
        Some("Round Midnight")
    );
}

#[test]
fn concurrent_writers_never_tear_the_record() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(JsonSessionStore::new(temp.path().join("last_played.json")));

    let writers: Vec<_> = (0..4)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for j in 0..20 {
                    store.put(&format!("Track {i}-{j}"), &format!("Artist {i}")).unwrap();
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let record = store.read_record().unwrap().unwrap();
    assert!(record.last_track_name.starts_with("Track "));
}

#[test]
fn memory_store_behaves_like_json_store() {
    let temp = TempDir::new().unwrap();
    let stores: Vec<Box<dyn SessionStore>> = vec![
        Box::new(MemorySessionStore::new()),
        Box::new(JsonSessionStore::new(temp.path().join("last.json"))),
    ];

    for store in stores {
        assert!(store.get().unwrap().is_empty());
        store.put("Autumn Leaves", "Cannonball Adderley").unwrap();
        assert_eq!(
            store.get().unwrap(),
            LastPlayed::new("Autumn Leaves", "Cannonball Adderley")
        );
    }
}
