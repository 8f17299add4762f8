//! Integration tests for the directory catalog
//!
//! Uses real files in scratch directories: fake MP3s that carry no readable
//! tags, and small PCM WAV files whose duration lofty can read.

use beatbox_core::{BeatboxError, TrackCatalog, UNKNOWN_ARTIST};
use beatbox_library::DirectoryCatalog;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ===== Helpers =====

/// Write a silent 8 kHz mono 16-bit WAV of `millis` length
fn write_wav(path: &Path, millis: u32) {
    let sample_rate = 8_000u32;
    let data_len = sample_rate * 2 * millis / 1_000;

    let mut bytes = Vec::with_capacity(44 + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.resize(44 + data_len as usize, 0);

    fs::write(path, bytes).unwrap();
}

fn titles(catalog: &DirectoryCatalog) -> Vec<String> {
    catalog
        .scan()
        .unwrap()
        .into_iter()
        .map(|track| track.display_name)
        .collect()
}

// ===== Tests =====

#[test]
fn empty_directory_yields_no_tracks() {
    let temp = TempDir::new().unwrap();
    let catalog = DirectoryCatalog::new(vec![temp.path().to_path_buf()]);

    assert!(catalog.scan().unwrap().is_empty());
}

#[test]
fn tracks_are_sorted_by_title_ignoring_case() {
    let temp = TempDir::new().unwrap();
    for name in ["so what.mp3", "All Blues.flac", "blue in green.ogg", "Flamenco Sketches.m4a"] {
        fs::write(temp.path().join(name), b"fake").unwrap();
    }
    fs::write(temp.path().join("liner notes.txt"), b"not audio").unwrap();

    let catalog = DirectoryCatalog::new(vec![temp.path().to_path_buf()]);

    assert_eq!(
        titles(&catalog),
        vec!["All Blues", "blue in green", "Flamenco Sketches", "so what"]
    );
}

#[test]
fn equal_titles_are_ordered_by_path() {
    let temp = TempDir::new().unwrap();
    let a = temp.path().join("a");
    let b = temp.path().join("b");
    fs::create_dir_all(&a).unwrap();
    fs::create_dir_all(&b).unwrap();
    fs::write(b.join("Intro.mp3"), b"fake").unwrap();
    fs::write(a.join("Intro.mp3"), b"fake").unwrap();

    let tracks = DirectoryCatalog::new(vec![temp.path().to_path_buf()])
        .scan()
        .unwrap();

    assert_eq!(tracks.len(), 2);
    assert!(tracks[0].resource.as_str() < tracks[1].resource.as_str());
    assert_ne!(tracks[0].id, tracks[1].id);
}

#[test]
fn untagged_tracks_use_unknown_artist() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("untitled.mp3"), b"fake").unwrap();

    let tracks = DirectoryCatalog::new(vec![temp.path().to_path_buf()])
        .scan()
        .unwrap();

    assert_eq!(tracks[0].artist(), UNKNOWN_ARTIST);
    assert!(tracks[0].artist.is_none());
}

#[test]
fn short_clips_are_skipped() {
    let temp = TempDir::new().unwrap();
    write_wav(&temp.path().join("ringtone.wav"), 1_000);
    fs::write(temp.path().join("unknown length.mp3"), b"fake").unwrap();

    let catalog = DirectoryCatalog::new(vec![temp.path().to_path_buf()]);
    // Default minimum is 30 s; files of unknown length are kept
    assert_eq!(titles(&catalog), vec!["unknown length"]);

    let lenient = catalog.min_duration_ms(500);
    let tracks = lenient.scan().unwrap();
    assert_eq!(tracks.len(), 2);

    let ringtone = tracks
        .iter()
        .find(|track| track.display_name == "ringtone")
        .unwrap();
    assert!(ringtone.duration().is_some());
}

#[test]
fn overlapping_directories_do_not_duplicate_tracks() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("jazz");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("Take Five.mp3"), b"fake").unwrap();

    let catalog = DirectoryCatalog::new(vec![temp.path().to_path_buf(), nested]);

    assert_eq!(titles(&catalog), vec!["Take Five"]);
}

#[test]
fn ids_survive_rescans() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.mp3"), b"fake").unwrap();
    fs::write(temp.path().join("b.mp3"), b"fake").unwrap();

    let catalog = DirectoryCatalog::new(vec![temp.path().to_path_buf()]);
    let first: Vec<_> = catalog.scan().unwrap().into_iter().map(|t| t.id).collect();
    let second: Vec<_> = catalog.scan().unwrap().into_iter().map(|t| t.id).collect();

    assert_eq!(first, second);
}

#[test]
fn missing_directory_is_a_query_failure() {
    let temp = TempDir::new().unwrap();
    let catalog = DirectoryCatalog::new(vec![temp.path().join("nowhere")]);

    let err = catalog.scan().unwrap_err();
    assert!(matches!(err, BeatboxError::QueryFailed(_)));
}
