//! Tests for name and content deduplication
//!
//! These tests verify:
//! - dedup_slot on in-memory slot arrays
//! - Identical content inserted under two ids is stored once
//! - Deleting one of the sharers keeps the other readable

#[path = "../common/mod.rs"]
mod common;

use common::{fake_image, file_len, reopen, setup_store};
use imgstore::dedup::{content_hash, dedup_slot, same_content};
use imgstore::layout::{MetadataSlot, Resolution};
use imgstore::ImgStoreError;

// =============================================================================
// Helper Functions
// =============================================================================

fn stored(img_id: &str, data: &[u8], offset: u64) -> MetadataSlot {
    let mut slot = MetadataSlot::claim(img_id, content_hash(data), data.len() as u32);
    slot.offset[Resolution::Original.index()] = offset;
    slot
}

// =============================================================================
// Hash Tests
// =============================================================================

#[test]
fn test_content_hash_is_sha256() {
    // SHA-256 of the empty string
    assert_eq!(
        hex::encode(content_hash(b"")),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
    assert!(same_content(&content_hash(b"abc"), &content_hash(b"abc")));
    assert!(!same_content(&content_hash(b"abc"), &content_hash(b"abd")));
}

// =============================================================================
// dedup_slot Tests
// =============================================================================

#[test]
fn test_dedup_no_match_resets_original_offset() {
    let mut slots = vec![stored("a", b"one", 1000), MetadataSlot::default()];
    let mut target = MetadataSlot::claim("b", content_hash(b"two"), 3);
    target.offset[Resolution::Original.index()] = 42;
    slots[1] = target;

    let reference = dedup_slot(&mut slots, 1).unwrap();

    assert_eq!(reference, None);
    assert_eq!(slots[1].offset_of(Resolution::Original), 0);
}

#[test]
fn test_dedup_content_match_copies_ranges() {
    let mut source = stored("a", b"same", 1000);
    source.size[Resolution::Thumbnail.index()] = 7;
    source.offset[Resolution::Thumbnail.index()] = 2000;

    let mut slots = vec![source.clone(), MetadataSlot::claim("b", content_hash(b"same"), 4)];

    let reference = dedup_slot(&mut slots, 1).unwrap();

    assert_eq!(reference, Some(0));
    assert_eq!(slots[1].offset, source.offset);
    assert_eq!(slots[1].size, source.size);
    assert_eq!(slots[1].img_id, "b");
}

#[test]
fn test_dedup_duplicate_id() {
    let mut slots = vec![
        stored("a", b"one", 1000),
        MetadataSlot::claim("a", content_hash(b"two"), 3),
    ];

    let result = dedup_slot(&mut slots, 1);
    assert!(matches!(result, Err(ImgStoreError::DuplicateId)));
}

#[test]
fn test_dedup_id_collision_wins_over_earlier_content_match() {
    let mut slots = vec![
        stored("x", b"same", 1000),
        stored("b", b"other", 2000),
        MetadataSlot::claim("b", content_hash(b"same"), 4),
    ];

    let result = dedup_slot(&mut slots, 2);
    assert!(matches!(result, Err(ImgStoreError::DuplicateId)));
}

#[test]
fn test_dedup_picks_lowest_index_match() {
    let mut slots = vec![
        MetadataSlot::default(),
        stored("a", b"same", 1000),
        stored("b", b"same", 3000),
        MetadataSlot::claim("c", content_hash(b"same"), 4),
    ];

    assert_eq!(dedup_slot(&mut slots, 3).unwrap(), Some(1));
    assert_eq!(slots[3].offset_of(Resolution::Original), 1000);
}

#[test]
fn test_dedup_ignores_empty_slots() {
    let mut dead = stored("a", b"same", 1000);
    dead.state = imgstore::layout::SlotState::Empty;
    let mut slots = vec![dead, MetadataSlot::claim("a", content_hash(b"same"), 4)];

    assert_eq!(dedup_slot(&mut slots, 1).unwrap(), None);
}

#[test]
fn test_dedup_index_out_of_range() {
    let mut slots = vec![MetadataSlot::default()];
    let result = dedup_slot(&mut slots, 5);
    assert!(matches!(result, Err(ImgStoreError::InvalidArgument(_))));
}

// =============================================================================
// Store-level Tests
// =============================================================================

#[test]
fn test_same_content_stored_once() {
    let (_temp, path, mut store, _codec) = setup_store(4);
    let img = fake_image(800, 600, b"shared bytes");

    let a = store.insert(&img, "a").unwrap();
    let len_after_first = file_len(&path);
    let b = store.insert(&img, "b").unwrap();

    assert_eq!(file_len(&path), len_after_first);
    assert_eq!(
        store.slot(a).unwrap().offset_of(Resolution::Original),
        store.slot(b).unwrap().offset_of(Resolution::Original)
    );
    assert_eq!(store.slot(b).unwrap().res_orig, (800, 600));
    assert_eq!(store.header().num_files, 2);
    assert_eq!(store.read("b", Resolution::Original).unwrap(), img);
}

#[test]
fn test_dedup_shares_materialized_resolutions() {
    let (_temp, path, mut store, codec) = setup_store(4);
    let img = fake_image(800, 600, b"shared bytes");

    store.insert(&img, "a").unwrap();
    let thumb = store.read("a", Resolution::Thumbnail).unwrap();
    let len = file_len(&path);

    let b = store.insert(&img, "b").unwrap();

    assert!(store.slot(b).unwrap().has(Resolution::Thumbnail));
    assert_eq!(store.read("b", Resolution::Thumbnail).unwrap(), thumb);
    assert_eq!(codec.resize_count(), 1);
    assert_eq!(file_len(&path), len);
}

#[test]
fn test_delete_one_sharer_keeps_other() {
    let (_temp, path, mut store, codec) = setup_store(4);
    let img = fake_image(100, 100, b"shared");
    store.insert(&img, "a").unwrap();
    store.insert(&img, "b").unwrap();

    store.delete("a").unwrap();
    assert_eq!(store.read("b", Resolution::Original).unwrap(), img);

    drop(store);
    let mut store = reopen(&path, &codec);
    assert_eq!(store.read("b", Resolution::Original).unwrap(), img);
}

#[test]
fn test_different_content_is_appended() {
    let (_temp, path, mut store, _codec) = setup_store(4);
    let img1 = fake_image(10, 10, b"one");
    let img2 = fake_image(10, 10, b"two");

    store.insert(&img1, "a").unwrap();
    let len = file_len(&path);
    store.insert(&img2, "b").unwrap();

    assert_eq!(file_len(&path), len + img2.len() as u64);
}
