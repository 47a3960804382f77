//! Tests for SharedStore
//!
//! These tests verify:
//! - Concurrent inserts from several threads all land
//! - Concurrent reads of the same derived resolution compute it once

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;
use std::thread;

use common::{fake_image, reopen, setup_store};
use imgstore::{ListMode, Resolution, SharedStore};

#[test]
fn test_concurrent_inserts() {
    let (_temp, path, store, codec) = setup_store(64);
    let shared = Arc::new(SharedStore::new(store));

    let handles: Vec<_> = (0..8u32)
        .map(|t| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for i in 0..8u32 {
                    let img = fake_image(10 + t, 10 + i, &[t as u8, i as u8]);
                    shared.insert(&img, &format!("t{}-{}", t, i)).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let mut store = Arc::try_unwrap(shared).ok().unwrap().into_inner();
    assert_eq!(store.header().num_files, 64);
    assert!(store.header().is_full());
    store.close();

    let mut store = reopen(&path, &codec);
    assert_eq!(store.header().num_files, 64);
    let img = store.read("t3-5", Resolution::Original).unwrap();
    assert_eq!(img, fake_image(13, 15, &[3, 5]));
}

#[test]
fn test_concurrent_reads_materialize_once() {
    let (_temp, _path, store, codec) = setup_store(4);
    let shared = Arc::new(SharedStore::new(store));
    shared.insert(&fake_image(800, 600, b"pic"), "pic").unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || shared.read("pic", Resolution::Small).unwrap())
        })
        .collect();

    let results: Vec<Vec<u8>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert!(results.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(codec.resize_count(), 1);
}

#[test]
fn test_shared_delete_and_list() {
    let (_temp, _path, store, _codec) = setup_store(4);
    let shared = SharedStore::new(store);
    shared.insert(&fake_image(1, 1, b"a"), "a").unwrap();
    shared.insert(&fake_image(1, 1, b"b"), "b").unwrap();

    shared.delete("a").unwrap();

    assert_eq!(shared.list(ListMode::Json).unwrap(), r#"{"Images":["b"]}"#);
    assert_eq!(shared.with(|store| store.header().num_files), 1);
}
