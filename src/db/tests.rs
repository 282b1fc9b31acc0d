use std::thread;

use super::*;
use crate::error::WitterError;
use crate::model::{Post, User};
use crate::storage::StoreOptions;
use time::macros::datetime;

#[test]
fn open_rejects_zero_buckets() {
    let err = SocialStore::open(StoreOptions::new().content_buckets(0)).unwrap_err();
    assert!(matches!(err, WitterError::InvalidArgument(_)));
}

#[test]
fn stats_reflect_every_store() {
    let mut store = SocialStore::open(StoreOptions::default()).expect("open store");
    store.add_user(User::new(1, "ada", datetime!(2019-01-01 0:00 UTC)));
    store.add_user(User::new(2, "bob", datetime!(2019-01-02 0:00 UTC)));
    store.follow(1, 2, datetime!(2020-01-01 0:00 UTC));
    store.follow(3, 2, datetime!(2020-01-02 0:00 UTC));
    store.add_post(Post::new(1, 1, "hi #rust", datetime!(2020-02-01 0:00 UTC)));
    store.add_post(Post::new(2, 1, "#Rust again #news", datetime!(2020-02-02 0:00 UTC)));

    let stats = store.stats();
    assert_eq!(stats.users, 2);
    assert_eq!(stats.related_users, 3);
    assert_eq!(stats.follows, 2);
    assert_eq!(stats.posts, 2);
    assert_eq!(stats.authors, 1);
    assert_eq!(stats.tags, 2);
    assert_eq!(stats.relation_index.entries, 3);
    assert_eq!(stats.content_index.entries, 1);
}

#[test]
fn shared_store_serves_concurrent_readers() {
    let shared = SharedStore::open(StoreOptions::default()).expect("open store");
    shared.write(|store| {
        for follower in 1..=50 {
            store.follow(follower, 0, datetime!(2020-01-01 0:00 UTC));
        }
    });

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let reader = shared.clone();
            thread::spawn(move || reader.read(|store| store.follower_count(0)))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().expect("reader thread"), 50);
    }
}
