use time::macros::datetime;
use witter::{SocialStore, StoreOptions, User, UserId};

fn store() -> SocialStore {
    let mut store = SocialStore::open(StoreOptions::default()).expect("open store");
    store.add_user(User::new(1, "Ada Lovelace", datetime!(2018-03-01 0:00 UTC)));
    store.add_user(User::new(2, "Grace Hopper", datetime!(2019-07-15 12:00 UTC)));
    store.add_user(User::new(3, "Alan Turing", datetime!(2017-11-20 8:30 UTC)));
    store.add_user(User::new(4, "adaline", datetime!(2020-01-01 0:00 UTC)));
    store
}

fn ids(users: &[User]) -> Vec<UserId> {
    users.iter().map(|user| user.id).collect()
}

#[test]
fn users_listed_newest_first() {
    assert_eq!(ids(&store().all_users()), vec![4, 2, 1, 3]);
}

#[test]
fn name_search_is_case_insensitive() {
    let store = store();
    assert_eq!(ids(&store.users_containing("ADA")), vec![4, 1]);
    assert!(store.users_containing("zed").is_empty());
}

#[test]
fn joined_before_is_strict() {
    let store = store();
    assert_eq!(
        ids(&store.users_joined_before(datetime!(2019-07-15 12:00 UTC))),
        vec![1, 3]
    );
    assert!(store
        .users_joined_before(datetime!(2000-01-01 0:00 UTC))
        .is_empty());
}

#[test]
fn duplicate_user_id_is_rejected() {
    let mut store = store();
    assert!(!store.add_user(User::new(2, "Impostor", datetime!(2021-01-01 0:00 UTC))));
    assert_eq!(store.user(2).map(|user| user.name), Some("Grace Hopper".to_string()));
    assert_eq!(store.stats().users, 4);
    assert!(store.user(9).is_none());
}
