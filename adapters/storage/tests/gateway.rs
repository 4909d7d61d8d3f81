use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use geocoin_core::{CellCoord, Command, HOME};
use geocoin_storage::{
    FileStore, Gateway, MemoryStore, StateStore, StorageError, CACHE_DATA_KEY, INVENTORY_KEY,
};
use geocoin_world::{self as world, query, CacheWorld, World, WorldSnapshot};
use proptest::prelude::*;

fn temp_dir(prefix: &str) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("duration")
        .as_nanos();
    std::env::temp_dir().join(format!("geocoin-storage-tests-{prefix}-{unique}"))
}

fn sites(count: usize) -> Vec<CellCoord> {
    (0..)
        .map(|i| CellCoord::new(-i, 40))
        .filter(|cell| CacheWorld::should_spawn(*cell))
        .take(count)
        .collect()
}

#[test]
fn empty_store_loads_empty_state() {
    let gateway = Gateway::new(MemoryStore::new());
    assert_eq!(gateway.load().expect("load"), WorldSnapshot::default());
}

#[test]
fn malformed_blob_is_discarded_independently() {
    let mut store = MemoryStore::new();
    store
        .write(CACHE_DATA_KEY, r#"[["0,0", "not coins"]]"#)
        .expect("write");
    store
        .write(INVENTORY_KEY, r#"[{"i":1,"j":2,"index":3}]"#)
        .expect("write");
    let gateway = Gateway::new(store);

    let snapshot = gateway.load().expect("malformed state never fails startup");

    assert!(snapshot.caches.is_empty());
    assert_eq!(snapshot.inventory.len(), 1);
    assert_eq!(snapshot.inventory[0].origin(), CellCoord::new(1, 2));
    assert_eq!(snapshot.inventory[0].index(), 3);
}

#[test]
fn clear_removes_both_blobs() {
    let mut gateway = Gateway::new(MemoryStore::new());
    let mut world = World::new();
    let _ = world.take_any(sites(1)[0]);
    gateway.save(&query::snapshot(&world)).expect("save");
    assert!(gateway.store().read(CACHE_DATA_KEY).expect("read").is_some());

    gateway.clear().expect("clear");

    assert_eq!(gateway.store().read(CACHE_DATA_KEY).expect("read"), None);
    assert_eq!(gateway.store().read(INVENTORY_KEY).expect("read"), None);
    assert_eq!(gateway.load().expect("load"), WorldSnapshot::default());
}

#[test]
fn file_store_survives_a_restart() {
    let dir = temp_dir("restart");
    let cell = sites(1)[0];

    let expected = {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(&mut world, Command::MoveTo { position: HOME }, &mut events);
        world::apply(&mut world, Command::TakeAny { cell }, &mut events);
        let snapshot = world.teardown();
        let mut gateway = Gateway::new(FileStore::new(&dir));
        gateway.save(&snapshot).expect("save");
        snapshot
    };

    let gateway = Gateway::new(FileStore::new(&dir));
    let restored = World::from_snapshot(HOME, gateway.load().expect("load"));
    assert_eq!(query::snapshot(&restored), expected);
    assert!(dir.join("cacheData.json").exists());
    assert!(dir.join("inventory.json").exists());
    assert!(!dir.join("cacheData.json.tmp").exists());

    fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn non_utf8_blob_is_discarded_on_load() {
    let dir = temp_dir("non-utf8");
    fs::create_dir_all(&dir).expect("create dir");
    fs::write(dir.join("inventory.json"), [0xff, 0xfe, b'[', b']']).expect("write bytes");
    fs::write(dir.join("cacheData.json"), r#"[["2,0",[{"i":2,"j":0,"index":1}]]]"#)
        .expect("write cache data");

    let snapshot = Gateway::new(FileStore::new(&dir))
        .load()
        .expect("undecodable bytes never fail startup");

    assert!(snapshot.inventory.is_empty());
    assert_eq!(snapshot.caches.len(), 1);
    assert_eq!(snapshot.caches[0].0, CellCoord::new(2, 0));

    fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn non_utf8_blob_reads_as_malformed() {
    let dir = temp_dir("non-utf8-read");
    fs::create_dir_all(&dir).expect("create dir");
    fs::write(dir.join("inventory.json"), [0xff, 0xfe]).expect("write bytes");

    let error = FileStore::new(&dir)
        .read(INVENTORY_KEY)
        .expect_err("invalid text");

    assert!(matches!(error, StorageError::Malformed { key: "inventory", .. }));
    fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn file_store_treats_missing_keys_as_absent() {
    let mut store = FileStore::new(temp_dir("missing"));
    assert_eq!(store.read(INVENTORY_KEY).expect("read"), None);
    store.remove(INVENTORY_KEY).expect("removing a missing key succeeds");
}

#[derive(Clone, Debug)]
enum Action {
    Take(usize),
    Give(usize),
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0..3usize).prop_map(Action::Take),
        (0..3usize).prop_map(Action::Give),
    ]
}

proptest! {
    #[test]
    fn reachable_states_round_trip(actions in proptest::collection::vec(action(), 0..40)) {
        let sites = sites(3);
        let mut world = World::new();
        for action in actions {
            let command = match action {
                Action::Take(site) => Command::TakeAny { cell: sites[site] },
                Action::Give(site) => Command::GiveAny { cell: sites[site] },
            };
            let mut events = Vec::new();
            world::apply(&mut world, command, &mut events);
        }

        let snapshot = query::snapshot(&world);
        let mut gateway = Gateway::new(MemoryStore::new());
        gateway.save(&snapshot).expect("save");
        let loaded = gateway.load().expect("load");

        prop_assert_eq!(&loaded, &snapshot);
        let restored = World::from_snapshot(HOME, loaded);
        prop_assert_eq!(query::inventory(&restored), query::inventory(&world));
        prop_assert_eq!(query::total_coins(&restored), query::total_coins(&world));
    }
}
