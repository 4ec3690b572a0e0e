use worldstore::{
    config::WorldConfig,
    naming::{bytearray_hash, selector_from_names},
    obs::{WorldEvent, metrics_report, metrics_reset_all},
    prelude::*,
    world::World,
};

const NS: &str = "arena";

#[derive(Clone, Debug, Eq, Introspect, Model, PartialEq)]
struct Position {
    #[key]
    player: ContractAddress,
    x: u32,
    y: u32,
}

#[derive(Clone, Debug, Eq, IntrospectPacked, Model, PartialEq)]
struct Moves {
    #[key]
    player: ContractAddress,
    remaining: u8,
    last: (u16, u16),
}

fn admin() -> ContractAddress {
    ContractAddress::from(0xad_u64)
}

fn designer() -> ContractAddress {
    ContractAddress::from(0xde_u64)
}

fn actions() -> ContractAddress {
    ContractAddress::from(0xac_u64)
}

fn player(n: u64) -> ContractAddress {
    ContractAddress::from(0x1000 + n)
}

// designer owns `arena`, the actions contract may write every model in it
fn arena() -> World<worldstore::storage::MemoryStorage> {
    let mut world = World::in_memory(admin());
    let namespace = world.register_namespace(designer(), NS).unwrap();
    world
        .register::<Position>(designer(), NS, ContractAddress::from(1_u64))
        .unwrap();
    world
        .register::<Moves>(designer(), NS, ContractAddress::from(2_u64))
        .unwrap();
    world
        .register_contract(designer(), NS, "actions", actions())
        .unwrap();
    world.grant_writer(designer(), namespace, actions()).unwrap();
    world.events_mut().drain();

    world
}

#[test]
fn system_moves_player_and_indexer_sees_it() {
    let mut world = arena();
    let start = Position {
        player: player(1),
        x: 10,
        y: 10,
    };

    world.write_model(actions(), NS, &start).unwrap();
    world
        .write_member::<Position, u32>(actions(), NS, start.entity_id(), "x", &11)
        .unwrap();

    let now: Position = world.read_model(NS, &player(1)).unwrap();
    assert_eq!(now.x, 11);
    assert_eq!(now.y, 10);

    let selector = selector_from_names(NS, "Position");
    let events = world.events_mut().drain();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|event| event.selector() == Some(selector)));
    assert!(matches!(events[0], WorldEvent::StoreSetRecord { .. }));
    assert!(matches!(events[1], WorldEvent::StoreUpdateMember { .. }));
}

#[test]
fn players_cannot_write_directly() {
    let mut world = arena();

    let err = world
        .write_model(
            player(1),
            NS,
            &Position {
                player: player(1),
                x: 0,
                y: 0,
            },
        )
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert!(err.message.contains("arena-Position"));
}

#[test]
fn listing_follows_creates_and_deletes() {
    let mut world = arena();
    let records: Vec<Moves> = (0..4)
        .map(|n| Moves {
            player: player(n),
            remaining: 3,
            last: (u16::try_from(n).unwrap(), 0),
        })
        .collect();

    for record in &records {
        world.write_model(actions(), NS, record).unwrap();
    }
    world.erase_model(actions(), NS, &records[1]).unwrap();

    let selector = Moves::selector(bytearray_hash(NS));
    let mut ids = world.entity_ids(selector).unwrap();
    ids.sort();
    let mut expected: Vec<Felt> = [0, 2, 3].iter().map(|&n| records[n].entity_id()).collect();
    expected.sort();
    assert_eq!(ids, expected);

    for (id, values) in world.entities(selector, &Moves::layout()).unwrap() {
        let record = records
            .iter()
            .find(|record| record.entity_id() == id)
            .unwrap();
        assert_eq!(values, record.values());
    }
}

#[test]
fn toml_config_drives_the_world() {
    let config = WorldConfig::from_toml_str(
        r"
        storage_domain = 7
        index_domain = 8
        zero_stale_index_slots = true
        ",
    )
    .unwrap();
    let mut world = World::with_config(
        worldstore::storage::MemoryStorage::new(),
        worldstore::permission::ResourceRegistry::new(admin()),
        worldstore::obs::EventLog::new(),
        &config,
    );
    world.register_namespace(designer(), NS).unwrap();
    world
        .register::<Moves>(designer(), NS, ContractAddress::from(2_u64))
        .unwrap();

    let record = Moves {
        player: player(1),
        remaining: 1,
        last: (2, 3),
    };
    world.write_model(designer(), NS, &record).unwrap();
    world.erase_model(designer(), NS, &record).unwrap();

    // record and index slots are all cleared again, secondary lists remain
    assert_eq!(world.storage().occupied(7), 0);
    assert_eq!(world.storage().occupied(8), 2);
}

#[test]
fn metrics_count_world_traffic() {
    metrics_reset_all();
    let mut world = arena();
    let record = Position {
        player: player(1),
        x: 1,
        y: 1,
    };

    world.write_model(actions(), NS, &record).unwrap();
    let _: Position = world.read_model(NS, &player(1)).unwrap();
    let _ = world.write_model(player(2), NS, &record);

    let report = metrics_report();
    assert_eq!(report.ops.entity_writes, 1);
    assert_eq!(report.ops.entity_reads, 1);
    assert_eq!(report.ops.permission_denials, 1);
    assert_eq!(report.ops.index_inserts, 1);
}
