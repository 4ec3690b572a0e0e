use super::*;
use crate::{
    error::{ErrorClass, ErrorOrigin},
    hash::combine_key,
    meta::{FieldLayout, Introspect},
    model::Model,
    naming::{bytearray_hash, selector_from_name},
    obs::sink::{MetricsEvent, MetricsSink, with_metrics_sink},
    storage::entity_base_address,
};
use std::{cell::RefCell, rc::Rc};
use worldstore_derive::{Introspect, IntrospectPacked, Model};

const NS: &str = "ns";

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
    can_move: bool,
}

#[derive(Clone, Debug, Eq, Introspect, Model, PartialEq)]
struct Profile {
    #[key]
    player: ContractAddress,
    name: String,
    scores: Vec<u16>,
}

fn creator() -> ContractAddress {
    ContractAddress::from(0xc0de_u64)
}

fn alice() -> ContractAddress {
    ContractAddress::from(0xa11ce_u64)
}

fn bob() -> ContractAddress {
    ContractAddress::from(0xb0b_u64)
}

// world with namespace `ns` owned by alice and the three models registered
fn world() -> World<MemoryStorage> {
    let mut world = World::in_memory(creator());
    world.register_namespace(alice(), NS).unwrap();
    world
        .register::<Position>(alice(), NS, ContractAddress::from(1_u64))
        .unwrap();
    world
        .register::<Moves>(alice(), NS, ContractAddress::from(2_u64))
        .unwrap();
    world
        .register::<Profile>(alice(), NS, ContractAddress::from(3_u64))
        .unwrap();
    world.events_mut().drain();

    world
}

fn position_selector() -> Felt {
    Position::selector(bytearray_hash(NS))
}

fn position(x: u32, y: u32) -> Position {
    Position {
        player: alice(),
        x,
        y,
    }
}

// ----------------------------------------------------------------------
// dispatch
// ----------------------------------------------------------------------

#[test]
fn keys_write_indexes_and_emits_set_record() {
    let mut world = world();
    let record = position(3, 4);

    world
        .set_entity(
            alice(),
            position_selector(),
            &ModelIndex::Keys(record.keys()),
            &record.values(),
            &Position::layout(),
        )
        .unwrap();

    let id = record.entity_id();
    assert!(world.is_indexed(position_selector(), id));
    assert_eq!(
        world
            .entity_ids_by_key(position_selector(), alice().felt())
            .unwrap(),
        vec![id]
    );
    assert_eq!(
        world.events().last(),
        Some(&WorldEvent::StoreSetRecord {
            selector: position_selector(),
            entity_id: id,
            keys: record.keys(),
            values: record.values(),
        })
    );
    assert_eq!(
        world
            .entity(position_selector(), &ModelIndex::Id(id), &Position::layout())
            .unwrap(),
        record.values()
    );
}

#[test]
fn id_write_emits_update_record_without_key_index() {
    let mut world = world();
    let id = Felt::from(77_u64);
    let values = [Felt::ONE, Felt::from(2_u64)];

    world
        .set_entity(
            alice(),
            position_selector(),
            &ModelIndex::Id(id),
            &values,
            &Position::layout(),
        )
        .unwrap();

    assert_eq!(world.entity_ids(position_selector()).unwrap(), vec![id]);
    assert!(
        world
            .entity_ids_by_key(position_selector(), alice().felt())
            .unwrap()
            .is_empty()
    );
    assert!(matches!(
        world.events().last(),
        Some(WorldEvent::StoreUpdateRecord { entity_id, .. }) if *entity_id == id
    ));
}

#[test]
fn member_write_touches_only_that_member() {
    let mut world = world();
    let record = position(3, 4);
    world.write_model(alice(), NS, &record).unwrap();

    let y = selector_from_name("y");
    world
        .set_entity(
            alice(),
            position_selector(),
            &ModelIndex::MemberId(record.entity_id(), y),
            &[Felt::from(9_u64)],
            &Position::layout(),
        )
        .unwrap();

    let stored: Position = world.read_model(NS, &alice()).unwrap();
    assert_eq!(stored, position(3, 9));
    assert!(matches!(
        world.events().last(),
        Some(WorldEvent::StoreUpdateMember { member_selector, .. }) if *member_selector == y
    ));
}

#[test]
fn unknown_member_is_rejected() {
    let world = world();

    let err: InternalError = world
        .entity(
            position_selector(),
            &ModelIndex::MemberId(Felt::ONE, selector_from_name("z")),
            &Position::layout(),
        )
        .unwrap_err()
        .into();

    assert_eq!(err.class, ErrorClass::InvalidInput);
    assert_eq!(err.message, "bad member id");
}

#[test]
fn member_delete_is_unsupported() {
    let mut world = world();

    let err = world
        .delete_entity(
            alice(),
            position_selector(),
            &ModelIndex::MemberId(Felt::ONE, selector_from_name("x")),
            &Position::layout(),
        )
        .unwrap_err();

    assert_eq!(err.class, ErrorClass::Unsupported);
    assert_eq!(err.message, "cannot delete entity member");
}

#[test]
fn model_layout_must_be_fixed_or_struct() {
    let world = world();

    for layout in [
        Layout::ByteArray,
        Layout::Enum(vec![FieldLayout::new(Felt::ZERO, Layout::unit())]),
        Layout::Array(Box::new(Layout::fixed(&[8]))),
    ] {
        let err = world
            .entity(position_selector(), &ModelIndex::Id(Felt::ONE), &layout)
            .unwrap_err();

        assert_eq!(err.to_string(), "Unexpected layout type for a model.");
    }
}

#[test]
fn delete_zeroes_record_and_unindexes() {
    let mut world = world();
    let record = position(3, 4);
    world.write_model(alice(), NS, &record).unwrap();

    world.erase_model(alice(), NS, &record).unwrap();

    assert!(!world.is_indexed(position_selector(), record.entity_id()));
    assert_eq!(
        world.read_model::<Position, _>(NS, &alice()).unwrap(),
        position(0, 0)
    );
    assert_eq!(
        world.events().last(),
        Some(&WorldEvent::StoreDelRecord {
            selector: position_selector(),
            entity_id: record.entity_id(),
        })
    );
    // the secondary list keeps the deleted id
    assert_eq!(
        world
            .entity_ids_by_key(position_selector(), alice().felt())
            .unwrap(),
        vec![record.entity_id()]
    );
}

#[test]
fn unwritten_entity_reads_as_zeros() {
    let world = world();

    assert_eq!(
        world
            .entity(position_selector(), &ModelIndex::Id(Felt::ONE), &Position::layout())
            .unwrap(),
        vec![Felt::ZERO, Felt::ZERO]
    );
    assert_eq!(world.storage().occupied(0), 0);
}

#[test]
fn failed_write_changes_nothing() {
    let mut world = world();
    let before = world.storage().clone();

    let err = world
        .set_entity(
            alice(),
            position_selector(),
            &ModelIndex::Keys(vec![alice().felt()]),
            &[Felt::from(7_u64)],
            &Position::layout(),
        )
        .unwrap_err();

    assert!(err.message.contains("1 more values at offset 1"));
    assert_eq!(**world.storage(), *before);
    assert!(!world.is_indexed(position_selector(), position(0, 0).entity_id()));
    assert!(world.events().is_empty());
}

#[test]
fn failed_delete_changes_nothing() {
    let mut world = world();
    let record = Profile {
        player: alice(),
        name: "alice".to_string(),
        scores: vec![1, 2],
    };
    world.write_model(alice(), NS, &record).unwrap();
    world.events_mut().drain();

    // a corrupt scores length fails the delete after `name` was visited
    let selector = Profile::selector(bytearray_hash(NS));
    let (mut storage, permissions, events) = world.into_parts();
    let scores = combine_key(record.entity_id(), selector_from_name("scores"));
    storage.write(0, entity_base_address(selector, scores), Felt::from(u64::MAX));
    let before = storage.clone();
    let mut world = World::new(storage, permissions, events);

    let err = world
        .delete_entity(
            alice(),
            selector,
            &ModelIndex::Id(record.entity_id()),
            &Profile::layout(),
        )
        .unwrap_err();

    assert_eq!(err.class, ErrorClass::Corruption);
    assert_eq!(**world.storage(), *before);
    assert!(world.is_indexed(selector, record.entity_id()));
    assert!(world.events().is_empty());
}

// ----------------------------------------------------------------------
// permissions
// ----------------------------------------------------------------------

#[test]
fn stranger_cannot_write() {
    let mut world = world();

    let err = world.write_model(bob(), NS, &position(1, 1)).unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.origin, ErrorOrigin::Permission);
    assert!(err.message.contains(&bob().to_string()));
    assert!(err.message.contains("ns-Position"));
    assert!(world.events().is_empty());
}

#[test]
fn granted_writer_can_write() {
    let mut world = world();
    world
        .grant_writer(alice(), position_selector(), bob())
        .unwrap();

    world
        .write_model(
            bob(),
            NS,
            &Position {
                player: bob(),
                x: 1,
                y: 2,
            },
        )
        .unwrap();

    assert_eq!(world.entity_ids(position_selector()).unwrap().len(), 1);
}

#[test]
fn world_owner_can_write_anywhere() {
    let mut world = world();

    world.write_model(creator(), NS, &position(5, 5)).unwrap();
}

#[test]
fn unregistered_model_is_not_found() {
    let mut world = world();
    let values = [Felt::ONE, Felt::ONE];

    let err = world
        .set_entity(
            creator(),
            Felt::from(404_u64),
            &ModelIndex::Id(Felt::ONE),
            &values,
            &Position::layout(),
        )
        .unwrap_err();

    assert!(err.is_not_found());
}

#[test]
fn non_model_resource_conflicts() {
    let mut world = world();

    let err = world
        .delete_entity(
            alice(),
            bytearray_hash(NS),
            &ModelIndex::Id(Felt::ONE),
            &Position::layout(),
        )
        .unwrap_err();

    assert_eq!(err.class, ErrorClass::Conflict);
}

#[test]
fn registration_and_roles_emit_events() {
    let mut world = World::in_memory(creator());

    let hash = world.register_namespace(alice(), NS).unwrap();
    let selector = world
        .register_event(alice(), NS, "Moved", ContractAddress::from(9_u64))
        .unwrap();
    world.grant_owner(alice(), selector, bob()).unwrap();
    world.revoke_owner(alice(), selector, bob()).unwrap();
    world
        .register_contract(alice(), NS, "actions", ContractAddress::from(10_u64))
        .unwrap();

    let events = world.events().events();
    assert_eq!(
        events[0],
        WorldEvent::NamespaceRegistered {
            namespace: NS.to_string(),
            hash,
        }
    );
    assert!(matches!(&events[1], WorldEvent::EventRegistered { name, .. } if name == "Moved"));
    assert_eq!(
        events[2],
        WorldEvent::OwnerUpdated {
            resource: selector,
            principal: bob(),
            value: true,
        }
    );
    assert!(matches!(events[3], WorldEvent::OwnerUpdated { value: false, .. }));
    assert!(matches!(&events[4], WorldEvent::ContractRegistered { name, .. } if name == "actions"));
}

// ----------------------------------------------------------------------
// typed api
// ----------------------------------------------------------------------

#[test]
fn dynamic_model_round_trip() {
    let mut world = world();
    let profile = Profile {
        player: alice(),
        name: "alice in worldstore".to_string(),
        scores: vec![10, 20, 30],
    };

    world.write_model(alice(), NS, &profile).unwrap();

    assert_eq!(
        world.read_model::<Profile, _>(NS, &alice()).unwrap(),
        profile
    );
    assert_eq!(
        world
            .read_member::<Profile, Vec<u16>>(NS, profile.entity_id(), "scores")
            .unwrap(),
        vec![10, 20, 30]
    );
}

#[test]
fn packed_model_round_trip() {
    let mut world = world();
    let moves = Moves {
        player: alice(),
        remaining: 7,
        can_move: true,
    };

    world.write_model(alice(), NS, &moves).unwrap();

    assert_eq!(world.read_model::<Moves, _>(NS, &alice()).unwrap(), moves);
    // one packed word, three primary and two secondary index slots
    assert_eq!(world.storage().occupied(0), 1 + 3 + 2);
}

#[test]
fn typed_member_access() {
    let mut world = world();
    let record = position(1, 2);
    world.write_model(alice(), NS, &record).unwrap();

    world
        .write_member::<Position, u32>(alice(), NS, record.entity_id(), "x", &40)
        .unwrap();

    assert_eq!(
        world
            .read_member::<Position, u32>(NS, record.entity_id(), "x")
            .unwrap(),
        40
    );
    assert_eq!(
        world
            .read_member::<Position, u32>(NS, record.entity_id(), "y")
            .unwrap(),
        2
    );
}

#[test]
fn entities_lists_live_records() {
    let mut world = world();
    world.write_model(alice(), NS, &position(1, 1)).unwrap();
    world
        .write_model(
            creator(),
            NS,
            &Position {
                player: bob(),
                x: 2,
                y: 2,
            },
        )
        .unwrap();
    world.erase_model(alice(), NS, &position(1, 1)).unwrap();

    let listed = world
        .entities(position_selector(), &Position::layout())
        .unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].1, vec![Felt::from(2_u64), Felt::from(2_u64)]);
}

// ----------------------------------------------------------------------
// config and metrics
// ----------------------------------------------------------------------

#[test]
fn configured_domains_are_used() {
    let config = WorldConfig {
        storage_domain: 1,
        index_domain: 2,
        ..WorldConfig::default()
    };
    let mut world = World::with_config(
        MemoryStorage::new(),
        ResourceRegistry::new(creator()),
        EventLog::new(),
        &config,
    );
    world.register_namespace(alice(), NS).unwrap();
    world
        .register::<Position>(alice(), NS, ContractAddress::from(1_u64))
        .unwrap();

    world.write_model(alice(), NS, &position(1, 2)).unwrap();

    assert_eq!(world.storage().occupied(0), 0);
    assert_eq!(world.storage().occupied(1), 2);
    assert!(world.storage().occupied(2) > 0);
}

#[test]
fn dispatch_records_metrics() {
    struct Capture(RefCell<Vec<MetricsEvent>>);

    impl MetricsSink for Capture {
        fn record(&self, event: MetricsEvent) {
            self.0.borrow_mut().push(event);
        }
    }

    let mut world = world();
    let capture = Rc::new(Capture(RefCell::new(Vec::new())));

    with_metrics_sink(capture.clone(), || {
        world.write_model(alice(), NS, &position(1, 2)).unwrap();
    });

    let events = capture.0.borrow();
    assert!(events.contains(&MetricsEvent::EntityWrite {
        table: position_selector(),
        felts: 2,
    }));
    assert!(events.contains(&MetricsEvent::IndexDelta {
        table: position_selector(),
        inserts: 1,
        removes: 0,
    }));
}
