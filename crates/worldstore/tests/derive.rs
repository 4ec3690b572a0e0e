use proptest::prelude::*;
use worldstore::{
    meta::{FieldLayout, Layout, Ty},
    naming::selector_from_name,
    prelude::*,
    serialize::SerdeError,
};

#[derive(Clone, Copy, Debug, Eq, FeltSerde, Introspect, PartialEq)]
enum Facing {
    North,
    East,
    South,
    West,
}

#[derive(Clone, Debug, Eq, FeltSerde, Introspect, PartialEq)]
enum Shape {
    Dot,
    Rect(u8, u8),
    Label(String),
}

#[derive(Clone, Copy, Debug, Eq, FeltSerde, Introspect, PartialEq)]
struct Vec2 {
    x: u32,
    y: u32,
}

#[derive(Clone, Copy, Debug, Eq, FeltSerde, PartialEq)]
struct Pair(u8, bool);

#[derive(Clone, Debug, Eq, Introspect, Model, PartialEq)]
struct Unit {
    #[key]
    owner: ContractAddress,
    #[key]
    slot: u8,
    facing: Facing,
    at: Vec2,
    shape: Shape,
    tags: Vec<u16>,
}

fn owner() -> ContractAddress {
    ContractAddress::from(0x0a_u64)
}

#[test]
fn enum_serializes_variant_then_payload() {
    assert_eq!(Facing::South.to_felts(), vec![Felt::from(2_u64)]);
    assert_eq!(
        Shape::Rect(3, 4).to_felts(),
        vec![Felt::ONE, Felt::from(3_u64), Felt::from(4_u64)]
    );
    assert_eq!(Shape::from_felts(&Shape::Dot.to_felts()), Ok(Shape::Dot));
}

#[test]
fn unknown_variant_is_rejected() {
    assert_eq!(
        Facing::from_felts(&[Felt::from(4_u64)]),
        Err(SerdeError::InvalidVariant {
            ty: "Facing",
            variant: Felt::from(4_u64),
        })
    );
}

#[test]
fn tuple_struct_serializes_in_order() {
    let pair = Pair(7, true);

    assert_eq!(pair.to_felts(), vec![Felt::from(7_u64), Felt::ONE]);
    assert_eq!(Pair::from_felts(&pair.to_felts()), Ok(pair));
}

#[test]
fn multi_field_variant_is_a_tuple() {
    let Layout::Enum(variants) = Shape::layout() else {
        panic!("expected enum layout");
    };

    assert_eq!(
        variants[1],
        FieldLayout::new(
            Felt::ONE,
            Layout::Tuple(vec![Layout::fixed(&[8]), Layout::fixed(&[8])])
        )
    );
    assert_eq!(Shape::size(), None);
    assert_eq!(Facing::size(), Some(1));
}

#[test]
fn nested_schema_is_walkable() {
    let schema = Unit::schema();
    let names: Vec<String> = schema.iter().map(Ty::name).collect();

    assert_eq!(names[0], "Unit");
    assert!(names.contains(&"Facing".to_string()));
    assert!(names.contains(&"Vec2".to_string()));
    assert_eq!(
        Unit::layout().find_field(selector_from_name("at")),
        Some(&Layout::Struct(vec![
            FieldLayout::new(selector_from_name("x"), Layout::fixed(&[32])),
            FieldLayout::new(selector_from_name("y"), Layout::fixed(&[32])),
        ]))
    );
}

#[test]
fn nested_model_round_trips_through_world() {
    let mut world = World::in_memory(owner());
    world.register_namespace(owner(), "units").unwrap();
    world
        .register::<Unit>(owner(), "units", ContractAddress::from(1_u64))
        .unwrap();

    let unit = Unit {
        owner: owner(),
        slot: 2,
        facing: Facing::West,
        at: Vec2 { x: 5, y: 9 },
        shape: Shape::Label("scout".to_string()),
        tags: vec![1, 2, 3],
    };
    world.write_model(owner(), "units", &unit).unwrap();

    let read: Unit = world.read_model("units", &(owner(), 2_u8)).unwrap();
    assert_eq!(read, unit);

    let shape: Shape = world
        .read_member::<Unit, Shape>("units", unit.entity_id(), "shape")
        .unwrap();
    assert_eq!(shape, unit.shape);
}

proptest! {
    #[test]
    fn model_values_survive_storage(
        x in any::<u32>(),
        y in any::<u32>(),
        facing in 0_u8..4,
        tags in prop::collection::vec(any::<u16>(), 0..8),
        w in any::<u8>(),
        h in any::<u8>(),
    ) {
        let facing = [Facing::North, Facing::East, Facing::South, Facing::West][usize::from(facing)];
        let unit = Unit {
            owner: owner(),
            slot: 0,
            facing,
            at: Vec2 { x, y },
            shape: Shape::Rect(w, h),
            tags,
        };

        let mut world = World::in_memory(owner());
        world.register_namespace(owner(), "units").unwrap();
        world
            .register::<Unit>(owner(), "units", ContractAddress::from(1_u64))
            .unwrap();
        world.write_model(owner(), "units", &unit).unwrap();

        let read: Unit = world.read_model("units", &(owner(), 0_u8)).unwrap();
        prop_assert_eq!(read, unit);
    }
}
