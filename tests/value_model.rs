//! Value model semantics: typed accessors, shared-ownership aliasing,
//! structural equality, and display formatting.

use amqp_value::{AmqpType, AmqpValue, ErrorCode};

#[test]
fn amqp_type_reports_the_tag() {
    assert_eq!(AmqpValue::null().amqp_type(), AmqpType::Null);
    assert_eq!(AmqpValue::bool(true).amqp_type(), AmqpType::Bool);
    assert_eq!(AmqpValue::uint(1).amqp_type(), AmqpType::Uint);
    assert_eq!(AmqpValue::timestamp(0).amqp_type(), AmqpType::Timestamp);
    assert_eq!(
        AmqpValue::symbol("s").unwrap().amqp_type(),
        AmqpType::Symbol
    );
    assert_eq!(AmqpValue::array().amqp_type(), AmqpType::Array);
}

#[test]
fn accessors_return_the_payload() {
    assert_eq!(AmqpValue::ubyte(9).as_ubyte(), Some(9));
    assert_eq!(AmqpValue::int(-3).as_int(), Some(-3));
    assert_eq!(AmqpValue::char('x').as_char(), Some('x'));
    assert_eq!(AmqpValue::uuid([1; 16]).as_uuid(), Some([1; 16]));
    assert_eq!(
        AmqpValue::string("hello").unwrap().as_string(),
        Some("hello")
    );
    assert_eq!(
        AmqpValue::binary(&[1, 2]).unwrap().as_binary(),
        Some(&[1u8, 2][..])
    );
}

#[test]
fn accessors_refuse_other_types() {
    assert_eq!(AmqpValue::string("1").unwrap().as_uint(), None);
    assert_eq!(AmqpValue::uint(1).as_int(), None);
    assert_eq!(AmqpValue::null().as_bool(), None);
    assert_eq!(AmqpValue::symbol("s").unwrap().as_string(), None);
}

#[test]
fn is_null_only_for_null() {
    assert!(AmqpValue::null().is_null());
    assert!(!AmqpValue::uint(0).is_null());
    assert!(!AmqpValue::list().is_null());
}

#[test]
fn clone_aliases_the_same_value() {
    let list = AmqpValue::list();
    let alias = list.clone();
    alias.set_list_item(0, &AmqpValue::uint(1)).unwrap();
    assert_eq!(list.list_item_count().unwrap(), 1);
    assert_eq!(list.list_item(0).unwrap(), AmqpValue::uint(1));
}

#[test]
fn mutation_is_visible_through_enclosing_containers() {
    let inner = AmqpValue::list();
    let outer = AmqpValue::list();
    outer.set_list_item(0, &inner).unwrap();
    inner.set_list_item(0, &AmqpValue::bool(true)).unwrap();
    let through_outer = outer.list_item(0).unwrap();
    assert_eq!(through_outer.list_item_count().unwrap(), 1);
}

#[test]
fn equality_is_tag_then_payload() {
    assert_eq!(AmqpValue::uint(1), AmqpValue::uint(1));
    assert_ne!(AmqpValue::uint(1), AmqpValue::int(1));
    assert_ne!(AmqpValue::uint(1), AmqpValue::uint(2));
    assert_ne!(AmqpValue::null(), AmqpValue::bool(false));
    assert_ne!(
        AmqpValue::string("a").unwrap(),
        AmqpValue::symbol("a").unwrap()
    );
}

#[test]
fn container_equality_is_deep() {
    let a = AmqpValue::list();
    a.set_list_item(0, &AmqpValue::uint(1)).unwrap();
    let b = AmqpValue::list();
    b.set_list_item(0, &AmqpValue::uint(1)).unwrap();
    assert_eq!(a, b);
    b.set_list_item(1, &AmqpValue::uint(2)).unwrap();
    assert_ne!(a, b);
}

#[test]
fn map_equality_is_order_sensitive() {
    let a = AmqpValue::map();
    a.set_map_value(&AmqpValue::uint(1), &AmqpValue::bool(true))
        .unwrap();
    a.set_map_value(&AmqpValue::uint(2), &AmqpValue::bool(false))
        .unwrap();

    let b = AmqpValue::map();
    b.set_map_value(&AmqpValue::uint(2), &AmqpValue::bool(false))
        .unwrap();
    b.set_map_value(&AmqpValue::uint(1), &AmqpValue::bool(true))
        .unwrap();

    assert_ne!(a, b);
}

#[test]
fn float_equality_follows_bit_patterns() {
    assert_eq!(AmqpValue::float(f32::NAN), AmqpValue::float(f32::NAN));
    assert_ne!(AmqpValue::double(0.0), AmqpValue::double(-0.0));
    assert_eq!(AmqpValue::double(1.5), AmqpValue::double(1.5));
}

#[test]
fn symbol_must_be_ascii() {
    let err = AmqpValue::symbol("café").unwrap_err();
    assert_eq!(err.code, ErrorCode::SymbolNotAscii);
    assert!(AmqpValue::symbol("plain").is_ok());
}

#[test]
fn display_formats() {
    assert_eq!(AmqpValue::null().to_string(), "NULL");
    assert_eq!(AmqpValue::bool(true).to_string(), "true");
    assert_eq!(AmqpValue::uint(42).to_string(), "42");
    assert_eq!(AmqpValue::byte(-5).to_string(), "-5");
    assert_eq!(AmqpValue::string("hi").unwrap().to_string(), "hi");
    assert_eq!(AmqpValue::binary(&[0xAB, 0x01]).unwrap().to_string(), "<AB 01>");

    let uuid = AmqpValue::uuid([
        0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE,
        0xF0,
    ]);
    assert_eq!(uuid.to_string(), "12345678-9abc-def0-1234-56789abcdef0");

    let list = AmqpValue::list();
    list.set_list_item(0, &AmqpValue::uint(1)).unwrap();
    list.set_list_item(1, &AmqpValue::uint(2)).unwrap();
    assert_eq!(list.to_string(), "{1,2}");

    let map = AmqpValue::map();
    map.set_map_value(&AmqpValue::uint(1), &AmqpValue::bool(true))
        .unwrap();
    assert_eq!(map.to_string(), "{[1:true]}");
}
