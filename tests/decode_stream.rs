//! Streaming decoder behavior: chunking invariance, multi-value streams,
//! malformed-input rejection, and failure poisoning.

use amqp_value::{AmqpValue, Decoder, ErrorCode, ErrorKind};

/// Decode a whole buffer in one call.
fn decode_all(bytes: &[u8]) -> Vec<AmqpValue> {
    let mut out = Vec::new();
    let mut decoder = Decoder::new(|v| out.push(v));
    decoder.decode_bytes(bytes).unwrap();
    drop(decoder);
    out
}

/// Decode one byte per call.
fn decode_byte_at_a_time(bytes: &[u8]) -> Vec<AmqpValue> {
    let mut out = Vec::new();
    let mut decoder = Decoder::new(|v| out.push(v));
    for b in bytes {
        decoder.decode_bytes(core::slice::from_ref(b)).unwrap();
    }
    drop(decoder);
    out
}

fn decode_err(bytes: &[u8]) -> ErrorCode {
    let mut decoder = Decoder::new(|_| {});
    decoder.decode_bytes(bytes).unwrap_err().code
}

#[test]
fn null_fires_once() {
    assert_eq!(decode_all(&[0x40]), [AmqpValue::null()]);
}

#[test]
fn boolean_split_across_calls_resumes() {
    let mut out = Vec::new();
    let mut decoder = Decoder::new(|v| out.push(v));
    decoder.decode_bytes(&[0x56]).unwrap();
    decoder.decode_bytes(&[0x01]).unwrap();
    drop(decoder);
    assert_eq!(out, [AmqpValue::bool(true)]);
}

#[test]
fn multiple_values_per_buffer() {
    assert_eq!(
        decode_all(&[0x40, 0x41, 0x43]),
        [AmqpValue::null(), AmqpValue::bool(true), AmqpValue::uint(0)]
    );
}

#[test]
fn value_straddling_a_chunk_boundary() {
    let mut out = Vec::new();
    let mut decoder = Decoder::new(|v| out.push(v));
    decoder.decode_bytes(&[0x41, 0x70, 0x00]).unwrap();
    decoder.decode_bytes(&[0x00, 0x01, 0x00, 0x42]).unwrap();
    drop(decoder);
    assert_eq!(
        out,
        [
            AmqpValue::bool(true),
            AmqpValue::uint(256),
            AmqpValue::bool(false)
        ]
    );
}

#[test]
fn chunking_does_not_change_results() {
    let outer = AmqpValue::list();
    outer.set_list_item(0, &AmqpValue::string("résumé").unwrap()).unwrap();
    let map = AmqpValue::map();
    map.set_map_value(&AmqpValue::symbol("key").unwrap(), &AmqpValue::long(-7))
        .unwrap();
    outer.set_list_item(1, &map).unwrap();
    let array = AmqpValue::array();
    array.array_add(&AmqpValue::double(2.5)).unwrap();
    outer.set_list_item(2, &array).unwrap();
    let bytes = outer.encode_to_vec().unwrap();

    assert_eq!(decode_all(&bytes), decode_byte_at_a_time(&bytes));
    assert_eq!(decode_all(&bytes), [outer]);
}

#[test]
fn fixed_width_types_roundtrip() {
    for value in [
        AmqpValue::ubyte(7),
        AmqpValue::byte(-7),
        AmqpValue::ushort(1000),
        AmqpValue::short(-1000),
        AmqpValue::uint(70_000),
        AmqpValue::int(-70_000),
        AmqpValue::ulong(u64::MAX),
        AmqpValue::long(i64::MIN),
        AmqpValue::float(3.5),
        AmqpValue::double(-0.25),
        AmqpValue::char('→'),
        AmqpValue::timestamp(1_640_000_000_000),
        AmqpValue::uuid([7; 16]),
    ] {
        let bytes = value.encode_to_vec().unwrap();
        assert_eq!(decode_all(&bytes), [value]);
    }
}

#[test]
fn small_forms_decode_with_widening() {
    assert_eq!(decode_all(&[0x52, 0xFF]), [AmqpValue::uint(255)]);
    assert_eq!(decode_all(&[0x53, 0x01]), [AmqpValue::ulong(1)]);
    assert_eq!(decode_all(&[0x54, 0xFF]), [AmqpValue::int(-1)]);
    assert_eq!(decode_all(&[0x55, 0x80]), [AmqpValue::long(-128)]);
    assert_eq!(decode_all(&[0x44]), [AmqpValue::ulong(0)]);
}

#[test]
fn empty_string_decodes() {
    assert_eq!(decode_all(&[0xA1, 0x00]), [AmqpValue::string("").unwrap()]);
}

#[test]
fn wide_string_roundtrips() {
    let s = "y".repeat(300);
    let value = AmqpValue::string(&s).unwrap();
    let bytes = value.encode_to_vec().unwrap();
    assert_eq!(bytes[0], 0xB1);
    assert_eq!(decode_byte_at_a_time(&bytes), [value]);
}

#[test]
fn nested_list_decodes() {
    let out = decode_all(&[0xC0, 0x02, 0x01, 0x40]);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].list_item_count().unwrap(), 1);
    assert!(out[0].list_item(0).unwrap().is_null());
}

#[test]
fn empty_list0_decodes() {
    assert_eq!(decode_all(&[0x45]), [AmqpValue::list()]);
}

#[test]
fn empty_compound_forms_decode() {
    assert_eq!(decode_all(&[0xC0, 0x01, 0x00]), [AmqpValue::list()]);
    assert_eq!(decode_all(&[0xC1, 0x01, 0x00]), [AmqpValue::map()]);
    assert_eq!(decode_all(&[0xE0, 0x01, 0x00]), [AmqpValue::array()]);
}

#[test]
fn map_roundtrips() {
    let map = AmqpValue::map();
    map.set_map_value(&AmqpValue::uint(1), &AmqpValue::string("one").unwrap())
        .unwrap();
    map.set_map_value(&AmqpValue::uint(2), &AmqpValue::string("two").unwrap())
        .unwrap();
    let bytes = map.encode_to_vec().unwrap();
    let out = decode_byte_at_a_time(&bytes);
    assert_eq!(out, [map]);
}

#[test]
fn array_of_uints_decodes() {
    let out = decode_all(&[0xE0, 0x0A, 0x02, 0x70, 0, 0, 0, 1, 0, 0, 0, 2]);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].array_item_count().unwrap(), 2);
    assert_eq!(out[0].array_item(0).unwrap(), AmqpValue::uint(1));
    assert_eq!(out[0].array_item(1).unwrap(), AmqpValue::uint(2));
}

#[test]
fn array_of_nulls_consumes_no_payload() {
    let out = decode_all(&[0xE0, 0x02, 0x03, 0x40, 0x41]);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].array_item_count().unwrap(), 3);
    assert!(out[0].array_item(2).unwrap().is_null());
    assert_eq!(out[1], AmqpValue::bool(true));
}

#[test]
fn deeply_nested_value_roundtrips() {
    let mut value = AmqpValue::uint(1);
    for _ in 0..20 {
        let list = AmqpValue::list();
        list.set_list_item(0, &value).unwrap();
        value = list;
    }
    let bytes = value.encode_to_vec().unwrap();
    assert_eq!(decode_byte_at_a_time(&bytes), [value]);
}

#[test]
fn invalid_constructor_is_rejected() {
    let mut decoder = Decoder::new(|_| {});
    let err = decoder.decode_bytes(&[0x3F]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Decode);
    assert_eq!(err.code, ErrorCode::InvalidConstructor);
}

#[test]
fn boolean_octet_out_of_range_is_rejected() {
    assert_eq!(decode_err(&[0x56, 0x02]), ErrorCode::InvalidBoolean);
}

#[test]
fn surrogate_char_code_is_rejected() {
    assert_eq!(
        decode_err(&[0x73, 0x00, 0x00, 0xD8, 0x00]),
        ErrorCode::InvalidCharCode
    );
}

#[test]
fn invalid_utf8_string_is_rejected() {
    assert_eq!(decode_err(&[0xA1, 0x01, 0xFF]), ErrorCode::Utf8Invalid);
}

#[test]
fn non_ascii_symbol_is_rejected() {
    assert_eq!(decode_err(&[0xA3, 0x01, 0x80]), ErrorCode::SymbolNotAscii);
}

#[test]
fn odd_map_count_is_rejected() {
    assert_eq!(decode_err(&[0xC1, 0x02, 0x01, 0x40]), ErrorCode::OddMapCount);
}

#[test]
fn compound_size_below_minimum_is_rejected() {
    // two declared elements cannot fit in a one-byte payload
    assert_eq!(
        decode_err(&[0xC0, 0x01, 0x02]),
        ErrorCode::CompoundSizeTooSmall
    );
}

#[test]
fn empty_input_is_an_error_but_not_fatal() {
    let mut out = Vec::new();
    let mut decoder = Decoder::new(|v| out.push(v));
    let err = decoder.decode_bytes(&[]).unwrap_err();
    assert_eq!(err.code, ErrorCode::EmptyDecodeInput);
    decoder.decode_bytes(&[0x40]).unwrap();
    drop(decoder);
    assert_eq!(out, [AmqpValue::null()]);
}

#[test]
fn fatal_error_poisons_the_decoder() {
    let mut decoder = Decoder::new(|_| {});
    assert_eq!(
        decoder.decode_bytes(&[0x3F]).unwrap_err().code,
        ErrorCode::InvalidConstructor
    );
    assert_eq!(
        decoder.decode_bytes(&[0x40]).unwrap_err().code,
        ErrorCode::DecoderFailed
    );
}

#[test]
fn error_offset_reports_consumed_bytes() {
    let mut decoder = Decoder::new(|_| {});
    let err = decoder.decode_bytes(&[0x40, 0x41, 0x3F]).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidConstructor);
    assert_eq!(err.offset, 3);
}

#[test]
fn bytes_consumed_tracks_across_calls() {
    let mut decoder = Decoder::new(|_| {});
    decoder.decode_bytes(&[0x52]).unwrap();
    decoder.decode_bytes(&[0x01, 0x40]).unwrap();
    assert_eq!(decoder.bytes_consumed(), 3);
}

#[test]
fn values_shared_between_containers_encode_independently() {
    let shared = AmqpValue::uint(9);
    let list = AmqpValue::list();
    list.set_list_item(0, &shared).unwrap();
    list.set_list_item(1, &shared).unwrap();
    let bytes = list.encode_to_vec().unwrap();
    assert_eq!(bytes, [0xC0, 0x05, 0x02, 0x52, 0x09, 0x52, 0x09]);
    assert_eq!(decode_all(&bytes), [list]);
}
