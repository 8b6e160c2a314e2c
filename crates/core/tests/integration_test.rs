//! Integration tests for the full codec pipeline.
//!
//! These tests verify end-to-end behavior: input -> analyze -> build ->
//! codes -> pack -> persist -> parse -> unpack -> decode, with verification
//! that output matches input.

use huffpack_core::{
    artifact::{parse_bitstream, serialize_bitstream},
    bitio::{pack, unpack, BitString},
    code_table::generate,
    codec::{decode, decode_persisted, encode, encode_bits},
    decoder,
    error::{Error, TreeError},
    frequency::{analyze, FrequencyTable},
    tree::build,
    tree_codec::{deserialize, serialize, TreeArtifact},
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Random input drawn from an alphabet of `alphabet` symbols, skewed so
/// that codes of several lengths appear.
fn random_input(rng: &mut ChaCha8Rng, len: usize, alphabet: u16) -> Vec<u8> {
    (0..len)
        .map(|_| {
            let a: u16 = rng.gen_range(0..alphabet);
            let b: u16 = rng.gen_range(0..alphabet);
            a.min(b) as u8
        })
        .collect()
}

/// Round trip through the individual stages, without the codec facade.
#[test]
fn test_round_trip_random_inputs() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for _ in 0..200 {
        let len = rng.gen_range(1..2000);
        let alphabet = rng.gen_range(1..=256);
        let input = random_input(&mut rng, len, alphabet);

        let tree = build(&analyze(&input)).unwrap();
        let table = generate(&tree).unwrap();
        let packed = pack(&encode_bits(&input, &table).unwrap());
        let bits = unpack(packed.bytes(), packed.padding() as usize).unwrap();

        assert_eq!(decoder::decode(&bits, &tree).unwrap(), input);
    }
}

/// Round trip through both persisted artifacts.
#[test]
fn test_round_trip_persisted() {
    let input = b"The quick brown fox jumps over the lazy dog. ".repeat(100);

    let encoded = encode(&input).expect("encode failed");
    let bitstream_file = encoded.bitstream_bytes().expect("bitstream serialization failed");
    let tree_file = encoded.tree_json().expect("tree serialization failed");

    let decoded = decode_persisted(&bitstream_file, &tree_file).expect("decode failed");
    assert_eq!(decoded, input, "output doesn't match input");
}

#[test]
fn test_codes_are_prefix_free() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for _ in 0..50 {
        let input = random_input(&mut rng, 5000, 256);
        let table = generate(&build(&analyze(&input)).unwrap()).unwrap();

        assert!(table.is_prefix_free());
        let codes: Vec<_> = table.iter().collect();
        for (i, (_, a)) in codes.iter().enumerate() {
            for (_, b) in &codes[i + 1..] {
                assert!(!a.starts_with(b) && !b.starts_with(a));
            }
        }
    }
}

#[test]
fn test_build_is_deterministic() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let input = random_input(&mut rng, 10_000, 64);

    let first = build(&analyze(&input)).unwrap();
    let second = build(&analyze(&input)).unwrap();

    assert_eq!(first, second);
    assert_eq!(generate(&first).unwrap(), generate(&second).unwrap());
    assert_eq!(
        serialize(&first).to_json().unwrap(),
        serialize(&second).to_json().unwrap()
    );
}

#[test]
fn test_tree_round_trip() {
    let mut rng = ChaCha8Rng::seed_from_u64(1234);

    for alphabet in [1u16, 2, 3, 17, 256] {
        let input = random_input(&mut rng, 3000, alphabet);
        let tree = build(&analyze(&input)).unwrap();

        let json = serialize(&tree).to_json().unwrap();
        let restored = deserialize(&TreeArtifact::from_json(&json).unwrap()).unwrap();
        assert_eq!(restored, tree);
    }
}

#[test]
fn test_padding_correctness() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let mut seen_padding = [false; 8];

    for len in 0..=100usize {
        let bits: BitString = (0..len).map(|_| rng.gen::<bool>()).collect();
        let packed = pack(&bits);

        assert_eq!(packed.bytes().len(), len.div_ceil(8));
        assert_eq!(packed.padding() as usize, (8 - len % 8) % 8);
        seen_padding[packed.padding() as usize] = true;

        let restored = unpack(packed.bytes(), packed.padding() as usize).unwrap();
        assert_eq!(restored, bits);
    }

    assert!(seen_padding.iter().all(|&seen| seen));
}

/// Scenario: a single distinct symbol.
#[test]
fn test_single_symbol_input() {
    let freq = analyze(b"aaaa");
    assert_eq!(freq.iter().collect::<Vec<_>>(), vec![(b'a', 4)]);

    let tree = build(&freq).unwrap();
    assert!(tree.is_single_leaf());

    let table = generate(&tree).unwrap();
    assert_eq!(table.get(b'a').unwrap().to_string(), "0");

    let encoded = encode(b"aaaa").unwrap();
    assert_eq!(encoded.bitstream.bytes(), &[0b0000_0000]);
    assert_eq!(encoded.bitstream.padding(), 4);

    assert_eq!(
        decode(&encoded.bitstream, &encoded.tree_artifact).unwrap(),
        b"aaaa"
    );
}

/// Scenario: three symbols of equal weight.
#[test]
fn test_equal_weights() {
    let encoded = encode(b"abc").unwrap();

    assert_eq!(encoded.codes.get(b'c').unwrap().to_string(), "0");
    assert_eq!(encoded.codes.get(b'a').unwrap().to_string(), "10");
    assert_eq!(encoded.codes.get(b'b').unwrap().to_string(), "11");
    assert_eq!(encoded.bitstream.bytes(), &[0b1011_0000]);
    assert_eq!(encoded.bitstream.padding(), 3);

    assert_eq!(
        decode(&encoded.bitstream, &encoded.tree_artifact).unwrap(),
        b"abc"
    );
}

/// Scenario: empty input produces no artifacts.
#[test]
fn test_empty_input() {
    assert!(matches!(encode(b""), Err(Error::EmptyInput)));
}

/// Scenario: malformed tree JSON.
#[test]
fn test_malformed_tree_json() {
    let encoded = encode(b"some data").unwrap();
    let bitstream_file = encoded.bitstream_bytes().unwrap();

    let result = decode_persisted(&bitstream_file, "{\"symbol\": null, \"weight\": 9, \"left\": ");
    assert!(matches!(result, Err(Error::MalformedTree(TreeError::Json(_)))));

    let one_child = concat!(
        r#"{"symbol": null, "weight": 1, "#,
        r#""left": {"symbol": 97, "weight": 1, "left": null, "right": null}, "#,
        r#""right": null}"#,
    );
    let result = decode_persisted(&bitstream_file, one_child);
    assert!(matches!(
        result,
        Err(Error::MalformedTree(TreeError::MissingChild { .. }))
    ));
}

#[test]
fn test_missing_tree_is_invalid_input() {
    let encoded = encode(b"some data").unwrap();
    let bitstream_file = encoded.bitstream_bytes().unwrap();

    let result = decode_persisted(&bitstream_file, "null");
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[test]
fn test_truncated_stream_detected() {
    let encoded = encode(b"abc").unwrap();
    // "10110" cut off in the middle of b's code.
    let truncated = pack(&"101".parse().unwrap());

    let result = decode(&truncated, &encoded.tree_artifact);
    assert!(matches!(result, Err(Error::TruncatedStream { .. })));
}

#[test]
fn test_corrupt_bitstream_header() {
    let encoded = encode(b"header test").unwrap();
    let json = encoded.tree_json().unwrap();

    let mut bitstream_file = serialize_bitstream(&encoded.bitstream).unwrap();
    bitstream_file[0] ^= 0xFF;
    assert!(matches!(
        decode_persisted(&bitstream_file, &json),
        Err(Error::Framing(_))
    ));

    let mut bitstream_file = serialize_bitstream(&encoded.bitstream).unwrap();
    bitstream_file[4] = 8;
    assert!(matches!(
        decode_persisted(&bitstream_file, &json),
        Err(Error::InvalidPadding { padding: 8, .. })
    ));
}

/// Test with all symbols present (full 256-byte alphabet).
#[test]
fn test_all_symbols() {
    let input: Vec<u8> = (0..=255).collect();

    let encoded = encode(&input).expect("encode failed");
    // 256 equal weights form a perfect tree of depth 8.
    assert_eq!(encoded.tree.depth(), 8);
    assert!(encoded.codes.iter().all(|(_, code)| code.len() == 8));

    let parsed = parse_bitstream(&encoded.bitstream_bytes().unwrap()).unwrap();
    let decoded = decode(&parsed, &encoded.tree_artifact).expect("decode failed");
    assert_eq!(decoded, input);
}

#[test]
fn test_skewed_input_compresses() {
    let mut input = vec![b'e'; 10_000];
    input.extend_from_slice(b"rare symbols: xyz");

    let encoded = encode(&input).unwrap();
    assert!(encoded.bitstream.bytes().len() < input.len() / 4);
    assert_eq!(decode(&encoded.bitstream, &encoded.tree_artifact).unwrap(), input);
}

/// Counts whose sum does not fit in a u64 are an error, never a panic or a
/// silently wrapped weight.
#[test]
fn test_weight_overflow_is_an_error() {
    let freq: FrequencyTable = vec![(1u8, u64::MAX), (2u8, 1)].into_iter().collect();
    assert!(matches!(build(&freq), Err(Error::InvalidInput(_))));

    let result = FrequencyTable::try_from_pairs([(1u8, u64::MAX), (2u8, 1)]);
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}
