//! Property-based tests for the guarantees the pipeline makes on every input:
//! byte round trips, render idempotence, member order and duplicate handling.

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use serde_bxson::{
    decode, encode, from_str, parse, render, to_string, BxsonMap, Encoding, Number, Value,
};

fn roundtrip<T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug>(
    value: &T,
) -> bool {
    match to_string(value) {
        Ok(serialized) => match from_str::<T>(&serialized) {
            Ok(deserialized) => *value == deserialized,
            Err(e) => {
                eprintln!("Deserialize failed: {}", e);
                eprintln!("Serialized was: {}", serialized);
                false
            }
        },
        Err(e) => {
            eprintln!("Serialize failed: {}", e);
            false
        }
    }
}

fn any_encoding() -> impl Strategy<Value = Encoding> {
    prop::sample::select(Encoding::ALL.to_vec())
}

/// Trees made only of JSON values.
fn json_tree() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|i| Value::Number(Number::Integer(i))),
        (-1.0e12f64..1.0e12).prop_map(|f| Value::Number(Number::Float(f))),
        ".{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<BxsonMap>())),
        ]
    })
}

/// JSON trees with raw byte leaves mixed in.
fn byte_tree() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(Value::from),
        "[a-z ]{0,8}".prop_map(Value::String),
        prop::collection::vec(any::<u8>(), 0..48).prop_map(Value::Bytes),
    ];
    leaf.prop_recursive(3, 32, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,4}", inner), 0..5)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<BxsonMap>())),
        ]
    })
}

proptest! {
    #[test]
    fn prop_bytes_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..256), encoding in any_encoding()) {
        let tree = Value::Bytes(bytes);
        prop_assert_eq!(decode(&encode(&tree, encoding)), tree);
    }

    #[test]
    fn prop_bytes_round_trip_through_text(tree in byte_tree(), encoding in any_encoding(), indent in proptest::option::of(0usize..5)) {
        let text = render(&encode(&tree, encoding), indent);
        prop_assert_eq!(decode(&parse(&text).unwrap()), tree);
    }

    #[test]
    fn prop_render_is_idempotent(tree in json_tree(), indent in proptest::option::of(0usize..5)) {
        let once = render(&tree, indent);
        let twice = render(&parse(&once).unwrap(), indent);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_compact_render_is_json(tree in json_tree()) {
        let text = render(&tree, None);
        prop_assert!(serde_json::from_str::<serde_json::Value>(&text).is_ok(), "not JSON: {}", text);
    }

    #[test]
    fn prop_key_order_is_preserved(keys in prop::collection::hash_set("[a-z]{1,8}", 0..12)) {
        let keys: Vec<String> = keys.into_iter().collect();
        let body: Vec<String> = keys
            .iter()
            .enumerate()
            .map(|(i, k)| format!("\"{}\": {}", k, i))
            .collect();
        let tree = parse(&format!("{{{}}}", body.join(", "))).unwrap();
        let parsed_keys: Vec<String> = tree.as_object().unwrap().keys().cloned().collect();
        prop_assert_eq!(parsed_keys, keys);
    }

    #[test]
    fn prop_duplicate_keys_collapse(values in prop::collection::vec(any::<i64>(), 1..6)) {
        let body: Vec<String> = values.iter().map(|v| format!("\"k\": {}", v)).collect();
        let tree = parse(&format!("{{\"first\": 0, {}}}", body.join(", "))).unwrap();
        let obj = tree.as_object().unwrap();
        prop_assert_eq!(obj.len(), 2);
        prop_assert_eq!(obj.get("k"), Some(&Value::from(*values.last().unwrap())));
        prop_assert_eq!(obj.keys().next().map(String::as_str), Some("first"));
    }

    #[test]
    fn prop_i64(n in any::<i64>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_u64(n in any::<u64>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_f64(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        prop_assert!(roundtrip(&f));
    }

    #[test]
    fn prop_string(s in ".*") {
        prop_assert!(roundtrip(&s));
    }

    #[test]
    fn prop_vec_i32(v in prop::collection::vec(any::<i32>(), 0..20)) {
        prop_assert!(roundtrip(&v));
    }

    #[test]
    fn prop_option_i32(opt in proptest::option::of(any::<i32>())) {
        prop_assert!(roundtrip(&opt));
    }

    #[test]
    fn prop_tuple_i32_bool(t in (any::<i32>(), any::<bool>())) {
        prop_assert!(roundtrip(&t));
    }
}
