use serde_bxson::{bxson, decode, render, BxsonMap, Encoding, Number, Value};

#[test]
fn test_bxson_macro_null() {
    let value = bxson!(null);
    assert_eq!(value, Value::Null);
}

#[test]
fn test_bxson_macro_booleans() {
    assert_eq!(bxson!(true), Value::Bool(true));
    assert_eq!(bxson!(false), Value::Bool(false));
}

#[test]
fn test_bxson_macro_numbers() {
    assert_eq!(bxson!(42), Value::Number(Number::Integer(42)));
    assert_eq!(bxson!(3.5), Value::Number(Number::Float(3.5)));
    assert_eq!(bxson!(-123), Value::Number(Number::Integer(-123)));
    assert_eq!(
        bxson!(u64::MAX),
        Value::Number(Number::BigInt(u64::MAX.into()))
    );
}

#[test]
fn test_bxson_macro_strings() {
    assert_eq!(bxson!("hello world"), Value::String("hello world".to_string()));
    assert_eq!(bxson!(""), Value::String(String::new()));
}

#[test]
fn test_bxson_macro_arrays() {
    assert_eq!(bxson!([]), Value::Array(vec![]));

    let mixed = bxson!([1, "hello", true, null, -4]);
    assert_eq!(
        mixed,
        Value::Array(vec![
            Value::Number(Number::Integer(1)),
            Value::String("hello".to_string()),
            Value::Bool(true),
            Value::Null,
            Value::Number(Number::Integer(-4)),
        ])
    );

    let nested = bxson!([[1, 2], [], [[null]]]);
    assert_eq!(render(&nested, None), "[[1,2],[],[[null]]]");
}

#[test]
fn test_bxson_macro_objects() {
    assert_eq!(bxson!({}), Value::Object(BxsonMap::new()));

    let obj = bxson!({
        "name": "Alice",
        "age": 30,
        "offset": -2,
        "nested": {"deep": [true]}
    });
    assert_eq!(
        render(&obj, None),
        r#"{"name":"Alice","age":30,"offset":-2,"nested":{"deep":[true]}}"#
    );
}

#[test]
fn test_bxson_macro_binary_blocks() {
    let value = bxson!({
        "b32": b32{"ORSXG5A"},
        "b58": b58{"3yZe7d"},
        "b64": b64{"dGVzdA"},
        "list": [b64{""}, b58{"3yZe7d"}],
    });

    let obj = value.as_object().unwrap();
    assert_eq!(obj.get("b32"), Some(&Value::binary(Encoding::Base32, "ORSXG5A")));

    let decoded = decode(&value);
    let decoded = decoded.as_object().unwrap();
    for key in ["b32", "b58", "b64"] {
        assert_eq!(decoded.get(key), Some(&Value::bytes(b"test".to_vec())), "key {}", key);
    }
    assert_eq!(
        decoded.get("list"),
        Some(&Value::Array(vec![
            Value::Bytes(Vec::new()),
            Value::bytes(b"test".to_vec()),
        ]))
    );
}

#[test]
fn test_bxson_macro_payload_expression() {
    let payload = Encoding::Base58.encode(b"key");
    let value = bxson!(b58{payload.clone()});
    assert_eq!(value, Value::binary(Encoding::Base58, payload));
}

#[test]
fn test_bxson_macro_expressions() {
    let tags = vec!["a", "b"];
    assert_eq!(render(&bxson!(tags), None), r#"["a","b"]"#);

    let name = String::from("x");
    assert_eq!(bxson!({"name": name}), {
        let mut map = BxsonMap::new();
        map.insert("name".to_string(), Value::from("x"));
        Value::Object(map)
    });
}
