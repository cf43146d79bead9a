/// Builds a [`Value`](crate::Value) from JSON-like syntax.
///
/// Binary blocks are written with their tag and a string payload, which is
/// kept as given (not validated). The payload must not contain `}`:
///
/// ```rust
/// use serde_bxson::{bxson, render};
///
/// let value = bxson!({
///     "id": 7,
///     "key": b64{"aGVsbG8"},
///     "parts": [b32{"ORSXG5A"}, null, [true, "x"]]
/// });
/// assert_eq!(
///     render(&value, None),
///     r#"{"id":7,"key":b64{aGVsbG8},"parts":[b32{ORSXG5A},null,[true,"x"]]}"#
/// );
/// ```
///
/// Anything else is converted with [`to_value`](crate::to_value), falling back
/// to `null` if that fails.
#[macro_export]
macro_rules! bxson {
    // Array elements, one at a time
    (@array [$($done:expr,)*]) => {
        vec![$($done),*]
    };

    (@array [$($done:expr,)*] $tag:ident { $payload:expr } $(, $($rest:tt)*)?) => {
        $crate::bxson!(@array [$($done,)* $crate::bxson!($tag { $payload }),] $($($rest)*)?)
    };

    (@array [$($done:expr,)*] - $num:tt $(, $($rest:tt)*)?) => {
        $crate::bxson!(@array [$($done,)* $crate::bxson!(-$num),] $($($rest)*)?)
    };

    (@array [$($done:expr,)*] $elem:tt $(, $($rest:tt)*)?) => {
        $crate::bxson!(@array [$($done,)* $crate::bxson!($elem),] $($($rest)*)?)
    };

    // Object entries, one at a time
    (@object $object:ident) => {};

    (@object $object:ident $key:literal : $tag:ident { $payload:expr } $(, $($rest:tt)*)?) => {
        $object.insert($key.to_string(), $crate::bxson!($tag { $payload }));
        $crate::bxson!(@object $object $($($rest)*)?);
    };

    (@object $object:ident $key:literal : - $num:tt $(, $($rest:tt)*)?) => {
        $object.insert($key.to_string(), $crate::bxson!(-$num));
        $crate::bxson!(@object $object $($($rest)*)?);
    };

    (@object $object:ident $key:literal : $value:tt $(, $($rest:tt)*)?) => {
        $object.insert($key.to_string(), $crate::bxson!($value));
        $crate::bxson!(@object $object $($($rest)*)?);
    };

    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    (b32 { $payload:expr }) => {
        $crate::Value::binary($crate::Encoding::Base32, $payload)
    };

    (b58 { $payload:expr }) => {
        $crate::Value::binary($crate::Encoding::Base58, $payload)
    };

    (b64 { $payload:expr }) => {
        $crate::Value::binary($crate::Encoding::Base64, $payload)
    };

    ([ $($elems:tt)* ]) => {
        $crate::Value::Array($crate::bxson!(@array [] $($elems)*))
    };

    ({}) => {
        $crate::Value::Object($crate::BxsonMap::new())
    };

    ({ $($entries:tt)+ }) => {{
        let mut object = $crate::BxsonMap::new();
        $crate::bxson!(@object object $($entries)+);
        $crate::Value::Object(object)
    }};

    ($s:expr) => {
        $crate::to_value(&$s).unwrap_or($crate::Value::Null)
    };
}
