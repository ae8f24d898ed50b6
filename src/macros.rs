/// Builds a [`Value`](crate::Value) graph from a JSON-like literal.
///
/// Every `[...]` and `{...}` allocates a fresh node. `undefined` and `null`
/// are distinct. Any other token is converted with
/// [`to_value`](crate::to_value); wrap expressions longer than one token in
/// parentheses.
///
/// ```rust
/// use deep_value::{value, Value};
///
/// let v = value!({
///     "name": "Alice",
///     "tags": ["a", "b"],
///     "missing": undefined,
///     "ratio": (1.0 / 3.0)
/// });
/// assert!(v.get("missing").unwrap().is_undefined());
/// assert_eq!(v.get("tags").unwrap().at(1), Some(Value::from("b")));
/// ```
#[macro_export]
macro_rules! value {
    (undefined) => {
        $crate::Value::Undefined
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

    ([]) => {
        $crate::Value::array(::std::vec::Vec::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::array(vec![$($crate::value!($elem)),*])
    };

    ({}) => {
        $crate::Value::object($crate::ObjectMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::ObjectMap::new();
        $(
            object.insert($key.to_string(), $crate::value!($value));
        )*
        $crate::Value::object(object)
    }};

    // Anything else goes through serde.
    ($s:expr) => {
        $crate::to_value(&$s).unwrap_or($crate::Value::Undefined)
    };
}
