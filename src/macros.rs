/// Builds a [`Value`](crate::Value) tree from JSON5-like literal syntax.
///
/// Object keys must be string literals. Any other expression is converted
/// through [`to_value`](crate::to_value); wrap negative numbers and other
/// multi-token expressions in parentheses.
///
/// Construction never fails: an expression that cannot be converted becomes
/// `null`, and an element or member that cannot be stored is skipped.
///
/// ```rust
/// use json5_tree::{json5, Value};
///
/// let doc = json5!({
///     "name": "svc",
///     "ports": [80, 443],
///     "offset": (-1),
///     "debug": false
/// });
/// assert_eq!(doc.at("[ports][1]").unwrap(), &Value::from(443));
/// ```
#[macro_export]
macro_rules! json5 {
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
        $crate::Value::array()
    };

    ([ $($elem:tt),* $(,)? ]) => {{
        let mut array = $crate::Value::array();
        $(
            let _ = array.append($crate::json5!($elem));
        )*
        array
    }};

    ({}) => {
        $crate::Value::object()
    };

    // Later duplicates overwrite earlier ones in place
    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::Map::new();
        $(
            let _ = object.insert($key.to_string(), $crate::json5!($value));
        )*
        $crate::Value::Object(object)
    }};

    ($other:expr) => {
        $crate::to_value(&$other).unwrap_or_default()
    };
}

#[cfg(test)]
mod tests {
    use crate::{Map, Value};

    #[test]
    fn test_json5_macro_primitives() {
        assert_eq!(json5!(null), Value::Null);
        assert_eq!(json5!(true), Value::Bool(true));
        assert_eq!(json5!(false), Value::Bool(false));
        assert_eq!(json5!(42), Value::Number(42.0));
        assert_eq!(json5!(3.5), Value::Number(3.5));
        assert_eq!(json5!((-7)), Value::Number(-7.0));
        assert_eq!(json5!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_json5_macro_arrays() {
        assert_eq!(json5!([]), Value::Array(vec![]));

        let arr = json5!([1, "two", null,]);
        match arr {
            Value::Array(vec) => {
                assert_eq!(vec.len(), 3);
                assert_eq!(vec[0], Value::Number(1.0));
                assert_eq!(vec[1], Value::from("two"));
                assert_eq!(vec[2], Value::Null);
            }
            _ => panic!("Expected array"),
        }
    }

    #[test]
    fn test_json5_macro_objects() {
        assert_eq!(json5!({}), Value::Object(Map::new()));

        let obj = json5!({
            "name": "Alice",
            "age": 30,
            "name": "Bob"
        });

        match obj {
            Value::Object(map) => {
                assert_eq!(map.len(), 2);
                assert_eq!(map.position("name"), Some(0));
                assert_eq!(map.get("name"), Some(&Value::from("Bob")));
                assert_eq!(map.get("age"), Some(&Value::Number(30.0)));
            }
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn test_json5_macro_unconvertible_becomes_null() {
        use std::collections::BTreeMap;

        let mut by_pair = BTreeMap::new();
        by_pair.insert(vec![1, 2], "x");

        let value = json5!({ "ok": 1, "bad": by_pair });
        assert_eq!(value.at("[bad]").unwrap(), &Value::Null);
        assert_eq!(value.at("[ok]").unwrap(), &Value::from(1));
    }

    #[test]
    fn test_json5_macro_nested() {
        let value = json5!({ "a": [{ "b": [true] }] });
        assert_eq!(value.at("[a][0][b][0]").unwrap(), &Value::Bool(true));
    }
}
