use serde::{Deserialize, Serialize};
use json5_tree::{
    from_str, index, parse_str, parse_str_with_options, to_string, to_string_escaped, to_value,
    ErrorCode, ParseOptions, Value,
};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct User {
    id: u32,
    name: String,
    active: bool,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Product {
    sku: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Order {
    order_id: u32,
    customer: User,
    items: Vec<Product>,
    total: f64,
    note: Option<String>,
}

#[test]
fn test_scenario_keys_and_indices() {
    let doc = parse_str("{foo: 1, bar: [true, null]}").unwrap();
    assert_eq!(doc.as_object().map(|m| m.len()), Some(2));
    assert_eq!(index(&doc, "[foo]").unwrap(), &Value::Number(1.0));
    assert_eq!(index(&doc, "[bar][0]").unwrap(), &Value::Bool(true));
}

#[test]
fn test_scenario_escaped_tab() {
    let doc = parse_str(r#"{'a': "x\ty"}"#).unwrap();
    let a = doc.get("a").and_then(Value::as_str).unwrap();
    assert_eq!(a.chars().collect::<Vec<_>>(), vec!['x', '\t', 'y']);
}

#[test]
fn test_scenario_empty_selector() {
    let doc = parse_str("{foo: 1, bar: [true, null]}").unwrap();
    let err = index(&doc, "[bar][]").unwrap_err();
    assert_eq!(err.code(), ErrorCode::Syntax);
}

#[test]
fn test_scenario_leading_comment() {
    assert_eq!(
        parse_str("// comment\n{a:1}").unwrap(),
        parse_str("{a:1}").unwrap()
    );
}

#[test]
fn test_scenario_special_numbers() {
    assert_eq!(to_string(&Value::Number(f64::NAN)), "NaN");
    assert_eq!(to_string(&Value::Number(f64::NEG_INFINITY)), "-Infinity");
}

#[test]
fn test_json5_syntax_tour() {
    let input = r#"
        // comments are allowed
        {
            unquoted: 'and you can quote me on that',
            singleQuotes: 'I can use "double quotes" here',
            lineBreaks: "Look, Mom! \
No \\n's!",
            hexadecimal: 0xdecaf,
            leadingDecimalPoint: .8675309, andTrailing: 8675309.,
            positiveSign: +1,
            trailingComma: 'in objects', andIn: ['arrays',],
            "backwardsCompatible": "with JSON",
            /* and block comments */
            infinities: [Infinity, -Infinity],
        }
    "#;
    let doc = parse_str(input).unwrap();

    assert_eq!(
        doc.at("[lineBreaks]").unwrap().as_str(),
        Some("Look, Mom! No \\n's!")
    );
    assert_eq!(doc.at("[hexadecimal]").unwrap().as_i64(), Some(0xdecaf));
    assert_eq!(doc.at("[leadingDecimalPoint]").unwrap().as_f64(), Some(0.8675309));
    assert_eq!(doc.at("[andTrailing]").unwrap().as_f64(), Some(8675309.0));
    assert_eq!(doc.at("[positiveSign]").unwrap().as_f64(), Some(1.0));
    assert_eq!(doc.at("[andIn][0]").unwrap().as_str(), Some("arrays"));
    assert_eq!(doc.at("[infinities][1]").unwrap().as_f64(), Some(f64::NEG_INFINITY));

    let keys: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys[0], "unquoted");
    assert_eq!(keys.len(), 11);
}

#[test]
fn test_print_then_parse_preserves_tree() {
    let input = "{a: [1, 2.5, -0, NaN, 'é\\u0001'], b: {c: null, d: [[], {}]}, e: 1e300}";
    let doc = parse_str(input).unwrap();

    for text in [to_string(&doc), to_string_escaped(&doc)] {
        let back = parse_str(&text).unwrap();
        assert_eq!(to_string(&back), to_string(&doc));
        assert!(back.at("[a][2]").unwrap().as_f64().unwrap().is_sign_negative());
        assert!(back.at("[a][3]").unwrap().as_f64().unwrap().is_nan());
        assert_eq!(back.at("[a][4]").unwrap().as_str(), Some("é\u{1}"));
    }
}

#[test]
fn test_printed_layout() {
    let doc = parse_str("{name: 'x', list: [1, {deep: true}]}").unwrap();
    let expected = "{\n\t\"name\": \"x\",\n\t\"list\": [\n\t\t1,\n\t\t{\n\t\t\t\"deep\": true\n\t\t}\n\t]\n}";
    assert_eq!(to_string(&doc), expected);
    assert_eq!(to_string(&doc), to_string(&doc));
}

#[test]
fn test_supplementary_plane_escapes() {
    let doc = parse_str(r#"['\uD83D\uDE00', "\u00e9"]"#).unwrap();
    assert_eq!(doc.at("[0]").unwrap().as_str(), Some("😀"));
    assert_eq!(to_string_escaped(&doc), "[\n\t\"\\ud83d\\ude00\",\n\t\"\\u00e9\"\n]");
}

#[test]
fn test_error_positions() {
    let err = parse_str("{\n  a: 1,\n  b 2\n}").unwrap_err();
    assert_eq!(err.code(), ErrorCode::Syntax);
    let message = err.to_string();
    assert!(message.contains("line 3"), "{}", message);
    assert!(message.contains("column 5"), "{}", message);
}

#[test]
fn test_malformed_escapes() {
    for input in [r#""\x4""#, r#""\u12""#, r#""\uD800""#, r#""\uDC00\uD800""#] {
        let err = parse_str(input).unwrap_err();
        assert_eq!(err.code(), ErrorCode::MalformedCharacter, "input {}", input);
    }
}

#[test]
fn test_empty_input() {
    assert_eq!(parse_str("").unwrap_err().code(), ErrorCode::TokenizerInit);
    assert_eq!(parse_str(" /* */ ").unwrap_err().code(), ErrorCode::TokenizerInit);
}

#[test]
fn test_depth_guard() {
    let nested = format!("{}{}", "[".repeat(64), "]".repeat(64));
    assert!(parse_str(&nested).is_ok());

    let options = ParseOptions::new().with_max_depth(63);
    let err = parse_str_with_options(&nested, options).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Syntax);
}

#[test]
fn test_nested_struct() {
    let order = Order {
        order_id: 12345,
        customer: User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["vip".to_string()],
        },
        items: vec![
            Product {
                sku: "WIDGET-001".to_string(),
                price: 29.99,
                quantity: 2,
            },
            Product {
                sku: "GADGET-002".to_string(),
                price: 49.99,
                quantity: 1,
            },
        ],
        total: 109.97,
        note: None,
    };

    let text = to_string(&to_value(&order).unwrap());
    let order_back: Order = from_str(&text).unwrap();
    assert_eq!(order, order_back);
}

#[test]
fn test_hand_written_config() {
    let text = r#"
        {
            order_id: 7,
            customer: {id: 1, name: 'Bob', active: false, tags: []},
            items: [{sku: 'A', price: 1.5, quantity: 0x3}],
            total: 4.5,
            note: 'leave at door',
        }
    "#;
    let order: Order = from_str(text).unwrap();
    assert_eq!(order.items[0].quantity, 3);
    assert_eq!(order.note.as_deref(), Some("leave at door"));
}

#[test]
fn test_typed_mismatch() {
    let err = from_str::<User>("{id: 'one', name: 'x', active: true, tags: []}").unwrap_err();
    assert_eq!(err.code(), ErrorCode::BadParameter);
}
