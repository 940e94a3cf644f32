//! Universal properties of decoders over arbitrary JSON.

use proptest::prelude::*;
use serde::Serialize;
use serde_json::{json, Value};
use shapeguard_core::{
    array, field, integer, object, optional, string, DecodeOptions, Decoder, Shape, Untrusted,
};

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        any::<f64>()
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(|f| json!(f)),
        "[a-z]{0,4}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("(name|age|tags|nickname|x)", inner, 0..5)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Person {
    name: String,
    age: i64,
    tags: Vec<String>,
    nickname: Option<String>,
}

prop_compose! {
    fn arb_person()(
        name in ".*",
        age in any::<i64>(),
        tags in prop::collection::vec("[a-z]{1,8}", 0..5),
        nickname in prop::option::of("[A-Za-z]{1,8}"),
    ) -> Person {
        Person { name, age, tags, nickname }
    }
}

fn person_decoder() -> impl Decoder<Output = Person> {
    object((
        field("name", string()),
        field("age", integer()),
        field("tags", array(string())),
        field("nickname", optional(string())),
    ))
    .map(|(name, age, tags, nickname)| Person {
        name,
        age,
        tags,
        nickname,
    })
}

fn person_shape() -> Shape {
    person_decoder().shape()
}

proptest! {
    #[test]
    fn is_agrees_with_decode(value in arb_json()) {
        let decoder = person_decoder();
        let input = Untrusted::new(value);
        prop_assert_eq!(decoder.is(&input), decoder.decode(&input).is_ok());
    }

    #[test]
    fn shape_decode_is_identity(value in arb_json()) {
        let shape = person_shape();
        let input = Untrusted::new(value.clone());
        match shape.decode(&input) {
            Ok(out) => prop_assert_eq!(out, value),
            Err(_) => prop_assert!(!shape.is(&input)),
        }
    }

    #[test]
    fn strategies_agree_on_validity(value in arb_json()) {
        let decoder = person_decoder();
        let input = Untrusted::new(value);
        let fail_fast = decoder.decode(&input);
        let accumulated = decoder.decode_with(&input, &DecodeOptions::accumulate());
        prop_assert_eq!(fail_fast.is_ok(), accumulated.is_ok());
        if let (Err(first), Err(all)) = (fail_fast, accumulated) {
            prop_assert_eq!(&first, all.first());
        }
    }

    #[test]
    fn serialized_instances_round_trip(person in arb_person()) {
        let text = serde_json::to_string(&person).unwrap();
        let input: Untrusted = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(person_decoder().decode(&input).unwrap(), person);
    }
}
