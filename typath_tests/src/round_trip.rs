use crate::object;
use rstest::rstest;
use serde_json::{json, Value};
use typath::{
    define_path, resolve, serialize, ObjectShape, PathDefinition, PathOptions, PathValues, Shape,
};

fn query_shape() -> ObjectShape {
    object! {
        "test": Shape::String,
        "something": Shape::Number,
        "flag": Shape::Boolean,
        "list": Shape::array(Shape::String),
        "numbers": Shape::array(Shape::Number),
        "nested": object! {
            "deeply": object! {
                "deeper": object! { "deepest": Shape::String }.into(),
            }.into(),
            "items": Shape::array(object! { "id": Shape::Number }.into()),
        }.into(),
    }
}

fn full_path() -> PathDefinition {
    define_path(
        "/users/:id/posts/:postId",
        PathOptions::new()
            .params(object! { "id": Shape::Number, "postId": Shape::String })
            .query(query_shape()),
    )
    .unwrap()
}

fn round_trip(path: &PathDefinition, params: Value, query: Value) -> (Value, Value) {
    let values = PathValues::new()
        .with_params(&params)
        .and_then(|values| values.with_query(&query))
        .unwrap();

    let url = serialize(path, &values);
    let resolved = resolve(path, &url).unwrap();

    (
        Value::Object(resolved.params.matched().unwrap()),
        Value::Object(resolved.query.unwrap()),
    )
}

#[rstest]
#[case(json!({ "id": 1, "postId": "intro" }))]
#[case(json!({ "id": -15, "postId": "MixedCase" }))]
#[case(json!({ "id": 2.5, "postId": "with space/and?query" }))]
fn round_trips(#[case] params: Value) {
    let query = json!({
        "test": "a&b=c",
        "something": 123,
        "flag": false,
        "list": ["test", "test2"],
        "numbers": [1, 2.5, -3],
        "nested": {
            "deeply": { "deeper": { "deepest": "nested" } },
            "items": [{ "id": 1 }, { "id": 2 }]
        }
    });

    let (resolved_params, resolved_query) = round_trip(&full_path(), params.clone(), query.clone());

    assert_eq!(resolved_params, params);
    assert_eq!(resolved_query, query);
}

#[test]
fn round_trips_through_absolute_url() {
    let params = json!({ "id": 3, "postId": "p" });
    let query = json!({
        "test": "t",
        "something": 1,
        "flag": true,
        "list": ["x"],
        "numbers": [4],
        "nested": {
            "deeply": { "deeper": { "deepest": "d" } },
            "items": [{ "id": 9 }]
        }
    });

    let path = full_path();
    let values = PathValues::new()
        .with_params(&params)
        .and_then(|values| values.with_query(&query))
        .unwrap();
    let url = format!("https://example.com{}", serialize(&path, &values));
    let resolved = resolve(&path, &url).unwrap();

    assert_eq!(resolved.params.matched().map(Value::Object), Some(params));
    assert_eq!(resolved.query.map(Value::Object), Some(query));
}

#[test]
fn round_trips_keys_with_brackets() {
    let path = define_path(
        "/t",
        PathOptions::new().query(object! { "m": object! { "we[ird]": Shape::String }.into() }),
    )
    .unwrap();
    let query = json!({ "m": { "we[ird]": "v" } });

    let url = serialize(&path, &PathValues::new().with_query(&query).unwrap());
    assert_eq!(url, "/t?m[we%5Bird%5D]=v");

    let resolved = resolve(&path, &url).unwrap();
    assert_eq!(resolved.query.map(Value::Object), Some(query));
}

#[test]
fn empty_query_on_absolute_url_fails_required() {
    let path = full_path();
    let values = PathValues::new()
        .with_params(&json!({ "id": 3, "postId": "p" }))
        .unwrap()
        .query_map(serde_json::Map::new());

    let url = format!("https://example.com{}", serialize(&path, &values));
    assert_eq!(url, "https://example.com/users/3/posts/p?");

    let resolved = resolve(&path, &url);
    assert!(resolved.is_err(), "empty query should fail required fields");
}
