use crate::object;
use rstest::rstest;
use serde_json::{json, Value};
use typath::{define_path, serialize, PathOptions, PathValues, Shape};

fn query_values(query: Value) -> PathValues {
    PathValues::new().with_query(&query).unwrap()
}

#[test]
fn serializes_query_params() {
    let path = define_path(
        "/test/path",
        PathOptions::new().query(object! {
            "test": Shape::String,
            "something": Shape::Number,
            "blah": object! { "nested": Shape::String }.into(),
        }),
    )
    .unwrap();

    let result = serialize(
        &path,
        &query_values(json!({
            "test": "test",
            "something": 123,
            "blah": { "nested": "nested" }
        })),
    );

    assert_eq!(result, "/test/path?test=test&something=123&blah[nested]=nested");
}

#[test]
fn serializes_deeply_nested_query_params() {
    let path = define_path("/test/path", PathOptions::new()).unwrap();

    let result = serialize(
        &path,
        &query_values(json!({
            "nested": {
                "deeply": { "deeper": { "deepest": "nested" } },
                "test": { "nested": "nested" }
            }
        })),
    );

    assert_eq!(
        result,
        "/test/path?nested[deeply][deeper][deepest]=nested&nested[test][nested]=nested"
    );
}

#[test]
fn serializes_query_params_with_arrays() {
    let path = define_path(
        "/test/path",
        PathOptions::new().query(object! { "test": Shape::array(Shape::String) }),
    )
    .unwrap();

    let result = serialize(&path, &query_values(json!({ "test": ["test", "test2"] })));

    assert_eq!(result, "/test/path?test[0]=test&test[1]=test2");
}

#[test]
fn serializes_arrays_of_objects() {
    let path = define_path("/test", PathOptions::new()).unwrap();

    let result = serialize(
        &path,
        &query_values(json!({ "items": [{ "id": 1 }, { "id": 2, "tags": ["x"] }] })),
    );

    assert_eq!(result, "/test?items[0][id]=1&items[1][id]=2&items[1][tags][0]=x");
}

#[rstest]
#[case("/test/:id/path", json!({ "id": "test" }), "/test/test/path")]
#[case("/test/:id/:test/path", json!({ "id": "test", "test": "test2" }), "/test/test/test2/path")]
#[case("/users/:id/posts/:postId", json!({ "id": 1, "postId": 20 }), "/users/1/posts/20")]
#[case("/flags/:on", json!({ "on": false }), "/flags/false")]
fn replaces_path_params(#[case] template: &str, #[case] params: Value, #[case] expected: &str) {
    let path = define_path(template, PathOptions::new()).unwrap();
    let values = PathValues::new().with_params(&params).unwrap();

    assert_eq!(serialize(&path, &values), expected);
}

#[test]
fn combines_params_and_query() {
    let path = define_path(
        "/test/:id",
        PathOptions::new()
            .params(object! { "id": Shape::Number })
            .query(object! { "page": Shape::Number }),
    )
    .unwrap();

    let values = PathValues::new()
        .with_params(&json!({ "id": 5 }))
        .and_then(|values| values.with_query(&json!({ "page": 2 })))
        .unwrap();

    assert_eq!(serialize(&path, &values), "/test/5?page=2");
}

#[test]
fn without_query_omits_question_mark() {
    let path = define_path("/test/path", PathOptions::new()).unwrap();
    assert_eq!(serialize(&path, &PathValues::new()), "/test/path");
}
