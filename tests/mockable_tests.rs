//! Integration tests for the `#[mockwright::mockable]` macro.

#![cfg(feature = "macros")]

use mockwright::prelude::*;

#[mockwright::mockable]
trait Repository {
    fn find(&self, id: i64) -> Option<String>;
    fn insert(&self, id: i64, name: &str) -> bool;
    fn names(&self) -> Vec<String>;
    fn clear(&self);
}

fn rename(repository: &dyn Repository, id: i64, name: &str) -> bool {
    repository.find(id).is_some() && repository.insert(id, name)
}

#[test]
fn test_trait_methods_forward_to_mock() {
    let mocked = Mock::create();
    mocked
        .setup([
            setup_function("find").implemented_by(|args| match args[0].as_i64() {
                Some(1) => Value::from("ada"),
                _ => Value::Null,
            }),
            setup_function("insert").returning(true),
            setup_function("names").returning(vec!["ada", "grace"]),
            setup_function("clear"),
        ])
        .unwrap();

    let repository = mocked.mock();
    assert!(rename(&repository, 1, "lovelace"));
    assert!(!rename(&repository, 2, "hopper"));
    assert_eq!(repository.names(), vec!["ada".to_string(), "grace".to_string()]);
    repository.clear();

    mocked.with_function("find").unwrap().was_called_times(2).unwrap();
    mocked
        .with_function("insert")
        .unwrap()
        .with_parameters(params![1, "lovelace"])
        .strict()
        .was_called_once()
        .unwrap();
    mocked.with_function("clear").unwrap().was_called_once().unwrap();
}

#[test]
#[should_panic(expected = "Function \"find\" has no mock configuration.")]
fn test_missing_setup_panics() {
    let mocked = Mock::create();
    let _ = mocked.mock().find(1);
}

#[test]
#[should_panic(expected = "Expected a value of type")]
fn test_wrong_return_type_panics() {
    let mocked = Mock::create();
    mocked
        .setup([setup_function("insert").returning("yes")])
        .unwrap();
    let _ = mocked.mock().insert(1, "x");
}
