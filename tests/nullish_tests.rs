use deep_value::{has_nullish, value, EntryMap, Value, ValueSet};

#[test]
fn test_base_cases() {
    assert!(has_nullish(&Value::Null));
    assert!(!has_nullish(&Value::from(42)));
    assert!(has_nullish(&value!({ "a": { "b": { "c": undefined } } })));
    assert!(!has_nullish(&value!({ "a": 1, "b": "x" })));
}

#[test]
fn test_nan_counts() {
    assert!(has_nullish(&value!([1, (f64::NAN)])));
    assert!(!has_nullish(&value!([1, (f64::INFINITY)])));
}

#[test]
fn test_self_reference_terminates() {
    let obj = value!({ "a": 1 });
    obj.set_field("self", obj.clone());
    assert!(!has_nullish(&obj));

    let obj2 = value!({ "a": 1, "b": null });
    obj2.set_field("self", obj2.clone());
    assert!(has_nullish(&obj2));
}

#[test]
fn test_nullish_behind_a_cycle() {
    let a = value!({ "v": 1 });
    let b = value!({ "v": 2, "hole": undefined });
    a.set_field("b", b.clone());
    b.set_field("a", a.clone());
    assert!(has_nullish(&a));
}

#[test]
fn test_sets_and_maps_are_searched() {
    let set: ValueSet = vec![Value::from(1), value!([null])].into_iter().collect();
    assert!(has_nullish(&Value::set(set)));

    let mut entries = EntryMap::new();
    entries.insert(Value::from("k"), Value::Null);
    assert!(has_nullish(&Value::map(entries)));

    let mut entries = EntryMap::new();
    entries.insert(Value::from("k"), Value::from("v"));
    assert!(!has_nullish(&Value::map(entries)));
}

#[test]
fn test_dates_and_patterns_are_clean() {
    let v = value!({});
    v.set_field("re", Value::pattern("a", ""));
    assert!(!has_nullish(&v));
}

#[test]
fn test_top_level_arrays() {
    assert!(has_nullish(&value!([1, 2, null])));
    assert!(!has_nullish(&value!([1, 2, 3])));
    assert!(has_nullish(&value!([{ "a": undefined }])));
    assert!(has_nullish(&value!([[1], [2, (f64::NAN)]])));
}
