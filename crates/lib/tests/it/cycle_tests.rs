//! Merging self-referential and mutually referential inputs.
//!
//! These mirror the testable properties of the engine's cycle handling:
//! termination, convergence of repeated cycles to one shared node, and
//! non-mutation of cyclic inputs.

use cyclemerge::{Pairs, Record, Value, merge_slice};

use crate::helpers::{as_list, as_record, list, record, set, snapshot};

/// `{ a: 1, me: <self> }`
fn self_ref_record(key: &str, field: &str, n: i64) -> Record {
    let rec = Record::new();
    rec.set(field, n);
    rec.set(key, rec.clone());
    rec
}

#[test]
fn test_self_reference_plus_plain_record() {
    let obj1 = self_ref_record("o", "a", 1);
    let obj2 = record(&[("b", Value::Int(2))]);

    for candidates in [
        [Value::from(obj1.clone()), Value::from(obj2.clone())],
        [Value::from(obj2.clone()), Value::from(obj1.clone())],
    ] {
        let merged = as_record(&merge_slice(&candidates));

        // no input aliasing at the top
        assert!(!merged.ptr_eq(&obj1));
        assert!(!merged.ptr_eq(&obj2));

        // the cycle collapses to one shared node
        let o = merged.get_as::<Record>("o").unwrap();
        let o_o = o.get_as::<Record>("o").unwrap();
        assert!(!merged.ptr_eq(&o));
        assert!(o.ptr_eq(&o_o));

        assert_eq!(merged.get_as::<i64>("a"), Some(1));
        assert_eq!(merged.get_as::<i64>("b"), Some(2));
    }
}

#[test]
fn test_two_independent_self_references() {
    let obj1 = self_ref_record("o1", "a", 1);
    let obj2 = self_ref_record("o2", "b", 2);

    for candidates in [
        [Value::from(obj1.clone()), Value::from(obj2.clone())],
        [Value::from(obj2.clone()), Value::from(obj1.clone())],
    ] {
        let merged = as_record(&merge_slice(&candidates));

        let o1 = merged.get_as::<Record>("o1").unwrap();
        let o2 = merged.get_as::<Record>("o2").unwrap();
        assert!(!merged.ptr_eq(&o1));
        assert!(!merged.ptr_eq(&o2));
        assert!(o1.ptr_eq(&o1.get_as::<Record>("o1").unwrap()));
        assert!(o2.ptr_eq(&o2.get_as::<Record>("o2").unwrap()));
        assert_eq!(merged.get_as::<i64>("a"), Some(1));
        assert_eq!(merged.get_as::<i64>("b"), Some(2));
    }
}

#[test]
fn test_cycle_nested_below_a_merged_record() {
    // obj1 = { a: 1, value: { o: obj1 } }, obj2 = { b: 2, value: { c: 3 } }
    let obj1 = Record::new();
    obj1.set("a", 1);
    let inner1 = Record::new();
    inner1.set("o", obj1.clone());
    obj1.set("value", inner1);

    let obj2 = record(&[
        ("b", Value::Int(2)),
        ("value", record(&[("c", Value::Int(3))]).into()),
    ]);

    for candidates in [
        [Value::from(obj1.clone()), Value::from(obj2.clone())],
        [Value::from(obj2.clone()), Value::from(obj1.clone())],
    ] {
        let merged = as_record(&merge_slice(&candidates));

        let value = merged.get_as::<Record>("value").unwrap();
        let o = value.get_as::<Record>("o").unwrap();
        // the nested "value" records merged into a fresh node, but the
        // cycle target is stable: o.value.o is o itself
        assert!(!merged.ptr_eq(&o));
        assert!(!value.ptr_eq(&o.get_as::<Record>("value").unwrap()));
        assert!(o.ptr_eq(
            &o.get_as::<Record>("value")
                .unwrap()
                .get_as::<Record>("o")
                .unwrap()
        ));
        assert_eq!(value.get_as::<i64>("c"), Some(3));
    }
}

#[test]
fn test_repeated_cycle_aliases_stay_aliased() {
    // obj1 = { a: 1, o1: obj1, o2: obj1 }
    let obj1 = Record::new();
    obj1.set("a", 1);
    obj1.set("o1", obj1.clone());
    obj1.set("o2", obj1.clone());
    let obj2 = record(&[("b", Value::Int(2))]);

    for candidates in [
        [Value::from(obj1.clone()), Value::from(obj2.clone())],
        [Value::from(obj2.clone()), Value::from(obj1.clone())],
    ] {
        let merged = as_record(&merge_slice(&candidates));

        let o1 = merged.get_as::<Record>("o1").unwrap();
        let o2 = merged.get_as::<Record>("o2").unwrap();
        assert!(!merged.ptr_eq(&o1));
        assert!(o1.ptr_eq(&o2));
        assert!(o1.ptr_eq(&o1.get_as::<Record>("o1").unwrap()));
        assert!(o1.ptr_eq(&o1.get_as::<Record>("o2").unwrap()));
        assert!(o1.ptr_eq(&o2.get_as::<Record>("o1").unwrap()));
    }
}

#[test]
fn test_mutual_cross_references_survive() {
    // obj1 = { a: 1, o2: obj2 }, obj2 = { b: 2, o1: obj1 }
    let obj1 = Record::new();
    let obj2 = Record::new();
    obj1.set("a", 1);
    obj1.set("o2", obj2.clone());
    obj2.set("b", 2);
    obj2.set("o1", obj1.clone());

    for candidates in [
        [Value::from(obj1.clone()), Value::from(obj2.clone())],
        [Value::from(obj2.clone()), Value::from(obj1.clone())],
    ] {
        let merged = as_record(&merge_slice(&candidates));

        let o1 = merged.get_as::<Record>("o1").unwrap();
        let o2 = merged.get_as::<Record>("o2").unwrap();
        assert!(!merged.ptr_eq(&o1));
        assert!(!merged.ptr_eq(&o2));
        assert!(o1.ptr_eq(&o2.get_as::<Record>("o1").unwrap()));
        assert!(o2.ptr_eq(&o1.get_as::<Record>("o2").unwrap()));
    }
}

#[test]
fn test_two_self_cycles_fuse_into_one_node() {
    // obj1 = { a: 1, o: obj1 }, obj2 = { b: 2, o: obj2 }: the per-key merge
    // of [obj1, obj2] is the same combination as the top-level merge, so the
    // output is a record that references itself.
    let obj1 = self_ref_record("o", "a", 1);
    let obj2 = self_ref_record("o", "b", 2);

    // cross-referential variant fuses identically
    let obj3 = Record::new();
    let obj4 = Record::new();
    obj3.set("a", 1);
    obj4.set("b", 2);
    obj3.set("o", obj4.clone());
    obj4.set("o", obj3.clone());

    for candidates in [
        [Value::from(obj1.clone()), Value::from(obj2.clone())],
        [Value::from(obj2.clone()), Value::from(obj1.clone())],
        [Value::from(obj3.clone()), Value::from(obj4.clone())],
        [Value::from(obj4.clone()), Value::from(obj3.clone())],
    ] {
        let merged = as_record(&merge_slice(&candidates));

        let o = merged.get_as::<Record>("o").unwrap();
        assert!(merged.ptr_eq(&o));
        assert!(o.ptr_eq(&o.get_as::<Record>("o").unwrap()));
        assert_eq!(merged.get_as::<i64>("a"), Some(1));
        assert_eq!(merged.get_as::<i64>("b"), Some(2));
    }
}

#[test]
fn test_nested_self_cycles_fuse_through_an_intermediate() {
    // obj1 = { a: 1, value: { o: obj1 } }, obj2 = { b: 2, value: { o: obj2 } }
    let obj1 = Record::new();
    obj1.set("a", 1);
    let inner1 = Record::new();
    inner1.set("o", obj1.clone());
    obj1.set("value", inner1);

    let obj2 = Record::new();
    obj2.set("b", 2);
    let inner2 = Record::new();
    inner2.set("o", obj2.clone());
    obj2.set("value", inner2);

    for candidates in [
        [Value::from(obj1.clone()), Value::from(obj2.clone())],
        [Value::from(obj2.clone()), Value::from(obj1.clone())],
    ] {
        let merged = as_record(&merge_slice(&candidates));

        // merged.value.o is the merged top record itself
        let value = merged.get_as::<Record>("value").unwrap();
        let o = value.get_as::<Record>("o").unwrap();
        assert!(merged.ptr_eq(&o));
        assert!(o.ptr_eq(
            &o.get_as::<Record>("value")
                .unwrap()
                .get_as::<Record>("o")
                .unwrap()
        ));
    }
}

#[test]
fn test_merging_a_record_with_itself() {
    let obj = self_ref_record("o", "a", 1);

    let merged = as_record(&merge_slice(&[
        Value::from(obj.clone()),
        Value::from(obj.clone()),
    ]));

    // a fresh record whose cycle points at itself
    assert!(!merged.ptr_eq(&obj));
    assert!(merged.ptr_eq(&merged.get_as::<Record>("o").unwrap()));
    assert_eq!(merged.get_as::<i64>("a"), Some(1));
}

#[test]
fn test_cyclic_list_plus_plain_list() {
    // arr1 = [1, arr1], arr2 = [2]
    let arr1 = cyclemerge::List::new();
    arr1.push(1);
    arr1.push(arr1.clone());
    let arr2 = list(&[Value::Int(2)]);

    let merged = as_list(&merge_slice(&[
        Value::from(arr1.clone()),
        Value::from(arr2.clone()),
    ]));
    // [2, <cycle node>]
    assert_eq!(merged.get(0), Some(Value::Int(2)));
    let tail = merged.get_as::<cyclemerge::List>(1).unwrap();
    assert!(!merged.ptr_eq(&tail));
    assert!(tail.ptr_eq(&tail.get_as::<cyclemerge::List>(1).unwrap()));

    let merged = as_list(&merge_slice(&[
        Value::from(arr2.clone()),
        Value::from(arr1.clone()),
    ]));
    assert_eq!(merged.get(0), Some(Value::Int(1)));
    let tail = merged.get_as::<cyclemerge::List>(1).unwrap();
    assert!(tail.ptr_eq(&tail.get_as::<cyclemerge::List>(1).unwrap()));
}

#[test]
fn test_two_cyclic_lists_fuse() {
    // arr1 = [1, arr1], arr2 = [2, arr2]
    let arr1 = cyclemerge::List::new();
    arr1.push(1);
    arr1.push(arr1.clone());
    let arr2 = cyclemerge::List::new();
    arr2.push(2);
    arr2.push(arr2.clone());

    let merged = as_list(&merge_slice(&[
        Value::from(arr1.clone()),
        Value::from(arr2.clone()),
    ]));
    assert_eq!(merged.get(0), Some(Value::Int(2)));
    assert!(merged.ptr_eq(&merged.get_as::<cyclemerge::List>(1).unwrap()));

    let merged = as_list(&merge_slice(&[
        Value::from(arr2.clone()),
        Value::from(arr1.clone()),
    ]));
    assert_eq!(merged.get(0), Some(Value::Int(1)));
    assert!(merged.ptr_eq(&merged.get_as::<cyclemerge::List>(1).unwrap()));
}

#[test]
fn test_mutually_referential_pair_collections() {
    // map1 = { a: 1, o2: map2 }, map2 = { b: 2, o1: map1 }
    let map1 = Pairs::new();
    let map2 = Pairs::new();
    map1.set("a", 1);
    map1.set("o2", map2.clone());
    map2.set("b", 2);
    map2.set("o1", map1.clone());

    for candidates in [
        [Value::from(map1.clone()), Value::from(map2.clone())],
        [Value::from(map2.clone()), Value::from(map1.clone())],
    ] {
        let merged = merge_slice(&candidates);
        let merged = merged.as_pairs().unwrap().clone();

        let o1 = merged.get(&Value::from("o1")).unwrap();
        let o1 = o1.as_pairs().unwrap();
        let o2 = merged.get(&Value::from("o2")).unwrap();
        let o2 = o2.as_pairs().unwrap();
        assert!(!merged.ptr_eq(o1));
        assert!(!merged.ptr_eq(o2));
        assert!(o1.ptr_eq(o2.get(&Value::from("o1")).unwrap().as_pairs().unwrap()));
        assert!(o2.ptr_eq(o1.get(&Value::from("o2")).unwrap().as_pairs().unwrap()));
        assert_eq!(merged.get(&Value::from("a")), Some(Value::Int(1)));
        assert_eq!(merged.get(&Value::from("b")), Some(Value::Int(2)));
    }
}

#[test]
fn test_two_self_referential_pair_collections_fuse() {
    let map1 = Pairs::new();
    map1.set("a", 1);
    map1.set("o", map1.clone());
    let map2 = Pairs::new();
    map2.set("b", 2);
    map2.set("o", map2.clone());

    let merged = merge_slice(&[Value::from(map1), Value::from(map2)]);
    let merged = merged.as_pairs().unwrap().clone();
    let o = merged.get(&Value::from("o")).unwrap();
    assert!(merged.ptr_eq(o.as_pairs().unwrap()));
}

#[test]
fn test_sets_containing_each_other_union_by_identity() {
    // set1 = { 1, set2 }, set2 = { 2, set1 }
    let set1 = cyclemerge::ValueSet::new();
    let set2 = cyclemerge::ValueSet::new();
    set1.insert(1);
    set1.insert(set2.clone());
    set2.insert(2);
    set2.insert(set1.clone());

    let merged = merge_slice(&[Value::from(set1.clone()), Value::from(set2.clone())]);
    let merged = merged.as_set().unwrap().clone();

    // elements are never merged: the union holds both original sets
    assert_eq!(merged.len(), 4);
    assert!(merged.contains(&Value::Int(1)));
    assert!(merged.contains(&Value::Int(2)));
    assert!(merged.contains(&Value::from(set1)));
    assert!(merged.contains(&Value::from(set2)));
}

#[test]
fn test_cyclic_inputs_are_not_mutated() {
    let obj1 = self_ref_record("o", "a", 1);
    let obj2 = self_ref_record("o", "b", 2);
    let v1 = Value::from(obj1);
    let v2 = Value::from(obj2);

    let before = (snapshot(&v1), snapshot(&v2));
    let _ = merge_slice(&[v1.clone(), v2.clone()]);
    let _ = merge_slice(&[v2.clone(), v1.clone()]);
    let after = (snapshot(&v1), snapshot(&v2));
    assert_eq!(before, after);
}

#[test]
fn test_deeply_nested_merging_terminates() {
    // a straight-line deep structure, no cycles, to exercise recursion depth
    let mut v1 = record(&[("leaf", Value::Int(1))]);
    let mut v2 = record(&[("leaf", Value::Int(2))]);
    for _ in 0..200 {
        v1 = record(&[("next", v1.into())]);
        v2 = record(&[("next", v2.into())]);
    }

    let mut merged = as_record(&merge_slice(&[v1.into(), v2.into()]));
    for _ in 0..200 {
        merged = merged.get_as::<Record>("next").unwrap();
    }
    assert_eq!(merged.get_as::<i64>("leaf"), Some(2));
}

#[test]
fn test_set_inside_cyclic_record_merges_once() {
    // cycles above a set do not disturb the set union below them
    let obj1 = Record::new();
    obj1.set("tags", set(&[Value::Int(1), Value::Int(2)]));
    obj1.set("me", obj1.clone());
    let obj2 = Record::new();
    obj2.set("tags", set(&[Value::Int(2), Value::Int(3)]));
    obj2.set("me", obj2.clone());

    let merged = as_record(&merge_slice(&[Value::from(obj1), Value::from(obj2)]));
    assert!(merged.ptr_eq(&merged.get_as::<Record>("me").unwrap()));
    let tags = merged.get("tags").unwrap();
    let tags = tags.as_set().unwrap();
    assert_eq!(tags.len(), 3);
}
