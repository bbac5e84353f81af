use mpfem_registry::Registry;
use rayon::prelude::*;
use std::sync::Arc;

const NUM_ITEMS: usize = 1000;

fn item_name(i: usize) -> String {
    format!("item_{i}")
}

fn nested_item_path(i: usize) -> String {
    format!("path.to.the.registry.new_item.item_{i}")
}

#[test]
fn parallel_add_and_remove() {
    let registry = Registry::global();

    (0..NUM_ITEMS).into_par_iter().for_each(|i| {
        assert!(!registry.has_item(&item_name(i)));
    });

    (0..NUM_ITEMS).into_par_iter().for_each(|i| {
        let name = item_name(i);
        registry.add_item(&name).unwrap();
        assert!(registry.has_item(&name));
        assert_eq!(registry.get_item(&name).unwrap().name(), name);
    });

    (0..NUM_ITEMS).into_par_iter().for_each(|i| {
        let name = item_name(i);
        assert!(registry.has_item(&name));
        assert_eq!(registry.get_item(&name).unwrap().name(), name);
    });

    (0..NUM_ITEMS).into_par_iter().for_each(|i| {
        let path = nested_item_path(i);
        registry.add_item(&path).unwrap();
        assert!(registry.has_item(&path));
        assert_eq!(registry.get_item(&path).unwrap().name(), item_name(i));
    });

    (0..NUM_ITEMS).into_par_iter().for_each(|i| {
        let path = nested_item_path(i);
        assert!(registry.has_item(&path));
        assert_eq!(registry.get_item(&path).unwrap().name(), item_name(i));
    });

    // No entry was lost or duplicated, and the shared prefix was only created once
    let nested_parent = registry.get_item("path.to.the.registry.new_item").unwrap();
    assert_eq!(nested_parent.len(), NUM_ITEMS);
    assert_eq!(registry.get_item("path").unwrap().len(), 1);

    (0..NUM_ITEMS).into_par_iter().for_each(|i| {
        let name = item_name(i);
        registry.remove_item(&name).unwrap();
        assert!(!registry.has_item(&name));
    });

    (0..NUM_ITEMS).into_par_iter().for_each(|i| {
        let path = nested_item_path(i);
        registry.remove_item(&path).unwrap();
        assert!(!registry.has_item(&path));
    });

    assert!((0..NUM_ITEMS).all(|i| !registry.has_item(&item_name(i))));
    assert!((0..NUM_ITEMS).all(|i| !registry.has_item(&nested_item_path(i))));
    assert!(!nested_parent.has_items());
}

#[test]
fn parallel_values_under_separate_parents() {
    let registry = Registry::new();

    (0..NUM_ITEMS).into_par_iter().for_each(|i| {
        let path = format!("elements.block_{}.element_{i}.area", i % 7);
        registry.add_value_item(&path, i as f64 * 0.5).unwrap();
    });

    let total: usize = registry.get_item("elements").unwrap().items().iter().map(|block| block.len()).sum();
    assert_eq!(total, NUM_ITEMS);

    (0..NUM_ITEMS).into_par_iter().for_each(|i| {
        let path = format!("elements.block_{}.element_{i}.area", i % 7);
        assert_eq!(registry.get_value::<f64>(&path).unwrap(), i as f64 * 0.5);
    });
}

#[test]
fn readers_see_complete_items_during_concurrent_writes() {
    let registry = Registry::new();
    let stable = registry.add_value_item("stable.value", 1_i32).unwrap();

    (0..NUM_ITEMS).into_par_iter().for_each(|i| {
        if i % 2 == 0 {
            let path = format!("churn.item_{i}");
            registry.add_item(&path).unwrap();
            registry.remove_item(&path).unwrap();
        } else {
            // Reads of an unrelated key are unaffected by the writers
            let item = registry.get_item("stable.value").unwrap();
            assert!(Arc::ptr_eq(&item, &stable));
            assert_eq!(item.get_value::<i32>().unwrap(), 1);
            let _ = registry.to_json("  ");
        }
    });

    assert!(!registry.get_item("churn").map(|item| item.has_items()).unwrap_or(false));
}

#[test]
fn global_registry_initializes_once_under_contention() {
    // Raw pointers are not Send, so compare addresses
    let roots: Vec<usize> = (0..64)
        .into_par_iter()
        .map(|_| Arc::as_ptr(Registry::global().root_item()) as usize)
        .collect();
    assert!(roots.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn concurrent_adds_of_the_same_key() {
    let registry = Registry::new();

    let results: Vec<_> = (0..NUM_ITEMS)
        .into_par_iter()
        .map(|_| registry.add_item("a.b.same"))
        .collect();

    let successes = results.iter().filter(|result| result.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|result| matches!(result, Err(err) if err.is_conflict() && err.path() == "a.b.same"))
        .count();
    assert_eq!(successes, 1);
    assert_eq!(conflicts, NUM_ITEMS - 1);

    assert_eq!(registry.get_item("a").unwrap().len(), 1);
    assert_eq!(registry.get_item("a.b").unwrap().len(), 1);
    assert!(registry.has_item("a.b.same"));
}

#[test]
fn add_and_remove_churn_on_one_key() {
    let registry = Registry::new();
    registry.add_item("churn.anchor").unwrap();

    (0..NUM_ITEMS).into_par_iter().for_each(|i| {
        if i % 2 == 0 {
            match registry.add_item("churn.key") {
                Ok(item) => assert_eq!(item.name(), "key"),
                Err(err) => assert!(err.is_conflict()),
            }
        } else {
            match registry.remove_item("churn.key") {
                Ok(item) => assert_eq!(item.name(), "key"),
                Err(err) => assert!(err.is_not_found()),
            }
        }
    });

    // Whatever the interleaving, the parent is consistent with what lookups report
    let parent = registry.get_item("churn").unwrap();
    let present = registry.has_item("churn.key");
    assert_eq!(parent.has_item("key"), present);
    assert_eq!(parent.len(), 1 + usize::from(present));
    assert_eq!(parent.item_names()[0], "anchor");

    if present {
        registry.remove_item("churn.key").unwrap();
    }
    assert!(!registry.has_item("churn.key"));
    registry.add_item("churn.key").unwrap();
    assert_eq!(parent.item_names(), vec!["anchor", "key"]);
}
