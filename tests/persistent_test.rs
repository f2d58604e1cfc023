use oxstore::{
    Context, Literal, OpenStatus, OxStore, PersistentOxStore, StoreError, StoreResult, Term, Triple, TriplePattern,
    DEFAULT_GRAPH,
};
use tempfile::TempDir;

fn sample_triples() -> Vec<Triple> {
    let p = Term::named_node("http://example.com/p");
    vec![
        Triple::new(Term::named_node("http://example.com/a"), p.clone(), Term::literal("one")),
        Triple::new(
            Term::blank_node("b1"),
            p.clone(),
            Literal::new_language_tagged_literal("zwei", "de"),
        ),
        Triple::new(
            Term::named_node("http://example.com/c"),
            p,
            Literal::new_typed_literal("3", "http://www.w3.org/2001/XMLSchema#integer"),
        ),
    ]
}

fn open(location: &str) -> PersistentOxStore {
    let mut store = PersistentOxStore::new();
    assert_eq!(store.open(location, true).unwrap(), OpenStatus::Valid);
    store
}

#[test]
fn test_quads_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let location = temp_dir.path().join("db");
    let location = location.to_str().unwrap();
    let g1 = Context::named(Term::named_node("http://example.com/g1"));

    {
        let mut store = open(location);
        store.add_all(sample_triples(), &g1).unwrap();
        store.add(&sample_triples()[0], &DEFAULT_GRAPH, false).unwrap();
        store.close().unwrap();
    }

    let mut store = open(location);
    assert_eq!(store.len(None).unwrap(), 3);
    assert_eq!(store.len(Some(&g1)).unwrap(), 3);
    assert_eq!(store.len(Some(&DEFAULT_GRAPH)).unwrap(), 1);

    let mut found: Vec<Triple> = store
        .triples(&TriplePattern::any(), Some(&g1))
        .unwrap()
        .map(|item| item.map(|(triple, _)| triple))
        .collect::<StoreResult<_>>()
        .unwrap();
    let mut expected = sample_triples();
    found.sort_by_key(|t| t.to_string());
    expected.sort_by_key(|t| t.to_string());
    assert_eq!(found, expected);
}

#[test]
fn test_yaml_configuration() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("store.yml");
    std::fs::write(&config_file, "path: data\nrocksdb:\n  compression: none\n").unwrap();

    let mut store = open(config_file.to_str().unwrap());
    assert_eq!(store.path(), Some(temp_dir.path().join("data").as_path()));
    store.add(&sample_triples()[1], &DEFAULT_GRAPH, false).unwrap();
    store.close().unwrap();

    assert!(temp_dir.path().join("data").exists());
}

#[test]
fn test_lazy_fallback_is_transient() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = PersistentOxStore::new();

    // Used before open: a transient in-memory store is materialized
    store.add(&sample_triples()[0], &DEFAULT_GRAPH, false).unwrap();
    assert_eq!(store.len(None).unwrap(), 1);
    assert_eq!(store.path(), None);

    // Opening replaces it, dropping what it held
    store.open(temp_dir.path().to_str().unwrap(), true).unwrap();
    assert_eq!(store.len(None).unwrap(), 0);
}

#[test]
fn test_closed_store_fails() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = open(temp_dir.path().to_str().unwrap());
    store.close().unwrap();

    assert!(matches!(store.len(None), Err(StoreError::Closed)));
    assert!(matches!(
        store.remove(&TriplePattern::any(), None),
        Err(StoreError::Closed)
    ));
    assert!(matches!(store.contexts(None).err(), Some(StoreError::Closed)));

    // Closing twice is harmless
    store.close().unwrap();
}

#[test]
fn test_open_failure_passes_through() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.yaml");

    let mut store = PersistentOxStore::new();
    let result = store.open(missing.to_str().unwrap(), true);
    assert!(matches!(result, Err(StoreError::Storage(_))));
}
