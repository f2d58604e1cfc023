use oxstore::{
    dump, load, Context, LoadError, MemoryOxStore, OxStore, PersistentOxStore, RdfFormat, StoreError, Term,
    TriplePattern, DEFAULT_GRAPH,
};
use tempfile::TempDir;

const TRIG: &str = r#"
@prefix ex: <http://example.com/> .

ex:foo a ex:Entity .

ex:g1 {
    ex:foo a ex:Entity ;
        ex:label "Foo"@en, "Foo"^^<http://www.w3.org/2001/XMLSchema#string> .
}

_:g2 {
    _:b0 ex:count 3 .
}
"#;

#[test]
fn test_load_trig_graphs() {
    let mut store = MemoryOxStore::new();
    let count = load(&mut store, TRIG.as_bytes(), RdfFormat::TriG, &DEFAULT_GRAPH).unwrap();
    assert_eq!(count, 5);

    let g1 = Context::named(Term::named_node("http://example.com/g1"));
    assert_eq!(store.len(Some(&DEFAULT_GRAPH)).unwrap(), 1);
    assert_eq!(store.len(Some(&g1)).unwrap(), 3);
    assert_eq!(store.contexts(None).unwrap().count(), 3);

    // The xsd:string literal is the plain literal
    let plain = TriplePattern::new(None, None, Some(Term::literal("Foo")));
    assert_eq!(store.triples(&plain, Some(&g1)).unwrap().count(), 1);
}

#[test]
fn test_dump_then_load_into_persistent_store() {
    let mut source = MemoryOxStore::new();
    load(&mut source, TRIG.as_bytes(), RdfFormat::TriG, &DEFAULT_GRAPH).unwrap();

    let mut nquads = Vec::new();
    let written = dump(&mut source, &mut nquads, None).unwrap();
    assert_eq!(written, 5);

    let temp_dir = TempDir::new().unwrap();
    let mut target = PersistentOxStore::new();
    target.open(temp_dir.path().to_str().unwrap(), true).unwrap();
    load(&mut target, nquads.as_slice(), RdfFormat::NQuads, &DEFAULT_GRAPH).unwrap();

    assert_eq!(target.len(None).unwrap(), source.len(None).unwrap());
    let mut expected: Vec<String> = source
        .quads(&TriplePattern::any(), None)
        .unwrap()
        .map(|q| q.unwrap().to_string())
        .collect();
    let mut actual: Vec<String> = target
        .quads(&TriplePattern::any(), None)
        .unwrap()
        .map(|q| q.unwrap().to_string())
        .collect();
    expected.sort();
    actual.sort();
    assert_eq!(actual, expected);
}

#[test]
fn test_triple_formats_use_given_context() {
    let mut store = MemoryOxStore::new();
    let input = "<http://example.com/a> <http://example.com/p> \"x\" .\n";
    let g1 = Context::named(Term::blank_node("target"));
    load(&mut store, input.as_bytes(), RdfFormat::NTriples, &g1).unwrap();

    assert_eq!(store.len(Some(&g1)).unwrap(), 1);
    assert!(store.is_empty(Some(&DEFAULT_GRAPH)).unwrap());
}

#[test]
fn test_load_rejects_literal_graph_context() {
    let mut store = MemoryOxStore::new();
    let input = "<http://example.com/a> <http://example.com/p> \"x\" .\n";
    let result = load(
        &mut store,
        input.as_bytes(),
        RdfFormat::NTriples,
        &Context::named(Term::literal("nope")),
    );
    assert!(matches!(result, Err(LoadError::Store(StoreError::InvalidTerm(_)))));
}
