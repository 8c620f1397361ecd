use super::*;

#[test]
fn test_intern_is_stable() {
    let interner = Interner::new();
    let a = interner.intern("foo");
    let b = interner.intern("foo");
    let c = interner.intern("bar");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(&*interner.resolve(a), "foo");
    assert_eq!(&*interner.resolve(c), "bar");
}

#[test]
fn test_empty_string_is_none() {
    let interner = Interner::new();
    assert_eq!(interner.intern(""), Atom::NONE);
    assert!(Atom::NONE.is_none());
    assert!(interner.is_empty());
    assert_eq!(&*interner.resolve(Atom(999)), "");
}

#[test]
fn test_concurrent_interning_agrees() {
    let interner = Interner::new();
    let atoms: Vec<Atom> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| interner.intern("shared")))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(atoms.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(interner.len(), 2);
}
