use std::{sync::mpsc, thread, time::Duration};

use lazylist::{Error, LazyList, SliceBounds, seq::Fibonacci};

fn fib() -> LazyList<Fibonacci<u128>> {
    LazyList::new(Fibonacci::new())
}

/// Endless, and silent about it: size_hint is the default (0, None).
fn endless() -> impl Iterator<Item = u32> {
    let mut n = 0;
    std::iter::from_fn(move || {
        thread::sleep(Duration::from_millis(1));
        n += 1;
        Some(n)
    })
}

/// Runs `f` on a helper thread and reports whether it finished within `wait`.
fn completes_within<F: FnOnce() + Send + 'static>(wait: Duration, f: F) -> bool {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        f();
        let _ = tx.send(());
    });
    rx.recv_timeout(wait).is_ok()
}

#[test]
fn indexing_in_any_order() {
    let l = fib();
    assert_eq!((l.get(0), l.get(3), l.get(10)), (Ok(0), Ok(2), Ok(55)));
    assert_eq!((l.get(8), l.get(7)), (Ok(21), Ok(13)));
    assert_eq!(l.get(100), Ok(354224848179261915075));
}

#[test]
fn lazy_slices() {
    let l = fib();
    assert_eq!(l.slice_lazy(3..7).unwrap().collect::<Vec<_>>(), vec![2, 3, 5, 8]);
    assert_eq!(l.slice_lazy(..5).unwrap().collect::<Vec<_>>(), vec![0, 1, 1, 2, 3]);
    assert_eq!(l.realized(), 7);
}

#[test]
fn open_slice_can_be_abandoned() {
    let l = LazyList::new(endless());
    let first: Vec<_> = l.slice_lazy(10..).unwrap().take(3).collect();
    assert_eq!(first, vec![11, 12, 13]);
    assert_eq!(l.realized(), 13);

    let l = fib();
    let mut tail = l.slice_lazy(10..).unwrap();
    assert_eq!(tail.next(), Some(55));
    assert_eq!(tail.next(), Some(89));
    assert_eq!(tail.next(), Some(144));
    drop(tail);
    assert_eq!(l.realized(), 13);
}

#[test]
fn slices_are_not_indexable() {
    let l = fib();
    for bounds in [SliceBounds::from(5..10), SliceBounds::from(..3), SliceBounds::from(0usize..).with_step(2)] {
        let c = l.slice_lazy(bounds).unwrap();
        assert_eq!(c.get(3), Err(Error::NotIndexable("Cursor")));
    }
}

#[test]
fn rewrapping_a_slice_copies_it() {
    let l = fib();
    let foo = LazyList::new(l.slice_lazy(5..10).unwrap());
    assert_eq!(foo.get(3), Ok(21));
    assert_eq!(foo.cached(), l.cached()[5..9].to_vec());
}

#[test]
fn finite_producer_length_and_range() {
    let l = LazyList::new(Fibonacci::<u128>::new());
    assert_eq!(l.get(187), Err(Error::OutOfRange { index: 187 }));
    assert_eq!(l.len(), Ok(187));
    assert_eq!(l.at(-7), l.get(180));
    assert_eq!(
        l.slice_eager(SliceBounds::new(Some(-3), None, None)).unwrap(),
        l.cached()[184..].to_vec()
    );
}

#[test]
fn truthiness() {
    assert!(LazyList::new(std::iter::empty::<u8>()).is_empty());
    assert!(!LazyList::new(endless()).is_empty());
}

#[test]
fn zero_step_is_invalid() {
    let l = fib();
    let err = l.slice_lazy(SliceBounds::from(0usize..).with_step(0)).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert_eq!(l.realized(), 0);
}

#[test]
fn draining_an_endless_producer_does_not_finish() {
    let wait = Duration::from_millis(200);
    assert!(!completes_within(wait, || {
        let _ = LazyList::new(endless()).len();
    }));
    assert!(!completes_within(wait, || {
        let _ = LazyList::new(endless()).at(-7);
    }));
    assert!(!completes_within(wait, || {
        let l = LazyList::new(endless());
        let _ = l.slice(SliceBounds::new(Some(5), Some(-1), None)).is_ok();
    }));
    assert!(completes_within(Duration::from_secs(5), || {
        let _ = LazyList::new(0..1000).len();
    }));
}
