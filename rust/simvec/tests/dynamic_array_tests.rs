use std::cell::Cell;
use std::rc::Rc;

use simvec::{DynamicArray, ErrorKind, reserve, simvec};

/// Element that counts how many times it was dropped.
#[derive(Debug)]
struct Tracked {
    value: i32,
    drops: Rc<Cell<usize>>,
}

impl Tracked {
    fn new(value: i32, drops: &Rc<Cell<usize>>) -> Tracked {
        Tracked {
            value,
            drops: drops.clone(),
        }
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        Tracked::new(self.value, &self.drops)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

fn values(v: &DynamicArray<Tracked>) -> Vec<i32> {
    v.iter().map(|t| t.value).collect()
}

#[test]
fn test_push_pop_round_trip() {
    let mut v = simvec![1, 2, 3];
    let before = v.clone();
    v.push(4);
    v.pop_back();
    assert_eq!(v, before);

    let mut v = DynamicArray::new();
    for i in 0..100 {
        v.push(i);
    }
    assert_eq!(v.len(), 100);
    assert!(v.capacity() >= 100);
}

#[test]
fn test_growth_doubling_from_empty() {
    let mut v = DynamicArray::new();
    assert_eq!(v.capacity(), 0);
    v.push('a');
    assert_eq!(v.capacity(), 1);
    v.push('b');
    assert_eq!(v.capacity(), 2);
    v.push('c');
    assert_eq!(v.capacity(), 4);
}

#[test]
fn test_insert_erase_inverse() {
    let original = simvec![1, 2, 3, 4, 5];
    for index in 0..=original.len() {
        let mut v = original.clone();
        v.insert(index, 99);
        assert_eq!(v[index], 99);
        v.erase(index);
        assert_eq!(v, original, "index {index}");
    }
}

#[test]
fn test_clone_independence() {
    let mut a = simvec![String::from("x"), String::from("y")];
    let b = a.clone();
    assert_eq!(a, b);

    a[0].push('!');
    a.push(String::from("z"));
    assert_eq!(b, [String::from("x"), String::from("y")]);
    assert_ne!(a, b);
}

#[test]
fn test_move_leaves_source_empty() {
    let mut a = simvec![1, 2, 3];
    let b = std::mem::take(&mut a);
    assert_eq!(a.len(), 0);
    assert!(a.is_empty());
    assert_eq!(b, [1, 2, 3]);

    let mut c = b;
    let d = c.take();
    assert!(c.is_empty());
    assert_eq!(c.capacity(), 0);
    assert_eq!(d.len(), 3);
}

#[test]
fn test_literal_sequence_construction() {
    let v = simvec![10, 20, 30];
    assert_eq!(v.len(), 3);
    assert_eq!(v.capacity(), 3);
    assert_eq!(v[0], 10);
    assert_eq!(v[1], 20);
    assert_eq!(v[2], 30);
}

#[test]
fn test_clear_retains_capacity() {
    let mut v = DynamicArray::<u64>::new();
    v.resize(5);
    v.clear();
    assert_eq!(v.len(), 0);
    assert_eq!(v.capacity(), 5);
}

#[test]
fn test_checked_access_one_past_end() {
    for len in 0..5 {
        let v = DynamicArray::<u8>::with_len(len);
        let err = v.at(v.len()).unwrap_err();
        assert_eq!(
            err.into_kind(),
            ErrorKind::OutOfRange {
                index: len,
                len
            }
        );
    }
}

#[test]
fn test_reserve_tag_and_named_constructor_agree() {
    let a = DynamicArray::<i32>::from(reserve(6));
    let b = DynamicArray::<i32>::with_capacity(6);
    assert_eq!(a.capacity(), b.capacity());
    assert_eq!(a.len(), b.len());
}

#[test]
fn test_every_element_dropped_once() {
    let drops = Rc::new(Cell::new(0));
    {
        let mut v = DynamicArray::new();
        for i in 0..10 {
            v.push(Tracked::new(i, &drops));
        }
        v.insert(3, Tracked::new(100, &drops));
        v.erase(0);
        assert_eq!(drops.get(), 1);

        v.resize_with_value(4, Tracked::new(-1, &drops));
        // The fill value and the six trimmed elements.
        assert_eq!(drops.get(), 8);
        assert_eq!(values(&v), vec![1, 2, 100, 3]);

        v.reserve(64);
        v.pop_back();
        assert_eq!(drops.get(), 9);

        let copy = v.clone();
        v.clear();
        assert_eq!(drops.get(), 12);
        assert_eq!(values(&copy), vec![1, 2, 100]);
    }
    // 11 constructed + 1 fill value + 3 clones.
    assert_eq!(drops.get(), 15);
}

#[test]
fn test_growth_moves_without_dropping() {
    let drops = Rc::new(Cell::new(0));
    let mut v = DynamicArray::new();
    for i in 0..33 {
        v.push(Tracked::new(i, &drops));
    }
    v.reserve(1000);
    v.resize_with_value(40, Tracked::new(7, &drops));
    assert_eq!(drops.get(), 1);
    assert_eq!(v.len(), 40);
    drop(v);
    assert_eq!(drops.get(), 41);
}

#[test]
fn test_panicking_default_leaves_array_consistent() {
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    static CREATED: AtomicUsize = AtomicUsize::new(0);

    #[derive(Debug, PartialEq)]
    struct Fragile(usize);

    impl Default for Fragile {
        fn default() -> Self {
            let n = CREATED.fetch_add(1, Ordering::SeqCst);
            if n == 2 {
                panic!("default construction failed");
            }
            Fragile(n)
        }
    }

    let mut v = DynamicArray::from([Fragile(100)]);
    let result = catch_unwind(AssertUnwindSafe(|| v.resize(6)));
    assert!(result.is_err());
    assert!(v.len() <= v.capacity());
    assert_eq!(v.len(), 3);
    assert_eq!(v[0], Fragile(100));
    assert_eq!(v.capacity(), 6);
}

#[test]
fn test_into_iter_drops_each_element_once() {
    let drops = Rc::new(Cell::new(0));
    let v: DynamicArray<Tracked> = (0..6).map(|i| Tracked::new(i, &drops)).collect();

    let mut it = v.into_iter();
    let front = it.next().unwrap();
    let back = it.next_back().unwrap();
    assert_eq!((front.value, back.value), (0, 5));
    drop(it);
    assert_eq!(drops.get(), 4);
    drop((front, back));
    assert_eq!(drops.get(), 6);
}

#[test]
fn test_swap_exchanges_everything() {
    let mut a = simvec![1, 2, 3];
    let mut b = DynamicArray::from(reserve(10));
    b.push(7);
    let (pa, pb) = (a.as_ptr(), b.as_ptr());

    a.swap(&mut b);
    assert_eq!(a, [7]);
    assert_eq!(a.capacity(), 10);
    assert_eq!(a.as_ptr(), pb);
    assert_eq!(b, [1, 2, 3]);
    assert_eq!(b.capacity(), 3);
    assert_eq!(b.as_ptr(), pa);
}

#[test]
fn test_growth_reallocates() {
    let mut v = simvec![1, 2];
    let before = v.as_ptr();
    v.push(3);
    assert_ne!(v.as_ptr(), before);
    assert_eq!(v, [1, 2, 3]);
}

#[test]
fn test_ordering_operators() {
    assert!(simvec![1, 2, 3] < simvec![1, 2, 4]);
    assert!(simvec![1, 2] < simvec![1, 2, 3]);
    assert!(simvec![1, 2, 3] == simvec![1, 2, 3]);
    assert!(simvec![1, 2, 3] != simvec![1, 2]);
    assert!(simvec![2] > simvec![1, 9, 9]);
    assert!(simvec![1, 2, 3] >= simvec![1, 2, 3]);
    assert!(simvec![1, 2, 3] <= simvec![1, 2, 4]);

    let mut sorted = vec![simvec![3], simvec![1, 2], simvec![1], simvec![]];
    sorted.sort();
    assert_eq!(sorted, vec![simvec![], simvec![1], simvec![1, 2], simvec![3]]);
}

#[test]
fn test_repeat_macro() {
    let v = simvec![String::from("ab"); 3];
    assert_eq!(v.len(), 3);
    assert_eq!(v.capacity(), 3);
    assert!(v.iter().all(|s| s == "ab"));

    let empty: DynamicArray<u8> = simvec![];
    assert_eq!(empty.capacity(), 0);
}

#[test]
fn test_works_across_threads() {
    let mut v = simvec![1, 2, 3];
    let handle = std::thread::spawn(move || {
        v.push(4);
        v
    });
    let v = handle.join().unwrap();
    assert_eq!(v, [1, 2, 3, 4]);
}
