use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use proptest::prelude::*;

use crate::{OwningList, RefCountedPtr, WeakRef};

#[derive(Clone, Debug)]
enum ListOp {
    PushBack(u16),
    PushFront(u16),
    PopBack,
    PopFront,
    Clear,
}

fn list_op() -> impl Strategy<Value = ListOp> {
    prop_oneof![
        4 => any::<u16>().prop_map(ListOp::PushBack),
        4 => any::<u16>().prop_map(ListOp::PushFront),
        3 => Just(ListOp::PopBack),
        3 => Just(ListOp::PopFront),
        1 => Just(ListOp::Clear),
    ]
}

#[derive(Clone, Debug)]
enum HandleOp {
    CloneStrong(usize),
    DropStrong(usize),
    Downgrade(usize),
    CloneWeak(usize),
    DropWeak(usize),
    Lock(usize),
}

fn handle_op() -> impl Strategy<Value = HandleOp> {
    prop_oneof![
        (0..8_usize).prop_map(HandleOp::CloneStrong),
        (0..8_usize).prop_map(HandleOp::DropStrong),
        (0..8_usize).prop_map(HandleOp::Downgrade),
        (0..8_usize).prop_map(HandleOp::CloneWeak),
        (0..8_usize).prop_map(HandleOp::DropWeak),
        (0..8_usize).prop_map(HandleOp::Lock),
    ]
}

struct Counted(Rc<Cell<usize>>);
impl Drop for Counted {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

proptest! {
    #[test]
    fn list_matches_deque(ops in prop::collection::vec(list_op(), 0..256)) {
        let mut list = OwningList::new();
        let mut model = VecDeque::new();

        for op in ops {
            match op {
                ListOp::PushBack(v) => {
                    list.push_back(v);
                    model.push_back(v);
                }
                ListOp::PushFront(v) => {
                    list.push_front(v);
                    model.push_front(v);
                }
                ListOp::PopBack => {
                    prop_assert_eq!(list.pop_back(), model.pop_back());
                }
                ListOp::PopFront => {
                    prop_assert_eq!(list.pop_front(), model.pop_front());
                }
                ListOp::Clear => {
                    list.clear();
                    model.clear();
                }
            }

            prop_assert_eq!(list.len(), model.len());
            prop_assert_eq!(list.is_empty(), list.front().is_none());
            prop_assert_eq!(list.front(), model.front());
            prop_assert_eq!(list.back(), model.back());
        }

        let forward: Vec<u16> = list.iter().copied().collect();
        let mut backward: Vec<u16> = list.iter().rev().copied().collect();
        backward.reverse();
        prop_assert_eq!(&forward, &backward);
        prop_assert!(forward.iter().eq(model.iter()));
    }

    #[test]
    fn list_clone_is_independent(values in prop::collection::vec(any::<u16>(), 0..64), extra in any::<u16>()) {
        let list: OwningList<u16> = values.iter().copied().collect();
        let mut copy = list.clone();
        prop_assert_eq!(&copy, &list);

        copy.push_front(extra);
        copy.pop_back();
        prop_assert!(list.iter().eq(values.iter()));
    }

    #[test]
    fn instance_dropped_once(ops in prop::collection::vec(handle_op(), 0..128)) {
        let dropped = Rc::new(Cell::new(0));
        let mut strong = vec![RefCountedPtr::new(Counted(dropped.clone()))];
        let mut weak: Vec<WeakRef<Counted>> = Vec::new();

        for op in ops {
            match op {
                HandleOp::CloneStrong(i) => {
                    if let Some(s) = strong.get(i % strong.len().max(1)) {
                        let clone = s.clone();
                        strong.push(clone);
                    }
                }
                HandleOp::DropStrong(i) => {
                    if !strong.is_empty() {
                        let n = strong.len();
                        strong.remove(i % n);
                    }
                }
                HandleOp::Downgrade(i) => {
                    if let Some(s) = strong.get(i % strong.len().max(1)) {
                        weak.push(s.downgrade());
                    }
                }
                HandleOp::CloneWeak(i) => {
                    if let Some(w) = weak.get(i % weak.len().max(1)) {
                        let clone = w.clone();
                        weak.push(clone);
                    }
                }
                HandleOp::DropWeak(i) => {
                    if !weak.is_empty() {
                        let n = weak.len();
                        weak.remove(i % n);
                    }
                }
                HandleOp::Lock(i) => {
                    if let Some(w) = weak.get(i % weak.len().max(1)) {
                        let locked = w.lock();
                        prop_assert_eq!(locked.is_null(), strong.is_empty());
                        if !locked.is_null() {
                            strong.push(locked);
                        }
                    }
                }
            }

            prop_assert_eq!(dropped.get(), usize::from(strong.is_empty()));
            if let Some(s) = strong.first() {
                prop_assert_eq!(s.use_count(), strong.len());
                prop_assert_eq!(s.weak_count(), weak.len());
            }
            for w in &weak {
                prop_assert_eq!(w.expired(), strong.is_empty());
                prop_assert_eq!(w.use_count(), strong.len());
                prop_assert_eq!(w.weak_count(), weak.len());
            }
        }

        drop(strong);
        drop(weak);
        prop_assert_eq!(dropped.get(), 1);
    }
}
