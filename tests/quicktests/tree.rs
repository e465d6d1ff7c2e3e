use rbtree::Tree;

use std::cell::RefCell;
use std::collections::{BTreeSet, HashSet};

use quickcheck::quickcheck;

use crate::Op;

/// Applies a set of operations to a tree and a set.
/// This way we can ensure that after a random smattering of inserts
/// the tree holds the same elements, in the same order, as the set.
fn do_ops<T>(ops: &[Op<T>], tree: &mut Tree<T>, set: &mut BTreeSet<T>)
where
    T: Ord + Clone,
{
    for op in ops {
        match op {
            Op::Insert(x) => {
                assert_eq!(tree.insert(x.clone()), set.insert(x.clone()));
                tree.assert_valid();
            }
            Op::Contains(x) => assert_eq!(tree.contains(x), set.contains(x)),
            Op::Iter => assert!(tree.iter().eq(set.iter())),
        }
    }
}

quickcheck! {
    fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
        let mut tree = Tree::default();
        let mut set = BTreeSet::new();

        do_ops(&ops, &mut tree, &mut set);
        tree.len() == set.len() && tree.iter().eq(set.iter())
    }

    fn fuzz_multiple_operations_strings(ops: Vec<Op<String>>) -> bool {
        let mut tree = Tree::default();
        let mut set = BTreeSet::new();

        do_ops(&ops, &mut tree, &mut set);
        tree.len() == set.len() && tree.iter().eq(set.iter())
    }

    fn contains(xs: Vec<i8>) -> bool {
        let mut tree = Tree::default();
        for x in &xs {
            tree.insert(*x);
        }

        xs.iter().all(|x| tree.contains(x))
    }

    fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
        let mut tree = Tree::default();
        for x in &xs {
            tree.insert(*x);
        }
        let added: HashSet<_> = xs.into_iter().collect();
        let nots: HashSet<_> = nots.into_iter().collect();
        let mut nots = nots.difference(&added);

        nots.all(|x| !tree.contains(x))
    }

    fn invariants_hold_after_every_insert(xs: Vec<i32>) -> bool {
        let mut tree = Tree::default();
        for x in xs {
            tree.insert(x);
            tree.assert_valid();
        }
        true
    }

    fn traversal_is_strictly_ascending(xs: Vec<i32>) -> bool {
        let mut tree = Tree::default();
        tree.extend(xs);

        let mut visited = Vec::new();
        let finished = tree.for_each(|&x| {
            visited.push(x);
            true
        });

        finished == !tree.is_empty()
            && visited.len() == tree.len()
            && visited.windows(2).all(|pair| pair[0] < pair[1])
    }

    fn duplicates_leave_the_tree_unchanged(xs: Vec<u8>) -> bool {
        let mut tree = Tree::default();
        tree.extend(xs.iter().copied());
        let before: Vec<u8> = tree.iter().copied().collect();

        let refused = xs.iter().all(|&x| !tree.insert(x));
        let after: Vec<u8> = tree.iter().copied().collect();

        refused && before == after && tree.len() == before.len()
    }

    fn destructor_sees_every_element_once(xs: Vec<i16>) -> bool {
        let destroyed = RefCell::new(Vec::new());
        let expected: BTreeSet<i16> = xs.iter().copied().collect();
        {
            let mut tree = Tree::new(
                |a: &i16, b: &i16| a.cmp(b),
                |x: i16| destroyed.borrow_mut().push(x),
            );
            tree.extend(xs);
        }

        let mut destroyed = destroyed.into_inner();
        destroyed.sort_unstable();
        destroyed.iter().copied().eq(expected.into_iter())
    }

    fn stopping_visitor_sees_a_prefix(xs: Vec<i8>, stop_after: usize) -> bool {
        let mut tree = Tree::default();
        tree.extend(xs);
        if tree.is_empty() {
            return true;
        }
        let stop_after = stop_after % tree.len();

        let mut visited = Vec::new();
        let finished = tree.for_each(|&x| {
            visited.push(x);
            visited.len() <= stop_after
        });

        !finished && tree.iter().take(stop_after + 1).copied().eq(visited)
    }
}
