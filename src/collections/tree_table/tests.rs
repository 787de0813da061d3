#![cfg(test)]

use std::cmp::Ordering;
use std::collections::BTreeMap;

use proptest::prelude::*;

use super::*;
use crate::collections::error::{
    EmptyKeyError, GetIntError, LookupError, NextError, NonEmptyTableError, NotFoundError,
    PutError,
};
use crate::collections::traits::{CaseInsensitive, DynComparator, FnComparator, KeyComparator, Lexical};

fn table_of(keys: &str) -> TreeTable {
    let mut table = TreeTable::new();
    for key in keys.chars() {
        table.put(key.to_string(), "").unwrap();
        table.verify_invariants();
    }
    table
}

fn traverse<C: KeyComparator>(table: &TreeTable<C>, cursor: &mut TreeCursor) -> Vec<String> {
    let mut keys = Vec::new();
    while let Ok(entry) = table.get_next(cursor) {
        keys.push(String::from_utf8_lossy(entry.key()).into_owned());
    }
    keys
}

fn nearest(table: &TreeTable, key: &str) -> String {
    let mut cursor = table.find_nearest(key).unwrap();
    String::from_utf8_lossy(table.get_next(&mut cursor).unwrap().key()).into_owned()
}

#[test]
fn test_basic() {
    let mut table = TreeTable::new();
    table.put("KEY", b"DATA").unwrap();

    let value = table.get_copy("KEY").unwrap();
    assert_eq!(&*value, b"DATA");
    assert_eq!(value.len(), 4);

    table.remove("KEY").unwrap();
    assert_eq!(table.get("KEY"), Err(LookupError::NotFound(NotFoundError)));
    assert_eq!(table.len(), 0);
    assert!(table.is_empty());
    table.verify_invariants();
}

#[test]
fn test_replace() {
    let mut table = table_of("SEARCHXMPL");
    let before = table.dump();

    table.put("M", "new").unwrap();
    assert_eq!(table.get("M").unwrap(), b"new");
    assert_eq!(table.len(), 10, "Replacing a value shouldn't add an entry.");
    assert_eq!(table.dump(), before, "Replacing a value shouldn't restructure the tree.");
}

#[test]
fn test_remove_missing() {
    let mut table = table_of("ABCDEFG");
    let before = table.dump();

    assert_eq!(table.remove("Z"), Err(LookupError::NotFound(NotFoundError)));
    assert_eq!(table.remove(""), Err(LookupError::EmptyKey(EmptyKeyError)));
    assert_eq!(table.dump(), before, "A failed removal shouldn't restructure the tree.");
    assert_eq!(table.len(), 7);
}

#[test]
fn test_empty_key() {
    let mut table = TreeTable::new();
    assert_eq!(table.put("", "value"), Err(PutError::EmptyKey(EmptyKeyError)));
    assert_eq!(table.get(""), Err(LookupError::EmptyKey(EmptyKeyError)));
    assert!(!table.contains(""));
    assert!(table.is_empty());

    table.put("k", "").unwrap();
    assert_eq!(table.get("k").unwrap(), b"", "Empty values should be allowed.");
}

#[test]
fn test_empty_table() {
    let table = TreeTable::new();
    let mut cursor = TreeCursor::new();
    assert_eq!(table.get_next(&mut cursor), Err(NotFoundError));
    assert!(!cursor.is_finished(), "A cursor over an empty table should stay fresh.");
    assert_eq!(table.find_nearest("a"), Err(NotFoundError));
    assert_eq!(table.find_min(), Err(NotFoundError));
    assert_eq!(table.find_max(), Err(NotFoundError));
    assert_eq!(table.find_min_copy(), Err(NextError::NotFound(NotFoundError)));
    assert_eq!(table.find_max_copy(), Err(NextError::NotFound(NotFoundError)));
    assert_eq!(table.dump(), "");
}

#[test]
fn test_min_max() {
    let table = table_of("SEARCHXMPL");
    assert_eq!(table.find_min().unwrap(), b"A");
    assert_eq!(table.find_max().unwrap(), b"X");

    let (min, max) = (table.find_min_copy().unwrap(), table.find_max_copy().unwrap());
    drop(table);
    assert_eq!(&*min, b"A", "Copied keys should outlive the table.");
    assert_eq!(&*max, b"X");
}

#[test]
fn test_typed_values() {
    let mut table = TreeTable::new();
    table.put_str("name", "tree").unwrap();
    table.put_fmt("answer", format_args!("{}", 6 * 7)).unwrap();
    table.put_int("negative", i64::MIN).unwrap();
    table.put("word", "seven").unwrap();

    assert_eq!(table.get("name").unwrap(), b"tree");
    assert_eq!(table.get_int("answer"), 42);
    assert_eq!(table.get_int("negative"), i64::MIN);
    assert_eq!(table.get_int("word"), 0, "Malformed integers should read as 0.");
    assert!(matches!(table.try_get_int("word"), Err(GetIntError::Parse(_))));
    assert_eq!(table.try_get_int("missing"), Err(GetIntError::NotFound(NotFoundError)));
}

#[test]
fn test_nearest() {
    let table = table_of("ABCDEINRSX");
    assert_eq!(nearest(&table, "0"), "A", "Keys below the minimum should find the minimum.");
    assert_eq!(nearest(&table, "C"), "C", "Present keys should be found exactly.");
    assert_eq!(nearest(&table, "F"), "E", "Absent keys should find their predecessor.");
    assert_eq!(nearest(&table, "M"), "I");
    assert_eq!(nearest(&table, "Z"), "X");
    assert_eq!(nearest(&table, ""), "A");
}

#[test]
fn test_traverse_from_nearest() {
    let table = table_of("ACEGI");
    let mut cursor = table.find_nearest("F").unwrap();
    assert_eq!(traverse(&table, &mut cursor), ["E", "G", "I"]);
    assert!(cursor.is_finished());
    assert_eq!(table.get_next(&mut cursor), Err(NotFoundError), "A finished cursor should stay finished.");
}

#[test]
fn test_traverse() {
    let table = table_of("SEARCHXMPL");
    let mut cursor = TreeCursor::default();
    assert_eq!(traverse(&table, &mut cursor), ["A", "C", "E", "H", "L", "M", "P", "R", "S", "X"]);

    cursor.reset();
    assert_eq!(traverse(&table, &mut cursor).len(), 10, "A reset cursor should start over.");
}

#[test]
fn test_interleaved_traversals() {
    let table = table_of("ABCDEF");
    let mut cursor = TreeCursor::new();
    assert_eq!(table.get_next(&mut cursor).unwrap().key(), b"A");
    assert_eq!(table.get_next(&mut cursor).unwrap().key(), b"B");

    assert_eq!(
        table.iter().map(|e| e.key()[0]).collect::<Vec<_>>(),
        b"ABCDEF",
        "Iterators shouldn't disturb cursors."
    );
    assert_eq!(traverse(&table, &mut cursor), ["C", "D", "E", "F"]);
}

#[test]
fn test_token_wrap() {
    let table = table_of("MIDTRAXBQ");
    for round in 0..600 {
        let mut cursor = TreeCursor::new();
        assert_eq!(
            traverse(&table, &mut cursor),
            ["A", "B", "D", "I", "M", "Q", "R", "T", "X"],
            "Traversal {round} should visit every key once."
        );
        let mut cursor = table.find_nearest("N").unwrap();
        assert_eq!(traverse(&table, &mut cursor), ["M", "Q", "R", "T", "X"]);
    }
}

#[test]
fn test_remove_and_rewind() {
    let mut table = TreeTable::new();
    for i in 0..50 {
        table.put(format!("k{i:02}"), i.to_string()).unwrap();
    }

    let mut cursor = TreeCursor::new();
    let mut seen: Vec<Vec<u8>> = Vec::new();
    while let Ok(entry) = table.get_next(&mut cursor) {
        let key = entry.key().to_vec();
        let index = table.get_int(&key);
        if seen.last().is_some_and(|last| *last >= key) {
            continue;
        }
        seen.push(key.clone());

        if index % 3 == 0 {
            table.remove(&key).unwrap();
            table.verify_invariants();
            cursor = table.find_nearest(&key).unwrap();
        }
    }

    assert_eq!(seen.len(), 50, "Rewinding after each removal should still visit every key.");
    assert_eq!(table.len(), 33);
    assert!(table.iter().all(|e| table.get_int(e.key()) % 3 != 0));
}

#[test]
fn test_edit_during_traversal() {
    let mut table = TreeTable::new();
    for key in ["04", "00", "08", "03", "00", "05", "01", "08", "13", "00", "11"] {
        table.put(key, "").unwrap();
    }

    // Puts and removes between steps, without rewinding. These rotate nodes the walk has already
    // climbed through, leaving their back links pointing below them.
    let mut edits = [
        (true, "00"),
        (true, "01"),
        (true, "07"),
        (false, "12"),
        (true, "02"),
        (false, "15"),
        (true, "10"),
        (false, "05"),
        (false, "05"),
        (true, "09"),
    ]
    .into_iter();

    let mut cursor = TreeCursor::new();
    let mut visited = Vec::new();
    while let Ok(entry) = table.get_next(&mut cursor) {
        visited.push(String::from_utf8_lossy(entry.key()).into_owned());
        assert!(visited.len() <= 16, "A traversal should end once its nodes are all visited.");
        match edits.next() {
            Some((true, key)) => table.put(key, "").unwrap(),
            Some((false, key)) => {
                let _ = table.remove(key);
            },
            None => {},
        }
        table.verify_invariants();
    }

    assert!(cursor.is_finished());
    assert_eq!(visited.first().map(String::as_str), Some("00"));
    let mut cursor = TreeCursor::new();
    assert_eq!(
        traverse(&table, &mut cursor),
        ["00", "01", "02", "03", "04", "07", "08", "09", "10", "11", "13"]
    );
}

#[test]
fn test_set_comparator() {
    let mut table: TreeTable<DynComparator> = TreeTable::with_comparator(Box::new(Lexical));
    table.put("b", "").unwrap();
    assert_eq!(table.set_comparator(Box::new(CaseInsensitive)), Err(NonEmptyTableError));

    table.clear();
    table.set_comparator(Box::new(FnComparator(|a: &[u8], b: &[u8]| b.cmp(a)))).unwrap();
    for key in ["a", "c", "b"] {
        table.put(key, "").unwrap();
        table.verify_invariants();
    }
    assert_eq!(
        traverse(&table, &mut TreeCursor::new()),
        ["c", "b", "a"],
        "Traversal should follow the new comparator."
    );
}

#[test]
fn test_case_insensitive() {
    let mut table = TreeTable::with_comparator(CaseInsensitive);
    table.put("Host", "a").unwrap();
    table.put("HOST", "b").unwrap();
    table.put("accept", "c").unwrap();

    assert_eq!(table.len(), 2, "Keys differing only by case should be the same key.");
    assert_eq!(table.get("host").unwrap(), b"b");
    assert_eq!(table.iter().next().unwrap().key(), b"accept");
    assert_eq!(table.comparator().compare(b"a", b"B"), Ordering::Less);
}

#[test]
fn test_iter() {
    let table = table_of("DBFACEG");
    let mut iter = table.iter();
    assert_eq!(iter.len(), 7);
    assert_eq!(iter.next().unwrap().key(), b"A");
    assert_eq!(iter.len(), 6);
    assert_eq!(iter.map(|e| e.key()[0]).collect::<Vec<_>>(), b"BCDEFG");
    assert_eq!(TreeTable::new().iter().next(), None);
}

#[test]
fn test_dump_ascending() {
    let table = table_of("ABCDEFG");
    assert_eq!(
        table.dump(),
        concat!(
            "        [G]\n",
            "    F\n",
            "        [E]\n",
            "D\n",
            "        C\n",
            "    [B]\n",
            "        A\n",
        )
    );
}

#[test]
fn test_dump_mixed() {
    let table = table_of("SEARCHXMPL");
    assert_eq!(
        table.dump(),
        concat!(
            "        X\n",
            "            [S]\n",
            "    [R]\n",
            "        P\n",
            "M\n",
            "        L\n",
            "            [H]\n",
            "    [E]\n",
            "        C\n",
            "            [A]\n",
        )
    );
}

#[test]
fn test_fmt() {
    let mut table = TreeTable::new();
    table.put("b", "2").unwrap();
    table.put("a", "1").unwrap();
    assert_eq!(format!("{table:?}"), "TreeTable { entries: {\"a\": \"1\", \"b\": \"2\"}, len: 2 }");
}

#[cfg(feature = "sync")]
#[test]
fn test_sync_threads() {
    use std::sync::Arc;
    use std::thread;

    let table = Arc::new(SyncTreeTable::default());
    let handles: Vec<_> = (0..4)
        .map(|thread| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                for i in 0..100 {
                    table.put_int(format!("{i:03}-{thread}"), i).unwrap();
                }
                for i in (0..100).step_by(2) {
                    table.remove(format!("{i:03}-{thread}")).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(table.len(), 200);
    assert_eq!(&*table.find_min().unwrap(), b"001-0");
    assert_eq!(&*table.find_max().unwrap(), b"099-3");
    assert_eq!(table.get_int("051-2"), 51);

    let mut cursor = table.find_nearest("050").unwrap();
    let first = table.get_next(&mut cursor).unwrap();
    assert_eq!(&*first.key, b"049-3", "Nearest should find the predecessor of an absent key.");
    assert_eq!(&*table.get_next(&mut cursor).unwrap().key, b"051-0");

    let table = Arc::into_inner(table).unwrap().into_inner();
    table.verify_invariants();
}

#[derive(Debug, Clone)]
enum Op {
    Put(u8, u8),
    Remove(u8),
}

fn ops() -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(
        prop_oneof![
            3 => (0..64_u8, any::<u8>()).prop_map(|(k, v)| Op::Put(k, v)),
            2 => (0..64_u8).prop_map(Op::Remove),
        ],
        0..200,
    )
}

fn key(k: u8) -> [u8; 2] {
    [b'a' + k / 8, b'a' + k % 8]
}

proptest! {
    #[test]
    fn prop_matches_model(ops in ops()) {
        let mut table = TreeTable::new();
        let mut model = BTreeMap::new();

        for op in ops {
            match op {
                Op::Put(k, v) => {
                    table.put(key(k), [v]).unwrap();
                    model.insert(key(k), v);
                },
                Op::Remove(k) => {
                    prop_assert_eq!(table.remove(key(k)).is_ok(), model.remove(&key(k)).is_some());
                },
            }
            table.verify_invariants();
            prop_assert_eq!(table.len(), model.len());
        }

        for (k, v) in &model {
            prop_assert_eq!(table.get(k).unwrap(), vec![*v]);
        }

        let expected: Vec<_> = model.keys().map(|k| k.to_vec()).collect();
        let mut cursor = TreeCursor::new();
        let mut traversed = Vec::new();
        while let Ok(entry) = table.get_next(&mut cursor) {
            traversed.push(entry.key().to_vec());
        }
        prop_assert_eq!(&traversed, &expected);
        prop_assert_eq!(table.iter().map(|e| e.key().to_vec()).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn prop_traversal_survives_edits(
        keys in proptest::collection::btree_set(0..64_u8, 0..40),
        ops in ops(),
    ) {
        let mut table = TreeTable::new();
        for k in &keys {
            table.put(key(*k), "").unwrap();
        }

        // Every step visits a node that existed before the walk or was put during it.
        let limit = keys.len() + ops.len();
        let mut ops = ops.into_iter();
        let mut cursor = TreeCursor::new();
        let mut steps = 0;
        while let Ok(entry) = table.get_next(&mut cursor) {
            let visited = entry.key().to_vec();
            prop_assert!(table.contains(&visited));
            steps += 1;
            prop_assert!(steps <= limit);
            match ops.next() {
                Some(Op::Put(k, v)) => table.put(key(k), [v]).unwrap(),
                Some(Op::Remove(k)) => {
                    let _ = table.remove(key(k));
                },
                None => {},
            }
        }
        table.verify_invariants();
    }

    #[test]
    fn prop_nearest(keys in proptest::collection::btree_set(0..64_u8, 1..40), sought in 0..80_u8) {
        let mut table = TreeTable::new();
        for k in &keys {
            table.put(key(*k), "").unwrap();
        }

        let expected = if keys.contains(&sought) {
            sought
        } else {
            keys.range(..sought).next_back().copied().unwrap_or(*keys.first().unwrap())
        };
        let mut cursor = table.find_nearest(key(sought)).unwrap();
        let mut traversed = Vec::new();
        while let Ok(entry) = table.get_next(&mut cursor) {
            traversed.push(entry.key().to_vec());
        }
        let remaining: Vec<_> = keys.range(expected..).map(|k| key(*k).to_vec()).collect();
        prop_assert_eq!(traversed, remaining);
    }
}
