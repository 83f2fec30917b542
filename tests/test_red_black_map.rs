extern crate arena_collections;
extern crate rand;

use self::rand::{thread_rng, Rng};
use arena_collections::red_black_tree::RedBlackMap;
use std::vec::Vec;

#[test]
fn int_test_red_black_map() {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut map = RedBlackMap::new();
    let mut expected = Vec::new();
    for _ in 0..100_000 {
        let key = rng.gen::<u32>();
        let val = rng.gen::<u32>();

        map.insert(key, val);
        expected.push((key, val));
    }

    expected.reverse();
    expected.sort_by(|l, r| l.0.cmp(&r.0));
    expected.dedup_by_key(|pair| pair.0);

    assert_eq!(map.len(), expected.len());

    assert_eq!(map.min(), Some(&expected[0].0));
    assert_eq!(map.max(), Some(&expected[expected.len() - 1].0));

    for entry in &expected {
        assert!(map.contains_key(&entry.0));
        assert_eq!(map.get(&entry.0), Some(&entry.1));
    }

    for window in expected.windows(2) {
        assert_eq!(map.succ(&window[0].0), Some(&window[1].0));
        assert_eq!(map.pred(&window[1].0), Some(&window[0].0));
    }

    assert_eq!(
        map.iter().collect::<Vec<(&u32, &u32)>>(),
        expected.iter().map(|pair| (&pair.0, &pair.1)).collect::<Vec<(&u32, &u32)>>(),
    );

    for entry in &mut expected {
        let val_1 = rng.gen::<u32>();
        let val_2 = rng.gen::<u32>();

        let old_entry = map.insert(entry.0, val_1);
        assert_eq!(old_entry, Some((entry.0, entry.1)));
        {
            let old_val = map.get_mut(&entry.0);
            *old_val.unwrap() = val_2;
        }
        entry.1 = val_2;
        assert_eq!(map.get(&entry.0), Some(&val_2));
    }

    thread_rng().shuffle(&mut expected);

    let mut expected_len = expected.len();
    for entry in expected {
        let old_entry = map.remove(&entry.0);
        expected_len -= 1;
        assert_eq!(old_entry, Some((entry.0, entry.1)));
        assert_eq!(map.len(), expected_len);
    }

    assert!(map.is_empty());
    assert_eq!(map.min(), None);
    assert_eq!(map.max(), None);
}
