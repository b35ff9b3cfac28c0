macro_rules! tests_for_all_promotions {
    ($new_index:ident $(,)?) => {
        // ================================
        //  Empty index
        // ================================

        #[test]
        fn empty_index() {
            let index = $new_index::<u32, &str>();

            assert_eq!(index.len(), 0);
            assert!(index.is_empty());
            assert_eq!(index.levels(), 0);

            assert!(index.find(&0, 0, SearchMode::Exact).is_none());
            assert!(index.find(&0, 3, SearchMode::Fuzzy).is_none());
            assert!(index.find_left(&7).is_none());
            assert!(index.find_right(&7).is_none());
            assert!(index.get_min().is_none());
            assert!(index.get_max().is_none());
            assert!(index.get(&1).is_none());
            assert!(!index.contains(&1));
            assert!(index.sort().is_empty());
            assert!(index.iter().next().is_none());

            let _check_that_debug_works = format!("{index:?}");
        }

        #[test]
        fn delete_from_empty_index() {
            let mut index = $new_index::<u32, &str>();

            assert_eq!(index.delete(&3), None);
            assert_eq!(index.len(), 0);
            assert_eq!(index.levels(), 0);
        }

        // ================================
        //  Basic operations
        // ================================

        #[test]
        fn five_key_scenario() {
            let mut index = $new_index();

            for (key, value) in [(5_u32, "e"), (1, "a"), (3, "c"), (2, "b"), (4, "d")] {
                assert_eq!(index.insert(key, value), None);
            }

            assert_eq!(index.sort(), [&"a", &"b", &"c", &"d", &"e"]);
            assert_eq!(index.get_min().map(|node| *node.value()), Some("a"));
            assert_eq!(index.get_max().map(|node| *node.value()), Some("e"));

            assert_eq!(index.delete(&3), Some("c"));
            assert_eq!(index.len(), 4);
            assert!(index.find(&3, 0, SearchMode::Exact).is_none());
            assert_eq!(index.find_left(&4).map(|node| *node.value()), Some("b"));
        }

        #[test]
        fn reinsert_overwrites() {
            let mut index = $new_index();

            for key in 0_u32..50 {
                index.insert(key, key);
            }
            let levels = index.levels();

            assert_eq!(index.insert(17, 1700), Some(17));
            assert_eq!(index.insert(17, 1701), Some(1700));

            assert_eq!(index.len(), 50);
            assert_eq!(index.levels(), levels);

            // The value is visible through the highest node for the key, whatever its level.
            let found = index.find(&17, 0, SearchMode::Exact).unwrap();
            assert_eq!(*found.value(), 1701);
            assert_eq!(*found.bottom().value(), 1701);
            assert_eq!(index.get(&17), Some(&1701));
        }

        #[test]
        fn get_mut_updates_value() {
            let mut index = $new_index();
            index.extend([(1_u32, String::from("one")), (2, String::from("two"))]);

            if let Some(value) = index.get_mut(&2) {
                value.push_str("!!");
            }

            assert!(index.get_mut(&3).is_none());
            assert_eq!(index.get(&2).map(String::as_str), Some("two!!"));
            assert_eq!(
                index.find(&2, 0, SearchMode::Exact).map(|node| node.value().as_str()),
                Some("two!!"),
            );
        }

        #[test]
        fn count_tracks_inserts_and_deletes() {
            let mut index = $new_index();

            for key in 0_u32..100 {
                index.insert(key, ());
            }
            // Repeats don't count.
            for key in (0_u32..100).step_by(3) {
                index.insert(key, ());
            }
            assert_eq!(index.len(), 100);

            let mut deleted = 0;
            for key in (0_u32..100).step_by(7) {
                assert_eq!(index.delete(&key), Some(()));
                deleted += 1;
            }
            // Already gone.
            assert_eq!(index.delete(&0), None);
            assert_eq!(index.delete(&1000), None);

            assert_eq!(index.len(), 100 - deleted);
            assert_eq!(index.iter().len(), index.len());
            assert_eq!(index.iter().count(), index.len());
        }

        #[test]
        fn delete_everything() {
            let mut index = $new_index();

            let mut prng = Rand32::new(0x_DE1E7E);
            let mut keys: Vec<u32> = (0..300).collect();
            prng_shuffle(&mut prng, &mut keys);

            for &key in &keys {
                index.insert(key, key * 2);
            }
            assert!(index.levels() >= 1);

            prng_shuffle(&mut prng, &mut keys);
            for &key in &keys {
                assert_eq!(index.delete(&key), Some(key * 2));
            }

            assert_eq!(index.len(), 0);
            assert_eq!(index.levels(), 0);
            assert!(index.get_min().is_none());
            assert!(index.get_max().is_none());
            assert!(index.sort().is_empty());

            // The index is fully usable afterwards.
            index.insert(5, 10);
            assert_eq!(index.len(), 1);
            assert_eq!(index.levels(), 1);
            assert_eq!(index.get_min().map(|node| *node.key()), Some(5));
            assert_eq!(index.get_max().map(|node| *node.key()), Some(5));
        }

        #[test]
        fn clear_all_resets() {
            let mut index = $new_index();
            for key in 0_u32..64 {
                index.insert(key, key);
            }

            index.clear_all();

            assert_eq!(index.len(), 0);
            assert_eq!(index.levels(), 0);
            assert!(index.find(&3, 0, SearchMode::Exact).is_none());
            assert!(index.get_min().is_none());
            assert_eq!(index.levels_display().to_string(), "levels: 0\nlen: 0\n");

            index.insert(9, 81);
            assert_eq!(index.sort(), [&81]);
        }

        // ================================
        //  Order and neighbors
        // ================================

        #[test]
        fn sort_follows_key_order() {
            let mut index = $new_index();
            let mut prng = Rand32::new(0x_50_27);

            for _ in 0..500 {
                let key = prng.rand_range(0..10_000);
                index.insert(key, key);
            }

            let sorted = index.sort();
            assert_eq!(sorted.len(), index.len());
            assert!(sorted.windows(2).all(|pair| pair[0] < pair[1]));
            assert!(index.iter().map(|(key, _)| key).eq(sorted.iter().copied()));
            assert!((&index).into_iter().map(|(_, value)| value).eq(sorted.iter().copied()));
        }

        #[test]
        fn neighbors_agree_with_order() {
            let mut index = $new_index();
            // Only even keys are present.
            for key in (0_u32..200).step_by(2) {
                index.insert(key, key);
            }

            for key in 0_u32..202 {
                let expected_left = (0_u32..200).step_by(2).filter(|&even| even < key).last();
                let expected_right = (0_u32..200).step_by(2).find(|&even| even > key);

                assert_eq!(index.find_left(&key).map(|node| *node.key()), expected_left);
                assert_eq!(index.find_right(&key).map(|node| *node.key()), expected_right);
            }
        }

        #[test]
        fn min_and_max() {
            let mut index = $new_index();
            for key in [40_i32, -3, 17, 99, 0, -50, 12] {
                index.insert(key, key.to_string());
            }

            let min = index.get_min().unwrap();
            let max = index.get_max().unwrap();
            assert_eq!((*min.key(), min.value().as_str()), (-50, "-50"));
            assert_eq!((*max.key(), max.value().as_str()), (99, "99"));

            assert!(min.prev().is_none());
            assert!(max.next().is_none());
            assert_eq!(min.level(), 0);
            assert_eq!(max.level(), 0);

            index.delete(&99);
            index.delete(&-50);
            assert_eq!(index.get_min().map(|node| *node.key()), Some(-3));
            assert_eq!(index.get_max().map(|node| *node.key()), Some(40));
        }

        // ================================
        //  Node navigation
        // ================================

        #[test]
        fn walk_down_and_across() {
            let mut index = $new_index();
            for key in 0_u32..256 {
                index.insert(key, key + 1000);
            }

            for key in [0_u32, 1, 100, 200, 255] {
                let found = index.find(&key, 0, SearchMode::Exact).unwrap();
                assert!(found.level() < index.levels());

                // Every node on the way down stands for the same entry.
                let mut node = found;
                let mut level = found.level();
                while let Some(below) = node.down() {
                    level -= 1;
                    assert_eq!(below.level(), level);
                    assert_eq!(*below.key(), key);
                    assert_eq!(*below.value(), key + 1000);
                    node = below;
                }
                assert_eq!(level, 0);
                assert_eq!(node.level(), found.bottom().level());

                let bottom = found.bottom();
                assert_eq!(bottom.prev().map(|prev| *prev.key()), key.checked_sub(1));
                assert_eq!(
                    bottom.next().map(|next| *next.key()),
                    Some(key + 1).filter(|&next| next < 256),
                );
            }
        }

        #[test]
        fn upper_levels_are_ordered_subsets() {
            let mut index = $new_index();
            let mut prng = Rand32::new(0x_0B5E55ED);
            for _ in 0..400 {
                let key = prng.rand_range(0..1_000);
                index.insert(key, ());
            }

            let mut level_keys: BTreeMap<usize, Vec<u32>> = BTreeMap::new();
            for (&key, ()) in &index {
                let mut node = index.find(&key, 0, SearchMode::Exact);
                while let Some(current) = node {
                    level_keys.entry(current.level()).or_default().push(key);
                    node = current.down();
                }
            }

            assert_eq!(level_keys.len(), index.levels());
            let all_keys: Vec<u32> = index.iter().map(|(&key, ())| key).collect();
            assert_eq!(level_keys.get(&0), Some(&all_keys));

            for (&level, keys) in &level_keys {
                assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));

                // Walking across the level visits exactly the keys reaching it.
                let first = index.find(&keys[0], 0, SearchMode::Exact).unwrap();
                let mut across = first;
                while across.level() > level {
                    across = across.down().unwrap();
                }
                let mut walked = vec![*across.key()];
                while let Some(next) = across.next() {
                    walked.push(*next.key());
                    across = next;
                }
                assert_eq!(&walked, keys);

                if level > 0 {
                    let below = &level_keys[&(level - 1)];
                    assert!(keys.iter().all(|key| below.contains(key)));
                }
            }
        }

        // ================================
        //  Bounded and fuzzy search
        // ================================

        #[test]
        fn bounded_search_gives_up() {
            #[derive(Debug, Clone)]
            struct Counted {
                key:         u32,
                comparisons: Rc<Cell<usize>>,
            }

            impl IndexKey for Counted {
                fn equal(&self, other: &Self) -> bool {
                    self.comparisons.set(self.comparisons.get() + 1);
                    self.key == other.key
                }

                fn less(&self, other: &Self) -> bool {
                    self.key < other.key
                }
            }

            let comparisons = Rc::new(Cell::new(0));
            let counted = |key: u32| Counted { key, comparisons: Rc::clone(&comparisons) };

            let mut index = $new_index();
            for key in 0_u32..128 {
                index.insert(counted(key), key);
            }

            let mut checked_expensive_search = false;
            for key in 0_u32..130 {
                let target = counted(key);

                comparisons.set(0);
                let unbounded = index.find(&target, 0, SearchMode::Exact).map(|n| *n.value());
                let cost = comparisons.get();
                assert_eq!(unbounded, Some(key).filter(|&key| key < 128));

                // Exactly enough budget.
                comparisons.set(0);
                let bounded = index.find(&target, cost, SearchMode::Exact).map(|n| *n.value());
                assert_eq!(bounded, unbounded);
                assert!(comparisons.get() <= cost);

                if cost > 1 && unbounded.is_some() {
                    checked_expensive_search = true;

                    comparisons.set(0);
                    assert!(index.find(&target, cost - 1, SearchMode::Exact).is_none());
                    assert!(comparisons.get() <= cost - 1);
                    // A failed bounded search does not disturb a later unbounded one.
                    assert!(index.find(&target, 0, SearchMode::Exact).is_some());
                }
            }
            assert!(checked_expensive_search);
        }

        #[test]
        fn fuzzy_search_accepts_near_match() {
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            struct Approx(u32);

            impl IndexKey for Approx {
                fn equal(&self, other: &Self) -> bool {
                    self.0 == other.0
                }

                fn less(&self, other: &Self) -> bool {
                    self.0 < other.0
                }

                fn near_match(&self, other: &Self) -> bool {
                    self.0.abs_diff(other.0) <= 2
                }
            }

            let mut index = $new_index();
            for key in (0_u32..100).step_by(10) {
                index.insert(Approx(key), key);
            }

            // Exact lookups never use the near-match predicate.
            assert!(index.find(&Approx(41), 0, SearchMode::Exact).is_none());
            assert!(index.find(&Approx(45), 0, SearchMode::Fuzzy).is_none());

            let near = index.find(&Approx(41), 0, SearchMode::Fuzzy).unwrap();
            assert_eq!(*near.value(), 40);
            let near = index.find(&Approx(88), 0, SearchMode::Fuzzy).unwrap();
            assert_eq!(*near.value(), 90);

            // An exact match is still found in fuzzy mode.
            let exact = index.find(&Approx(70), 0, SearchMode::Fuzzy).unwrap();
            assert_eq!(*exact.key(), Approx(70));

            // Inserting and deleting use exact matching only.
            assert_eq!(index.insert(Approx(41), 41), None);
            assert_eq!(index.delete(&Approx(42)), None);
            assert_eq!(index.len(), 11);
        }

        // ================================
        //  Misbehaving keys
        // ================================

        #[test]
        fn chaotic_key_contract() {
            #[derive(Debug, Clone)]
            struct Chaotic(Rc<RefCell<Rand32>>);

            impl IndexKey for Chaotic {
                fn equal(&self, _other: &Self) -> bool {
                    self.0.borrow_mut().rand_range(0..4) == 0
                }

                fn less(&self, _other: &Self) -> bool {
                    self.0.borrow_mut().rand_range(0..2) == 0
                }

                fn near_match(&self, _other: &Self) -> bool {
                    self.0.borrow_mut().rand_range(0..3) == 0
                }
            }

            let prng = Rc::new(RefCell::new(Rand32::new(666)));
            let chaotic = || Chaotic(Rc::clone(&prng));

            let mut index = $new_index();
            for value in 0_u32..200 {
                index.insert(chaotic(), value);
                let _ = index.find(&chaotic(), 5, SearchMode::Fuzzy);
                let _ = index.find_left(&chaotic());
                let _ = index.find_right(&chaotic());
                if value % 3 == 0 {
                    let _ = index.delete(&chaotic());
                }
            }

            // The order is meaningless, but the bookkeeping is not.
            assert_eq!(index.iter().count(), index.len());
            assert_eq!(index.sort().len(), index.len());
            assert!(index.levels() <= MAX_LEVELS);

            while let Some(min) = index.get_min() {
                let key = min.key().clone();
                // `delete` might remove some other entry, or nothing.
                let before = index.len();
                if index.delete(&key).is_none() {
                    assert_eq!(index.len(), before);
                    index.clear_all();
                }
            }
            assert_eq!(index.levels(), 0);
        }

        // ================================
        //  Randomized model
        // ================================

        #[test]
        fn matches_btree_map_model() {
            let mut prng = Rand32::new(0x_3D_0DE1);
            let mut index = $new_index();
            let mut model: BTreeMap<u32, u32> = BTreeMap::new();

            for step in 0_u32..4_000 {
                let key = prng.rand_range(0..500);

                match prng.rand_range(0..6) {
                    0 | 1 | 2 => {
                        assert_eq!(index.insert(key, step), model.insert(key, step));
                    }
                    3 => {
                        assert_eq!(index.delete(&key), model.remove(&key));
                    }
                    4 => {
                        let left = model.range(..key).next_back().map(|(&k, _)| k);
                        let right = model
                            .range((Bound::Excluded(key), Bound::Unbounded))
                            .next()
                            .map(|(&k, _)| k);

                        assert_eq!(index.find_left(&key).map(|node| *node.key()), left);
                        assert_eq!(index.find_right(&key).map(|node| *node.key()), right);
                    }
                    _ => {
                        assert_eq!(
                            index.find(&key, 0, SearchMode::Exact).map(|node| *node.value()),
                            model.get(&key).copied(),
                        );
                        assert_eq!(index.contains(&key), model.contains_key(&key));
                    }
                }

                assert_eq!(index.len(), model.len());
            }

            assert!(index.iter().map(|(&k, &v)| (k, v)).eq(model.iter().map(|(&k, &v)| (k, v))));
            assert_eq!(index.get_min().map(|node| *node.key()), model.keys().next().copied());
            assert_eq!(index.get_max().map(|node| *node.key()), model.keys().next_back().copied());
        }

        // ================================
        //  Level dump
        // ================================

        #[test]
        fn levels_display_lists_every_level() {
            let mut index = $new_index();
            for key in [3_u32, 1, 2] {
                index.insert(key, char::from(b'a' + key as u8));
            }

            let rendered = index.levels_display().to_string();
            let lines: Vec<&str> = rendered.lines().collect();

            assert_eq!(lines[0], format!("levels: {}", index.levels()));
            assert_eq!(lines[1], "len: 3");
            assert_eq!(lines.len(), 2 + index.levels());
            assert_eq!(
                lines.last().copied(),
                Some("level 0: [1: 'b'] --> [2: 'c'] --> [3: 'd']"),
            );
        }

        fn prng_shuffle<T>(prng: &mut Rand32, items: &mut [T]) {
            for i in (1..items.len()).rev() {
                let upper = u32::try_from(i + 1).unwrap();
                let j = prng.rand_range(0..upper) as usize;
                items.swap(i, j);
            }
        }
    };
}

pub(crate) use tests_for_all_promotions as tests_for_all_promotions;
