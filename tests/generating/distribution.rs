#[cfg(test)]
mod distribution {
    use insertnums::distributing::{distribute, distribute_each, slot_order};
    use std::time::Duration;

    use insertnums::generating::Notice;
    use insertnums::session::{InsertError, Session};

    fn strings(values: &[&str]) -> Vec<String> {
        values
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn insert(format: &str, texts: &[&str]) -> Vec<String> {
        let mut slots = strings(texts);
        Session::default()
            .insert(format, &mut slots)
            .unwrap();
        slots
    }

    #[test]
    fn reversed_fills_from_the_back() {
        let slots = insert("5:-1!", &["", "", "", ""]);
        assert_eq!(slots[0], "2");
        assert_eq!(slots[3], "5");
    }

    #[test]
    fn reverse_only_reorders() {
        for format in ["1:3~02", "b:2", "10@_>15"] {
            let forward = insert(format, &["", "", ""]);
            let mut backward = insert(&format!("{}!", format), &["", "", ""]);
            backward.reverse();
            assert_eq!(forward, backward, "for {:?}", format);
        }
    }

    #[test]
    fn surplus_spills_into_last_slot() {
        let values = strings(&["a", "b", "c", "d", "e"]);
        assert_eq!(
            distribute(&values, 3, false),
            vec![
                (0, "a".to_string()),
                (1, "b".to_string()),
                (2, "c\nd\ne".to_string())
            ]
        );

        let slots = insert("a@_=='f'", &["", "", ""]);
        assert_eq!(slots, strings(&["a", "b", "c\nd\ne"]));
    }

    #[test]
    fn missing_values_empty_the_slot() {
        let slots = insert("1@_>2", &["x", "y", "z"]);
        assert_eq!(slots, strings(&["1", "2", ""]));
    }

    #[test]
    fn expression_mode_is_one_to_one() {
        let values = strings(&["A", "B"]);
        assert_eq!(
            distribute_each(&values, 3, true),
            vec![(2, "A".to_string()), (1, "B".to_string())]
        );

        let slots = insert("|_.upper()@i>1", &["a", "b", "c"]);
        assert_eq!(slots, strings(&["A", "B", "c"]));
    }

    #[test]
    fn order_covers_every_slot() {
        assert_eq!(slot_order(4, false).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(slot_order(4, true).collect::<Vec<_>>(), vec![3, 2, 1, 0]);
        assert_eq!(slot_order(0, true).count(), 0);
    }

    #[test]
    fn budget_leaves_unvisited_slots_alone() {
        let mut slots = vec!["a".to_string(); 10_000];
        let report = Session::default()
            .with_budget(Duration::ZERO)
            .insert("|_.upper()", &mut slots)
            .unwrap();

        assert!(report.replaced < slots.len());
        assert!(matches!(
            report.notices[..],
            [Notice::BudgetExceeded { .. }]
        ));
        assert!(slots[..report.replaced]
            .iter()
            .all(|slot| slot == "A"));
        assert!(slots[report.replaced..]
            .iter()
            .all(|slot| slot == "a"));
    }

    #[test]
    fn failures_leave_slots_untouched() {
        let mut slots = strings(&["one", "two"]);
        let result = Session::default().insert("1~s", &mut slots);
        assert!(matches!(result, Err(InsertError::Generation(_))));
        assert_eq!(slots, strings(&["one", "two"]));
    }
}
