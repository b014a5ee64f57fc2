#[cfg(test)]
mod properties {
    use std::time::Duration;

    use insertnums::expression::{EvalError, Fault, SyntaxError};
    use insertnums::generating::{decode, encode, Generation, GenerationError, Generator, Notice};
    use insertnums::parsing;
    use insertnums::session::Session;

    fn generate(format: &str, slots: &[&str], session: &Session) -> Result<Generation, GenerationError> {
        let spec = parsing::parse(format).unwrap();
        Generator::new(session).generate(&spec, slots.len(), |i| slots[i].to_string())
    }

    fn values(format: &str, count: usize) -> Vec<String> {
        let slots = vec![""; count];
        generate(format, &slots, &Session::default())
            .unwrap()
            .values
    }

    #[test]
    fn zero_padded_counting() {
        assert_eq!(values("1:1~03", 3), vec!["001", "002", "003"]);
    }

    #[test]
    fn closed_form_without_expression() {
        let produced = values("-4:3", 6);
        for (i, value) in produced
            .iter()
            .enumerate()
        {
            assert_eq!(value, &(-4 + 3 * i as i64).to_string());
        }
    }

    #[test]
    fn float_step_promotes_everything() {
        assert_eq!(values("1:0.5", 3), vec!["1.0", "1.5", "2.0"]);
        assert_eq!(values("1~.2f", 2), vec!["1.00", "2.00"]);
    }

    #[test]
    fn one_value_per_slot_unless_stopped() {
        for count in [0, 1, 7] {
            assert_eq!(values("10:10", count).len(), count);
            assert_eq!(values("a", count).len(), count);
        }
    }

    #[test]
    fn letters_follow_base_26() {
        for (n, letters) in [(1, "a"), (26, "z"), (27, "aa"), (52, "az"), (703, "aaa")] {
            assert_eq!(encode(n, 0), letters);
            assert_eq!(decode(letters), Some(n));
        }
        for n in 1..2000 {
            assert_eq!(decode(&encode(n, 0)), Some(n));
        }
    }

    #[test]
    fn letter_sequences() {
        assert_eq!(values("y", 4), vec!["y", "z", "aa", "ab"]);
        assert_eq!(values("Y", 3), vec!["Y", "Z", "AA"]);
        assert_eq!(values("a:2", 3), vec!["a", "c", "e"]);
    }

    #[test]
    fn wrapping_keeps_length() {
        assert_eq!(values("y~w", 4), vec!["y", "z", "a", "b"]);
        for value in values("zy~w", 40) {
            assert!(value.len() <= 2, "{:?} is longer than the start", value);
        }
    }

    #[test]
    fn wrap_period() {
        for n in 1..=676 {
            assert_eq!(encode(n, 2), encode(n + 676, 2));
        }
        assert_eq!(encode(677, 2), "a");
    }

    #[test]
    fn stop_true_at_once_gives_nothing() {
        let slots = ["", "", ""];
        let generation = generate("1@True", &slots, &Session::default()).unwrap();
        assert!(generation
            .values
            .is_empty());
    }

    #[test]
    fn stop_bounds_instead_of_slots() {
        assert_eq!(values("1@_>5", 2), vec!["1", "2", "3", "4", "5"]);
        assert_eq!(values("a@_=='d'", 1), vec!["a", "b", "c"]);
    }

    #[test]
    fn expression_over_accumulator() {
        assert_eq!(values("1::p+_", 4), vec!["1", "3", "6", "10"]);
    }

    #[test]
    fn cast_integer() {
        let generation = generate("i|_*2", &["7"], &Session::default()).unwrap();
        assert_eq!(generation.values, vec!["14"]);
    }

    #[test]
    fn cast_failure_depends_on_quiet() {
        let slots = ["7", "x"];

        let result = generate("i|_*2", &slots, &Session::default());
        assert!(matches!(result, Err(GenerationError::Cast(_))));

        let generation = generate("i|_*2", &slots, &Session::default().with_quiet(true)).unwrap();
        assert_eq!(generation.values, vec!["14", "x"]);
        assert!(matches!(generation.notices[..], [Notice::CastFallback(_)]));
    }

    #[test]
    fn never_stopping_hits_budget() {
        let session = Session::default().with_budget(Duration::from_millis(20));
        let generation = generate("1@False", &["", ""], &session).unwrap();

        assert!(!generation
            .values
            .is_empty());
        match generation.notices[..] {
            [Notice::BudgetExceeded { produced, budget }] => {
                assert_eq!(produced, generation.values.len());
                assert_eq!(budget, Duration::from_millis(20));
            }
            _ => panic!("expected a budget notice, got {:?}", generation.notices),
        }
    }

    fn assert_budget_notice(generation: &Generation) {
        match generation.notices[..] {
            [Notice::BudgetExceeded { produced, budget }] => {
                assert_eq!(produced, generation.values.len());
                assert_eq!(budget, Duration::ZERO);
            }
            _ => panic!("expected a budget notice, got {:?}", generation.notices),
        }
    }

    #[test]
    fn letters_hit_budget() {
        let session = Session::default().with_budget(Duration::ZERO);
        let generation = generate("a@False", &["", ""], &session).unwrap();
        assert_budget_notice(&generation);
    }

    #[test]
    fn expression_mode_hits_budget() {
        let session = Session::default().with_budget(Duration::ZERO);
        let slots = vec!["x"; 10_000];
        let generation = generate("|_", &slots, &session).unwrap();

        assert!(generation.values.len() < slots.len());
        assert_budget_notice(&generation);
    }

    #[test]
    fn deeply_nested_expression_is_rejected() {
        let format = format!("1::{}_{}", "(".repeat(150), ")".repeat(150));
        let result = generate(&format, &["", ""], &Session::default());
        match result {
            Err(GenerationError::Evaluation(EvalError {
                cause: Fault::Syntax(SyntaxError::TooDeep(_)),
                ..
            })) => {}
            other => panic!("expected a nesting error, got {:?}", other),
        }
    }

    #[test]
    fn seeded_random_repeats() {
        let session = Session::default().with_seed(Some(42));
        let slots = ["", "", "", ""];
        let first = generate("|random.randint(1, 1000)", &slots, &session).unwrap();
        let second = generate("|random.randint(1, 1000)", &slots, &session).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn evaluation_failure_in_expression_mode() {
        let result = generate("|_ + 1", &["a"], &Session::default().with_quiet(true));
        assert!(matches!(result, Err(GenerationError::Evaluation(_))));
    }
}
