#[cfg(test)]
mod formats {
    use insertnums::language::*;
    use insertnums::parsing;

    fn numeric(format: &str) -> NumericSpec<'_> {
        match parsing::parse(format) {
            Ok(FormatSpec::Numeric(spec)) => spec,
            other => panic!("Expected numeric spec for {:?} but got {:?}", format, other),
        }
    }

    fn alpha(format: &str) -> AlphaSpec<'_> {
        match parsing::parse(format) {
            Ok(FormatSpec::Alpha(spec)) => spec,
            other => panic!("Expected alpha spec for {:?} but got {:?}", format, other),
        }
    }

    fn expression(format: &str) -> ExpressionSpec<'_> {
        match parsing::parse(format) {
            Ok(FormatSpec::Expression(spec)) => spec,
            other => panic!("Expected expression spec for {:?} but got {:?}", format, other),
        }
    }

    #[test]
    fn start_and_step() {
        let spec = numeric("1:1");
        assert_eq!(spec.start, Number::Integral(1));
        assert_eq!(spec.step, Number::Integral(1));
        assert_eq!(spec.format, None);

        let spec = numeric("-3:0.5");
        assert_eq!(spec.start, Number::Integral(-3));
        assert_eq!(spec.step, Number::Floating(0.5));

        let spec = numeric(":2");
        assert_eq!(spec.start, Number::Integral(1));
        assert_eq!(spec.step, Number::Integral(2));
    }

    #[test]
    fn zero_padded() {
        let spec = numeric("1:1~03");
        assert_eq!(spec.format, Some("03"));
        assert!(!spec.reverse);
    }

    #[test]
    fn full_format_spec() {
        assert_eq!(numeric("1~*^+#012.3f").format, Some("*^+#012.3f"));
        assert_eq!(numeric("1~ >8").format, Some(" >8"));
        assert_eq!(numeric("1~x").format, Some("x"));
    }

    #[test]
    fn expression_stop_and_reverse() {
        let spec = numeric("1::_*2@i==10!");
        assert_eq!(spec.expr, Some("_*2"));
        assert_eq!(spec.stop, Some("i==10"));
        assert!(spec.reverse);
    }

    #[test]
    fn stop_containing_inequality() {
        let spec = numeric("1@_!=5");
        assert_eq!(spec.stop, Some("_!=5"));
        assert!(!spec.reverse);
    }

    #[test]
    fn lowercase_letters() {
        let spec = alpha("a");
        assert_eq!(spec.start, "a");
        assert_eq!(spec.step, 1);
        assert!(!spec.wrap);
        assert!(!spec.is_upper());
    }

    #[test]
    fn uppercase_wrapping() {
        let spec = alpha("A:2~w");
        assert_eq!(spec.start, "A");
        assert_eq!(spec.step, 2);
        assert_eq!(spec.format, None);
        assert!(spec.wrap);
        assert!(spec.is_upper());
    }

    #[test]
    fn letters_with_format_and_stop() {
        let spec = alpha("aa:-1~_>4w@_=='a'!");
        assert_eq!(spec.step, -1);
        assert_eq!(spec.format, Some("_>4"));
        assert!(spec.wrap);
        assert_eq!(spec.stop, Some("_=='a'"));
        assert!(spec.reverse);
    }

    #[test]
    fn expression_mode() {
        let spec = expression("|_.upper()");
        assert_eq!(spec.cast, Cast::Text);
        assert_eq!(spec.expr, "_.upper()");

        let spec = expression("i|_*2");
        assert_eq!(spec.cast, Cast::Integer);
        assert_eq!(spec.expr, "_*2");

        let spec = expression("f|~.2f::_/3@i>4!");
        assert_eq!(spec.cast, Cast::Float);
        assert_eq!(spec.format, Some(".2f"));
        assert_eq!(spec.expr, "_/3");
        assert_eq!(spec.stop, Some("i>4"));
        assert!(spec.reverse);
    }

    #[test]
    fn modes() {
        let cases = [
            ("1", Mode::Numeric),
            ("1.5:2", Mode::Numeric),
            ("~03", Mode::Numeric),
            ("z", Mode::Alpha),
            ("ZZ:3", Mode::Alpha),
            ("b|_", Mode::Expression),
            ("|1", Mode::Expression),
        ];
        for (format, mode) in cases {
            let spec = parsing::parse(format).unwrap_or_else(|e| panic!("{:?}: {}", format, e));
            assert_eq!(spec.mode(), mode, "for {:?}", format);
        }
    }

    #[test]
    fn canonical_form_parses_back() {
        for format in ["1", "3:-2~04", "1::p+_@c>50!", "A:2~w", "aa~>5", "i|~03::_*2@i==3"] {
            let spec = parsing::parse(format).unwrap();
            let canonical = spec.to_string();
            let again = parsing::parse(&canonical).unwrap();
            assert_eq!(spec, again, "canonical form {:?} of {:?}", canonical, format);
        }
    }
}
