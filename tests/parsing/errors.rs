#[cfg(test)]
mod errors {
    use insertnums::parsing::{self, ParseError};

    /// Helper function to check that parsing produces the expected kind of
    /// error.
    fn expect_error(content: &str, expected: ParseError) {
        match parsing::parse(content) {
            Ok(spec) => panic!(
                "Expected parsing to fail, but it succeeded for input {:?}: {:?}",
                content, spec
            ),
            Err(error) => {
                if std::mem::discriminant(&error) != std::mem::discriminant(&expected) {
                    panic!(
                        "Expected error type like {:?} but got: {:?} for input {:?}",
                        expected, error, content
                    );
                }
            }
        }
    }

    #[test]
    fn empty() {
        expect_error("", ParseError::Empty);
    }

    #[test]
    fn not_text() {
        assert_eq!(
            parsing::parse_bytes(&[0x31, 0xff, 0xfe]),
            Err(ParseError::NotAString)
        );
    }

    #[test]
    fn nothing_matches() {
        expect_error("1:a", ParseError::NoGrammarMatched(String::new()));
        expect_error("aB", ParseError::NoGrammarMatched(String::new()));
        expect_error("01", ParseError::NoGrammarMatched(String::new()));
        expect_error("1~03~3", ParseError::NoGrammarMatched(String::new()));
        expect_error("x|_", ParseError::NoGrammarMatched(String::new()));
        expect_error("|", ParseError::NoGrammarMatched(String::new()));
        expect_error("a:1.5", ParseError::NoGrammarMatched(String::new()));
    }

    #[test]
    fn number_too_large() {
        expect_error(
            "a:99999999999999999999",
            ParseError::InvalidNumber(String::new()),
        );
    }

    #[test]
    fn message_names_input() {
        let error = parsing::parse("1:a").unwrap_err();
        assert_eq!(error.to_string(), "Format string is invalid: 1:a");
    }
}
