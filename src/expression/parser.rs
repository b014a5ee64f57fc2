//! Recursive descent parser for the expression language

use super::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
    Plus,
    Invert,
    Not,
}

impl UnaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOperator::Negate => "-",
            UnaryOperator::Plus => "+",
            UnaryOperator::Invert => "~",
            UnaryOperator::Not => "not",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    FloorDivide,
    Modulo,
    Power,
    BitOr,
    BitXor,
    BitAnd,
    ShiftLeft,
    ShiftRight,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::FloorDivide => "//",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Power => "**",
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "^",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::ShiftLeft => "<<",
            BinaryOperator::ShiftRight => ">>",
        }
    }

    fn from_symbol(symbol: &str) -> Option<BinaryOperator> {
        match symbol {
            "+" => Some(BinaryOperator::Add),
            "-" => Some(BinaryOperator::Subtract),
            "*" => Some(BinaryOperator::Multiply),
            "/" => Some(BinaryOperator::Divide),
            "//" => Some(BinaryOperator::FloorDivide),
            "%" => Some(BinaryOperator::Modulo),
            "**" => Some(BinaryOperator::Power),
            "|" => Some(BinaryOperator::BitOr),
            "^" => Some(BinaryOperator::BitXor),
            "&" => Some(BinaryOperator::BitAnd),
            "<<" => Some(BinaryOperator::ShiftLeft),
            ">>" => Some(BinaryOperator::ShiftRight),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    In,
    NotIn,
}

impl Comparison {
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Equal => "==",
            Comparison::NotEqual => "!=",
            Comparison::Less => "<",
            Comparison::LessEqual => "<=",
            Comparison::Greater => ">",
            Comparison::GreaterEqual => ">=",
            Comparison::In => "in",
            Comparison::NotIn => "not in",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression<'i> {
    Literal(Value),
    Name(&'i str),
    Unary(UnaryOperator, Box<Expression<'i>>),
    Binary(BinaryOperator, Box<Expression<'i>>, Box<Expression<'i>>),
    Compare(Box<Expression<'i>>, Vec<(Comparison, Expression<'i>)>),
    And(Box<Expression<'i>>, Box<Expression<'i>>),
    Or(Box<Expression<'i>>, Box<Expression<'i>>),
    Conditional {
        test: Box<Expression<'i>>,
        body: Box<Expression<'i>>,
        orelse: Box<Expression<'i>>,
    },
    Attribute(Box<Expression<'i>>, &'i str),
    Call(Box<Expression<'i>>, Vec<Expression<'i>>),
    Index(Box<Expression<'i>>, Box<Expression<'i>>),
    Slice {
        target: Box<Expression<'i>>,
        lower: Option<Box<Expression<'i>>>,
        upper: Option<Box<Expression<'i>>>,
        step: Option<Box<Expression<'i>>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    UnexpectedEndOfInput(usize),
    InvalidCharacter(usize, char),
    Expected(usize, &'static str),
    UnterminatedString(usize),
    InvalidNumber(usize),
    TrailingInput(usize),
    TooDeep(usize),
}

impl SyntaxError {
    pub fn offset(&self) -> usize {
        match self {
            SyntaxError::UnexpectedEndOfInput(offset) => *offset,
            SyntaxError::InvalidCharacter(offset, _) => *offset,
            SyntaxError::Expected(offset, _) => *offset,
            SyntaxError::UnterminatedString(offset) => *offset,
            SyntaxError::InvalidNumber(offset) => *offset,
            SyntaxError::TrailingInput(offset) => *offset,
            SyntaxError::TooDeep(offset) => *offset,
        }
    }

    pub fn message(&self) -> String {
        match self {
            SyntaxError::UnexpectedEndOfInput(_) => "unexpected end of input".to_string(),
            SyntaxError::InvalidCharacter(_, c) => format!("invalid character '{}'", c),
            SyntaxError::Expected(_, value) => format!("expected {}", value),
            SyntaxError::UnterminatedString(_) => "unterminated string literal".to_string(),
            SyntaxError::InvalidNumber(_) => "invalid number literal".to_string(),
            SyntaxError::TrailingInput(_) => "unexpected input after expression".to_string(),
            SyntaxError::TooDeep(_) => "expression is nested too deeply".to_string(),
        }
    }
}

// Longest first, so that "**" is never mistaken for "*".
static OPERATORS: &[&str] = &[
    "**", "//", "<<", ">>", "<=", ">=", "==", "!=", "+", "-", "*", "/", "%", "|", "^", "&", "~",
    "<", ">", "(", ")", "[", "]", ",", ".", ":",
];

static KEYWORDS: &[&str] = &["and", "or", "not", "if", "else", "in", "True", "False"];

/// How deeply the tree may nest before parsing gives up rather than
/// exhausting the stack. Sub-expressions, prefix operators, exponents and
/// each link of an operator or postfix chain all count.
const MAXIMUM_DEPTH: usize = 100;

#[derive(Debug)]
pub struct Parser<'i> {
    source: &'i str,
    offset: usize,
    depth: usize,
}

impl<'i> Parser<'i> {
    pub fn new() -> Parser<'i> {
        Parser {
            source: "",
            offset: 0,
            depth: 0,
        }
    }

    pub fn initialize(&mut self, content: &'i str) {
        self.source = content;
        self.offset = 0;
        self.depth = 0;
    }

    fn nested<T>(
        &mut self,
        read: impl FnOnce(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<T, SyntaxError> {
        if self.depth >= MAXIMUM_DEPTH {
            return Err(SyntaxError::TooDeep(self.offset));
        }
        self.depth += 1;
        let result = read(self);
        self.depth -= 1;
        result
    }

    // The caller restores the depth once its chain is complete.
    fn lengthen(&mut self) -> Result<(), SyntaxError> {
        if self.depth >= MAXIMUM_DEPTH {
            return Err(SyntaxError::TooDeep(self.offset));
        }
        self.depth += 1;
        Ok(())
    }

    fn advance(&mut self, width: usize) {
        self.source = &self.source[width..];
        self.offset += width;
    }

    fn entire(&self) -> &'i str {
        self.source
    }

    fn is_finished(&self) -> bool {
        self.source
            .is_empty()
    }

    fn peek_next_char(&self) -> Option<char> {
        self.source
            .chars()
            .next()
    }

    fn trim_whitespace(&mut self) {
        let l = self.source.len()
            - self
                .source
                .trim_start()
                .len();
        self.advance(l);
    }

    /// Parse a complete expression; anything left over is an error.
    pub fn read_program(&mut self) -> Result<Expression<'i>, SyntaxError> {
        let expression = self.read_expression()?;

        self.trim_whitespace();
        if !self.is_finished() {
            return Err(SyntaxError::TrailingInput(self.offset));
        }

        Ok(expression)
    }

    fn peek_operator(&mut self) -> Option<&'static str> {
        self.trim_whitespace();
        OPERATORS
            .iter()
            .copied()
            .find(|operator| {
                self.source
                    .starts_with(operator)
            })
    }

    fn take_operator(&mut self, candidates: &[&'static str]) -> Option<&'static str> {
        let operator = self.peek_operator()?;
        if candidates.contains(&operator) {
            self.advance(operator.len());
            Some(operator)
        } else {
            None
        }
    }

    fn require_operator(
        &mut self,
        operator: &'static str,
        expected: &'static str,
    ) -> Result<(), SyntaxError> {
        match self.take_operator(&[operator]) {
            Some(_) => Ok(()),
            None if self.is_finished() => Err(SyntaxError::UnexpectedEndOfInput(self.offset)),
            None => Err(SyntaxError::Expected(self.offset, expected)),
        }
    }

    fn peek_identifier(&mut self) -> Option<&'i str> {
        self.trim_whitespace();
        let re = regex!(r"^[A-Za-z_][A-Za-z0-9_]*");
        re.find(self.source)
            .map(|m| m.as_str())
    }

    fn peek_keyword(&mut self, word: &str) -> bool {
        self.peek_identifier() == Some(word)
    }

    fn take_keyword(&mut self, word: &str) -> bool {
        if self.peek_keyword(word) {
            self.advance(word.len());
            true
        } else {
            false
        }
    }

    fn read_expression(&mut self) -> Result<Expression<'i>, SyntaxError> {
        self.nested(Self::read_conditional)
    }

    fn read_conditional(&mut self) -> Result<Expression<'i>, SyntaxError> {
        let body = self.read_disjunction()?;

        if self.take_keyword("if") {
            let test = self.read_disjunction()?;
            if !self.take_keyword("else") {
                return Err(SyntaxError::Expected(self.offset, "'else'"));
            }
            let orelse = self.read_expression()?;

            return Ok(Expression::Conditional {
                test: Box::new(test),
                body: Box::new(body),
                orelse: Box::new(orelse),
            });
        }

        Ok(body)
    }

    fn read_disjunction(&mut self) -> Result<Expression<'i>, SyntaxError> {
        let depth = self.depth;
        let mut left = self.read_conjunction()?;
        while self.take_keyword("or") {
            self.lengthen()?;
            let right = self.read_conjunction()?;
            left = Expression::Or(Box::new(left), Box::new(right));
        }
        self.depth = depth;
        Ok(left)
    }

    fn read_conjunction(&mut self) -> Result<Expression<'i>, SyntaxError> {
        let depth = self.depth;
        let mut left = self.read_inversion()?;
        while self.take_keyword("and") {
            self.lengthen()?;
            let right = self.read_inversion()?;
            left = Expression::And(Box::new(left), Box::new(right));
        }
        self.depth = depth;
        Ok(left)
    }

    fn read_inversion(&mut self) -> Result<Expression<'i>, SyntaxError> {
        if self.take_keyword("not") {
            let operand = self.nested(Self::read_inversion)?;
            return Ok(Expression::Unary(UnaryOperator::Not, Box::new(operand)));
        }
        self.read_comparison()
    }

    fn read_comparison(&mut self) -> Result<Expression<'i>, SyntaxError> {
        let first = self.read_binary(0)?;
        let mut rest = Vec::new();

        loop {
            let comparison = if let Some(symbol) =
                self.take_operator(&["==", "!=", "<", "<=", ">", ">="])
            {
                match symbol {
                    "==" => Comparison::Equal,
                    "!=" => Comparison::NotEqual,
                    "<" => Comparison::Less,
                    "<=" => Comparison::LessEqual,
                    ">" => Comparison::Greater,
                    _ => Comparison::GreaterEqual,
                }
            } else if self.take_keyword("in") {
                Comparison::In
            } else if self.peek_keyword("not") {
                // only "not in" continues a comparison
                let (source, offset) = (self.source, self.offset);
                self.advance(3);
                if !self.take_keyword("in") {
                    self.source = source;
                    self.offset = offset;
                    break;
                }
                Comparison::NotIn
            } else {
                break;
            };

            let operand = self.read_binary(0)?;
            rest.push((comparison, operand));
        }

        if rest.is_empty() {
            Ok(first)
        } else {
            Ok(Expression::Compare(Box::new(first), rest))
        }
    }

    /// Left associative binary operators, loosest binding first. Power is
    /// handled separately since it is right associative and binds tighter
    /// than a unary minus on its left.
    fn read_binary(&mut self, level: usize) -> Result<Expression<'i>, SyntaxError> {
        const LEVELS: &[&[&str]] = &[
            &["|"],
            &["^"],
            &["&"],
            &["<<", ">>"],
            &["+", "-"],
            &["*", "/", "//", "%"],
        ];

        if level == LEVELS.len() {
            return self.read_factor();
        }

        let depth = self.depth;
        let mut left = self.read_binary(level + 1)?;
        while let Some(symbol) = self.take_operator(LEVELS[level]) {
            self.lengthen()?;
            let right = self.read_binary(level + 1)?;
            let operator = BinaryOperator::from_symbol(symbol)
                .ok_or(SyntaxError::Expected(self.offset, "an operator"))?;
            left = Expression::Binary(operator, Box::new(left), Box::new(right));
        }
        self.depth = depth;
        Ok(left)
    }

    fn read_factor(&mut self) -> Result<Expression<'i>, SyntaxError> {
        let operator = match self.take_operator(&["+", "-", "~"]) {
            Some("+") => UnaryOperator::Plus,
            Some("-") => UnaryOperator::Negate,
            Some(_) => UnaryOperator::Invert,
            None => return self.read_power(),
        };
        let operand = self.nested(Self::read_factor)?;
        Ok(Expression::Unary(operator, Box::new(operand)))
    }

    fn read_power(&mut self) -> Result<Expression<'i>, SyntaxError> {
        let base = self.read_primary()?;
        if self
            .take_operator(&["**"])
            .is_some()
        {
            let exponent = self.nested(Self::read_factor)?;
            return Ok(Expression::Binary(
                BinaryOperator::Power,
                Box::new(base),
                Box::new(exponent),
            ));
        }
        Ok(base)
    }

    fn read_primary(&mut self) -> Result<Expression<'i>, SyntaxError> {
        let depth = self.depth;
        let mut expression = self.read_atom()?;

        loop {
            let operator = self.take_operator(&["(", ".", "["]);
            if operator.is_some() {
                self.lengthen()?;
            }
            match operator {
                Some("(") => {
                    let arguments = self.read_arguments()?;
                    expression = Expression::Call(Box::new(expression), arguments);
                }
                Some(".") => {
                    let name = self
                        .peek_identifier()
                        .ok_or(SyntaxError::Expected(self.offset, "an attribute name"))?;
                    self.advance(name.len());
                    expression = Expression::Attribute(Box::new(expression), name);
                }
                Some(_) => {
                    expression = self.read_subscript(expression)?;
                }
                None => break,
            }
        }

        self.depth = depth;
        Ok(expression)
    }

    // the opening parenthesis has already been consumed
    fn read_arguments(&mut self) -> Result<Vec<Expression<'i>>, SyntaxError> {
        let mut arguments = Vec::new();

        if self
            .take_operator(&[")"])
            .is_some()
        {
            return Ok(arguments);
        }

        loop {
            arguments.push(self.read_expression()?);

            if self
                .take_operator(&[","])
                .is_some()
            {
                if self
                    .take_operator(&[")"])
                    .is_some()
                {
                    break;
                }
                continue;
            }

            self.require_operator(")", "',' or ')'")?;
            break;
        }

        Ok(arguments)
    }

    // the opening bracket has already been consumed
    fn read_subscript(&mut self, target: Expression<'i>) -> Result<Expression<'i>, SyntaxError> {
        let lower = if self.peek_operator() == Some(":") {
            None
        } else {
            Some(Box::new(self.read_expression()?))
        };

        if self
            .take_operator(&[":"])
            .is_none()
        {
            self.require_operator("]", "']'")?;
            return match lower {
                Some(index) => Ok(Expression::Index(Box::new(target), index)),
                None => Err(SyntaxError::Expected(self.offset, "an index")),
            };
        }

        let upper = match self.peek_operator() {
            Some(":") | Some("]") => None,
            _ => Some(Box::new(self.read_expression()?)),
        };

        let step = if self
            .take_operator(&[":"])
            .is_some()
            && self.peek_operator() != Some("]")
        {
            Some(Box::new(self.read_expression()?))
        } else {
            None
        };

        self.require_operator("]", "']'")?;

        Ok(Expression::Slice {
            target: Box::new(target),
            lower,
            upper,
            step,
        })
    }

    fn read_atom(&mut self) -> Result<Expression<'i>, SyntaxError> {
        self.trim_whitespace();

        let c = match self.peek_next_char() {
            Some(c) => c,
            None => return Err(SyntaxError::UnexpectedEndOfInput(self.offset)),
        };

        if c == '(' {
            self.advance(1);
            let expression = self.read_expression()?;
            self.require_operator(")", "')'")?;
            return Ok(expression);
        }

        if c == '\'' || c == '"' {
            return self.read_string();
        }

        if c.is_ascii_digit() || c == '.' {
            return self.read_number();
        }

        if let Some(name) = self.peek_identifier() {
            let expression = match name {
                "True" => Expression::Literal(Value::Boolean(true)),
                "False" => Expression::Literal(Value::Boolean(false)),
                _ if KEYWORDS.contains(&name) => {
                    return Err(SyntaxError::Expected(self.offset, "an operand"));
                }
                _ => Expression::Name(name),
            };
            self.advance(name.len());
            return Ok(expression);
        }

        Err(SyntaxError::InvalidCharacter(self.offset, c))
    }

    fn read_number(&mut self) -> Result<Expression<'i>, SyntaxError> {
        let re = regex!(
            r"^(?:0[xX][0-9a-fA-F]+|0[oO][0-7]+|0[bB][01]+|(?:[0-9]+\.[0-9]*|\.[0-9]+|[0-9]+)(?:[eE][+-]?[0-9]+)?)"
        );

        let text = re
            .find(self.entire())
            .map(|m| m.as_str())
            .ok_or(SyntaxError::InvalidNumber(self.offset))?;

        let radix = match text.get(..2) {
            Some("0x") | Some("0X") => 16,
            Some("0o") | Some("0O") => 8,
            Some("0b") | Some("0B") => 2,
            _ => 10,
        };

        let value = if radix != 10 {
            i64::from_str_radix(&text[2..], radix)
                .map(Value::Integer)
                .map_err(|_| SyntaxError::InvalidNumber(self.offset))?
        } else if text.contains(['.', 'e', 'E']) {
            text.parse::<f64>()
                .map(Value::Float)
                .map_err(|_| SyntaxError::InvalidNumber(self.offset))?
        } else {
            text.parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| SyntaxError::InvalidNumber(self.offset))?
        };

        self.advance(text.len());
        Ok(Expression::Literal(value))
    }

    fn read_string(&mut self) -> Result<Expression<'i>, SyntaxError> {
        let start = self.offset;
        let mut chars = self
            .source
            .char_indices();

        let quote = match chars.next() {
            Some((_, c)) => c,
            None => return Err(SyntaxError::UnexpectedEndOfInput(self.offset)),
        };

        let mut text = String::new();
        let mut escaped = false;

        for (i, c) in chars {
            if escaped {
                match c {
                    'n' => text.push('\n'),
                    't' => text.push('\t'),
                    'r' => text.push('\r'),
                    '0' => text.push('\0'),
                    '\\' | '\'' | '"' => text.push(c),
                    _ => {
                        text.push('\\');
                        text.push(c);
                    }
                }
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                self.advance(i + c.len_utf8());
                return Ok(Expression::Literal(Value::Text(text)));
            } else {
                text.push(c);
            }
        }

        Err(SyntaxError::UnterminatedString(start))
    }
}

#[cfg(test)]
mod check {
    use super::*;

    fn parse(content: &str) -> Result<Expression<'_>, SyntaxError> {
        let mut input = Parser::new();
        input.initialize(content);
        input.read_program()
    }

    fn int(n: i64) -> Box<Expression<'static>> {
        Box::new(Expression::Literal(Value::Integer(n)))
    }

    #[test]
    fn literals() {
        assert_eq!(parse("42"), Ok(Expression::Literal(Value::Integer(42))));
        assert_eq!(parse("0x1f"), Ok(Expression::Literal(Value::Integer(31))));
        assert_eq!(parse("1.5e2"), Ok(Expression::Literal(Value::Float(150.0))));
        assert_eq!(parse(".5"), Ok(Expression::Literal(Value::Float(0.5))));
        assert_eq!(
            parse(r#""a\"b""#),
            Ok(Expression::Literal(Value::Text("a\"b".to_string())))
        );
        assert_eq!(parse("True"), Ok(Expression::Literal(Value::Boolean(true))));
        assert_eq!(parse("_"), Ok(Expression::Name("_")));
    }

    #[test]
    fn precedence() {
        assert_eq!(
            parse("1 + 2 * 3"),
            Ok(Expression::Binary(
                BinaryOperator::Add,
                int(1),
                Box::new(Expression::Binary(BinaryOperator::Multiply, int(2), int(3)))
            ))
        );

        // unary minus binds looser than power
        assert_eq!(
            parse("-2**2"),
            Ok(Expression::Unary(
                UnaryOperator::Negate,
                Box::new(Expression::Binary(BinaryOperator::Power, int(2), int(2)))
            ))
        );

        // power is right associative
        assert_eq!(
            parse("2**3**2"),
            Ok(Expression::Binary(
                BinaryOperator::Power,
                int(2),
                Box::new(Expression::Binary(BinaryOperator::Power, int(3), int(2)))
            ))
        );

        // subtraction is left associative
        assert_eq!(
            parse("5-2-1"),
            Ok(Expression::Binary(
                BinaryOperator::Subtract,
                Box::new(Expression::Binary(BinaryOperator::Subtract, int(5), int(2))),
                int(1)
            ))
        );
    }

    #[test]
    fn comparisons() {
        assert_eq!(
            parse("i==10"),
            Ok(Expression::Compare(
                Box::new(Expression::Name("i")),
                vec![(Comparison::Equal, Expression::Literal(Value::Integer(10)))]
            ))
        );
        assert_eq!(
            parse("1 < _ <= 3"),
            Ok(Expression::Compare(
                int(1),
                vec![
                    (Comparison::Less, Expression::Name("_")),
                    (Comparison::LessEqual, Expression::Literal(Value::Integer(3)))
                ]
            ))
        );
        assert_eq!(
            parse("'a' not in _"),
            Ok(Expression::Compare(
                Box::new(Expression::Literal(Value::Text("a".to_string()))),
                vec![(Comparison::NotIn, Expression::Name("_"))]
            ))
        );
    }

    #[test]
    fn boolean_and_conditional() {
        assert_eq!(
            parse("not _ or p"),
            Ok(Expression::Or(
                Box::new(Expression::Unary(
                    UnaryOperator::Not,
                    Box::new(Expression::Name("_"))
                )),
                Box::new(Expression::Name("p"))
            ))
        );
        assert_eq!(
            parse("1 if _ else 2"),
            Ok(Expression::Conditional {
                test: Box::new(Expression::Name("_")),
                body: int(1),
                orelse: int(2),
            })
        );
    }

    #[test]
    fn postfix() {
        assert_eq!(
            parse("_.upper()"),
            Ok(Expression::Call(
                Box::new(Expression::Attribute(
                    Box::new(Expression::Name("_")),
                    "upper"
                )),
                vec![]
            ))
        );
        assert_eq!(
            parse("math.pow(2, 3,)"),
            Ok(Expression::Call(
                Box::new(Expression::Attribute(
                    Box::new(Expression::Name("math")),
                    "pow"
                )),
                vec![
                    Expression::Literal(Value::Integer(2)),
                    Expression::Literal(Value::Integer(3))
                ]
            ))
        );
        assert_eq!(
            parse("_[::-1]"),
            Ok(Expression::Slice {
                target: Box::new(Expression::Name("_")),
                lower: None,
                upper: None,
                step: Some(Box::new(Expression::Unary(UnaryOperator::Negate, int(1)))),
            })
        );
        assert_eq!(
            parse("_[0]"),
            Ok(Expression::Index(Box::new(Expression::Name("_")), int(0)))
        );
    }

    #[test]
    fn syntax_errors() {
        assert_eq!(parse(""), Err(SyntaxError::UnexpectedEndOfInput(0)));
        assert_eq!(parse("1 +"), Err(SyntaxError::UnexpectedEndOfInput(3)));
        assert_eq!(parse("(1"), Err(SyntaxError::UnexpectedEndOfInput(2)));
        assert_eq!(parse("'abc"), Err(SyntaxError::UnterminatedString(0)));
        assert_eq!(parse("1 2"), Err(SyntaxError::TrailingInput(2)));
        assert_eq!(parse("_ = 1"), Err(SyntaxError::TrailingInput(2)));
        assert_eq!(parse("$"), Err(SyntaxError::InvalidCharacter(0, '$')));
        assert_eq!(parse("1 if 2"), Err(SyntaxError::Expected(6, "'else'")));
        assert_eq!(parse("and"), Err(SyntaxError::Expected(0, "an operand")));
    }

    #[test]
    fn nesting_is_limited() {
        let shallow = format!("{}_{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(parse(&shallow), Ok(Expression::Name("_")));

        let deep = format!("{}_{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(matches!(parse(&deep), Err(SyntaxError::TooDeep(_))));

        let negated = format!("{}1", "-".repeat(10_000));
        assert!(matches!(parse(&negated), Err(SyntaxError::TooDeep(_))));

        let inverted = format!("{}True", "not ".repeat(10_000));
        assert!(matches!(parse(&inverted), Err(SyntaxError::TooDeep(_))));

        let tower = format!("2{}", "**2".repeat(10_000));
        assert!(matches!(parse(&tower), Err(SyntaxError::TooDeep(_))));

        let conditional = format!("{}0", "1 if _ else ".repeat(10_000));
        assert!(matches!(parse(&conditional), Err(SyntaxError::TooDeep(_))));

        let sum = format!("1{}", "+1".repeat(10_000));
        assert!(matches!(parse(&sum), Err(SyntaxError::TooDeep(_))));

        let calls = format!("_{}", ".upper()".repeat(10_000));
        assert!(matches!(parse(&calls), Err(SyntaxError::TooDeep(_))));

        // the depth of one chain is released before the next begins
        let half = vec!["1"; 60].join("+");
        assert!(parse(&format!("{} == {}", half, half)).is_ok());
    }
}
