//! Train Conditions
//!
//! A small expression language for describing the training outcomes a
//! player cares about, e.g. `POW >= 15 and CON + EYE > 20`. Stat names
//! map onto the 5 training slots; pitcher stats alias the same slots.
//!
//! Grammar:
//! ```text
//! condition := and_expr (("or" | "|") and_expr)*
//! and_expr  := compare (("and" | "&") compare)*
//! compare   := sum ("<" | "<=" | ">" | ">=" | "==" | "!=") sum
//! sum       := term (("+" | "-") term)*
//! term      := number | stat | "(" condition ")"
//! ```

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConditionError {
    #[error("unexpected character {0:?} in condition")]
    BadChar(char),
    #[error("unknown stat name {0:?}")]
    UnknownStat(String),
    #[error("expected {expected} but found {found}")]
    Unexpected { expected: &'static str, found: String },
    #[error("condition ended unexpectedly")]
    UnexpectedEnd,
    #[error("trailing input after condition: {0:?}")]
    TrailingInput(String),
    #[error("numeric literal {0:?} is too large")]
    LiteralOverflow(String),
}

/// Training slots, addressed by batter or pitcher stat name.
///
/// CON/LOC -> 0, POW/VEL -> 1, EYE/STA -> 2, SPD/FB -> 3, FLD/BRK -> 4.
fn stat_slot(name: &str) -> Option<usize> {
    match name.to_ascii_uppercase().as_str() {
        "CON" | "LOC" => Some(0),
        "POW" | "VEL" => Some(1),
        "EYE" | "STA" => Some(2),
        "SPD" | "FB" => Some(3),
        "FLD" | "BRK" => Some(4),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    Literal(i64),
    Stat(usize),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
}

impl Expr {
    fn eval(&self, stats: &[u32; 5]) -> i64 {
        match self {
            Expr::Literal(n) => *n,
            Expr::Stat(slot) => i64::from(stats[*slot]),
            Expr::Add(a, b) => a.eval(stats) + b.eval(stats),
            Expr::Sub(a, b) => a.eval(stats) - b.eval(stats),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Compare(Expr, CmpOp, Expr),
    And(Box<Node>, Box<Node>),
    Or(Box<Node>, Box<Node>),
}

/// A parsed, reusable train condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    root: Node,
    source: String,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Condition {
    pub fn parse(input: &str) -> Result<Self, ConditionError> {
        let tokens = tokenize(input)?;
        let mut parser = Parser { tokens, pos: 0 };
        let root = parser.condition()?;
        if parser.pos < parser.tokens.len() {
            return Err(ConditionError::TrailingInput(format!(
                "{:?}",
                parser.tokens[parser.pos]
            )));
        }
        Ok(Condition {
            root,
            source: input.to_string(),
        })
    }

    /// Evaluate against a 5-slot training distribution.
    pub fn eval(&self, stats: &[u32; 5]) -> bool {
        eval_node(&self.root, stats)
    }
}

fn eval_node(node: &Node, stats: &[u32; 5]) -> bool {
    match node {
        Node::Compare(lhs, op, rhs) => {
            let (a, b) = (lhs.eval(stats), rhs.eval(stats));
            match op {
                CmpOp::Lt => a < b,
                CmpOp::Le => a <= b,
                CmpOp::Gt => a > b,
                CmpOp::Ge => a >= b,
                CmpOp::Eq => a == b,
                CmpOp::Ne => a != b,
            }
        }
        Node::And(a, b) => eval_node(a, stats) && eval_node(b, stats),
        Node::Or(a, b) => eval_node(a, stats) || eval_node(b, stats),
    }
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Number(i64),
    Stat(usize),
    And,
    Or,
    Plus,
    Minus,
    LParen,
    RParen,
    Cmp(CmpOp),
}

fn tokenize(input: &str) -> Result<Vec<Token>, ConditionError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&ch) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' => {
                let mut literal = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() {
                        literal.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value: i64 = literal
                    .parse()
                    .map_err(|_| ConditionError::LiteralOverflow(literal))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_ascii_alphabetic() => {
                let mut word = String::new();
                while let Some(&a) = chars.peek() {
                    if a.is_ascii_alphabetic() {
                        word.push(a);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match word.to_ascii_lowercase().as_str() {
                    "and" => tokens.push(Token::And),
                    "or" => tokens.push(Token::Or),
                    _ => match stat_slot(&word) {
                        Some(slot) => tokens.push(Token::Stat(slot)),
                        None => return Err(ConditionError::UnknownStat(word)),
                    },
                }
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '&' => {
                chars.next();
                tokens.push(Token::And);
            }
            '|' => {
                chars.next();
                tokens.push(Token::Or);
            }
            '<' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Cmp(CmpOp::Le));
                } else {
                    tokens.push(Token::Cmp(CmpOp::Lt));
                }
            }
            '>' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Cmp(CmpOp::Ge));
                } else {
                    tokens.push(Token::Cmp(CmpOp::Gt));
                }
            }
            '=' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Cmp(CmpOp::Eq));
                } else {
                    return Err(ConditionError::BadChar('='));
                }
            }
            '!' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Cmp(CmpOp::Ne));
                } else {
                    return Err(ConditionError::BadChar('!'));
                }
            }
            other => return Err(ConditionError::BadChar(other)),
        }
    }
    Ok(tokens)
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Result<Token, ConditionError> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(ConditionError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    fn condition(&mut self) -> Result<Node, ConditionError> {
        let mut node = self.and_expr()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let rhs = self.and_expr()?;
            node = Node::Or(Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn and_expr(&mut self) -> Result<Node, ConditionError> {
        let mut node = self.compare()?;
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            let rhs = self.compare()?;
            node = Node::And(Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn compare(&mut self) -> Result<Node, ConditionError> {
        if self.peek() == Some(&Token::LParen) {
            // A parenthesis here could open either a grouped condition or a
            // grouped sum; try the condition first and backtrack on failure.
            let save = self.pos;
            self.pos += 1;
            if let Ok(inner) = self.condition() {
                if self.peek() == Some(&Token::RParen) {
                    self.pos += 1;
                    return Ok(inner);
                }
            }
            self.pos = save;
        }

        let lhs = self.sum()?;
        let op = match self.next()? {
            Token::Cmp(op) => op,
            other => {
                return Err(ConditionError::Unexpected {
                    expected: "comparison operator",
                    found: format!("{:?}", other),
                })
            }
        };
        let rhs = self.sum()?;
        Ok(Node::Compare(lhs, op, rhs))
    }

    fn sum(&mut self) -> Result<Expr, ConditionError> {
        let mut expr = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    let rhs = self.term()?;
                    expr = Expr::Add(Box::new(expr), Box::new(rhs));
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    let rhs = self.term()?;
                    expr = Expr::Sub(Box::new(expr), Box::new(rhs));
                }
                _ => return Ok(expr),
            }
        }
    }

    fn term(&mut self) -> Result<Expr, ConditionError> {
        match self.next()? {
            Token::Number(n) => Ok(Expr::Literal(n)),
            Token::Stat(slot) => Ok(Expr::Stat(slot)),
            Token::LParen => {
                let expr = self.sum()?;
                match self.next()? {
                    Token::RParen => Ok(expr),
                    other => Err(ConditionError::Unexpected {
                        expected: "closing parenthesis",
                        found: format!("{:?}", other),
                    }),
                }
            }
            other => Err(ConditionError::Unexpected {
                expected: "number, stat, or parenthesis",
                found: format!("{:?}", other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_comparison() {
        let cond = Condition::parse("POW >= 15").unwrap();
        assert!(cond.eval(&[0, 15, 0, 0, 0]));
        assert!(!cond.eval(&[0, 14, 0, 0, 0]));
    }

    #[test]
    fn test_stat_aliases_share_slots() {
        // VEL is the pitcher alias for slot 1, same as POW.
        let batter = Condition::parse("POW > 10").unwrap();
        let pitcher = Condition::parse("vel > 10").unwrap();
        let stats = [0, 11, 0, 0, 0];
        assert_eq!(batter.eval(&stats), pitcher.eval(&stats));
    }

    #[test]
    fn test_arithmetic_in_comparison() {
        let cond = Condition::parse("CON + EYE > 20").unwrap();
        assert!(cond.eval(&[12, 0, 9, 0, 0]));
        assert!(!cond.eval(&[10, 0, 10, 0, 0]));
    }

    #[test]
    fn test_and_or_precedence() {
        // and binds tighter than or.
        let cond = Condition::parse("CON > 5 or POW > 5 and EYE > 5").unwrap();
        assert!(cond.eval(&[6, 0, 0, 0, 0]));
        assert!(!cond.eval(&[0, 6, 0, 0, 0]));
        assert!(cond.eval(&[0, 6, 6, 0, 0]));
    }

    #[test]
    fn test_symbolic_connectives() {
        let cond = Condition::parse("CON > 5 & POW > 5 | FLD == 0").unwrap();
        assert!(cond.eval(&[0, 0, 0, 0, 0]));
        assert!(cond.eval(&[6, 6, 0, 0, 1]));
        assert!(!cond.eval(&[6, 0, 0, 0, 1]));
    }

    #[test]
    fn test_grouped_condition() {
        let cond = Condition::parse("(CON > 5 or POW > 5) and EYE > 5").unwrap();
        assert!(cond.eval(&[6, 0, 6, 0, 0]));
        assert!(!cond.eval(&[6, 0, 0, 0, 0]));
    }

    #[test]
    fn test_grouped_sum() {
        let cond = Condition::parse("(CON + POW) - EYE >= 3").unwrap();
        assert!(cond.eval(&[4, 2, 3, 0, 0]));
        assert!(!cond.eval(&[4, 2, 4, 0, 0]));
    }

    #[test]
    fn test_unknown_stat() {
        assert_eq!(
            Condition::parse("XYZ > 5").unwrap_err(),
            ConditionError::UnknownStat("XYZ".to_string())
        );
    }

    #[test]
    fn test_missing_comparison() {
        assert!(matches!(
            Condition::parse("CON + POW").unwrap_err(),
            ConditionError::UnexpectedEnd
        ));
    }

    #[test]
    fn test_oversized_literal_rejected() {
        assert_eq!(
            Condition::parse("CON > 99999999999999999999").unwrap_err(),
            ConditionError::LiteralOverflow("99999999999999999999".to_string())
        );
        // Largest representable literal still parses.
        let cond = Condition::parse("CON < 9223372036854775807").unwrap();
        assert!(cond.eval(&[0, 0, 0, 0, 0]));
    }

    #[test]
    fn test_trailing_garbage() {
        assert!(matches!(
            Condition::parse("CON > 5 5").unwrap_err(),
            ConditionError::TrailingInput(_)
        ));
    }
}
