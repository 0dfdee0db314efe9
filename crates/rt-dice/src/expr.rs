//! Dice expression parsing, evaluation, and range analysis.
//!
//! An expression is parsed once into a small tree. Its exact minimum and
//! maximum are computed at parse time by interval arithmetic, which also
//! rejects divisors that could be zero and ranges that overflow `i64`. Once
//! those checks pass, rolling the tree cannot fail.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use rand::rngs::StdRng;

use crate::dice::{DiceRoll, Die, Keep};
use crate::error::{DiceError, DiceResult};
use crate::lexer::{Token, lex};

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/` (floor division)
    Div,
}

/// A node of a parsed dice expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An integer literal.
    Number(i64),
    /// `NdS` with an optional keep modifier.
    Dice {
        /// Number of dice rolled.
        count: u32,
        /// The die type.
        die: Die,
        /// Which dice are kept.
        keep: Keep,
    },
    /// Unary negation.
    Neg(Box<Node>),
    /// A binary operation.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Node>,
        /// Right operand.
        rhs: Box<Node>,
    },
}

/// A parsed, range-checked dice expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceExpr {
    source: String,
    root: Node,
    min: i64,
    max: i64,
}

impl DiceExpr {
    /// Parse a dice expression such as `2d6+1`, `d%`, or `4d6kh3`.
    pub fn parse(source: &str) -> DiceResult<Self> {
        let tokens = lex(source)?;
        if tokens.is_empty() {
            return Err(DiceError::Empty);
        }

        let mut parser = Parser {
            source,
            tokens,
            pos: 0,
        };
        let root = parser.expr()?;
        if let Some((token, span)) = parser.peek_spanned() {
            return Err(parser.unexpected(token, span));
        }

        let (min, max) = bounds(&root, source)?;
        Ok(Self {
            source: source.trim().to_string(),
            root,
            min,
            max,
        })
    }

    /// The expression text this was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The root node of the expression tree.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The smallest value this expression can roll.
    pub fn min(&self) -> i64 {
        self.min
    }

    /// The largest value this expression can roll.
    pub fn max(&self) -> i64 {
        self.max
    }

    /// Roll the expression.
    pub fn roll(&self, rng: &mut StdRng) -> i64 {
        eval(&self.root, rng)
    }
}

impl FromStr for DiceExpr {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// Recursive-descent parser over the token stream.
struct Parser<'a> {
    source: &'a str,
    tokens: Vec<(Token, Range<usize>)>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).map(|(t, _)| *t)
    }

    fn peek_spanned(&self) -> Option<(Token, Range<usize>)> {
        self.tokens.get(self.pos).cloned()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn unexpected(&self, token: Token, span: Range<usize>) -> DiceError {
        DiceError::UnexpectedToken {
            expr: self.source.to_string(),
            found: token.to_string(),
            offset: span.start,
        }
    }

    fn error_here(&self) -> DiceError {
        match self.peek_spanned() {
            Some((token, span)) => self.unexpected(token, span),
            None => DiceError::UnexpectedEnd(self.source.to_string()),
        }
    }

    fn expr(&mut self) -> DiceResult<Node> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.term()?;
            lhs = Node::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn term(&mut self) -> DiceResult<Node> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.unary()?;
            lhs = Node::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn unary(&mut self) -> DiceResult<Node> {
        match self.peek() {
            Some(Token::Minus) => {
                self.advance();
                Ok(Node::Neg(Box::new(self.unary()?)))
            }
            Some(Token::Plus) => {
                self.advance();
                self.unary()
            }
            _ => self.atom(),
        }
    }

    fn atom(&mut self) -> DiceResult<Node> {
        match self.peek() {
            Some(Token::Number(n)) => {
                self.advance();
                if self.peek() == Some(Token::Die) {
                    self.dice(n)
                } else {
                    Ok(Node::Number(n))
                }
            }
            Some(Token::Die) => self.dice(1),
            Some(Token::LParen) => {
                self.advance();
                let inner = self.expr()?;
                match self.peek() {
                    Some(Token::RParen) => {
                        self.advance();
                        Ok(inner)
                    }
                    _ => Err(self.error_here()),
                }
            }
            _ => Err(self.error_here()),
        }
    }

    /// Parse `d<sides><modifier>?`; the count has already been consumed.
    fn dice(&mut self, count: i64) -> DiceResult<Node> {
        self.advance();
        let count = u32::try_from(count)
            .map_err(|_| DiceError::InvalidDie(format!("cannot roll {count} dice")))?;

        let die = match self.peek() {
            Some(Token::Number(sides)) => {
                self.advance();
                u32::try_from(sides)
                    .ok()
                    .and_then(Die::new)
                    .ok_or_else(|| DiceError::InvalidDie(format!("d{sides}")))?
            }
            Some(Token::Percent) => {
                self.advance();
                Die::PERCENTILE
            }
            _ => return Err(self.error_here()),
        };

        let keep = match self.peek() {
            Some(Token::KeepHighest) => {
                self.advance();
                Keep::Highest(self.keep_count()?)
            }
            Some(Token::KeepLowest) => {
                self.advance();
                Keep::Lowest(self.keep_count()?)
            }
            Some(Token::Total) => {
                self.advance();
                Keep::All
            }
            _ => Keep::All,
        };

        Ok(Node::Dice { count, die, keep })
    }

    fn keep_count(&mut self) -> DiceResult<u32> {
        match self.peek() {
            Some(Token::Number(n)) => {
                self.advance();
                u32::try_from(n)
                    .map_err(|_| DiceError::InvalidDie(format!("cannot keep {n} dice")))
            }
            _ => Ok(1),
        }
    }
}

fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

/// Exact `(min, max)` of a node.
fn bounds(node: &Node, source: &str) -> DiceResult<(i64, i64)> {
    let overflow = || DiceError::Overflow(source.to_string());
    match node {
        Node::Number(n) => Ok((*n, *n)),
        Node::Dice { count, die, keep } => {
            let n = i64::from(keep.kept_of(*count));
            let max = n
                .checked_mul(i64::from(die.sides()))
                .ok_or_else(overflow)?;
            Ok((n, max))
        }
        Node::Neg(inner) => {
            let (lo, hi) = bounds(inner, source)?;
            Ok((
                hi.checked_neg().ok_or_else(overflow)?,
                lo.checked_neg().ok_or_else(overflow)?,
            ))
        }
        Node::Binary { op, lhs, rhs } => {
            let (a_lo, a_hi) = bounds(lhs, source)?;
            let (b_lo, b_hi) = bounds(rhs, source)?;
            match op {
                BinaryOp::Add => Ok((
                    a_lo.checked_add(b_lo).ok_or_else(overflow)?,
                    a_hi.checked_add(b_hi).ok_or_else(overflow)?,
                )),
                BinaryOp::Sub => Ok((
                    a_lo.checked_sub(b_hi).ok_or_else(overflow)?,
                    a_hi.checked_sub(b_lo).ok_or_else(overflow)?,
                )),
                BinaryOp::Mul => {
                    let corners = [
                        a_lo.checked_mul(b_lo),
                        a_lo.checked_mul(b_hi),
                        a_hi.checked_mul(b_lo),
                        a_hi.checked_mul(b_hi),
                    ];
                    corner_range(&corners).ok_or_else(overflow)
                }
                BinaryOp::Div => {
                    if b_lo <= 0 && b_hi >= 0 {
                        return Err(DiceError::DivisionByZero(source.to_string()));
                    }
                    // i64::MIN / -1 is the only overflowing quotient.
                    let div = |a: i64, b: i64| a.checked_div(b).map(|_| floor_div(a, b));
                    let corners = [
                        div(a_lo, b_lo),
                        div(a_lo, b_hi),
                        div(a_hi, b_lo),
                        div(a_hi, b_hi),
                    ];
                    corner_range(&corners).ok_or_else(overflow)
                }
            }
        }
    }
}

fn corner_range(corners: &[Option<i64>; 4]) -> Option<(i64, i64)> {
    let mut lo = i64::MAX;
    let mut hi = i64::MIN;
    for corner in corners {
        let value = (*corner)?;
        lo = lo.min(value);
        hi = hi.max(value);
    }
    Some((lo, hi))
}

/// Roll a node. Only called on trees that passed `bounds`, so the
/// arithmetic stays inside the checked range.
fn eval(node: &Node, rng: &mut StdRng) -> i64 {
    match node {
        Node::Number(n) => *n,
        Node::Dice { count, die, keep } => {
            let roll = DiceRoll::roll(*count, *die, *keep, rng);
            i64::try_from(roll.total()).unwrap_or(i64::MAX)
        }
        Node::Neg(inner) => -eval(inner, rng),
        Node::Binary { op, lhs, rhs } => {
            let a = eval(lhs, rng);
            let b = eval(rhs, rng);
            match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => floor_div(a, b),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn range(source: &str) -> (i64, i64) {
        let expr = DiceExpr::parse(source).unwrap();
        (expr.min(), expr.max())
    }

    #[test]
    fn constant() {
        assert_eq!(range("7"), (7, 7));
        assert_eq!(range("-3"), (-3, -3));
    }

    #[test]
    fn simple_dice_ranges() {
        assert_eq!(range("d6"), (1, 6));
        assert_eq!(range("2d6"), (2, 12));
        assert_eq!(range("d%"), (1, 100));
        assert_eq!(range("D20"), (1, 20));
        assert_eq!(range("d100t"), (1, 100));
        assert_eq!(range("0d6"), (0, 0));
    }

    #[test]
    fn arithmetic_ranges() {
        assert_eq!(range("2d6+1"), (3, 13));
        assert_eq!(range("d6-1"), (0, 5));
        assert_eq!(range("d4*2"), (2, 8));
        assert_eq!(range("d6-d6"), (-5, 5));
        assert_eq!(range("-d6"), (-6, -1));
        assert_eq!(range("(d6+1)*2"), (4, 14));
        assert_eq!(range("1+2*3"), (7, 7));
    }

    #[test]
    fn floor_division() {
        assert_eq!(range("d6/2"), (0, 3));
        assert_eq!(range("-7/2"), (-4, -4));
        assert_eq!(range("7/-2"), (-4, -4));
        assert_eq!(range("6/3"), (2, 2));
    }

    #[test]
    fn keep_modifiers() {
        assert_eq!(range("4d6kh3"), (3, 18));
        assert_eq!(range("4d6h3"), (3, 18));
        assert_eq!(range("2d20l"), (1, 20));
        assert_eq!(range("2d6kl5"), (2, 12));
    }

    #[test]
    fn division_by_zero_rejected() {
        assert!(matches!(
            DiceExpr::parse("6/0"),
            Err(DiceError::DivisionByZero(_))
        ));
        assert!(matches!(
            DiceExpr::parse("6/(d6-3)"),
            Err(DiceError::DivisionByZero(_))
        ));
    }

    #[test]
    fn malformed_expressions() {
        assert!(matches!(DiceExpr::parse(""), Err(DiceError::Empty)));
        assert!(matches!(DiceExpr::parse("   "), Err(DiceError::Empty)));
        assert!(matches!(
            DiceExpr::parse("2d"),
            Err(DiceError::UnexpectedEnd(_))
        ));
        assert!(matches!(
            DiceExpr::parse("2d6)"),
            Err(DiceError::UnexpectedToken { offset: 3, .. })
        ));
        assert!(matches!(
            DiceExpr::parse("(2d6"),
            Err(DiceError::UnexpectedEnd(_))
        ));
        assert!(matches!(
            DiceExpr::parse("2++"),
            Err(DiceError::UnexpectedEnd(_))
        ));
        assert!(matches!(
            DiceExpr::parse("d0"),
            Err(DiceError::InvalidDie(_))
        ));
        assert!(matches!(
            DiceExpr::parse("treasure"),
            Err(DiceError::UnexpectedCharacter { .. })
        ));
    }

    #[test]
    fn overflow_rejected() {
        assert!(matches!(
            DiceExpr::parse("9223372036854775807+1"),
            Err(DiceError::Overflow(_))
        ));
    }

    #[test]
    fn display_uses_source() {
        let expr: DiceExpr = " 3d8+2 ".parse().unwrap();
        assert_eq!(expr.to_string(), "3d8+2");
    }

    #[test]
    fn roll_is_deterministic_with_seed() {
        let expr = DiceExpr::parse("3d20+d4").unwrap();
        let mut rng1 = StdRng::seed_from_u64(5);
        let mut rng2 = StdRng::seed_from_u64(5);
        for _ in 0..10 {
            assert_eq!(expr.roll(&mut rng1), expr.roll(&mut rng2));
        }
    }

    proptest! {
        #[test]
        fn rolls_stay_within_bounds(
            count in 0u32..6,
            sides in 1u32..30,
            modifier in -20i64..20,
            seed in any::<u64>(),
        ) {
            let source = format!("{count}d{sides}+{modifier}").replace("+-", "-");
            let expr = DiceExpr::parse(&source).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            for _ in 0..20 {
                let value = expr.roll(&mut rng);
                prop_assert!(value >= expr.min() && value <= expr.max(), "{source} rolled {value}");
            }
        }

        #[test]
        fn keep_rolls_stay_within_bounds(
            count in 1u32..8,
            keep in 1u32..8,
            seed in any::<u64>(),
        ) {
            let expr = DiceExpr::parse(&format!("{count}d6kh{keep}*2-d4")).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            let value = expr.roll(&mut rng);
            prop_assert!(value >= expr.min() && value <= expr.max());
        }
    }
}
