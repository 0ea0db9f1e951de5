//! Restricted arithmetic expressions over a point vector.
//!
//! Objective and constraint expressions arrive as text from the caller. They are parsed into a
//! small closed AST (numbers, `x[i]`, `+ - * / ^`, a fixed set of constants and functions) and
//! evaluated by a pure tree walk; nothing else is accepted.
//!
//! ```text
//! expr  := term (('+' | '-') term)*
//! term  := unary (('*' | '/') unary)*
//! unary := '-' unary | power
//! power := atom (('^' | '**') unary)?
//! atom  := NUMBER | 'x' '[' INTEGER ']' | CONST | FUNC '(' args ')' | '(' expr ')'
//! ```

use std::f64::consts::{E, PI};
use std::fmt;

use crate::error::{AlgoError, AlgoResult};

/// Longest accepted source text, in characters.
pub const MAX_SOURCE_LEN: usize = 1024;
/// Deepest accepted nesting of unary operators, parentheses and calls.
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq)]
enum Token {
  Num(f64),
  Ident(String),
  LParen,
  RParen,
  LBracket,
  RBracket,
  Comma,
  Plus,
  Minus,
  Star,
  Slash,
  Caret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
  Add,
  Sub,
  Mul,
  Div,
  Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Func {
  Sqrt,
  Exp,
  Ln,
  Sin,
  Cos,
  Tan,
  Abs,
  Min,
  Max,
  Pow,
}

impl Func {
  fn lookup(name: &str) -> Option<Self> {
    Some(match name {
      "sqrt" => Func::Sqrt,
      "exp" => Func::Exp,
      "ln" | "log" => Func::Ln,
      "sin" => Func::Sin,
      "cos" => Func::Cos,
      "tan" => Func::Tan,
      "abs" => Func::Abs,
      "min" => Func::Min,
      "max" => Func::Max,
      "pow" => Func::Pow,
      _ => return None,
    })
  }

  fn arity_ok(self, n: usize) -> bool {
    match self {
      Func::Min | Func::Max => n >= 1,
      Func::Pow => n == 2,
      _ => n == 1,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
enum Ast {
  Num(f64),
  Var(usize),
  Neg(Box<Ast>),
  Bin(BinOp, Box<Ast>, Box<Ast>),
  Call(Func, Vec<Ast>),
  /// Flat n-ary sum; keeps wide generated objectives shallow.
  Sum(Vec<Ast>),
}

impl Ast {
  fn eval(&self, x: &[f64]) -> f64 {
    match self {
      Ast::Num(v) => *v,
      Ast::Var(i) => x.get(*i).copied().unwrap_or(f64::NAN),
      Ast::Neg(a) => -a.eval(x),
      Ast::Bin(op, a, b) => {
        let (a, b) = (a.eval(x), b.eval(x));
        match op {
          BinOp::Add => a + b,
          BinOp::Sub => a - b,
          BinOp::Mul => a * b,
          BinOp::Div => a / b,
          BinOp::Pow => a.powf(b),
        }
      }
      Ast::Sum(terms) => terms.iter().map(|t| t.eval(x)).sum(),
      Ast::Call(f, args) => {
        let mut vals = args.iter().map(|a| a.eval(x));
        match f {
          Func::Min => vals.fold(f64::INFINITY, f64::min),
          Func::Max => vals.fold(f64::NEG_INFINITY, f64::max),
          Func::Pow => {
            let base = vals.next().unwrap_or(f64::NAN);
            base.powf(vals.next().unwrap_or(f64::NAN))
          }
          _ => {
            let v = vals.next().unwrap_or(f64::NAN);
            match f {
              Func::Sqrt => v.sqrt(),
              Func::Exp => v.exp(),
              Func::Ln => v.ln(),
              Func::Sin => v.sin(),
              Func::Cos => v.cos(),
              Func::Tan => v.tan(),
              _ => v.abs(),
            }
          }
        }
      }
    }
  }
}

/// A parsed expression bound to a point dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
  source: String,
  dim: usize,
  root: Ast,
}

impl Expr {
  /// Parses `source`, rejecting anything outside the grammar and any `x[i]` with `i >= dim`.
  pub fn parse(source: &str, dim: usize) -> AlgoResult<Self> {
    if source.chars().count() > MAX_SOURCE_LEN {
      return Err(AlgoError::invalid(format!(
        "expression longer than {MAX_SOURCE_LEN} characters"
      )));
    }
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
      return Err(AlgoError::invalid("empty expression"));
    }
    let mut p = Parser {
      tokens,
      pos: 0,
      depth: 0,
      dim,
    };
    let root = p.expr()?;
    if let Some(t) = p.tokens.get(p.pos) {
      return Err(AlgoError::invalid(format!(
        "unexpected {t:?} in '{source}'"
      )));
    }
    Ok(Self {
      source: source.to_string(),
      dim,
      root,
    })
  }

  /// `x[0]^2 + ... + x[dim-1]^2`, built as one flat sum so any dimension evaluates and drops
  /// without deep recursion.
  pub fn sum_of_squares(dim: usize) -> Self {
    let root = Ast::Sum(
      (0..dim)
        .map(|i| {
          Ast::Bin(
            BinOp::Pow,
            Box::new(Ast::Var(i)),
            Box::new(Ast::Num(2.0)),
          )
        })
        .collect(),
    );
    let source = if dim == 0 {
      "0".to_string()
    } else {
      (0..dim)
        .map(|i| format!("x[{i}]^2"))
        .collect::<Vec<_>>()
        .join(" + ")
    };
    Self { source, dim, root }
  }

  /// Value at `point`. Indices beyond `point` evaluate to NaN.
  pub fn eval(&self, point: &[f64]) -> f64 {
    self.root.eval(point)
  }

  pub fn source(&self) -> &str {
    &self.source
  }

  pub fn dim(&self) -> usize {
    self.dim
  }
}

impl fmt::Display for Expr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.source)
  }
}

fn tokenize(src: &str) -> AlgoResult<Vec<Token>> {
  let chars: Vec<char> = src.chars().collect();
  let mut out = Vec::new();
  let mut i = 0;
  while i < chars.len() {
    let c = chars[i];
    match c {
      c if c.is_whitespace() => i += 1,
      '0'..='9' | '.' => {
        let start = i;
        while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
          i += 1;
        }
        if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
          let mut j = i + 1;
          if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
          }
          if j < chars.len() && chars[j].is_ascii_digit() {
            i = j;
            while i < chars.len() && chars[i].is_ascii_digit() {
              i += 1;
            }
          }
        }
        let text: String = chars[start..i].iter().collect();
        let v: f64 = text
          .parse()
          .map_err(|_| AlgoError::invalid(format!("bad number '{text}'")))?;
        out.push(Token::Num(v));
      }
      c if c.is_ascii_alphabetic() || c == '_' => {
        let start = i;
        while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
          i += 1;
        }
        out.push(Token::Ident(chars[start..i].iter().collect()));
      }
      '*' if chars.get(i + 1) == Some(&'*') => {
        out.push(Token::Caret);
        i += 2;
      }
      _ => {
        out.push(match c {
          '(' => Token::LParen,
          ')' => Token::RParen,
          '[' => Token::LBracket,
          ']' => Token::RBracket,
          ',' => Token::Comma,
          '+' => Token::Plus,
          '-' => Token::Minus,
          '*' => Token::Star,
          '/' => Token::Slash,
          '^' => Token::Caret,
          _ => {
            return Err(AlgoError::invalid(format!(
              "unexpected character '{c}' at position {i}"
            )));
          }
        });
        i += 1;
      }
    }
  }
  Ok(out)
}

struct Parser {
  tokens: Vec<Token>,
  pos: usize,
  depth: usize,
  dim: usize,
}

impl Parser {
  fn peek(&self) -> Option<&Token> {
    self.tokens.get(self.pos)
  }

  fn next(&mut self) -> Option<Token> {
    let t = self.tokens.get(self.pos).cloned();
    self.pos += 1;
    t
  }

  fn expect(&mut self, want: Token) -> AlgoResult<()> {
    match self.next() {
      Some(t) if t == want => Ok(()),
      Some(t) => Err(AlgoError::invalid(format!("expected {want:?}, found {t:?}"))),
      None => Err(AlgoError::invalid(format!(
        "expected {want:?}, found end of input"
      ))),
    }
  }

  fn expr(&mut self) -> AlgoResult<Ast> {
    let mut lhs = self.term()?;
    loop {
      let op = match self.peek() {
        Some(Token::Plus) => BinOp::Add,
        Some(Token::Minus) => BinOp::Sub,
        _ => break,
      };
      self.pos += 1;
      let rhs = self.term()?;
      lhs = Ast::Bin(op, Box::new(lhs), Box::new(rhs));
    }
    Ok(lhs)
  }

  fn term(&mut self) -> AlgoResult<Ast> {
    let mut lhs = self.unary()?;
    loop {
      let op = match self.peek() {
        Some(Token::Star) => BinOp::Mul,
        Some(Token::Slash) => BinOp::Div,
        _ => break,
      };
      self.pos += 1;
      let rhs = self.unary()?;
      lhs = Ast::Bin(op, Box::new(lhs), Box::new(rhs));
    }
    Ok(lhs)
  }

  fn unary(&mut self) -> AlgoResult<Ast> {
    self.depth += 1;
    if self.depth > MAX_DEPTH {
      return Err(AlgoError::invalid(format!(
        "expression nested deeper than {MAX_DEPTH}"
      )));
    }
    let out = if self.peek() == Some(&Token::Minus) {
      self.pos += 1;
      self.unary().map(|a| Ast::Neg(Box::new(a)))
    } else {
      self.power()
    };
    self.depth -= 1;
    out
  }

  fn power(&mut self) -> AlgoResult<Ast> {
    let base = self.atom()?;
    if self.peek() == Some(&Token::Caret) {
      self.pos += 1;
      let exp = self.unary()?;
      return Ok(Ast::Bin(BinOp::Pow, Box::new(base), Box::new(exp)));
    }
    Ok(base)
  }

  fn atom(&mut self) -> AlgoResult<Ast> {
    match self.next() {
      Some(Token::Num(v)) => Ok(Ast::Num(v)),
      Some(Token::LParen) => {
        let inner = self.expr()?;
        self.expect(Token::RParen)?;
        Ok(inner)
      }
      Some(Token::Ident(name)) => self.ident(&name),
      Some(t) => Err(AlgoError::invalid(format!("unexpected {t:?}"))),
      None => Err(AlgoError::invalid("unexpected end of expression")),
    }
  }

  fn ident(&mut self, name: &str) -> AlgoResult<Ast> {
    match name {
      "x" => {
        self.expect(Token::LBracket)?;
        let idx = match self.next() {
          Some(Token::Num(v)) if v >= 0.0 && v.fract() == 0.0 => v as usize,
          other => {
            return Err(AlgoError::invalid(format!(
              "x[...] needs a non-negative integer index, found {other:?}"
            )));
          }
        };
        self.expect(Token::RBracket)?;
        if idx >= self.dim {
          return Err(AlgoError::invalid(format!(
            "x[{idx}] is out of range for a {}-dimensional point",
            self.dim
          )));
        }
        Ok(Ast::Var(idx))
      }
      "pi" => Ok(Ast::Num(PI)),
      "e" => Ok(Ast::Num(E)),
      _ => {
        let func = Func::lookup(name)
          .ok_or_else(|| AlgoError::invalid(format!("unknown name '{name}'")))?;
        self.expect(Token::LParen)?;
        let mut args = Vec::new();
        if self.peek() != Some(&Token::RParen) {
          loop {
            args.push(self.expr()?);
            if self.peek() == Some(&Token::Comma) {
              self.pos += 1;
            } else {
              break;
            }
          }
        }
        self.expect(Token::RParen)?;
        if !func.arity_ok(args.len()) {
          return Err(AlgoError::invalid(format!(
            "{name} does not take {} argument(s)",
            args.len()
          )));
        }
        Ok(Ast::Call(func, args))
      }
    }
  }
}
