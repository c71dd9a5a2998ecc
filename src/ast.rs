//! AST produced by the parser: expressions, statements and the statement chain.
//!
//! Statement sequencing lives in a singly linked chain (`Stmt::next`) rather
//! than inside the expression tree; a `Block` owns the head of one chain and
//! an empty block simply has no chain at all. `if`/`else` keeps its alternative
//! branch in an explicit optional field instead of borrowing the chain link.

/// Binary operators recognised by the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  Div,
  Eq,
  Ne,
  Lt,
  Le,
  Gt,
  Ge,
}

impl BinaryOp {
  /// The operator's C spelling, shared by the renderer and the generator.
  pub fn symbol(self) -> &'static str {
    match self {
      BinaryOp::Add => "+",
      BinaryOp::Sub => "-",
      BinaryOp::Mul => "*",
      BinaryOp::Div => "/",
      BinaryOp::Eq => "==",
      BinaryOp::Ne => "!=",
      BinaryOp::Lt => "<",
      BinaryOp::Le => "<=",
      BinaryOp::Gt => ">",
      BinaryOp::Ge => ">=",
    }
  }
}

/// Expression tree produced by the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
  Num {
    value: i64,
  },
  Var {
    name: String,
  },
  Neg {
    operand: Box<Expr>,
  },
  Binary {
    op: BinaryOp,
    lhs: Box<Expr>,
    rhs: Box<Expr>,
  },
  Assign {
    name: String,
    value: Box<Expr>,
  },
}

impl Expr {
  pub fn number(value: i64) -> Self {
    Self::Num { value }
  }

  pub fn var(name: impl Into<String>) -> Self {
    Self::Var { name: name.into() }
  }

  pub fn unary_neg(operand: Expr) -> Self {
    Self::Neg {
      operand: Box::new(operand),
    }
  }

  pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
    Self::Binary {
      op,
      lhs: Box::new(lhs),
      rhs: Box::new(rhs),
    }
  }

  pub fn assign(name: impl Into<String>, value: Expr) -> Self {
    Self::Assign {
      name: name.into(),
      value: Box::new(value),
    }
  }
}

/// Statement kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
  /// `int x;` or `int x = expr;`
  Decl { name: String, init: Option<Expr> },
  /// Bare expression statement. Legal but inert unless it assigns.
  Expr(Expr),
  /// `print(expr);`
  Print(Expr),
  /// `print("...");` – the payload is the literal verbatim, quotes included.
  PrintString(String),
  /// `if (cond) { ... }` with an optional `else { ... }`.
  If {
    cond: Expr,
    then_block: Block,
    else_block: Option<Block>,
  },
}

/// One link of the statement chain. Each statement owns its successor, so the
/// chain's traversal order is exactly source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
  pub kind: StmtKind,
  pub next: Option<Box<Stmt>>,
}

/// A `{ ... }` body, or the whole program at top level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
  pub head: Option<Box<Stmt>>,
}

impl Block {
  pub fn is_empty(&self) -> bool {
    self.head.is_none()
  }

  /// Iterate statements in source order.
  pub fn iter(&self) -> StmtIter<'_> {
    StmtIter {
      current: self.head.as_deref(),
    }
  }
}

pub struct StmtIter<'a> {
  current: Option<&'a Stmt>,
}

impl<'a> Iterator for StmtIter<'a> {
  type Item = &'a StmtKind;

  fn next(&mut self) -> Option<Self::Item> {
    let stmt = self.current?;
    self.current = stmt.next.as_deref();
    Some(&stmt.kind)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn chain(kinds: Vec<StmtKind>) -> Block {
    let mut head = None;
    for kind in kinds.into_iter().rev() {
      head = Some(Box::new(Stmt { kind, next: head }));
    }
    Block { head }
  }

  #[test]
  fn iteration_follows_the_chain() {
    let block = chain(vec![
      StmtKind::Expr(Expr::number(1)),
      StmtKind::Expr(Expr::number(2)),
      StmtKind::Expr(Expr::number(3)),
    ]);
    let values: Vec<i64> = block
      .iter()
      .map(|kind| match kind {
        StmtKind::Expr(Expr::Num { value }) => *value,
        other => panic!("unexpected statement {other:?}"),
      })
      .collect();
    assert_eq!(values, [1, 2, 3]);
  }

  #[test]
  fn empty_block_has_no_chain() {
    let block = Block::default();
    assert!(block.is_empty());
    assert_eq!(block.iter().count(), 0);
  }

  #[test]
  fn operator_symbols_match_c() {
    assert_eq!(BinaryOp::Add.symbol(), "+");
    assert_eq!(BinaryOp::Ne.symbol(), "!=");
    assert_eq!(BinaryOp::Le.symbol(), "<=");
  }
}
