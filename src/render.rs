//! Visual parse-tree printer.
//!
//! Produces the nested branch rendering used for inspecting the AST: one line
//! per node, `|--` connectors for nodes with following siblings and `+--` for
//! the last sibling at each level. A per-depth bitmask tracks which ancestor
//! levels still have siblings to come and drives whether a `|` column or a
//! blank is drawn at that position. The traversal is read-only.

use crate::ast::{Block, Expr, Stmt, StmtKind};

/// Render the whole program under a root `BLOCK` line.
pub fn render(program: &Block) -> String {
  let mut out = String::new();
  render_block(&mut out, program, 0, true, 0);
  out
}

/// Draw the connector prefix for one line.
fn branch(out: &mut String, depth: usize, is_last: bool, mask: u32) {
  for i in 0..depth.saturating_sub(1) {
    if mask & (1 << i) != 0 {
      out.push_str("|   ");
    } else {
      out.push_str("    ");
    }
  }
  if depth > 0 {
    if is_last {
      out.push_str("+-- ");
    } else {
      out.push_str("|-- ");
    }
  }
}

fn child_mask(depth: usize, is_last: bool, mask: u32) -> u32 {
  if is_last { mask } else { mask | (1 << depth) }
}

fn render_block(out: &mut String, block: &Block, depth: usize, is_last: bool, mask: u32) {
  branch(out, depth, is_last, mask);
  out.push_str("BLOCK\n");

  let mask = child_mask(depth, is_last, mask);
  let mut current: Option<&Stmt> = block.head.as_deref();
  while let Some(stmt) = current {
    render_stmt(out, &stmt.kind, depth + 1, stmt.next.is_none(), mask);
    current = stmt.next.as_deref();
  }
}

fn render_stmt(out: &mut String, stmt: &StmtKind, depth: usize, is_last: bool, mask: u32) {
  match stmt {
    StmtKind::Decl { name, init } => {
      branch(out, depth, is_last, mask);
      out.push_str(&format!("DECL ({name})\n"));
      if let Some(expr) = init {
        render_expr(out, expr, depth + 1, true, child_mask(depth, is_last, mask));
      }
    }
    // a bare expression statement renders as the expression node itself
    StmtKind::Expr(expr) => render_expr(out, expr, depth, is_last, mask),
    StmtKind::Print(expr) => {
      branch(out, depth, is_last, mask);
      out.push_str("PRINT (Expr)\n");
      render_expr(out, expr, depth + 1, true, child_mask(depth, is_last, mask));
    }
    StmtKind::PrintString(literal) => {
      branch(out, depth, is_last, mask);
      out.push_str(&format!("PRINT (String): {literal}\n"));
    }
    StmtKind::If {
      cond,
      then_block,
      else_block,
    } => {
      branch(out, depth, is_last, mask);
      out.push_str("IF\n");
      let mask = child_mask(depth, is_last, mask);
      match else_block {
        Some(else_block) => {
          render_expr(out, cond, depth + 1, false, mask);
          render_block(out, then_block, depth + 1, false, mask);
          render_block(out, else_block, depth + 1, true, mask);
        }
        None => {
          render_expr(out, cond, depth + 1, false, mask);
          render_block(out, then_block, depth + 1, true, mask);
        }
      }
    }
  }
}

fn render_expr(out: &mut String, expr: &Expr, depth: usize, is_last: bool, mask: u32) {
  branch(out, depth, is_last, mask);
  match expr {
    Expr::Num { value } => out.push_str(&format!("NUM ({value})\n")),
    Expr::Var { name } => out.push_str(&format!("ID ({name})\n")),
    Expr::Neg { operand } => {
      out.push_str("OP (neg)\n");
      render_expr(out, operand, depth + 1, true, child_mask(depth, is_last, mask));
    }
    Expr::Binary { op, lhs, rhs } => {
      out.push_str(&format!("OP ({})\n", op.symbol()));
      let mask = child_mask(depth, is_last, mask);
      render_expr(out, lhs, depth + 1, false, mask);
      render_expr(out, rhs, depth + 1, true, mask);
    }
    Expr::Assign { name, value } => {
      out.push_str(&format!("ASSIGN (=) {name}\n"));
      render_expr(out, value, depth + 1, true, child_mask(depth, is_last, mask));
    }
  }
}
