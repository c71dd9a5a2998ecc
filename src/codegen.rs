//! Code generation: lower the AST into C source text.
//!
//! The emitter is a straight tree walk over the finished AST. Expressions are
//! emitted fully parenthesized so operator precedence in the generated code
//! can never disagree with the parsed tree, and statement indentation tracks
//! block nesting depth purely for readability.

use crate::ast::{Block, Expr, StmtKind};

const INDENT: &str = "    ";

/// Emit a complete C compilation unit for the program.
pub fn generate(program: &Block) -> String {
  let mut out = String::new();
  out.push_str("#include <stdio.h>\n#include <stdlib.h>\n\nint main() {\n");
  emit_block(&mut out, program, 1);
  out.push_str("    return 0;\n}\n");
  out
}

/// Walk a statement chain, emitting each statement at the given depth.
fn emit_block(out: &mut String, block: &Block, indent: usize) {
  for stmt in block.iter() {
    emit_stmt(out, stmt, indent);
  }
}

fn emit_stmt(out: &mut String, stmt: &StmtKind, indent: usize) {
  pad(out, indent);
  match stmt {
    StmtKind::Decl { name, init } => {
      out.push_str(&format!("int {name}"));
      if let Some(expr) = init {
        out.push_str(" = ");
        emit_expr(out, expr);
      }
      out.push_str(";\n");
    }
    StmtKind::Expr(expr) => {
      // evaluated and discarded; only assignments have an effect
      emit_expr(out, expr);
      out.push_str(";\n");
    }
    StmtKind::Print(expr) => {
      out.push_str("printf(\"%d\\n\", ");
      emit_expr(out, expr);
      out.push_str(");\n");
    }
    StmtKind::PrintString(literal) => {
      // the payload still carries its own quotes
      out.push_str(&format!("printf(\"%s\\n\", {literal});\n"));
    }
    StmtKind::If {
      cond,
      then_block,
      else_block,
    } => {
      out.push_str("if (");
      emit_expr(out, cond);
      out.push_str(") {\n");
      emit_block(out, then_block, indent + 1);
      pad(out, indent);
      out.push('}');
      match else_block {
        Some(block) => {
          out.push_str(" else {\n");
          emit_block(out, block, indent + 1);
          pad(out, indent);
          out.push_str("}\n");
        }
        None => out.push('\n'),
      }
    }
  }
}

fn emit_expr(out: &mut String, expr: &Expr) {
  match expr {
    Expr::Num { value } => out.push_str(&format!("{value}")),
    Expr::Var { name } => out.push_str(name),
    Expr::Neg { operand } => {
      out.push_str("(-");
      emit_expr(out, operand);
      out.push(')');
    }
    Expr::Binary { op, lhs, rhs } => {
      out.push('(');
      emit_expr(out, lhs);
      out.push_str(&format!(" {} ", op.symbol()));
      emit_expr(out, rhs);
      out.push(')');
    }
    Expr::Assign { name, value } => {
      out.push_str(&format!("({name} = "));
      emit_expr(out, value);
      out.push(')');
    }
  }
}

fn pad(out: &mut String, indent: usize) {
  for _ in 0..indent {
    out.push_str(INDENT);
  }
}
