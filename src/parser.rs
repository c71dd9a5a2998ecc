//! Recursive-descent parser producing the statement chain and expression AST.
//!
//! The parser keeps a precedence-climbing set of expression helpers and a thin
//! statement layer above them, so sequencing lives outside the expression
//! tree. Declaration checking is not a separate pass: the symbol table is
//! updated and consulted as each construct is recognised, and the first
//! violation aborts the parse.

use crate::ast::{BinaryOp, Block, Expr, Stmt, StmtKind};
use crate::error::{CompileError, CompileResult};
use crate::symtab::SymbolTable;
use crate::tokenizer::{Token, TokenKind, describe_token, token_text};

/// Where a statement chain ends: the whole program runs to end of input,
/// a block body runs to its closing brace.
#[derive(Clone, Copy)]
enum ChainEnd {
  Eof,
  Brace,
}

/// Parse a whole program from the token stream.
///
/// `symbols` is mutated as declarations are recognised and consulted on every
/// identifier reference; pass a fresh table per run.
pub fn parse(
  tokens: Vec<Token>,
  source: &str,
  symbols: &mut SymbolTable,
) -> CompileResult<Block> {
  let mut stream = TokenStream::new(tokens, source);
  let head = parse_stmt_chain(&mut stream, symbols, ChainEnd::Eof)?;
  Ok(Block { head })
}

/// Build the linked statement chain in source order. An empty sequence is an
/// absent chain, not a zero-length list.
fn parse_stmt_chain(
  stream: &mut TokenStream,
  symbols: &mut SymbolTable,
  end: ChainEnd,
) -> CompileResult<Option<Box<Stmt>>> {
  let done = match end {
    ChainEnd::Eof => stream.is_eof(),
    ChainEnd::Brace => stream.at("}") || stream.is_eof(),
  };
  if done {
    return Ok(None);
  }

  let kind = parse_stmt(stream, symbols)?;
  let next = parse_stmt_chain(stream, symbols, end)?;
  Ok(Some(Box::new(Stmt { kind, next })))
}

fn parse_stmt(stream: &mut TokenStream, symbols: &mut SymbolTable) -> CompileResult<StmtKind> {
  if stream.equal_keyword("int") {
    let name = stream.get_ident()?;
    let init = if stream.equal("=") {
      Some(parse_expr(stream, symbols)?)
    } else {
      None
    };
    stream.skip(";")?;
    // the initializer is checked first, so `int x = x;` is use-before-declare
    symbols.declare(&name)?;
    return Ok(StmtKind::Decl { name, init });
  }

  if stream.equal_keyword("print") {
    stream.skip("(")?;
    if let Some(literal) = stream.get_string() {
      stream.skip(")")?;
      stream.skip(";")?;
      return Ok(StmtKind::PrintString(literal));
    }
    let expr = parse_expr(stream, symbols)?;
    stream.skip(")")?;
    stream.skip(";")?;
    return Ok(StmtKind::Print(expr));
  }

  if stream.equal_keyword("if") {
    stream.skip("(")?;
    let cond = parse_expr(stream, symbols)?;
    stream.skip(")")?;
    let then_block = parse_block(stream, symbols)?;
    let else_block = if stream.equal_keyword("else") {
      Some(parse_block(stream, symbols)?)
    } else {
      None
    };
    return Ok(StmtKind::If {
      cond,
      then_block,
      else_block,
    });
  }

  // bare expression statement; legal even when it has no effect
  let expr = parse_expr(stream, symbols)?;
  stream.skip(";")?;
  Ok(StmtKind::Expr(expr))
}

fn parse_block(stream: &mut TokenStream, symbols: &mut SymbolTable) -> CompileResult<Block> {
  stream.skip("{")?;
  let head = parse_stmt_chain(stream, symbols, ChainEnd::Brace)?;
  stream.skip("}")?;
  Ok(Block { head })
}

fn parse_expr(stream: &mut TokenStream, symbols: &mut SymbolTable) -> CompileResult<Expr> {
  parse_assign(stream, symbols)
}

fn parse_assign(stream: &mut TokenStream, symbols: &mut SymbolTable) -> CompileResult<Expr> {
  let target_loc = stream.loc();
  let node = parse_equality(stream, symbols)?;

  if stream.equal("=") {
    let Expr::Var { name } = node else {
      return Err(CompileError::at(
        stream.source,
        target_loc,
        "assignment target is not an lvalue",
      ));
    };
    // the target was already validated against the table by `parse_primary`
    let value = parse_assign(stream, symbols)?;
    return Ok(Expr::assign(name, value));
  }

  Ok(node)
}

fn parse_equality(stream: &mut TokenStream, symbols: &mut SymbolTable) -> CompileResult<Expr> {
  let mut node = parse_relational(stream, symbols)?;

  loop {
    let op = match stream.peek_punctuator() {
      Some("==") => BinaryOp::Eq,
      Some("!=") => BinaryOp::Ne,
      _ => break,
    };

    stream.skip(op.symbol())?;
    let rhs = parse_relational(stream, symbols)?;
    node = Expr::binary(op, node, rhs);
  }

  Ok(node)
}

fn parse_relational(stream: &mut TokenStream, symbols: &mut SymbolTable) -> CompileResult<Expr> {
  let mut node = parse_add(stream, symbols)?;

  loop {
    let op = match stream.peek_punctuator() {
      Some("<") => BinaryOp::Lt,
      Some("<=") => BinaryOp::Le,
      Some(">") => BinaryOp::Gt,
      Some(">=") => BinaryOp::Ge,
      _ => break,
    };

    stream.skip(op.symbol())?;
    let rhs = parse_add(stream, symbols)?;
    node = Expr::binary(op, node, rhs);
  }

  Ok(node)
}

fn parse_add(stream: &mut TokenStream, symbols: &mut SymbolTable) -> CompileResult<Expr> {
  let mut node = parse_mul(stream, symbols)?;

  loop {
    let op = match stream.peek_punctuator() {
      Some("+") => BinaryOp::Add,
      Some("-") => BinaryOp::Sub,
      _ => break,
    };

    stream.skip(op.symbol())?;
    let rhs = parse_mul(stream, symbols)?;
    node = Expr::binary(op, node, rhs);
  }

  Ok(node)
}

fn parse_mul(stream: &mut TokenStream, symbols: &mut SymbolTable) -> CompileResult<Expr> {
  let mut node = parse_unary(stream, symbols)?;

  loop {
    let op = match stream.peek_punctuator() {
      Some("*") => BinaryOp::Mul,
      Some("/") => BinaryOp::Div,
      _ => break,
    };

    stream.skip(op.symbol())?;
    let rhs = parse_unary(stream, symbols)?;
    node = Expr::binary(op, node, rhs);
  }

  Ok(node)
}

fn parse_unary(stream: &mut TokenStream, symbols: &mut SymbolTable) -> CompileResult<Expr> {
  if stream.equal("+") {
    return parse_unary(stream, symbols);
  }

  if stream.equal("-") {
    let operand = parse_unary(stream, symbols)?;
    return Ok(Expr::unary_neg(operand));
  }

  parse_primary(stream, symbols)
}

fn parse_primary(stream: &mut TokenStream, symbols: &mut SymbolTable) -> CompileResult<Expr> {
  if stream.equal("(") {
    let node = parse_expr(stream, symbols)?;
    stream.skip(")")?;
    return Ok(node);
  }

  if matches!(
    stream.peek().map(|token| token.kind),
    Some(TokenKind::Ident)
  ) {
    let name = stream.get_ident()?;
    symbols.require_declared(&name)?;
    return Ok(Expr::var(name));
  }

  let value = stream.get_number()?;
  Ok(Expr::number(value))
}

/// Lightweight cursor over the token vector.
struct TokenStream<'a> {
  tokens: Vec<Token>,
  source: &'a str,
  pos: usize,
}

impl<'a> TokenStream<'a> {
  /// Take ownership of the token stream; the parser advances `pos` as it consumes input.
  fn new(tokens: Vec<Token>, source: &'a str) -> Self {
    Self {
      tokens,
      source,
      pos: 0,
    }
  }

  fn peek(&self) -> Option<&Token> {
    self.tokens.get(self.pos)
  }

  /// Byte offset of the current token, for anchoring diagnostics.
  fn loc(&self) -> usize {
    self
      .peek()
      .map(|token| token.loc)
      .unwrap_or(self.source.len())
  }

  /// Text of the current token if it is a punctuator, without consuming it.
  fn peek_punctuator(&self) -> Option<&str> {
    self
      .peek()
      .filter(|token| token.kind == TokenKind::Punctuator)
      .map(|token| token_text(token, self.source))
  }

  /// Whether the current token is the given punctuator, without consuming it.
  fn at(&self, op: &str) -> bool {
    self.peek_punctuator() == Some(op)
  }

  /// Consume the current token if it matches the provided punctuator.
  fn equal(&mut self, op: &str) -> bool {
    if self.at(op) {
      self.pos += 1;
      return true;
    }
    false
  }

  /// Consume the current token if it is the given keyword.
  fn equal_keyword(&mut self, keyword: &str) -> bool {
    if let Some(token) = self.peek()
      && token.kind == TokenKind::Keyword
      && token_text(token, self.source) == keyword
    {
      self.pos += 1;
      return true;
    }
    false
  }

  fn skip(&mut self, s: &str) -> CompileResult<()> {
    if self.equal(s) {
      Ok(())
    } else {
      let (loc, got) = match self.tokens.get(self.pos) {
        Some(token) => (token.loc, describe_token(Some(token), self.source)),
        None => (self.source.len(), "EOF".to_string()),
      };
      Err(CompileError::at(
        self.source,
        loc,
        format!("expected \"{s}\", but got \"{got}\""),
      ))
    }
  }

  /// Parse the current token as an integer literal.
  fn get_number(&mut self) -> CompileResult<i64> {
    if let Some(token) = self.tokens.get(self.pos)
      && token.kind == TokenKind::Num
    {
      let value = token.value.ok_or_else(|| {
        CompileError::at(
          self.source,
          token.loc,
          "internal error: numeric token missing value",
        )
      })?;
      self.pos += 1;
      return Ok(value);
    }

    let token = self.tokens.get(self.pos);
    let loc = token.map(|t| t.loc).unwrap_or(self.source.len());
    let got = describe_token(token, self.source);
    Err(CompileError::at(
      self.source,
      loc,
      format!("expected an expression, but got \"{got}\""),
    ))
  }

  /// Parse the current token as an identifier.
  fn get_ident(&mut self) -> CompileResult<String> {
    if let Some(token) = self.tokens.get(self.pos)
      && token.kind == TokenKind::Ident
    {
      let name = token_text(token, self.source).to_string();
      self.pos += 1;
      return Ok(name);
    }

    let token = self.tokens.get(self.pos);
    let loc = token.map(|t| t.loc).unwrap_or(self.source.len());
    let got = describe_token(token, self.source);
    Err(CompileError::at(
      self.source,
      loc,
      format!("expected an identifier, but got \"{got}\""),
    ))
  }

  /// Consume the current token if it is a string literal, returning the
  /// literal verbatim, quotes included.
  fn get_string(&mut self) -> Option<String> {
    if let Some(token) = self.peek()
      && token.kind == TokenKind::Str
    {
      let literal = token_text(token, self.source).to_string();
      self.pos += 1;
      return Some(literal);
    }
    None
  }

  fn is_eof(&self) -> bool {
    matches!(self.peek().map(|token| token.kind), Some(TokenKind::Eof))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::tokenizer::tokenize;

  fn parse_source(source: &str) -> CompileResult<Block> {
    let tokens = tokenize(source)?;
    let mut symbols = SymbolTable::new();
    parse(tokens, source, &mut symbols)
  }

  fn stmts(block: &Block) -> Vec<&StmtKind> {
    block.iter().collect()
  }

  #[test]
  fn declaration_then_print() {
    let block = parse_source("int x = 5; print(x);").unwrap();
    let kinds = stmts(&block);
    assert_eq!(kinds.len(), 2);
    assert_eq!(
      *kinds[0],
      StmtKind::Decl {
        name: "x".into(),
        init: Some(Expr::number(5)),
      }
    );
    assert_eq!(*kinds[1], StmtKind::Print(Expr::var("x")));
  }

  #[test]
  fn declaration_without_initializer() {
    let block = parse_source("int x;").unwrap();
    assert_eq!(
      *stmts(&block)[0],
      StmtKind::Decl {
        name: "x".into(),
        init: None,
      }
    );
  }

  #[test]
  fn duplicate_declaration_is_fatal() {
    let err = parse_source("int x; int x;").unwrap_err();
    assert!(matches!(err, CompileError::DuplicateDeclaration { name } if name == "x"));
  }

  #[test]
  fn duplicates_are_caught_across_intervening_statements() {
    let err = parse_source("int x; int y; x = 1; int x;").unwrap_err();
    assert!(matches!(err, CompileError::DuplicateDeclaration { name } if name == "x"));
  }

  #[test]
  fn use_before_declaration_as_assignment_target() {
    let err = parse_source("y = 1;").unwrap_err();
    assert!(matches!(err, CompileError::UseBeforeDeclaration { name } if name == "y"));
  }

  #[test]
  fn use_before_declaration_as_operand() {
    let err = parse_source("int x = y + 1;").unwrap_err();
    assert!(matches!(err, CompileError::UseBeforeDeclaration { name } if name == "y"));
  }

  #[test]
  fn initializer_cannot_reference_its_own_declaration() {
    let err = parse_source("int x = x;").unwrap_err();
    assert!(matches!(err, CompileError::UseBeforeDeclaration { name } if name == "x"));
  }

  #[test]
  fn multiplication_binds_tighter_than_addition() {
    let block = parse_source("int n = 2 + 3 * 4;").unwrap();
    let StmtKind::Decl { init: Some(expr), .. } = stmts(&block)[0] else {
      panic!("expected a declaration");
    };
    assert_eq!(
      *expr,
      Expr::binary(
        BinaryOp::Add,
        Expr::number(2),
        Expr::binary(BinaryOp::Mul, Expr::number(3), Expr::number(4)),
      )
    );
  }

  #[test]
  fn comparison_binds_looser_than_addition() {
    let block = parse_source("int a; 1 + 2 < 3 == 4;").unwrap();
    let StmtKind::Expr(expr) = stmts(&block)[1] else {
      panic!("expected an expression statement");
    };
    assert_eq!(
      *expr,
      Expr::binary(
        BinaryOp::Eq,
        Expr::binary(
          BinaryOp::Lt,
          Expr::binary(BinaryOp::Add, Expr::number(1), Expr::number(2)),
          Expr::number(3),
        ),
        Expr::number(4),
      )
    );
  }

  #[test]
  fn assignment_is_right_associative() {
    let block = parse_source("int a; int b; a = b = 1;").unwrap();
    let StmtKind::Expr(expr) = stmts(&block)[2] else {
      panic!("expected an expression statement");
    };
    assert_eq!(*expr, Expr::assign("a", Expr::assign("b", Expr::number(1))));
  }

  #[test]
  fn unary_minus_binds_tighter_than_binary() {
    let block = parse_source("int n = -2 + 3;").unwrap();
    let StmtKind::Decl { init: Some(expr), .. } = stmts(&block)[0] else {
      panic!("expected a declaration");
    };
    assert_eq!(
      *expr,
      Expr::binary(
        BinaryOp::Add,
        Expr::unary_neg(Expr::number(2)),
        Expr::number(3),
      )
    );
  }

  #[test]
  fn parentheses_override_precedence() {
    let block = parse_source("int n = (2 + 3) * 4;").unwrap();
    let StmtKind::Decl { init: Some(expr), .. } = stmts(&block)[0] else {
      panic!("expected a declaration");
    };
    assert_eq!(
      *expr,
      Expr::binary(
        BinaryOp::Mul,
        Expr::binary(BinaryOp::Add, Expr::number(2), Expr::number(3)),
        Expr::number(4),
      )
    );
  }

  #[test]
  fn if_without_else() {
    let block = parse_source("int a = 1; if (a > 0) { print(a); }").unwrap();
    let StmtKind::If {
      cond,
      then_block,
      else_block,
    } = stmts(&block)[1]
    else {
      panic!("expected an if statement");
    };
    assert_eq!(
      *cond,
      Expr::binary(BinaryOp::Gt, Expr::var("a"), Expr::number(0))
    );
    assert_eq!(then_block.iter().count(), 1);
    assert!(else_block.is_none());
  }

  #[test]
  fn if_with_else() {
    let block =
      parse_source("int a = 3; if (a > 2) { print(a); } else { print(0); }").unwrap();
    let StmtKind::If { else_block, .. } = stmts(&block)[1] else {
      panic!("expected an if statement");
    };
    let else_block = else_block.as_ref().unwrap();
    assert_eq!(*else_block.iter().next().unwrap(), StmtKind::Print(Expr::number(0)));
  }

  #[test]
  fn blocks_may_be_empty() {
    let block = parse_source("if (1) { }").unwrap();
    let StmtKind::If { then_block, .. } = stmts(&block)[0] else {
      panic!("expected an if statement");
    };
    assert!(then_block.is_empty());
  }

  #[test]
  fn string_print_keeps_the_literal_verbatim() {
    let block = parse_source("print(\"hello\");").unwrap();
    assert_eq!(*stmts(&block)[0], StmtKind::PrintString("\"hello\"".into()));
  }

  #[test]
  fn bare_expression_statement_is_legal() {
    let block = parse_source("int a = 1; a + 2;").unwrap();
    let StmtKind::Expr(expr) = stmts(&block)[1] else {
      panic!("expected an expression statement");
    };
    assert_eq!(
      *expr,
      Expr::binary(BinaryOp::Add, Expr::var("a"), Expr::number(2))
    );
  }

  #[test]
  fn statements_preserve_source_order() {
    let block = parse_source("int a; int b; int c;").unwrap();
    let names: Vec<&str> = block
      .iter()
      .map(|kind| match kind {
        StmtKind::Decl { name, .. } => name.as_str(),
        other => panic!("unexpected statement {other:?}"),
      })
      .collect();
    assert_eq!(names, ["a", "b", "c"]);
  }

  #[test]
  fn missing_semicolon_is_a_syntax_error() {
    let err = parse_source("int x = 5 print(x);").unwrap_err();
    assert!(err.to_string().contains("expected \";\""));
  }

  #[test]
  fn missing_closing_brace_is_a_syntax_error() {
    let err = parse_source("if (1) { print(1);").unwrap_err();
    assert!(err.to_string().contains("expected \"}\""));
  }

  #[test]
  fn non_lvalue_assignment_target_is_rejected() {
    let err = parse_source("1 = 2;").unwrap_err();
    assert!(err.to_string().contains("not an lvalue"));
  }

  #[test]
  fn keywords_cannot_be_identifiers() {
    let err = parse_source("int if;").unwrap_err();
    assert!(err.to_string().contains("expected an identifier"));
  }

  #[test]
  fn empty_program_parses_to_an_empty_chain() {
    let block = parse_source("").unwrap();
    assert!(block.is_empty());
  }

  #[test]
  fn symbol_table_records_declarations() {
    let source = "int x; int y;";
    let tokens = tokenize(source).unwrap();
    let mut symbols = SymbolTable::new();
    parse(tokens, source, &mut symbols).unwrap();
    assert_eq!(symbols.names(), ["x", "y"]);
  }
}
