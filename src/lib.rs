//! Crate root: wires together the compilation pipeline.
//!
//! The stages are intentionally small and composable so they can be evolved
//! independently:
//! - `tokenizer` performs lexical analysis and produces a flat token stream.
//! - `parser` builds the statement chain, checking declarations against
//!   `symtab` as it goes.
//! - `render` prints the finished tree for inspection.
//! - `codegen` lowers the tree to C source text.
//! - `runner` hands the generated C to an external compiler and runs it.

pub mod ast;
pub mod codegen;
pub mod error;
pub mod parser;
pub mod render;
pub mod runner;
pub mod symtab;
pub mod tokenizer;

pub use error::{CompileError, CompileResult, ToolStage};

use ast::Block;
use symtab::SymbolTable;

/// Parse a source string into its statement chain, running declaration checks.
pub fn parse_program(source: &str) -> CompileResult<Block> {
  let tokens = tokenizer::tokenize(source)?;
  let mut symbols = SymbolTable::new();
  parser::parse(tokens, source, &mut symbols)
}

/// Compile a source string into C source text.
pub fn generate_c(source: &str) -> CompileResult<String> {
  let program = parse_program(source)?;
  Ok(codegen::generate(&program))
}
