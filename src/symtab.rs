//! Flat declaration registry consulted while parsing.
//!
//! The language has a single scalar type and no scoping, so the table is
//! nothing more than a uniqueness-checked set of names. It is created fresh
//! for each compilation run and only ever grows.

use rustc_hash::FxHashSet;

use crate::error::{CompileError, CompileResult};

#[derive(Debug, Default)]
pub struct SymbolTable {
  names: Vec<String>,
  index: FxHashSet<String>,
}

impl SymbolTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record a new declaration. Redeclaring a name is a fatal error.
  pub fn declare(&mut self, name: &str) -> CompileResult<()> {
    if !self.index.insert(name.to_string()) {
      return Err(CompileError::DuplicateDeclaration {
        name: name.to_string(),
      });
    }
    self.names.push(name.to_string());
    Ok(())
  }

  pub fn is_declared(&self, name: &str) -> bool {
    self.index.contains(name)
  }

  /// Reject references to names no declaration has introduced.
  pub fn require_declared(&self, name: &str) -> CompileResult<()> {
    if self.is_declared(name) {
      Ok(())
    } else {
      Err(CompileError::UseBeforeDeclaration {
        name: name.to_string(),
      })
    }
  }

  /// Declared names in declaration order.
  pub fn names(&self) -> &[String] {
    &self.names
  }
}
