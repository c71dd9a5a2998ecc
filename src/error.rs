//! Shared error utilities used across the compilation pipeline.
//!
//! Diagnostics are kept lightweight on purpose – every failure is a single
//! human-readable message. Syntax errors additionally point at the offending
//! byte with a caret under the source line that contains it.

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

/// Which external stage failed after code generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStage {
  Compile,
  Run,
}

impl std::fmt::Display for ToolStage {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ToolStage::Compile => f.write_str("compilation"),
      ToolStage::Run => f.write_str("execution"),
    }
  }
}

#[derive(Debug, Snafu)]
pub enum CompileError {
  /// Grammar or lexical mismatch, anchored at the offending token.
  #[snafu(display("{line}\n{marker} {message}"))]
  Syntax {
    line: String,
    marker: String,
    message: String,
  },

  /// A second `int` declaration for a name the table already holds.
  #[snafu(display("variable '{name}' is already declared"))]
  DuplicateDeclaration { name: String },

  /// An identifier referenced before any declaration introduced it.
  #[snafu(display("variable '{name}' used but not declared"))]
  UseBeforeDeclaration { name: String },

  /// The external C compiler, or the binary it produced, failed.
  #[snafu(display("{stage} of generated code failed: {detail}"))]
  ToolFailure { stage: ToolStage, detail: String },
}

impl CompileError {
  /// Construct a syntax error anchored at a specific byte offset in the source.
  pub fn at(source: &str, loc: usize, message: impl Into<String>) -> Self {
    let safe_loc = loc.min(source.len());
    // carve out the line containing `loc` so multi-line programs still get a usable caret
    let line_start = source[..safe_loc].rfind('\n').map_or(0, |i| i + 1);
    let line_end = source[safe_loc..]
      .find('\n')
      .map_or(source.len(), |i| safe_loc + i);
    let line = format!("'{}'", &source[line_start..line_end]);
    let char_offset = source[line_start..safe_loc].chars().count() + 1; // account for opening quote
    let marker = format!("{}^", " ".repeat(char_offset));
    Self::Syntax {
      line,
      marker,
      message: message.into(),
    }
  }
}
