//! External toolchain boundary: compiling the generated C and running it.
//!
//! The host compiler is reached through a trait so the pipeline can be
//! exercised with a fake in tests. Both calls are blocking, attempted exactly
//! once, and any failure is final for the run.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{CompileError, CompileResult, ToolStage};

/// The two operations the pipeline needs from the host toolchain.
pub trait Toolchain {
  /// Turn the C source file into an executable at `exe`.
  fn compile(&self, source: &Path, exe: &Path) -> CompileResult<()>;

  /// Run `exe` and capture its standard output.
  fn run(&self, exe: &Path) -> CompileResult<String>;
}

/// Production toolchain backed by whatever C compiler the PATH offers.
pub struct CcToolchain {
  compiler: PathBuf,
}

impl CcToolchain {
  /// Probe the PATH for a usable C compiler, preferring gcc.
  pub fn locate() -> CompileResult<Self> {
    for candidate in ["gcc", "cc", "clang"] {
      if let Ok(path) = which::which(candidate) {
        return Ok(Self { compiler: path });
      }
    }
    Err(CompileError::ToolFailure {
      stage: ToolStage::Compile,
      detail: "no C compiler found on PATH (tried gcc, cc, clang)".to_string(),
    })
  }

  pub fn compiler_path(&self) -> &Path {
    &self.compiler
  }
}

impl Toolchain for CcToolchain {
  fn compile(&self, source: &Path, exe: &Path) -> CompileResult<()> {
    let output = Command::new(&self.compiler)
      .arg(source)
      .arg("-o")
      .arg(exe)
      .output()
      .map_err(|err| CompileError::ToolFailure {
        stage: ToolStage::Compile,
        detail: err.to_string(),
      })?;

    if !output.status.success() {
      return Err(CompileError::ToolFailure {
        stage: ToolStage::Compile,
        detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      });
    }
    Ok(())
  }

  fn run(&self, exe: &Path) -> CompileResult<String> {
    let output = Command::new(exe)
      .output()
      .map_err(|err| CompileError::ToolFailure {
        stage: ToolStage::Run,
        detail: err.to_string(),
      })?;

    if !output.status.success() {
      return Err(CompileError::ToolFailure {
        stage: ToolStage::Run,
        detail: format!("exit status {}", output.status),
      });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
  }
}
