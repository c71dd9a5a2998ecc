use std::env;
use std::fs;
use std::path::Path;
use std::process;

use minic::runner::{CcToolchain, Toolchain};
use minic::{CompileError, CompileResult, ToolStage, codegen, parse_program, render};

fn main() {
  let args: Vec<String> = env::args().collect();
  let program_name = args.first().map(String::as_str).unwrap_or("minic");

  let mut run = true;
  let mut input = None;
  for arg in &args[1..] {
    match arg.as_str() {
      "--no-run" => run = false,
      path if input.is_none() && !path.starts_with('-') => input = Some(path.to_string()),
      _ => {
        eprintln!("usage: {program_name} [--no-run] <source-file>");
        process::exit(1);
      }
    }
  }
  let Some(input) = input else {
    eprintln!("usage: {program_name} [--no-run] <source-file>");
    process::exit(1);
  };

  let source = match fs::read_to_string(&input) {
    Ok(source) => source,
    Err(err) => {
      eprintln!("{program_name}: cannot read '{input}': {err}");
      process::exit(1);
    }
  };

  if let Err(err) = drive(&source, run) {
    eprintln!("{err}");
    process::exit(1);
  }
}

/// Run the pipeline: parse, show the tree, write `output.c`, then build and
/// execute it unless `--no-run` was given.
fn drive(source: &str, run: bool) -> CompileResult<()> {
  let program = parse_program(source)?;

  println!("\n--- VISUAL PARSE TREE ---");
  print!("{}", render::render(&program));
  println!("-------------------------\n");

  let c_source = codegen::generate(&program);
  let c_path = Path::new("output.c");
  fs::write(c_path, &c_source).map_err(|err| CompileError::ToolFailure {
    stage: ToolStage::Compile,
    detail: format!("writing {}: {err}", c_path.display()),
  })?;

  if !run {
    println!("Wrote {}", c_path.display());
    return Ok(());
  }

  let toolchain = CcToolchain::locate()?;
  let exe = Path::new("./program");
  toolchain.compile(c_path, exe)?;

  println!("\n--- EXECUTION RESULTS ---");
  let output = toolchain.run(exe)?;
  print!("{output}");
  println!("-------------------------");
  Ok(())
}
