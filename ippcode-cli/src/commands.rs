//! CLI command implementations.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::Path;

use ippcode_common::{Argument, Opcode, Program};
use ippcode_vm::{Halt, LabelIndex, LineInput, StreamOutput};

/// Exit code for files that cannot be read.
const UNREADABLE: i32 = 11;

/// Exit code for undefined jump targets.
const UNDEFINED_LABEL: i32 = 52;

/// Assemble and execute a program.
pub fn run(source: &Path, input: Option<&Path>) -> Result<(), i32> {
    let program = load(source)?;

    let reader: Box<dyn BufRead> = match input {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                eprintln!("error: cannot read '{}': {e}", path.display());
                UNREADABLE
            })?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    let mut input = LineInput::new(reader);
    let mut stdout = StreamOutput::new(BufWriter::new(io::stdout().lock()));
    let mut stderr = StreamOutput::new(io::stderr().lock());

    match ippcode_vm::run(program, &mut input, &mut stdout, &mut stderr) {
        Ok(Halt::Finished) => Ok(()),
        Ok(halt) => {
            tracing::debug!(?halt, "program exited");
            match halt.exit_code() {
                0 => Ok(()),
                code => Err(code),
            }
        }
        Err(e) => {
            tracing::debug!(code = e.exit_code(), at = ?e.at(), "run failed");
            eprintln!("runtime error: {e}");
            Err(e.exit_code())
        }
    }
}

/// Assemble a program and validate it without executing.
pub fn check(source: &Path) -> Result<(), i32> {
    let program = load(source)?;
    let count = program.len();

    let program = order(program)?;

    let undefined = undefined_labels(&program);
    if !undefined.is_empty() {
        for (order, label) in &undefined {
            eprintln!("error: undefined label '{label}' at instruction {order}");
        }
        return Err(UNDEFINED_LABEL);
    }

    println!("OK: {} ({count} instructions)", source.display());
    Ok(())
}

/// Print a program in canonical source form, sorted by order number.
pub fn fmt(source: &Path) -> Result<(), i32> {
    let program = order(load(source)?)?;
    print!("{}", ippcode_assembler::disassemble(&program));
    Ok(())
}

/// Read a program file, either IPPcode24 source or its XML form.
///
/// A file whose first non-blank character is `<` is treated as XML.
fn load(path: &Path) -> Result<Program, i32> {
    let text = fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read '{}': {e}", path.display());
        UNREADABLE
    })?;

    let program = if text.trim_start().starts_with('<') {
        ippcode_assembler::load_xml(&text).map_err(|e| {
            eprintln!("error: {e}");
            e.exit_code()
        })?
    } else {
        ippcode_assembler::assemble(&text).map_err(|e| {
            eprintln!("error: {e}");
            e.exit_code()
        })?
    };

    tracing::debug!(
        path = %path.display(),
        instructions = program.len(),
        "program loaded"
    );
    Ok(program)
}

/// Sort by order number, reporting duplicate or zero orders.
fn order(program: Program) -> Result<Program, i32> {
    program.ordered().map_err(|e| {
        eprintln!("error: {e}");
        e.exit_code()
    })
}

/// Jump and call targets that no LABEL defines, with the referencing order number.
fn undefined_labels(program: &Program) -> Vec<(u32, String)> {
    let labels = &LabelIndex::build(program);
    program
        .instructions
        .iter()
        .filter(|instr| instr.opcode != Some(Opcode::Label))
        .flat_map(|instr| {
            instr.args.iter().filter_map(move |arg| match arg {
                Argument::Label(name) if !labels.contains(name) => {
                    Some((instr.order, name.clone()))
                }
                _ => None,
            })
        })
        .collect()
}
