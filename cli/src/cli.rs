//! Implements the command line behavior.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use codespan_reporting::{
    diagnostic::{Diagnostic, Label, LabelStyle, Severity},
    files::SimpleFile,
    term::{
        self,
        termcolor::{ColorChoice, StandardStream},
    },
};
use log::{debug, info};
use scanplc_dsl::core::INPUTS;
use scanplc_dsl::program::CompiledProgram;
use scanplc_parser::compile_source;
use scanplc_vm::{Mode, PlcConfig, Vm};
use serde_json::json;

/// Options of the `run` subcommand.
pub struct RunOptions {
    pub file: PathBuf,
    pub config: Option<PathBuf>,
    pub inputs: Option<String>,
    pub scans: Option<u64>,
    pub period_ms: u64,
    pub dump_state: Option<PathBuf>,
    pub trace: bool,
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("Unable to read {}: {}", path.display(), e))
}

/// Checks the specified program files.
pub fn check(paths: &[PathBuf], suppress_output: bool) -> Result<(), String> {
    let mut errors = 0;
    for path in paths {
        let source = read(path)?;
        if let Err(diagnostics) = compile_source(&source) {
            errors += diagnostics.len();
            if !suppress_output {
                emit(path, &source, diagnostics);
            }
        }
    }

    if errors > 0 {
        return Err(format!("Number of errors: {}", errors));
    }

    println!("OK");
    Ok(())
}

/// Compiles a program file and prints the result.
pub fn compile(path: &Path, as_json: bool) -> Result<(), String> {
    let program = compile_file(path)?;
    if as_json {
        let text = serde_json::to_string_pretty(&program)
            .map_err(|e| format!("Unable to write program: {e}"))?;
        println!("{text}");
    } else {
        for statement in &program {
            println!("{statement}");
        }
    }
    Ok(())
}

/// Compiles a program file and executes it.
///
/// When `scans` is `Some(n)`, runs exactly `n` scan cycles.
/// When `scans` is `None`, runs continuously until Ctrl+C.
/// When `dump_state` is `Some(path)`, writes the controller state after
/// stopping, including after a trap.
pub fn run(options: &RunOptions) -> Result<(), String> {
    let program = compile_file(&options.file)?;

    let config = match &options.config {
        Some(path) => PlcConfig::from_json(&read(path)?)
            .map_err(|e| format!("Invalid presets {}: {e}", path.display()))?,
        None => PlcConfig::default(),
    };

    let mut vm = Vm::new(config);
    vm.initialize_system();
    vm.load_program(program);
    if let Some(bits) = &options.inputs {
        vm.set_inputs(parse_inputs(bits)?);
    }
    vm.set_mode(Mode::Run).map_err(|e| e.to_string())?;

    // Install signal handler for clean shutdown
    let handle = vm.stop_handle();
    ctrlc::set_handler(move || handle.request_stop())
        .map_err(|e| format!("Failed to set signal handler: {e}"))?;

    let period = Duration::from_millis(options.period_ms);
    let mut scans = 0u64;
    loop {
        if vm.stop_requested() {
            info!("Stop requested after {} scan cycles", scans);
            break;
        }
        if let Some(max) = options.scans {
            if scans >= max {
                break;
            }
        }
        if scans > 0 && !period.is_zero() {
            thread::sleep(period);
        }

        if let Err(err) = vm.scan_once() {
            if let Some(dump_path) = &options.dump_state {
                dump_state(&vm, dump_path)?;
            }
            return Err(format!("PLC {err}"));
        }
        scans += 1;

        if options.trace {
            println!("scan {}: O={}", vm.scan_count(), format_bits(vm.outputs()));
        }
    }

    vm.set_mode(Mode::Stop).map_err(|e| e.to_string())?;

    if let Some(dump_path) = &options.dump_state {
        dump_state(&vm, dump_path)?;
    }

    Ok(())
}

fn compile_file(path: &Path) -> Result<CompiledProgram, String> {
    let source = read(path)?;
    compile_source(&source).map_err(|diagnostics| {
        let count = diagnostics.len();
        emit(path, &source, diagnostics);
        format!("Number of errors: {}", count)
    })
}

/// Parses input values given as a string of `0` and `1`. Missing inputs
/// are false.
fn parse_inputs(bits: &str) -> Result<[bool; INPUTS], String> {
    if bits.chars().count() > INPUTS {
        return Err(format!("At most {INPUTS} inputs can be set, got '{bits}'"));
    }
    let mut inputs = [false; INPUTS];
    for (input, bit) in inputs.iter_mut().zip(bits.chars()) {
        *input = match bit {
            '0' => false,
            '1' => true,
            other => return Err(format!("Input value '{other}' is not 0 or 1")),
        };
    }
    Ok(inputs)
}

fn format_bits(values: &[bool]) -> String {
    values.iter().map(|v| if *v { '1' } else { '0' }).collect()
}

fn dump_state(vm: &Vm, dump_path: &Path) -> Result<(), String> {
    let document = json!({
        "mode": vm.mode(),
        "scan_count": vm.scan_count(),
        "state": vm.state(),
    });
    let text = serde_json::to_string_pretty(&document)
        .map_err(|e| format!("Unable to write state: {e}"))?;
    fs::write(dump_path, text)
        .map_err(|e| format!("Unable to create dump file {}: {e}", dump_path.display()))?;
    debug!("Wrote state to {}", dump_path.display());
    Ok(())
}

/// Offsets of the first character of each line of the source.
fn line_starts(source: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(source.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

fn emit(path: &Path, source: &str, diagnostics: Vec<scanplc_dsl::diagnostic::Diagnostic>) {
    let writer = StandardStream::stderr(ColorChoice::Auto);
    let config = term::Config::default();
    let file = SimpleFile::new(path.display().to_string(), source);
    let starts = line_starts(source);

    for diagnostic in diagnostics {
        let offset = starts
            .get(diagnostic.line.saturating_sub(1))
            .copied()
            .unwrap_or(source.len());
        let diagnostic = map_diagnostic(diagnostic, offset);
        let _ = term::emit(&mut writer.lock(), &config, &file, &diagnostic).map_err(|err| {
            println!("Failed writing to terminal: {}", err);
        });
    }
}

fn map_diagnostic(diagnostic: scanplc_dsl::diagnostic::Diagnostic, offset: usize) -> Diagnostic<()> {
    let description = diagnostic.description();
    let span = diagnostic.primary.span;
    let range = Range {
        start: offset + span.start,
        end: offset + span.end,
    };

    Diagnostic::new(Severity::Error)
        .with_code(diagnostic.code)
        .with_message(format!("{}: {}", diagnostic.kind, description))
        .with_labels(vec![
            Label::new(LabelStyle::Primary, (), range).with_message(diagnostic.primary.message)
        ])
}
