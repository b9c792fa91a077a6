//! Shared test helpers for interpreter integration tests.
#![allow(dead_code)]

use scanplc_parser::compile_source;
use scanplc_test::{read_shared_program, read_shared_resource};
use scanplc_vm::{Mode, PlcConfig, Vm};

/// Compiles the program text and returns a controller in run mode.
pub fn run_source(source: &str, config: PlcConfig) -> Vm {
    let program = compile_source(source).unwrap();
    start(program, config)
}

/// Compiles a shared program and returns a controller in run mode.
pub fn run_resource(name: &'static str, config: PlcConfig) -> Vm {
    let program = scanplc_parser::compile(read_shared_program(name)).unwrap();
    start(program, config)
}

/// Reads a shared preset file.
pub fn presets(name: &'static str) -> PlcConfig {
    PlcConfig::from_json(&read_shared_resource(name)).unwrap()
}

fn start(program: scanplc_dsl::program::CompiledProgram, config: PlcConfig) -> Vm {
    let mut vm = Vm::new(config);
    vm.initialize_system();
    vm.load_program(program);
    vm.set_mode(Mode::Run).unwrap();
    vm
}

/// Sets the first inputs from the list, leaving the rest false.
pub fn set_inputs(vm: &mut Vm, values: &[bool]) {
    let mut inputs = [false; 8];
    inputs[..values.len()].copy_from_slice(values);
    vm.set_inputs(inputs);
}

/// Runs one cycle and returns the committed outputs.
pub fn scan(vm: &mut Vm) -> [bool; 8] {
    vm.scan_once().unwrap();
    *vm.outputs()
}
