//! Access to the PLC programs and preset files shared by the tests of
//! several crates.
use std::{fs, path::PathBuf};

/// Reads a shared resource from `resources/test` as text.
pub fn read_shared_resource(name: &'static str) -> String {
    fs::read_to_string(shared_resource_path(name)).expect("Unable to read file")
}

/// Reads a shared resource as the list of lines a host would hand to the
/// compiler.
pub fn read_shared_program(name: &'static str) -> Vec<String> {
    read_shared_resource(name)
        .lines()
        .map(String::from)
        .collect()
}

pub fn shared_resource_path(name: &'static str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("..");
    path.push("resources");
    path.push("test");
    path.push(name);
    path
}
