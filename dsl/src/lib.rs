//! Provides definitions of the objects that make up PLC logic statements
//! and the compiled programs that the scan-cycle interpreter executes.

pub mod core;
pub mod diagnostic;
pub mod program;
pub mod token;
