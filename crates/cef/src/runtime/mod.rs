//! Runtime module: boot, then stream lines through the parser.

pub mod boot;
pub mod run;
