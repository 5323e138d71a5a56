// Module structure for the CEF parser.

// Core
pub mod parser;

// Process surface
pub mod conf;
pub mod runtime;
