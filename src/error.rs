//! Error types for the ZVS driver simulator.
//!
//! This module provides a unified error type [`ZvsError`] covering parameter
//! file parsing, parameter validation and result output.
//!
//! Numerical divergence of the integrator is deliberately absent: it is
//! reported as a flag in [`SimulationReport`](crate::solver::SimulationReport)
//! and handled by the retry policy.

use thiserror::Error;

/// Result type alias using [`ZvsError`].
pub type Result<T> = std::result::Result<T, ZvsError>;

/// Unified error type for all simulator operations.
#[derive(Error, Debug)]
pub enum ZvsError {
    // ============ Parameter File Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Parameter name not recognized
    #[error("Unknown parameter '{name}' at line {line}")]
    UnknownParameter { name: String, line: usize },

    /// Parameter assigned more than once
    #[error("Parameter '{name}' set twice (second assignment at line {line})")]
    DuplicateParameter { name: String, line: usize },

    /// Required parameter never assigned
    #[error("Missing parameter '{name}'")]
    MissingParameter { name: String },

    // ============ Validation Errors ============
    /// Parameter value outside its valid range
    #[error("Invalid parameter '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // ============ I/O Errors ============
    /// Error reading a parameter file
    #[error("Failed to read parameter file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error creating or writing an output file
    #[error("Failed to write output file '{path}': {source}")]
    OutputError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error reading interactive input
    #[error("Input error: {message}")]
    InputError { message: String },

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

impl ZvsError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create an output error for the given path
    pub fn output(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::OutputError {
            path: path.into(),
            source,
        }
    }
}
