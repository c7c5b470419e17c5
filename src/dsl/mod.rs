//! Parameter file language.
//!
//! A parameter file lists the scalar inputs of a simulation, one per line.
//! It replaces the interactive prompts for batch runs.
//!
//! # Grammar Overview
//!
//! ```text
//! file        = { line }
//! line        = [ assignment ] [ comment ] newline
//! comment     = ('#' | ';') { any_char }
//! assignment  = name [ '=' ] value
//!
//! name        = identifier
//! value       = number [unit_suffix]
//! number      = ['-'|'+'] digit* ['.' digit*] [('e'|'E') ['-'|'+'] digit+]
//! unit_suffix = 'p' | 'n' | 'u' | 'm' | 'k' | 'M' | 'G'
//! identifier  = (letter | '_') { letter | digit | '_' }
//! ```
//!
//! # Parameters
//!
//! | Name | Aliases | Meaning |
//! |------|---------|---------|
//! | `L1` | | Damping inductance (H) |
//! | `L2` | | Inductance of one primary half (H) |
//! | `L4` | | Secondary inductance (H) |
//! | `V` | | Source voltage (V) |
//! | `C` | | Resonant capacitance (F) |
//! | `delta_t` | `dt` | Time step (s) |
//! | `t_total` | | Simulated time (s) |
//! | `slope_R` | `slope` | Switch transition, percent of the period |
//! | `R` | `R_max` | Maximum switch resistance (ohms) |
//! | `R_Sec` | `R_load` | Secondary load (ohms) |
//! | `last_points` | | Number of trailing points to record |
//! | `last_perc` | | Trailing percentage to record (instead of `last_points`) |
//!
//! Names are case-insensitive.
//!
//! # Example
//!
//! ```text
//! # 5+5 turn primary on a 10 nF tank
//! L1 = 0.1
//! L2 = 100u
//! L4 = 10u
//! V = 12
//! C = 10n
//! delta_t = 1n
//! t_total = 100u
//! slope_R = 0.0001
//! R = 100M
//! R_Sec = 50
//! last_points = 1000
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::circuit::CircuitParameters;
use crate::error::Result;

/// Parse a parameter file into its syntax tree.
pub fn parse(input: &str) -> Result<ParameterAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer)?;
    parser.parse()
}

/// Parse and validate a parameter file.
pub fn parse_parameters(input: &str) -> Result<CircuitParameters> {
    let ast = parse(input)?;
    ParameterSet::from_ast(&ast)?.to_parameters()
}

/// Read, parse and validate a parameter file from disk.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<CircuitParameters> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::ZvsError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_parameters(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ZvsError;
    use approx::assert_relative_eq;

    const REFERENCE: &str = "\
# 5+5 turn primary on a 10 nF tank
L1 = 0.1
L2 = 100u
L4 = 10u
V = 12
C = 10n
delta_t = 1n
t_total = 100u
slope_R = 0.0001
R = 100M
R_Sec = 50
last_points = 1000
";

    #[test]
    fn test_reference_file_matches_defaults() {
        let params = parse_parameters(REFERENCE).unwrap();
        let defaults = CircuitParameters::default();
        assert_relative_eq!(params.l1, defaults.l1);
        assert_relative_eq!(params.l2, defaults.l2, max_relative = 1e-12);
        assert_relative_eq!(params.l4, defaults.l4, max_relative = 1e-12);
        assert_relative_eq!(params.c, defaults.c, max_relative = 1e-12);
        assert_relative_eq!(params.delta_t, defaults.delta_t, max_relative = 1e-12);
        assert_relative_eq!(params.t_total, defaults.t_total, max_relative = 1e-12);
        assert_relative_eq!(params.r_max, defaults.r_max);
        assert_relative_eq!(params.last_perc, 1.0, max_relative = 1e-9);
    }

    #[test]
    fn test_last_perc_directly() {
        let input = REFERENCE.replace("last_points = 1000", "last_perc = 5");
        let params = parse_parameters(&input).unwrap();
        assert_eq!(params.last_perc, 5.0);
    }

    #[test]
    fn test_both_window_forms_rejected() {
        let input = format!("{}last_perc = 5\n", REFERENCE);
        assert!(matches!(
            parse_parameters(&input),
            Err(ZvsError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_unknown_parameter() {
        let input = format!("{}L3 = 1u\n", REFERENCE);
        let err = parse_parameters(&input).unwrap_err();
        assert!(matches!(err, ZvsError::UnknownParameter { ref name, line: 13 } if name == "L3"));
    }

    #[test]
    fn test_duplicate_parameter() {
        let input = format!("{}v = 24\n", REFERENCE);
        let err = parse_parameters(&input).unwrap_err();
        assert!(matches!(err, ZvsError::DuplicateParameter { ref name, .. } if name == "V"));
    }

    #[test]
    fn test_missing_parameter() {
        let input = REFERENCE.replace("R_Sec = 50\n", "");
        let err = parse_parameters(&input).unwrap_err();
        assert!(matches!(err, ZvsError::MissingParameter { ref name } if name == "R_Sec"));
    }

    #[test]
    fn test_invalid_value_rejected() {
        let input = REFERENCE.replace("C = 10n", "C = -10n");
        let err = parse_parameters(&input).unwrap_err();
        assert!(matches!(err, ZvsError::InvalidParameter { ref param, .. } if param == "C"));
    }
}
