//! Interactive parameter entry.

use std::io::{self, BufRead, Write};

use crate::circuit::CircuitParameters;
use crate::dsl::{parse_value, ParameterName, ParameterSet};
use crate::error::{Result, ZvsError};

/// Prompts in the order they are asked.
const PROMPTS: [(ParameterName, &str); 11] = [
    (ParameterName::L1, "Set L1 value (recommended value = 0.1): "),
    (ParameterName::L2, "Set L2 value: "),
    (ParameterName::L4, "Set L4 value: "),
    (ParameterName::V, "Set V value: "),
    (ParameterName::C, "Set C value: "),
    (
        ParameterName::DeltaT,
        "Set time step value (recommended value = 1e-9): ",
    ),
    (
        ParameterName::TTotal,
        "Set total simulation time value (usually 0.1 seconds is enough): ",
    ),
    (
        ParameterName::SlopeR,
        "Set Mosfet slope value (recommended value = 0.0001): ",
    ),
    (
        ParameterName::R,
        "Set Mosfet max resistance value (recommended value = 100e6): ",
    ),
    (ParameterName::RSec, "Set Secondary resistance value: "),
    (
        ParameterName::LastPoints,
        "Set last number of points of data saved (100e3 points to plot is good): ",
    ),
];

fn input_error(e: io::Error) -> ZvsError {
    ZvsError::InputError {
        message: e.to_string(),
    }
}

/// Ask for every parameter on `output`, reading answers from `input`.
///
/// Values accept the same unit suffixes as parameter files. An answer that
/// is not a number is asked again; end of input is an error.
pub fn prompt_parameters<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<CircuitParameters> {
    let mut set = ParameterSet::new();
    let mut line = String::new();

    for (name, prompt) in PROMPTS {
        loop {
            write!(output, "{}", prompt)
                .and_then(|_| output.flush())
                .map_err(input_error)?;

            line.clear();
            let read = input.read_line(&mut line).map_err(input_error)?;
            if read == 0 {
                return Err(ZvsError::InputError {
                    message: format!("input ended before {} was given", name),
                });
            }

            match parse_value(&line) {
                Some(value) => {
                    set.set(name, value);
                    break;
                }
                None => {
                    writeln!(output, "'{}' is not a number", line.trim()).map_err(input_error)?;
                }
            }
        }
    }

    set.to_parameters()
}
