//! Syntax tree and resolved parameter set of a parameter file.

use std::collections::HashMap;
use std::fmt;

use crate::circuit::{validate_parameters, CircuitParameters};
use crate::error::{Result, ZvsError};

/// One `name = value` line.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Parameter name as written
    pub name: String,
    /// Numeric value with the unit suffix applied
    pub value: f64,
    /// Source line number for error reporting
    pub line: usize,
}

/// Parsed parameter file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterAst {
    /// Assignments in file order
    pub assignments: Vec<Assignment>,
}

impl ParameterAst {
    /// Create an empty parameter file.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Parameters accepted in a parameter file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterName {
    /// Damping inductance
    L1,
    /// Half-primary inductance
    L2,
    /// Secondary inductance
    L4,
    /// Source voltage
    V,
    /// Resonant capacitance
    C,
    /// Time step
    DeltaT,
    /// Total simulated time
    TTotal,
    /// Switch slope (percent)
    SlopeR,
    /// Maximum switch resistance
    R,
    /// Secondary load
    RSec,
    /// Number of trailing points to record
    LastPoints,
    /// Trailing percentage to record
    LastPerc,
}

impl ParameterName {
    /// All names, in prompt order.
    pub const ALL: [ParameterName; 12] = [
        Self::L1,
        Self::L2,
        Self::L4,
        Self::V,
        Self::C,
        Self::DeltaT,
        Self::TTotal,
        Self::SlopeR,
        Self::R,
        Self::RSec,
        Self::LastPoints,
        Self::LastPerc,
    ];

    /// Parse a parameter name, case-insensitively, accepting aliases.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "l1" => Some(Self::L1),
            "l2" => Some(Self::L2),
            "l4" => Some(Self::L4),
            "v" => Some(Self::V),
            "c" => Some(Self::C),
            "delta_t" | "dt" => Some(Self::DeltaT),
            "t_total" => Some(Self::TTotal),
            "slope_r" | "slope" => Some(Self::SlopeR),
            "r" | "r_max" => Some(Self::R),
            "r_sec" | "r_load" => Some(Self::RSec),
            "last_points" => Some(Self::LastPoints),
            "last_perc" => Some(Self::LastPerc),
            _ => None,
        }
    }

    /// Canonical spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::L1 => "L1",
            Self::L2 => "L2",
            Self::L4 => "L4",
            Self::V => "V",
            Self::C => "C",
            Self::DeltaT => "delta_t",
            Self::TTotal => "t_total",
            Self::SlopeR => "slope_R",
            Self::R => "R",
            Self::RSec => "R_Sec",
            Self::LastPoints => "last_points",
            Self::LastPerc => "last_perc",
        }
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named values collected from a parameter file or from prompts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    values: HashMap<ParameterName, f64>,
}

impl ParameterSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the assignments of a parsed file.
    pub fn from_ast(ast: &ParameterAst) -> Result<Self> {
        let mut set = Self::new();
        for assignment in &ast.assignments {
            let name = ParameterName::from_name(&assignment.name).ok_or_else(|| {
                ZvsError::UnknownParameter {
                    name: assignment.name.clone(),
                    line: assignment.line,
                }
            })?;
            if set.values.insert(name, assignment.value).is_some() {
                return Err(ZvsError::DuplicateParameter {
                    name: name.to_string(),
                    line: assignment.line,
                });
            }
        }
        Ok(set)
    }

    /// Set a value, replacing any previous one.
    pub fn set(&mut self, name: ParameterName, value: f64) {
        self.values.insert(name, value);
    }

    /// Get a value if present.
    pub fn get(&self, name: ParameterName) -> Option<f64> {
        self.values.get(&name).copied()
    }

    fn require(&self, name: ParameterName) -> Result<f64> {
        self.get(name).ok_or_else(|| ZvsError::MissingParameter {
            name: name.to_string(),
        })
    }

    /// Build validated circuit parameters.
    ///
    /// Exactly one of `last_points` and `last_perc` must be present; a point
    /// count is converted to a percentage of the total number of steps.
    pub fn to_parameters(&self) -> Result<CircuitParameters> {
        let delta_t = self.require(ParameterName::DeltaT)?;
        let t_total = self.require(ParameterName::TTotal)?;

        let last_perc = match (
            self.get(ParameterName::LastPoints),
            self.get(ParameterName::LastPerc),
        ) {
            (Some(points), None) => {
                CircuitParameters::last_perc_from_points(points, t_total, delta_t)
            }
            (None, Some(perc)) => perc,
            (Some(_), Some(_)) => {
                return Err(ZvsError::invalid_parameter(
                    "last_points",
                    "set either last_points or last_perc, not both",
                ));
            }
            (None, None) => {
                return Err(ZvsError::MissingParameter {
                    name: "last_points".to_string(),
                });
            }
        };

        let params = CircuitParameters {
            l1: self.require(ParameterName::L1)?,
            l2: self.require(ParameterName::L2)?,
            l4: self.require(ParameterName::L4)?,
            c: self.require(ParameterName::C)?,
            v: self.require(ParameterName::V)?,
            r_max: self.require(ParameterName::R)?,
            delta_t,
            t_total,
            slope_r: self.require(ParameterName::SlopeR)?,
            r_sec: self.require(ParameterName::RSec)?,
            last_perc,
        };

        validate_parameters(&params)?;
        Ok(params)
    }
}
