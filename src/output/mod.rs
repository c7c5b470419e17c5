//! Result files and console reporting for the CLI frontend.
//!
//! Waveforms are written as plain-text `.dat` files, one `time value` pair
//! per line, ready for gnuplot or a spreadsheet:
//!
//! | File | Quantity |
//! |------|----------|
//! | `Vsec.dat` | Secondary voltage, `I4·R_Sec` |
//! | `VC.dat` | Capacitor voltage, `∫I3/C` |
//! | `IL2.dat` | Primary-half current, `I3 − I2` |
//! | `ISource.dat` | Source current, `I1 − I2` |
//! | `IC.dat` | Capacitor current, `I3` |
//!
//! The final parameters go to `parameters.dat`.

mod prompt;

pub use prompt::prompt_parameters;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::circuit::CircuitParameters;
use crate::error::{Result, ZvsError};
use crate::solver::{RetryStep, Sample, SimulationSink};

/// Names of the waveform files, in [`Sample`] field order.
pub const WAVEFORM_FILES: [&str; 5] = ["Vsec.dat", "VC.dat", "IL2.dat", "ISource.dat", "IC.dat"];

/// Name of the parameter summary file.
pub const PARAMETERS_FILE: &str = "parameters.dat";

/// Significant digits written for every value.
pub const PRECISION: usize = 15;

/// Format a value like C's `%.15g`.
pub fn format_value(x: f64) -> String {
    if x == 0.0 {
        return "0".to_string();
    }
    if !x.is_finite() {
        return x.to_string();
    }

    let sci = format!("{:.*e}", PRECISION - 1, x);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some(parts) => parts,
        None => return sci,
    };
    let exp: i32 = exponent.parse().unwrap_or(0);

    if exp < -4 || exp >= PRECISION as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let decimals = (PRECISION as i32 - 1 - exp) as usize;
        trim_fraction(&format!("{:.*}", decimals, x)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Write the final parameters, one labeled line per field.
pub fn write_parameters(dir: &Path, params: &CircuitParameters) -> Result<()> {
    let path = dir.join(PARAMETERS_FILE);
    let display = path.display().to_string();
    let file = File::create(&path).map_err(|e| ZvsError::output(&display, e))?;
    let mut out = BufWriter::new(file);

    let lines = [
        ("L1:", params.l1),
        ("L2:", params.l2),
        ("L4:", params.l4),
        ("V:", params.v),
        ("C:", params.c),
        ("Time step:", params.delta_t),
        ("Total simulation time:", params.t_total),
        ("Resistor slope:", params.slope_r),
        ("Max resistance:", params.r_max),
        ("Secondary load:", params.r_sec),
        ("Recorded percentage:", params.last_perc),
    ];
    for (label, value) in lines {
        writeln!(out, "{:<23}{}", label, format_value(value)).map_err(|e| ZvsError::output(&display, e))?;
    }
    out.flush().map_err(|e| ZvsError::output(&display, e))
}

/// Open waveform writers of one attempt.
struct WaveformWriters {
    paths: Vec<PathBuf>,
    writers: Vec<BufWriter<File>>,
}

impl WaveformWriters {
    /// Create (and truncate) all waveform files in `dir`.
    fn create(dir: &Path) -> Result<Self> {
        let mut paths = Vec::with_capacity(WAVEFORM_FILES.len());
        let mut writers = Vec::with_capacity(WAVEFORM_FILES.len());
        for name in WAVEFORM_FILES {
            let path = dir.join(name);
            let file = File::create(&path).map_err(|e| ZvsError::output(path.display().to_string(), e))?;
            writers.push(BufWriter::new(file));
            paths.push(path);
        }
        Ok(Self { paths, writers })
    }

    fn write(&mut self, sample: &Sample) -> Result<()> {
        let t = format_value(sample.t);
        let values = [
            sample.secondary_voltage,
            sample.capacitor_voltage,
            sample.primary_current,
            sample.source_current,
            sample.capacitor_current,
        ];
        for ((writer, path), value) in self.writers.iter_mut().zip(&self.paths).zip(values) {
            writeln!(writer, "{} {}", t, format_value(value))
                .map_err(|e| ZvsError::output(path.display().to_string(), e))?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        for (writer, path) in self.writers.iter_mut().zip(&self.paths) {
            writer
                .flush()
                .map_err(|e| ZvsError::output(path.display().to_string(), e))?;
        }
        Ok(())
    }
}

/// Sink writing `.dat` files and printing progress to stdout.
pub struct DatFileSink {
    dir: PathBuf,
    writers: Option<WaveformWriters>,
    /// Print progress percentages and the recording notice
    show_progress: bool,
}

impl DatFileSink {
    /// Create a sink writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            writers: None,
            show_progress: true,
        }
    }

    /// Enable or disable progress lines.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn say(&self, line: &str) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        // Console output is best effort.
        let _ = writeln!(out, "{}", line);
    }
}

impl SimulationSink for DatFileSink {
    fn begin_attempt(&mut self, _params: &CircuitParameters) -> Result<()> {
        self.writers = Some(WaveformWriters::create(&self.dir)?);
        Ok(())
    }

    fn record(&mut self, sample: &Sample) -> Result<()> {
        match self.writers.as_mut() {
            Some(writers) => writers.write(sample),
            None => Ok(()),
        }
    }

    fn recording_started(&mut self, _t: f64) {
        if self.show_progress {
            self.say("Start recording data.");
        }
    }

    fn progress(&mut self, percent: u32) {
        if self.show_progress {
            self.say(&format!("{}%", percent));
        }
    }

    fn end_attempt(&mut self, _diverged: bool) -> Result<()> {
        if let Some(mut writers) = self.writers.take() {
            writers.flush()?;
        }
        Ok(())
    }

    fn retry(&mut self, step: &RetryStep) {
        if step.changed_time_step() {
            self.say(&format!(
                "Convergence error, readjusting L1 to {} and time step to {}",
                format_value(step.l1),
                format_value(step.delta_t)
            ));
        } else {
            self.say(&format!(
                "Convergence error, readjusting L1 to {}",
                format_value(step.l1)
            ));
        }
    }

    fn gave_up(&mut self, _params: &CircuitParameters) {
        self.say("Convergence error could not be solved.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::RetryController;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("zvs_core_{}_{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(12.0), "12");
        assert_eq!(format_value(0.5), "0.5");
        assert_eq!(format_value(1e-4), "0.0001");
        assert_eq!(format_value(9.9e-5), "9.9e-05");
        assert_eq!(format_value(100e6), "100000000");
        assert_eq!(format_value(-2.4751410832589), "-2.4751410832589");
        assert_eq!(format_value(1e20), "1e+20");
        assert_eq!(format_value(9.90000000001346e-05), "9.90000000001346e-05");
    }

    #[test]
    fn test_write_parameters() {
        let dir = scratch_dir("params");
        write_parameters(&dir, &CircuitParameters::default()).unwrap();

        let text = fs::read_to_string(dir.join(PARAMETERS_FILE)).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "L1:                    0.1");
        assert_eq!(lines[3], "V:                     12");
        assert_eq!(lines[5], "Time step:             1e-09");
        assert_eq!(lines[8], "Max resistance:        100000000");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_dat_files_hold_last_attempt_only() {
        let dir = scratch_dir("dat");
        // Diverges three times before converging; each attempt truncates the files
        let params = CircuitParameters::default()
            .with_l1(0.01)
            .with_t_total(20e-6)
            .with_last_perc(10.0);
        let mut sink = DatFileSink::new(&dir).with_progress(false);

        let outcome = RetryController::new().run(params, &mut sink).unwrap();
        assert!(outcome.converged);

        for name in WAVEFORM_FILES {
            let text = fs::read_to_string(dir.join(name)).unwrap();
            let times: Vec<f64> = text
                .lines()
                .map(|line| {
                    let mut cols = line.split(' ');
                    let t = cols.next().unwrap().parse().unwrap();
                    let _value: f64 = cols.next().unwrap().parse().unwrap();
                    assert!(cols.next().is_none());
                    t
                })
                .collect();
            assert_eq!(times.len(), outcome.last_report.recorded, "{}", name);
            assert!(times.windows(2).all(|w| w[1] > w[0]), "{}", name);
        }

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_directory_is_an_output_error() {
        let dir = std::env::temp_dir().join("zvs_core_does_not_exist").join("nested");
        let mut sink = DatFileSink::new(&dir);
        let err = sink.begin_attempt(&CircuitParameters::default()).unwrap_err();
        assert!(matches!(err, ZvsError::OutputError { .. }));
    }
}
