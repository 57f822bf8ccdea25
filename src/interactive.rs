//! Interactive configuration prompts
//!
//! Builds a [`SimulationConfig`] from a question-and-answer session on any
//! reader/writer pair. All prompting finishes before the core runs; the
//! simulation itself never reads input.
//!
//! Session flow:
//! 1. Pick a reference signal (`1`/`2`/`3`, `q` quits).
//! 2. Enter `a1, a0, b2, b1, b0, Kp, Kd`.
//! 3. After each run, `1` runs again; on a rerun the edit menu shows the
//!    current values and `9` keeps them.
//!
//! End of input is treated like quitting.

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::config::SimulationConfig;
use crate::signals::SignalKind;

const PLANT_FORMULA: &str = "G(s) = (a1*s + a0) / (b2*s^2 + b1*s + b0)";

/// Coefficient editable from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coefficient {
    A1,
    A0,
    B2,
    B1,
    B0,
    Kp,
    Kd,
}

impl Coefficient {
    /// Prompt and menu order
    pub const ALL: [Coefficient; 7] = [
        Coefficient::A1,
        Coefficient::A0,
        Coefficient::B2,
        Coefficient::B1,
        Coefficient::B0,
        Coefficient::Kp,
        Coefficient::Kd,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Coefficient::A1 => "a1",
            Coefficient::A0 => "a0",
            Coefficient::B2 => "b2",
            Coefficient::B1 => "b1",
            Coefficient::B0 => "b0",
            Coefficient::Kp => "Kp",
            Coefficient::Kd => "Kd",
        }
    }

    fn slot(self, config: &mut SimulationConfig) -> &mut f64 {
        match self {
            Coefficient::A1 => &mut config.plant.a1,
            Coefficient::A0 => &mut config.plant.a0,
            Coefficient::B2 => &mut config.plant.b2,
            Coefficient::B1 => &mut config.plant.b1,
            Coefficient::B0 => &mut config.plant.b0,
            Coefficient::Kp => &mut config.controller.kp,
            Coefficient::Kd => &mut config.controller.kd,
        }
    }

    pub fn get(self, config: &SimulationConfig) -> f64 {
        let mut copy = *config;
        *self.slot(&mut copy)
    }

    pub fn set(self, config: &mut SimulationConfig, value: f64) {
        *self.slot(config) = value;
    }
}

/// Prompt-driven configuration supplier
pub struct InteractiveSupplier<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InteractiveSupplier<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Writer used for prompts, for callers reporting run results
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    fn read_answer(&mut self) -> io::Result<Option<String>> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Show the signal menu until a valid choice is made
    ///
    /// Returns `None` on `q` or end of input.
    pub fn choose_signal(&mut self) -> io::Result<Option<SignalKind>> {
        loop {
            writeln!(self.output, "========= Select reference signal =========")?;
            writeln!(self.output, "\t[1] Rectangular")?;
            writeln!(self.output, "\t[2] Triangular")?;
            writeln!(self.output, "\t[3] Harmonic")?;
            writeln!(self.output, "\t[q] Quit")?;
            writeln!(self.output, "===========================================")?;

            let Some(answer) = self.read_answer()? else {
                return Ok(None);
            };
            let kind = match answer.as_str() {
                "1" => SignalKind::Rectangular,
                "2" => SignalKind::Triangular,
                "3" => SignalKind::Harmonic,
                "q" => return Ok(None),
                _ => {
                    writeln!(self.output, "Invalid choice, try again.")?;
                    continue;
                }
            };
            writeln!(self.output, "Selected signal: {kind}")?;
            return Ok(Some(kind));
        }
    }

    /// Ask for one coefficient until a finite number is entered
    ///
    /// `b2` must also be non-zero. Returns `None` on end of input.
    pub fn read_coefficient(&mut self, coefficient: Coefficient) -> io::Result<Option<f64>> {
        let name = coefficient.name();
        loop {
            write!(self.output, "Enter {name}: ")?;
            let Some(answer) = self.read_answer()? else {
                return Ok(None);
            };
            match answer.parse::<f64>() {
                Ok(v) if !v.is_finite() => writeln!(self.output, "{name} must be finite.")?,
                Ok(v) if coefficient == Coefficient::B2 && v == 0.0 => {
                    writeln!(self.output, "b2 must be non-zero.")?
                }
                Ok(v) => return Ok(Some(v)),
                Err(_) => writeln!(self.output, "'{answer}' is not a number, try again.")?,
            }
        }
    }

    /// First-run prompts: signal, then every coefficient
    ///
    /// Fields not asked for (timing, signal shape) are taken from `base`.
    pub fn initial_config(
        &mut self,
        base: &SimulationConfig,
    ) -> io::Result<Option<SimulationConfig>> {
        let mut config = *base;
        let Some(kind) = self.choose_signal()? else {
            return Ok(None);
        };
        config.signal.kind = kind;

        writeln!(self.output, "Plant: {PLANT_FORMULA}")?;
        for coefficient in Coefficient::ALL {
            let Some(value) = self.read_coefficient(coefficient)? else {
                return Ok(None);
            };
            coefficient.set(&mut config, value);
        }

        debug!(?config, "interactive configuration complete");
        Ok(Some(config))
    }

    /// `true` if the user answers `1`
    pub fn ask_rerun(&mut self) -> io::Result<bool> {
        writeln!(self.output, "Run the simulation again?\n[1] Yes\n[2] No")?;
        Ok(matches!(self.read_answer()?.as_deref(), Some("1")))
    }

    /// Edit menu over the previous run's configuration
    ///
    /// Returns the (possibly) modified config when `9` is chosen, `None` if
    /// the input ends or the signal menu is quit.
    pub fn edit_config(
        &mut self,
        previous: &SimulationConfig,
    ) -> io::Result<Option<SimulationConfig>> {
        let mut config = *previous;
        writeln!(self.output, "Change the parameters?")?;
        writeln!(self.output, "Plant: {PLANT_FORMULA}")?;

        loop {
            for (i, coefficient) in Coefficient::ALL.into_iter().enumerate() {
                writeln!(
                    self.output,
                    "[{}] {} = {}",
                    i + 1,
                    coefficient.name(),
                    coefficient.get(&config)
                )?;
            }
            writeln!(self.output, "[8] Change signal ({})", config.signal.kind)?;
            writeln!(self.output, "[9] Keep parameters and run")?;

            let Some(answer) = self.read_answer()? else {
                return Ok(None);
            };
            match answer.parse::<usize>() {
                Ok(choice @ 1..=7) => {
                    let coefficient = Coefficient::ALL[choice - 1];
                    let Some(value) = self.read_coefficient(coefficient)? else {
                        return Ok(None);
                    };
                    coefficient.set(&mut config, value);
                }
                Ok(8) => match self.choose_signal()? {
                    Some(kind) => config.signal.kind = kind,
                    None => return Ok(None),
                },
                Ok(9) => return Ok(Some(config)),
                _ => writeln!(self.output, "Invalid choice, try again.")?,
            }
        }
    }

    /// Configuration for the next run, or `None` when the session is over
    pub fn next_config(
        &mut self,
        base: &SimulationConfig,
        previous: Option<&SimulationConfig>,
    ) -> io::Result<Option<SimulationConfig>> {
        match previous {
            None => self.initial_config(base),
            Some(previous) => {
                if self.ask_rerun()? {
                    self.edit_config(previous)
                } else {
                    Ok(None)
                }
            }
        }
    }
}

/// Drive a whole session, calling `run` once per configuration
///
/// `run` receives the prompt writer so it can report results in line with
/// the prompts. Returns the number of runs performed.
pub fn run_session<R, W, F>(
    supplier: &mut InteractiveSupplier<R, W>,
    base: &SimulationConfig,
    mut run: F,
) -> io::Result<usize>
where
    R: BufRead,
    W: Write,
    F: FnMut(&SimulationConfig, &mut W) -> io::Result<()>,
{
    let mut previous: Option<SimulationConfig> = None;
    let mut runs = 0;

    while let Some(config) = supplier.next_config(base, previous.as_ref())? {
        run(&config, supplier.output())?;
        runs += 1;
        previous = Some(config);
    }

    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plant::PlantParameters;
    use std::io::Cursor;

    fn supplier(script: &str) -> InteractiveSupplier<Cursor<Vec<u8>>, Vec<u8>> {
        InteractiveSupplier::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_initial_config_reads_everything() {
        let mut s = supplier("3\n1\n0\n1\n2\n1\n10\n2\n");
        let config = s.initial_config(&SimulationConfig::default()).unwrap().unwrap();

        assert_eq!(config.signal.kind, SignalKind::Harmonic);
        assert_eq!(config.plant.a0, 0.0);
        assert_eq!(config.plant.b1, 2.0);
        assert_eq!(config.controller.kp, 10.0);
        assert_eq!(config.controller.kd, 2.0);
    }

    #[test]
    fn test_invalid_answers_reprompt() {
        let mut s = supplier("7\nx\n2\nabc\n1\n");
        assert_eq!(s.choose_signal().unwrap(), Some(SignalKind::Triangular));
        assert_eq!(s.read_coefficient(Coefficient::A1).unwrap(), Some(1.0));

        let (_, out) = s.into_inner();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches("Invalid choice").count(), 2);
        assert!(out.contains("'abc' is not a number"));
    }

    #[test]
    fn test_zero_b2_reprompts() {
        let mut s = supplier("0\n0.5\n");
        assert_eq!(s.read_coefficient(Coefficient::B2).unwrap(), Some(0.5));
    }

    #[test]
    fn test_quit_and_eof() {
        assert_eq!(supplier("q\n").choose_signal().unwrap(), None);
        assert_eq!(supplier("").choose_signal().unwrap(), None);
        assert_eq!(supplier("1\n1.0\n").initial_config(&SimulationConfig::default()).unwrap(), None);
    }

    #[test]
    fn test_each_coefficient_has_its_own_slot() {
        let mut config = SimulationConfig::default();
        for (i, coefficient) in Coefficient::ALL.into_iter().enumerate() {
            coefficient.set(&mut config, 10.0 + i as f64);
        }

        assert_eq!(config.plant, PlantParameters::new(10.0, 11.0, 12.0, 13.0, 14.0).unwrap());
        assert_eq!(config.controller.kp, 15.0);
        assert_eq!(config.controller.kd, 16.0);
        for (i, coefficient) in Coefficient::ALL.into_iter().enumerate() {
            assert_eq!(coefficient.get(&config), 10.0 + i as f64);
        }
    }

    #[test]
    fn test_edit_menu_targets_kd() {
        let previous = SimulationConfig::default();
        let mut s = supplier("7\n0.25\n9\n");
        let config = s.edit_config(&previous).unwrap().unwrap();

        assert_eq!(config.controller.kd, 0.25);
        assert_eq!(config.controller.kp, previous.controller.kp);
        assert_eq!(config.plant, previous.plant);
    }

    #[test]
    fn test_edit_menu() {
        let previous = SimulationConfig::default();
        let mut s = supplier("6\n4.5\n8\n3\n42\n9\n");
        let config = s.edit_config(&previous).unwrap().unwrap();

        assert_eq!(config.controller.kp, 4.5);
        assert_eq!(config.signal.kind, SignalKind::Harmonic);
        assert_eq!(config.plant, previous.plant);
    }

    #[test]
    fn test_session_runs_until_declined() {
        // first run, rerun with unchanged parameters, then stop
        let mut s = supplier("1\n1\n1\n1\n1\n1\n1\n1\n1\n9\n2\n");
        let mut seen = Vec::new();
        let runs = run_session(&mut s, &SimulationConfig::default(), |config, out| {
            seen.push(*config);
            writeln!(out, "ran")
        })
        .unwrap();

        assert_eq!(runs, 2);
        assert_eq!(seen[0], seen[1]);
        assert_eq!(seen[0].signal.kind, SignalKind::Rectangular);
    }
}
