use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use pdsim::interactive::{run_session, InteractiveSupplier};
use pdsim::scope::{save_trace, ExportFormat};
use pdsim::utils::constants::SIM_TRANSIENT;
use pdsim::{simulate, InputMode, LoopStrategy, SignalKind, SimulationConfig, SimulationResult};

#[derive(Parser)]
#[command(name = "pdsim")]
#[command(about = "Closed-loop simulation of a second-order plant under PD control")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one simulation from a config file and/or flags
    Run(RunArgs),

    /// Prompt for the parameters, run, and offer to run again
    Interactive {
        /// Config file with defaults for values not prompted for (dt, T, signal shape)
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,

        /// Write each run's trace to this file (overwritten on every run)
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// TOML config file; flags override its values
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Numerator coefficient of s
    #[arg(long, allow_negative_numbers = true)]
    a1: Option<f64>,
    /// Numerator constant term
    #[arg(long, allow_negative_numbers = true)]
    a0: Option<f64>,
    /// Denominator coefficient of s^2 (non-zero)
    #[arg(long, allow_negative_numbers = true)]
    b2: Option<f64>,
    /// Denominator coefficient of s
    #[arg(long, allow_negative_numbers = true)]
    b1: Option<f64>,
    /// Denominator constant term
    #[arg(long, allow_negative_numbers = true)]
    b0: Option<f64>,
    /// Proportional gain
    #[arg(long, allow_negative_numbers = true)]
    kp: Option<f64>,
    /// Derivative gain
    #[arg(long, allow_negative_numbers = true)]
    kd: Option<f64>,

    /// Time step [s]
    #[arg(long, allow_negative_numbers = true)]
    dt: Option<f64>,
    /// Simulation horizon [s]
    #[arg(long = "T", visible_alias = "horizon", allow_negative_numbers = true)]
    horizon: Option<f64>,

    /// Reference signal: rectangular, triangular or harmonic
    #[arg(long)]
    signal: Option<SignalKind>,
    /// Reference amplitude
    #[arg(long, allow_negative_numbers = true)]
    amplitude: Option<f64>,
    /// Harmonic frequency [Hz]
    #[arg(long, allow_negative_numbers = true)]
    frequency: Option<f64>,
    /// Rectangular/triangular half-period [s]
    #[arg(long, allow_negative_numbers = true)]
    duration: Option<f64>,

    /// Input term handling: direct or backward-difference
    #[arg(long = "input-mode")]
    input_mode: Option<InputMode>,
    /// Loop strategy: reintegrate or incremental
    #[arg(long)]
    strategy: Option<LoopStrategy>,

    /// Write the trace (time, reference, output, control) to this file
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,
    /// Trace format; guessed from the output extension when omitted
    #[arg(long)]
    format: Option<ExportFormat>,
    /// Save the effective configuration as TOML for later runs
    #[arg(long = "save-config")]
    save_config: Option<PathBuf>,
}

impl RunArgs {
    fn apply(&self, config: &mut SimulationConfig) {
        let overrides = [
            (self.a1, &mut config.plant.a1),
            (self.a0, &mut config.plant.a0),
            (self.b2, &mut config.plant.b2),
            (self.b1, &mut config.plant.b1),
            (self.b0, &mut config.plant.b0),
            (self.kp, &mut config.controller.kp),
            (self.kd, &mut config.controller.kd),
            (self.dt, &mut config.timing.dt),
            (self.horizon, &mut config.timing.horizon),
            (self.amplitude, &mut config.signal.amplitude),
            (self.frequency, &mut config.signal.frequency),
            (self.duration, &mut config.signal.duration),
        ];
        for (value, slot) in overrides {
            if let Some(v) = value {
                *slot = v;
            }
        }

        if let Some(kind) = self.signal {
            config.signal.kind = kind;
        }
        if let Some(mode) = self.input_mode {
            config.timing.input_mode = mode;
        }
        if let Some(strategy) = self.strategy {
            config.timing.strategy = strategy;
        }
    }
}

fn load_base(path: Option<&Path>) -> Result<SimulationConfig> {
    match path {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(SimulationConfig::default()),
    }
}

fn export(path: &Path, format: Option<ExportFormat>, result: &SimulationResult) -> Result<()> {
    let format = format.unwrap_or_else(|| ExportFormat::from_path(path));
    save_trace(path, result, format)
        .with_context(|| format!("writing trace to {}", path.display()))?;
    info!(path = %path.display(), %format, "trace written");
    Ok(())
}

fn write_summary<W: Write>(
    out: &mut W,
    config: &SimulationConfig,
    result: &SimulationResult,
) -> io::Result<()> {
    writeln!(out, "Signal:          {}", config.signal.kind)?;
    writeln!(out, "Samples:         {}", result.len())?;
    if let Some(y) = result.final_output() {
        writeln!(out, "Final output:    {y:.6}")?;
    }
    match result.peak_tracking_error(SIM_TRANSIENT) {
        Some(e) => writeln!(out, "Peak |error| after t > {SIM_TRANSIENT} s: {e:.6}")?,
        None => writeln!(out, "Horizon ends before t = {SIM_TRANSIENT} s")?,
    }
    if !result.is_finite() {
        writeln!(out, "WARNING: output diverged (non-finite values)")?;
    }
    Ok(())
}

fn run(args: RunArgs) -> Result<()> {
    let mut config = load_base(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate().context("invalid simulation parameters")?;

    if let Some(path) = &args.save_config {
        config
            .save(path)
            .with_context(|| format!("saving config {}", path.display()))?;
    }

    let result = simulate(&config).context("simulation failed")?;
    write_summary(&mut io::stdout().lock(), &config, &result)?;

    if let Some(path) = &args.output {
        export(path, args.format, &result)?;
    }
    Ok(())
}

fn interactive(config: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let base = load_base(config.as_deref())?;
    let stdin = io::stdin();
    let mut supplier = InteractiveSupplier::new(stdin.lock(), io::stdout());

    let runs = run_session(&mut supplier, &base, |config, out| {
        match simulate(config) {
            Ok(result) => {
                write_summary(out, config, &result)?;
                if let Some(path) = &output {
                    if let Err(e) = export(path, None, &result) {
                        writeln!(out, "{e:#}")?;
                    }
                }
            }
            Err(e) => writeln!(out, "Simulation failed: {e}")?,
        }
        Ok(())
    })?;

    info!(runs, "interactive session finished");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Interactive { config, output } => interactive(config, output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "pdsim", "run", "--a1", "1", "--a0", "0", "--b1", "-2", "--kp", "10", "--T", "5",
            "--signal", "harmonic", "--input-mode", "backward-difference",
        ])
        .unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run subcommand");
        };

        let mut config = SimulationConfig::default();
        args.apply(&mut config);
        assert_eq!(config.plant.a0, 0.0);
        assert_eq!(config.plant.b1, -2.0);
        assert_eq!(config.controller.kp, 10.0);
        assert_eq!(config.controller.kd, 1.0);
        assert_eq!(config.timing.horizon, 5.0);
        assert_eq!(config.signal.kind, SignalKind::Harmonic);
        assert_eq!(config.timing.input_mode, InputMode::BackwardDifference);
    }

    #[test]
    fn test_unknown_signal_rejected() {
        assert!(Cli::try_parse_from(["pdsim", "run", "--signal", "sawtooth"]).is_err());
    }

    #[test]
    fn test_zero_b2_fails_run() {
        let args = RunArgs {
            b2: Some(0.0),
            ..RunArgs::default()
        };
        assert!(run(args).is_err());
    }
}
