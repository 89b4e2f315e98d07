use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rcut::*;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

/// rcut - turn operations with precomputed toolpaths into router G-code
#[derive(Parser, Debug)]
#[command(name = "rcut")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a program from a job file
    Generate {
        /// Job file (JSON)
        job: PathBuf,
        /// Machine config used when the job has none [default: ~/.rcut/machine.json]
        #[arg(long)]
        machine: Option<PathBuf>,
        /// Override the job's output units (mm or inch)
        #[arg(long)]
        units: Option<UnitSystem>,
        /// Write the program here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write a default machine config
    InitMachine {
        /// Destination [default: ~/.rcut/machine.json]
        #[arg(long)]
        path: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the path coordinate scale factor
    Scale {
        #[arg(long, default_value = "mm")]
        units: UnitSystem,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.debug) {
        eprintln!("warning: {err:#}");
    }

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ValidationError>() {
                Some(validation) => eprintln!("error: {validation}"),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Generate {
            job,
            machine,
            units,
            output,
        } => generate(job, machine, units, output),
        Command::InitMachine { path, force } => init_machine(path, force),
        Command::Scale { units } => {
            println!("{}", scale_factor(units));
            Ok(())
        }
    }
}

fn generate(
    job_path: PathBuf,
    machine_path: Option<PathBuf>,
    units: Option<UnitSystem>,
    output: Option<PathBuf>,
) -> Result<()> {
    let job = Job::load_from_path(&job_path)?;
    let machine_path = match machine_path {
        Some(path) => path,
        None => MachineConfig::default_config_path()?,
    };
    let machine = job.machine_config(&machine_path)?;
    let units = units.unwrap_or(job.units);

    let emitter = GcodeEmitter::new();
    let handle = emitter.generate(&job.operations, &machine, units)?;
    let program = handle
        .program()
        .context("published program is no longer available")?;

    match output {
        Some(path) => {
            program.save_to_path(&path)?;
            tracing::info!(path = %path.display(), "wrote gcode");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(program.text().as_bytes())
                .context("write gcode to stdout")?;
            stdout.flush().context("flush stdout")?;
        }
    }
    Ok(())
}

fn init_machine(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => MachineConfig::default_config_path()?,
    };
    if path.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite",
            path.display()
        );
    }
    MachineConfig::default().save_to_path(&path)?;
    println!("wrote {}", path.display());
    Ok(())
}
