use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::backend::{cpu_device, gpu_device, BackendKind, CpuBackend, GpuBackend};
use crate::config::Zoo;

mod backend;
mod check;
mod config;
mod describe;
mod probe;

#[derive(Parser, Debug)]
#[command(author, version, long_about = None)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Checks model names against the registered families.
    Check {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Writes the hyperparameters and layer summary of the configured model.
    Describe {
        #[arg(short = 'c', long, value_name = "CONFIG_FILE")]
        config: String,
    },
    /// Runs the configured model on the first test batch.
    Probe {
        #[arg(short = 'c', long, value_name = "CONFIG_FILE")]
        config: String,
        #[arg(long, value_name = "DIR")]
        image_dir: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = CliArgs::parse();
    let start = std::time::Instant::now();
    match args.command {
        Command::Check { names } => {
            let rejected = check::check_names(&names);
            if rejected > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Describe { config } => {
            let zoo = Zoo::new(&config)?;
            zoo.init_logger()?;
            match zoo.settings().experiment.backend {
                BackendKind::Wgpu => describe::describe::<GpuBackend>(&zoo, gpu_device())?,
                BackendKind::NdArray => describe::describe::<CpuBackend>(&zoo, cpu_device())?,
            }
        }
        Command::Probe { config, image_dir } => {
            let zoo = Zoo::new(&config)?;
            zoo.init_logger()?;
            let image_dir = image_dir.as_deref();
            let report = match zoo.settings().experiment.backend {
                BackendKind::Wgpu => probe::probe::<GpuBackend>(&zoo, gpu_device(), image_dir)?,
                BackendKind::NdArray => probe::probe::<CpuBackend>(&zoo, cpu_device(), image_dir)?,
            };
            println!(
                "{} examples, loss {:.4}, {} correct",
                report.examples, report.loss, report.correct
            );
        }
    }
    println!("Finished in {} ms.", start.elapsed().as_millis());
    Ok(ExitCode::SUCCESS)
}
