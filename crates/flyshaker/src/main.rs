mod cli;
mod console;

use clap::Parser;
use flyshaker_audio::{output_device_names, CpalBackend, SilentBackend};
use flyshaker_experiment::{ExperimentController, RunOutcome, Start};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::cli::Args;
use crate::console::ConsoleCommand;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.list_devices {
        for name in output_device_names()? {
            println!("{}", name);
        }
        return Ok(());
    }

    let plan = args.plan()?;
    let mut controller = ExperimentController::new(args.config());

    let started = if args.dry_run {
        controller.start(plan, SilentBackend::new)?
    } else {
        let device = args.device.clone();
        controller.start(plan, move || CpalBackend::new(device.as_deref()))?
    };
    if started == Start::Ignored {
        return Err("experiment did not start".into());
    }

    let (console_tx, console_rx) = mpsc::channel();
    console::spawn_stdin_reader(console_tx)?;
    println!("Experiment running. Press Enter to stop.");

    let report = loop {
        match console_rx.recv_timeout(POLL_INTERVAL) {
            Ok(ConsoleCommand::Stop) => controller.stop(),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => std::thread::sleep(POLL_INTERVAL),
        }
        if let Some(report) = controller.poll()? {
            break report;
        }
    };

    println!("{}", report);
    match report.outcome {
        RunOutcome::Failed(err) => Err(err.into()),
        RunOutcome::Completed | RunOutcome::Cancelled => Ok(()),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
