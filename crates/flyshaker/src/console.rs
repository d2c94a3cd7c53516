use std::io::BufRead;
use std::sync::mpsc::Sender;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Stop,
}

/// Read operator input from stdin on a background thread.
///
/// Any entered line requests a stop. End of input closes the channel without
/// stopping, so a detached run with stdin closed keeps going.
pub fn spawn_stdin_reader(tx: Sender<ConsoleCommand>) -> std::io::Result<()> {
    std::thread::Builder::new()
        .name("flyshaker-console".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                debug!(input = %line.trim(), "console input");
                if tx.send(ConsoleCommand::Stop).is_err() {
                    break;
                }
            }
        })?;
    Ok(())
}
