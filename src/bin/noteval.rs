use std::error::Error;
use std::io::{self, Write};

use note_eval::cli::{self, CliError, NotevalArgs};
use ortho_config::OrthoConfig;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    let args = match NotevalArgs::load() {
        Ok(args) => args,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            std::process::exit(2);
        }
    };

    let mut stdout = io::stdout().lock();
    let outcome = cli::run(&args, &mut stdout).and_then(|()| stdout.flush().map_err(CliError::from));
    if let Err(err) = outcome {
        error!(error = %err, "evaluation failed");
        let mut cause = err.source();
        while let Some(inner) = cause {
            error!(cause = %inner, "caused by");
            cause = inner.source();
        }
        std::process::exit(if err.is_configuration() { 2 } else { 1 });
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
