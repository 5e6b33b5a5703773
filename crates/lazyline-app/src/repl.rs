//! The interactive loop: stdin commands, the read-ahead prompt, and Ctrl-C.

use std::io::Write;
use std::path::PathBuf;

use lazyline_common::{LazylineError, Result};
use lazyline_window::CancellationToken;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, info, warn};

use crate::commands::{is_yes, Command};
use crate::session::{Reply, Session};

type Input = Lines<BufReader<Stdin>>;

pub async fn run(mut session: Session, file: Option<PathBuf>) -> Result<()> {
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    if let Some(path) = file {
        dispatch(&mut session, &mut input, Command::Open(path)).await?;
    } else {
        println!("type 'help' for commands");
    }

    loop {
        prompt("> ");
        let line = tokio::select! {
            line = input.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            println!();
            break;
        };

        match Command::parse(&line) {
            Ok(Some(command)) => {
                if !dispatch(&mut session, &mut input, command).await? {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => eprintln!("{e}"),
        }
    }

    info!("session ended");
    Ok(())
}

/// Run one command; `false` means the user asked to quit.
async fn dispatch(session: &mut Session, input: &mut Input, command: Command) -> Result<bool> {
    debug!(?command, "dispatch");
    match session.execute(command) {
        Ok(Reply::Text(text)) => println!("{}", text.trim_end()),
        Ok(Reply::Quit) => return Ok(false),
        Ok(Reply::Miss { pattern }) => {
            println!("no further match for {pattern:?} in the window");
            if session.config().search.confirm_read_ahead {
                prompt("Read more lines? [y/N] ");
                let answer = input.next_line().await?.unwrap_or_default();
                if !is_yes(&answer) {
                    return Ok(true);
                }
            }
            match read_ahead(session, &pattern).await {
                Ok(text) => println!("{}", text.trim_end()),
                Err(e) => report(&e),
            }
        }
        Err(e) => report(&e),
    }
    Ok(true)
}

/// Read forward on a blocking worker until `pattern` matches; Ctrl-C stops
/// the worker between two line reads.
async fn read_ahead(session: &mut Session, pattern: &str) -> Result<String> {
    let Some(job) = session.begin_read_ahead(pattern)? else {
        return Ok("nothing left to read".into());
    };
    println!("reading ahead (Ctrl-C to stop)...");

    let token = CancellationToken::new();
    let worker_token = token.clone();
    let mut worker = tokio::task::spawn_blocking(move || job.run(&worker_token));

    let joined = tokio::select! {
        joined = &mut worker => joined,
        _ = tokio::signal::ctrl_c() => {
            info!("read-ahead cancel requested");
            token.cancel();
            worker.await
        }
    };
    match joined {
        Ok(report) => session.finish_read_ahead(report),
        Err(e) => {
            session.abandon_read_ahead();
            Err(LazylineError::Other(format!(
                "read-ahead worker failed ({e}); file closed, reopen it to continue"
            )))
        }
    }
}

fn report(err: &LazylineError) {
    if err.is_recoverable() {
        warn!("{err}");
    } else {
        tracing::error!("{err}");
    }
    eprintln!("error: {err}");
}

fn prompt(text: &str) {
    print!("{text}");
    let _ = std::io::stdout().flush();
}
