//! `shoplist` terminal frontend.

use std::io::{self, BufRead, Write};

use anyhow::Context;

use shoplist_app::{AppConfig, Shell};

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    shoplist_observability::init(&config.tracing);
    for warning in &config.warnings {
        tracing::warn!("{warning}");
    }
    tracing::info!(format = ?config.tracing.format, "starting shoplist");

    let mut shell = Shell::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    write!(stdout, "{}> ", shell.banner())?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read from stdin")?;
        let reply = shell.handle_line(&line)?;
        if reply.quit {
            break;
        }
        write!(stdout, "{}> ", reply.output)?;
        stdout.flush()?;
    }

    tracing::info!(products = shell.screen().store().len(), "shoplist exiting");
    Ok(())
}
