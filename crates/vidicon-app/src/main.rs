// ABOUTME: Main application entry point.
// ABOUTME: Loads config, sets up logging, and pipes raw RGB24 video through the trail engine.

mod args;
mod pipe;
mod settings;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use args::Args;
use vidicon_core::Config;
use vidicon_engine::VidiconEngine;

fn open_input(path: Option<&Path>) -> Result<Box<dyn Read>> {
    match path {
        Some(p) if p != Path::new("-") => {
            let file = File::open(p).with_context(|| format!("Failed to open {}", p.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(BufReader::new(io::stdin().lock()))),
    }
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(p) if p != Path::new("-") => {
            let file = File::create(p).with_context(|| format!("Failed to create {}", p.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        _ => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_path = Config::default_path();
    let (config, ignored) = settings::load_config(args.config.as_deref(), default_path.as_deref())?;

    // stdout carries video, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    tracing::info!("Starting vidicon");
    if let Some(e) = ignored {
        tracing::warn!("{:#}", e);
    }

    let (options, geometry) = settings::effective(&args, &config)?;
    let mut engine = VidiconEngine::new(options, geometry)?;
    let mut input = open_input(args.input.as_deref())?;
    let mut output = open_output(args.output.as_deref())?;

    let started = Instant::now();
    let frames = pipe::run(&mut engine, &mut input, &mut output)?;
    let elapsed = started.elapsed().as_secs_f64();
    tracing::info!(
        "Filtered {} frames in {:.2}s ({:.1} fps)",
        frames,
        elapsed,
        if elapsed > 0.0 { frames as f64 / elapsed } else { 0.0 }
    );

    Ok(())
}
