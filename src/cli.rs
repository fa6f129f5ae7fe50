//! Argument parsing for the three binaries. Flags override environment
//! defaults; unknown flags are an error.

use std::path::PathBuf;

use eyre::{bail, eyre, Result};

use crate::config::{DataPaths, DEFAULT_ADDRESS, DEFAULT_PORT, MAX_PAGES};
use crate::dashboard::ServerOptions;

pub const SCRAPE_USAGE: &str = "Usage: brand_monitor [--out-dir <dir>] [--max-pages <n>]";
pub const SCORE_USAGE: &str = "Usage: score [--data-dir <dir>]";
pub const DASHBOARD_USAGE: &str = "Usage: dashboard [--port <n>] [--address <ip>] [--data-dir <dir>] [--enable-cors | --disable-cors]";

/// Either run with the parsed options or print usage and stop.
#[derive(Debug)]
pub enum Command<T> {
    Run(T),
    Help,
}

#[derive(Debug, Clone)]
pub struct ScrapeArgs {
    pub out_dir: PathBuf,
    pub max_pages: u32,
}

#[derive(Debug, Clone)]
pub struct ScoreArgs {
    pub data_dir: PathBuf,
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next().ok_or_else(|| eyre!("Missing value for {flag}"))
}

pub fn parse_scrape(args: impl IntoIterator<Item = String>) -> Result<Command<ScrapeArgs>> {
    let mut parsed = ScrapeArgs {
        out_dir: DataPaths::from_env().dir,
        max_pages: MAX_PAGES,
    };
    let mut args = args.into_iter();
    while let Some(a) = args.next() {
        match a.as_str() {
            "-o" | "--out-dir" => parsed.out_dir = PathBuf::from(value(&mut args, &a)?),
            "--max-pages" => {
                let v: u32 = value(&mut args, &a)?.parse()?;
                if v == 0 {
                    bail!("--max-pages must be at least 1");
                }
                parsed.max_pages = v;
            }
            "-h" | "--help" => return Ok(Command::Help),
            _ => bail!("Unknown arg: {a}"),
        }
    }
    Ok(Command::Run(parsed))
}

pub fn parse_score(args: impl IntoIterator<Item = String>) -> Result<Command<ScoreArgs>> {
    let mut parsed = ScoreArgs {
        data_dir: DataPaths::from_env().dir,
    };
    let mut args = args.into_iter();
    while let Some(a) = args.next() {
        match a.as_str() {
            "-d" | "--data-dir" => parsed.data_dir = PathBuf::from(value(&mut args, &a)?),
            "-h" | "--help" => return Ok(Command::Help),
            _ => bail!("Unknown arg: {a}"),
        }
    }
    Ok(Command::Run(parsed))
}

/// `PORT` sets the default port, as deployment platforms expect.
pub fn parse_dashboard(args: impl IntoIterator<Item = String>) -> Result<Command<ServerOptions>> {
    let port = match std::env::var("PORT") {
        Ok(p) => p.parse().map_err(|_| eyre!("PORT is not a port number: {p}"))?,
        Err(_) => DEFAULT_PORT,
    };
    let mut parsed = ServerOptions {
        address: DEFAULT_ADDRESS.into(),
        port,
        data_dir: DataPaths::from_env().dir,
        enable_cors: false,
    };

    let mut args = args.into_iter();
    while let Some(a) = args.next() {
        match a.as_str() {
            "-p" | "--port" => parsed.port = value(&mut args, &a)?.parse()?,
            "-a" | "--address" => parsed.address = value(&mut args, &a)?,
            "-d" | "--data-dir" => parsed.data_dir = PathBuf::from(value(&mut args, &a)?),
            "--enable-cors" => parsed.enable_cors = true,
            "--disable-cors" => parsed.enable_cors = false,
            "-h" | "--help" => return Ok(Command::Help),
            _ => bail!("Unknown arg: {a}"),
        }
    }
    Ok(Command::Run(parsed))
}
