use std::{fs::OpenOptions, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use nec_codec::ScanCode;
use parameter_store::*;

/// Inspect or edit a parameter block image before it is flashed.
#[derive(Parser, Debug)]
struct Args {
    file: PathBuf,
    /// Start from an empty parameter block instead of reading `file`
    #[arg(short, long)]
    create: bool,
    /// Replace all parameters with the contents of a RON parameter file
    #[arg(long)]
    import: Option<PathBuf>,
    /// Set the address of the periodically transmitted scan code
    #[arg(long, value_parser = parse_u16)]
    address: Option<u16>,
    /// Set the command of the periodically transmitted scan code
    #[arg(long, value_parser = parse_u16)]
    command: Option<u16>,
    /// Set the periodic transmit interval in seconds, 0 disables it
    #[arg(long)]
    interval: Option<u32>,
    /// Map a key byte to a label, e.g. 0xBA=POWER
    #[arg(long, value_parser = parse_key)]
    key: Vec<(u8, String)>,
    #[arg(short, long)]
    verbose: bool,
}

fn parse_u16(s: &str) -> Result<u16, String> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    }
    .map_err(|e| format!("invalid value {s:?}: {e}"))
}

fn parse_key(s: &str) -> Result<(u8, String), String> {
    let (key, label) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=LABEL, got {s:?}"))?;
    let key = parse_u16(key)?;
    let key = u8::try_from(key).map_err(|_| format!("key 0x{key:X} does not fit in a byte"))?;
    Ok((key, label.to_string()))
}

pub fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let f = OpenOptions::new()
        .create_new(args.create)
        .read(true)
        .write(true)
        .open(&args.file)
        .with_context(|| format!("opening {}", args.file.display()))?;
    let io = FileIO::new(f);
    let mut store: ParameterStore<Parameters, _> = ParameterStore::new(io);
    let mut params = if args.create {
        let p = Parameters::default();
        store.store(&p)?;
        p
    } else {
        store.fetch()?
    };
    let mut modified = false;

    if let Some(path) = args.import {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        params = ron::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        modified = true;
    }
    if args.address.is_some() || args.command.is_some() {
        params.transmit = ScanCode::new(
            args.address.unwrap_or(params.transmit.address),
            args.command.unwrap_or(params.transmit.command),
        );
        modified = true;
    }
    if let Some(interval) = args.interval {
        params.transmit_interval_secs = interval;
        modified = true;
    }
    for (key, label) in &args.key {
        params.keymap.insert(*key, label)?;
        modified = true;
    }

    if modified {
        params = store.store(&params)?;
    }

    if !modified || args.verbose {
        println!("Transmit: {}", params.transmit);
        match params.transmit_interval_secs {
            0 => println!("Transmit interval: disabled"),
            s => println!("Transmit interval: {s}s"),
        }
        println!("Keys ({}):", params.keymap.len());
        for entry in params.keymap.iter() {
            println!("  0x{:02X} {}", entry.key, entry.label);
        }
    }
    Ok(())
}
