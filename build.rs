use parameter_store::{Parameters, PARAMETER_BLOCK_SIZE};
use ron::de::from_str;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = Path::new("config/parameters.ron");

    // Read and validate the configuration. Deserializing the key map rejects duplicate
    // keys and labels that do not fit.
    let config_str = fs::read_to_string(config_path)?;
    let params: Parameters = from_str(&config_str)?;

    let serialized = postcard_size(&params)?;
    if serialized + 8 > PARAMETER_BLOCK_SIZE {
        return Err(format!(
            "parameters serialize to {serialized} bytes, the flash block holds {}",
            PARAMETER_BLOCK_SIZE - 8
        )
        .into());
    }

    // Setup output path
    let out_dir = env::var_os("CARGO_MANIFEST_DIR").ok_or("CARGO_MANIFEST_DIR not set")?;
    let dest_path = Path::new(&out_dir).join("src/built/parameters.rs");

    // Create parent directories if they don't exist
    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let keys = params
        .keymap
        .iter()
        .map(|e| format!("    (0x{:02X}, {:?}),\n", e.key, e.label.as_str()))
        .collect::<String>();

    let content = format!(
        r#"use nec_codec::ScanCode;

pub const DEFAULT_SCAN_CODE: ScanCode = ScanCode {{
    address: 0x{:04X},
    command: 0x{:04X},
}};

pub const DEFAULT_TX_INTERVAL_SECS: u32 = {};

pub const DEFAULT_KEYS: &[(u8, &str)] = &[
{}];
"#,
        params.transmit.address, params.transmit.command, params.transmit_interval_secs, keys,
    );

    File::create(&dest_path)?.write_all(content.as_bytes())?;

    // Tell Cargo to rerun this if files change
    println!("cargo:rerun-if-changed=config/parameters.ron");
    println!("cargo:rerun-if-changed=build.rs");

    Ok(())
}

fn postcard_size(params: &Parameters) -> Result<usize, Box<dyn std::error::Error>> {
    let bytes = postcard::to_allocvec(params).map_err(|e| format!("serializing parameters: {e}"))?;
    Ok(bytes.len())
}
