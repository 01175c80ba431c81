//! Generates `app_metadata.rs` in `OUT_DIR`.
//!
//! The generated file holds the package name, version, the string values of
//! `[package.metadata]` and the AES key material used for stored tokens.
//! Key material comes from `TOKEN_KEY` / `TOKEN_IV` (environment or `.env`);
//! without them a deterministic development key is derived from the package
//! name and owner.

use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use toml::Value;

const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;

struct MetadataWriter {
    out: BufWriter<File>,
}

impl MetadataWriter {
    fn create(path: &Path) -> io::Result<Self> {
        Ok(Self {
            out: BufWriter::new(File::create(path)?),
        })
    }

    fn text(&mut self, name: &str, value: &str) -> io::Result<()> {
        writeln!(self.out, "#[allow(unused)]\npub const APP_METADATA_{}: &str = {:?};", name.to_uppercase(), value)
    }

    fn bytes(&mut self, name: &str, value: &[u8]) -> io::Result<()> {
        let list = value.iter().map(u8::to_string).collect::<Vec<_>>().join(", ");
        writeln!(
            self.out,
            "#[allow(unused)]\npub const APP_METADATA_{}: &[u8; {}] = &[{}];",
            name.to_uppercase(),
            value.len(),
            list
        )
    }
}

fn invalid(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}

/// Pads with `!` or truncates to exactly `len` bytes.
fn fit(seed: String, len: usize) -> Vec<u8> {
    let mut bytes = seed.into_bytes();
    bytes.resize(len, b'!');
    bytes
}

fn key_material(package: &str, owner: &str) -> io::Result<(Vec<u8>, Vec<u8>)> {
    match (env::var("TOKEN_KEY"), env::var("TOKEN_IV")) {
        (Ok(key), Ok(iv)) => {
            if key.len() != KEY_LEN {
                return Err(invalid(format!("TOKEN_KEY must be {} bytes, got {}", KEY_LEN, key.len())));
            }
            if iv.len() != IV_LEN {
                return Err(invalid(format!("TOKEN_IV must be {} bytes, got {}", IV_LEN, iv.len())));
            }
            Ok((key.into_bytes(), iv.into_bytes()))
        }
        _ => {
            println!("cargo:warning=TOKEN_KEY / TOKEN_IV not set, stored tokens use a development key");
            Ok((fit(format!("{}:{}:token-key", owner, package), KEY_LEN), fit(format!("{}-iv", package), IV_LEN)))
        }
    }
}

fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-changed=.env");
    println!("cargo:rerun-if-env-changed=TOKEN_KEY");
    println!("cargo:rerun-if-env-changed=TOKEN_IV");
    let _ = dotenv::dotenv();

    let manifest: Value = toml::from_str(&fs::read_to_string("Cargo.toml")?).map_err(|e| invalid(e.to_string()))?;
    let metadata = manifest.get("package").and_then(|p| p.get("metadata")).and_then(Value::as_table);

    let package = env::var("CARGO_PKG_NAME").unwrap_or_else(|_| "billable".to_string());
    let owner = metadata
        .and_then(|m| m.get("owner"))
        .and_then(Value::as_str)
        .unwrap_or("billable")
        .to_string();

    let out_dir = env::var("OUT_DIR").map_err(|e| invalid(e.to_string()))?;
    let mut writer = MetadataWriter::create(&Path::new(&out_dir).join("app_metadata.rs"))?;
    writer.text("name", &package)?;
    writer.text("version", &env::var("CARGO_PKG_VERSION").unwrap_or_default())?;
    for (key, value) in metadata.into_iter().flatten() {
        if let Some(value) = value.as_str() {
            writer.text(key, value)?;
        }
    }

    let (key, iv) = key_material(&package, &owner)?;
    writer.bytes("encryption_key", &key)?;
    writer.bytes("encryption_iv", &iv)?;
    writer.out.flush()
}
