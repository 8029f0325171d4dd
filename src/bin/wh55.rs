//! WH55 Command Line Interface
//!
//! Decodes captured WH55 transmissions from a capture file (or stdin) and
//! prints one JSON record per successfully decoded frame.
//!
//! Usage:
//!   wh55 capture.txt          # decode rows from a file
//!   wh55 -                    # decode rows from stdin
//!   wh55 --verbose capture.txt
//!   wh55 --version
//!   wh55 --help
//!
//! Capture format: one row per line, hex digits, optionally followed by
//! `:<bits>` when the row does not end on a byte boundary. Blank lines and
//! lines starting with `#` are ignored.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use wh55::{decode, BitRow, Report};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Captured channel-1 row shown in the help text: preamble run, sync word,
/// and one valid frame (160 bits).
const EXAMPLE_ROW: &str = "aaaaaaaaaaaaaaaa2dd4550107a40502dfbea449";

/// Print version information.
fn print_version() {
    println!("wh55 {VERSION}");
}

/// Print help message with usage information.
fn print_help(prog_name: &str) {
    println!("Fine Offset WH55 water leak sensor decoder (v{VERSION})");
    println!("=====================================================\n");
    println!("Decodes demodulated FSK PCM bit rows (58 us pulse width,");
    println!("preamble aaaa aaaa, sync word 2dd4) into JSON records.\n");
    println!("Usage:");
    println!("  {prog_name} [options] <capture>\n");
    println!("Arguments:");
    println!("  capture        Capture file, or '-' for stdin.");
    println!("                 One row per line: hex digits, optional ':<bits>'");
    println!("                 suffix for rows not ending on a byte boundary.");
    println!("                 Blank lines and '#' comments are ignored.\n");
    println!("Options:");
    println!("  -V, --verbose  Log reject diagnostics to stderr");
    println!("  -h, --help     Show this help message");
    println!("  -v, --version  Show version information\n");
    println!("Example:");
    println!("  echo '{EXAMPLE_ROW}' | {prog_name} -");
}

/// Parse one capture line into a bit row.
///
/// Accepts hex digits with optional whitespace between them and an optional
/// `:<bits>` suffix; without the suffix every hex digit contributes 4 bits.
fn parse_row(line: &str) -> Result<BitRow, String> {
    let (hex_part, bits_part) = match line.split_once(':') {
        Some((h, b)) => (h, Some(b)),
        None => (line, None),
    };

    let digits: String = hex_part.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.is_empty() {
        return Err("empty row".to_string());
    }

    let mut bytes = Vec::with_capacity((digits.len() + 1) / 2);
    let mut chars = digits.chars();
    loop {
        let Some(hi) = chars.next() else { break };
        let hi = hi.to_digit(16).ok_or_else(|| format!("bad hex digit '{hi}'"))?;
        let lo = match chars.next() {
            Some(c) => c.to_digit(16).ok_or_else(|| format!("bad hex digit '{c}'"))?,
            // Odd digit count: last nibble is the high half of a short byte
            None => 0,
        };
        bytes.push(((hi << 4) | lo) as u8);
    }

    let num_bits = match bits_part {
        Some(b) => {
            let bits = b
                .trim()
                .parse::<usize>()
                .map_err(|_| format!("bad bit count '{}'", b.trim()))?;
            if bits > bytes.len() * 8 {
                return Err(format!("bit count {bits} exceeds row data"));
            }
            bits
        }
        None => digits.len() * 4,
    };

    Ok(BitRow::from_bytes(&bytes, num_bits))
}

/// Read the capture source into a string.
fn read_capture(path: &str) -> Result<String, String> {
    if path == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| format!("Failed to read stdin: {e}"))?;
        Ok(text)
    } else {
        fs::read_to_string(path).map_err(|e| format!("Cannot open capture file: {e}"))
    }
}

/// Decode every row in a capture.
///
/// # Returns
/// The number of rows successfully decoded.
fn run(path: &str) -> Result<usize, String> {
    let text = read_capture(path)?;
    let mut decoded = 0usize;

    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let row = parse_row(line).map_err(|e| format!("line {}: {e}", lineno + 1))?;

        match decode(&row) {
            Ok(reading) => {
                println!("{}", Report::from(&reading).to_json());
                decoded += 1;
            }
            Err(err) => {
                eprintln!("line {}: reject: {err}", lineno + 1);
            }
        }
    }

    Ok(decoded)
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let prog_name = args
        .first()
        .map_or("wh55", |s| s.rsplit('/').next().unwrap_or(s));

    let mut verbose = false;
    let mut capture: Option<&str> = None;

    for arg in &args[1..] {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help(prog_name);
                return;
            }
            "-v" | "--version" => {
                print_version();
                return;
            }
            "-V" | "--verbose" => verbose = true,
            other => {
                if capture.is_some() {
                    eprintln!("Error: unexpected argument '{other}'");
                    eprintln!("Try '{prog_name} --help'");
                    process::exit(2);
                }
                capture = Some(other);
            }
        }
    }

    let Some(capture) = capture else {
        print_help(prog_name);
        process::exit(2);
    };

    if verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("wh55=debug")),
            )
            .with_writer(io::stderr)
            .init();
    }

    match run(capture) {
        Ok(0) => {
            eprintln!("No frames decoded");
            process::exit(1);
        }
        Ok(_) => {}
        Err(msg) => {
            eprintln!("Error: {msg}");
            process::exit(1);
        }
    }
}
