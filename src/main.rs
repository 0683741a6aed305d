//! Main entry point for the rangecat CLI application.
//!
//! This binary concatenates local files and HTTP resources into one
//! [`GroupedSource`] and writes an addressed range of it to stdout.

use anyhow::{Result, bail};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

use rangecat::{ByteSource, Cli, GroupedSource, HttpRangeSource, LocalFileSource, ReleaseOnSwitch};

/// Bytes requested from the group per read; a multiple of the hexdump width.
const CHUNK_SIZE: usize = 64 * 1024;

/// Bytes shown per hexdump line.
const HEX_WIDTH: usize = 16;

/// Application entry point.
///
/// Parses command-line arguments, opens every source and dispatches to
/// listing or dumping.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    // HTTP members share one client and are kept aside for statistics
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;
    let mut members: Vec<Arc<dyn ByteSource>> = Vec::with_capacity(cli.sources.len());
    let mut remotes = Vec::new();
    for source in &cli.sources {
        if Cli::is_http_url(source) {
            let remote = Arc::new(HttpRangeSource::with_client(client.clone(), source.clone()).await?);
            remotes.push(remote.clone());
            members.push(remote);
        } else {
            members.push(Arc::new(LocalFileSource::new(Path::new(source))?));
        }
    }

    // Only one member is touched at a time, release each as we leave it
    let grouped = GroupedSource::with_observer(members, Arc::new(ReleaseOnSwitch))?;

    let result = if cli.list {
        list_members(&grouped, &cli.sources);
        Ok(())
    } else {
        dump_range(&grouped, &cli).await
    };
    let released = grouped.release().await;
    finish(result, released)?;

    // Display network transfer statistics for HTTP sources
    if !remotes.is_empty() && !cli.is_quiet() {
        let transferred: u64 = remotes.iter().map(|r| r.transferred_bytes()).sum();
        eprintln!("\nTotal bytes transferred: {}", format_size(transferred));
    }

    Ok(())
}

/// Combine the outcome of the work with the outcome of the shutdown sweep.
///
/// A failed list/dump wins; a release failure behind it is only logged.
fn finish(result: Result<()>, released: rangecat::Result<()>) -> Result<()> {
    match (result, released) {
        (Err(e), Err(release_error)) => {
            log::warn!("failed to release sources: {release_error}");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), released) => Ok(released?),
    }
}

/// Print the member table: index, global start, length and name.
fn list_members(grouped: &GroupedSource, names: &[String]) {
    println!("{:>5}  {:>12}  {:>12}  Name", "Index", "Start", "Length");
    println!("{}", "-".repeat(50));
    for (index, name) in names.iter().enumerate() {
        let start = grouped.member_start(index).unwrap_or_default();
        let length = grouped.member(index).map(|m| m.length()).unwrap_or_default();
        println!("{:>5}  {:>12}  {:>12}  {}", index, start, length, name);
    }
    println!("{}", "-".repeat(50));
    println!(
        "{:>5}  {:>12}  {:>12}  {} members",
        "",
        "",
        grouped.length(),
        grouped.member_count()
    );
}

/// Write `cli.length` bytes (or up to the end) from `cli.offset` to stdout,
/// raw or as a hexdump.
async fn dump_range(grouped: &GroupedSource, cli: &Cli) -> Result<()> {
    let total = grouped.length();
    if cli.offset > total || (cli.offset == total && cli.length.is_some_and(|n| n > 0)) {
        bail!("Offset {} is past the end ({} bytes)", cli.offset, total);
    }

    let end = match cli.length {
        Some(length) => cli.offset.saturating_add(length).min(total),
        None => total,
    };

    let mut stdout = tokio::io::stdout();
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut position = cli.offset;
    while position < end {
        let want = (end - position).min(CHUNK_SIZE as u64) as usize;
        let n = match grouped.read_range(position, &mut buf[..want]).await? {
            Some(n) if n > 0 => n,
            _ => bail!("Source ended early at {}", position),
        };

        if cli.hex {
            for (i, line) in buf[..n].chunks(HEX_WIDTH).enumerate() {
                let offset = position + (i * HEX_WIDTH) as u64;
                stdout
                    .write_all(format_hex_line(offset, line).as_bytes())
                    .await?;
            }
        } else {
            stdout.write_all(&buf[..n]).await?;
        }
        position += n as u64;
    }
    stdout.flush().await?;

    Ok(())
}

/// Format one hexdump line: offset, hex bytes and printable ASCII.
///
/// Short rows are padded so the ASCII column stays aligned.
fn format_hex_line(offset: u64, bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(HEX_WIDTH * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i == HEX_WIDTH / 2 {
            hex.push(' ');
        }
        hex.push_str(&format!("{:02x} ", b));
    }
    let ascii: String = bytes
        .iter()
        .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
        .collect();
    format!("{:08x}  {:<49} |{}|\n", offset, hex, ascii)
}

/// Format a byte size into a human-readable string.
///
/// Automatically selects the appropriate unit (bytes, KB, MB, GB)
/// based on the size magnitude.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
