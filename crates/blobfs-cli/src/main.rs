//! blobfs command-line browser.
//!
//! Inspects a blob store through the same read-only filesystem a driver
//! host would mount.
//!
//! Usage:
//!   blobfs ls /uploads
//!   blobfs stat /uploads/2020/a.txt
//!   blobfs read /uploads/2020/a.txt --offset 2 --length 10 > part.bin
//!   blobfs df
//!
//!   # Explicit store and root instead of ~/.config/blobfs/config.toml
//!   blobfs --db ./blobs.db --root data ls /

use std::io::Write;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use blobfs_kernel::{BlobFs, BlobFsConfig, FileAttr, StoreBackend, VfsOps};

/// Browse a flat blob store as a read-only filesystem.
#[derive(Parser, Debug)]
#[command(name = "blobfs")]
#[command(about = "Browse a flat blob store as a read-only filesystem")]
struct Args {
    /// Config file (default: <config dir>/blobfs/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SQLite store path, overrides the config
    #[arg(long)]
    db: Option<PathBuf>,

    /// Key prefix the filesystem root maps to, overrides the config
    #[arg(long)]
    root: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show attributes of a file or directory
    Stat { path: String },

    /// List a directory
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },

    /// Write file contents to stdout
    Read {
        path: String,

        /// Byte offset to start at
        #[arg(long, default_value_t = 0)]
        offset: u64,

        /// Maximum bytes to read (default: to end of file)
        #[arg(long)]
        length: Option<u32>,
    },

    /// Show free-space figures
    Df,
}

fn load_config(args: &Args) -> Result<BlobFsConfig> {
    let mut config = match &args.config {
        Some(path) => BlobFsConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => BlobFsConfig::load_default().context("loading default config")?,
    };
    if let Some(db) = &args.db {
        config.store.backend = StoreBackend::Sqlite;
        config.store.path = Some(db.clone());
    }
    if let Some(root) = &args.root {
        config.root = root.clone();
    }
    Ok(config)
}

fn epoch_secs(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

fn kind_char(attr: &FileAttr) -> char {
    if attr.is_dir() { 'd' } else { '-' }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(fs: &BlobFs, command: Command, json: bool) -> Result<()> {
    match command {
        Command::Stat { path } => {
            let attr = fs.getattr(&path).await.with_context(|| format!("stat {path}"))?;
            if json {
                return print_json(&attr);
            }
            println!("path:    {path}");
            println!("kind:    {:?}", attr.kind);
            println!("size:    {}", attr.size);
            println!("perm:    {:o}", attr.perm);
            println!("created: {}", epoch_secs(attr.ctime));
        }
        Command::Ls { path } => {
            let entries = fs.readdir(&path).await.with_context(|| format!("ls {path}"))?;
            if json {
                return print_json(&entries);
            }
            for entry in entries {
                println!(
                    "{} {:>12} {:>12} {}",
                    kind_char(&entry.attr),
                    entry.attr.size,
                    epoch_secs(entry.attr.ctime),
                    entry.name
                );
            }
        }
        Command::Read {
            path,
            offset,
            length,
        } => {
            let length = match length {
                Some(n) => n,
                None => {
                    let attr = fs.getattr(&path).await.with_context(|| format!("stat {path}"))?;
                    u32::try_from(attr.size.saturating_sub(offset)).unwrap_or(u32::MAX)
                }
            };
            let data = fs
                .read(&path, offset, length)
                .await
                .with_context(|| format!("read {path}"))?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&data)?;
            stdout.flush()?;
        }
        Command::Df => {
            let space = fs.free_space().await.context("df")?;
            if json {
                return print_json(&space);
            }
            println!("total:      {}", space.total);
            println!("total free: {}", space.total_free);
            println!("available:  {}", space.available);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries file contents for `read`.
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let store = config.open_store().context("opening blob store")?;
    let fs = BlobFs::from_config(&config, store);
    tracing::debug!(root = %config.root, backend = ?config.store.backend, "blobfs ready");

    let result = run(&fs, args.command, args.json).await;
    fs.unmount().await?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_db_and_root_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("config.toml");
        std::fs::write(&cfg, "root = \"ignored\"\n[store]\nbackend = \"memory\"\n").unwrap();
        let cfg = cfg.to_string_lossy().into_owned();

        let args = Args::parse_from([
            "blobfs", "--config", cfg.as_str(), "--db", "/tmp/x.db", "--root", "data", "df",
        ]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Sqlite);
        assert_eq!(config.store.path, Some(PathBuf::from("/tmp/x.db")));
        assert_eq!(config.root, "data");
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let args = Args::parse_from(["blobfs", "--config", "/nonexistent/blobfs.toml", "df"]);
        assert!(load_config(&args).is_err());
    }

    #[test]
    fn test_ls_defaults_to_root() {
        let args = Args::parse_from(["blobfs", "ls"]);
        assert!(matches!(args.command, Command::Ls { ref path } if path == "/"));
    }
}
