//! imgstore CLI
//!
//! Command-line interface for managing an image store file.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use imgstore::{compact, Config, ImgStore, ImgStoreError, ListMode, OpenMode, Resolution, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// imgstore CLI
#[derive(Parser, Debug)]
#[command(name = "imgstore-cli")]
#[command(about = "Image store management tool")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the store content
    List {
        /// Store file
        store: PathBuf,

        /// Print the image ids as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new, empty store
    Create {
        /// Store file (overwritten if it exists)
        store: PathBuf,

        /// Maximum number of images (1..=100000)
        #[arg(long, default_value = "10")]
        max_files: u32,

        /// Thumbnail resolution, at most 128x128
        #[arg(long, num_args = 2, value_names = ["X_RES", "Y_RES"], default_values_t = [64u16, 64])]
        thumb_res: Vec<u16>,

        /// Small resolution, at most 512x512
        #[arg(long, num_args = 2, value_names = ["X_RES", "Y_RES"], default_values_t = [256u16, 256])]
        small_res: Vec<u16>,
    },

    /// Read an image and save it as <id>_<res>.jpg
    Read {
        /// Store file
        store: PathBuf,

        /// Image id
        img_id: String,

        /// original|orig|thumbnail|thumb|small
        #[arg(default_value = "original")]
        resolution: String,
    },

    /// Insert an image file under a new id
    Insert {
        /// Store file
        store: PathBuf,

        /// Image id
        img_id: String,

        /// Image file to insert
        file: PathBuf,
    },

    /// Delete an image
    Delete {
        /// Store file
        store: PathBuf,

        /// Image id
        img_id: String,
    },

    /// Garbage-collect the store through a temporary copy
    Gc {
        /// Store file
        store: PathBuf,

        /// Temporary store file used for the rebuild
        tmp_store: PathBuf,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,imgstore=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args.command) {
        eprintln!("ERROR: {}", e);
        std::process::exit(e.code());
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::List { store, json } => {
            let store = ImgStore::open(&store, OpenMode::ReadOnly)?;
            let mode = if json { ListMode::Json } else { ListMode::Text };
            println!("{}", store.list(mode)?);
        }

        Commands::Create {
            store,
            max_files,
            thumb_res,
            small_res,
        } => {
            let [tw, th] = pair(&thumb_res)?;
            let [sw, sh] = pair(&small_res)?;
            let config = Config::builder()
                .max_files(max_files)
                .thumb_res(tw, th)
                .small_res(sw, sh)
                .build();

            let store = ImgStore::create(&store, &config)?;
            println!("{}", store.header());
        }

        Commands::Read {
            store,
            img_id,
            resolution,
        } => {
            let res: Resolution = resolution.parse()?;
            let mut store = ImgStore::open(&store, OpenMode::ReadWrite)?;
            let bytes = store.read(&img_id, res)?;
            store.close();

            let out = format!("{}_{}.jpg", img_id, res.suffix());
            fs::write(&out, bytes)?;
            tracing::info!("wrote {}", out);
        }

        Commands::Insert {
            store,
            img_id,
            file,
        } => {
            let mut store = ImgStore::open(&store, OpenMode::ReadWrite)?;
            if store.header().is_full() {
                return Err(ImgStoreError::StoreFull);
            }
            let bytes = fs::read(&file)?;
            store.insert(&bytes, &img_id)?;
        }

        Commands::Delete { store, img_id } => {
            let mut store = ImgStore::open(&store, OpenMode::ReadWrite)?;
            store.delete(&img_id)?;
        }

        Commands::Gc { store, tmp_store } => {
            let stats = compact(&store, &tmp_store)?;
            println!(
                "{} image(s) kept, {} -> {} bytes",
                stats.entries_copied, stats.bytes_before, stats.bytes_after
            );
        }
    }

    Ok(())
}

/// Two resolution values as [x, y]
fn pair(values: &[u16]) -> Result<[u16; 2]> {
    match values {
        [x, y] => Ok([*x, *y]),
        _ => Err(ImgStoreError::NotEnoughArguments),
    }
}
