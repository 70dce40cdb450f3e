use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::LevelFilter;
use mscab::{CabDecompressor, Cabinet, CompressionType, FileEntry, FileSource};

// ========================================================================= //

#[derive(Parser)]
#[command(name = "cabtool")]
#[command(
    about = "Inspects and extracts MSZIP cabinet (CAB) files",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Level of logging to use
    #[arg(long, global = true, default_value = "warn")]
    log_level: LevelFilter,
}

#[derive(Subcommand)]
enum Command {
    /// Lists files in the cabinet
    Ls {
        cab: PathBuf,

        /// Lists in long format
        #[arg(short, long)]
        long: bool,

        /// Position of the cabinet within the file
        #[arg(long, default_value = "0")]
        offset: u64,
    },
    /// Concatenates files from the cabinet to stdout
    Cat {
        cab: PathBuf,
        files: Vec<String>,

        /// Position of the cabinet within the file
        #[arg(long, default_value = "0")]
        offset: u64,
    },
    /// Extracts files from the cabinet into a directory, dropping any
    /// directory components of their names
    Extract {
        cab: PathBuf,

        /// Names of the files to extract (all files if none are given)
        names: Vec<String>,

        /// Sets output directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Position of the cabinet within the file
        #[arg(long, default_value = "0")]
        offset: u64,
    },
    /// Copies a cabinet embedded in a larger file out to its own file
    Carve {
        input: PathBuf,

        /// Position of the cabinet within the input file
        #[arg(long)]
        offset: u64,

        /// Sets output path
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    Builder::new().filter_level(cli.log_level).init();

    let mut decompressor = CabDecompressor::<FileSource>::new();
    match cli.command {
        Command::Ls { cab, long, offset } => {
            let cabinet = open_cab(&mut decompressor, cab, offset)?;
            for file in cabinet.file_entries() {
                list_file(&cabinet, file, long);
            }
        }
        Command::Cat { cab, files, offset } => {
            open_cab(&mut decompressor, cab, offset)?;
            let stdout = io::stdout();
            let mut stdout = stdout.lock();
            for name in files {
                let data = decompressor
                    .extract_named(&name)
                    .with_context(|| format!("Failed to extract {:?}", name))?;
                stdout.write_all(&data)?;
            }
            stdout.flush()?;
        }
        Command::Extract { cab, names, dir, offset } => {
            let cabinet = open_cab(&mut decompressor, cab, offset)?;
            let files: Vec<&FileEntry> = if names.is_empty() {
                cabinet.file_entries().collect()
            } else {
                let mut files = Vec::with_capacity(names.len());
                for name in names.iter() {
                    match cabinet.get_file_entry(name) {
                        Some(file) => files.push(file),
                        None => bail!("No such file in cabinet: {:?}", name),
                    }
                }
                files
            };
            fs::create_dir_all(&dir)?;
            for file in files {
                let path = dir.join(flat_name(file.name()));
                let size = decompressor
                    .extract_to_path(file, &path)
                    .with_context(|| {
                        format!("Failed to extract {:?}", file.name())
                    })?;
                println!("{} ({} bytes)", path.display(), size);
            }
        }
        Command::Carve { input, offset, output } => {
            let cabinet = open_cab(&mut decompressor, input, offset)?;
            let mut writer = BufWriter::new(File::create(&output)?);
            let size = decompressor
                .copy_cabinet(&mut writer)
                .context("Failed to copy cabinet")?;
            writer.flush()?;
            println!(
                "Wrote {} ({} of {} bytes)",
                output.display(),
                size,
                cabinet.length()
            );
        }
    }
    decompressor.close();
    Ok(())
}

// ========================================================================= //

fn open_cab(
    decompressor: &mut CabDecompressor,
    path: PathBuf,
    offset: u64,
) -> anyhow::Result<std::sync::Arc<Cabinet>> {
    let context = format!("Failed to open cabinet {}", path.display());
    let cabinet =
        decompressor.open_at(FileSource::new(path), offset).context(context)?;
    Ok(cabinet)
}

// The last component of a stored name, which may use either separator.
fn flat_name(name: &str) -> &str {
    name.rsplit(|c: char| c == '\\' || c == '/').next().unwrap_or(name)
}

fn list_file(cabinet: &Cabinet, file: &FileEntry, long: bool) {
    if !long {
        println!("{}", file.name());
        return;
    }
    let ctype = match cabinet.folder_of(file).map(|f| f.compression_type()) {
        Some(CompressionType::None) => "None".to_string(),
        Some(CompressionType::MsZip) => "MsZip".to_string(),
        Some(CompressionType::Other(bits)) => format!("0x{:04x}", bits),
        None => "?".to_string(),
    };
    let file_size = if file.uncompressed_size() >= 100_000_000 {
        format!("{} MB", file.uncompressed_size() / (1 << 20))
    } else if file.uncompressed_size() >= 1_000_000 {
        format!("{} kB", file.uncompressed_size() / (1 << 10))
    } else {
        format!("{} B ", file.uncompressed_size())
    };
    println!(
        "{}{}{}{}{}{} {:>2} {:<6} {:>10} {} {}",
        if file.is_read_only() { 'R' } else { '-' },
        if file.is_hidden() { 'H' } else { '-' },
        if file.is_system() { 'S' } else { '-' },
        if file.is_archive() { 'A' } else { '-' },
        if file.is_exec() { 'E' } else { '-' },
        if file.is_name_utf() { 'U' } else { '-' },
        file.folder_index(),
        ctype,
        file_size,
        file.datetime()
            .map(|dt| dt.to_string())
            .unwrap_or_else(|| "invalid datetime".to_string()),
        file.name()
    );
}

// ========================================================================= //
