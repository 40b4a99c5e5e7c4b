use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use icepack_core::Icepack;

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "icepack",
    about = "ICE! packer/depacker — pack, depack, and inspect compressed buffers",
    version
)]
struct Cli {
    /// Explicit path to the unice68 shared library (skips the search)
    #[arg(long, global = true)]
    lib: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file with the ICE! packer
    Pack {
        /// Source file to pack ("-" reads stdin)
        input: PathBuf,
        /// Destination file
        output: PathBuf,
        /// Output capacity in bytes (default: 16 + len * 9 / 8)
        #[arg(short, long)]
        max_size: Option<i32>,
    },
    /// Decompress an ICE!-packed file back to raw bytes
    Depack {
        /// Source packed file
        input: PathBuf,
        /// Destination file ("-" writes to stdout)
        output: PathBuf,
    },
    /// Print the size pair of a packed file without decoding it
    Info {
        /// Packed file to inspect
        file: PathBuf,
    },
    /// Pack and depack a small greeting end to end against the bound backend
    Demo,
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn bind(lib: Option<PathBuf>) -> anyhow::Result<Icepack> {
    let ice = match lib {
        Some(path) => Icepack::with_library(path)?,
        None => Icepack::new()?,
    };
    eprintln!("  backend     : {}", ice.backend_origin());
    Ok(ice)
}

fn read_input(input: &PathBuf) -> anyhow::Result<Vec<u8>> {
    if input.to_str() == Some("-") {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read(input).with_context(|| format!("reading input file {:?}", input))
    }
}

fn write_output(output: &PathBuf, data: &[u8]) -> anyhow::Result<()> {
    if output.to_str() == Some("-") {
        io::stdout().lock().write_all(data)?;
    } else {
        File::create(output)
            .with_context(|| format!("creating output file {:?}", output))?
            .write_all(data)?;
    }
    Ok(())
}

// ── Subcommand implementations ─────────────────────────────────────────────

fn run_pack(lib: Option<PathBuf>, input: PathBuf, output: PathBuf, max_size: Option<i32>) -> anyhow::Result<()> {
    let ice = bind(lib)?;
    let raw = read_input(&input)?;

    let t0 = Instant::now();
    let packed = ice.pack(&raw, max_size)?;
    let elapsed = t0.elapsed();

    write_output(&output, &packed)?;

    eprintln!("  raw size    : {} bytes", raw.len());
    eprintln!("  packed      : {} bytes", packed.len());
    eprintln!("  ratio       : {:.2}x", raw.len() as f64 / packed.len() as f64);
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

fn run_depack(lib: Option<PathBuf>, input: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    let ice = bind(lib)?;
    let packed = read_input(&input)?;

    let t0 = Instant::now();
    let raw = ice.depack(&packed)?;
    let elapsed = t0.elapsed();

    write_output(&output, &raw)?;

    eprintln!("  packed      : {} bytes", packed.len());
    eprintln!("  raw size    : {} bytes", raw.len());
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

fn run_info(lib: Option<PathBuf>, file: PathBuf) -> anyhow::Result<()> {
    let ice = bind(lib)?;
    let packed = read_input(&file)?;
    let (depacked, csize) = ice.depacked_size(&packed)?;

    println!("  file         : {:?}", file);
    println!("  file size    : {} bytes", packed.len());
    println!("  packed unit  : {} bytes", csize);
    println!("  depacked     : {} bytes", depacked);
    if (csize as usize) < packed.len() {
        println!("  trailing     : {} bytes past the packed unit", packed.len() - csize as usize);
    }
    Ok(())
}

fn run_demo(lib: Option<PathBuf>) -> anyhow::Result<()> {
    let ice = bind(lib)?;
    let greeting = b"Hello!";

    let packed = ice.pack(greeting, None)?;
    println!("Original size: {} bytes", greeting.len());
    println!("Packed size: {} bytes", packed.len());

    let (depacked, csize) = ice.depacked_size(&packed)?;
    println!("Depacked size: {depacked}, packed size: {csize}");

    let raw = ice.depack(&packed)?;
    anyhow::ensure!(raw == greeting, "round trip mismatch");
    println!("Depacked data: {}", String::from_utf8_lossy(&raw));
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Pack {
            input,
            output,
            max_size,
        } => run_pack(cli.lib, input, output, max_size),
        Commands::Depack { input, output } => run_depack(cli.lib, input, output),
        Commands::Info { file } => run_info(cli.lib, file),
        Commands::Demo => run_demo(cli.lib),
    }
}
