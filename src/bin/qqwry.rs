//! qqwry: CLI tool for querying and exporting QQWry databases.

use clap::{Parser, Subcommand};
use qqwry::{export, Database, DatabaseConfig, TextEncoding};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "qqwry")]
#[command(author = "Kaitu.io")]
#[command(version = "0.1.0")]
#[command(about = "Query and export QQWry IPv4 geolocation databases", long_about = None)]
struct Cli {
    /// Database file (.dat, or .dat.gz)
    #[arg(short, long, global = true, default_value = "qqwry.dat")]
    database: PathBuf,

    /// Encoding of region names in the database
    #[arg(short, long, global = true, default_value = "gbk")]
    encoding: TextEncoding,

    /// Keep the " CZ88.NET" area placeholder
    #[arg(long, global = true)]
    keep_placeholder: bool,

    /// Memory-map the database instead of reading it into memory
    #[arg(long, global = true)]
    mmap: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up one or more IPv4 addresses
    Lookup {
        /// Addresses to look up
        #[arg(required = true)]
        ips: Vec<String>,
    },

    /// Export every range as JSON
    Dump {
        /// Output JSON file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show database header information
    Info,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = DatabaseConfig::default().with_encoding(cli.encoding);
    if cli.keep_placeholder {
        config = config.keep_placeholder();
    }

    if let Err(e) = open_and_run(&cli, config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn open_and_run(cli: &Cli, config: DatabaseConfig) -> Result<(), Box<dyn std::error::Error>> {
    if cli.mmap {
        let db = Database::open_mmap_with_config(&cli.database, config)?;
        run(&db, &cli.command)
    } else {
        let db = Database::open_with_config(&cli.database, config)?;
        run(&db, &cli.command)
    }
}

fn run<S: AsRef<[u8]>>(
    db: &Database<S>,
    command: &Commands,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Lookup { ips } => lookup(db, ips),
        Commands::Dump { output } => dump(db, output),
        Commands::Info => info(db),
    }
}

fn lookup<S: AsRef<[u8]>>(
    db: &Database<S>,
    ips: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    for ip in ips {
        match db.lookup(ip) {
            Some(location) => println!("{}", location),
            None => println!("{}\t(not found)", ip),
        }
    }
    Ok(())
}

fn dump<S: AsRef<[u8]>>(db: &Database<S>, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    export::dump_json(db, output)?;
    println!("Exported {} ranges -> {:?}", db.total(), output);
    Ok(())
}

fn info<S: AsRef<[u8]>>(db: &Database<S>) -> Result<(), Box<dyn std::error::Error>> {
    let header = db.header();
    println!("size:        {} bytes", db.size());
    println!("index start: {:#010x}", header.index_start);
    println!("index end:   {:#010x}", header.index_end);
    println!("ranges:      {}", db.total());

    if let Some(last) = db.enumerate_all().nth(db.total() - 1) {
        println!("last range:  {}", last);
    }
    Ok(())
}
