//! Script Hub - Main entry point

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use scripthub::actions::{self, ActionOutcome, DirectoryDownloader, StdoutClipboard};
use scripthub::cli::{Cli, Commands, ListArgs, UploadArgs};
use scripthub::{
    Catalog, CatalogConfig, DeleteOutcome, EntryDraft, FileBackend, ScriptEntry, TracingSink,
    UploadedFile,
};

/// Initialize tracing. `RUST_LOG` overrides the default `info` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse_args();
    debug!("CLI arguments parsed");

    if let Commands::ValidateConfig { config } = &cli.command {
        info!("Validating configuration file: {:?}", config);
        let loaded = CatalogConfig::load_from_file(config)?;
        loaded.validate()?;
        println!("✓ Configuration file is valid: {:?}", config);
        return Ok(());
    }

    let mut config = CatalogConfig::resolve(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    config.validate().context("Invalid configuration")?;
    debug!("Using data directory {:?}", config.data_dir);

    let mut catalog = Catalog::open(FileBackend::new(&config.data_dir), TracingSink);

    match cli.command {
        Commands::List(args) => list(&catalog, &args),
        Commands::Show { id } => show(catalog.find(id)?),
        Commands::Upload(args) => upload(&mut catalog, args),
        Commands::Delete { id } => match catalog.delete(id)? {
            DeleteOutcome::Deleted(entry) => {
                println!("✓ Deleted \"{}\" ({})", entry.title, entry.id);
                Ok(())
            }
            DeleteOutcome::Protected => {
                println!("Script {} is built in and cannot be deleted", id);
                Ok(())
            }
            DeleteOutcome::NotFound => {
                println!("No uploaded script with id {}", id);
                Ok(())
            }
        },
        Commands::Copy { id } => {
            let entry = catalog.find(id)?;
            match actions::copy_content(entry, &mut StdoutClipboard, catalog.sink()) {
                ActionOutcome::Done => Ok(()),
                ActionOutcome::Failed => bail!("Unable to copy script code"),
                ActionOutcome::Unavailable => bail!("\"{}\" has no source to copy", entry.title),
            }
        }
        Commands::Download { id, dir } => {
            let entry = catalog.find(id)?;
            let dir = dir.unwrap_or_else(|| config.download_dir.clone());
            let mut downloader = DirectoryDownloader::new(dir);
            match actions::download(entry, &mut downloader, catalog.sink())? {
                Some(path) => {
                    println!("✓ Saved {}", path.display());
                    Ok(())
                }
                None => bail!("\"{}\" has no downloadable file", entry.title),
            }
        }
        Commands::Share { id } => {
            let entry = catalog.find(id)?;
            let (_, outcome) = actions::share(
                entry,
                &config.share_base_url,
                None,
                &mut StdoutClipboard,
                catalog.sink(),
            );
            match outcome {
                ActionOutcome::Done => Ok(()),
                _ => bail!("Could not share \"{}\"", entry.title),
            }
        }
        Commands::ValidateConfig { .. } => Ok(()),
    }
}

fn list(catalog: &Catalog, args: &ListArgs) -> Result<()> {
    let parts = catalog.partitioned_view(&args.to_query());
    let entries = parts.tab(args.tab);

    if args.json {
        let json = serde_json::to_string_pretty(entries).context("Failed to serialize entries")?;
        println!("{}", json);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No scripts found. Try adjusting your search or filters.");
        return Ok(());
    }

    for entry in entries {
        let marker = if entry.is_user_uploaded { "*" } else { " " };
        println!(
            "{}{:>14}  {:<28} {:<11} {:<13} {}",
            marker, entry.id, entry.title, entry.language, entry.complexity, entry.category
        );
    }
    println!(
        "\n{} shown (all {}, mine {}, curated {})",
        entries.len(),
        parts.count(scripthub::ViewTab::All),
        parts.count(scripthub::ViewTab::Mine),
        parts.count(scripthub::ViewTab::Curated)
    );
    Ok(())
}

fn show(entry: &ScriptEntry) -> Result<()> {
    println!("{} ({})", entry.title, entry.id);
    println!("  {}", entry.description);
    println!("  Language:   {}", entry.language);
    println!("  Complexity: {}", entry.complexity);
    println!("  Category:   {}", entry.category);
    if !entry.tags.is_empty() {
        println!("  Tags:       {}", entry.tags.join(", "));
    }
    if let Some(uploaded_at) = entry.uploaded_at {
        println!("  Uploaded:   {}", uploaded_at.format("%Y-%m-%d %H:%M UTC"));
    }
    match (&entry.file_name, &entry.content) {
        (Some(file_name), Some(content)) => println!("\n--- {} ---\n{}", file_name, content),
        _ => println!("\n  No source available for this script."),
    }
    Ok(())
}

fn upload(catalog: &mut Catalog, args: UploadArgs) -> Result<()> {
    let bytes = read_script(&args.file)?;
    let file_name = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file = UploadedFile::from_bytes(file_name, &bytes);

    let draft = EntryDraft {
        title: args.title,
        description: args.description,
        language: args.language,
        complexity: args.complexity,
        category: args.category,
        tags: args.tags,
    };

    let entry = catalog.create(draft, file)?;
    println!("✓ Uploaded \"{}\" as {}", entry.title, entry.id);
    Ok(())
}

fn read_script(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read script file {:?}", path))
}
