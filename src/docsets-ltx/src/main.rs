use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use docsets_ltx::{
    DiskFiles, DocSetError, LlmsConfig, LlmsTxtPlugin, discover_pages, load_pages_file, logging::DEFAULT_LOG_SETTINGS,
    render_template, setup_logging,
};

#[derive(Parser)]
#[command(name = "docsets-ltx")]
#[command(about = "Generates llms.txt and doc set bundles from a rendered static site", long_about = None)]
struct DocSetsCli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run after the site build: write every doc set and fill in llms.txt.
    Generate {
        /// The JSON configuration file.
        #[arg(short, long, value_parser = validate_input_file)]
        config: PathBuf,
        /// The output directory of the site build, holding one index.html per page and llms.txt.
        #[arg(short, long, value_parser = validate_dist_dir)]
        dist: PathBuf,
        /// JSON list of the built pages. Discovered from the output directory when omitted.
        #[arg(short, long, value_parser = validate_input_file)]
        pages: Option<PathBuf>,
    },

    /// Write a starter llms.txt holding the placeholder the generated index replaces.
    Template {
        /// The JSON configuration file.
        #[arg(short, long, value_parser = validate_input_file)]
        config: PathBuf,
        /// Where to write the llms.txt template.
        #[arg(short, long, value_parser = validate_output_file)]
        output: PathBuf,
    },
}

fn validate_input_file(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);

    if !path.exists() {
        return Err(format!("Input path does not exist: {}", path.display()));
    }

    if !path.is_file() {
        return Err(format!("Input path is not a file: {}", path.display()));
    }

    Ok(path)
}

fn validate_dist_dir(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);

    if !path.is_dir() {
        return Err(format!("Output directory does not exist: {}", path.display()));
    }

    Ok(path)
}

fn validate_output_file(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);

    if path.exists() && path.is_dir() {
        return Err(format!("Output path is a directory: {}", path.display()));
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        return Err(format!(
            "Output file parent directory does not exist: {}",
            parent.display()
        ));
    }

    Ok(path)
}

#[tokio::main]
async fn main() {
    setup_logging(DEFAULT_LOG_SETTINGS);

    let cli = DocSetsCli::parse();

    let outcome = match &cli.command {
        Commands::Generate { config, dist, pages } => generate(config, dist, pages.as_deref()).await,
        Commands::Template { config, output } => template(config, output).await,
    };

    if let Err(error) = outcome {
        tracing::error!("{}", error);
        std::process::exit(1)
    }
}

async fn generate(config: &Path, dist: &Path, pages: Option<&Path>) -> Result<(), DocSetError> {
    let plugin = LlmsTxtPlugin::new(LlmsConfig::from_json_file(config)?)?;

    let pages = match pages {
        Some(pages_file) => load_pages_file(pages_file)?,
        None => discover_pages(dist)?,
    };

    let report = plugin.on_build_done(&pages, dist, &DiskFiles).await?;

    for summary in &report.doc_sets {
        println!(
            "{} -> {} ({} pages, {} skipped)",
            summary.title, summary.url, summary.pages_written, summary.pages_skipped
        );
    }
    println!("llms.txt -> {}", report.index_path.display());
    Ok(())
}

async fn template(config: &Path, output: &Path) -> Result<(), DocSetError> {
    let config = LlmsConfig::from_json_file(config)?;
    tokio::fs::write(output, render_template(&config)).await?;
    tracing::info!("llms.txt template written to {}", output.display());
    Ok(())
}
