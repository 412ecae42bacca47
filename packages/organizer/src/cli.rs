//! Command-line interface for the organizer.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{
    validate_range, validate_url, Profile, DEFAULT_FLATTEN_OUTPUT, DEFAULT_FLATTEN_URL,
    DEFAULT_HTML_OUTPUT, DEFAULT_HTML_URL,
};
use crate::error::Result;
use crate::outline::DocumentFamily;
use crate::pipeline::{
    flatten_html, organize_docx, organize_html, organize_profile_document, OrganizeReport,
};
use crate::scaffold::{
    create_article_stubs, create_numbered_folders, pages_json, DEFAULT_STUB_DESCRIPTION,
};

/// Normas Organizer - Turn Bogotá legal publications into MDX article trees.
#[derive(Parser)]
#[command(name = "normas-organizer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// DOCX document families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocxFamily {
    /// Development plan agreement (PARTE → TÍTULO, after "ACUERDA:").
    Plan,
    /// Land-use plan decree (LIBRO → TÍTULO, after "DECRETA:").
    Pot,
}

impl From<DocxFamily> for DocumentFamily {
    fn from(family: DocxFamily) -> Self {
        match family {
            DocxFamily::Plan => Self::Plan,
            DocxFamily::Pot => Self::Pot,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a portal publication and organize it into MDX files.
    Html {
        /// Publication URL
        #[arg(short, long, default_value = DEFAULT_HTML_URL)]
        url: String,

        /// Output directory (cleared before writing)
        #[arg(short, long, default_value = DEFAULT_HTML_OUTPUT)]
        output: PathBuf,

        /// Document name used in article descriptions
        #[arg(short = 'n', long)]
        document_name: Option<String>,
    },

    /// Organize a DOCX decree into MDX files.
    Docx {
        /// Path to the .docx file
        path: PathBuf,

        /// Document family
        #[arg(short, long, value_enum, default_value_t = DocxFamily::Plan)]
        family: DocxFamily,

        /// Output directory (default depends on the family; cleared before writing)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Document name used in article descriptions
        #[arg(short = 'n', long)]
        document_name: Option<String>,
    },

    /// Write a whole publication as one Markdown file.
    Flatten {
        /// Publication URL
        #[arg(short, long, default_value = DEFAULT_FLATTEN_URL)]
        url: String,

        /// Output Markdown file
        #[arg(short, long, default_value = DEFAULT_FLATTEN_OUTPUT)]
        output: PathBuf,
    },

    /// Organize every document listed in a profile file.
    Batch {
        /// YAML profile
        profile: PathBuf,

        /// Only process the document with this name
        #[arg(long)]
        only: Option<String>,
    },

    /// Create numbered article stubs and print the page list as JSON.
    Stubs {
        /// Target directory
        #[arg(short, long)]
        dir: PathBuf,

        /// First article number
        #[arg(long)]
        first: u32,

        /// Last article number (inclusive)
        #[arg(long)]
        last: u32,

        /// File name prefix
        #[arg(long, default_value = "articulo")]
        series: String,

        /// Text following "Artículo N" in each description
        #[arg(long, default_value = DEFAULT_STUB_DESCRIPTION)]
        description: String,
    },

    /// Create a numbered series of folders.
    Folders {
        /// Target directory
        #[arg(short, long)]
        dir: PathBuf,

        /// First number
        #[arg(long)]
        first: u32,

        /// Last number (inclusive)
        #[arg(long)]
        last: u32,

        /// Folder name prefix
        #[arg(long, default_value = "capitulo")]
        series: String,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Html {
            url,
            output,
            document_name,
        } => html_command(&url, &output, document_name.as_deref()),
        Commands::Docx {
            path,
            family,
            output,
            document_name,
        } => docx_command(&path, family.into(), output, document_name.as_deref()),
        Commands::Flatten { url, output } => flatten_command(&url, &output),
        Commands::Batch { profile, only } => batch_command(&profile, only.as_deref()),
        Commands::Stubs {
            dir,
            first,
            last,
            series,
            description,
        } => stubs_command(&dir, first, last, &series, &description),
        Commands::Folders {
            dir,
            first,
            last,
            series,
        } => folders_command(&dir, first, last, &series),
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Run `task` behind a spinner, clearing it whatever the outcome.
fn with_spinner<T>(message: &str, task: impl FnOnce() -> Result<T>) -> Result<T> {
    let pb = spinner(message);
    let result = task();
    pb.finish_and_clear();
    result
}

fn print_report(report: &OrganizeReport) {
    println!("  Blocks: {}", report.blocks);
    println!("  Top-level sections: {}", report.top_level_nodes);
    println!("  Articles: {}", style(report.write.articles_written).green());
    if report.write.articles_skipped > 0 {
        println!(
            "  Skipped: {}",
            style(report.write.articles_skipped).yellow().bold()
        );
    }
    println!("  Indexes: {}", report.write.indexes_written);
    println!();
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        report.output.display()
    );
}

fn html_command(url: &str, output: &Path, document_name: Option<&str>) -> Result<()> {
    validate_url(url)?;
    let name = document_name.unwrap_or(DocumentFamily::Html.default_document_name());

    println!("{} {}", style("Organizing").bold(), style(url).cyan());
    println!();

    let report = with_spinner("Fetching publication...", || {
        organize_html(url, output, name)
    })?;
    print_report(&report);
    Ok(())
}

fn docx_command(
    path: &Path,
    family: DocumentFamily,
    output: Option<PathBuf>,
    document_name: Option<&str>,
) -> Result<()> {
    let output = output.unwrap_or_else(|| PathBuf::from(family.default_output()));
    let name = document_name.unwrap_or(family.default_document_name());

    println!(
        "{} {} as {}",
        style("Organizing").bold(),
        style(path.display()).cyan(),
        style(name).green()
    );
    println!();

    let report = with_spinner("Reading document...", || {
        organize_docx(path, family, &output, name)
    })?;
    print_report(&report);
    Ok(())
}

fn flatten_command(url: &str, output: &Path) -> Result<()> {
    validate_url(url)?;

    println!("{} {}", style("Flattening").bold(), style(url).cyan());
    println!();

    let report = with_spinner("Fetching publication...", || flatten_html(url, output))?;
    println!("  Paragraphs: {}", report.paragraphs);
    println!("  Tables: {}", report.tables);
    println!();
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        report.output.display()
    );
    Ok(())
}

fn batch_command(profile_path: &Path, only: Option<&str>) -> Result<()> {
    let profile = Profile::load(profile_path)?;
    let documents: Vec<_> = profile
        .documents
        .iter()
        .filter(|document| only.is_none_or(|name| document.name == name))
        .collect();

    if documents.is_empty() {
        println!("{}", style("No matching documents in profile").yellow());
        return Ok(());
    }

    for document in documents {
        println!(
            "{} {}",
            style("Organizing").bold(),
            style(&document.name).cyan()
        );
        let report = with_spinner("Processing...", || organize_profile_document(document))?;
        print_report(&report);
        println!();
    }
    Ok(())
}

fn stubs_command(dir: &Path, first: u32, last: u32, series: &str, description: &str) -> Result<()> {
    validate_range(first, last)?;
    let pages = create_article_stubs(dir, first, last, series, description)?;
    println!("{}", pages_json(&pages)?);
    Ok(())
}

fn folders_command(dir: &Path, first: u32, last: u32, series: &str) -> Result<()> {
    let folders = create_numbered_folders(dir, first, last, series)?;
    println!(
        "{} {} folders in {}",
        style("Created").green().bold(),
        folders.len(),
        dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_html_defaults() {
        let cli = Cli::parse_from(["normas-organizer", "html"]);

        let Commands::Html {
            url,
            output,
            document_name,
        } = cli.command
        else {
            panic!("expected html command");
        };
        assert_eq!(url, DEFAULT_HTML_URL);
        assert_eq!(output, PathBuf::from(DEFAULT_HTML_OUTPUT));
        assert!(document_name.is_none());
    }

    #[test]
    fn test_cli_parse_docx() {
        let cli = Cli::parse_from([
            "normas-organizer",
            "docx",
            "POT.docx",
            "--family",
            "pot",
            "-o",
            "salida",
        ]);

        let Commands::Docx {
            path,
            family,
            output,
            ..
        } = cli.command
        else {
            panic!("expected docx command");
        };
        assert_eq!(path, PathBuf::from("POT.docx"));
        assert_eq!(DocumentFamily::from(family), DocumentFamily::Pot);
        assert_eq!(output, Some(PathBuf::from("salida")));
    }

    #[test]
    fn test_cli_docx_rejects_html_family() {
        let result = Cli::try_parse_from(["normas-organizer", "docx", "a.docx", "--family", "html"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_stubs() {
        let cli = Cli::parse_from([
            "normas-organizer",
            "stubs",
            "--dir",
            "titulo_xiii/capitulo_6",
            "--first",
            "371",
            "--last",
            "373",
        ]);

        let Commands::Stubs {
            first,
            last,
            series,
            description,
            ..
        } = cli.command
        else {
            panic!("expected stubs command");
        };
        assert_eq!((first, last), (371, 373));
        assert_eq!(series, "articulo");
        assert_eq!(description, DEFAULT_STUB_DESCRIPTION);
    }

    #[test]
    fn test_cli_parse_batch_only() {
        let cli = Cli::parse_from(["normas-organizer", "batch", "normas.yaml", "--only", "pot"]);
        let Commands::Batch { profile, only } = cli.command else {
            panic!("expected batch command");
        };
        assert_eq!(profile, PathBuf::from("normas.yaml"));
        assert_eq!(only.as_deref(), Some("pot"));
    }
}
