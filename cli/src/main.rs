//! pdfbody CLI - extract the body text of a PDF between marker pages

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfbody::{
    extract_file_to, BodyExtractor, ExtractOptions, MarkerScanner, PageSource, PdfDocument,
};

#[derive(Parser)]
#[command(name = "pdfbody")]
#[command(author = "iyulab")]
#[command(version)]
#[command(
    about = "Extract the main body text of a PDF, dropping front matter, back matter and margins",
    long_about = None
)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output text file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    extract: ExtractArgs,

    /// Print the extraction report as JSON
    #[arg(long)]
    stats: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show page count, page sizes and the resolved content window
    Info {
        /// Input PDF file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Show version information
    Version,
}

/// Options shared by extraction and inspection.
#[derive(Args, Debug, Default, Clone)]
struct ExtractArgs {
    /// JSON configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Start marker text (default "Introduction")
    #[arg(long, value_name = "TEXT")]
    start: Option<String>,

    /// End marker text, repeatable (default "Epilogue" and "Conclusion")
    #[arg(long = "end", value_name = "TEXT")]
    end: Vec<String>,

    /// Same margin on every side, in points
    #[arg(long, value_name = "N")]
    margins: Option<f32>,

    /// Left margin in points
    #[arg(long, value_name = "N")]
    margin_left: Option<f32>,

    /// Right margin in points
    #[arg(long, value_name = "N")]
    margin_right: Option<f32>,

    /// Top margin in points
    #[arg(long, value_name = "N")]
    margin_top: Option<f32>,

    /// Bottom margin in points
    #[arg(long, value_name = "N")]
    margin_bottom: Option<f32>,

    /// Treat undecodable pages as empty instead of failing
    #[arg(long)]
    lenient: bool,
}

impl ExtractArgs {
    /// Defaults, then the config file, then explicit flags.
    fn to_options(&self) -> pdfbody::Result<ExtractOptions> {
        let mut options = match &self.config {
            Some(path) => ExtractOptions::from_json_file(path)?,
            None => ExtractOptions::default(),
        };

        if let Some(start) = &self.start {
            options = options.with_start_marker(start.clone());
        }
        if !self.end.is_empty() {
            options = options.with_end_markers(self.end.iter().cloned());
        }

        let mut margins = options.margins;
        if let Some(all) = self.margins {
            margins = pdfbody::Margins::uniform(all);
        }
        if let Some(left) = self.margin_left {
            margins.left = left;
        }
        if let Some(right) = self.margin_right {
            margins.right = right;
        }
        if let Some(top) = self.margin_top {
            margins.top = top;
        }
        if let Some(bottom) = self.margin_bottom {
            margins.bottom = bottom;
        }
        options = options.with_margins(margins);

        if self.lenient {
            options = options.lenient();
        }

        options.validate()?;
        Ok(options)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Info { input, extract }) => cmd_info(&input, &extract),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => match (cli.input, cli.output) {
            (Some(input), Some(output)) => cmd_extract(&input, &output, &cli.extract, cli.stats),
            _ => {
                println!("{}", "Usage: pdfbody <INPUT> <OUTPUT>".yellow());
                println!("       pdfbody --help for more information");
                std::process::exit(2);
            }
        },
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error extracting text from PDF:".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_extract(
    input: &Path,
    output: &Path,
    args: &ExtractArgs,
    stats: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = args.to_options()?;
    log::debug!("Extraction options: {:?}", options);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Extracting {}...", input.display()));

    let result = extract_file_to(input, output, &options);
    pb.finish_and_clear();
    let extraction = result?;

    println!(
        "{} {}",
        "Text extracted and saved to:".green().bold(),
        output.display()
    );

    if stats {
        let report = serde_json::json!({
            "input": input.display().to_string(),
            "output": output.display().to_string(),
            "window": extraction.window,
            "stats": extraction.stats,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

fn cmd_info(input: &Path, args: &ExtractArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = args.to_options()?;
    let doc = PdfDocument::open(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), doc.version());
    println!("{}: {}", "Pages".bold(), doc.page_count());
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if doc.is_encrypted() { "Yes" } else { "No" }
    );

    // Page sizes, most documents have one or two
    let mut sizes: BTreeMap<String, u32> = BTreeMap::new();
    for page in 1..=doc.page_count() {
        let page_box = doc.page_box(page)?;
        let key = format!("{} x {} pt", page_box.width, page_box.height);
        *sizes.entry(key).or_default() += 1;
    }
    for (size, count) in &sizes {
        println!("{}: {} ({} pages)", "Page size".bold(), size, count);
    }

    println!();
    println!("{}", "Content Window".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {:?}", "Start marker".bold(), options.start_marker);
    println!("{}: {:?}", "End markers".bold(), options.end_markers);

    let scanner = MarkerScanner::with_error_mode(options.error_mode);
    match scanner.resolve_window(&doc, &options.start_marker, &options.end_markers) {
        Ok(window) => {
            println!(
                "{}: {}-{} ({} pages)",
                "Window".bold(),
                window.start,
                window.end,
                window.len()
            );
            let extraction = BodyExtractor::new(options).extract_report(&doc)?;
            println!("{}: {}", "Characters".bold(), extraction.stats.chars);
            println!(
                "{}: {} kept, {} dropped",
                "Text units".bold(),
                extraction.stats.glyphs_kept,
                extraction.stats.glyphs_dropped
            );
        }
        Err(e) if e.is_boundary_failure() => {
            println!("{}: {}", "Window".bold(), e.to_string().yellow());
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfbody".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF body text extraction tool");
    println!();
    println!("License: MIT");
}
