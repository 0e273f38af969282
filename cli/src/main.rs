//! pdfsift CLI - PDF outline extraction and persona-driven section ranking

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfsift::text::{detect_language, split_paragraphs};
use pdfsift::{
    find_pdfs, run_outline_batch, run_relevance_batch, sniff_path, DocumentSource, HeadingLevel,
    LopdfSource, OutlineExtractor, ParseOptions, RelevanceExtractor,
};

#[derive(Parser)]
#[command(name = "pdfsift")]
#[command(version)]
#[command(
    about = "Infer PDF outlines and rank sections for a persona and task",
    long_about = None
)]
struct Cli {
    /// Which analysis to run when no subcommand is given
    #[arg(long, value_enum, default_value = "1a", env = "PDFSIFT_ROUND")]
    round: Round,

    /// Directory containing the input PDFs
    #[arg(long, value_name = "DIR", default_value = "/app/input", env = "PDFSIFT_INPUT")]
    input: PathBuf,

    /// Directory receiving the JSON results
    #[arg(long, value_name = "DIR", default_value = "/app/output", env = "PDFSIFT_OUTPUT")]
    output: PathBuf,

    /// Persona the sections are ranked for
    #[arg(long, global = true, default_value = "Research Analyst", env = "PDFSIFT_PERSONA")]
    persona: String,

    /// Job the persona needs to get done
    #[arg(
        long,
        global = true,
        default_value = "Extract key insights from documents",
        env = "PDFSIFT_JOB"
    )]
    job: String,

    /// Process documents one at a time
    #[arg(long, global = true)]
    sequential: bool,

    /// Fail a document on the first unreadable page
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a title and heading outline for every PDF in a directory
    Outline {
        /// Directory containing the input PDFs
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory (defaults to the input directory)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Rank the sections of every PDF in a directory for --persona and --job
    Relevance {
        /// Directory containing the input PDFs
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory (defaults to the input directory)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Round {
    /// Title and heading outline per document
    #[value(name = "1a")]
    Outline,
    /// Persona/job relevance ranking across documents
    #[value(name = "1b")]
    Relevance,
}

/// Settings shared by every command.
struct Settings {
    persona: String,
    job: String,
    parse_options: ParseOptions,
}

impl Settings {
    fn source(&self) -> LopdfSource {
        LopdfSource::with_options(self.parse_options.clone())
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let mut parse_options = ParseOptions::new().with_parallel(!cli.sequential);
    if !cli.strict {
        parse_options = parse_options.lenient();
    }
    let settings = Settings {
        persona: cli.persona,
        job: cli.job,
        parse_options,
    };
    log::debug!("parse options: {:?}", settings.parse_options);

    let result = match cli.command {
        Some(Commands::Outline { input, output }) => {
            let output = output.unwrap_or_else(|| input.clone());
            cmd_outline(&input, &output, &settings)
        }
        Some(Commands::Relevance { input, output }) => {
            let output = output.unwrap_or_else(|| input.clone());
            cmd_relevance(&input, &output, &settings)
        }
        Some(Commands::Info { input }) => cmd_info(&input, &settings),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => match cli.round {
            Round::Outline => cmd_outline(&cli.input, &cli.output, &settings),
            Round::Relevance => cmd_relevance(&cli.input, &cli.output, &settings),
        },
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn progress_bar(len: usize) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn check_input_dir(input: &Path) -> Result<usize, Box<dyn std::error::Error>> {
    if !input.is_dir() {
        return Err(format!("Input directory {} does not exist", input.display()).into());
    }
    let count = find_pdfs(input)?.len();
    if count == 0 {
        println!("{} {}", "No PDF files found in".yellow(), input.display());
    }
    Ok(count)
}

fn cmd_outline(
    input: &Path,
    output: &Path,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let count = check_input_dir(input)?;
    println!("{} {} PDF files", "Extracting outlines from".cyan(), count);

    let pb = progress_bar(count)?;
    let summary = run_outline_batch(
        &settings.source(),
        &OutlineExtractor::new(),
        input,
        output,
        settings.parse_options.parallel,
        &|path: &Path| {
            pb.set_message(file_label(path));
            pb.inc(1);
        },
    )?;
    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    for (i, path) in summary.written.iter().enumerate() {
        let branch = if i + 1 == summary.written.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), file_label(path));
    }
    for failure in &summary.failures {
        println!(
            "  {} {}: {}",
            "Failed".red(),
            failure.document,
            failure.reason
        );
    }

    Ok(())
}

fn cmd_relevance(
    input: &Path,
    output: &Path,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let count = check_input_dir(input)?;
    println!("{} {}", "Persona:".bold(), settings.persona);
    println!("{} {}", "Job:".bold(), settings.job);

    let extractor = RelevanceExtractor::new().with_parallel(settings.parse_options.parallel);
    let pb = progress_bar(count)?;
    let written = run_relevance_batch(
        &settings.source(),
        &extractor,
        input,
        output,
        &settings.persona,
        &settings.job,
        &|path: &Path| {
            pb.set_message(file_label(path));
            pb.inc(1);
        },
    )?;
    pb.finish_with_message("Done!");

    let Some((report, path)) = written else {
        return Ok(());
    };

    println!("\n{}", "Top sections:".green().bold());
    for section in report.extracted_sections.iter().take(5) {
        println!(
            "  {:>2}. {} {}",
            section.importance_rank,
            section.section_title,
            format!("({} p.{})", section.document, section.page).dimmed()
        );
    }
    for failure in &report.failures {
        println!(
            "  {} {}: {}",
            "Failed".red(),
            failure.document,
            failure.reason
        );
    }
    println!("\n{} {}", "Saved to".green(), path.display());

    Ok(())
}

fn cmd_info(input: &Path, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let header = sniff_path(input)?;
    let doc = settings.source().load(input)?;
    let outline = OutlineExtractor::new().extract(&doc);

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), header.version);
    let blank = doc.pages.iter().filter(|page| page.is_blank()).count();
    println!("{}: {} ({} blank)", "Pages".bold(), doc.page_count(), blank);
    if !outline.title.is_empty() {
        println!("{}: {}", "Title".bold(), outline.title);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let text = doc.plain_text();
    let paragraphs = split_paragraphs(&text);
    println!("{}: {}", "Language".bold(), detect_language(&text));
    println!("{}: {}", "Words".bold(), text.split_whitespace().count());
    println!("{}: {}", "Characters".bold(), text.chars().count());
    println!("{}: {}", "Paragraphs".bold(), paragraphs.len());
    println!("{}: {}", "Text spans".bold(), doc.spans().count());
    println!(
        "{}: {} (H1 {}, H2 {}, H3 {})",
        "Headings".bold(),
        outline.outline.len(),
        outline.count_level(HeadingLevel::H1),
        outline.count_level(HeadingLevel::H2),
        outline.count_level(HeadingLevel::H3)
    );

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfsift".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF outline inference and persona-driven section ranking");
    println!();
    println!("License: MIT");
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
