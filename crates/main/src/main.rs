use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::error;

use seo_report::report::{self, AuditReport};
use seo_report::styles::StyleRegistry;
use seo_report::validate;

/// Renders the avinashsangle.com SEO indexing audit as a PDF.
///
/// Fonts are read from `$SEO_REPORT_FONTS_DIR`, from `assets/fonts` next to the binary or the
/// crate, or from the system font directories. Set `RUST_LOG=debug` for layout details.
#[derive(Parser)]
#[command(author, version, about = "Render the SEO indexing audit to PDF")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the report.
    Render {
        /// Where to write the PDF.
        #[arg(short, long, default_value = seo_report::DEFAULT_OUTPUT_PATH)]
        output: PathBuf,

        /// Leave the bookmark outline out of the PDF.
        #[arg(long)]
        no_outline: bool,
    },

    /// Check every block against the style sheet without rendering.
    #[command(aliases = ["lint"])]
    Check,

    /// Print the section titles in document order.
    Outline,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render { output, no_outline } => render(output, !no_outline),
        Commands::Check => check(),
        Commands::Outline => {
            outline();
            Ok(())
        }
    };

    if let Err(err) = result {
        error!("report build failed");
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn render(output: PathBuf, outline: bool) -> Result<(), Box<dyn Error>> {
    let rendered = seo_report::render_report_with(&output, outline)?;
    println!(
        "Report generated: {} ({} pages)",
        output.display(),
        rendered.page_count()
    );
    Ok(())
}

fn check() -> Result<(), Box<dyn Error>> {
    let styles = StyleRegistry::report_sheet()?;
    let story = report::build_story(&AuditReport::seo_indexing());
    let problems = validate::lint_all(&story, &styles);
    if problems.is_empty() {
        println!("{} blocks, no problems found", story.len());
        return Ok(());
    }
    for problem in &problems {
        println!("{}", problem);
    }
    Err(format!("{} problem(s) found", problems.len()).into())
}

fn outline() {
    let story = report::build_story(&AuditReport::seo_indexing());
    for title in story.section_titles() {
        println!("{}", title);
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
