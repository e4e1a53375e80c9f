//! pagenav - group an HTML page into heading blocks and build its sidebar

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pagenav::dom::{parse_html_bytes, serialize_document};
use pagenav::restructure::{
    DEFAULT_BLOCK_CLASS, DEFAULT_CONTENT_CONTAINER, DEFAULT_NAV_CONTAINER, DEFAULT_NAV_LIST,
    DEFAULT_SECTION_CLASS,
};
use pagenav::{NoScrollSpy, Outline, RestructureOptions, Restructurer};

#[derive(Parser)]
#[command(name = "pagenav")]
#[command(version, about = "Group an HTML page into heading blocks and build its sidebar", long_about = None)]
#[command(after_help = "EXAMPLES:
    pagenav docs.html -o page.html         Restructure a page
    pagenav --check docs.html              Print the outline only
    pagenav --check --json docs.html       Print the outline as JSON
    cat docs.html | pagenav --outline toc.json > page.html")]
struct Cli {
    /// Input HTML file ("-" or omitted reads stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output file (stdout if omitted)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Also write the outline as JSON to FILE
    #[arg(long, value_name = "FILE", value_parser = outline_path)]
    outline: Option<PathBuf>,

    /// Print the outline and exit without writing HTML
    #[arg(long, conflicts_with_all = ["output", "outline"])]
    check: bool,

    /// With --check, print the outline as JSON
    #[arg(long, requires = "check")]
    json: bool,

    /// Element that receives scroll-spy activation
    #[arg(long, value_name = "SELECTOR", default_value = DEFAULT_NAV_CONTAINER)]
    nav_container: String,

    /// List that navigation entries are appended to
    #[arg(long, value_name = "SELECTOR", default_value = DEFAULT_NAV_LIST)]
    nav_list: String,

    /// Element that content blocks are appended to
    #[arg(long, value_name = "SELECTOR", default_value = DEFAULT_CONTENT_CONTAINER)]
    content: String,

    /// Class of each block wrapper
    #[arg(long, value_name = "CLASS", default_value = DEFAULT_BLOCK_CLASS)]
    block_class: String,

    /// Class of top-level navigation entries
    #[arg(long, value_name = "CLASS", default_value = DEFAULT_SECTION_CLASS)]
    section_class: String,

    /// Do not mark the navigation container for scroll spying
    #[arg(long)]
    no_scroll_spy: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Log each block as it is built
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> RestructureOptions {
        RestructureOptions::default()
            .with_nav_container(&self.nav_container)
            .with_nav_list(&self.nav_list)
            .with_content_container(&self.content)
            .with_block_class(&self.block_class)
            .with_section_class(&self.section_class)
    }

    fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| cli.log_level().into()),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> pagenav::Result<()> {
    let restructurer = Restructurer::new(&cli.options())?;
    let bytes = read_input(cli.input.as_deref())?;
    let mut dom = parse_html_bytes(&bytes);

    let outline = if cli.no_scroll_spy {
        restructurer.with_scroll_spy(NoScrollSpy).restructure(&mut dom)
    } else {
        restructurer.restructure(&mut dom)
    };
    tracing::info!(
        blocks = outline.blocks.len(),
        entries = outline.entries.len(),
        "restructured page"
    );

    if cli.check {
        if cli.json {
            println!("{}", outline.to_json()?);
        } else {
            print_outline(&outline);
        }
        return Ok(());
    }

    if let Some(path) = &cli.outline {
        fs::write(path, outline.to_json()?)?;
    }

    let html = serialize_document(&dom)?;
    match &cli.output {
        Some(path) if !is_stdio(path) => fs::write(path, html)?,
        _ => io::stdout().lock().write_all(html.as_bytes())?,
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> io::Result<Vec<u8>> {
    match path {
        Some(path) if !is_stdio(path) => fs::read(path),
        _ => {
            let mut bytes = Vec::new();
            io::stdin().lock().read_to_end(&mut bytes)?;
            Ok(bytes)
        }
    }
}

/// `--outline` takes a real file; stdout is reserved for the page.
fn outline_path(value: &str) -> Result<PathBuf, String> {
    if value == "-" {
        return Err("stdout carries the HTML; use --check --json to print the outline".into());
    }
    Ok(PathBuf::from(value))
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn print_outline(outline: &Outline) {
    println!("Blocks: {}", outline.blocks.len());
    for entry in &outline.entries {
        let indent = match entry.kind {
            pagenav::NavKind::Section => "",
            pagenav::NavKind::Subsection => "  ",
        };
        println!("{indent}- {} ({})", entry.label, entry.href());
    }
}
