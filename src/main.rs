//! # lnpdf CLI
//!
//! Command-line interface for converting LectureNotes notebooks.
//!
//! ## Usage
//!
//! ```bash
//! # Convert one notebook into ./physics.pdf
//! lnpdf LectureNotes/physics
//!
//! # Convert every notebook on a board into out/
//! lnpdf -v -o out LectureNotes
//!
//! # List notebooks and pages
//! lnpdf --list LectureNotes
//! lnpdf --list --json LectureNotes
//!
//! # Show compiled style events and backend calls
//! lnpdf --dump-events LectureNotes/physics
//! ```

use clap::Parser;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use lnpdf::{
    LnPdfError, RenderConfig, convert,
    ir::StyleMachine,
    notebook::{Board, Notebook, NotebookSummary},
    render::{PageGeometry, compile_text, record::Recorder},
};

/// lnpdf - LectureNotes notebook to PDF converter
#[derive(Parser, Debug)]
#[command(name = "lnpdf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Notebook directory or notebooks board
    location: PathBuf,

    /// List notebooks and pages instead of converting
    #[arg(short, long)]
    list: bool,

    /// Print the listing as JSON
    #[arg(long, requires = "list")]
    json: bool,

    /// More output (-v prints created files, -vv info logs, -vvv debug logs)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Directory for the generated PDFs
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Notebook pixels per inch
    #[arg(long, default_value_t = RenderConfig::DEFAULT.dpi, value_parser = parse_dpi)]
    dpi: f32,

    /// Print compiled style events and backend calls instead of converting
    #[arg(long, conflicts_with = "list")]
    dump_events: bool,
}

/// JSON listing.
#[derive(Serialize)]
struct Listing {
    board: Option<String>,
    notebooks: Vec<NotebookSummary>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn parse_dpi(s: &str) -> Result<f32, String> {
    let dpi: f32 = s.parse().map_err(|_| format!("invalid DPI: {}", s))?;
    if dpi.is_finite() && dpi > 0.0 {
        Ok(dpi)
    } else {
        Err(format!("DPI must be positive, got {}", s))
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 | 1 => "warn",
        2 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

fn run(cli: Cli) -> Result<(), LnPdfError> {
    let (board, notebooks) = open_location(&cli.location)?;
    let config = RenderConfig::DEFAULT.with_dpi(cli.dpi);

    if cli.list {
        return list(board.as_ref(), &notebooks, cli.json);
    }

    if cli.dump_events {
        for notebook in &notebooks {
            dump_events(notebook, &config)?;
        }
        return Ok(());
    }

    std::fs::create_dir_all(&cli.output_dir)?;
    for notebook in &notebooks {
        if cli.verbose >= 1 {
            println!(
                "Creating {}",
                cli.output_dir.join(format!("{}.pdf", notebook.name)).display()
            );
        }
        convert::write_notebook(notebook, &config, &cli.output_dir)?;
    }

    Ok(())
}

/// Try LOCATION as a board first, then as a single notebook.
fn open_location(path: &Path) -> Result<(Option<Board>, Vec<Notebook>), LnPdfError> {
    if Board::is_board(path) {
        let board = Board::open(path)?;
        let notebooks = board.all_notebooks()?;
        Ok((Some(board), notebooks))
    } else if Notebook::is_notebook(path) {
        Ok((None, vec![Notebook::open(path)?]))
    } else {
        Err(LnPdfError::Notebook(format!(
            "{} is neither a notebook nor a notebooks board",
            path.display()
        )))
    }
}

fn list(board: Option<&Board>, notebooks: &[Notebook], json: bool) -> Result<(), LnPdfError> {
    let summaries: Vec<NotebookSummary> = notebooks.iter().map(Notebook::summary).collect();

    if json {
        let listing = Listing {
            board: board.map(|b| b.root.display().to_string()),
            notebooks: summaries,
        };
        let text = serde_json::to_string_pretty(&listing).map_err(std::io::Error::from)?;
        println!("{}", text);
        return Ok(());
    }

    if let Some(board) = board {
        println!("NOTEBOOKS BOARD {}", board.root.display());
    }
    for summary in &summaries {
        println!("NOTEBOOK {}", summary.root);
        for page in &summary.pages {
            println!("{}", page.line(&summary.name));
        }
    }
    Ok(())
}

fn dump_events(notebook: &Notebook, config: &RenderConfig) -> Result<(), LnPdfError> {
    let geometry = PageGeometry::for_notebook(&notebook.settings, config);

    for page in &notebook.pages {
        for text in page.text_elements() {
            println!("== {} page {}: {}", notebook.name, page.number, text.name);

            let queue = match compile_text(text, &notebook.settings, config, &geometry) {
                Ok(queue) => queue,
                Err(e) if e.is_element_local() => {
                    println!("   skipped: {}", e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            for line in queue.describe() {
                println!("   {}", line);
            }

            let mut recorder = Recorder::new();
            StyleMachine::new(&mut recorder).run(&queue, &text.content);
            for call in recorder.calls() {
                println!("   -> {:?}", call);
            }
        }
    }
    Ok(())
}
