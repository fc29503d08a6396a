//! # Affiche CLI
//!
//! Usage:
//!   affiche poster.txt -o poster.png
//!   affiche poster.txt -o poster.jpg --size 1080x1350 --margin 8%
//!   affiche document.json --dump-layout layout.json
//!   affiche --example > poster.txt

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use affiche::font::FontLibrary;
use affiche::markup::{parse_canvas_size, MarkupParser};
use affiche::model::{Document, Margin};
use affiche::AfficheError;

#[derive(Debug, Parser)]
#[command(name = "affiche", version, about = "Render a poster from plain-text markup")]
struct Cli {
    /// Poster markup, or a `.json` document. Reads stdin when omitted or `-`.
    input: Option<PathBuf>,

    /// Output image; `.jpg`/`.jpeg` writes JPEG, anything else PNG
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,

    /// Canvas size as WxH, overriding `!size`
    #[arg(long, value_parser = parse_size)]
    size: Option<(u32, u32)>,

    /// Margin as pixels or a percentage (e.g. 40 or 5%), overriding `!margin`
    #[arg(long, value_parser = parse_margin)]
    margin: Option<Margin>,

    /// Extra directory to search for fonts (repeatable)
    #[arg(long = "font-dir", value_name = "DIR")]
    font_dirs: Vec<PathBuf>,

    /// Write the resolved layout as JSON
    #[arg(long, value_name = "PATH")]
    dump_layout: Option<PathBuf>,

    /// Print an example poster and exit
    #[arg(long)]
    example: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_size(value: &str) -> Result<(u32, u32), String> {
    parse_canvas_size(value).ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))
}

fn parse_margin(value: &str) -> Result<Margin, String> {
    Margin::parse(value).ok_or_else(|| format!("expected pixels or a percentage, got '{value}'"))
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.example {
        print!("{}", example_poster());
        return;
    }

    if let Err(e) = run(&cli) {
        eprintln!("✗ {e}");
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<(), AfficheError> {
    let (source, base_dir) = read_input(cli.input.as_deref())?;

    let mut font_dirs = vec![base_dir.clone()];
    if let Ok(cwd) = std::env::current_dir() {
        font_dirs.push(cwd);
    }
    font_dirs.extend(FontLibrary::system_dirs());
    font_dirs.extend(cli.font_dirs.iter().cloned());
    let fonts = FontLibrary::discover(&font_dirs);

    let is_json = cli
        .input
        .as_deref()
        .and_then(Path::extension)
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let mut document: Document = if is_json {
        serde_json::from_str(&source)?
    } else {
        MarkupParser::new(&fonts).base_dir(&base_dir).parse(&source)?
    };

    if let Some((width, height)) = cli.size {
        document.canvas.width = width;
        document.canvas.height = height;
    }
    if let Some(margin) = cli.margin {
        document.canvas.margin = margin;
    }

    let poster = affiche::render(&document, &fonts)?;
    log::info!(
        "{} element(s), slack {:.1}px",
        poster.layout.elements.len(),
        poster.layout.slack
    );

    if let Some(path) = &cli.dump_layout {
        let json = serde_json::to_string_pretty(&poster.layout)
            .map_err(|e| AfficheError::Encode(format!("layout dump: {e}")))?;
        fs::write(path, json).map_err(|source| AfficheError::Io {
            path: path.clone(),
            source,
        })?;
    }

    poster.save(&cli.output)?;
    eprintln!(
        "✓ Written {}x{} poster to {}",
        poster.layout.canvas_width,
        poster.layout.canvas_height,
        cli.output.display()
    );
    Ok(())
}

/// Read the input text and the directory relative paths resolve against.
fn read_input(input: Option<&Path>) -> Result<(String, PathBuf), AfficheError> {
    match input {
        Some(path) if path != Path::new("-") => {
            let source = fs::read_to_string(path).map_err(|source| AfficheError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let base_dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            Ok((source, base_dir))
        }
        _ => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .map_err(|source| AfficheError::Io {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            Ok((source, PathBuf::from(".")))
        }
    }
}

fn example_poster() -> &'static str {
    r#"# Lines starting with ! configure the canvas.
!size 1080x1350
!margin 6%
!background_color #fdf6e3
!font DejaVu Sans

SPRING FAIR size=biggest color=#b58900
Community Garden size=bigger

Saturday {date} color=#586e75
Plants, seeds and cake size=smaller
Everyone welcome alignment=right size=smaller color=#268bd2
"#
}
