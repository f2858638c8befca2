use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use mdpress_pdf::{PageFormat, RenderOptions, ThemeId};

#[derive(Parser)]
#[command(name = "mdpress-pdf")]
#[command(version)]
#[command(about = "Lay out a Markdown document into paginated, themed PDF pages", long_about = None)]
struct Cli {
    /// Input Markdown file ("-" reads stdin)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output PDF (defaults to the input path with a .pdf extension)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Page format
    #[arg(short, long, value_enum, env = "MDPRESS_FORMAT", default_value_t = PageFormat::A4)]
    format: PageFormat,

    /// Visual theme
    #[arg(short, long, value_enum, env = "MDPRESS_THEME", default_value_t = ThemeId::Documentation)]
    theme: ThemeId,

    /// Document title written to the PDF metadata (defaults to the output file name)
    #[arg(long)]
    title: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn default_output(input: &Path) -> PathBuf {
    if input == Path::new("-") {
        PathBuf::from("document.pdf")
    } else {
        input.with_extension("pdf")
    }
}

fn read_input(input: &Path) -> std::io::Result<String> {
    if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input)
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let output = cli.output.clone().unwrap_or_else(|| default_output(&cli.input));
    let title = cli.title.clone().or_else(|| {
        output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
    });
    let options = RenderOptions {
        format: cli.format,
        theme: cli.theme,
        title,
    };

    let markdown = match read_input(&cli.input) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.input.display());
            process::exit(1);
        }
    };

    if let Err(e) = mdpress_pdf::convert_markdown_str_to_pdf(&markdown, &output, &options) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
    println!("Wrote {}", output.display());
}
