//! Command-line interface for the ODT to HTML converter.

use clap::Parser;
use odt2html::ConvertOptions;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "odt2html",
    version,
    about = "Convert ODT documents to standalone HTML with embedded resources"
)]
struct Args {
    /// Path to the input ODT file
    input: PathBuf,

    /// Path for the output HTML file
    output: PathBuf,

    /// Hide page break separators in the output (shown by default)
    #[arg(long)]
    no_page_breaks: bool,

    /// Ignore table and frame border styles from the document
    #[arg(long)]
    no_table_borders: bool,
}

fn run(args: &Args) -> odt2html::Result<()> {
    let options = ConvertOptions {
        show_page_breaks: !args.no_page_breaks,
        respect_table_borders: !args.no_table_borders,
    };
    let html = odt2html::convert_file(&args.input, options)?;

    if let Some(parent) = args.output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&args.output, html)?;

    println!(
        "Successfully converted: {} -> {}",
        args.input.display(),
        args.output.display()
    );
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(error) = run(&args) {
        eprintln!("Error: {}", error);
        std::process::exit(1);
    }
}
