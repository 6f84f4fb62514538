use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use taxdoc_pdf::{LayoutConfig, PageSize, ReportRequest};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PaperArg {
    A4,
    Letter,
}

impl From<PaperArg> for PageSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A4 => PageSize::A4,
            PaperArg::Letter => PageSize::Letter,
        }
    }
}

#[derive(Parser)]
#[command(name = "taxdoc-pdf")]
#[command(author, version, about = "Generate a portfolio tax report PDF from a JSON request")]
struct Cli {
    /// Report request (JSON)
    input: PathBuf,

    /// Directory the PDF is written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = PaperArg::A4)]
    page_size: PaperArg,

    /// Do not repeat table headers on continuation pages
    #[arg(long)]
    no_repeat_headers: bool,

    /// Print the computed tax breakdown to stdout
    #[arg(long)]
    print_breakdown: bool,
}

fn run(cli: &Cli) -> Result<PathBuf, taxdoc_pdf::Error> {
    let json = std::fs::read_to_string(&cli.input)?;
    let request = ReportRequest::from_json(&json)?;

    let config = LayoutConfig {
        page_size: cli.page_size.into(),
        repeat_table_headers: !cli.no_repeat_headers,
        ..LayoutConfig::default()
    };
    let doc = taxdoc_pdf::generate_report_with(&request, &config)?;

    if cli.print_breakdown {
        let b = taxdoc_pdf::compute_liability(request.jurisdiction, &request);
        println!("{} ({})", request.jurisdiction, request.jurisdiction.tag());
        println!("  short-term gains   {}", b.short_term_gains);
        println!("  long-term gains    {}", b.long_term_gains);
        println!("  taxable gains      {}", b.taxable_gains);
        println!("  dividend income    {}", b.dividend_income);
        println!("  gross liability    {}", b.gross_liability);
        println!("  credits            {}", b.credits);
        println!("  net payable        {}", b.net_payable);
    }

    let timestamp = chrono::Utc::now().timestamp();
    taxdoc_pdf::write_report(&doc, &cli.output_dir, timestamp)
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
