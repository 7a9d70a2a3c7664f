use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};
use mortgage::chart::{AsciiChart, CsvExport, SeriesRenderer};
use mortgage::loan::{LoanTerms, RepaymentFrequency};
use mortgage::prompt;
use simple_logger::SimpleLogger;
use std::io::{self, BufRead, Write};
use std::process;

#[derive(Parser, Debug)]
#[command(
    name = "mortgage",
    version,
    about = "Repayments and remaining balance for a fixed-rate mortgage",
    long_about = "Computes the repayment due every 7, 14 or 30 days on a daily-compounding \
                  fixed-rate loan and charts the balance owed at the end of each year. \
                  Values not given as flags are asked for interactively."
)]
struct Cli {
    /// Loan amount in AUD
    #[arg(long)]
    amount: Option<f64>,

    /// Loan term in whole years
    #[arg(long)]
    years: Option<u32>,

    /// Annual interest rate in percent
    #[arg(long)]
    rate: Option<f64>,

    /// Repayment interval in days (7, 14 or 30)
    #[arg(long)]
    frequency: Option<u32>,

    /// Render the balance series without asking
    #[arg(long)]
    plot: bool,

    /// How to render the balance series
    #[arg(long, value_enum, default_value = "chart")]
    format: PlotFormat,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PlotFormat {
    Chart,
    Csv,
}

impl PlotFormat {
    fn renderer(self) -> Box<dyn SeriesRenderer> {
        match self {
            PlotFormat::Chart => Box::new(AsciiChart::default()),
            PlotFormat::Csv => Box::new(CsvExport),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = SimpleLogger::new().with_level(cli.log_level).init() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut output = stdout.lock();

    let terms = collect_terms(&cli, &mut input, &mut output)?;
    info!("computing repayments for {:?}", terms);

    writeln!(output, "\nProgram's output:")?;
    writeln!(output, "{}", terms.summary()?)?;
    writeln!(output, "\n")?;

    let plot = cli.plot
        || prompt::ask_confirm(
            &mut input,
            &mut output,
            "Would you like to plot the \"Balance by Years\" graph? (y,n): ",
        )?;
    if plot {
        let series = terms.balance_series()?;
        cli.format.renderer().render(&series, &mut output)?;
    }
    output.flush()?;
    Ok(())
}

/// Builds the loan from flags, asking for anything that was left out.
fn collect_terms<R: BufRead, W: Write>(
    cli: &Cli,
    input: &mut R,
    output: &mut W,
) -> Result<LoanTerms, Box<dyn std::error::Error>> {
    let principal = match cli.amount {
        Some(amount) => amount,
        None => {
            let amount =
                prompt::ask_positive_f64(input, output, "Enter Loan Amount in AUD: ", "loan")?;
            writeln!(output)?;
            amount
        }
    };
    let term_years = match cli.years {
        Some(years) => years,
        None => {
            let years =
                prompt::ask_positive_u32(input, output, "Enter Loan Term in Years: ", "year")?;
            writeln!(output)?;
            years
        }
    };
    let annual_rate = match cli.rate {
        Some(rate) => rate,
        None => {
            let rate = prompt::ask_positive_f64(
                input,
                output,
                "Enter the Bank's Interest Rate in %: ",
                "interest",
            )?;
            writeln!(output)?;
            rate
        }
    };
    let interval_days = match cli.frequency {
        Some(days) => days,
        None => prompt::ask_repayment_interval(input, output).map(RepaymentFrequency::days)?,
    };

    Ok(LoanTerms::new(
        principal,
        term_years,
        annual_rate,
        interval_days,
    )?)
}

#[cfg(test)]
mod tests {
    use super::{collect_terms, Cli};
    use clap::{CommandFactory, Parser};
    use mortgage::loan::{BalancePoint, BalanceSeries, LoanTerms};
    use std::io::Cursor;

    // public value types can be shared across threads
    fn is_normal<T: Sized + Send + Sync + Unpin>() {}

    #[test]
    fn normal_types() {
        is_normal::<LoanTerms>();
        is_normal::<BalancePoint>();
        is_normal::<BalanceSeries>();
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_about() {
        let command = Cli::command();
        assert_eq!(
            command.get_about().map(|about| about.to_string()),
            Some("Repayments and remaining balance for a fixed-rate mortgage".to_string())
        );
    }

    #[test]
    fn terms_from_flags() {
        let cli = Cli::parse_from([
            "mortgage",
            "--amount",
            "300000",
            "--years",
            "30",
            "--rate",
            "5.5",
            "--frequency",
            "30",
        ]);
        let mut output = Vec::<u8>::new();
        let terms = collect_terms(&cli, &mut Cursor::new(""), &mut output).unwrap();

        assert_eq!(terms, LoanTerms::new(300000., 30, 5.5, 30).unwrap());
        assert!(output.is_empty());
    }

    #[test]
    fn terms_from_prompts() {
        let cli = Cli::parse_from(["mortgage", "--rate", "5.5"]);
        let mut output = Vec::<u8>::new();
        let terms = collect_terms(
            &cli,
            &mut Cursor::new("250000\nten\n25\n21\n7\n"),
            &mut output,
        )
        .unwrap();

        assert_eq!(terms, LoanTerms::new(250000., 25, 5.5, 7).unwrap());
        let transcript = String::from_utf8(output).unwrap();
        assert!(transcript.contains("Enter Loan Amount in AUD: "));
        assert!(!transcript.contains("Interest Rate"));
        assert!(transcript.contains("Not a valid int value. Try again..."));
        assert!(transcript.contains("Value of frequency should be 7, 14 or 30. Try again..."));
    }

    #[test]
    fn invalid_flags_are_not_reprompted() {
        let cli = Cli::parse_from([
            "mortgage",
            "--amount",
            "300000",
            "--years",
            "30",
            "--rate",
            "5.5",
            "--frequency",
            "10",
        ]);
        let err = collect_terms(&cli, &mut Cursor::new("30\n"), &mut Vec::<u8>::new()).unwrap_err();
        assert!(err.to_string().contains("repayment_interval_days"));
    }
}
