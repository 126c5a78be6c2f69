use std::{error::Error, fs, path::PathBuf, time::Duration};

use clap::Parser;

use finance_summary::{
    CurrencyFormat, MemoryDataSource, Records, Summary, SummaryConfig, SummaryService, UserID,
    setup_logging,
};

/// Prints the monthly finance summary of one user.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to a JSON file with "transactions" and "budgets" arrays.
    #[arg(long)]
    data_path: PathBuf,

    /// The user to summarise.
    #[arg(long)]
    user_id: i64,

    /// The month to summarise, 1-12.
    #[arg(long)]
    month: u8,

    /// The year to summarise.
    #[arg(long)]
    year: i32,

    /// The symbol placed before amounts.
    #[arg(long, default_value = "₹")]
    currency_symbol: String,

    /// How long to wait for the data source, in milliseconds.
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,

    /// Print the summary as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    setup_logging("info");

    let args = Args::parse();

    tracing::info!("Loading records from {:?}", args.data_path);
    let records: Records = serde_json::from_str(&fs::read_to_string(&args.data_path)?)?;

    let config = SummaryConfig {
        currency_symbol: args.currency_symbol.clone(),
        fetch_timeout: Duration::from_millis(args.timeout_ms),
        ..SummaryConfig::default()
    };
    let service = SummaryService::new(MemoryDataSource::from_records(records), config)?;

    let summary = service
        .get_summary(UserID::new(args.user_id), args.month, args.year)
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(summary.as_ref())?);
    } else {
        let currency = CurrencyFormat::new(&args.currency_symbol)?;
        print_summary(&summary, &currency);
    }

    Ok(())
}

fn print_summary(summary: &Summary, currency: &CurrencyFormat) {
    println!("Summary for {}/{}", summary.month, summary.year);
    println!();
    println!("Total income:  {}", currency.format(summary.total_income));
    println!("Total expense: {}", currency.format(summary.total_expense));
    println!("Net:           {}", currency.format(summary.net));

    let sections = [
        ("Income by category", &summary.income_by_category),
        ("Expense by category", &summary.expense_by_category),
        ("Budgets", &summary.budget),
        ("Budget vs actual", &summary.budget_vs_actual),
        ("Overspending", &summary.overspend),
        ("Trend", &summary.trend),
        ("Charts", &summary.chart_legend),
    ];

    for (title, text) in sections {
        println!();
        println!("{title}:");
        for line in text.lines() {
            println!("  {line}");
        }
    }
}
