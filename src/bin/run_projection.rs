//! Run the MRR projection for the saved client book
//!
//! Prints the month table and headline metrics, optionally exporting the
//! snapshots to CSV, a churn sensitivity sweep, and unit economics.

use anyhow::{Context, Result};
use clap::Parser;
use saas_metrics::{
    assumptions::GlobalField,
    scenario::{sweep_churn, Runway, UnitEconomicsInputs},
    storage::{DataBridge, JsonFileStore, StorageConfig},
    workspace::HeadlineMetrics,
    Workspace,
};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(about = "Project MRR, ARR and LTV for the saved client book")]
struct Args {
    /// Data directory (defaults to $SAAS_METRICS_DATA_DIR or ./data)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Month to break down (1-12)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    month: u32,

    /// Override the saved churn rate (percent) for this run
    #[arg(long)]
    churn: Option<f64>,

    /// Write the monthly snapshots to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Churn rates (percent) to compare, e.g. --sweep 2,5,10
    #[arg(long, value_delimiter = ',')]
    sweep: Vec<f64>,

    /// Print unit economics; takes an optional JSON inputs file
    #[arg(long)]
    unit_economics: bool,

    #[arg(long, requires = "unit_economics")]
    unit_inputs: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let start = Instant::now();

    let mut config = StorageConfig::from_env();
    if let Some(dir) = &args.data_dir {
        config = config.with_data_dir(dir);
    }
    let store = JsonFileStore::from_config(&config);
    println!("Loading client book from {}...", store.data_path().display());

    let mut workspace = Workspace::load(&store);
    if let Some(churn) = args.churn {
        workspace.set_assumption(GlobalField::ChurnRate, &churn.to_string());
    }
    workspace
        .select_month(args.month - 1)
        .context("Invalid --month")?;

    let metrics = workspace.metrics()?;
    let assumptions = workspace.assumptions();
    println!(
        "{} clients, churn {:.1}%, CAC {:.0} Kč",
        workspace.registry().len(),
        assumptions.customer_churn_rate_percent,
        assumptions.cac
    );

    println!("\nMonth | Customers |    New |        MRR |         ARR |   ARPU | Expansion");
    for row in &metrics.projection.snapshots {
        println!(
            "{:5} | {:9} | {:6} | {:10.0} | {:11.0} | {:6.0} | {:9.0}",
            row.month, row.customers, row.new_customers, row.mrr, row.arr, row.arpu, row.expansion_mrr
        );
    }

    let b = &metrics.breakdown;
    println!("\nMonth {} breakdown:", b.month + 1);
    println!("  New MRR:       {:>10.0} Kč (+{} customers)", b.new_mrr, b.new_customers);
    println!("  Churned MRR:   {:>10.0} Kč", -b.lost_mrr);
    println!("  Expansion MRR: {:>10.0} Kč", b.expansion_mrr);
    println!("  Net MRR:       {:>+10.0} Kč", b.net_mrr);

    let headline = HeadlineMetrics::from(&metrics);
    println!("\nAfter {} months:", assumptions.months);
    println!("  MRR:        {:.0} Kč", headline.mrr);
    println!("  ARR:        {:.0} Kč", headline.arr);
    println!("  Customers:  {}", headline.customers);
    println!("  Lifetime:   {:.1} months", headline.avg_lifetime_months);
    println!("  Retention:  {:.1}%", headline.retention_rate);
    println!("  LTV:        {:.0} Kč", headline.ltv);
    println!("  LTV:CAC:    {:.1}:1", headline.ltv_cac_ratio);

    println!("\nLTV:CAC benchmarks:");
    for row in &metrics.benchmarks {
        println!(
            "  {:<20} LTV {:>9.0}  CAC {:>7.0}  {:>4.1}:1  {:?}",
            row.name, row.ltv, row.cac, row.ratio, row.health
        );
    }

    if let Some(path) = &args.csv {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        for row in &metrics.projection.snapshots {
            writer.serialize(row)?;
        }
        writer.flush()?;
        println!("\nSnapshots written to {}", path.display());
    }

    if !args.sweep.is_empty() {
        println!("\nChurn sweep:");
        println!("  Churn % |        MRR | Customers |        LTV | LTV:CAC");
        for scenario in sweep_churn(workspace.registry(), assumptions, &args.sweep) {
            let s = &scenario.summary;
            println!(
                "  {:7.1} | {:10.0} | {:9} | {:10.0} | {:7.1}",
                scenario.churn_percent, s.mrr, s.total_customers, s.ltv, s.ltv_cac_ratio
            );
        }
    }

    if args.unit_economics {
        let inputs: UnitEconomicsInputs = match &args.unit_inputs {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                serde_json::from_str(&content)
                    .with_context(|| format!("Invalid unit economics inputs in {}", path.display()))?
            }
            None => UnitEconomicsInputs::default(),
        };
        let report = inputs.evaluate();

        println!("\nUnit economics:");
        println!("  Gross margin: {:.0} Kč ({:.1}%)", report.gross_margin, report.gross_margin_pct * 100.0);
        println!("  CAC:          {:.0} Kč", report.cac);
        println!("  LTV:          {:.0} Kč", report.ltv);
        println!("  LTV:CAC:      {:.1}:1 ({:?})", report.ltv_cac_ratio, report.target);
        match report.runway {
            Runway::Months(months) => println!("  Runway:       {:.1} months", months),
            Runway::Profitable => println!("  Runway:       profitable"),
        }
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
