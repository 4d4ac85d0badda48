use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use funnelscope::period::parse_date;
use funnelscope::{
    compatible_granularities, dimension_availability, evaluate_query, generate, parser, Catalog,
    ComparisonMode, DateRange, GeneratorConfig, QuerySpec, SeriesRow,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{Map, Value};

#[derive(Parser)]
#[command(name = "funnelscope")]
#[command(about = "Inspect the order funnel catalog and generate dashboard series")]
#[command(version)]
struct Args {
    /// Catalog YAML to use instead of the embedded one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Generator config YAML to use instead of the defaults
    #[arg(long, global = true)]
    generator: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List metrics and dimensions by group
    Catalog {
        /// Print the catalog document as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show which dimensions and granularities a metric selection allows
    Compat {
        /// Comma-separated metric ids
        #[arg(long, value_delimiter = ',', required = true)]
        metrics: Vec<String>,
    },
    /// Derive the comparison range for a primary range
    Compare {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// dod, wow, mom or yoy; all modes when omitted
        #[arg(long)]
        mode: Option<ComparisonMode>,
    },
    /// Generate raw hourly rows
    Generate {
        #[arg(long)]
        start: String,
        #[arg(long, default_value = "1")]
        days: i64,
        #[arg(long, default_value = "0")]
        seed: u64,
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    /// Evaluate a query spec (YAML or JSON) end to end
    Query {
        spec: PathBuf,
        #[arg(long, default_value = "0")]
        seed: u64,
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let catalog = load_catalog(args.catalog.as_ref())?;
    let config = load_generator(args.generator.as_ref())?;

    match args.command {
        Commands::Catalog { json } => handle_catalog(&catalog, json),
        Commands::Compat { metrics } => handle_compat(&catalog, &metrics),
        Commands::Compare { start, end, mode } => handle_compare(&start, &end, mode),
        Commands::Generate { start, days, seed, format } => {
            handle_generate(&config, &start, days, seed, format)
        }
        Commands::Query { spec, seed, format } => handle_query(&catalog, &config, &spec, seed, format),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
        ))
        .with_writer(io::stderr)
        .init();
}

fn load_catalog(path: Option<&PathBuf>) -> anyhow::Result<Catalog> {
    match path {
        Some(path) => parser::parse_file(path)
            .with_context(|| format!("loading catalog from {}", path.display())),
        None => Catalog::builtin().context("loading embedded catalog"),
    }
}

fn load_generator(path: Option<&PathBuf>) -> anyhow::Result<GeneratorConfig> {
    let config = match path {
        Some(path) => parser::parse_generator_file(path)
            .with_context(|| format!("loading generator config from {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    config.validate().context("invalid generator config")?;
    Ok(config)
}

fn handle_catalog(catalog: &Catalog, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&catalog.to_def())?);
        return Ok(());
    }

    println!("Metrics");
    for group in catalog.metric_groups() {
        println!("  {}", group.name);
        for metric in group.metrics {
            let star = if metric.starred { "★" } else { " " };
            let dims = metric.compatible_dims.join(", ");
            let grains: Vec<&str> = metric.compatible_granularities.iter().map(|g| g.as_str()).collect();
            println!(
                "    {} {:<14} {:<10} [{}] ({})",
                star,
                metric.id,
                metric.name,
                dims,
                grains.join("/")
            );
        }
    }

    println!("Dimensions");
    for group in catalog.dimension_groups() {
        println!("  {}", group.name);
        for dim in group.dimensions {
            if dim.is_enumerable {
                println!("    {:<14} {:<10} {}", dim.id, dim.name, dim.enum_values.join(", "));
            } else {
                println!("    {:<14} {}", dim.id, dim.name);
            }
        }
    }

    let filterable: Vec<&str> = catalog.enumerable_dimensions().iter().map(|d| d.id.as_str()).collect();
    println!("Filterable: {}", filterable.join(", "));
    Ok(())
}

fn handle_compat(catalog: &Catalog, metrics: &[String]) -> anyhow::Result<()> {
    let granularities = compatible_granularities(catalog, metrics)?;
    let grains: Vec<&str> = granularities.iter().map(|g| g.as_str()).collect();
    println!("Granularities: {}", grains.join(", "));

    println!("Dimensions:");
    for status in dimension_availability(catalog, metrics)? {
        match &status.reason {
            Some(reason) => println!("  ✗ {:<14} {}", status.dimension.id, reason.message),
            None => println!("  ✓ {}", status.dimension.id),
        }
    }
    Ok(())
}

fn handle_compare(start: &str, end: &str, mode: Option<ComparisonMode>) -> anyhow::Result<()> {
    let range = DateRange::parse(start, end)?;
    let modes = match mode {
        Some(mode) => vec![mode],
        None => ComparisonMode::ALL.to_vec(),
    };
    for mode in modes {
        let comparison = range.comparison(mode)?;
        println!(
            "{} {} {} .. {} ({} days)",
            mode,
            mode.label(),
            comparison.start(),
            comparison.end(),
            comparison.days()
        );
    }
    Ok(())
}

fn handle_generate(
    config: &GeneratorConfig,
    start: &str,
    days: i64,
    seed: u64,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let start = parse_date(start)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let rows = generate(config, start, days, &mut rng)?;
    tracing::info!(rows = rows.len(), seed, "generated");
    write_rows(&rows, format)
}

fn handle_query(
    catalog: &Catalog,
    config: &GeneratorConfig,
    path: &Path,
    seed: u64,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading query spec {}", path.display()))?;
    // JSON is a subset of YAML, so one parser covers both
    let spec: QuerySpec = serde_yaml::from_str(&text)
        .with_context(|| format!("parsing query spec {}", path.display()))?;

    let mut rng = StdRng::seed_from_u64(seed);
    let result = evaluate_query(catalog, config, &spec, &mut rng)?;
    tracing::info!(
        rows = result.rows.len(),
        comparison = result.comparison.is_some(),
        "query evaluated"
    );

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        OutputFormat::Csv => {
            if result.comparison.is_some() {
                bail!("CSV output holds a single series; use --format json for comparisons");
            }
            write_rows(&result.rows, format)
        }
    }
}

fn write_rows(rows: &[SeriesRow], format: OutputFormat) -> anyhow::Result<()> {
    let records: Vec<Map<String, Value>> = rows.iter().map(SeriesRow::to_record).collect();
    match format {
        OutputFormat::Json => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            serde_json::to_writer_pretty(&mut out, &records)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let Some(first) = records.first() else {
                return Ok(());
            };
            let headers: Vec<&String> = first.keys().collect();
            let mut writer = csv::Writer::from_writer(io::stdout());
            writer.write_record(&headers)?;
            for record in &records {
                writer.write_record(headers.iter().map(|h| cell(record.get(*h))))?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
