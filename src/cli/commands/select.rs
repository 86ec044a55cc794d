//! `repmat select` command - replay selection events and print the selection

use console::style;
use miette::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::commands::utils::{apply_selection, effective_format, open_session};
use crate::cli::helpers::{escape_csv, escape_tsv, format_price, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat, SelectionOpts};
use crate::core::{Config, PartToggled, SelectionEngine, SelectionSummary};

#[derive(clap::Args, Debug)]
pub struct SelectArgs {
    /// Catalog file (YAML or JSON)
    pub catalog: PathBuf,

    #[command(flatten)]
    pub selection: SelectionOpts,

    /// Print only the selection, not the toggle events
    #[arg(long)]
    pub no_events: bool,
}

/// One selected part with its price overlay
///
/// Price columns stay empty while the part awaits a price for its quantity.
#[derive(Debug, Serialize)]
struct SelectedRow {
    key: String,
    category_id: String,
    tor_id: String,
    part_number: String,
    sos: String,
    excluded: bool,
    quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line_total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    available: Option<u32>,
}

#[derive(Debug, Serialize)]
struct SelectionReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<&'a [PartToggled]>,
    selected: Vec<SelectedRow>,
    summary: SelectionSummary,
}

fn selected_rows(engine: &SelectionEngine) -> Vec<SelectedRow> {
    engine
        .selected()
        .iter()
        .map(|(key, item)| {
            let checked = engine.current_price(key);
            SelectedRow {
                key: engine.render_key(key),
                category_id: item.category_id.clone(),
                tor_id: item.tor_id.clone(),
                part_number: item.part.part_number.clone(),
                sos: item.part.sos.clone(),
                excluded: item.part.is_excluded,
                quantity: item.quantity(),
                unit_price: checked.and_then(|c| c.price.unit_price),
                line_total: checked.and_then(|c| c.line_total()),
                available: checked.and_then(|c| c.price.available),
            }
        })
        .collect()
}

pub fn run(args: SelectArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let mut session = open_session(&args.catalog, &config)?;
    let events = apply_selection(&mut session, &args.selection)?;

    let engine = session.engine();
    let report = SelectionReport {
        events: if args.no_events { None } else { Some(events.as_slice()) },
        selected: selected_rows(engine),
        summary: engine.summary(),
    };
    let currency = report
        .summary
        .currency
        .clone()
        .unwrap_or_else(|| config.currency().to_string());

    match effective_format(global, &config, OutputFormat::Tsv) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&report).unwrap_or_default());
        }
        OutputFormat::Csv => {
            println!("key,category,tor,part,sos,excluded,qty,unit_price,line_total");
            for row in &report.selected {
                println!(
                    "{},{},{},{},{},{},{},{},{}",
                    escape_csv(&row.key),
                    escape_csv(&row.category_id),
                    escape_csv(&row.tor_id),
                    escape_csv(&row.part_number),
                    escape_csv(&row.sos),
                    row.excluded,
                    row.quantity,
                    row.unit_price.map(|p| p.to_string()).unwrap_or_default(),
                    row.line_total.map(|p| p.to_string()).unwrap_or_default(),
                );
            }
        }
        OutputFormat::Md => {
            println!("| Key | Part | Qty | Unit price | Total |");
            println!("|---|---|---|---|---|");
            for row in &report.selected {
                println!(
                    "| {} | {} | {} | {} | {} |",
                    row.key,
                    row.part_number,
                    row.quantity,
                    format_price(row.unit_price, &currency),
                    format_price(row.line_total, &currency),
                );
            }
        }
        OutputFormat::Tsv | OutputFormat::Auto => {
            output_tsv(&report, &currency, global.quiet);
        }
    }

    Ok(())
}

fn output_tsv(report: &SelectionReport<'_>, currency: &str, quiet: bool) {
    if let Some(events) = report.events {
        if !quiet {
            for event in events {
                let action = if event.checked {
                    style("+").green()
                } else {
                    style("-").red()
                };
                let category_state = if event.category_checked {
                    style("category complete").green().to_string()
                } else {
                    style("category partial").dim().to_string()
                };
                eprintln!("{} {} ({})", action, event.key, category_state);
            }
        }
    }

    if !quiet {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            style("KEY").bold(),
            style("PART").bold(),
            style("SOS").bold(),
            style("QTY").bold(),
            style("UNIT").bold(),
            style("TOTAL").bold()
        );
    }
    for row in &report.selected {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            truncate_str(&escape_tsv(&row.key), 32),
            truncate_str(&escape_tsv(&row.part_number), 12),
            escape_tsv(&row.sos),
            row.quantity,
            format_price(row.unit_price, currency),
            format_price(row.line_total, currency),
        );
    }

    if !quiet {
        let summary = &report.summary;
        println!();
        println!(
            "{} selected part(s), {} priced, {} awaiting price. Total: {}",
            style(summary.selected).cyan(),
            summary.priced,
            summary.unpriced,
            style(format_price(Some(summary.total_cost), currency)).bold()
        );
    }
}
