//! `repmat details` command - details payload for one priced part
//!
//! Assembles the same payload a details dialog receives: every part of the
//! inspected part's cell paired with its price, excluded parts at quantity 1,
//! plus currency and warehouse context from the configuration.

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::commands::utils::{apply_selection, effective_format, open_session};
use crate::cli::helpers::format_price;
use crate::cli::{GlobalOpts, OutputFormat, SelectionOpts};
use crate::core::{Config, DetailsDialog, DetailsPayload, PartRef, PartWithInfo};

#[derive(clap::Args, Debug)]
pub struct DetailsArgs {
    /// Catalog file (YAML or JSON)
    pub catalog: PathBuf,

    /// Part to inspect: CATEGORY/TOR/PART[/SOS]
    #[arg(long = "inspect", short = 'i', value_name = "REF")]
    pub inspect: PartRef,

    #[command(flatten)]
    pub selection: SelectionOpts,

    /// Warehouse label (overrides configuration)
    #[arg(long)]
    pub warehouse: Option<String>,

    /// Currency (overrides configuration)
    #[arg(long)]
    pub currency: Option<String>,
}

/// Dialog that prints the payload to stdout
struct PrintDialog {
    format: OutputFormat,
}

impl DetailsDialog for PrintDialog {
    fn open(&mut self, payload: DetailsPayload) {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&payload).unwrap_or_default());
            }
            OutputFormat::Yaml => {
                print!("{}", serde_yml::to_string(&payload).unwrap_or_default());
            }
            _ => print_summary(&payload),
        }
    }
}

pub fn run(args: DetailsArgs, global: &GlobalOpts) -> Result<()> {
    let mut config = Config::load();
    config.merge(Config {
        currency: args.currency.clone(),
        warehouse: args.warehouse.clone(),
        ..Default::default()
    });

    let mut session = open_session(&args.catalog, &config)?;
    apply_selection(&mut session, &args.selection)?;

    if session.find_part(&args.inspect).is_none() {
        return Err(miette::miette!("Part '{}' not found in catalog", args.inspect));
    }

    let mut dialog = PrintDialog {
        format: effective_format(global, &config, OutputFormat::Auto),
    };
    if !session.open_details(&args.inspect, &config.details_context(), &mut dialog) {
        return Err(miette::miette!(
            help = "pass a price file with --prices that lists this part",
            "No price data for '{}'",
            args.inspect
        ));
    }

    Ok(())
}

fn print_summary(payload: &DetailsPayload) {
    let inspected = &payload.inspected;
    println!(
        "{} {} / {}",
        style("Details").bold().cyan(),
        payload.category.title,
        payload.tor.title
    );
    println!(
        "  Inspected: {} × {}  {}",
        inspected.part().label(),
        inspected.quantity(),
        format_price(inspected.line_total(), &payload.currency)
    );
    if let Some(warehouse) = &payload.warehouse {
        println!("  Warehouse: {}", warehouse);
    }

    println!();
    println!("{}", style("Included parts").bold());
    for entry in &payload.parts_with_info.included {
        print_line(entry, &payload.currency);
    }

    if !payload.parts_with_info.excluded.is_empty() {
        println!();
        println!("{}", style("Excluded parts").bold());
        for entry in &payload.parts_with_info.excluded {
            print_line(entry, &payload.currency);
        }
    }

    println!();
    println!(
        "Included total: {}",
        style(format_price(Some(payload.included_total()), &payload.currency)).bold()
    );
}

fn print_line(entry: &PartWithInfo, currency: &str) {
    match &entry.info {
        Some(info) => {
            let stock = match info.price.available {
                Some(n) if info.price.covers(info.quantity()) => {
                    style(format!("{} in stock", n)).green()
                }
                Some(n) => style(format!("{} in stock", n)).yellow(),
                None => style("stock unknown".to_string()).dim(),
            };
            println!(
                "  {:<20} × {:<4} {:>14}  {}",
                entry.part.label(),
                info.quantity(),
                format_price(info.line_total(), currency),
                stock
            );
        }
        None => println!(
            "  {:<20} × {:<4} {:>14}",
            entry.part.label(),
            entry.part.quantity,
            style("no price available").dim()
        ),
    }
}
