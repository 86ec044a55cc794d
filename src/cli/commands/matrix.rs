//! `repmat matrix` command - repair-type × category matrix of a catalog
//!
//! Rows are categories in catalog order, columns are repair-types ordered by
//! how many categories offer them. Each cell shows `included+excluded` part
//! counts, marked when some (`~`) or all (`✓`) of its parts are selected.

use console::style;
use miette::Result;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::commands::utils::{apply_selection, effective_format, open_session};
use crate::cli::helpers::{axis_label, escape_csv, escape_tsv};
use crate::cli::{GlobalOpts, OutputFormat, SelectionOpts};
use crate::core::{Config, MatrixStats, SelectionSession};

#[derive(clap::Args, Debug)]
pub struct MatrixArgs {
    /// Catalog file (YAML or JSON)
    pub catalog: PathBuf,

    #[command(flatten)]
    pub selection: SelectionOpts,

    /// Show matrix statistics
    #[arg(long, short = 's')]
    pub stats: bool,
}

/// Selection state of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum CellMark {
    None,
    Partial,
    Full,
}

impl CellMark {
    fn of(selected: usize, total: usize) -> Self {
        if selected == 0 {
            CellMark::None
        } else if selected < total {
            CellMark::Partial
        } else {
            CellMark::Full
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            CellMark::None => "",
            CellMark::Partial => " ~",
            CellMark::Full => " ✓",
        }
    }
}

#[derive(Debug, Serialize)]
struct ColumnView {
    id: String,
    title: String,
}

#[derive(Debug, Serialize)]
struct CellView {
    tor_id: String,
    included: usize,
    excluded: usize,
    selected: usize,
    mark: CellMark,
}

impl CellView {
    fn label(&self) -> String {
        format!("{}+{}{}", self.included, self.excluded, self.mark.symbol())
    }
}

#[derive(Debug, Serialize)]
struct RowView {
    id: String,
    title: String,
    fully_selected: bool,
    cells: Vec<Option<CellView>>,
}

#[derive(Debug, Serialize)]
struct MatrixView {
    columns: Vec<ColumnView>,
    rows: Vec<RowView>,
    stats: MatrixStats,
}

impl MatrixView {
    fn from_session(session: &SelectionSession) -> Self {
        let matrix = session.matrix();
        let engine = session.engine();

        let columns = matrix
            .columns()
            .iter()
            .map(|id| ColumnView {
                id: id.clone(),
                title: matrix.tor_title(id).unwrap_or_default().to_string(),
            })
            .collect();

        let rows = matrix
            .rows()
            .iter()
            .map(|category_id| {
                let cells = matrix
                    .columns()
                    .iter()
                    .map(|tor_id| {
                        matrix.cell(tor_id, category_id).map(|cell| {
                            let selected = engine.selected_in_cell(category_id, tor_id, cell);
                            CellView {
                                tor_id: tor_id.clone(),
                                included: cell.included_parts.len(),
                                excluded: cell.excluded_parts.len(),
                                selected,
                                mark: CellMark::of(selected, cell.part_count()),
                            }
                        })
                    })
                    .collect();

                RowView {
                    id: category_id.clone(),
                    title: matrix.category_title(category_id).unwrap_or_default().to_string(),
                    fully_selected: session
                        .category(category_id)
                        .map_or(false, |c| engine.is_category_fully_selected(c)),
                    cells,
                }
            })
            .collect();

        Self {
            columns,
            rows,
            stats: matrix.stats(),
        }
    }

    fn header(&self) -> Vec<String> {
        let mut header = vec!["Category".to_string()];
        header.extend(self.columns.iter().map(|c| axis_label(&c.id, Some(&c.title))));
        header.push("All".to_string());
        header
    }

    fn row_labels(&self, row: &RowView) -> Vec<String> {
        let mut record = vec![axis_label(&row.id, Some(&row.title))];
        record.extend(
            row.cells
                .iter()
                .map(|cell| cell.as_ref().map(CellView::label).unwrap_or_default()),
        );
        record.push(if row.fully_selected { "✓" } else { "" }.to_string());
        record
    }
}

pub fn run(args: MatrixArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let mut session = open_session(&args.catalog, &config)?;
    apply_selection(&mut session, &args.selection)?;

    if session.matrix().is_empty() {
        if !global.quiet {
            println!("No repair-types found in {}", args.catalog.display());
        }
        return Ok(());
    }

    let view = MatrixView::from_session(&session);

    match effective_format(global, &config, OutputFormat::Auto) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&view).unwrap_or_default());
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&view).unwrap_or_default());
        }
        OutputFormat::Csv => output_delimited(&view, ",", escape_csv),
        OutputFormat::Tsv => output_delimited(&view, "\t", escape_tsv),
        OutputFormat::Md => output_table(&view, true, args.stats, global.quiet),
        OutputFormat::Auto => output_table(&view, false, args.stats, global.quiet),
    }

    Ok(())
}

fn output_table(view: &MatrixView, markdown: bool, show_stats: bool, quiet: bool) {
    let mut builder = Builder::default();
    builder.push_record(view.header());
    for row in &view.rows {
        builder.push_record(view.row_labels(row));
    }

    let mut table = builder.build();
    if markdown {
        table.with(Style::markdown());
    } else {
        table.with(Style::rounded());
    }

    if !quiet && !markdown {
        println!("{}", style("Repair Matrix").bold().cyan());
    }
    println!("{}", table);

    if quiet {
        return;
    }

    let stats = view.stats;
    println!();
    if show_stats {
        println!("{}", style("Matrix Statistics").bold());
        println!("  Categories:      {}", stats.categories);
        println!("  Repair-types:    {}", stats.repair_types);
        println!(
            "  Populated cells: {}/{}",
            stats.populated_cells,
            stats.categories * stats.repair_types
        );
        println!("  Listed parts:    {}", stats.total_parts);
    } else {
        println!(
            "{}: {} categories × {} repair-types ({} parts)",
            style("Summary").bold(),
            stats.categories,
            stats.repair_types,
            stats.total_parts
        );
    }
}

fn output_delimited(view: &MatrixView, sep: &str, escape: fn(&str) -> String) {
    let line = |cells: Vec<String>| {
        cells
            .iter()
            .map(|c| escape(c))
            .collect::<Vec<_>>()
            .join(sep)
    };

    println!("{}", line(view.header()));
    for row in &view.rows {
        println!("{}", line(view.row_labels(row)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Category, Part, RepairType};

    fn session() -> SelectionSession {
        let mut session = SelectionSession::new("repair");
        session.on_catalog_changed(vec![
            Category::new("C1", "Brakes").with_repair_type(
                RepairType::new("T1", "Pads")
                    .include(Part::new("P1", "A"))
                    .exclude(Part::new("P2", "B")),
            ),
            Category::new("C2", "Engine")
                .with_repair_type(RepairType::new("T2", "Seal").include(Part::new("P3", "A"))),
        ]);
        session
    }

    #[test]
    fn test_cell_mark() {
        assert_eq!(CellMark::of(0, 2), CellMark::None);
        assert_eq!(CellMark::of(1, 2), CellMark::Partial);
        assert_eq!(CellMark::of(2, 2), CellMark::Full);
    }

    #[test]
    fn test_view_reflects_selection() {
        let mut session = session();
        session.toggle_part("C1", "T1", &Part::new("P1", "A"), true);

        let view = MatrixView::from_session(&session);
        assert_eq!(view.columns.len(), 2);
        assert_eq!(view.rows.len(), 2);

        let c1 = &view.rows[0];
        let cell = c1.cells[0].as_ref().unwrap();
        assert_eq!(cell.included, 1);
        assert_eq!(cell.excluded, 1);
        assert_eq!(cell.mark, CellMark::Partial);
        assert!(c1.cells[1].is_none());
        assert!(!c1.fully_selected);

        assert_eq!(view.row_labels(c1), vec!["Brakes (C1)", "1+1 ~", "", ""]);
    }

    #[test]
    fn test_header_labels() {
        let view = MatrixView::from_session(&session());
        assert_eq!(view.header(), vec!["Category", "Pads (T1)", "Seal (T2)", "All"]);
    }
}
