//! Shared utilities for CLI commands

use miette::Result;
use std::path::Path;

use crate::cli::{GlobalOpts, OutputFormat, SelectionOpts};
use crate::core::loader::{load_catalog, load_prices};
use crate::core::{BulkSelection, Config, PartRef, PartToggled, SelectionSession};
use crate::entities::Part;

/// Load a catalog into a fresh session
pub fn open_session(catalog: &Path, config: &Config) -> Result<SelectionSession> {
    let categories = load_catalog(catalog)?;
    let mut session = SelectionSession::new(config.key_prefix());
    session.on_catalog_changed(categories);
    Ok(session)
}

/// Resolve a part reference to owned (category id, tor id, part)
pub fn resolve_part(
    session: &SelectionSession,
    part_ref: &PartRef,
) -> Result<(String, String, Part)> {
    session
        .find_part(part_ref)
        .map(|(category, tor, part)| (category.id.clone(), tor.id.clone(), part.clone()))
        .ok_or_else(|| miette::miette!("Part '{}' not found in catalog", part_ref))
}

/// Replay selection options against a session, in event order:
/// category selections, part selections, deselections, quantity, prices
///
/// Returns the toggle events emitted for individual parts.
pub fn apply_selection(
    session: &mut SelectionSession,
    opts: &SelectionOpts,
) -> Result<Vec<PartToggled>> {
    let mut events = Vec::new();

    for category_id in &opts.categories {
        let command = BulkSelection {
            checked: true,
            category_id: category_id.clone(),
        };
        if !session.on_bulk_selection(&command) {
            return Err(miette::miette!("Category '{}' not found in catalog", category_id));
        }
    }

    let toggles = opts
        .parts
        .iter()
        .map(|r| (r, true))
        .chain(opts.deselect.iter().map(|r| (r, false)));

    for (part_ref, checked) in toggles {
        let (category_id, tor_id, part) = resolve_part(session, part_ref)?;
        if let Some(event) = session.toggle_part(&category_id, &tor_id, &part, checked) {
            events.push(event);
        }
    }

    if let Some(quantity) = opts.quantity {
        session.set_quantity(quantity);
    }

    if let Some(path) = &opts.prices {
        session.on_prices_changed(load_prices(path)?);
    }

    Ok(events)
}

/// Effective output format: explicit flag, then configured default, then `fallback`
pub fn effective_format(
    global: &GlobalOpts,
    config: &Config,
    fallback: OutputFormat,
) -> OutputFormat {
    match global.format {
        OutputFormat::Auto => OutputFormat::from_config(config.default_format.as_deref())
            .filter(|f| *f != OutputFormat::Auto)
            .unwrap_or(fallback),
        explicit => explicit,
    }
}
