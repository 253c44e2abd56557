// src/services/catalog.rs

//! Catalog page parser.
//!
//! Turns the vendor's HTML server listing into [`CatalogEntry`] records.
//! Offer rows are recognised by shape alone: a row with exactly
//! [`OFFER_CELL_COUNT`] cells is an offer, anything else (headers,
//! separators, unrelated tables) is skipped without complaint.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AppError, Result};
use crate::models::CatalogEntry;
use crate::utils::html;

/// Number of cells in a genuine offer row.
pub const OFFER_CELL_COUNT: usize = 11;

/// Index of the cell holding both prices.
pub const PRICE_CELL: usize = 8;

/// Attribute carrying the hardware reference.
const HARDWARE_ATTR: &str = "data-ref";

/// `<without tax>€ ... IVA ... <with tax>€ IVA incl`
static PRICE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(\d[\d.]*(?:,\d+)?)\s*€.*?IVA.*?(\d[\d.]*(?:,\d+)?)\s*€\s*IVA incl")
        .expect("price pattern")
});

/// Parser for the server listing page.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogParser;

impl CatalogParser {
    pub fn new() -> Self {
        Self
    }

    /// Extract every offer row from the document.
    ///
    /// A row with the offer shape whose price or hardware reference cannot be
    /// read fails the whole parse instead of producing a made-up record.
    pub fn parse(&self, document: &str) -> Result<Vec<CatalogEntry>> {
        let mut entries = Vec::new();
        let mut skipped = 0usize;

        for (index, row) in html::tag_blocks(document, "tr").into_iter().enumerate() {
            match self.parse_row(index, row)? {
                Some(entry) => entries.push(entry),
                None => skipped += 1,
            }
        }

        log::debug!(
            "Catalog parsed: {} offers, {} non-offer rows skipped",
            entries.len(),
            skipped
        );
        Ok(entries)
    }

    /// Parse one `<tr>` body. `Ok(None)` means the row is not an offer.
    pub fn parse_row(&self, index: usize, row: &str) -> Result<Option<CatalogEntry>> {
        let cells = Self::row_cells(row);
        if cells.len() != OFFER_CELL_COUNT {
            return Ok(None);
        }

        let context = format!("catalog row {index}");
        let (price_without_tax, price_with_tax) =
            parse_price_cell(&cells[PRICE_CELL]).map_err(|e| match e {
                AppError::Parse { message, .. } => AppError::parse(&context, message),
                other => other,
            })?;

        let hardware = cells[PRICE_CELL + 1..]
            .iter()
            .find_map(|cell| html::attr_value(cell, HARDWARE_ATTR))
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                let message = format!("no {HARDWARE_ATTR} attribute after the price cell");
                AppError::parse(&context, message)
            })?;

        Ok(Some(CatalogEntry {
            hardware: hardware.trim().to_string(),
            price_without_tax,
            price_with_tax,
        }))
    }

    /// Normalized, span-stripped cells of a row.
    fn row_cells(row: &str) -> Vec<String> {
        let row = html::normalize_row(row);
        html::tag_blocks(&row, "td")
            .into_iter()
            .map(|cell| html::strip_escape_artifacts(&html::strip_spans(cell)))
            .collect()
    }
}

/// Read `(price_without_tax, price_with_tax)` from the combined price cell.
pub fn parse_price_cell(cell: &str) -> Result<(f64, f64)> {
    let caps = PRICE_PATTERN.captures(cell).ok_or_else(|| {
        AppError::parse("price cell", format!("unrecognised price text {cell:?}"))
    })?;

    let without_tax = parse_decimal(&caps[1])?;
    let with_tax = parse_decimal(&caps[2])?;
    if without_tax > with_tax {
        return Err(AppError::parse(
            "price cell",
            format!("price without tax {without_tax} exceeds price with tax {with_tax}"),
        ));
    }
    Ok((without_tax, with_tax))
}

/// Parse a comma-decimal number. When a comma is present, periods are
/// thousands separators.
fn parse_decimal(text: &str) -> Result<f64> {
    let normalized = if text.contains(',') {
        text.replace('.', "").replace(',', ".")
    } else {
        text.to_string()
    };
    normalized
        .parse::<f64>()
        .map_err(|e| AppError::parse("price cell", format!("{text:?}: {e}")))
}
