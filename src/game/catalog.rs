use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::game::cards::DistrictCard;
use crate::game::deck::Deck;
use crate::types::DistrictColor;

const BUNDLED_CATALOG: &str = include_str!("../../data/districts.tsv");

static BUNDLED_ROWS: Lazy<Result<Vec<CatalogRow>, RowError>> =
    Lazy::new(|| parse_catalog(BUNDLED_CATALOG));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    pub name: String,
    pub quantity: u32,
    pub color: DistrictColor,
    pub cost: u32,
    pub ability: String,
}

/// A malformed catalog line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    #[error("line {line}: missing {field}")]
    MissingField { line: usize, field: &'static str },
    #[error("line {line}: {field} is not a number: {value:?}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },
    #[error("line {line}: unknown color {value:?}")]
    UnknownColor { line: usize, value: String },
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Row(#[from] RowError),
    #[error("cannot read catalog: {0}")]
    Io(#[from] io::Error),
}

/// Parses tab-separated rows of name, quantity, color, cost and optional
/// ability text. The first line is a header.
pub fn parse_catalog(text: &str) -> Result<Vec<CatalogRow>, RowError> {
    let mut rows = Vec::new();
    for (idx, raw) in text.lines().enumerate().skip(1) {
        let line = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }
        let mut parts = raw.split('\t');
        let name = field(parts.next(), line, "name")?.to_string();
        let quantity = number(parts.next(), line, "quantity")?;
        let color_raw = field(parts.next(), line, "color")?;
        let color = DistrictColor::from_str(color_raw).map_err(|_| RowError::UnknownColor {
            line,
            value: color_raw.to_string(),
        })?;
        let cost = number(parts.next(), line, "cost")?;
        let ability = parts.next().unwrap_or("").trim().to_string();
        rows.push(CatalogRow {
            name,
            quantity,
            color,
            cost,
            ability,
        });
    }
    Ok(rows)
}

fn field<'a>(
    value: Option<&'a str>,
    line: usize,
    field: &'static str,
) -> Result<&'a str, RowError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(RowError::MissingField { line, field }),
    }
}

fn number(value: Option<&str>, line: usize, name: &'static str) -> Result<u32, RowError> {
    let raw = field(value, line, name)?;
    raw.parse().map_err(|_| RowError::InvalidNumber {
        line,
        field: name,
        value: raw.to_string(),
    })
}

/// Expands every row into `quantity` copies, in catalog order. Unshuffled.
pub fn build_deck(rows: &[CatalogRow]) -> Deck<DistrictCard> {
    let mut deck = Deck::new();
    for row in rows {
        for _ in 0..row.quantity {
            deck.add(DistrictCard::new(
                row.name.clone(),
                row.cost,
                row.color,
                row.ability.clone(),
            ));
        }
    }
    deck
}

pub fn bundled_rows() -> Result<Vec<CatalogRow>, CatalogError> {
    Ok(BUNDLED_ROWS.clone()?)
}

pub fn bundled_deck() -> Result<Deck<DistrictCard>, CatalogError> {
    Ok(build_deck(&bundled_rows()?))
}

pub fn load_deck(path: &Path) -> Result<Deck<DistrictCard>, CatalogError> {
    let text = fs::read_to_string(path)?;
    Ok(build_deck(&parse_catalog(&text)?))
}
