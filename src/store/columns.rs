//! Column synonym table for BIN import files
//!
//! Import files come from several publishers and disagree on header names.
//! The header row is resolved once against [`COLUMN_SYNONYMS`]; each data row
//! then takes, per field, the first non-empty value among the matched columns.

use csv_async::StringRecord;

use crate::types::{BinRecord, UNKNOWN, UNKNOWN_COUNTRY_CODE};

/// Canonical fields of a [`BinRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinField {
    Prefix,
    Bank,
    Brand,
    CardType,
    Level,
    CountryName,
    CountryCode,
}

impl BinField {
    const COUNT: usize = 7;

    fn index(self) -> usize {
        match self {
            BinField::Prefix => 0,
            BinField::Bank => 1,
            BinField::Brand => 2,
            BinField::CardType => 3,
            BinField::Level => 4,
            BinField::CountryName => 5,
            BinField::CountryCode => 6,
        }
    }

    /// Value stored when the row has nothing for this field
    pub fn placeholder(self) -> &'static str {
        match self {
            BinField::CountryCode => UNKNOWN_COUNTRY_CODE,
            _ => UNKNOWN,
        }
    }
}

/// Accepted source column names per field, in priority order.
pub const COLUMN_SYNONYMS: &[(BinField, &[&str])] = &[
    (BinField::Prefix, &["BIN", "Bin", "bin"]),
    (BinField::Bank, &["Issuer", "Bank"]),
    (BinField::Brand, &["Brand", "Scheme"]),
    (BinField::CardType, &["Type"]),
    (BinField::Level, &["Category", "Level"]),
    (BinField::CountryName, &["CountryName", "Country"]),
    (BinField::CountryCode, &["isoCode2", "CountryCode"]),
];

/// Header positions for every canonical field, resolved from one header row.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    columns: [Vec<usize>; BinField::COUNT],
}

impl ColumnMap {
    /// Resolve header names against the synonym table.
    ///
    /// Exact matches are taken in synonym order; a header that only matches
    /// ignoring ASCII case is appended after them.
    pub fn from_headers<'a, I>(headers: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let headers: Vec<&str> = headers
            .into_iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();

        let mut map = Self::default();
        for (field, synonyms) in COLUMN_SYNONYMS {
            let slot = &mut map.columns[field.index()];

            for synonym in synonyms.iter() {
                if let Some(pos) = headers.iter().position(|h| h == synonym) {
                    if !slot.contains(&pos) {
                        slot.push(pos);
                    }
                }
            }

            for synonym in synonyms.iter() {
                for (pos, header) in headers.iter().enumerate() {
                    if header.eq_ignore_ascii_case(synonym) && !slot.contains(&pos) {
                        slot.push(pos);
                    }
                }
            }
        }
        map
    }

    /// Whether any key column was recognized
    pub fn has_key(&self) -> bool {
        !self.columns[BinField::Prefix.index()].is_empty()
    }

    /// First non-empty value for `field` in this row
    pub fn get<'r>(&self, field: BinField, row: &'r StringRecord) -> Option<&'r str> {
        self.columns[field.index()]
            .iter()
            .filter_map(|&pos| row.get(pos))
            .map(str::trim)
            .find(|value| !value.is_empty())
    }

    /// Build a record from one data row; `None` when the row has no key.
    pub fn to_record(&self, row: &StringRecord) -> Option<BinRecord> {
        let prefix = self.get(BinField::Prefix, row)?.to_string();
        let field = |f: BinField| self.get(f, row).unwrap_or(f.placeholder()).to_string();

        Some(BinRecord {
            prefix,
            bank: field(BinField::Bank),
            brand: field(BinField::Brand),
            card_type: field(BinField::CardType),
            level: field(BinField::Level),
            country_name: field(BinField::CountryName),
            country_code: field(BinField::CountryCode),
        })
    }
}
