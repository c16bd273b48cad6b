//! Award-history ledger loading.
//!
//! Each award body ships one CSV with its own column names. Rows flatten
//! into [`AwardRecord`]s — one per credited person — so the aggregator can
//! count multi-person awards once per listed individual.

use chrono::NaiveDate;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::domain::{AwardRecord, LedgerKind};
use crate::error::Result;
use crate::pipeline::credits::{parse_artist_string, WorkerStringParser};
use crate::pipeline::normalize::dedupe_names;

/// A loaded ledger plus the rows that could not be used. Skipped rows are
/// counted, never silently swallowed.
#[derive(Debug, Clone)]
pub struct LoadedLedger {
    pub records: Vec<AwardRecord>,
    pub skipped_rows: usize,
}

/// All three ledgers, loaded once and read-only from then on.
#[derive(Debug, Clone, Default)]
pub struct AwardLedgers {
    pub oscars: Vec<AwardRecord>,
    pub golden_globes: Vec<AwardRecord>,
    pub grammys: Vec<AwardRecord>,
}

/// Ledgers carry a ceremony year, not a date; pin it to April of that year
/// so the temporal join has a concrete cutoff to compare against.
pub fn ceremony_date(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 4, 1)
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "true" | "1")
}

#[derive(Debug, Deserialize)]
struct OscarRow {
    year_ceremony: String,
    category: Option<String>,
    name: String,
    winner: String,
}

/// Academy Awards ledger. Only winning rows are kept; the aggregator never
/// looks at nominations.
pub fn read_oscar_ledger<R: Read>(reader: R) -> Result<LoadedLedger> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    let mut skipped_rows = 0;

    for row in csv_reader.deserialize() {
        let row: OscarRow = match row {
            Ok(row) => row,
            Err(e) => {
                debug!("Skipping malformed ledger row: {}", e);
                skipped_rows += 1;
                continue;
            }
        };
        if !parse_flag(&row.winner) {
            continue;
        }
        let Some(date) = row.year_ceremony.trim().parse().ok().and_then(ceremony_date) else {
            skipped_rows += 1;
            continue;
        };
        records.push(AwardRecord {
            ledger: LedgerKind::Oscars,
            category: row.category.unwrap_or_default(),
            recipient: row.name.trim().to_string(),
            date,
            winner: true,
        });
    }

    Ok(LoadedLedger {
        records,
        skipped_rows,
    })
}

#[derive(Debug, Deserialize)]
struct GoldenGlobeRow {
    year_award: String,
    category: Option<String>,
    nominee: String,
    win: String,
}

/// Golden Globes ledger. Keeps the win flag on every row; filtering happens
/// at aggregation time.
pub fn read_golden_globe_ledger<R: Read>(reader: R) -> Result<LoadedLedger> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    let mut skipped_rows = 0;

    for row in csv_reader.deserialize() {
        let row: GoldenGlobeRow = match row {
            Ok(row) => row,
            Err(e) => {
                debug!("Skipping malformed ledger row: {}", e);
                skipped_rows += 1;
                continue;
            }
        };
        let Some(date) = row.year_award.trim().parse().ok().and_then(ceremony_date) else {
            skipped_rows += 1;
            continue;
        };
        records.push(AwardRecord {
            ledger: LedgerKind::GoldenGlobes,
            category: row.category.unwrap_or_default(),
            recipient: row.nominee.trim().to_string(),
            date,
            winner: parse_flag(&row.win),
        });
    }

    Ok(LoadedLedger {
        records,
        skipped_rows,
    })
}

#[derive(Debug, Deserialize)]
struct GrammyRow {
    year: String,
    published_at: Option<String>,
    category: Option<String>,
    artist: Option<String>,
    workers: Option<String>,
    winner: String,
}

/// Grammy ledger. The artist and workers columns are free text naming several
/// people; each parsed name becomes its own record so one award credited to
/// two people counts for both.
pub fn read_grammy_ledger<R: Read>(
    reader: R,
    worker_parser: &WorkerStringParser,
) -> Result<LoadedLedger> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    let mut skipped_rows = 0;

    for row in csv_reader.deserialize() {
        let row: GrammyRow = match row {
            Ok(row) => row,
            Err(e) => {
                debug!("Skipping malformed ledger row: {}", e);
                skipped_rows += 1;
                continue;
            }
        };

        // Prefer the publication timestamp's calendar date; ceremony year is
        // the fallback
        let published = row
            .published_at
            .as_deref()
            .and_then(|raw| raw.get(..10))
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok());
        let Some(date) = published.or_else(|| {
            row.year.trim().parse().ok().and_then(ceremony_date)
        }) else {
            skipped_rows += 1;
            continue;
        };

        let winner = parse_flag(&row.winner);
        let category = row.category.clone().unwrap_or_default();

        let mut names = Vec::new();
        if let Some(artist) = row.artist.as_deref() {
            names.extend(parse_artist_string(artist));
        }
        if let Some(workers) = row.workers.as_deref() {
            names.extend(worker_parser.parse(workers));
        }
        // One record per person per award row, even when someone appears in
        // both the artist and workers columns
        let names = dedupe_names(names);
        if names.is_empty() {
            skipped_rows += 1;
            continue;
        }

        for name in names {
            records.push(AwardRecord {
                ledger: LedgerKind::Grammys,
                category: category.clone(),
                recipient: name,
                date,
                winner,
            });
        }
    }

    Ok(LoadedLedger {
        records,
        skipped_rows,
    })
}

pub fn load_oscar_ledger(path: &Path) -> Result<LoadedLedger> {
    read_oscar_ledger(File::open(path)?)
}

pub fn load_golden_globe_ledger(path: &Path) -> Result<LoadedLedger> {
    read_golden_globe_ledger(File::open(path)?)
}

pub fn load_grammy_ledger(path: &Path, worker_parser: &WorkerStringParser) -> Result<LoadedLedger> {
    read_grammy_ledger(File::open(path)?, worker_parser)
}
