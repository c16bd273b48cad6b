//! Free-text credit parsers: role-annotated name strings and nested
//! soundtrack-credit documents, flattened into normalized person lists.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::domain::SoundtrackCredit;
use crate::pipeline::normalize::norm_key;
use crate::sources::imdb::{CreditField, ImdbSoundtrack};

static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\([^)]*\)").unwrap());

/// Parses a comma-separated list of "Name (role)" pairs into bare names.
///
/// `"Alice Smith (producer), Bob Jones"` → `["Alice Smith", "Bob Jones"]`.
/// A name that itself contains parentheses is misparsed; the annotation
/// pattern cannot tell the two apart.
pub fn parse_annotated_credits(raw: &str) -> Vec<String> {
    let stripped = PARENTHETICAL.replace_all(raw, "");
    stripped
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

static SEMICOLON_ROLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w*\s*\w+;").unwrap());
static FEATURING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\weaturing").unwrap());
static LETTER_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\w\)").unwrap());
static NON_NAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9,.+\-*'$äöüÄÖÜßáéíóúñ]").unwrap());

/// Parses the free-text "workers" strings of the music-award ledger, which
/// mix role keywords and names joined by ampersands, "featuring" and
/// semicolons.
pub struct WorkerStringParser {
    role_keywords: Regex,
}

impl WorkerStringParser {
    /// Compiles the role-keyword pattern from the configured allow-list.
    /// Keywords match as token prefixes ("produce" covers "producers").
    pub fn new(role_keywords: &[String]) -> Self {
        let alternation = role_keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = if alternation.is_empty() {
            // A pattern that can never match
            r"\b\B".to_string()
        } else {
            format!(r"(?:{})\w*", alternation)
        };
        Self {
            role_keywords: Regex::new(&pattern).unwrap(),
        }
    }

    /// Order matters here: role keywords are often embedded without their own
    /// delimiter, so they must be removed before the final comma split.
    pub fn parse(&self, raw: &str) -> Vec<String> {
        let mut text = SEMICOLON_ROLE.replace_all(raw, "").to_string();
        text = text.replace('&', ",");
        text = FEATURING.replace_all(&text, ",").to_string();
        text = LETTER_MARKER.replace_all(&text, "").to_string();
        text = text.replace(['(', ')'], ",");
        text = self.role_keywords.replace_all(&text, "").to_string();
        text = NON_NAME_CHARS.replace_all(&text, " ").to_string();
        text.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Parses the ledger "artist" column: unify joiners, split, trim.
pub fn parse_artist_string(raw: &str) -> Vec<String> {
    let mut text = raw.replace('&', ",");
    text = FEATURING.replace_all(&text, ",").to_string();
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// Fixed truncation offsets for the role-prefix phrases found in free-text
// credit strings. If the phrase text ever drifts (a trailing space, a
// different verb form) names get silently mis-truncated; kept as offsets for
// output compatibility with the historical datasets.
const WRITTEN_BY_OFFSET: usize = "Written by ".len();
const PERFORMED_BY_OFFSET: usize = "Performed by ".len();
const ARRANGED_BY_OFFSET: usize = "Arranged by ".len();

#[derive(Debug, Clone, Copy, PartialEq)]
enum TrackRole {
    Written,
    Performed,
    Arranged,
}

impl TrackRole {
    fn prefix_offset(&self) -> usize {
        match self {
            TrackRole::Written => WRITTEN_BY_OFFSET,
            TrackRole::Performed => PERFORMED_BY_OFFSET,
            TrackRole::Arranged => ARRANGED_BY_OFFSET,
        }
    }
}

/// Extracts (name, id) pairs from one role field. Structured lists pass
/// through; free text splits on commas or, with no delimiter present, has the
/// role-prefix phrase stripped by fixed offset.
fn credit_field_names(field: &CreditField, role: TrackRole) -> Vec<(String, Option<String>)> {
    match field {
        CreditField::People(people) => people
            .iter()
            .filter(|p| !p.name.trim().is_empty())
            .map(|p| (p.name.trim().to_string(), p.id.clone()))
            .collect(),
        CreditField::Text(text) => {
            let names: Vec<String> = if text.contains(',') {
                text.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            } else {
                let stripped = text.get(role.prefix_offset()..).unwrap_or("").trim();
                if stripped.is_empty() {
                    debug!("Credit text too short to strip role phrase: {:?}", text);
                    Vec::new()
                } else {
                    vec![stripped.to_string()]
                }
            };
            names.into_iter().map(|n| (n, None)).collect()
        }
    }
}

/// Flattens one soundtrack document into one row per credited person, with
/// independent written/performed/arranged flags. The same person regularly
/// holds several roles on one track, so roles are flags rather than an enum.
pub fn flatten_soundtrack(doc: &ImdbSoundtrack) -> Vec<SoundtrackCredit> {
    let Some(imdb_id) = doc.imdb_id.as_deref().filter(|id| !id.is_empty()) else {
        return Vec::new();
    };

    let mut rows: Vec<SoundtrackCredit> = Vec::new();
    let mut add = |name: String, person_id: Option<String>, role: TrackRole| {
        let key = norm_key(&name);
        let index = match rows.iter().position(|r| norm_key(&r.name) == key) {
            Some(index) => index,
            None => {
                rows.push(SoundtrackCredit {
                    imdb_id: imdb_id.to_string(),
                    name,
                    person_id: None,
                    written: false,
                    performed: false,
                    arranged: false,
                });
                rows.len() - 1
            }
        };
        let row = &mut rows[index];
        if row.person_id.is_none() {
            row.person_id = person_id;
        }
        match role {
            TrackRole::Written => row.written = true,
            TrackRole::Performed => row.performed = true,
            TrackRole::Arranged => row.arranged = true,
        }
    };

    for track in &doc.tracks {
        for (field, role) in [
            (&track.writers, TrackRole::Written),
            (&track.performers, TrackRole::Performed),
            (&track.arrangers, TrackRole::Arranged),
        ] {
            if let Some(field) = field {
                for (name, person_id) in credit_field_names(field, role) {
                    add(name, person_id, role);
                }
            }
        }
    }

    rows
}
