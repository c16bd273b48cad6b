use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The award bodies whose history ledgers feed the pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LedgerKind {
    /// Academy Awards (film)
    Oscars,
    /// Golden Globes (film)
    GoldenGlobes,
    /// Grammy Awards (music)
    Grammys,
}

impl LedgerKind {
    pub fn table_name(&self) -> &'static str {
        match self {
            LedgerKind::Oscars => "oscar_awards",
            LedgerKind::GoldenGlobes => "golden_globe_awards",
            LedgerKind::Grammys => "grammy_awards",
        }
    }
}

/// One award nomination/win for one credited person. Immutable once loaded;
/// multi-person awards appear as one record per credited individual.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardRecord {
    pub ledger: LedgerKind,
    pub category: String,
    pub recipient: String,
    /// Ceremony date. Ledgers that only carry a ceremony year are pinned to
    /// April of that year.
    pub date: NaiveDate,
    pub winner: bool,
}

/// Fractional membership of the reference roster within a credit list.
///
/// `Unknown` (no credit list at all) and `Zero` (a credit list with no roster
/// matches) are deliberately distinct states so downstream consumers can tell
/// "no signal" from "measured zero".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub enum Proportion {
    #[default]
    Unknown,
    Zero,
    /// match_count / list_len, rounded to two decimal places.
    Ratio(f64),
}

impl Proportion {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Proportion::Unknown => None,
            Proportion::Zero => Some(0.0),
            Proportion::Ratio(v) => Some(*v),
        }
    }
}

/// Cumulative award wins earned by each credit group before the movie's
/// release date. Film roles count against the acting/directing ledgers,
/// soundtrack artists against the music ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PriorAwards {
    pub lead_actors: u32,
    pub supporting_actors: u32,
    pub cast: u32,
    pub directors: u32,
    pub writers: u32,
    pub crew: u32,
    pub soundtrack_artists: u32,
}

/// Reference-roster proportions per credit group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Proportions {
    pub lead_actors: Proportion,
    pub supporting_actors: Proportion,
    pub cast: Proportion,
}

/// The merged, deduplicated representation of one film.
///
/// Created once during reconciliation; the enrichment stages afterwards fill
/// in `prior_awards` and `proportions` (disjoint columns, sequential stages,
/// so there is no concurrent-mutation hazard).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalMovie {
    /// Stable external ID; primary key of the dataset.
    pub imdb_id: String,
    pub tmdb_id: Option<u64>,
    pub title: String,
    pub rated: Option<String>,
    pub released: NaiveDate,
    pub runtime_minutes: u32,
    pub plot: String,
    /// Review-aggregator percentage, 0-100.
    pub critic_score: Option<u8>,
    /// Audience rating scaled to 0-100.
    pub audience_score: Option<u8>,
    pub vote_count: Option<u64>,
    pub box_office: Option<u64>,
    pub opening_weekend_gross: Option<u64>,
    pub worldwide_gross: Option<u64>,
    pub budget: Option<u64>,
    pub genres: Vec<String>,
    pub countries: Vec<String>,
    pub languages: Vec<String>,
    pub production_companies: Vec<String>,
    pub keywords: Vec<String>,
    pub alternative_titles: Vec<String>,
    pub cast: Vec<String>,
    pub crew: Vec<String>,
    pub lead_actors: Vec<String>,
    /// cast − lead_actors, as a set difference over normalized names.
    pub supporting_actors: Vec<String>,
    pub directors: Vec<String>,
    pub writers: Vec<String>,
    pub soundtrack_artists: Vec<String>,
    pub prior_awards: PriorAwards,
    pub proportions: Proportions,
}

/// One actor/crew member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalPerson {
    /// May be absent: some people only exist in one provider's namespace.
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<u64>,
    pub name: String,
    /// Provider gender code (0 unknown, 1 female, 2 male, 3 non-binary).
    pub gender: Option<u8>,
    pub birthday: Option<NaiveDate>,
    pub movie_credits: Vec<String>,
}

/// One flattened soundtrack credit: a person's involvement on one film's
/// soundtrack. The three role flags are independent because the same person
/// regularly holds several roles on one track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundtrackCredit {
    pub imdb_id: String,
    pub name: String,
    pub person_id: Option<String>,
    pub written: bool,
    pub performed: bool,
    pub arranged: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proportion_states_distinguishable() {
        assert_ne!(Proportion::Unknown, Proportion::Zero);
        assert_eq!(Proportion::Unknown.as_f64(), None);
        assert_eq!(Proportion::Zero.as_f64(), Some(0.0));
        assert_eq!(Proportion::Ratio(0.33).as_f64(), Some(0.33));
    }

    #[test]
    fn test_ledger_table_names_distinct() {
        let names = [
            LedgerKind::Oscars.table_name(),
            LedgerKind::GoldenGlobes.table_name(),
            LedgerKind::Grammys.table_name(),
        ];
        assert_eq!(
            names.len(),
            names.iter().collect::<std::collections::HashSet<_>>().len()
        );
    }
}
