//! Cumulative prior-award counting: a temporal join of credit lists against
//! the read-only award ledgers.

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::domain::{AwardRecord, PriorAwards};
use crate::pipeline::ledger::AwardLedgers;
use crate::pipeline::normalize::norm_key;

/// Counts ledger wins dated strictly before `cutoff` that went to any of the
/// given names.
///
/// Names are not deduplicated against each other: a multi-person award
/// appears in the ledger once per credited individual, so an award shared by
/// two listed people counts twice. An empty name list yields zero.
pub fn total_prior_awards(names: &[String], cutoff: NaiveDate, ledger: &[AwardRecord]) -> u32 {
    if names.is_empty() {
        return 0;
    }
    let keys: HashSet<String> = names.iter().map(|n| norm_key(n)).collect();
    ledger
        .iter()
        .filter(|record| {
            record.winner && record.date < cutoff && keys.contains(&norm_key(&record.recipient))
        })
        .count() as u32
}

impl AwardLedgers {
    /// Film-industry wins (acting/directing bodies) before the cutoff.
    pub fn film_awards_before(&self, names: &[String], cutoff: NaiveDate) -> u32 {
        total_prior_awards(names, cutoff, &self.oscars)
            + total_prior_awards(names, cutoff, &self.golden_globes)
    }

    /// Music-industry wins before the cutoff. Never mixed with the film
    /// ledgers: soundtrack credits are only ever counted here.
    pub fn music_awards_before(&self, names: &[String], cutoff: NaiveDate) -> u32 {
        total_prior_awards(names, cutoff, &self.grammys)
    }
}

/// Computes every per-role award column for one movie. The cutoff is the
/// movie's own release date, so only strictly-prior recognition counts.
pub fn prior_awards_for_movie(
    ledgers: &AwardLedgers,
    released: NaiveDate,
    lead_actors: &[String],
    supporting_actors: &[String],
    cast: &[String],
    directors: &[String],
    writers: &[String],
    crew: &[String],
    soundtrack_artists: &[String],
) -> PriorAwards {
    PriorAwards {
        lead_actors: ledgers.film_awards_before(lead_actors, released),
        supporting_actors: ledgers.film_awards_before(supporting_actors, released),
        cast: ledgers.film_awards_before(cast, released),
        directors: ledgers.film_awards_before(directors, released),
        writers: ledgers.film_awards_before(writers, released),
        crew: ledgers.film_awards_before(crew, released),
        soundtrack_artists: ledgers.music_awards_before(soundtrack_artists, released),
    }
}
