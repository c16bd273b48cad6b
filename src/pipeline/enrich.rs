//! Enrichment: fills the derived columns of already-reconciled movies.
//!
//! Runs after reconciliation and writes a disjoint column set
//! (`prior_awards`, `proportions`), so it can mutate the table in place.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{CanonicalMovie, Proportion, Proportions};
use crate::pipeline::awards::prior_awards_for_movie;
use crate::pipeline::ledger::AwardLedgers;
use crate::pipeline::proportion::roster_proportion;

const PROGRESS_INTERVAL: usize = 250;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrichStats {
    pub movies: usize,
    pub movies_with_prior_awards: usize,
    /// Movies where the lead list was empty, so the lead proportion carries
    /// no signal at all.
    pub lead_proportion_unknown: usize,
    pub roster_size: usize,
}

/// Computes both derived column groups for every movie. The cutoff for award
/// counting is always the movie's own release date.
pub fn enrich_movies(
    movies: &mut [CanonicalMovie],
    ledgers: &AwardLedgers,
    roster: &[String],
) -> EnrichStats {
    let mut stats = EnrichStats {
        movies: movies.len(),
        roster_size: roster.len(),
        ..Default::default()
    };
    let total = movies.len();

    for (processed, movie) in movies.iter_mut().enumerate() {
        if processed > 0 && processed % PROGRESS_INTERVAL == 0 {
            info!("Enriching movies: {} / {}", processed, total);
        }

        let prior_awards = prior_awards_for_movie(
            ledgers,
            movie.released,
            &movie.lead_actors,
            &movie.supporting_actors,
            &movie.cast,
            &movie.directors,
            &movie.writers,
            &movie.crew,
            &movie.soundtrack_artists,
        );
        let proportions = Proportions {
            lead_actors: roster_proportion(&movie.lead_actors, roster),
            supporting_actors: roster_proportion(&movie.supporting_actors, roster),
            cast: roster_proportion(&movie.cast, roster),
        };

        if prior_awards != Default::default() {
            stats.movies_with_prior_awards += 1;
        }
        if proportions.lead_actors == Proportion::Unknown {
            stats.lead_proportion_unknown += 1;
        }

        movie.prior_awards = prior_awards;
        movie.proportions = proportions;
    }

    info!(
        "Enrichment complete: {} movies, {} with prior awards, roster of {}",
        stats.movies, stats.movies_with_prior_awards, stats.roster_size
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AwardRecord, LedgerKind, PriorAwards};
    use chrono::NaiveDate;

    fn movie(released: NaiveDate, leads: &[&str], cast: &[&str]) -> CanonicalMovie {
        CanonicalMovie {
            imdb_id: "tt0000001".to_string(),
            tmdb_id: None,
            title: "Test".to_string(),
            rated: None,
            released,
            runtime_minutes: 100,
            plot: "A test.".to_string(),
            critic_score: None,
            audience_score: None,
            vote_count: None,
            box_office: None,
            opening_weekend_gross: None,
            worldwide_gross: None,
            budget: None,
            genres: Vec::new(),
            countries: Vec::new(),
            languages: Vec::new(),
            production_companies: Vec::new(),
            keywords: Vec::new(),
            alternative_titles: Vec::new(),
            cast: cast.iter().map(|s| s.to_string()).collect(),
            crew: Vec::new(),
            lead_actors: leads.iter().map(|s| s.to_string()).collect(),
            supporting_actors: cast
                .iter()
                .filter(|n| !leads.contains(n))
                .map(|s| s.to_string())
                .collect(),
            directors: vec!["Some Director".to_string()],
            writers: Vec::new(),
            soundtrack_artists: Vec::new(),
            prior_awards: Default::default(),
            proportions: Default::default(),
        }
    }

    #[test]
    fn test_enrich_fills_award_and_proportion_columns() {
        let released = NaiveDate::from_ymd_opt(1995, 9, 22).unwrap();
        let mut movies = vec![movie(
            released,
            &["Denzel Washington"],
            &["Denzel Washington", "Gene Hackman"],
        )];
        let ledgers = AwardLedgers {
            oscars: vec![AwardRecord {
                ledger: LedgerKind::Oscars,
                category: "Best Supporting Actor".to_string(),
                recipient: "Denzel Washington".to_string(),
                date: NaiveDate::from_ymd_opt(1990, 4, 1).unwrap(),
                winner: true,
            }],
            golden_globes: Vec::new(),
            grammys: Vec::new(),
        };
        let roster = vec!["Denzel Washington".to_string()];

        let stats = enrich_movies(&mut movies, &ledgers, &roster);

        assert_eq!(stats.movies, 1);
        assert_eq!(stats.movies_with_prior_awards, 1);
        assert_eq!(movies[0].prior_awards.lead_actors, 1);
        assert_eq!(movies[0].prior_awards.cast, 1);
        assert_eq!(movies[0].prior_awards.supporting_actors, 0);
        assert_eq!(movies[0].proportions.lead_actors, Proportion::Ratio(1.0));
        assert_eq!(movies[0].proportions.cast, Proportion::Ratio(0.5));
        assert_eq!(movies[0].proportions.supporting_actors, Proportion::Zero);
    }

    #[test]
    fn test_enrich_empty_lists_stay_unknown() {
        let released = NaiveDate::from_ymd_opt(1995, 9, 22).unwrap();
        let mut movies = vec![movie(released, &[], &[])];
        // With no leads, the supporting list is also empty by construction
        movies[0].supporting_actors.clear();

        let stats = enrich_movies(&mut movies, &AwardLedgers::default(), &[]);

        assert_eq!(stats.movies_with_prior_awards, 0);
        assert_eq!(stats.lead_proportion_unknown, 1);
        assert_eq!(movies[0].prior_awards, PriorAwards::default());
        assert_eq!(movies[0].proportions.lead_actors, Proportion::Unknown);
    }
}
