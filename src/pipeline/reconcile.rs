//! Entity reconciliation: joins the per-source partial records for one film
//! (or person) and merges them into a single canonical entity.
//!
//! ID-based joins run first; the title-retrieved batch is compared against
//! the ID-retrieved batch with outer-join semantics so titles seen on only
//! one side can be routed to a follow-up list instead of being lost.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::{CanonicalMovie, CanonicalPerson, SoundtrackCredit};
use crate::pipeline::normalize::{
    clean_currency, clean_runtime, clean_vote_count, dedupe_names, is_missing, map_countries,
    norm_key, parse_audience_score, parse_percent_score, parse_wire_date, split_list,
    strip_role_annotations, supporting_difference,
};
use crate::sources::imdb::{ActorRoster, ImdbBoxOffice};
use crate::sources::omdb::OmdbMovie;
use crate::sources::tmdb::{TmdbCastCrew, TmdbMovie, TmdbPerson};

const PROGRESS_INTERVAL: usize = 500;

/// Everything the reconciler joins for one run.
#[derive(Debug, Clone, Default)]
pub struct SourceBatches {
    /// Review-aggregator records retrieved by external ID.
    pub omdb_by_id: Vec<OmdbMovie>,
    /// Review-aggregator records retrieved by title search.
    pub omdb_by_title: Vec<OmdbMovie>,
    pub tmdb_movies: Vec<TmdbMovie>,
    pub cast_crew: Vec<TmdbCastCrew>,
    pub box_office: Vec<ImdbBoxOffice>,
    pub soundtrack_credits: Vec<SoundtrackCredit>,
}

/// Per-run reconciliation counters. Every dropped record lands in exactly
/// one bucket so data-quality regressions show up between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconcileStats {
    pub input_records: usize,
    pub lookup_failures: usize,
    pub missing_external_id: usize,
    pub duplicates_merged: usize,
    pub dropped_tv_type: usize,
    pub dropped_missing_field: usize,
    pub ambiguous_matches: usize,
    pub follow_up_titles: usize,
    pub reconciled_movies: usize,
}

/// The reconciled dataset plus the side list of titles that need a follow-up
/// ID-based lookup.
#[derive(Debug, Clone)]
pub struct ReconcileOutput {
    pub movies: Vec<CanonicalMovie>,
    pub follow_up_titles: Vec<String>,
    pub stats: ReconcileStats,
}

pub struct Reconciler<'a> {
    config: &'a Config,
}

impl<'a> Reconciler<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn reconcile(&self, batches: &SourceBatches) -> ReconcileOutput {
        let mut stats = ReconcileStats {
            input_records: batches.omdb_by_id.len() + batches.omdb_by_title.len(),
            ..Default::default()
        };

        let follow_up_titles = follow_up_titles(&batches.omdb_by_id, &batches.omdb_by_title);
        stats.follow_up_titles = follow_up_titles.len();

        let merged = self.merge_duplicate_records(batches, &mut stats);

        let tmdb_by_imdb = index_unique(
            batches.tmdb_movies.iter().filter_map(|m| {
                m.imdb_id
                    .as_deref()
                    .filter(|id| !id.is_empty())
                    .map(|id| (id.to_string(), m))
            }),
            "tmdb by imdb id",
            &mut stats,
        );
        let credits_by_tmdb = index_unique(
            batches
                .cast_crew
                .iter()
                .filter_map(|c| c.tmdb_id.map(|id| (id, c))),
            "credits by tmdb id",
            &mut stats,
        );
        let box_office_by_imdb = index_unique(
            batches.box_office.iter().filter_map(|b| {
                b.imdb_id
                    .as_deref()
                    .filter(|id| !id.is_empty())
                    .map(|id| (id.to_string(), b))
            }),
            "box office by imdb id",
            &mut stats,
        );

        let mut soundtrack_by_imdb: HashMap<&str, Vec<&SoundtrackCredit>> = HashMap::new();
        for credit in &batches.soundtrack_credits {
            soundtrack_by_imdb
                .entry(credit.imdb_id.as_str())
                .or_default()
                .push(credit);
        }

        let total = merged.len();
        let mut movies = Vec::new();
        for (processed, (imdb_id, record)) in merged.into_iter().enumerate() {
            if processed > 0 && processed % PROGRESS_INTERVAL == 0 {
                info!("Reconciling movies: {} / {}", processed, total);
            }

            let tmdb = tmdb_by_imdb.get(imdb_id.as_str()).copied();
            let credits = tmdb
                .and_then(|t| t.tmdb_id)
                .and_then(|id| credits_by_tmdb.get(&id).copied());
            let box_office = box_office_by_imdb.get(imdb_id.as_str()).copied();
            let soundtrack = soundtrack_by_imdb.get(imdb_id.as_str());

            match self.assemble_movie(imdb_id, &record, tmdb, credits, box_office, soundtrack) {
                Ok(movie) => movies.push(movie),
                Err(DropReason::TvType) => stats.dropped_tv_type += 1,
                Err(DropReason::MissingField(field)) => {
                    debug!("Dropping record: missing {}", field);
                    stats.dropped_missing_field += 1;
                }
            }
        }

        stats.reconciled_movies = movies.len();
        info!(
            "Reconciliation complete: {} canonical movies from {} raw records ({} dropped for missing fields, {} TV entries, {} follow-up titles)",
            stats.reconciled_movies,
            stats.input_records,
            stats.dropped_missing_field,
            stats.dropped_tv_type,
            stats.follow_up_titles
        );

        ReconcileOutput {
            movies,
            follow_up_titles,
            stats,
        }
    }

    /// Combines both retrieval batches in source-priority order and collapses
    /// records sharing an external ID into one, field by field: for every
    /// scalar, the first non-missing value wins.
    fn merge_duplicate_records(
        &self,
        batches: &SourceBatches,
        stats: &mut ReconcileStats,
    ) -> Vec<(String, OmdbMovie)> {
        let mut order: Vec<String> = Vec::new();
        let mut by_id: HashMap<String, OmdbMovie> = HashMap::new();

        for record in batches.omdb_by_id.iter().chain(&batches.omdb_by_title) {
            if record.is_lookup_failure() {
                stats.lookup_failures += 1;
                continue;
            }
            let Some(imdb_id) = record.imdb_id.as_deref().filter(|id| !id.is_empty()) else {
                stats.missing_external_id += 1;
                continue;
            };
            match by_id.get_mut(imdb_id) {
                Some(existing) => {
                    merge_movie_fields(existing, record);
                    stats.duplicates_merged += 1;
                }
                None => {
                    order.push(imdb_id.to_string());
                    by_id.insert(imdb_id.to_string(), record.clone());
                }
            }
        }

        order
            .into_iter()
            .map(|id| {
                let record = by_id.remove(&id).unwrap();
                (id, record)
            })
            .collect()
    }

    fn assemble_movie(
        &self,
        imdb_id: String,
        record: &OmdbMovie,
        tmdb: Option<&TmdbMovie>,
        credits: Option<&TmdbCastCrew>,
        box_office: Option<&ImdbBoxOffice>,
        soundtrack: Option<&Vec<&SoundtrackCredit>>,
    ) -> std::result::Result<CanonicalMovie, DropReason> {
        // TV entries never enter the canonical set
        if record
            .rated
            .as_deref()
            .map(|r| r.contains("TV"))
            .unwrap_or(false)
        {
            return Err(DropReason::TvType);
        }
        if record
            .kind
            .as_deref()
            .map(|k| !k.is_empty() && k != "movie")
            .unwrap_or(false)
        {
            return Err(DropReason::TvType);
        }

        let title = required_string(&record.title, "title")?;
        let plot = required_string(&record.plot, "plot")?;
        let runtime_minutes = record
            .runtime
            .as_deref()
            .and_then(clean_runtime)
            .ok_or(DropReason::MissingField("runtime"))?;

        // First-available-source order: aggregator release date, then the
        // provider's US theatrical date, then GB
        let released = record
            .released
            .as_deref()
            .and_then(parse_wire_date)
            .or_else(|| tmdb.and_then(|t| t.theatrical_release("US")))
            .or_else(|| tmdb.and_then(|t| t.theatrical_release("GB")))
            .ok_or(DropReason::MissingField("released"))?;

        let directors = dedupe_names(optional_list(&record.director));
        if directors.is_empty() {
            return Err(DropReason::MissingField("director"));
        }

        let billed_limit = self.config.reconcile.billed_cast_limit;
        let cast = dedupe_names(
            credits
                .iter()
                .flat_map(|c| c.cast.iter().take(billed_limit))
                .filter_map(|m| m.name.clone()),
        );
        if cast.is_empty() {
            return Err(DropReason::MissingField("cast"));
        }
        let crew = dedupe_names(
            credits
                .iter()
                .flat_map(|c| c.crew.iter())
                .filter_map(|m| m.name.clone()),
        );

        let lead_actors = dedupe_names(optional_list(&record.actors));
        let supporting_actors = supporting_difference(&cast, &lead_actors);

        let writers = dedupe_names(
            record
                .writer
                .as_deref()
                .filter(|w| !is_missing(w))
                .map(|w| split_list(&strip_role_annotations(w)))
                .unwrap_or_default(),
        );

        let countries = dedupe_names(map_countries(
            optional_list(&record.country),
            &self.config.countries.aliases,
        ));

        let soundtrack_artists = dedupe_names(
            soundtrack
                .iter()
                .flat_map(|rows| rows.iter())
                .map(|row| row.name.clone()),
        );

        Ok(CanonicalMovie {
            imdb_id,
            tmdb_id: tmdb.and_then(|t| t.tmdb_id),
            title,
            rated: record.rated.clone().filter(|r| !is_missing(r)),
            released,
            runtime_minutes,
            plot,
            critic_score: record
                .rotten_tomatoes_score()
                .as_deref()
                .and_then(parse_percent_score),
            audience_score: record.imdb_rating.as_deref().and_then(parse_audience_score),
            vote_count: record.imdb_votes.as_deref().and_then(clean_vote_count),
            box_office: record.box_office.as_deref().and_then(clean_currency),
            opening_weekend_gross: box_office
                .and_then(|b| b.opening_weekend_gross.as_deref())
                .and_then(clean_currency),
            worldwide_gross: box_office
                .and_then(|b| b.worldwide_gross.as_deref())
                .and_then(clean_currency),
            budget: tmdb.and_then(|t| t.budget).filter(|b| *b > 0),
            genres: dedupe_names(optional_list(&record.genre)),
            countries,
            languages: dedupe_names(optional_list(&record.language)),
            production_companies: dedupe_names(optional_list(&record.production)),
            keywords: dedupe_names(tmdb.map(|t| t.keyword_names()).unwrap_or_default()),
            alternative_titles: dedupe_names(
                tmdb.map(|t| t.alternative_titles.clone()).unwrap_or_default(),
            ),
            cast,
            crew,
            lead_actors,
            supporting_actors,
            directors,
            writers,
            soundtrack_artists,
            prior_awards: Default::default(),
            proportions: Default::default(),
        })
    }
}

enum DropReason {
    TvType,
    MissingField(&'static str),
}

fn required_string(
    value: &Option<String>,
    field: &'static str,
) -> std::result::Result<String, DropReason> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !is_missing(v))
        .map(str::to_string)
        .ok_or(DropReason::MissingField(field))
}

fn optional_list(value: &Option<String>) -> Vec<String> {
    value.as_deref().map(split_list).unwrap_or_default()
}

/// Outer-join comparison of the two retrieval batches by normalized title.
/// Titles only found by title search ("right_only") need a follow-up ID-based
/// lookup; both-side titles are already covered.
fn follow_up_titles(by_id: &[OmdbMovie], by_title: &[OmdbMovie]) -> Vec<String> {
    let id_side: HashSet<String> = by_id
        .iter()
        .filter_map(|m| m.title.as_deref())
        .map(norm_key)
        .collect();

    let mut seen = HashSet::new();
    by_title
        .iter()
        .filter(|m| !m.is_lookup_failure())
        .filter_map(|m| m.title.as_deref())
        .filter(|t| !id_side.contains(&norm_key(t)))
        .filter(|t| seen.insert(norm_key(t)))
        .map(str::to_string)
        .collect()
}

/// First non-missing value wins, field by field. The receiving record is the
/// higher-priority source.
fn merge_movie_fields(target: &mut OmdbMovie, other: &OmdbMovie) {
    fn fill(slot: &mut Option<String>, value: &Option<String>) {
        let slot_missing = slot.as_deref().map(is_missing).unwrap_or(true);
        let value_present = value.as_deref().map(|v| !is_missing(v)).unwrap_or(false);
        if slot_missing && value_present {
            *slot = value.clone();
        }
    }

    fill(&mut target.title, &other.title);
    fill(&mut target.rated, &other.rated);
    fill(&mut target.released, &other.released);
    fill(&mut target.runtime, &other.runtime);
    fill(&mut target.genre, &other.genre);
    fill(&mut target.director, &other.director);
    fill(&mut target.writer, &other.writer);
    fill(&mut target.actors, &other.actors);
    fill(&mut target.plot, &other.plot);
    fill(&mut target.language, &other.language);
    fill(&mut target.country, &other.country);
    fill(&mut target.production, &other.production);
    fill(&mut target.imdb_rating, &other.imdb_rating);
    fill(&mut target.imdb_votes, &other.imdb_votes);
    fill(&mut target.box_office, &other.box_office);
    fill(&mut target.kind, &other.kind);
    if target.ratings.is_empty() {
        target.ratings = other.ratings.clone();
    }
}

/// Builds a unique index, resolving collisions deterministically: the first
/// record in source order wins and the collision is logged for audit.
fn index_unique<'r, K, V, I>(
    entries: I,
    what: &str,
    stats: &mut ReconcileStats,
) -> HashMap<K, &'r V>
where
    K: std::hash::Hash + Eq + std::fmt::Debug,
    I: IntoIterator<Item = (K, &'r V)>,
{
    let mut index = HashMap::new();
    for (key, value) in entries {
        if index.contains_key(&key) {
            warn!("Multiple {} matches for {:?}; keeping the first", what, key);
            stats.ambiguous_matches += 1;
            continue;
        }
        index.insert(key, value);
    }
    index
}

/// Reconciles raw person documents into the canonical person table.
///
/// Person documents are keyed by provider IDs and carry no display name of
/// their own; the name comes from the roster scrape, joined by external ID.
/// Rows without an ID, without a roster name, or duplicating an already-seen
/// ID are dropped and counted.
pub fn reconcile_people(raw: &[TmdbPerson], roster: &ActorRoster) -> (Vec<CanonicalPerson>, usize) {
    let names_by_id: HashMap<&str, &str> = roster.entries().collect();
    let mut seen = HashSet::new();
    let mut people = Vec::new();
    let mut dropped = 0;

    for (index, person) in raw.iter().enumerate() {
        if index > 0 && index % PROGRESS_INTERVAL == 0 {
            info!("Reconciling people: {} / {}", index, raw.len());
        }
        let Some(imdb_id) = person.imdb_id.as_deref().filter(|id| !id.is_empty()) else {
            dropped += 1;
            continue;
        };
        let Some(name) = names_by_id.get(imdb_id) else {
            debug!("No roster name for person {}", imdb_id);
            dropped += 1;
            continue;
        };
        if !seen.insert(imdb_id.to_string()) {
            dropped += 1;
            continue;
        }
        people.push(CanonicalPerson {
            imdb_id: Some(imdb_id.to_string()),
            tmdb_id: person.tmdb_id,
            name: name.trim().to_string(),
            gender: person.gender,
            birthday: person.birthday.as_deref().and_then(parse_wire_date),
            movie_credits: dedupe_names(person.movie_credits.clone()),
        });
    }

    (people, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CountryConfig, CreditsConfig, ReconcileConfig};
    use crate::pipeline::credits::flatten_soundtrack;
    use chrono::NaiveDate;
    use serde_json::json;

    fn test_config() -> Config {
        Config {
            reconcile: ReconcileConfig {
                source_priority: vec![
                    "omdb".to_string(),
                    "tmdb".to_string(),
                    "imdb".to_string(),
                ],
                billed_cast_limit: 15,
            },
            credits: CreditsConfig {
                role_keywords: vec!["produce".to_string()],
            },
            countries: CountryConfig {
                aliases: HashMap::from([("United States".to_string(), "USA".to_string())]),
            },
        }
    }

    fn omdb_movie(imdb_id: &str, title: &str) -> OmdbMovie {
        OmdbMovie {
            imdb_id: Some(imdb_id.to_string()),
            title: Some(title.to_string()),
            rated: Some("R".to_string()),
            released: Some("22 Sep 1995".to_string()),
            runtime: Some("127 min".to_string()),
            genre: Some("Crime, Drama".to_string()),
            director: Some("David Fincher".to_string()),
            writer: Some("Andrew Kevin Walker (written by)".to_string()),
            actors: Some("Morgan Freeman, Brad Pitt".to_string()),
            plot: Some("Two detectives hunt a serial killer.".to_string()),
            language: Some("English".to_string()),
            country: Some("United States".to_string()),
            production: Some("New Line Cinema".to_string()),
            imdb_rating: Some("8.6".to_string()),
            imdb_votes: Some("1,445,096".to_string()),
            box_office: Some("$100,125,643".to_string()),
            kind: Some("movie".to_string()),
            ratings: vec![crate::sources::omdb::OmdbRating {
                source: "Rotten Tomatoes".to_string(),
                value: "82%".to_string(),
            }],
            response: Some("True".to_string()),
        }
    }

    fn tmdb_movie(imdb_id: &str, tmdb_id: u64) -> TmdbMovie {
        serde_json::from_value(json!({
            "IMDb_ID": imdb_id,
            "TMDb_ID": tmdb_id,
            "Alternative_Titles": ["Seven"],
            "Release_Dates": [
                {
                    "iso_3166_1": "US",
                    "release_dates": [
                        {"type": 3, "release_date": "1995-09-22T00:00:00.000Z"}
                    ]
                }
            ],
            "Keywords": [{"id": 1, "name": "serial killer"}],
            "Budget": 33000000
        }))
        .unwrap()
    }

    fn cast_crew(tmdb_id: u64, cast: &[&str], crew: &[&str]) -> TmdbCastCrew {
        TmdbCastCrew {
            tmdb_id: Some(tmdb_id),
            cast: cast
                .iter()
                .map(|name| crate::sources::tmdb::CreditMember {
                    id: None,
                    name: Some(name.to_string()),
                    job: None,
                    department: None,
                })
                .collect(),
            crew: crew
                .iter()
                .map(|name| crate::sources::tmdb::CreditMember {
                    id: None,
                    name: Some(name.to_string()),
                    job: Some("Editor".to_string()),
                    department: None,
                })
                .collect(),
        }
    }

    fn batches_for(movie: OmdbMovie) -> SourceBatches {
        let imdb_id = movie.imdb_id.clone().unwrap();
        SourceBatches {
            omdb_by_id: vec![movie],
            omdb_by_title: Vec::new(),
            tmdb_movies: vec![tmdb_movie(&imdb_id, 807)],
            cast_crew: vec![cast_crew(
                807,
                &["Morgan Freeman", "Brad Pitt", "Kevin Spacey", "Gwyneth Paltrow"],
                &["Richard Francis-Bruce"],
            )],
            box_office: vec![ImdbBoxOffice {
                imdb_id: Some(imdb_id),
                opening_weekend_gross: Some("$13,949,807".to_string()),
                worldwide_gross: Some("$327,333,559".to_string()),
            }],
            soundtrack_credits: Vec::new(),
        }
    }

    #[test]
    fn test_reconcile_assembles_canonical_movie() {
        let config = test_config();
        let output = Reconciler::new(&config).reconcile(&batches_for(omdb_movie("tt0114369", "Se7en")));

        assert_eq!(output.stats.reconciled_movies, 1);
        let movie = &output.movies[0];
        assert_eq!(movie.imdb_id, "tt0114369");
        assert_eq!(movie.runtime_minutes, 127);
        assert_eq!(movie.critic_score, Some(82));
        assert_eq!(movie.audience_score, Some(86));
        assert_eq!(movie.vote_count, Some(1_445_096));
        assert_eq!(movie.worldwide_gross, Some(327_333_559));
        assert_eq!(movie.budget, Some(33_000_000));
        assert_eq!(movie.countries, vec!["USA"]);
        assert_eq!(movie.writers, vec!["Andrew Kevin Walker"]);
        assert_eq!(movie.keywords, vec!["serial killer"]);
        assert_eq!(
            movie.supporting_actors,
            vec!["Kevin Spacey", "Gwyneth Paltrow"]
        );
    }

    #[test]
    fn test_supporting_and_lead_are_disjoint() {
        let config = test_config();
        let output = Reconciler::new(&config).reconcile(&batches_for(omdb_movie("tt0114369", "Se7en")));
        let movie = &output.movies[0];

        let leads: HashSet<String> = movie.lead_actors.iter().map(|n| norm_key(n)).collect();
        assert!(movie
            .supporting_actors
            .iter()
            .all(|name| !leads.contains(&norm_key(name))));
    }

    #[test]
    fn test_duplicate_ids_merge_complementary_nulls() {
        let mut first = omdb_movie("tt0114369", "Se7en");
        first.box_office = Some("N/A".to_string());
        let mut second = omdb_movie("tt0114369", "Se7en");
        second.released = None;
        second.box_office = Some("$100,125,643".to_string());

        let mut batches = batches_for(first);
        batches.omdb_by_title = vec![second];

        let config = test_config();
        let output = Reconciler::new(&config).reconcile(&batches);

        assert_eq!(output.stats.duplicates_merged, 1);
        assert_eq!(output.movies.len(), 1);
        let movie = &output.movies[0];
        // Both fields populated from whichever side was non-null
        assert_eq!(movie.released, NaiveDate::from_ymd_opt(1995, 9, 22).unwrap());
        assert_eq!(movie.box_office, Some(100_125_643));
    }

    #[test]
    fn test_release_date_falls_back_to_provider() {
        let mut movie = omdb_movie("tt0114369", "Se7en");
        movie.released = Some("N/A".to_string());

        let config = test_config();
        let output = Reconciler::new(&config).reconcile(&batches_for(movie));

        assert_eq!(output.movies.len(), 1);
        assert_eq!(
            output.movies[0].released,
            NaiveDate::from_ymd_opt(1995, 9, 22).unwrap()
        );
    }

    #[test]
    fn test_tv_entries_dropped_and_counted() {
        let mut tv = omdb_movie("tt0108778", "Friends");
        tv.rated = Some("TV-14".to_string());
        let mut series = omdb_movie("tt0944947", "Game of Thrones");
        series.kind = Some("series".to_string());

        let mut batches = batches_for(tv);
        batches.omdb_by_id.push(series);

        let config = test_config();
        let output = Reconciler::new(&config).reconcile(&batches);

        assert_eq!(output.stats.dropped_tv_type, 2);
        assert!(output.movies.is_empty());
    }

    #[test]
    fn test_missing_required_fields_drop_record() {
        let mut no_director = omdb_movie("tt0000001", "Ghost Film");
        no_director.director = Some("N/A".to_string());
        let mut no_plot = omdb_movie("tt0000002", "Silent Film");
        no_plot.plot = None;

        let mut batches = batches_for(no_director);
        batches.omdb_by_id.push(no_plot);

        let config = test_config();
        let output = Reconciler::new(&config).reconcile(&batches);

        assert_eq!(output.stats.dropped_missing_field, 2);
        assert!(output.movies.is_empty());
    }

    #[test]
    fn test_record_without_cast_document_is_dropped() {
        let mut batches = batches_for(omdb_movie("tt0114369", "Se7en"));
        batches.cast_crew.clear();

        let config = test_config();
        let output = Reconciler::new(&config).reconcile(&batches);

        assert_eq!(output.stats.dropped_missing_field, 1);
        assert!(output.movies.is_empty());
    }

    #[test]
    fn test_lookup_failures_counted_not_reconciled() {
        let mut batches = batches_for(omdb_movie("tt0114369", "Se7en"));
        batches.omdb_by_title = vec![OmdbMovie {
            response: Some("False".to_string()),
            ..Default::default()
        }];

        let config = test_config();
        let output = Reconciler::new(&config).reconcile(&batches);

        assert_eq!(output.stats.lookup_failures, 1);
        assert_eq!(output.movies.len(), 1);
    }

    #[test]
    fn test_title_only_records_become_follow_ups() {
        let mut batches = batches_for(omdb_movie("tt0114369", "Se7en"));
        batches
            .omdb_by_title
            .push(omdb_movie("tt0137523", "Fight Club"));

        let config = test_config();
        let output = Reconciler::new(&config).reconcile(&batches);

        assert_eq!(output.follow_up_titles, vec!["Fight Club"]);
        assert_eq!(output.stats.follow_up_titles, 1);
    }

    #[test]
    fn test_ambiguous_provider_match_first_wins() {
        let mut batches = batches_for(omdb_movie("tt0114369", "Se7en"));
        let mut second = tmdb_movie("tt0114369", 9999);
        second.budget = Some(1);
        batches.tmdb_movies.push(second);

        let config = test_config();
        let output = Reconciler::new(&config).reconcile(&batches);

        assert_eq!(output.stats.ambiguous_matches, 1);
        // The first provider record in source order supplied the budget
        assert_eq!(output.movies[0].budget, Some(33_000_000));
    }

    #[test]
    fn test_billed_cast_limit_applies() {
        let mut config = test_config();
        config.reconcile.billed_cast_limit = 2;

        let output = Reconciler::new(&config).reconcile(&batches_for(omdb_movie("tt0114369", "Se7en")));
        assert_eq!(output.movies[0].cast, vec!["Morgan Freeman", "Brad Pitt"]);
        // Everyone billed is a lead here, so nobody is supporting
        assert!(output.movies[0].supporting_actors.is_empty());
    }

    #[test]
    fn test_soundtrack_artists_joined_and_deduped() {
        let doc: crate::sources::imdb::ImdbSoundtrack = serde_json::from_value(json!({
            "IMDb_ID": "tt0114369",
            "Tracks": [
                {"writers": [{"name": "David Bowie"}], "performers": [{"name": "David Bowie"}]},
                {"performers": [{"name": "Nine Inch Nails"}]}
            ]
        }))
        .unwrap();

        let mut batches = batches_for(omdb_movie("tt0114369", "Se7en"));
        batches.soundtrack_credits = flatten_soundtrack(&doc);

        let config = test_config();
        let output = Reconciler::new(&config).reconcile(&batches);

        assert_eq!(
            output.movies[0].soundtrack_artists,
            vec!["David Bowie", "Nine Inch Nails"]
        );
    }

    #[test]
    fn test_reconcile_people_joins_roster_names() {
        let roster = ActorRoster {
            imdb_ids: vec!["nm0000151".to_string(), "nm0000093".to_string()],
            names: vec!["Morgan Freeman".to_string(), "Brad Pitt".to_string()],
        };
        let raw = vec![
            TmdbPerson {
                imdb_id: Some("nm0000151".to_string()),
                tmdb_id: Some(192),
                gender: Some(2),
                birthday: Some("1937-06-01".to_string()),
                movie_credits: vec!["Se7en".to_string(), "Se7en".to_string()],
            },
            // Duplicate ID: dropped
            TmdbPerson {
                imdb_id: Some("nm0000151".to_string()),
                ..Default::default()
            },
            // Not on the roster: dropped
            TmdbPerson {
                imdb_id: Some("nm9999999".to_string()),
                ..Default::default()
            },
        ];

        let (people, dropped) = reconcile_people(&raw, &roster);
        assert_eq!(people.len(), 1);
        assert_eq!(dropped, 2);
        assert_eq!(people[0].name, "Morgan Freeman");
        assert_eq!(
            people[0].birthday,
            NaiveDate::from_ymd_opt(1937, 6, 1)
        );
        assert_eq!(people[0].movie_credits, vec!["Se7en"]);
    }
}
