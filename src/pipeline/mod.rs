//! Stage orchestration.
//!
//! The pipeline is a sequence of batch stages — ingest, reconcile, enrich —
//! with every stage reading the complete snapshot of its predecessor and
//! committing its full output before the next one starts.

pub mod awards;
pub mod credits;
pub mod enrich;
pub mod ledger;
pub mod normalize;
pub mod proportion;
pub mod reconcile;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{CanonicalMovie, CanonicalPerson, LedgerKind, SoundtrackCredit};
use crate::sources::imdb::{ActorRoster, ImdbBoxOffice, ImdbSoundtrack};
use crate::sources::omdb::OmdbMovie;
use crate::sources::tmdb::{TmdbCastCrew, TmdbMovie, TmdbPerson};
use crate::sources::{load_json, load_json_batch};
use crate::storage::{load_table, save_table, SnapshotStore};

use credits::{flatten_soundtrack, WorkerStringParser};
use enrich::{enrich_movies, EnrichStats};
use ledger::{load_golden_globe_ledger, load_grammy_ledger, load_oscar_ledger, AwardLedgers};
use reconcile::{reconcile_people, ReconcileStats, Reconciler, SourceBatches};

/// Snapshot table names shared by the stages.
pub mod tables {
    pub const OMDB_BY_ID: &str = "omdb_by_id";
    pub const OMDB_BY_TITLE: &str = "omdb_by_title";
    pub const TMDB_MOVIES: &str = "tmdb_movies";
    pub const CAST_CREW: &str = "cast_crew";
    pub const BOX_OFFICE: &str = "box_office";
    pub const SOUNDTRACK_CREDITS: &str = "soundtrack_credits";
    pub const PEOPLE: &str = "people";
    pub const MOVIES: &str = "movies";
    pub const FOLLOW_UP_TITLES: &str = "follow_up_titles";
    pub const STAGE_RUNS: &str = "stage_runs";
}

/// Locations of the raw documents the retrieval collaborators produced.
#[derive(Debug, Clone)]
pub struct InputPaths {
    pub omdb_by_id: PathBuf,
    pub omdb_by_title: PathBuf,
    pub tmdb_movies: PathBuf,
    pub cast_crew: PathBuf,
    pub box_office: PathBuf,
    pub soundtracks: PathBuf,
    pub actor_data: PathBuf,
    pub actor_roster: PathBuf,
    pub oscars_csv: PathBuf,
    pub golden_globes_csv: PathBuf,
    pub grammys_csv: PathBuf,
}

impl InputPaths {
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            omdb_by_id: dir.join("omdb_movie_data_by_id.json"),
            omdb_by_title: dir.join("omdb_movie_data_by_title.json"),
            tmdb_movies: dir.join("tmdb_movie_data.json"),
            cast_crew: dir.join("cast_crew_data.json"),
            box_office: dir.join("box_office_data.json"),
            soundtracks: dir.join("soundtrack_credits_data.json"),
            actor_data: dir.join("actor_data.json"),
            actor_roster: dir.join("actor_roster.json"),
            oscars_csv: dir.join("the_oscar_award.csv"),
            golden_globes_csv: dir.join("golden_globe_awards.csv"),
            grammys_csv: dir.join("the_grammy_awards.csv"),
        }
    }
}

/// One record per stage execution, kept in its own snapshot table for audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageRun {
    pub id: Uuid,
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl StageRun {
    pub fn begin(name: &str) -> Self {
        info!("Starting stage: {}", name);
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
        info!("Finished stage: {}", self.name);
    }
}

async fn record_stage_run(store: &dyn SnapshotStore, run: &StageRun) -> anyhow::Result<()> {
    let mut runs: Vec<StageRun> = load_table(store, tables::STAGE_RUNS)
        .await
        .unwrap_or_default();
    runs.push(run.clone());
    save_table(store, tables::STAGE_RUNS, &runs).await?;
    Ok(())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestStats {
    pub omdb_records: usize,
    pub tmdb_records: usize,
    pub cast_crew_docs: usize,
    pub box_office_rows: usize,
    pub soundtrack_rows: usize,
    pub people: usize,
    pub people_dropped: usize,
    pub oscar_records: usize,
    pub golden_globe_records: usize,
    pub grammy_records: usize,
    pub ledger_rows_skipped: usize,
}

/// Loads every raw document batch, parses the award ledgers and the
/// soundtrack documents, reconciles the person table, and persists it all as
/// the first snapshot.
pub async fn run_ingest_stage(
    store: &dyn SnapshotStore,
    input: &InputPaths,
    config: &Config,
) -> anyhow::Result<IngestStats> {
    let mut run = StageRun::begin("ingest");
    let mut stats = IngestStats::default();

    let omdb_by_id: Vec<OmdbMovie> = load_json_batch(&input.omdb_by_id)
        .with_context(|| format!("loading {}", input.omdb_by_id.display()))?;
    let omdb_by_title: Vec<OmdbMovie> = load_json_batch(&input.omdb_by_title)
        .with_context(|| format!("loading {}", input.omdb_by_title.display()))?;
    stats.omdb_records = omdb_by_id.len() + omdb_by_title.len();

    let tmdb_movies: Vec<TmdbMovie> = load_json_batch(&input.tmdb_movies)?;
    stats.tmdb_records = tmdb_movies.len();
    let cast_crew: Vec<TmdbCastCrew> = load_json_batch(&input.cast_crew)?;
    stats.cast_crew_docs = cast_crew.len();
    let box_office: Vec<ImdbBoxOffice> = load_json_batch(&input.box_office)?;
    stats.box_office_rows = box_office.len();

    let soundtrack_docs: Vec<ImdbSoundtrack> = load_json_batch(&input.soundtracks)?;
    let soundtrack_credits: Vec<SoundtrackCredit> = soundtrack_docs
        .iter()
        .flat_map(flatten_soundtrack)
        .collect();
    stats.soundtrack_rows = soundtrack_credits.len();

    let actor_data: Vec<TmdbPerson> = load_json_batch(&input.actor_data)?;
    let roster: ActorRoster = load_json(&input.actor_roster)?;
    let (people, people_dropped) = reconcile_people(&actor_data, &roster);
    stats.people = people.len();
    stats.people_dropped = people_dropped;

    let worker_parser = WorkerStringParser::new(&config.credits.role_keywords);
    let oscars = load_oscar_ledger(&input.oscars_csv)
        .with_context(|| format!("loading {}", input.oscars_csv.display()))?;
    let golden_globes = load_golden_globe_ledger(&input.golden_globes_csv)?;
    let grammys = load_grammy_ledger(&input.grammys_csv, &worker_parser)?;
    stats.oscar_records = oscars.records.len();
    stats.golden_globe_records = golden_globes.records.len();
    stats.grammy_records = grammys.records.len();
    stats.ledger_rows_skipped =
        oscars.skipped_rows + golden_globes.skipped_rows + grammys.skipped_rows;

    save_table(store, tables::OMDB_BY_ID, &omdb_by_id).await?;
    save_table(store, tables::OMDB_BY_TITLE, &omdb_by_title).await?;
    save_table(store, tables::TMDB_MOVIES, &tmdb_movies).await?;
    save_table(store, tables::CAST_CREW, &cast_crew).await?;
    save_table(store, tables::BOX_OFFICE, &box_office).await?;
    save_table(store, tables::SOUNDTRACK_CREDITS, &soundtrack_credits).await?;
    save_table(store, tables::PEOPLE, &people).await?;
    save_table(store, LedgerKind::Oscars.table_name(), &oscars.records).await?;
    save_table(
        store,
        LedgerKind::GoldenGlobes.table_name(),
        &golden_globes.records,
    )
    .await?;
    save_table(store, LedgerKind::Grammys.table_name(), &grammys.records).await?;

    run.finish();
    record_stage_run(store, &run).await?;
    Ok(stats)
}

/// Joins the ingested snapshots into canonical movies and persists the
/// reconciled table plus the follow-up title side list.
pub async fn run_reconcile_stage(
    store: &dyn SnapshotStore,
    config: &Config,
) -> anyhow::Result<ReconcileStats> {
    let mut run = StageRun::begin("reconcile");

    let batches = SourceBatches {
        omdb_by_id: load_table(store, tables::OMDB_BY_ID).await?,
        omdb_by_title: load_table(store, tables::OMDB_BY_TITLE).await?,
        tmdb_movies: load_table(store, tables::TMDB_MOVIES).await?,
        cast_crew: load_table(store, tables::CAST_CREW).await?,
        box_office: load_table(store, tables::BOX_OFFICE).await?,
        soundtrack_credits: load_table(store, tables::SOUNDTRACK_CREDITS).await?,
    };

    let output = Reconciler::new(config).reconcile(&batches);

    save_table(store, tables::MOVIES, &output.movies).await?;
    save_table(store, tables::FOLLOW_UP_TITLES, &output.follow_up_titles).await?;

    run.finish();
    record_stage_run(store, &run).await?;
    Ok(output.stats)
}

/// Loads the canonical movie table, fills the derived award and proportion
/// columns, and commits the updated table.
pub async fn run_enrich_stage(store: &dyn SnapshotStore) -> anyhow::Result<EnrichStats> {
    let mut run = StageRun::begin("enrich");

    let mut movies: Vec<CanonicalMovie> = load_table(store, tables::MOVIES).await?;
    let ledgers = AwardLedgers {
        oscars: load_table(store, LedgerKind::Oscars.table_name()).await?,
        golden_globes: load_table(store, LedgerKind::GoldenGlobes.table_name()).await?,
        grammys: load_table(store, LedgerKind::Grammys.table_name()).await?,
    };
    let people: Vec<CanonicalPerson> = load_table(store, tables::PEOPLE).await?;
    let roster: Vec<String> = people.into_iter().map(|p| p.name).collect();

    let stats = enrich_movies(&mut movies, &ledgers, &roster);

    save_table(store, tables::MOVIES, &movies).await?;

    run.finish();
    record_stage_run(store, &run).await?;
    Ok(stats)
}

/// Aggregated counters for a full sequential run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub ingest: IngestStats,
    pub reconcile: ReconcileStats,
    pub enrich: EnrichStats,
}

/// Runs all three stages in order.
pub async fn run_full_pipeline(
    store: &dyn SnapshotStore,
    input: &InputPaths,
    config: &Config,
) -> anyhow::Result<PipelineSummary> {
    let ingest = run_ingest_stage(store, input, config).await?;
    let reconcile = run_reconcile_stage(store, config).await?;
    let enrich = run_enrich_stage(store).await?;
    Ok(PipelineSummary {
        ingest,
        reconcile,
        enrich,
    })
}
