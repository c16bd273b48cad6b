use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One TMDb movie document: cross-provider IDs plus the nested release-date,
/// keyword and alternative-title payloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbMovie {
    #[serde(rename = "IMDb_ID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "TMDb_ID")]
    pub tmdb_id: Option<u64>,
    #[serde(rename = "Alternative_Titles")]
    pub alternative_titles: Vec<String>,
    #[serde(rename = "Release_Dates")]
    pub release_dates: Option<Vec<CountryReleases>>,
    #[serde(rename = "Keywords")]
    pub keywords: Option<Vec<Keyword>>,
    #[serde(rename = "Budget")]
    pub budget: Option<u64>,
}

/// Release-date entries grouped per country.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CountryReleases {
    #[serde(rename = "iso_3166_1")]
    pub country: Option<String>,
    pub release_dates: Vec<ReleaseDateEntry>,
}

/// One dated release. Type 3 is the theatrical release.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseDateEntry {
    #[serde(rename = "type")]
    pub kind: Option<i64>,
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Keyword {
    pub id: Option<u64>,
    pub name: Option<String>,
}

const THEATRICAL: i64 = 3;

impl TmdbMovie {
    /// The theatrical release date for one country code, if present.
    /// When a country lists several theatrical entries the last one wins.
    pub fn theatrical_release(&self, country_code: &str) -> Option<NaiveDate> {
        let groups = self.release_dates.as_ref()?;
        let mut found = None;
        for group in groups {
            if group.country.as_deref() != Some(country_code) {
                continue;
            }
            for entry in &group.release_dates {
                if entry.kind == Some(THEATRICAL) {
                    if let Some(date) = entry.release_date.as_deref().and_then(parse_release_date) {
                        found = Some(date);
                    }
                }
            }
        }
        found
    }

    pub fn keyword_names(&self) -> Vec<String> {
        self.keywords
            .iter()
            .flatten()
            .filter_map(|k| k.name.clone())
            .collect()
    }
}

/// Release dates arrive as RFC 3339 timestamps ("1995-12-15T00:00:00.000Z");
/// only the calendar date matters.
fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()
}

/// The cast and crew document for one movie.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbCastCrew {
    #[serde(rename = "TMDb_ID")]
    pub tmdb_id: Option<u64>,
    #[serde(rename = "Cast")]
    pub cast: Vec<CreditMember>,
    #[serde(rename = "Crew")]
    pub crew: Vec<CreditMember>,
}

/// One credited cast or crew member.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditMember {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub job: Option<String>,
    pub department: Option<String>,
}

/// One person document (gender code, birthday, credited titles).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbPerson {
    #[serde(rename = "IMDb_ID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "TMDb_ID")]
    pub tmdb_id: Option<u64>,
    #[serde(rename = "Gender")]
    pub gender: Option<u8>,
    #[serde(rename = "Birthday")]
    pub birthday: Option<String>,
    #[serde(rename = "Movie_Credits")]
    pub movie_credits: Vec<String>,
}
