use serde::{Deserialize, Serialize};

/// One OMDb API response for one movie. Field names follow the wire format;
/// the literal string "N/A" is OMDb's missing sentinel and is resolved by the
/// normalizers, not here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OmdbMovie {
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Rated")]
    pub rated: Option<String>,
    #[serde(rename = "Released")]
    pub released: Option<String>,
    #[serde(rename = "Runtime")]
    pub runtime: Option<String>,
    #[serde(rename = "Genre")]
    pub genre: Option<String>,
    #[serde(rename = "Director")]
    pub director: Option<String>,
    #[serde(rename = "Writer")]
    pub writer: Option<String>,
    #[serde(rename = "Actors")]
    pub actors: Option<String>,
    #[serde(rename = "Plot")]
    pub plot: Option<String>,
    #[serde(rename = "Language")]
    pub language: Option<String>,
    #[serde(rename = "Country")]
    pub country: Option<String>,
    #[serde(rename = "Production")]
    pub production: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "imdbVotes")]
    pub imdb_votes: Option<String>,
    #[serde(rename = "BoxOffice")]
    pub box_office: Option<String>,
    #[serde(rename = "Type")]
    pub kind: Option<String>,
    #[serde(rename = "Ratings")]
    pub ratings: Vec<OmdbRating>,
    /// "False" marks a failed lookup; such entries never reach reconciliation.
    #[serde(rename = "Response")]
    pub response: Option<String>,
}

/// One entry of the nested ratings list ({Source, Value}).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OmdbRating {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Value")]
    pub value: String,
}

impl OmdbMovie {
    pub fn is_lookup_failure(&self) -> bool {
        self.response.as_deref() == Some("False")
    }

    /// The Rotten Tomatoes percentage from the nested ratings list, e.g. "94%".
    pub fn rotten_tomatoes_score(&self) -> Option<String> {
        self.ratings
            .iter()
            .find(|r| r.source == "Rotten Tomatoes")
            .map(|r| r.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_wire_names() {
        let movie: OmdbMovie = serde_json::from_value(json!({
            "Title": "Heat",
            "imdbID": "tt0113277",
            "Runtime": "170 min",
            "Ratings": [
                {"Source": "Internet Movie Database", "Value": "8.3/10"},
                {"Source": "Rotten Tomatoes", "Value": "88%"}
            ],
            "Response": "True"
        }))
        .unwrap();

        assert_eq!(movie.imdb_id.as_deref(), Some("tt0113277"));
        assert_eq!(movie.rotten_tomatoes_score().as_deref(), Some("88%"));
        assert!(!movie.is_lookup_failure());
    }

    #[test]
    fn test_missing_ratings_list() {
        let movie: OmdbMovie =
            serde_json::from_value(json!({"Title": "Heat", "Response": "True"})).unwrap();
        assert_eq!(movie.rotten_tomatoes_score(), None);
    }

    #[test]
    fn test_failed_lookup_flag() {
        let movie: OmdbMovie =
            serde_json::from_value(json!({"Response": "False", "Error": "Movie not found!"}))
                .unwrap();
        assert!(movie.is_lookup_failure());
    }
}
