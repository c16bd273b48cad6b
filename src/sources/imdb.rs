use serde::{Deserialize, Serialize};

/// The curated actor roster scraped from list pages: parallel arrays of
/// external IDs and display names, in page order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorRoster {
    pub imdb_ids: Vec<String>,
    pub names: Vec<String>,
}

impl ActorRoster {
    /// Pairs IDs with names. The arrays are parallel by construction; a
    /// length mismatch means the scrape was broken, so zip truncation is the
    /// safe degradation.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.imdb_ids
            .iter()
            .zip(self.names.iter())
            .map(|(id, name)| (id.as_str(), name.as_str()))
    }
}

/// Box-office figures scraped from a movie's summary page. Both fields are
/// currency strings ("$30,039,175") until normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImdbBoxOffice {
    #[serde(rename = "IMDb_ID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "Opening_Weekend_Gross")]
    pub opening_weekend_gross: Option<String>,
    #[serde(rename = "Worldwide_Gross")]
    pub worldwide_gross: Option<String>,
}

/// The soundtrack credits document scraped for one movie: a list of track
/// credits, each optionally naming writers, performers and arrangers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImdbSoundtrack {
    #[serde(rename = "IMDb_ID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "Tracks")]
    pub tracks: Vec<TrackCredit>,
}

/// Credits for one soundtrack track. Each role field is either a structured
/// person list or a single free-text string, depending on how the source page
/// was marked up.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackCredit {
    #[serde(rename = "Title")]
    pub title: Option<String>,
    pub writers: Option<CreditField>,
    pub performers: Option<CreditField>,
    pub arrangers: Option<CreditField>,
}

/// A role field in its two wire shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreditField {
    People(Vec<CreditedPerson>),
    Text(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditedPerson {
    pub name: String,
    pub id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_credit_field_structured() {
        let track: TrackCredit = serde_json::from_value(json!({
            "Title": "Streets of Philadelphia",
            "writers": [{"name": "Bruce Springsteen", "id": "nm0000698"}],
            "performers": "Performed by Bruce Springsteen"
        }))
        .unwrap();

        match track.writers.unwrap() {
            CreditField::People(people) => {
                assert_eq!(people[0].name, "Bruce Springsteen");
                assert_eq!(people[0].id.as_deref(), Some("nm0000698"));
            }
            CreditField::Text(_) => panic!("expected structured people"),
        }
        match track.performers.unwrap() {
            CreditField::Text(text) => assert_eq!(text, "Performed by Bruce Springsteen"),
            CreditField::People(_) => panic!("expected free text"),
        }
    }

    #[test]
    fn test_box_office_wire_names() {
        let row: ImdbBoxOffice = serde_json::from_value(json!({
            "IMDb_ID": "tt0107818",
            "Opening_Weekend_Gross": "$143,433",
            "Worldwide_Gross": "$206,678,440"
        }))
        .unwrap();
        assert_eq!(row.imdb_id.as_deref(), Some("tt0107818"));
        assert_eq!(row.worldwide_gross.as_deref(), Some("$206,678,440"));
    }
}
