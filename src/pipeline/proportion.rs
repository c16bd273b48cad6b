//! Fractional membership of a reference roster within a credit list.

use crate::domain::Proportion;

/// Computes the share of `names` that appear in the reference roster.
///
/// Membership is substring containment — a roster entry matches when it
/// contains the queried name — because roster entries are stored with
/// honorifics and spelling variants. Short or common names can therefore
/// match spuriously; callers rely on this behavior, so it stays.
///
/// An empty name list returns [`Proportion::Unknown`]; a non-empty list with
/// no matches returns [`Proportion::Zero`]. The two are distinct on purpose.
pub fn roster_proportion(names: &[String], roster: &[String]) -> Proportion {
    if names.is_empty() {
        return Proportion::Unknown;
    }

    let matches = names
        .iter()
        .filter(|name| {
            let name = name.trim();
            !name.is_empty() && roster.iter().any(|entry| entry.contains(name))
        })
        .count();

    if matches == 0 {
        return Proportion::Zero;
    }

    let ratio = matches as f64 / names.len() as f64;
    Proportion::Ratio((ratio * 100.0).round() / 100.0)
}
