use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer};

/// A field of a partial update. `Absent` when the key is missing from the
/// payload, `Null` when it is present with a JSON `null`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|value| match value {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewMovie {
    pub title: String,
    pub director_id: i32,
    pub release_year: i32,
    #[serde(default)]
    pub cast: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MovieUpdate {
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub director_id: Patch<i32>,
    #[serde(default)]
    pub release_year: Patch<i32>,
    #[serde(default)]
    pub cast: Patch<String>,
    #[serde(default)]
    pub genres: Patch<Vec<String>>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct NewRating {
    pub score: i32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewDirector {
    pub name: String,
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewGenre {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Filters shared by the movie listings. Every supplied genre must be present
/// on a movie for it to match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MovieFilter {
    pub title: Option<String>,
    pub release_year: Option<i32>,
    pub genres: Vec<String>,
}

impl MovieFilter {
    pub fn title_fragment(&self) -> Option<&str> {
        self.title.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    pub fn genre_names(&self) -> Vec<String> {
        distinct_names(&self.genres)
    }
}

/// Trimmed, de-duplicated, non-empty names in sorted order.
pub fn distinct_names(names: &[String]) -> Vec<String> {
    names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
