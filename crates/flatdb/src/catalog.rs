//! Band catalog records.
//!
//! The typed shapes a music catalog front end keeps in the store, plus the
//! validator and seed data it uses. Handlers turn form input into a [`Band`],
//! derive the key with [`band_key`], and hand both to [`Store::write`].

use crate::error::Result;
use crate::record::{self, Record};
use crate::store::{StorageBackend, Store};
use crate::validate::{ValidationError, Validator};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const BANDS: &str = "bands";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub name: String,
    pub year: u32,
    pub genre: String,
    #[serde(rename = "imagePath", default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
}

impl Album {
    pub fn new(name: &str, year: u32, genre: &str) -> Self {
        Self {
            name: name.to_string(),
            year,
            genre: genre.to_string(),
            image_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub name: String,
    pub genre: String,
    pub country: String,
    pub year: u32,
    #[serde(default)]
    pub albums: Vec<Album>,
}

/// Resource key for a band: lowercased, spaces replaced by underscores.
///
/// ```
/// assert_eq!(flatdb::catalog::band_key("King Crimson"), "king_crimson");
/// ```
pub fn band_key(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Requires non-empty string `name` and `genre` fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct BandValidator;

impl Validator for BandValidator {
    fn validate(&self, payload: &Value) -> std::result::Result<(), ValidationError> {
        for field in ["name", "genre"] {
            match payload.get(field).and_then(Value::as_str) {
                Some(s) if !s.trim().is_empty() => {}
                _ => return Err(ValidationError::new(format!("band {} is required", field))),
            }
        }
        Ok(())
    }
}

const PROG: &str = "Progressive Rock";

fn band(name: &str, country: &str, year: u32, albums: &[(&str, u32)]) -> Band {
    Band {
        name: name.to_string(),
        genre: PROG.to_string(),
        country: country.to_string(),
        year,
        albums: albums
            .iter()
            .map(|(title, year)| Album::new(title, *year, PROG))
            .collect(),
    }
}

/// Populates the `bands` collection with a handful of progressive rock bands.
///
/// Exercises all three write paths: a plain write, an update of the album
/// list, and a batch write. Returns the number of bands seeded.
pub fn seed<B: StorageBackend>(store: &Store<B>) -> Result<usize> {
    let pink_floyd = band(
        "Pink Floyd",
        "United Kingdom",
        1965,
        &[
            ("The Dark Side of the Moon", 1973),
            ("Wish You Were Here", 1975),
            ("Animals", 1977),
            ("The Wall", 1979),
        ],
    );
    store.write(BANDS, &band_key(&pink_floyd.name), &pink_floyd)?;

    let mut albums = pink_floyd.albums.clone();
    albums.push(Album::new("Meddle", 1971, PROG));
    albums.push(Album::new("Atom Heart Mother", 1970, PROG));
    let mut update = Record::new();
    update.insert("albums".to_string(), record::to_value(&albums)?);
    store.update(BANDS, &band_key(&pink_floyd.name), update)?;

    let others = [
        band(
            "King Crimson",
            "United Kingdom",
            1968,
            &[
                ("In the Court of the Crimson King", 1969),
                ("Larks' Tongues in Aspic", 1973),
                ("Red", 1974),
                ("Discipline", 1981),
            ],
        ),
        band(
            "Yes",
            "United Kingdom",
            1968,
            &[("Fragile", 1971), ("Close to the Edge", 1972)],
        ),
        band(
            "Genesis",
            "United Kingdom",
            1967,
            &[("Selling England by the Pound", 1973), ("Foxtrot", 1972)],
        ),
        band("Rush", "Canada", 1968, &[("2112", 1976), ("Moving Pictures", 1981)]),
    ];
    let count = others.len() + 1;
    store.batch_write(BANDS, others.into_iter().map(|b| (band_key(&b.name), b)))?;

    Ok(count)
}
