// 💾 JSON Persistence - movie list <-> JSON document
//
// Document shape:
//
//   { "movies": [ { "title": "...", "category": "...", "rating": 9 } ] }
//
// "rating" is omitted when unrated. On read, null and the legacy -1 sentinel
// also mean unrated. Loading never replays events into the log.
//
// Saves go through a temp file in the target directory which is fsynced and
// then renamed over the target, so a failed save leaves the old file intact.

use crate::catalog::Catalog;
use crate::error::{CatalogError, Result};
use crate::event_log::EventLog;
use crate::movie::{MovieRecord, MAX_RATING};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Top-level key holding the movie array
pub const MOVIES_KEY: &str = "movies";

/// Rating value older save files used for "unrated"
const LEGACY_UNRATED: i64 = -1;

// ============================================================================
// DOCUMENT SHAPES
// ============================================================================

#[derive(Deserialize)]
struct CatalogDocument {
    movies: Vec<MovieEntry>,
}

#[derive(Deserialize)]
struct MovieEntry {
    title: String,
    category: String,
    #[serde(default)]
    rating: Option<i64>,
}

impl MovieEntry {
    fn into_record(self, index: usize) -> Result<MovieRecord> {
        if self.title.is_empty() {
            return Err(CatalogError::MalformedDocument(format!(
                "movie #{} has an empty title",
                index
            )));
        }

        let rating = match self.rating {
            None | Some(LEGACY_UNRATED) => None,
            Some(value) => Some(u32::try_from(value).map_err(|_| {
                CatalogError::MalformedDocument(format!(
                    "movie '{}' has rating {}; expected 0 to {}, or {} for unrated",
                    self.title, value, MAX_RATING, LEGACY_UNRATED
                ))
            })?),
        };

        Ok(MovieRecord::restore(self.title, self.category, rating))
    }
}

// ============================================================================
// CODEC
// ============================================================================

pub struct JsonCodec;

impl JsonCodec {
    /// Serialize the catalog into a JSON document
    pub fn write(catalog: &Catalog) -> Value {
        let movies = catalog.list_all().iter().map(movie_value).collect();

        let mut document = Map::new();
        document.insert(MOVIES_KEY.to_string(), Value::Array(movies));
        Value::Object(document)
    }

    /// Rebuild a catalog from a JSON document, narrating into `log`
    pub fn read(document: &Value, log: EventLog) -> Result<Catalog> {
        let object = document.as_object().ok_or_else(|| {
            CatalogError::MalformedDocument("top level must be a JSON object".to_string())
        })?;
        if !object.contains_key(MOVIES_KEY) {
            return Err(CatalogError::MalformedDocument(format!(
                "missing top-level '{}' key",
                MOVIES_KEY
            )));
        }

        let parsed = CatalogDocument::deserialize(document)
            .map_err(|e| CatalogError::MalformedDocument(e.to_string()))?;

        let movies = parsed
            .movies
            .into_iter()
            .enumerate()
            .map(|(i, entry)| entry.into_record(i))
            .collect::<Result<Vec<_>>>()?;

        Catalog::with_movies(movies, log).map_err(|e| match e {
            CatalogError::DuplicateTitle(title) => {
                CatalogError::MalformedDocument(format!("duplicate title '{}'", title))
            }
            other => other,
        })
    }

    /// Parse JSON text then [`read`](Self::read) it
    pub fn read_str(text: &str, log: EventLog) -> Result<Catalog> {
        let document: Value = serde_json::from_str(text)
            .map_err(|e| CatalogError::MalformedDocument(format!("invalid JSON: {}", e)))?;
        Self::read(&document, log)
    }

    /// Atomically write the catalog to `path`
    pub fn save(path: &Path, catalog: &Catalog) -> Result<()> {
        Self::save_with(path, catalog, write_synced)
    }

    /// Save through `write`, which fills the temp file. The target is only
    /// replaced once `write` has succeeded.
    fn save_with<W>(path: &Path, catalog: &Catalog, write: W) -> Result<()>
    where
        W: FnOnce(&mut NamedTempFile, &Value) -> io::Result<()>,
    {
        let document = Self::write(catalog);

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| CatalogError::io(dir, e))?;

        // Dropping the temp file on any early return deletes it
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| CatalogError::io(dir, e))?;
        debug!("writing {} movies to {}", catalog.len(), tmp.path().display());

        if let Err(e) = write(&mut tmp, &document) {
            return Err(CatalogError::io(tmp.path(), e));
        }

        tmp.persist(path)
            .map_err(|e| CatalogError::io(path, e.error))?;

        info!("saved {} movies to {}", catalog.len(), path.display());
        catalog
            .event_log()
            .log_event(&format!("saved movie list to {}", path.display()));
        Ok(())
    }

    /// Read and parse the file at `path` into a fresh catalog
    pub fn load(path: &Path, log: EventLog) -> Result<Catalog> {
        let text = fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        let catalog = Self::read_str(&text, log)?;

        info!("loaded {} movies from {}", catalog.len(), path.display());
        catalog
            .event_log()
            .log_event(&format!("loaded movie list from {}", path.display()));
        Ok(catalog)
    }
}

fn movie_value(movie: &MovieRecord) -> Value {
    let mut entry = Map::new();
    entry.insert("title".to_string(), Value::from(movie.title()));
    entry.insert("category".to_string(), Value::from(movie.category()));
    if let Some(rating) = movie.rating() {
        entry.insert("rating".to_string(), Value::from(rating));
    }
    Value::Object(entry)
}

fn write_synced(tmp: &mut NamedTempFile, document: &Value) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *tmp, document)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_catalog() -> Catalog {
        let mut catalog = Catalog::new(EventLog::new());
        catalog.add("Inception", "Sci-Fi").unwrap();
        catalog.add("Heat", "Crime").unwrap();
        catalog.rate_movie("Inception", 9).unwrap();
        catalog
    }

    #[test]
    fn test_write_document_shape() {
        let document = JsonCodec::write(&create_test_catalog());

        assert_eq!(
            document,
            json!({
                "movies": [
                    { "title": "Inception", "category": "Sci-Fi", "rating": 9 },
                    { "title": "Heat", "category": "Crime" }
                ]
            })
        );
    }

    #[test]
    fn test_write_empty_catalog() {
        let document = JsonCodec::write(&Catalog::new(EventLog::new()));
        assert_eq!(document, json!({ "movies": [] }));
    }

    #[test]
    fn test_read_rederives_watched() {
        let document = json!({
            "movies": [
                { "title": "Heat", "category": "Crime", "rating": 7 },
                { "title": "Alien", "category": "Horror", "rating": null },
                { "title": "Jaws", "category": "Thriller" },
                { "title": "Tron", "category": "Sci-Fi", "rating": -1 }
            ]
        });
        let catalog = JsonCodec::read(&document, EventLog::new()).unwrap();
        let watched: Vec<bool> = catalog.list_all().iter().map(|m| m.is_watched()).collect();

        assert_eq!(watched, vec![true, false, false, false]);
        assert_eq!(catalog.find_movie("Heat").unwrap().rating(), Some(7));
    }

    #[test]
    fn test_read_does_not_log() {
        let log = EventLog::new();
        let document = json!({ "movies": [ { "title": "Heat", "category": "Crime" } ] });
        JsonCodec::read(&document, log.clone()).unwrap();

        assert!(log.is_empty());
    }

    #[test]
    fn test_read_ignores_unknown_fields() {
        let document = json!({
            "movies": [ { "title": "Heat", "category": "Crime", "rating": 7, "watched": true } ]
        });
        assert_eq!(JsonCodec::read(&document, EventLog::new()).unwrap().len(), 1);
    }

    #[test]
    fn test_read_malformed_documents() {
        let cases = vec![
            json!([]),
            json!({}),
            json!({ "films": [] }),
            json!({ "movies": {} }),
            json!({ "movies": [ { "category": "Drama" } ] }),
            json!({ "movies": [ { "title": "", "category": "Drama" } ] }),
            json!({ "movies": [ { "title": "Heat" } ] }),
            json!({ "movies": [ { "title": "Heat", "category": "Crime", "rating": 7.5 } ] }),
            json!({ "movies": [ { "title": "Heat", "category": "Crime", "rating": "7" } ] }),
            json!({ "movies": [ { "title": "Heat", "category": "Crime", "rating": -4 } ] }),
            json!({ "movies": [
                { "title": "Heat", "category": "Crime" },
                { "title": "Heat", "category": "Drama" }
            ] }),
        ];

        for document in cases {
            let result = JsonCodec::read(&document, EventLog::new());
            assert!(
                matches!(result, Err(CatalogError::MalformedDocument(_))),
                "expected MalformedDocument for {}",
                document
            );
        }
    }

    #[test]
    fn test_read_str_invalid_json() {
        let result = JsonCodec::read_str("{ \"movies\": [", EventLog::new());
        assert!(matches!(result, Err(CatalogError::MalformedDocument(_))));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("movieList.json");
        let catalog = create_test_catalog();

        JsonCodec::save(&path, &catalog).unwrap();
        let loaded = JsonCodec::load(&path, EventLog::new()).unwrap();

        assert_eq!(loaded.list_all(), catalog.list_all());
        assert_eq!(
            loaded.event_log().entries()[0].description,
            format!("loaded movie list from {}", path.display())
        );
    }

    #[test]
    fn test_save_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movieList.json");
        fs::write(&path, "old contents").unwrap();

        JsonCodec::save(&path, &create_test_catalog()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("Inception"));
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "temp file must not be left behind");
    }

    #[test]
    fn test_failed_write_keeps_previous_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movieList.json");
        JsonCodec::save(&path, &create_test_catalog()).unwrap();
        let first_save = fs::read(&path).unwrap();

        let mut changed = create_test_catalog();
        changed.add("Arrival", "Sci-Fi").unwrap();

        // Write half the document, then fail
        let result = JsonCodec::save_with(&path, &changed, |tmp, document| {
            let text = serde_json::to_vec_pretty(document)?;
            tmp.write_all(&text[..text.len() / 2])?;
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        });

        assert!(matches!(result, Err(CatalogError::Io { .. })));
        assert_eq!(fs::read(&path).unwrap(), first_save);
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "temp file must not be left behind");

        let reloaded = JsonCodec::load(&path, EventLog::new()).unwrap();
        assert!(!reloaded.contains("Arrival"));
    }

    #[test]
    fn test_failed_first_save_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movieList.json");

        let result = JsonCodec::save_with(&path, &create_test_catalog(), |tmp, _| {
            tmp.write_all(b"{ \"movies\": [")?;
            Err(io::Error::new(io::ErrorKind::Other, "interrupted"))
        });

        assert!(result.is_err());
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_save_is_not_logged() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = create_test_catalog();
        let before = catalog.event_log().len();

        let _ = JsonCodec::save_with(&dir.path().join("movieList.json"), &catalog, |_, _| {
            Err(io::Error::new(io::ErrorKind::Other, "nope"))
        });

        assert_eq!(catalog.event_log().len(), before);
    }

    #[test]
    fn test_out_of_range_rating_message() {
        let document = json!({
            "movies": [ { "title": "Heat", "category": "Crime", "rating": 4294967296_i64 } ]
        });
        let err = JsonCodec::read(&document, EventLog::new()).unwrap_err();

        assert!(matches!(err, CatalogError::MalformedDocument(_)));
        assert!(err.to_string().contains(&format!("expected 0 to {}", MAX_RATING)), "{}", err);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = JsonCodec::load(&dir.path().join("missing.json"), EventLog::new());

        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }
}
