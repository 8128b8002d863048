// 🎞️ Catalog - the owned, ordered movie list and its queries
//
// Insertion order is kept for display. Titles are unique (exact match).
// Filters report NotFound on an empty result; list_all never fails and returns
// an empty slice for an empty catalog. Callers rely on that asymmetry.

use crate::error::{CatalogError, Result};
use crate::event_log::EventLog;
use crate::movie::MovieRecord;
use std::ops::Deref;

// ============================================================================
// CATALOG
// ============================================================================

#[derive(Debug, Clone)]
pub struct Catalog {
    movies: Vec<MovieRecord>,
    log: EventLog,
}

impl Catalog {
    /// Create an empty catalog narrating into `log`
    pub fn new(log: EventLog) -> Self {
        Catalog {
            movies: Vec::new(),
            log,
        }
    }

    /// Rebuild a catalog from existing records without logging anything.
    ///
    /// Fails with `DuplicateTitle` if two records share a title.
    pub fn with_movies(movies: Vec<MovieRecord>, log: EventLog) -> Result<Self> {
        let mut catalog = Catalog::new(log);
        for movie in movies {
            if catalog.contains(movie.title()) {
                return Err(CatalogError::DuplicateTitle(movie.title().to_string()));
            }
            catalog.movies.push(movie);
        }
        Ok(catalog)
    }

    pub fn event_log(&self) -> &EventLog {
        &self.log
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.movies.iter().any(|m| m.title() == title)
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Append a record; rejects a title that is already present
    pub fn add_movie(&mut self, movie: MovieRecord) -> Result<()> {
        if self.contains(movie.title()) {
            return Err(CatalogError::DuplicateTitle(movie.title().to_string()));
        }

        self.log.log_event(&format!("added movie {}", movie.title()));
        self.movies.push(movie);
        Ok(())
    }

    /// Build a record from raw fields and add it
    pub fn add(&mut self, title: &str, category: &str) -> Result<()> {
        let movie = MovieRecord::new(title, category)?;
        self.add_movie(movie)
    }

    /// Rate the movie with this title (find + set_rating in one call)
    pub fn rate_movie(&mut self, title: &str, rating: i64) -> Result<()> {
        self.find_movie_mut(title)?.set_rating(rating)
    }

    // ========================================================================
    // LOOKUPS & FILTERS
    // ========================================================================

    /// Exact, case-sensitive title lookup
    pub fn find_movie(&self, title: &str) -> Result<&MovieRecord> {
        self.ensure_not_empty()?;
        self.movies
            .iter()
            .find(|m| m.title() == title)
            .ok_or_else(|| CatalogError::NotFound(format!("no movie titled '{}'", title)))
    }

    /// Look up a movie for in-place mutation.
    ///
    /// The returned handle aliases the stored record: a rating set through it
    /// is immediately visible in the catalog and is written to the event log.
    pub fn find_movie_mut(&mut self, title: &str) -> Result<RatingHandle<'_>> {
        self.ensure_not_empty()?;
        let log = &self.log;
        let movie = self
            .movies
            .iter_mut()
            .find(|m| m.title() == title)
            .ok_or_else(|| CatalogError::NotFound(format!("no movie titled '{}'", title)))?;

        Ok(RatingHandle { movie, log })
    }

    /// All movies whose category matches exactly, in catalog order
    pub fn filter_by_category(&self, category: &str) -> Result<Vec<&MovieRecord>> {
        let found = self.select(|m| m.category() == category, || {
            format!("no movies in category '{}'", category)
        })?;
        self.log
            .log_event(&format!("filtered movies by category {}", category));
        Ok(found)
    }

    /// Rated movies with rating >= `min_rating` (boundary included)
    pub fn filter_by_min_rating(&self, min_rating: i64) -> Result<Vec<&MovieRecord>> {
        let found = self.select(
            |m| m.rating().is_some_and(|r| i64::from(r) >= min_rating),
            || format!("no movies rated at least {}", min_rating),
        )?;
        self.log
            .log_event(&format!("filtered movies by minimum rating {}", min_rating));
        Ok(found)
    }

    /// Movies that have not been rated yet
    pub fn list_unwatched(&self) -> Result<Vec<&MovieRecord>> {
        let found = self.select(|m| !m.is_watched(), || "every movie has been watched".to_string())?;
        self.log.log_event("listed unwatched movies");
        Ok(found)
    }

    /// The full ordered collection; empty (not an error) for an empty catalog
    pub fn list_all(&self) -> &[MovieRecord] {
        &self.movies
    }

    fn ensure_not_empty(&self) -> Result<()> {
        if self.movies.is_empty() {
            return Err(CatalogError::NotFound("the movie list is empty".to_string()));
        }
        Ok(())
    }

    fn select<P, M>(&self, predicate: P, empty_message: M) -> Result<Vec<&MovieRecord>>
    where
        P: Fn(&MovieRecord) -> bool,
        M: FnOnce() -> String,
    {
        self.ensure_not_empty()?;
        let found: Vec<&MovieRecord> = self.movies.iter().filter(|m| predicate(*m)).collect();
        if found.is_empty() {
            return Err(CatalogError::NotFound(empty_message()));
        }
        Ok(found)
    }
}

// ============================================================================
// RATING HANDLE
// ============================================================================

/// Mutable view of a record that lives inside a [`Catalog`]
#[derive(Debug)]
pub struct RatingHandle<'a> {
    movie: &'a mut MovieRecord,
    log: &'a EventLog,
}

impl RatingHandle<'_> {
    /// Rate the stored record and narrate the change
    pub fn set_rating(&mut self, value: i64) -> Result<()> {
        self.movie.set_rating(value)?;
        self.log
            .log_event(&format!("rated movie {}: {}", self.movie.title(), value));
        Ok(())
    }
}

impl Deref for RatingHandle<'_> {
    type Target = MovieRecord;

    fn deref(&self) -> &MovieRecord {
        self.movie
    }
}
