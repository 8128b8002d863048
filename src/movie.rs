// 🎬 Movie Record - a single entry in the movie list
//
// Title is the identity key inside a catalog (exact, case-sensitive match).
// Watched state is derived from the rating: a movie counts as watched once it
// has been rated, so the two can never disagree.

use crate::error::{CatalogError, Result};
use std::fmt;
use std::num::{IntErrorKind, ParseIntError};

/// Largest rating a record can hold
pub const MAX_RATING: u32 = u32::MAX;

pub(crate) fn rating_out_of_range(value: impl fmt::Display) -> CatalogError {
    CatalogError::InvalidArgument(format!(
        "rating must be between 0 and {}, got {}",
        MAX_RATING, value
    ))
}

// ============================================================================
// MOVIE RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRecord {
    /// Movie title (non-empty, unique within a catalog)
    title: String,

    /// Free-form category (e.g., "Sci-Fi", "Drama")
    category: String,

    /// None = unrated / unwatched
    rating: Option<u32>,
}

impl MovieRecord {
    /// Create an unrated movie. Fails on an empty title.
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Result<Self> {
        let title = title.into();
        if title.is_empty() {
            return Err(CatalogError::InvalidArgument(
                "movie title must not be empty".to_string(),
            ));
        }

        Ok(MovieRecord {
            title,
            category: category.into(),
            rating: None,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn rating(&self) -> Option<u32> {
        self.rating
    }

    pub fn is_watched(&self) -> bool {
        self.rating.is_some()
    }

    /// Set (or overwrite) the rating; marks the movie as watched.
    ///
    /// Records held by a catalog should be rated through
    /// [`Catalog::find_movie_mut`](crate::Catalog::find_movie_mut) so the
    /// change is narrated in the event log.
    pub fn set_rating(&mut self, value: i64) -> Result<()> {
        let rating = u32::try_from(value).map_err(|_| rating_out_of_range(value))?;
        self.rating = Some(rating);
        Ok(())
    }

    /// Parse raw user text into a rating value accepted by [`set_rating`](Self::set_rating).
    pub fn parse_rating(text: &str) -> Result<i64> {
        let trimmed = text.trim();
        let value: i64 = trimmed.parse().map_err(|e: ParseIntError| match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => rating_out_of_range(trimmed),
            _ => CatalogError::InvalidArgument(format!("'{}' is not an integer rating", trimmed)),
        })?;

        if u32::try_from(value).is_err() {
            return Err(rating_out_of_range(value));
        }

        Ok(value)
    }

    /// Fixed one-line rendering used by list views
    pub fn to_display_string(&self) -> String {
        match self.rating {
            Some(rating) => format!("{} | {} | {}/10", self.title, self.category, rating),
            None => format!("{} | {} | unrated", self.title, self.category),
        }
    }

    /// Rebuild a record from persisted fields (rating already validated)
    pub(crate) fn restore(title: String, category: String, rating: Option<u32>) -> Self {
        MovieRecord {
            title,
            category,
            rating,
        }
    }
}

impl fmt::Display for MovieRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}
