//! Candidates
//!
//! A candidate is one breed paired with one image: the unit the user sees
//! on a card and decides on. Candidates are built once per load and never
//! change afterwards; a reload builds new ones.

use serde::{Deserialize, Serialize};

use crate::backend::{Breed, CatImage};

/// Shown when a breed has no temperament
pub const FALLBACK_TRAIT_LINE: &str = "Friendly • Loving";

/// Shown when a breed has no life span
pub const FALLBACK_AGE: &str = "2-4";

/// Number of traits shown on a card
pub const HEADLINE_TRAITS: usize = 3;

/// Identifier of a candidate (the image id, which is also the vote key)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

impl CandidateId {
    /// Create from any string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One breed + image pairing eligible for a decision
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    id: CandidateId,
    breed_id: String,
    display_name: String,
    traits: Option<Vec<String>>,
    age_label: Option<String>,
    image_uri: String,
}

impl Candidate {
    /// Pair a breed with one of its images
    #[must_use]
    pub fn pair(breed: &Breed, image: &CatImage) -> Self {
        Self {
            id: CandidateId::new(image.id.clone()),
            breed_id: breed.id.clone(),
            display_name: breed.name.clone(),
            traits: breed.temperament.as_deref().map(parse_traits),
            age_label: breed
                .life_span
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            image_uri: image.url.clone(),
        }
    }

    /// Decision key
    #[must_use]
    pub fn id(&self) -> &CandidateId {
        &self.id
    }

    /// Breed the image was found for
    #[must_use]
    pub fn breed_id(&self) -> &str {
        &self.breed_id
    }

    /// Breed name
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// All temperament traits, in listing order
    #[must_use]
    pub fn traits(&self) -> Option<&[String]> {
        self.traits.as_deref()
    }

    /// Life span text
    #[must_use]
    pub fn age_label(&self) -> Option<&str> {
        self.age_label.as_deref()
    }

    /// Image URL
    #[must_use]
    pub fn image_uri(&self) -> &str {
        &self.image_uri
    }

    /// First three traits joined for the card footer
    #[must_use]
    pub fn trait_line(&self) -> String {
        match self.traits() {
            Some(traits) if !traits.is_empty() => traits
                .iter()
                .take(HEADLINE_TRAITS)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" • "),
            _ => FALLBACK_TRAIT_LINE.to_string(),
        }
    }

    /// Age text for the card footer
    #[must_use]
    pub fn age_text(&self) -> &str {
        self.age_label().unwrap_or(FALLBACK_AGE)
    }
}

/// Split a comma-separated temperament into trimmed, non-empty traits
fn parse_traits(temperament: &str) -> Vec<String> {
    temperament
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Pair each breed with the image fetched for it.
///
/// `images` is index-aligned with `breeds`; breeds without an image are
/// skipped so every candidate has both halves.
#[must_use]
pub fn build_candidates(breeds: &[Breed], images: &[Option<CatImage>]) -> Vec<Candidate> {
    breeds
        .iter()
        .zip(images)
        .filter_map(|(breed, image)| image.as_ref().map(|image| Candidate::pair(breed, image)))
        .collect()
}
