/// The embedded story catalog
///
/// Stories ship inside the binary as a JSON document and are parsed once at
/// startup. The catalog is the single source of truth for slug resolution,
/// prev/next neighbors, and the browse screen's filtering.

use thiserror::Error;

use super::story::Story;

const CATALOG_JSON: &str = include_str!("../../assets/stories.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse story catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable, ordered collection of all published stories
#[derive(Debug, Clone)]
pub struct Catalog {
    stories: Vec<Story>,
}

impl Catalog {
    /// Parse the embedded catalog.
    ///
    /// Failure here means the shipped JSON is malformed; the application
    /// cannot function without its content, so the caller panics with the
    /// parse error rather than limping along empty.
    pub fn load() -> Result<Self, CatalogError> {
        let stories: Vec<Story> = serde_json::from_str(CATALOG_JSON)?;
        Ok(Self { stories })
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    /// Resolve a slug to its story. `None` renders as the not-found screen.
    pub fn find_by_slug(&self, slug: &str) -> Option<&Story> {
        self.stories.iter().find(|s| s.slug == slug)
    }

    /// Previous and next stories in catalog order, for the endcap cards at
    /// the bottom of a story. Either side may be absent at the catalog's
    /// edges; an unknown slug has no neighbors.
    pub fn neighbors(&self, slug: &str) -> (Option<&Story>, Option<&Story>) {
        let Some(position) = self.stories.iter().position(|s| s.slug == slug) else {
            return (None, None);
        };

        let prev = position.checked_sub(1).map(|i| &self.stories[i]);
        let next = self.stories.get(position + 1);
        (prev, next)
    }

    /// Every tag used by any story, deduplicated and sorted for the browse
    /// screen's filter row.
    pub fn all_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .stories
            .iter()
            .flat_map(|s| s.tags.iter().cloned())
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }

    /// Filter stories for the browse screen. The query matches against
    /// title, description, location, date and tags, case-insensitively;
    /// a selected tag must be present verbatim.
    pub fn filter<'a>(&'a self, query: &str, tag: Option<&str>) -> Vec<&'a Story> {
        let query = query.trim().to_lowercase();

        self.stories
            .iter()
            .filter(|story| {
                if let Some(tag) = tag {
                    if !story.tags.iter().any(|t| t == tag) {
                        return false;
                    }
                }

                if query.is_empty() {
                    return true;
                }

                let haystack = format!(
                    "{} {} {} {} {}",
                    story.title,
                    story.description,
                    story.location,
                    story.date,
                    story.tags.join(" "),
                )
                .to_lowercase();

                haystack.contains(&query)
            })
            .collect()
    }
}
