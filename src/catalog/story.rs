/// Story and block data structures
///
/// A story is an ordered sequence of typed blocks. Blocks are a closed sum
/// type: rendering dispatches with an exhaustive match, so adding a block
/// kind without teaching the renderer about it is a compile error, not a
/// silently dropped section.

use serde::Deserialize;

/// One published photo story
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    /// URL-style identifier, unique within the catalog
    pub slug: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: String,
    /// Asset id of the hero cover image
    pub hero_image_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    pub blocks: Vec<Block>,
}

/// One image inside a gallery or split-sticky block
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub public_id: String,
    pub alt: String,
    #[serde(default)]
    pub caption: Option<String>,
}

/// One typed unit of story content
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    Text {
        content: String,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        public_id: String,
        alt: String,
        #[serde(default)]
        caption: Option<String>,
    },
    /// "Behind the shot" editorial note with optional camera settings line
    BehindShot {
        #[serde(default)]
        id: Option<String>,
        title: String,
        content: String,
        #[serde(default)]
        settings: Option<String>,
    },
    Audio {
        title: String,
        src: String,
        #[serde(default)]
        subtitle: Option<String>,
    },
    /// Image pinned beside a column of paragraphs
    SplitSticky {
        #[serde(default)]
        id: Option<String>,
        image: GalleryImage,
        #[serde(default)]
        eyebrow: Option<String>,
        #[serde(default)]
        title: Option<String>,
        paragraphs: Vec<String>,
    },
    /// Scroll-coupled horizontal image track
    HorizontalGallery {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        subtitle: Option<String>,
        images: Vec<GalleryImage>,
    },
}

impl Block {
    /// Anchor id, for blocks that can be jumped to from the chapter menu
    pub fn anchor(&self) -> Option<&str> {
        match self {
            Block::BehindShot { id, .. }
            | Block::SplitSticky { id, .. }
            | Block::HorizontalGallery { id, .. } => id.as_deref(),
            Block::Text { .. } | Block::Image { .. } | Block::Audio { .. } => None,
        }
    }
}

/// One entry of a story's in-page chapter menu
#[derive(Debug, Clone, PartialEq)]
pub struct TocItem {
    pub id: String,
    pub label: String,
    pub sublabel: Option<String>,
    /// Index of the source block within the story
    pub block_index: usize,
}

impl Story {
    /// Extract the table of contents: the ordered subsequence of blocks that
    /// carry both an anchor id and a human label.
    pub fn table_of_contents(&self) -> Vec<TocItem> {
        self.blocks
            .iter()
            .enumerate()
            .filter_map(|(index, block)| {
                let (id, label, sublabel) = match block {
                    Block::BehindShot { id, title, .. } => {
                        (id.clone()?, title.clone(), None)
                    }
                    Block::SplitSticky {
                        id, title, eyebrow, ..
                    } => (id.clone()?, title.clone()?, eyebrow.clone()),
                    Block::HorizontalGallery {
                        id, title, subtitle, ..
                    } => (id.clone()?, title.clone()?, subtitle.clone()),
                    Block::Text { .. } | Block::Image { .. } | Block::Audio { .. } => {
                        return None
                    }
                };

                Some(TocItem {
                    id,
                    label,
                    sublabel,
                    block_index: index,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story_with_blocks(blocks: Vec<Block>) -> Story {
        Story {
            slug: "test".into(),
            title: "Test".into(),
            description: String::new(),
            location: String::new(),
            date: "2024".into(),
            hero_image_id: "hero".into(),
            tags: vec![],
            featured: false,
            blocks,
        }
    }

    #[test]
    fn test_block_json_dispatch() {
        let json = r#"{ "type": "image", "publicId": "p1", "alt": "a shot" }"#;
        let block: Block = serde_json::from_str(json).unwrap();
        assert_eq!(
            block,
            Block::Image {
                public_id: "p1".into(),
                alt: "a shot".into(),
                caption: None,
            }
        );
    }

    #[test]
    fn test_gallery_json() {
        let json = r#"{
            "type": "horizontalGallery",
            "id": "gallery-1",
            "title": "Details",
            "images": [
                { "publicId": "g1", "alt": "one" },
                { "publicId": "g2", "alt": "two", "caption": "cap" }
            ]
        }"#;

        let block: Block = serde_json::from_str(json).unwrap();
        match block {
            Block::HorizontalGallery { id, images, .. } => {
                assert_eq!(id.as_deref(), Some("gallery-1"));
                assert_eq!(images.len(), 2);
                assert_eq!(images[1].caption.as_deref(), Some("cap"));
            }
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn test_toc_skips_unlabeled_blocks() {
        let story = story_with_blocks(vec![
            Block::Text {
                content: "intro".into(),
            },
            Block::BehindShot {
                id: Some("behind".into()),
                title: "Behind the shot".into(),
                content: String::new(),
                settings: None,
            },
            // Gallery without an id never reaches the menu
            Block::HorizontalGallery {
                id: None,
                title: Some("Untitled".into()),
                subtitle: None,
                images: vec![],
            },
            Block::HorizontalGallery {
                id: Some("details".into()),
                title: Some("Details".into()),
                subtitle: Some("Texture and light".into()),
                images: vec![],
            },
        ]);

        let toc = story.table_of_contents();
        assert_eq!(toc.len(), 2);
        assert_eq!(toc[0].id, "behind");
        assert_eq!(toc[0].block_index, 1);
        assert_eq!(toc[1].label, "Details");
        assert_eq!(toc[1].sublabel.as_deref(), Some("Texture and light"));
        assert_eq!(toc[1].block_index, 3);
    }
}
