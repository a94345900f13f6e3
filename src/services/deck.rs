// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The tarot deck: a fixed eight-card catalog and the card-to-image
//! lookup.

use crate::models::Card;
use rand::Rng;

/// The full catalog. Same eight entries every run; only the draw is
/// random.
const CARDS: [Card; 8] = [
    Card {
        name: "The Moon",
        theme: "illusion, intuition, the subconscious",
    },
    Card {
        name: "The Star",
        theme: "hope, renewal, spiritual guidance",
    },
    Card {
        name: "Death",
        theme: "transformation, endings, new beginnings",
    },
    Card {
        name: "The Tower",
        theme: "sudden change, upheaval, revelation",
    },
    Card {
        name: "The Hanged Man",
        theme: "surrender, new perspective, letting go",
    },
    Card {
        name: "The Devil",
        theme: "temptation, bondage, materialism",
    },
    Card {
        name: "The High Priestess",
        theme: "mystery, intuition, the divine feminine",
    },
    Card {
        name: "The Magician",
        theme: "manifestation, power, skill",
    },
];

/// Display names alias onto the three shipped card images.
const IMAGE_TAGS: [(&str, &str); 8] = [
    ("The Moon", "moon"),
    ("The Star", "star"),
    ("Death", "death"),
    ("The Tower", "moon"),
    ("The Hanged Man", "star"),
    ("The Devil", "death"),
    ("The High Priestess", "moon"),
    ("The Magician", "star"),
];

/// Service for drawing cards from the catalog.
#[derive(Clone)]
pub struct TarotDeck {
    cards: &'static [Card],
}

impl Default for TarotDeck {
    fn default() -> Self {
        Self { cards: &CARDS }
    }
}

impl TarotDeck {
    /// The full catalog.
    pub fn cards(&self) -> &'static [Card] {
        self.cards
    }

    /// Uniform random draw. The catalog is never empty, so this cannot
    /// fail.
    pub fn draw(&self) -> &'static Card {
        let idx = rand::rng().random_range(0..self.cards.len());
        &self.cards[idx]
    }

    /// Image tag for a card's display name. Unknown names fall back to
    /// "moon".
    pub fn image_tag(name: &str) -> &'static str {
        IMAGE_TAGS
            .iter()
            .find(|(card, _)| *card == name)
            .map(|(_, tag)| *tag)
            .unwrap_or("moon")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_eight_unique_names() {
        let deck = TarotDeck::default();
        assert_eq!(deck.cards().len(), 8);

        let mut names: Vec<&str> = deck.cards().iter().map(|c| c.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 8);
    }

    #[test]
    fn test_draw_returns_catalog_member() {
        let deck = TarotDeck::default();
        for _ in 0..100 {
            let card = deck.draw();
            assert!(deck.cards().iter().any(|c| c.name == card.name));
        }
    }

    #[test]
    fn test_image_tags_use_shipped_art_only() {
        let deck = TarotDeck::default();
        for card in deck.cards() {
            let tag = TarotDeck::image_tag(card.name);
            assert!(
                matches!(tag, "moon" | "star" | "death"),
                "unexpected image tag {tag} for {}",
                card.name
            );
        }
    }

    #[test]
    fn test_image_tag_aliasing() {
        assert_eq!(TarotDeck::image_tag("The Moon"), "moon");
        assert_eq!(TarotDeck::image_tag("The Tower"), "moon");
        assert_eq!(TarotDeck::image_tag("The Hanged Man"), "star");
        assert_eq!(TarotDeck::image_tag("The Devil"), "death");
        assert_eq!(TarotDeck::image_tag("Not A Card"), "moon");
    }
}
