// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tarot card catalog entry.

/// A static tarot archetype. Cards are defined at compile time and never
/// persisted; the theme is only used as generation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    /// Display name, unique within the catalog
    pub name: &'static str,
    /// Thematic description fed to the fortune prompt
    pub theme: &'static str,
}
