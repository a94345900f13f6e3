// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod deck;
pub mod identity;
pub mod oracle;

pub use deck::TarotDeck;
pub use identity::{IdentityClient, ProviderIdentity};
pub use oracle::{FortuneReading, OracleClient};
