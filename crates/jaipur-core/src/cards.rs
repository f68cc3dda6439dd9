//! Goods and card counts.
//!
//! This module contains:
//! - The eight card types of the game (six goods, jade, and camels)
//! - `CardCounts` for hands, the market, herds and transfer requests

use serde::{Deserialize, Serialize};
use std::fmt;

/// Player identifier (0 or 1)
pub type PlayerId = u8;

/// Card types.
///
/// Cards are fungible within a type, so every container in the game only
/// tracks counts per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GoodType {
    Jade,
    Diamonds,
    Gold,
    Silver,
    Cloth,
    Spice,
    Leather,
    Camel,
}

impl GoodType {
    /// All card types, camels last
    pub const ALL: [GoodType; 8] = [
        GoodType::Jade,
        GoodType::Diamonds,
        GoodType::Gold,
        GoodType::Silver,
        GoodType::Cloth,
        GoodType::Spice,
        GoodType::Leather,
        GoodType::Camel,
    ];

    /// Every type that can be sold for tokens
    pub const GOODS: [GoodType; 7] = [
        GoodType::Jade,
        GoodType::Diamonds,
        GoodType::Gold,
        GoodType::Silver,
        GoodType::Cloth,
        GoodType::Spice,
        GoodType::Leather,
    ];

    pub fn is_camel(&self) -> bool {
        matches!(self, GoodType::Camel)
    }
}

impl fmt::Display for GoodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Counts of cards per type.
///
/// Used for player hands, the market, and both sides of a take request.
/// Player hands never hold camels; those live in the herd.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardCounts {
    pub jade: u32,
    pub diamonds: u32,
    pub gold: u32,
    pub silver: u32,
    pub cloth: u32,
    pub spice: u32,
    pub leather: u32,
    pub camel: u32,
}

impl CardCounts {
    /// Create an empty set of counts
    pub fn new() -> Self {
        Self::default()
    }

    /// Create counts holding a single type
    pub fn single(good: GoodType, amount: u32) -> Self {
        let mut counts = Self::new();
        counts.add(good, amount);
        counts
    }

    /// Build counts from `(type, amount)` pairs, summing repeated types
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (GoodType, u32)>,
    {
        let mut counts = Self::new();
        for (good, amount) in pairs {
            counts.add(good, amount);
        }
        counts
    }

    /// Total number of cards
    pub fn total(&self) -> u32 {
        GoodType::ALL.iter().map(|&g| self.get(g)).sum()
    }

    /// Number of non-camel cards
    pub fn goods_total(&self) -> u32 {
        self.total() - self.camel
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Get count of a specific type
    pub fn get(&self, good: GoodType) -> u32 {
        match good {
            GoodType::Jade => self.jade,
            GoodType::Diamonds => self.diamonds,
            GoodType::Gold => self.gold,
            GoodType::Silver => self.silver,
            GoodType::Cloth => self.cloth,
            GoodType::Spice => self.spice,
            GoodType::Leather => self.leather,
            GoodType::Camel => self.camel,
        }
    }

    fn slot_mut(&mut self, good: GoodType) -> &mut u32 {
        match good {
            GoodType::Jade => &mut self.jade,
            GoodType::Diamonds => &mut self.diamonds,
            GoodType::Gold => &mut self.gold,
            GoodType::Silver => &mut self.silver,
            GoodType::Cloth => &mut self.cloth,
            GoodType::Spice => &mut self.spice,
            GoodType::Leather => &mut self.leather,
            GoodType::Camel => &mut self.camel,
        }
    }

    /// Set count of a specific type
    pub fn set(&mut self, good: GoodType, count: u32) {
        *self.slot_mut(good) = count;
    }

    pub fn add(&mut self, good: GoodType, amount: u32) {
        *self.slot_mut(good) += amount;
    }

    /// Add every count of another set to this one
    pub fn add_counts(&mut self, other: &CardCounts) {
        for good in GoodType::ALL {
            self.add(good, other.get(good));
        }
    }

    /// Check that every count in `other` is available here
    pub fn contains(&self, other: &CardCounts) -> bool {
        GoodType::ALL.iter().all(|&g| self.get(g) >= other.get(g))
    }

    /// Remove `amount` of one type, returning false if there are not enough
    pub fn remove(&mut self, good: GoodType, amount: u32) -> bool {
        let slot = self.slot_mut(good);
        if *slot < amount {
            return false;
        }
        *slot -= amount;
        true
    }

    /// Remove every count of `other`, returning false (and leaving `self`
    /// untouched) if any type is short
    pub fn try_subtract(&mut self, other: &CardCounts) -> bool {
        if !self.contains(other) {
            return false;
        }
        for good in GoodType::ALL {
            self.remove(good, other.get(good));
        }
        true
    }

    /// Types with a non-zero count, in `GoodType::ALL` order
    pub fn types(&self) -> impl Iterator<Item = GoodType> + '_ {
        GoodType::ALL.into_iter().filter(move |&g| self.get(g) > 0)
    }

    /// Whether the two sets share no type
    pub fn is_disjoint(&self, other: &CardCounts) -> bool {
        self.types().all(|g| other.get(g) == 0)
    }

    /// The same counts with camels dropped
    pub fn without_camels(&self) -> CardCounts {
        CardCounts {
            camel: 0,
            ..*self
        }
    }

    /// Every distinct sub-multiset of exactly `size` cards
    pub fn sub_multisets(&self, size: u32) -> Vec<CardCounts> {
        let present: Vec<GoodType> = self.types().collect();
        let mut out = Vec::new();
        let mut current = CardCounts::new();
        self.collect_sub_multisets(&present, 0, size, &mut current, &mut out);
        out
    }

    fn collect_sub_multisets(
        &self,
        present: &[GoodType],
        index: usize,
        remaining: u32,
        current: &mut CardCounts,
        out: &mut Vec<CardCounts>,
    ) {
        if remaining == 0 {
            out.push(*current);
            return;
        }
        let Some(&good) = present.get(index) else {
            return;
        };
        let max = self.get(good).min(remaining);
        for n in (0..=max).rev() {
            current.set(good, n);
            self.collect_sub_multisets(present, index + 1, remaining - n, current, out);
        }
        current.set(good, 0);
    }
}

impl fmt::Display for CardCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .types()
            .map(|g| format!("{}x{}", self.get(g), g))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}
