// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Deterministic rotation of cross-link sets.
//!
//! Each page links to a different window of the priority-sorted list,
//! chosen by `start = (seed' * multiplier) mod n` where `seed'` is the
//! current entity id, shifted down by one for one-based call sites. Over
//! the whole site every entity collects a comparable number of inbound
//! links. The multipliers are fixed per widget and must not change: the
//! published internal-link structure depends on them.

use crate::model::Entity;

/// How the seed enters the start formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// `start = ((seed - 1) * m) mod n`
    OneBased,
    /// `start = (seed * m) mod n`
    ZeroBased,
}

/// What happens when `limit` exceeds the list length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    /// Keep walking the circle; items repeat.
    Wrap,
    /// Stop after one lap.
    Truncate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation {
    pub multiplier: i64,
    pub origin: Origin,
    pub overflow: Overflow,
}

impl Rotation {
    /// One-based seed, wrap-around overflow.
    #[must_use]
    pub const fn new(multiplier: i64) -> Self {
        Self {
            multiplier,
            origin: Origin::OneBased,
            overflow: Overflow::Wrap,
        }
    }

    #[must_use]
    pub const fn zero_based(self) -> Self {
        Self {
            origin: Origin::ZeroBased,
            ..self
        }
    }

    #[must_use]
    pub const fn truncating(self) -> Self {
        Self {
            overflow: Overflow::Truncate,
            ..self
        }
    }

    /// Start index for `seed` over `n` items. `n` must be non-zero.
    #[must_use]
    pub fn start(&self, seed: i64, n: usize) -> usize {
        let base = match self.origin {
            Origin::OneBased => seed.wrapping_sub(1),
            Origin::ZeroBased => seed,
        };
        let n = i64::try_from(n).unwrap_or(i64::MAX);
        // rem_euclid keeps the index in 0..n for any seed.
        let start = base.wrapping_mul(self.multiplier).rem_euclid(n);
        usize::try_from(start).unwrap_or(0)
    }

    /// Circular slice of `items` starting at [`Rotation::start`]. Items
    /// must already be in canonical (priority) order. Empty input yields
    /// an empty result.
    #[must_use]
    pub fn select<'a, T>(&self, items: &[&'a T], seed: i64, limit: usize) -> Vec<&'a T> {
        let n = items.len();
        if n == 0 {
            return Vec::new();
        }
        let take = match self.overflow {
            Overflow::Wrap => limit,
            Overflow::Truncate => limit.min(n),
        };
        let start = self.start(seed, n);
        (0..take).map(|i| items[(start + i) % n]).collect()
    }
}

/// Commune page sidebar: services to link.
pub const COMMUNE_SIDEBAR_SERVICES: Rotation = Rotation::new(5);
pub const COMMUNE_SIDEBAR_SERVICES_LIMIT: usize = 6;
/// Commune page body: service cards.
pub const COMMUNE_SERVICE_CARDS: Rotation = Rotation::new(7);
pub const COMMUNE_SERVICE_CARDS_LIMIT: usize = 6;
/// Service page body: inline commune links joined with `|`.
pub const SERVICE_COMMUNE_LINKS: Rotation = Rotation::new(4);
pub const SERVICE_COMMUNE_LINKS_LIMIT: usize = 4;
/// Service sidebar: other services of the same category.
pub const SERVICE_SIDEBAR_SAME_CATEGORY: Rotation = Rotation::new(3).zero_based().truncating();
pub const SERVICE_SIDEBAR_SAME_CATEGORY_LIMIT: usize = 4;
/// Service sidebar: services of other categories.
pub const SERVICE_SIDEBAR_OTHER_CATEGORY: Rotation = Rotation::new(5).zero_based().truncating();
pub const SERVICE_SIDEBAR_OTHER_CATEGORY_LIMIT: usize = 2;
/// Service sidebar: communes. Only rotates when there are more communes
/// than the limit.
pub const SERVICE_SIDEBAR_COMMUNES: Rotation = Rotation::new(7).zero_based().truncating();
pub const SERVICE_SIDEBAR_COMMUNES_LIMIT: usize = 5;
/// Service page "zones of intervention": Brussels communes.
pub const ZONES_BRUSSELS: Rotation = Rotation::new(3).zero_based();
pub const ZONES_BRUSSELS_LIMIT: usize = 3;
/// Service page "zones of intervention": periphery communes.
pub const ZONES_PERIPHERY: Rotation = Rotation::new(6).zero_based().truncating();
pub const ZONES_PERIPHERY_LIMIT: usize = 6;

/// Items sorted by ascending priority. The sort is stable, so ties keep
/// their table order.
#[must_use]
pub fn by_priority<'a, T: Entity>(items: impl IntoIterator<Item = &'a T>) -> Vec<&'a T> {
    let mut sorted: Vec<&T> = items.into_iter().collect();
    sorted.sort_by_key(|item| item.priority());
    sorted
}

/// The first `limit` items by priority; used where no current entity
/// exists (homepage, footer).
#[must_use]
pub fn top_n<'a, T: Entity>(items: impl IntoIterator<Item = &'a T>, limit: usize) -> Vec<&'a T> {
    let mut sorted = by_priority(items);
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[derive(Debug, PartialEq)]
    struct Item {
        id: i64,
        name: &'static str,
        priority: i64,
    }

    impl Entity for Item {
        fn id(&self) -> i64 {
            self.id
        }
        fn slug(&self) -> &str {
            self.name
        }
        fn name(&self) -> &str {
            self.name
        }
        fn priority(&self) -> i64 {
            self.priority
        }
        fn url_key(&self) -> String {
            self.name.to_uppercase()
        }
    }

    fn item(id: i64, name: &'static str, priority: i64) -> Item {
        Item { id, name, priority }
    }

    fn names(items: &[&Item]) -> Vec<&'static str> {
        items.iter().map(|i| i.name).collect()
    }

    #[test]
    fn wrap_around_examples() {
        let items = [item(1, "a", 1), item(2, "b", 2), item(3, "c", 3)];
        let sorted = by_priority(&items);
        let rot = Rotation::new(5);
        assert_eq!(names(&rot.select(&sorted, 1, 2)), vec!["a", "b"]);
        assert_eq!(names(&rot.select(&sorted, 2, 2)), vec!["c", "a"]);
    }

    #[test]
    fn wrap_repeats_when_limit_exceeds_len() {
        let items = [item(1, "a", 1), item(2, "b", 2)];
        let sorted = by_priority(&items);
        let picked = Rotation::new(7).select(&sorted, 2, 5);
        assert_eq!(names(&picked), vec!["b", "a", "b", "a", "b"]);
        let truncated = Rotation::new(7).truncating().select(&sorted, 2, 5);
        assert_eq!(names(&truncated), vec!["b", "a"]);
    }

    #[test]
    fn selection_is_deterministic() {
        let items: Vec<Item> = (1..=11).map(|i| item(i, "x", 12 - i)).collect();
        let sorted = by_priority(&items);
        for seed in 1..=11 {
            let a = COMMUNE_SERVICE_CARDS.select(&sorted, seed, 6);
            let b = COMMUNE_SERVICE_CARDS.select(&sorted, seed, 6);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn coprime_multiplier_covers_every_item() {
        let items: Vec<Item> = (1..=9).map(|i| item(i, "x", i)).collect();
        let sorted = by_priority(&items);
        let n = i64::try_from(items.len()).expect("len");
        for multiplier in [2, 4, 5, 7] {
            let rot = Rotation::new(multiplier);
            let covered: BTreeSet<i64> = (1..=n)
                .flat_map(|seed| rot.select(&sorted, seed, 2))
                .map(|i| i.id)
                .collect();
            assert_eq!(covered.len(), items.len(), "multiplier {multiplier}");
        }
    }

    #[test]
    fn priority_sort_is_stable() {
        let items = [item(1, "a", 5), item(2, "b", 1), item(3, "c", 5), item(4, "d", 1)];
        assert_eq!(names(&by_priority(&items)), vec!["b", "d", "a", "c"]);
        assert_eq!(names(&top_n(&items, 3)), vec!["b", "d", "a"]);
    }

    #[test]
    fn zero_based_start() {
        assert_eq!(SERVICE_SIDEBAR_SAME_CATEGORY.start(2, 4), 2);
        assert_eq!(COMMUNE_SIDEBAR_SERVICES.start(1, 4), 0);
        assert_eq!(COMMUNE_SIDEBAR_SERVICES.start(0, 4), 3);
    }

    #[test]
    fn empty_input_selects_nothing() {
        let empty: Vec<&Item> = Vec::new();
        assert!(Rotation::new(3).select(&empty, 4, 3).is_empty());
    }
}
