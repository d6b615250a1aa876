//! Randomised selection helpers. All randomness comes from the caller's `Rng`, so a
//! seeded generator makes every draw reproducible.

use rand::{seq::SliceRandom, Rng};

use crate::types::preferences::{INTEREST_OPTIONS, OTHER};

const SURPRISE_MIN: usize = 2;
const SURPRISE_MAX: usize = 4;

/// Shuffle-and-slice: up to `count` distinct items in random order.
pub fn pick_distinct<'a, T, R>(items: &'a [T], count: usize, rng: &mut R) -> Vec<&'a T>
where
    R: Rng + ?Sized,
{
    let mut picked: Vec<&T> = items.iter().collect();
    picked.shuffle(rng);
    picked.truncate(count);
    picked
}

/// Up to `count` distinct items, at least one of which satisfies `is_mandatory`.
///
/// When nothing satisfies `is_mandatory` (or `count` is zero) this is [`pick_distinct`].
pub fn pick_with_mandatory<'a, T, R, F>(
    items: &'a [T],
    count: usize,
    is_mandatory: F,
    rng: &mut R,
) -> Vec<&'a T>
where
    R: Rng + ?Sized,
    F: Fn(&T) -> bool,
{
    let mandatory: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| is_mandatory(item))
        .map(|(idx, _)| idx)
        .collect();

    let Some(&anchor) = mandatory.choose(rng).filter(|_| count > 0) else {
        return pick_distinct(items, count, rng);
    };

    let mut rest: Vec<&T> = items
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != anchor)
        .map(|(_, item)| item)
        .collect();
    rest.shuffle(rng);
    rest.truncate(count - 1);

    let position = rng.gen_range(0..=rest.len());
    rest.insert(position, &items[anchor]);
    rest
}

/// "Surprise me": two to four distinct interests, never "Other".
pub fn surprise_interests<R: Rng + ?Sized>(rng: &mut R) -> Vec<&'static str> {
    let candidates: Vec<&'static str> = INTEREST_OPTIONS
        .iter()
        .copied()
        .filter(|interest| *interest != OTHER)
        .collect();
    let count = rng.gen_range(SURPRISE_MIN..=SURPRISE_MAX);

    pick_distinct(&candidates, count, rng)
        .into_iter()
        .copied()
        .collect()
}
