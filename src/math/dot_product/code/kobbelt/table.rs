//! Bucket table with merge-on-insert.
//!
//! The table is an arena with one slot per possible genus id plus an
//! occupancy bitmap, so ordered traversal is a bit scan. Zero never lives in
//! a slot.
//!
//! Invariant between insertions: at most one value per genus, and paired
//! genus slots never hold values of differing sign.
//!
//! Values that overflow (or arrive non-finite) never get a genus. They are
//! kept in a plain side sum that joins the result in [`BucketTable::reduce`].

use super::genus::Genus;
use crate::float::ExactFloat;

/// Outcome of probing the table for a pending value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Collision {
    /// The genus slot is taken; the sum is exact.
    SameGenus(Genus),
    /// The paired slot holds the opposite sign; the difference is exact.
    OppositePair(Genus),
    /// Nothing in the way.
    Vacant,
}

pub struct BucketTable<F: ExactFloat> {
    slots: Box<[F]>,
    occupancy: Box<[u64]>,
    len: usize,
    overflow: F,
}

impl<F: ExactFloat> BucketTable<F> {
    pub fn new() -> Self {
        Self {
            slots: vec![F::zero(); F::GENUS_SLOTS].into_boxed_slice(),
            occupancy: vec![0u64; F::GENUS_SLOTS.div_ceil(64)].into_boxed_slice(),
            len: 0,
            overflow: F::zero(),
        }
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Sum of the non-finite values kept out of the genus slots.
    pub fn overflow(&self) -> F {
        self.overflow
    }

    pub fn get(&self, genus: Genus) -> Option<F> {
        let value = self.slots[genus.index()];
        (value != F::zero()).then_some(value)
    }

    /// Remove and return the value stored at `genus`.
    pub fn take(&mut self, genus: Genus) -> Option<F> {
        let index = genus.index();
        let value = std::mem::replace(&mut self.slots[index], F::zero());
        if value == F::zero() {
            return None;
        }
        self.occupancy[index / 64] &= !(1u64 << (index % 64));
        self.len -= 1;
        Some(value)
    }

    fn put(&mut self, genus: Genus, value: F) {
        let index = genus.index();
        debug_assert!(self.slots[index] == F::zero(), "slot {index} already occupied");
        self.slots[index] = value;
        self.occupancy[index / 64] |= 1u64 << (index % 64);
        self.len += 1;
    }

    fn probe(&self, genus: Genus, value: F) -> Collision {
        if self.get(genus).is_some() {
            return Collision::SameGenus(genus);
        }
        let pair = genus.paired();
        match self.get(pair) {
            Some(other) if other.is_sign_negative() != value.is_sign_negative() => {
                Collision::OppositePair(pair)
            }
            _ => Collision::Vacant,
        }
    }

    /// Merge `value` into the table.
    ///
    /// Collisions are folded into a pending value until it finds a vacant
    /// slot or cancels to zero. Returns the genus the value settled in.
    pub fn insert(&mut self, value: F) -> Option<Genus> {
        let mut pending = value;
        loop {
            if pending == F::zero() {
                return None;
            }
            if !pending.is_finite() {
                self.overflow = self.overflow + pending;
                return None;
            }
            let genus = Genus::of(pending);
            match self.probe(genus, pending) {
                Collision::SameGenus(slot) | Collision::OppositePair(slot) => {
                    // Both arms are exact by the genus construction.
                    if let Some(existing) = self.take(slot) {
                        pending = pending + existing;
                    }
                }
                Collision::Vacant => {
                    self.put(genus, pending);
                    return Some(genus);
                }
            }
        }
    }

    /// Highest occupied genus strictly below `limit` (an arena index bound).
    fn highest_below_index(&self, limit: usize) -> Option<Genus> {
        let limit = limit.min(self.slots.len());
        if limit == 0 {
            return None;
        }
        let last = limit - 1;
        let mut word = last / 64;
        let bit = last % 64;
        let mut mask = if bit == 63 {
            u64::MAX
        } else {
            (1u64 << (bit + 1)) - 1
        };
        loop {
            let bits = self.occupancy[word] & mask;
            if bits != 0 {
                let top = 63 - bits.leading_zeros() as usize;
                return Some(Genus::from_index(word * 64 + top));
            }
            if word == 0 {
                return None;
            }
            word -= 1;
            mask = u64::MAX;
        }
    }

    /// Lowest occupied genus at or above `start` (an arena index).
    fn lowest_from_index(&self, start: usize) -> Option<Genus> {
        if start >= self.slots.len() {
            return None;
        }
        let mut word = start / 64;
        let mut mask = u64::MAX << (start % 64);
        loop {
            let bits = self.occupancy[word] & mask;
            if bits != 0 {
                return Some(Genus::from_index(word * 64 + bits.trailing_zeros() as usize));
            }
            word += 1;
            if word == self.occupancy.len() {
                return None;
            }
            mask = u64::MAX;
        }
    }

    /// Highest occupied genus.
    pub fn highest(&self) -> Option<Genus> {
        self.highest_below_index(self.slots.len())
    }

    /// Next occupied genus below `genus`.
    pub fn next_below(&self, genus: Genus) -> Option<Genus> {
        self.highest_below_index(genus.index())
    }

    /// Next occupied genus above `genus`.
    pub fn next_above(&self, genus: Genus) -> Option<Genus> {
        self.lowest_from_index(genus.index() + 1)
    }

    /// Occupied entries in ascending genus order.
    pub fn entries(&self) -> impl Iterator<Item = (Genus, F)> + '_ {
        self.occupancy
            .iter()
            .enumerate()
            .flat_map(|(word, &bits)| {
                (0..64)
                    .filter(move |bit| bits & (1u64 << bit) != 0)
                    .map(move |bit| word * 64 + bit)
            })
            .map(|index| (Genus::from_index(index), self.slots[index]))
    }

    /// Plain floating sum of the stored values in ascending genus order,
    /// plus the overflow sum.
    pub fn reduce(&self) -> F {
        self.entries()
            .fold(F::zero(), |total, (_, value)| total + value)
            + self.overflow
    }

    /// Check the merge invariant, describing the first violation found.
    pub fn check_invariant(&self) -> Result<(), String> {
        let mut counted = 0;
        for (genus, value) in self.entries() {
            counted += 1;
            if Genus::of(value) != genus {
                return Err(format!("value {value:e} stored under genus {}", genus.id()));
            }
            if let Some(other) = self.get(genus.paired()) {
                if other.is_sign_negative() != value.is_sign_negative() {
                    return Err(format!(
                        "paired genus {} / {} hold opposite signs ({value:e}, {other:e})",
                        genus.id(),
                        genus.paired().id()
                    ));
                }
            }
        }
        if counted != self.len {
            return Err(format!("len {} but {} occupied slots", self.len, counted));
        }
        Ok(())
    }
}

impl<F: ExactFloat> Default for BucketTable<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_insert_into_empty() {
        let mut table = BucketTable::<f64>::new();
        let genus = table.insert(3.0).unwrap();
        assert_eq!(genus, Genus::of(3.0f64));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(genus), Some(3.0));
    }

    #[test]
    fn test_zero_is_not_stored() {
        let mut table = BucketTable::<f32>::new();
        assert_eq!(table.insert(0.0), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_same_genus_merges() {
        let mut table = BucketTable::<f64>::new();
        table.insert(1.0);
        table.insert(1.0);
        // 1 + 1 = 2 lands one class higher
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(Genus::of(2.0f64)), Some(2.0));
        assert_eq!(table.get(Genus::of(1.0f64)), None);
    }

    #[test]
    fn test_exact_cancellation_empties_table() {
        let mut table = BucketTable::<f64>::new();
        table.insert(1e16);
        assert_eq!(table.insert(-1e16), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_opposite_pair_merges() {
        let mut table = BucketTable::<f64>::new();
        let odd = f64::from_bits(1.0f64.to_bits() | 1);
        table.insert(odd);
        table.insert(-1.0);
        assert_eq!(table.len(), 1);
        assert_eq!(table.reduce(), f64::EPSILON);
        table.check_invariant().unwrap();
    }

    #[test]
    fn test_same_sign_pair_coexists() {
        let mut table = BucketTable::<f64>::new();
        let odd = f64::from_bits(1.0f64.to_bits() | 1);
        table.insert(odd);
        table.insert(1.0);
        assert_eq!(table.len(), 2);
        table.check_invariant().unwrap();
    }

    #[test]
    fn test_cascading_merge() {
        let mut table = BucketTable::<f64>::new();
        table.insert(2.0);
        table.insert(1.0);
        table.insert(1.0);
        // 1 + 1 = 2 collides with 2, giving 4
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(Genus::of(4.0f64)), Some(4.0));
    }

    #[test]
    fn test_traversal_order() {
        let mut table = BucketTable::<f64>::new();
        for v in [8.0, -0.25, 1e-300, 3e200, 5.0] {
            table.insert(v);
        }
        let genera: Vec<_> = table.entries().map(|(g, _)| g).collect();
        let mut sorted = genera.clone();
        sorted.sort();
        assert_eq!(genera, sorted);

        let top = table.highest().unwrap();
        assert_eq!(table.get(top), Some(3e200));
        let below = table.next_below(top).unwrap();
        assert_eq!(table.get(below), Some(8.0));
        let bottom = table.entries().next().unwrap().0;
        assert_eq!(table.next_below(bottom), None);
        assert_eq!(table.next_above(top), None);
        assert_eq!(table.next_above(below), Some(top));
        let second = table.next_above(bottom).unwrap();
        assert_eq!(table.get(second), Some(-0.25));
    }

    #[test]
    fn test_overflowing_merge_leaves_slots() {
        let mut table = BucketTable::<f64>::new();
        table.insert(f64::MAX);
        assert_eq!(table.insert(f64::MAX), None);
        assert!(table.is_empty());
        assert_eq!(table.overflow(), f64::INFINITY);
        assert_eq!(table.reduce(), f64::INFINITY);
        table.check_invariant().unwrap();

        table.insert(3.0);
        assert_eq!(table.len(), 1);
        assert_eq!(table.reduce(), f64::INFINITY);
    }

    #[test]
    fn test_non_finite_values_are_summed_aside() {
        let mut table = BucketTable::<f32>::new();
        assert_eq!(table.insert(f32::NEG_INFINITY), None);
        table.insert(2.0);
        assert_eq!(table.len(), 1);
        assert_eq!(table.reduce(), f32::NEG_INFINITY);

        table.insert(f32::INFINITY);
        assert!(table.reduce().is_nan());
    }

    #[test]
    fn test_take() {
        let mut table = BucketTable::<f32>::new();
        let genus = table.insert(-6.0).unwrap();
        assert_eq!(table.take(genus), Some(-6.0));
        assert_eq!(table.take(genus), None);
        assert!(table.is_empty());
        assert_eq!(table.highest(), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn invariant_holds_after_every_insert(
            values in prop::collection::vec(
                prop_oneof![-1e6f64..1e6f64, -1e-3f64..1e-3f64, -1e18f64..1e18f64],
                1..200,
            )
        ) {
            let mut table = BucketTable::<f64>::new();
            for &v in &values {
                table.insert(v);
                prop_assert!(table.check_invariant().is_ok(), "{:?}", table.check_invariant());
            }
        }

        #[test]
        fn insertion_preserves_integer_sums(
            values in prop::collection::vec(-(1i64 << 40)..(1i64 << 40), 1..300)
        ) {
            // Every partial sum stays below 2^53, so the stored values must add
            // back up to the integer total without rounding.
            let mut table = BucketTable::<f64>::new();
            for &v in &values {
                table.insert(v as f64);
            }
            let expected: i64 = values.iter().sum();
            let total: i128 = table.entries().map(|(_, v)| v as i128).sum();
            prop_assert_eq!(total, expected as i128);
        }
    }
}
