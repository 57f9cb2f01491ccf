use anchor_lang::prelude::*;

use crate::constants::{SORTITION_CAPACITY, SORTITION_NODE_COUNT};
use crate::errors::PrizePoolError;

/// Balance-weighted draw over ticket holders.
///
/// A complete binary tree laid out heap-style in a flat array: the root is
/// `nodes[1]`, node `i` has children `2i` and `2i + 1`, and leaf `slot` lives
/// at `nodes[SORTITION_CAPACITY + slot]`. Every internal node holds the sum of
/// its subtree, so both updates and draws walk a single root-to-leaf path.
///
/// Slots are handed out on a holder's first ticket and returned to `vacant`
/// when the balance drops to zero. Too large for CPI allocation; the account
/// is created client-side and claimed with `#[account(zero)]`.
#[account(zero_copy)]
pub struct SortitionTree {
    /// Associated prize strategy
    pub prize_strategy: Pubkey,

    /// High-water mark of slots ever handed out
    pub leaf_count: u32,

    /// Number of entries on the `vacant` stack
    pub vacant_count: u32,

    pub nodes: [u64; SORTITION_NODE_COUNT],

    pub owners: [Pubkey; SORTITION_CAPACITY],

    pub vacant: [u32; SORTITION_CAPACITY],
}

impl SortitionTree {
    pub const LEN: usize = 8 + std::mem::size_of::<SortitionTree>();

    pub fn total(&self) -> u64 {
        self.nodes[1]
    }

    pub fn weight_of(&self, slot: Option<u32>) -> u64 {
        slot.map_or(0, |slot| self.nodes[SORTITION_CAPACITY + slot as usize])
    }

    /// Sets `owner`'s weight and returns the slot it now occupies.
    pub fn set(&mut self, slot: Option<u32>, owner: Pubkey, weight: u64) -> Result<Option<u32>> {
        match (slot, weight) {
            (None, 0) => Ok(None),
            (Some(slot), 0) => {
                self.write_leaf(slot, 0)?;
                self.owners[slot as usize] = Pubkey::default();
                self.vacant[self.vacant_count as usize] = slot;
                self.vacant_count += 1;
                Ok(None)
            }
            (Some(slot), weight) => {
                self.write_leaf(slot, weight)?;
                Ok(Some(slot))
            }
            (None, weight) => {
                let slot = self.allocate()?;
                self.owners[slot as usize] = owner;
                self.write_leaf(slot, weight)?;
                Ok(Some(slot))
            }
        }
    }

    /// Picks the owner of the leaf whose cumulative range contains `value`.
    pub fn draw(&self, value: u64) -> Option<Pubkey> {
        if value >= self.total() {
            return None;
        }

        let mut index = 1usize;
        let mut remaining = value;
        while index < SORTITION_CAPACITY {
            let left = index * 2;
            if remaining < self.nodes[left] {
                index = left;
            } else {
                remaining -= self.nodes[left];
                index = left + 1;
            }
        }

        Some(self.owners[index - SORTITION_CAPACITY])
    }

    fn allocate(&mut self) -> Result<u32> {
        if self.vacant_count > 0 {
            self.vacant_count -= 1;
            return Ok(self.vacant[self.vacant_count as usize]);
        }
        require!(
            (self.leaf_count as usize) < SORTITION_CAPACITY,
            PrizePoolError::SortitionTreeFull
        );
        let slot = self.leaf_count;
        self.leaf_count += 1;
        Ok(slot)
    }

    fn write_leaf(&mut self, slot: u32, weight: u64) -> Result<()> {
        let mut index = SORTITION_CAPACITY + slot as usize;
        self.nodes[index] = weight;
        index /= 2;
        while index >= 1 {
            self.nodes[index] = self.nodes[index * 2]
                .checked_add(self.nodes[index * 2 + 1])
                .ok_or(PrizePoolError::MathOverflow)?;
            index /= 2;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::Zeroable;

    fn empty_tree() -> Box<SortitionTree> {
        Box::new(SortitionTree::zeroed())
    }

    #[test]
    fn test_single_holder_always_wins() {
        let mut tree = empty_tree();
        let alice = Pubkey::new_unique();
        let slot = tree.set(None, alice, 100).unwrap();

        assert_eq!(slot, Some(0));
        assert_eq!(tree.total(), 100);
        for value in [0, 1, 50, 99] {
            assert_eq!(tree.draw(value), Some(alice));
        }
        assert_eq!(tree.draw(100), None);
    }

    #[test]
    fn test_draw_partitions_by_weight() {
        let mut tree = empty_tree();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();
        let carol = Pubkey::new_unique();
        tree.set(None, alice, 10).unwrap();
        tree.set(None, bob, 5).unwrap();
        tree.set(None, carol, 25).unwrap();

        assert_eq!(tree.total(), 40);
        assert_eq!(tree.draw(0), Some(alice));
        assert_eq!(tree.draw(9), Some(alice));
        assert_eq!(tree.draw(10), Some(bob));
        assert_eq!(tree.draw(14), Some(bob));
        assert_eq!(tree.draw(15), Some(carol));
        assert_eq!(tree.draw(39), Some(carol));
    }

    #[test]
    fn test_updates_adjust_ancestor_sums() {
        let mut tree = empty_tree();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();
        let a = tree.set(None, alice, 10).unwrap();
        let b = tree.set(None, bob, 10).unwrap();

        tree.set(a, alice, 30).unwrap();
        assert_eq!(tree.total(), 40);
        assert_eq!(tree.weight_of(a), 30);
        assert_eq!(tree.weight_of(b), 10);
        assert_eq!(tree.draw(29), Some(alice));
        assert_eq!(tree.draw(30), Some(bob));
    }

    #[test]
    fn test_empty_tree_draws_no_one() {
        let tree = empty_tree();
        assert_eq!(tree.total(), 0);
        assert_eq!(tree.draw(0), None);
        assert_eq!(tree.weight_of(None), 0);
    }

    #[test]
    fn test_vacated_slots_are_reused() {
        let mut tree = empty_tree();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();
        let a = tree.set(None, alice, 10).unwrap();

        assert_eq!(tree.set(a, alice, 0).unwrap(), None);
        assert_eq!(tree.total(), 0);
        assert_eq!(tree.vacant_count, 1);

        let b = tree.set(None, bob, 7).unwrap();
        assert_eq!(b, a);
        assert_eq!(tree.vacant_count, 0);
        assert_eq!(tree.leaf_count, 1);
        assert_eq!(tree.draw(3), Some(bob));
    }

    #[test]
    fn test_full_tree_rejects_new_holders() {
        let mut tree = empty_tree();
        for _ in 0..SORTITION_CAPACITY {
            tree.set(None, Pubkey::new_unique(), 1).unwrap();
        }
        assert_eq!(tree.total(), SORTITION_CAPACITY as u64);
        assert!(tree.set(None, Pubkey::new_unique(), 1).is_err());

        let last = Some(SORTITION_CAPACITY as u32 - 1);
        assert_eq!(tree.draw(SORTITION_CAPACITY as u64 - 1), Some(tree.owners[SORTITION_CAPACITY - 1]));
        tree.set(last, Pubkey::default(), 0).unwrap();
        assert!(tree.set(None, Pubkey::new_unique(), 1).is_ok());
    }
}
