//! Fixed-capacity entity pools.
//!
//! Every pool is an array of `N` optional slots. Spawning takes the first
//! empty slot; when none is free the request is dropped and the pool is left
//! untouched. Slots carry no ordering guarantee.

#[derive(Debug, Clone, PartialEq)]
pub struct Pool<T, const N: usize> {
    slots: [Option<T>; N],
}

impl<T, const N: usize> Default for Pool<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Pool<T, N> {
    pub const fn new() -> Self {
        Self {
            slots: [const { None }; N],
        }
    }

    /// Place `item` in the first free slot.
    ///
    /// Returns the slot index, or `None` (and drops `item`) when the pool is full.
    pub fn spawn(&mut self, item: T) -> Option<usize> {
        let index = self.slots.iter().position(Option::is_none)?;
        self.slots[index] = Some(item);
        Some(index)
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Deactivate a slot, returning what it held.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().flatten()
    }

    /// Raw slot view, including inactive slots.
    pub fn slots(&self) -> &[Option<T>; N] {
        &self.slots
    }

    /// Keep only the active entries for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&mut T) -> bool) {
        for slot in &mut self.slots {
            if let Some(item) = slot
                && !keep(item)
            {
                *slot = None;
            }
        }
    }

    pub fn active_count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_takes_first_free_slot() {
        let mut pool: Pool<u8, 3> = Pool::new();
        assert_eq!(pool.spawn(1), Some(0));
        assert_eq!(pool.spawn(2), Some(1));
        pool.remove(0);
        assert_eq!(pool.spawn(3), Some(0));
        assert_eq!(pool.get(0), Some(&3));
    }

    #[test]
    fn spawn_into_full_pool_is_a_no_op() {
        let mut pool: Pool<u8, 2> = Pool::new();
        pool.spawn(10);
        pool.spawn(20);
        let before = pool.clone();

        assert_eq!(pool.spawn(30), None);
        assert_eq!(pool, before);
        assert!(pool.is_full());
    }

    #[test]
    fn retain_deactivates_rejected_entries() {
        let mut pool: Pool<i32, 4> = Pool::new();
        for v in [1, -2, 3, -4] {
            pool.spawn(v);
        }
        pool.retain(|v| *v > 0);
        assert_eq!(pool.active_count(), 2);
        assert!(pool.iter().all(|v| *v > 0));
    }

    #[test]
    fn clear_empties_without_changing_capacity() {
        let mut pool: Pool<u8, 5> = Pool::new();
        pool.spawn(1);
        pool.clear();
        assert!(pool.is_empty());
        assert_eq!(pool.capacity(), 5);
    }
}
