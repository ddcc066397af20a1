//! HeightIndex - O(log n) prefix sums and lower_bound via Fenwick tree
//!
//! Stacked item heights for the scroll strategy: where item `i` starts, which
//! item covers a given vertical offset, and how tall the whole strip is.
//!
//! # Complexity
//!
//! - `set`: O(log n)
//! - `prefix_sum` / `top`: O(log n)
//! - `lower_bound`: O(log² n)
//! - `push`: amortized O(log n)
//! - `total`: O(log n)

/// Fenwick tree over item heights in whole pixels.
///
/// Keeps the plain heights alongside the tree so growth can rebuild the tree
/// and `set` can compute deltas without two prefix queries.
#[derive(Debug, Clone, Default)]
pub struct HeightIndex {
    /// Fenwick tree backing storage (0-indexed API over the `fenwick` crate).
    tree: Vec<isize>,
    /// Height of each entry.
    heights: Vec<usize>,
}

impl HeightIndex {
    /// Creates an empty index with room for `capacity` entries.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gallery_engine::layout::height_index::HeightIndex;
    /// let index = HeightIndex::new(100);
    /// assert_eq!(index.len(), 0);
    /// assert_eq!(index.total(), 0);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            tree: vec![0; capacity],
            heights: Vec::with_capacity(capacity),
        }
    }

    /// Builds an index from a sequence of heights.
    pub fn from_heights(heights: impl IntoIterator<Item = usize>) -> Self {
        let heights: Vec<usize> = heights.into_iter().collect();
        let mut index = Self {
            tree: Vec::new(),
            heights,
        };
        index.rebuild(index.heights.len());
        index
    }

    /// Sets the height at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gallery_engine::layout::height_index::HeightIndex;
    /// let mut index = HeightIndex::new(10);
    /// index.push(5);
    /// index.set(0, 10);
    /// assert_eq!(index.prefix_sum(0), 10);
    /// ```
    pub fn set(&mut self, index: usize, height: usize) {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );

        let delta = height as isize - self.heights[index] as isize;
        if delta != 0 {
            self.heights[index] = height;
            fenwick::array::update(&mut self.tree, index, delta);
        }
    }

    /// Height of a single entry.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn height(&self, index: usize) -> usize {
        self.heights[index]
    }

    /// Cumulative height up to and including `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gallery_engine::layout::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([3, 4, 5]);
    /// assert_eq!(index.prefix_sum(0), 3);
    /// assert_eq!(index.prefix_sum(1), 7);
    /// assert_eq!(index.prefix_sum(2), 12);
    /// ```
    pub fn prefix_sum(&self, index: usize) -> usize {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );

        let sum = fenwick::array::prefix_sum(&self.tree, index);
        sum.max(0) as usize
    }

    /// Offset at which entry `index` starts.
    pub fn top(&self, index: usize) -> usize {
        if index == 0 {
            0
        } else {
            self.prefix_sum(index - 1)
        }
    }

    /// First index whose range `[top(i), top(i) + height(i))` contains `value`.
    ///
    /// Returns `None` when `value >= total()` or the index is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gallery_engine::layout::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([10, 20, 15]);
    /// assert_eq!(index.lower_bound(0), Some(0));
    /// assert_eq!(index.lower_bound(10), Some(1));
    /// assert_eq!(index.lower_bound(30), Some(2));
    /// assert_eq!(index.lower_bound(45), None);
    /// ```
    pub fn lower_bound(&self, value: usize) -> Option<usize> {
        if self.is_empty() {
            return None;
        }

        let mut left = 0;
        let mut right = self.len();

        while left < right {
            let mid = left + (right - left) / 2;
            if self.prefix_sum(mid) > value {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        (left < self.len()).then_some(left)
    }

    /// Total height of all entries.
    pub fn total(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.prefix_sum(self.len() - 1)
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// True when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Appends an entry.
    ///
    /// Growing the backing tree rebuilds it: Fenwick nodes past the old end
    /// cover ranges that include existing entries.
    pub fn push(&mut self, height: usize) {
        let idx = self.heights.len();
        self.heights.push(height);
        if idx >= self.tree.len() {
            self.rebuild((self.tree.len().max(1) * 2).max(self.heights.len()));
        } else {
            fenwick::array::update(&mut self.tree, idx, height as isize);
        }
    }

    /// Removes every entry, keeping the allocation.
    pub fn clear(&mut self) {
        self.heights.clear();
        self.tree.fill(0);
    }

    fn rebuild(&mut self, capacity: usize) {
        self.tree.clear();
        self.tree.resize(capacity, 0);
        for (idx, &height) in self.heights.iter().enumerate() {
            fenwick::array::update(&mut self.tree, idx, height as isize);
        }
    }
}
