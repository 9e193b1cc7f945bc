//! Set-field bookkeeping.

/// Tracks which schema positions were explicitly assigned on a record.
///
/// Positions index into the model's [`Schema`](crate::schema::Schema), so the
/// tracker can never name a field the model does not declare.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetFieldTracker {
    words: Vec<u64>,
}

impl SetFieldTracker {
    /// Create a tracker sized for `len` fields.
    pub fn with_len(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
        }
    }

    /// Mark a position as set.
    pub fn insert(&mut self, pos: usize) {
        let (word, bit) = (pos / 64, pos % 64);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1u64 << bit;
    }

    /// Unmark a position.
    pub fn remove(&mut self, pos: usize) {
        if let Some(word) = self.words.get_mut(pos / 64) {
            *word &= !(1u64 << (pos % 64));
        }
    }

    /// Check whether a position is set.
    pub fn contains(&self, pos: usize) -> bool {
        self.words
            .get(pos / 64)
            .is_some_and(|word| word & (1u64 << (pos % 64)) != 0)
    }

    /// Set positions in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            (0..64)
                .filter(move |&bit| word & (1u64 << bit) != 0)
                .map(move |bit| i * 64 + bit)
        })
    }

    /// Number of set positions.
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Whether nothing is set.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }
}
