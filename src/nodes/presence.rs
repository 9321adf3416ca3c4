const WORD_BITS: usize = u64::BITS as usize;

/// Fixed-size bitset recording which terminal octets were seen under one
/// `(o0, o1, o2)` prefix.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct PresenceSet {
    bits: usize,
    words: Box<[u64]>,
}

impl PresenceSet {
    pub(crate) fn new(bits: usize) -> Self {
        let words = vec![0u64; bits.div_ceil(WORD_BITS)].into_boxed_slice();
        Self { bits, words }
    }

    #[inline]
    fn locate(&self, index: usize) -> (usize, u64) {
        assert!(
            index < self.bits,
            "presence index {index} out of range for {} bits",
            self.bits
        );
        (index / WORD_BITS, 1u64 << (index % WORD_BITS))
    }

    /// Sets bit `index`, returns true if it was clear before.
    #[inline]
    pub(crate) fn set(&mut self, index: usize) -> bool {
        let (idx, mask) = self.locate(index);
        let word = &mut self.words[idx];
        let fresh = *word & mask == 0;
        *word |= mask;
        fresh
    }

    #[inline]
    pub(crate) fn contains(&self, index: usize) -> bool {
        let (idx, mask) = self.locate(index);
        self.words[idx] & mask != 0
    }

    #[inline]
    pub(crate) fn count_ones(&self) -> u64 {
        self.words.iter().map(|w| u64::from(w.count_ones())).sum()
    }

    /// Heap bytes held by the word array.
    pub(crate) fn memory_bytes(&self) -> usize {
        std::mem::size_of_val(&*self.words)
    }

    pub(crate) fn iter(&self) -> PresenceIter<'_> {
        PresenceIter {
            set: self,
            word_idx: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }
}

impl std::fmt::Debug for PresenceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

pub(crate) struct PresenceIter<'a> {
    set: &'a PresenceSet,
    word_idx: usize,
    current: u64,
}

impl Iterator for PresenceIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.word_idx * WORD_BITS + bit);
            }

            self.word_idx += 1;
            if self.word_idx >= self.set.words.len() {
                return None;
            }
            self.current = self.set.words[self.word_idx];
        }
    }
}
