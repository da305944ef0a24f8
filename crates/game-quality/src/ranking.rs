//! "Best so far" selection shared by per-game and cross-game tracking.
//!
//! Holders are whole records. A challenger replaces the holder only when it
//! ranks strictly better, so exact ties keep the earliest record seen.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    Highest,
    Lowest,
}

impl Rank {
    /// Whether `challenger` strictly beats `holder` under this ordering.
    pub fn beats<K: PartialOrd>(self, challenger: &K, holder: &K) -> bool {
        match self {
            Rank::Highest => challenger > holder,
            Rank::Lowest => challenger < holder,
        }
    }
}

/// A single-winner slot. Empty until the first challenger arrives.
#[derive(Debug, Clone)]
pub struct Leader<T> {
    rank: Rank,
    holder: Option<T>,
}

impl<T> Leader<T> {
    pub fn new(rank: Rank) -> Self {
        Self { rank, holder: None }
    }

    pub fn highest() -> Self {
        Self::new(Rank::Highest)
    }

    pub fn lowest() -> Self {
        Self::new(Rank::Lowest)
    }

    /// Offer a challenger; `key` extracts the ranked metric.
    pub fn offer<K: PartialOrd>(&mut self, challenger: T, key: impl Fn(&T) -> K) {
        let replace = match &self.holder {
            None => true,
            Some(holder) => self.rank.beats(&key(&challenger), &key(holder)),
        };
        if replace {
            self.holder = Some(challenger);
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.holder.as_ref()
    }

    pub fn into_inner(self) -> Option<T> {
        self.holder
    }
}
