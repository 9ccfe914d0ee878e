use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, Copy)]
struct Count {
    plays: usize,
    first_seen: usize,
}

/// Play counts per group key, remembering the order keys first appeared.
///
/// Ranking is by descending play count; equal counts keep first-seen order.
#[derive(Debug, Clone)]
pub struct PlayTally<K> {
    counts: HashMap<K, Count>,
}

impl<K> Default for PlayTally<K> {
    fn default() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> PlayTally<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: K) {
        let order = self.counts.len();
        self.counts
            .entry(key)
            .or_insert(Count {
                plays: 0,
                first_seen: order,
            })
            .plays += 1;
    }

    /// All keys with their play counts, best first
    pub fn ranked(&self) -> Vec<(K, usize)> {
        let mut entries: Vec<(&K, &Count)> = self.counts.iter().collect();
        entries.sort_by(|(_, a), (_, b)| {
            b.plays
                .cmp(&a.plays)
                .then_with(|| a.first_seen.cmp(&b.first_seen))
        });
        entries
            .into_iter()
            .map(|(key, count)| (key.clone(), count.plays))
            .collect()
    }

    /// The single best key, if anything was recorded
    pub fn leader(&self) -> Option<(K, usize)> {
        self.counts
            .iter()
            .min_by(|(_, a), (_, b)| {
                b.plays
                    .cmp(&a.plays)
                    .then_with(|| a.first_seen.cmp(&b.first_seen))
            })
            .map(|(key, count)| (key.clone(), count.plays))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranked_orders_ties_by_first_seen() {
        let mut tally = PlayTally::new();
        for key in ["c", "b", "a", "b", "a", "d"] {
            tally.record(key);
        }

        assert_eq!(tally.ranked(), vec![("b", 2), ("a", 2), ("c", 1), ("d", 1)]);
        assert_eq!(tally.leader(), Some(("b", 2)));
    }

    #[test]
    fn test_empty_tally() {
        let tally: PlayTally<&str> = PlayTally::new();
        assert!(tally.ranked().is_empty());
        assert_eq!(tally.leader(), None);
    }
}
