use std::collections::HashMap;

use log::warn;

/// Occurrence count for every distinct symbol of a text
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<char, u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self { counts: HashMap::new() }
    }

    /// Count every symbol of `text` in a single pass
    pub fn from_text(text: &str) -> Self {
        let mut table = Self::new();
        table.count_text(text);
        table
    }

    /// Count `text` on up to `num_threads` scoped worker threads.
    ///
    /// The text is split at char boundaries and each chunk is counted
    /// independently; counts are associative so the merged table is identical
    /// to a single pass. Falls back to a single pass if a worker panics.
    pub fn from_text_parallel(text: &str, num_threads: usize) -> Self {
        if num_threads <= 1 || text.len() < num_threads {
            return Self::from_text(text);
        }

        let chunks = split_at_char_boundaries(text, num_threads);

        let result = crossbeam::scope(|scope| {
            let handles: Vec<_> = chunks
                .iter()
                .map(|chunk| scope.spawn(move |_| FrequencyTable::from_text(chunk)))
                .collect();

            handles.into_iter().try_fold(FrequencyTable::new(), |mut acc, handle| {
                acc.merge(&handle.join()?);
                Ok::<_, Box<dyn std::any::Any + Send>>(acc)
            })
        });

        match result {
            Ok(Ok(table)) => table,
            _ => {
                warn!("Frequency worker panicked, recounting on the calling thread");
                Self::from_text(text)
            }
        }
    }

    /// Add the symbols of `text` to the existing counts
    pub fn count_text(&mut self, text: &str) {
        for symbol in text.chars() {
            *self.counts.entry(symbol).or_insert(0) += 1;
        }
    }

    /// Fold the counts of `other` into this table
    pub fn merge(&mut self, other: &FrequencyTable) {
        for (&symbol, &count) in &other.counts {
            *self.counts.entry(symbol).or_insert(0) += count;
        }
    }

    pub fn get(&self, symbol: char) -> u64 {
        self.counts.get(&symbol).copied().unwrap_or(0)
    }

    /// Number of distinct symbols
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts (text length in symbols)
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Entries in ascending symbol order
    pub fn sorted(&self) -> Vec<(char, u64)> {
        let mut entries: Vec<(char, u64)> = self.counts.iter().map(|(&s, &c)| (s, c)).collect();
        entries.sort_unstable_by_key(|&(symbol, _)| symbol);
        entries
    }
}

/// Split `text` into at most `parts` non-empty chunks without cutting a char
fn split_at_char_boundaries(text: &str, parts: usize) -> Vec<&str> {
    let parts = parts.max(1);
    let target = ((text.len() + parts - 1) / parts).max(1);

    let mut chunks = Vec::with_capacity(parts);
    let mut rest = text;
    while !rest.is_empty() {
        let mut end = target.min(rest.len());
        while !rest.is_char_boundary(end) {
            end += 1;
        }
        let (head, tail) = rest.split_at(end);
        chunks.push(head);
        rest = tail;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_text() {
        let table = FrequencyTable::from_text("aaabbc");
        assert_eq!(table.get('a'), 3);
        assert_eq!(table.get('b'), 2);
        assert_eq!(table.get('c'), 1);
        assert_eq!(table.get('z'), 0);
        assert_eq!(table.len(), 3);
        assert_eq!(table.total(), 6);
    }

    #[test]
    fn test_empty_text() {
        let table = FrequencyTable::from_text("");
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
        assert!(table.sorted().is_empty());
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        // 'é' is two bytes in UTF-8, '😀' is four
        let table = FrequencyTable::from_text("éé😀");
        assert_eq!(table.get('é'), 2);
        assert_eq!(table.get('😀'), 1);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn test_sorted_order() {
        let table = FrequencyTable::from_text("cabbac");
        assert_eq!(table.sorted(), vec![('a', 2), ('b', 2), ('c', 2)]);
    }

    #[test]
    fn test_merge_is_equivalent_to_single_pass() {
        let mut left = FrequencyTable::from_text("hello ");
        let right = FrequencyTable::from_text("world");
        left.merge(&right);
        assert_eq!(left, FrequencyTable::from_text("hello world"));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let text = "The quick brown fox jumps over the lazy dog. Ünïcödé ✓ ".repeat(200);
        let sequential = FrequencyTable::from_text(&text);
        for threads in [2, 3, 4, 7] {
            assert_eq!(FrequencyTable::from_text_parallel(&text, threads), sequential);
        }
    }

    #[test]
    fn test_parallel_short_text() {
        let table = FrequencyTable::from_text_parallel("ab", 8);
        assert_eq!(table.total(), 2);
    }

    #[test]
    fn test_split_respects_char_boundaries() {
        let text = "ααααβββγγδ";
        let chunks = split_at_char_boundaries(text, 4);
        assert!(chunks.len() <= 4);
        assert!(chunks.iter().all(|c| !c.is_empty()));
        assert_eq!(chunks.concat(), text);
    }
}
