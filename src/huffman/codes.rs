use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::frequency::FrequencyTable;
use super::tree::{HuffmanTree, Node};
use crate::error::{Error, Result};

/// A variable-length bit string; the path from the root to a leaf
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn new() -> Self {
        Self { bits: Vec::new() }
    }

    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    #[inline]
    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    pub fn clear(&mut self) {
        self.bits.clear();
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Whether `self` is a prefix of `other` (every code is a prefix of itself)
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }

    fn child(&self, bit: bool) -> Self {
        let mut bits = Vec::with_capacity(self.bits.len() + 1);
        bits.extend_from_slice(&self.bits);
        bits.push(bit);
        Self { bits }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Code {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(Error::MalformedArtifact(format!("invalid bit {:?} in code", other))),
            })
            .collect::<Result<Vec<bool>>>()
            .map(Code::from_bits)
    }
}

/// Forward (symbol -> code) and reverse (code -> symbol) mappings.
///
/// The code set is always prefix-free and every code is non-empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeTable {
    forward: HashMap<char, Code>,
    reverse: HashMap<Code, char>,
    max_code_len: usize,
}

impl CodeTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assign left=0 / right=1 paths to every leaf of `tree`.
    ///
    /// A tree made of a single leaf gives its symbol the code `0`.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut table = Self::empty();

        if let Node::Leaf { symbol, .. } = tree.root_node() {
            table.insert(*symbol, Code::from_bits(vec![false]));
            return table;
        }

        let mut stack = vec![(tree.root(), Code::new())];
        while let Some((id, path)) = stack.pop() {
            match tree.node(id) {
                Node::Leaf { symbol, .. } => table.insert(*symbol, path),
                Node::Internal { left, right, .. } => {
                    stack.push((*right, path.child(true)));
                    stack.push((*left, path.child(false)));
                }
            }
        }
        table
    }

    /// Build the optimal table for `frequencies` (empty table for no symbols)
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Self {
        HuffmanTree::from_frequencies(frequencies)
            .map(|tree| Self::from_tree(&tree))
            .unwrap_or_default()
    }

    /// Rebuild a table from a persisted reverse mapping, rejecting empty codes,
    /// symbols mapped twice, and code sets that are not prefix-free.
    pub fn from_reverse(reverse: HashMap<Code, char>) -> Result<Self> {
        let mut table = Self::empty();
        for (code, symbol) in reverse {
            if code.is_empty() {
                return Err(Error::MalformedArtifact(format!("empty code for symbol {:?}", symbol)));
            }
            if table.forward.contains_key(&symbol) {
                return Err(Error::MalformedArtifact(format!(
                    "symbol {:?} is mapped by more than one code",
                    symbol
                )));
            }
            table.insert(symbol, code);
        }

        if !table.is_prefix_free() {
            return Err(Error::MalformedArtifact("code table is not prefix-free".into()));
        }
        Ok(table)
    }

    fn insert(&mut self, symbol: char, code: Code) {
        self.max_code_len = self.max_code_len.max(code.len());
        self.reverse.insert(code.clone(), symbol);
        self.forward.insert(symbol, code);
    }

    pub fn code(&self, symbol: char) -> Option<&Code> {
        self.forward.get(&symbol)
    }

    pub fn symbol(&self, code: &Code) -> Option<char> {
        self.reverse.get(code).copied()
    }

    pub fn forward(&self) -> &HashMap<char, Code> {
        &self.forward
    }

    pub fn reverse(&self) -> &HashMap<Code, char> {
        &self.reverse
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn max_code_len(&self) -> usize {
        self.max_code_len
    }

    /// Entries ordered by code length, then lexicographically by code
    pub fn entries_by_code(&self) -> Vec<(&Code, char)> {
        let mut entries: Vec<(&Code, char)> = self.reverse.iter().map(|(c, &s)| (c, s)).collect();
        entries.sort_unstable_by(|a, b| a.0.len().cmp(&b.0.len()).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Encoded size in bits of a text with the given symbol counts
    pub fn encoded_bit_len(&self, frequencies: &FrequencyTable) -> Option<u64> {
        frequencies
            .sorted()
            .into_iter()
            .map(|(symbol, count)| self.code(symbol).map(|code| code.len() as u64 * count))
            .sum()
    }

    pub fn is_prefix_free(&self) -> bool {
        // In lexicographic order a code is immediately followed by its extensions
        let mut codes: Vec<&Code> = self.reverse.keys().collect();
        codes.sort_unstable();
        codes.windows(2).all(|pair| !pair[0].is_prefix_of(pair[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> Code {
        s.parse().unwrap()
    }

    fn table_for(text: &str) -> CodeTable {
        CodeTable::from_frequencies(&FrequencyTable::from_text(text))
    }

    #[test]
    fn test_code_display_and_parse() {
        let c = code("0110");
        assert_eq!(c.len(), 4);
        assert_eq!(c.to_string(), "0110");
        assert!("01x".parse::<Code>().is_err());
    }

    #[test]
    fn test_is_prefix_of() {
        assert!(code("01").is_prefix_of(&code("011")));
        assert!(!code("011").is_prefix_of(&code("01")));
        assert!(!code("10").is_prefix_of(&code("011")));
    }

    #[test]
    fn test_aaabbc_table() {
        let table = table_for("aaabbc");
        assert_eq!(table.code('a'), Some(&code("0")));
        assert_eq!(table.code('c'), Some(&code("10")));
        assert_eq!(table.code('b'), Some(&code("11")));

        let len = |s| table.code(s).unwrap().len();
        assert!(len('a') < len('b'));
        assert!(len('b') <= len('c'));
        assert_eq!(table.max_code_len(), 2);
    }

    #[test]
    fn test_single_symbol_gets_nonempty_code() {
        let table = table_for("x");
        assert_eq!(table.len(), 1);
        assert_eq!(table.code('x'), Some(&code("0")));
        assert_eq!(table.symbol(&code("0")), Some('x'));
    }

    #[test]
    fn test_empty_text_gives_empty_table() {
        let table = table_for("");
        assert!(table.is_empty());
        assert_eq!(table.max_code_len(), 0);
    }

    #[test]
    fn test_forward_and_reverse_are_inverse() {
        let table = table_for("She sells sea shells by the sea shore");
        assert_eq!(table.forward().len(), table.reverse().len());
        for (symbol, code) in table.forward() {
            assert_eq!(table.symbol(code), Some(*symbol));
        }
    }

    #[test]
    fn test_generated_tables_are_prefix_free() {
        let texts =
            ["ab", "abc", "hello world", "ααβγγγδδδδ", "the rain in spain stays mainly"];
        for text in texts {
            assert!(table_for(text).is_prefix_free(), "not prefix-free for {:?}", text);
        }
    }

    #[test]
    fn test_encoded_bit_len() {
        let freq = FrequencyTable::from_text("aaabbc");
        let table = CodeTable::from_frequencies(&freq);
        // 3*1 + 2*2 + 1*2
        assert_eq!(table.encoded_bit_len(&freq), Some(9));
    }

    #[test]
    fn test_entries_by_code_order() {
        let table = table_for("aaabbc");
        let order: Vec<String> =
            table.entries_by_code().iter().map(|(c, _)| c.to_string()).collect();
        assert_eq!(order, vec!["0", "10", "11"]);
    }

    #[test]
    fn test_from_reverse_accepts_valid_table() {
        let reverse = HashMap::from([(code("0"), 'a'), (code("10"), 'b'), (code("11"), 'c')]);
        let table = CodeTable::from_reverse(reverse).unwrap();
        assert_eq!(table.code('b'), Some(&code("10")));
        assert_eq!(table.max_code_len(), 2);
    }

    #[test]
    fn test_from_reverse_rejects_prefix_collision() {
        let reverse = HashMap::from([(code("0"), 'a'), (code("01"), 'b')]);
        let err = CodeTable::from_reverse(reverse).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_from_reverse_rejects_empty_code() {
        let reverse = HashMap::from([(Code::new(), 'a')]);
        assert!(CodeTable::from_reverse(reverse).unwrap_err().is_malformed());
    }

    #[test]
    fn test_from_reverse_rejects_duplicate_symbol() {
        let reverse = HashMap::from([(code("0"), 'a'), (code("1"), 'a')]);
        assert!(CodeTable::from_reverse(reverse).unwrap_err().is_malformed());
    }
}
