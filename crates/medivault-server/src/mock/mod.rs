// crates/medivault-server/src/mock/mod.rs
// Keyword-matched canned content used whenever an upstream is missing

mod records;
mod responses;
mod templates;

pub use records::{DemoRecord, demo_results};
pub use responses::{DEFAULT_RESPONSE, MockResponder};
pub use templates::template_for;

/// One row of a keyword table. Keywords must be lowercase.
#[derive(Debug)]
pub struct KeywordEntry<T: 'static> {
    pub keywords: &'static [&'static str],
    pub value: T,
}

impl<T> KeywordEntry<T> {
    /// Number of keywords occurring as substrings of an already-lowercased query
    fn hits(&self, lowered: &str) -> usize {
        self.keywords.iter().filter(|k| lowered.contains(*k)).count()
    }
}

/// Ordered keyword table.
///
/// Lookup prefers the first entry with at least two keyword hits, then the
/// first entry with at least one. Ties are always broken by table order.
#[derive(Debug)]
pub struct KeywordTable<T: 'static> {
    entries: &'static [KeywordEntry<T>],
}

impl<T> KeywordTable<T> {
    pub const fn new(entries: &'static [KeywordEntry<T>]) -> Self {
        Self { entries }
    }

    pub fn lookup(&self, query: &str) -> Option<&'static T> {
        let lowered = query.to_lowercase();
        let scores: Vec<usize> = self.entries.iter().map(|e| e.hits(&lowered)).collect();

        [2, 1].into_iter().find_map(|threshold| {
            scores
                .iter()
                .position(|&score| score >= threshold)
                .map(|idx| &self.entries[idx].value)
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
