// src/data.rs
//
// Vote record data model. Struct fields are declared in alphabetical order
// on purpose: serde_json emits object keys in declaration order, and the
// JSON output contract wants sorted keys.

use serde::{Deserialize, Serialize};

/// Ballot category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Yes,
    No,
    Abstain,
    Secret,
    Absent,
}

/// Who voted how on one motion. Within each category, names keep the order
/// of the source document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResult {
    pub absent: Vec<String>,
    pub abstain: Vec<String>,
    pub no: Vec<String>,
    pub secret: Vec<String>,
    pub yes: Vec<String>,
}

impl VoteResult {
    /// Append one voter to a category.
    pub fn push(&mut self, category: Category, name: String) {
        let list = match category {
            Category::Yes => &mut self.yes,
            Category::No => &mut self.no,
            Category::Abstain => &mut self.abstain,
            Category::Secret => &mut self.secret,
            Category::Absent => &mut self.absent,
        };
        list.push(name);
    }

    pub fn total(&self) -> usize {
        self.yes.len() + self.no.len() + self.abstain.len() + self.secret.len() + self.absent.len()
    }
}

/// One assembled vote record: the ballot breakdown plus where in the
/// transcript it happened and what was being discussed. Built once from a
/// point-in-time snapshot of the traversal state, never mutated after.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteInfo {
    /// Plain-text speech paragraphs preceding the vote, oldest first.
    pub context: Vec<String>,
    /// (title, url) pairs of the documents under discussion. The senate
    /// carries at most one; the lower house any number.
    pub doclinks: Vec<(String, String)>,
    /// 1-based position in the session's emission order.
    pub order: u32,
    pub result: VoteResult,
    /// The ballot page this record was parsed from. Dedup works on the link
    /// as embedded in the transcript, which for the senate may differ from
    /// this after a search-page redirect.
    pub resultlink: String,
    /// Transcript location nearest the vote (page URL plus anchor).
    pub stenolink: String,
    pub topic: Option<String>,
}
