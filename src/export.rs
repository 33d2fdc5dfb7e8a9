// src/export.rs
//
// Render boundaries for assembled vote records: a human-readable listing
// and a deterministic JSON encoding (sorted keys via field order in
// src/data.rs, UTF-8 left unescaped).

use crate::data::{VoteInfo, VoteResult};

/// Grouped category listing with counts. The absent list is left out of
/// the text form on purpose; it is still present in the JSON encoding.
pub fn result_text(result: &VoteResult) -> String {
    let groups = [
        ("Yes", &result.yes),
        ("No", &result.no),
        ("Abstain", &result.abstain),
        ("Secret", &result.secret),
    ];

    let mut out: Vec<String> = Vec::new();
    for (label, names) in groups {
        if names.is_empty() {
            continue;
        }
        out.push(format!("{} ({})", label, names.len()));
        out.extend(names.iter().map(|name| format!("- {name}")));
        out.push(s!());
    }
    out.join("\n")
}

pub fn vote_text(vote: &VoteInfo) -> String {
    let mut out: Vec<String> = Vec::new();
    out.push(format!("Vote {}: {}", vote.order, vote.resultlink));
    out.push(format!("Transcript: {}", vote.stenolink));
    if let Some(topic) = &vote.topic {
        out.push(format!("Topic: {topic}"));
    }
    for (title, link) in &vote.doclinks {
        out.push(format!("Document {title}: {link}"));
    }
    out.extend(vote.context.iter().cloned());
    out.push(s!());
    out.push(result_text(&vote.result));
    out.join("\n")
}

pub fn votes_to_json(votes: &[VoteInfo]) -> serde_json::Result<String> {
    serde_json::to_string(votes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Category;

    fn sample() -> VoteInfo {
        let mut result = VoteResult::default();
        result.push(Category::Yes, s!("Jan Novák"));
        result.push(Category::Yes, s!("Eva Malá"));
        result.push(Category::No, s!("Petr Svoboda"));
        result.push(Category::Absent, s!("Alois Tichý"));
        VoteInfo {
            context: vec![s!("Projednáváme tisk."), s!("Kdo je pro?")],
            doclinks: vec![(s!("Tisk 100"), s!("http://www.psp.cz/t?ct=100"))],
            order: 1,
            result,
            resultlink: s!("http://www.psp.cz/sqw/hlasy.sqw?G=1"),
            stenolink: s!("http://www.psp.cz/steno#b1"),
            topic: Some(s!("Bod 12.")),
        }
    }

    #[test]
    fn text_groups_categories_with_counts() {
        let text = vote_text(&sample());
        assert!(text.starts_with("Vote 1: http://www.psp.cz/sqw/hlasy.sqw?G=1\n"));
        assert!(text.contains("Topic: Bod 12."));
        assert!(text.contains("Document Tisk 100: http://www.psp.cz/t?ct=100"));
        assert!(text.contains("Yes (2)\n- Jan Novák\n- Eva Malá"));
        assert!(text.contains("No (1)\n- Petr Svoboda"));
        // Absent and empty categories never show in the text form.
        assert!(!text.contains("Alois Tichý"));
        assert!(!text.contains("Abstain"));
    }

    #[test]
    fn json_round_trips() {
        let votes = vec![sample()];
        let json = votes_to_json(&votes).unwrap();
        let back: Vec<VoteInfo> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, votes);
    }

    #[test]
    fn json_keys_are_sorted_and_utf8_unescaped() {
        let json = votes_to_json(&[sample()]).unwrap();
        let order = ["\"context\"", "\"doclinks\"", "\"order\"", "\"result\"",
                     "\"resultlink\"", "\"stenolink\"", "\"topic\""];
        let positions: Vec<usize> = order.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
        assert!(json.contains("Jan Novák"), "{json}");

        let result_order = ["\"absent\"", "\"abstain\"", "\"no\"", "\"secret\"", "\"yes\""];
        let positions: Vec<usize> = result_order.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
    }
}
