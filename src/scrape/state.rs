// src/scrape/state.rs
//
// Building blocks shared by both chamber traversals. Each session traversal
// owns exactly one of each; nothing here is shared between calls.

/// Bounded trailing buffer of speech paragraphs, plain text, oldest first.
#[derive(Clone, Debug, Default)]
pub struct ContextWindow {
    lines: Vec<String>,
}

impl ContextWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue a buffer carried over from the previous transcript page.
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn push(&mut self, text: String) {
        self.lines.push(text);
    }

    /// Last `max` lines excluding the newest one. The newest line is the
    /// paragraph that carried the vote link, and a vote is never part of
    /// its own context.
    pub fn snapshot(&self, max: usize) -> Vec<String> {
        let n = self.lines.len();
        if n <= 1 {
            return Vec::new();
        }
        let end = n - 1;
        self.lines[end.saturating_sub(max)..end].to_vec()
    }

    /// Last `max` lines including the newest, for carrying into the next
    /// page when no vote cut the buffer.
    pub fn tail(&self, max: usize) -> Vec<String> {
        self.lines[self.lines.len().saturating_sub(max)..].to_vec()
    }

    pub fn reset(&mut self) {
        self.lines.clear();
    }
}

/// Currently active document/topic scope. Empty until the first header
/// paragraph; replaced wholesale on each one.
#[derive(Clone, Debug, Default)]
pub struct DocScope {
    pub topic: Option<String>,
    pub links: Vec<(String, String)>,
}

impl DocScope {
    pub fn set(&mut self, topic: String, links: Vec<(String, String)>) {
        self.topic = Some(topic);
        self.links = links;
    }
}

/// Everything the next lower-house page needs to keep the stream going.
/// The dedup set and the order counter travel next to this in the session
/// loop, not inside it.
#[derive(Clone, Debug)]
pub struct Continuation {
    pub url: String,
    pub context: Vec<String>,
    pub window: usize,
    pub scope: DocScope,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(lines: &[&str]) -> ContextWindow {
        ContextWindow::from_lines(lines.iter().map(|l| s!(*l)).collect())
    }

    #[test]
    fn snapshot_excludes_trigger_line() {
        let w = window(&["a", "b", "c", "trigger"]);
        assert_eq!(w.snapshot(4), vec!["a", "b", "c"]);
    }

    #[test]
    fn snapshot_caps_at_max() {
        let w = window(&["a", "b", "c", "d", "trigger"]);
        assert_eq!(w.snapshot(2), vec!["c", "d"]);
        assert_eq!(w.snapshot(0), Vec::<String>::new());
    }

    #[test]
    fn snapshot_of_short_buffers() {
        assert_eq!(window(&[]).snapshot(4), Vec::<String>::new());
        assert_eq!(window(&["trigger"]).snapshot(4), Vec::<String>::new());
    }

    #[test]
    fn tail_keeps_newest_line() {
        let w = window(&["a", "b", "c"]);
        assert_eq!(w.tail(2), vec!["b", "c"]);
        assert_eq!(w.tail(9), vec!["a", "b", "c"]);
    }

    #[test]
    fn reset_clears() {
        let mut w = window(&["a", "b"]);
        w.reset();
        w.push(s!("x"));
        w.push(s!("trigger"));
        assert_eq!(w.snapshot(4), vec!["x"]);
    }
}
