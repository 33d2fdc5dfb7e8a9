// src/scrape/lower_house.rs
//
// Lower house (psp.cz). Session transcripts are paginated; speech
// paragraphs come with align="justify", topic headers with align="center",
// and votes/bookmarks are <a id=…> anchors inside speech — an id starting
// with 'h' links a ballot page, anything else is a named bookmark.

use std::collections::HashSet;

use log::debug;

use crate::core::html::{
    attr, balanced_elem_ci, class_list, has_class, next_elem_ci, next_open_tag_ci, strip_tags,
};
use crate::core::net::Fetch;
use crate::core::sanitize::normalize_entities;
use crate::core::url;
use crate::data::{Category, VoteInfo, VoteResult};
use crate::error::ScrapeError;

use super::state::{ContextWindow, Continuation, DocScope};
use super::Chamber;

pub struct LowerHouse;

impl Chamber for LowerHouse {
    fn load_session(
        &self,
        fetch: &dyn Fetch,
        url: &str,
        window: usize,
    ) -> Result<Vec<VoteInfo>, ScrapeError> {
        load_session(fetch, url, window)
    }
}

/// Walk every page of one session transcript, starting from the first
/// page's URL. The dedup set and order counter live here and thread
/// through all pages; everything else crosses pages in the Continuation.
pub fn load_session(
    fetch: &dyn Fetch,
    url: &str,
    window: usize,
) -> Result<Vec<VoteInfo>, ScrapeError> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut order = 0u32;
    let mut votes: Vec<VoteInfo> = Vec::new();

    let first = load_page(
        fetch,
        url,
        window,
        ContextWindow::new(),
        DocScope::default(),
        &mut seen,
        &mut order,
    )?;
    let (mut page_votes, mut next) = first;
    votes.append(&mut page_votes);

    while let Some(cont) = next {
        let (mut page_votes, n) = load_page(
            fetch,
            &cont.url,
            cont.window,
            ContextWindow::from_lines(cont.context),
            cont.scope,
            &mut seen,
            &mut order,
        )?;
        votes.append(&mut page_votes);
        next = n;
    }

    debug!("lower house session {url}: {} votes", votes.len());
    Ok(votes)
}

/// Parse one transcript page. Returns the records it emitted plus the
/// continuation for the next page, if a next-page nav link exists.
pub fn load_page(
    fetch: &dyn Fetch,
    url: &str,
    window: usize,
    mut context: ContextWindow,
    mut scope: DocScope,
    seen: &mut HashSet<String>,
    order: &mut u32,
) -> Result<(Vec<VoteInfo>, Option<Continuation>), ScrapeError> {
    let doc = fetch.fetch(url)?;
    let content = main_content(&doc, url)?;

    // The transcript back-reference starts as the page itself and moves
    // forward with every named bookmark.
    let mut bookmark = s!(url);
    let mut votes: Vec<VoteInfo> = Vec::new();

    let mut pos = 0usize;
    while let Some((p_s, p_e)) = next_elem_ci(content, "p", pos) {
        let block = &content[p_s..p_e];
        pos = p_e;

        let text = strip_tags(normalize_entities(block));
        if text.is_empty() {
            continue;
        }

        match attr(block, "align").as_deref() {
            // Speech, possibly carrying vote links and bookmarks.
            Some("justify") => {
                context.push(text);

                let mut a_pos = 0usize;
                while let Some((a_s, a_e)) = next_open_tag_ci(block, "a", a_pos) {
                    let a_open = &block[a_s..a_e];
                    a_pos = a_e;
                    let Some(id) = attr(a_open, "id") else { continue };

                    if id.starts_with('h') || id.starts_with('H') {
                        let href = attr(a_open, "href").ok_or_else(|| {
                            ScrapeError::structure(url, "vote anchor without href")
                        })?;
                        let link = url::resolve(url, &href);
                        if !seen.insert(link.clone()) {
                            continue;
                        }
                        let result = load_vote(fetch, &link)?;
                        *order += 1;
                        votes.push(VoteInfo {
                            context: context.snapshot(window),
                            doclinks: scope.links.clone(),
                            order: *order,
                            result,
                            resultlink: link,
                            stenolink: bookmark.clone(),
                            topic: scope.topic.clone(),
                        });
                        context.reset();
                    } else {
                        bookmark = url::resolve(url, &format!("#{id}"));
                    }
                }
            }
            // Topic/document headline.
            Some("center") => {
                let mut links: Vec<(String, String)> = Vec::new();
                let mut a_pos = 0usize;
                while let Some((a_s, a_e)) = next_elem_ci(block, "a", a_pos) {
                    let a_block = &block[a_s..a_e];
                    a_pos = a_e;
                    if let Some(href) = attr(a_block, "href") {
                        let title = strip_tags(normalize_entities(a_block));
                        links.push((title, url::resolve(url, &href)));
                    }
                }
                scope.set(text, links);
                context.reset();
            }
            _ => {}
        }
    }

    let next = next_page_url(content, url).map(|next_url| Continuation {
        url: next_url,
        context: context.tail(window),
        window,
        scope,
    });

    debug!("page {url}: {} votes, next={:?}", votes.len(), next.as_ref().map(|c| &c.url));
    Ok((votes, next))
}

/// Parse one ballot page into categorized voter names. Every voter entry
/// is an <li> holding a flag span and the voter's name anchor.
pub fn load_vote(fetch: &dyn Fetch, url: &str) -> Result<VoteResult, ScrapeError> {
    let doc = fetch.fetch(url)?;
    let content = main_content(&doc, url)?;
    let mut result = VoteResult::default();

    let mut pos = 0usize;
    while let Some((li_s, li_e)) = next_elem_ci(content, "li", pos) {
        let li = &content[li_s..li_e];
        pos = li_e;

        let Some((f_s, f_e)) = flag_span(li) else { continue };
        let category = flag_category(&li[f_s..f_e]).ok_or_else(|| {
            ScrapeError::structure(
                url,
                &format!(
                    "unknown vote flag {:?}",
                    attr(&li[f_s..f_e], "class").unwrap_or_default()
                ),
            )
        })?;

        let name = next_elem_ci(li, "a", f_e)
            .map(|(a_s, a_e)| strip_tags(normalize_entities(&li[a_s..a_e])))
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ScrapeError::structure(url, "vote flag without voter name"))?;
        result.push(category, name);
    }

    Ok(result)
}

/* ---------------- helpers ---------------- */

/// The page's single #main-content div; any other cardinality means the
/// markup changed under us.
fn main_content<'a>(doc: &'a str, url: &str) -> Result<&'a str, ScrapeError> {
    let mut found: Option<(usize, usize)> = None;
    let mut count = 0usize;
    let mut pos = 0usize;
    while let Some((o_s, o_e)) = next_open_tag_ci(doc, "div", pos) {
        let open = &doc[o_s..o_e];
        pos = o_e;
        if attr(open, "id").as_deref() == Some("main-content") {
            count += 1;
            if found.is_none() {
                found = balanced_elem_ci(doc, "div", o_s);
            }
        }
    }
    if count != 1 {
        return Err(ScrapeError::structure(
            url,
            &format!("expected exactly one #main-content, found {count}"),
        ));
    }
    let (s, e) = found.ok_or_else(|| ScrapeError::structure(url, "unterminated #main-content"))?;
    Ok(&doc[s..e])
}

/// First span with the "flag" marker class inside a voter entry.
fn flag_span(li: &str) -> Option<(usize, usize)> {
    let mut pos = 0usize;
    while let Some((s_s, s_e)) = next_open_tag_ci(li, "span", pos) {
        if has_class(&li[s_s..s_e], "flag") {
            return Some((s_s, s_e));
        }
        pos = s_e;
    }
    None
}

fn flag_category(span_open: &str) -> Option<Category> {
    for class in class_list(span_open) {
        let category = match class.as_str() {
            "yes" => Category::Yes,
            "no" => Category::No,
            "refrained" => Category::Abstain,
            "not-logged-in" | "excused" => Category::Absent,
            _ => continue,
        };
        return Some(category);
    }
    None
}

fn next_page_url(content: &str, url: &str) -> Option<String> {
    let mut pos = 0usize;
    while let Some((d_s, d_e)) = next_open_tag_ci(content, "div", pos) {
        pos = d_e;
        if !has_class(&content[d_s..d_e], "document-nav") {
            continue;
        }
        let (b_s, b_e) = balanced_elem_ci(content, "div", d_s)?;
        let nav = &content[b_s..b_e];

        let mut a_pos = 0usize;
        while let Some((a_s, a_e)) = next_open_tag_ci(nav, "a", a_pos) {
            let a_open = &nav[a_s..a_e];
            a_pos = a_e;
            if has_class(a_open, "next") {
                if let Some(href) = attr(a_open, "href") {
                    return Some(url::resolve(url, &href));
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const STENO: &str = "http://www.psp.cz/eknih/2013ps/stenprot/033schuz/s033001.htm";
    const BALLOT: &str = "http://www.psp.cz/sqw/hlasy.sqw?G=38519";

    struct Pages(HashMap<String, String>);

    impl Pages {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self(pages.iter().map(|(u, b)| (s!(*u), s!(*b))).collect())
        }
    }

    impl Fetch for Pages {
        fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
            self.0
                .get(url)
                .cloned()
                .ok_or_else(|| ScrapeError::fetch(url, "no such page"))
        }
    }

    const BALLOT_PAGE: &str = r#"
        <html><body><div id="main-content">
          <ul class="results">
            <li><span class="flag yes"></span> <a href="/x?id=1">Jan Novák</a></li>
            <li><span class="flag yes"></span> <a href="/x?id=2">Eva Malá</a></li>
            <li><span class="flag no"></span> <a href="/x?id=3">Petr Svoboda</a></li>
            <li><span class="flag refrained"></span> <a href="/x?id=4">Karel Starý</a></li>
            <li><span class="flag not-logged-in"></span> <a href="/x?id=5">Alois Tichý</a></li>
            <li><span class="flag excused"></span> <a href="/x?id=6">Marie Černá</a></li>
            <li>unrelated nav entry <a href="/y">elsewhere</a></li>
          </ul>
        </div></body></html>"#;

    fn steno_page(body: &str) -> String {
        format!("<html><body><div id=\"main-content\">{body}</div></body></html>")
    }

    #[test]
    fn ballot_categories_map_from_flag_classes() {
        let fetch = Pages::new(&[(BALLOT, BALLOT_PAGE)]);
        let result = load_vote(&fetch, BALLOT).unwrap();
        assert_eq!(result.yes, vec!["Jan Novák", "Eva Malá"]);
        assert_eq!(result.no, vec!["Petr Svoboda"]);
        assert_eq!(result.abstain, vec!["Karel Starý"]);
        assert_eq!(result.absent, vec!["Alois Tichý", "Marie Černá"]);
        assert!(result.secret.is_empty());
    }

    #[test]
    fn unknown_flag_class_is_structural_error() {
        let page = steno_page(r#"<li><span class="flag wat"></span> <a href="/x">N</a></li>"#);
        let fetch = Pages::new(&[(BALLOT, &page)]);
        let err = load_vote(&fetch, BALLOT).unwrap_err();
        assert!(matches!(err, ScrapeError::Structure { .. }), "{err}");
    }

    #[test]
    fn flag_without_name_is_structural_error() {
        let page = steno_page(r#"<li><span class="flag yes"></span> nobody here</li>"#);
        let fetch = Pages::new(&[(BALLOT, &page)]);
        let err = load_vote(&fetch, BALLOT).unwrap_err();
        assert!(matches!(err, ScrapeError::Structure { .. }), "{err}");
    }

    #[test]
    fn missing_main_content_is_structural_error() {
        let fetch = Pages::new(&[(STENO, "<html><body><div>nope</div></body></html>")]);
        let err = load_session(&fetch, STENO, 4).unwrap_err();
        assert!(matches!(err, ScrapeError::Structure { .. }), "{err}");
    }

    #[test]
    fn session_assembles_context_topic_and_bookmark() {
        let page = steno_page(
            r#"
            <p align="center">Bod 12. <a href="/sqw/text.sqw?ct=100">Tisk 100</a></p>
            <p align="justify">Speech one.</p>
            <p align="justify">   </p>
            <p align="justify">Speech two <a id="b5"></a> continues.</p>
            <p>Procedural note outside the stream.</p>
            <p align="justify">We vote now. <a id="h38519" href="/sqw/hlasy.sqw?G=38519">vote 123</a></p>
            "#,
        );
        let fetch = Pages::new(&[(STENO, &page), (BALLOT, BALLOT_PAGE)]);
        let votes = load_session(&fetch, STENO, 4).unwrap();

        assert_eq!(votes.len(), 1);
        let vote = &votes[0];
        assert_eq!(vote.order, 1);
        assert_eq!(vote.resultlink, BALLOT);
        assert_eq!(vote.stenolink, format!("{STENO}#b5"));
        assert_eq!(vote.context, vec!["Speech one.", "Speech two continues."]);
        assert_eq!(vote.topic.as_deref(), Some("Bod 12. Tisk 100"));
        assert_eq!(
            vote.doclinks,
            vec![(s!("Tisk 100"), s!("http://www.psp.cz/sqw/text.sqw?ct=100"))]
        );
        assert_eq!(vote.result.yes.len(), 2);
    }

    #[test]
    fn duplicate_vote_link_in_page_emits_once() {
        let page = steno_page(
            r#"
            <p align="justify">First mention <a id="h38519" href="/sqw/hlasy.sqw?G=38519">v</a></p>
            <p align="justify">Repeat <a id="h38519" href="/sqw/hlasy.sqw?G=38519">v</a></p>
            "#,
        );
        let fetch = Pages::new(&[(STENO, &page), (BALLOT, BALLOT_PAGE)]);
        let votes = load_session(&fetch, STENO, 4).unwrap();
        assert_eq!(votes.len(), 1);
    }

    #[test]
    fn header_resets_context_and_replaces_scope() {
        let page = steno_page(
            r#"
            <p align="center">Bod 1. <a href="/t?ct=1">Tisk 1</a></p>
            <p align="justify">Old discussion.</p>
            <p align="center">Bod 2. <a href="/t?ct=2">Tisk 2</a> a <a href="/t?ct=3">Tisk 3</a></p>
            <p align="justify">Vote here <a id="h38519" href="/sqw/hlasy.sqw?G=38519">v</a></p>
            "#,
        );
        let fetch = Pages::new(&[(STENO, &page), (BALLOT, BALLOT_PAGE)]);
        let votes = load_session(&fetch, STENO, 4).unwrap();

        assert_eq!(votes.len(), 1);
        let vote = &votes[0];
        // Old discussion fell out of the window at the second header.
        assert_eq!(vote.context, Vec::<String>::new());
        assert_eq!(vote.topic.as_deref(), Some("Bod 2. Tisk 2 a Tisk 3"));
        assert_eq!(vote.doclinks.len(), 2);
        assert_eq!(vote.doclinks[1].0, "Tisk 3");
    }

    #[test]
    fn multiple_votes_in_one_paragraph_reset_between() {
        let ballot2 = "http://www.psp.cz/sqw/hlasy.sqw?G=38520";
        let page = steno_page(
            r#"
            <p align="justify">Lead-in.</p>
            <p align="justify">Two at once
              <a id="h38519" href="/sqw/hlasy.sqw?G=38519">v1</a>
              <a id="h38520" href="/sqw/hlasy.sqw?G=38520">v2</a></p>
            "#,
        );
        let fetch = Pages::new(&[(STENO, &page), (BALLOT, BALLOT_PAGE), (ballot2, BALLOT_PAGE)]);
        let votes = load_session(&fetch, STENO, 4).unwrap();

        assert_eq!(votes.len(), 2);
        assert_eq!(votes[0].order, 1);
        assert_eq!(votes[0].context, vec!["Lead-in."]);
        // The window was cut by the first vote, so the second starts clean.
        assert_eq!(votes[1].order, 2);
        assert_eq!(votes[1].context, Vec::<String>::new());
        assert_eq!(votes[1].resultlink, ballot2);
    }
}
