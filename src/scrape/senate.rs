// src/scrape/senate.rs
//
// Senate (senat.cz). One session is a single page: the transcript sits in
// div.obal_nahled, speech in div.stenovystoupeni paragraphs, topic headers
// are p.stenotisk, vote links are a.stenohlasovani, and ballot cells lead
// with a single-letter category code.

use std::collections::HashSet;

use log::debug;

use crate::core::html::{
    any_with_class_ci, attr, class_blocks_ci, has_class, next_elem_ci, next_open_tag_ci,
    strip_tags,
};
use crate::core::net::Fetch;
use crate::core::sanitize::normalize_entities;
use crate::core::url;
use crate::data::{Category, VoteInfo, VoteResult};
use crate::error::ScrapeError;

use super::state::{ContextWindow, DocScope};
use super::Chamber;

// A ballot URL may land on a search page that lists the actual result; one
// hop is the norm, anything this deep is a broken page cycle.
const MAX_HOPS: usize = 5;

pub struct Senate;

impl Chamber for Senate {
    fn load_session(
        &self,
        fetch: &dyn Fetch,
        url: &str,
        window: usize,
    ) -> Result<Vec<VoteInfo>, ScrapeError> {
        load_session(fetch, url, window)
    }
}

/// Walk the single transcript page of one senate session.
pub fn load_session(
    fetch: &dyn Fetch,
    url: &str,
    window: usize,
) -> Result<Vec<VoteInfo>, ScrapeError> {
    let doc = fetch.fetch(url)?;
    let container = {
        let spans = class_blocks_ci(&doc, "div", "obal_nahled");
        if spans.len() != 1 {
            return Err(ScrapeError::structure(
                url,
                &format!("expected exactly one .obal_nahled, found {}", spans.len()),
            ));
        }
        &doc[spans[0].0..spans[0].1]
    };

    // Speech lives only inside these blocks; headers and anchors can sit
    // anywhere in the container.
    let speech_spans = class_blocks_ci(container, "div", "stenovystoupeni");
    let anchors = named_anchors(container);

    let mut context = ContextWindow::new();
    let mut scope = DocScope::default();
    let mut seen: HashSet<String> = HashSet::new();
    let mut votes: Vec<VoteInfo> = Vec::new();

    let mut pos = 0usize;
    while let Some((p_s, p_e)) = next_elem_ci(container, "p", pos) {
        let block = &container[p_s..p_e];
        pos = p_e;

        let text = strip_tags(normalize_entities(block));

        // Topic header: exactly one document link.
        if has_class(block, "stenotisk") {
            let links = doc_links(block, url);
            if links.len() != 1 {
                return Err(ScrapeError::structure(
                    url,
                    &format!("expected one document link under {text:?}, found {}", links.len()),
                ));
            }
            scope.set(text, links);
            context.reset();
            continue;
        }

        if text.is_empty() || !covered(&speech_spans, p_s) {
            continue;
        }
        context.push(text);

        let mut a_pos = 0usize;
        while let Some((a_s, a_e)) = next_open_tag_ci(block, "a", a_pos) {
            let a_open = &block[a_s..a_e];
            a_pos = a_e;
            if !has_class(a_open, "stenohlasovani") {
                continue;
            }
            let href = attr(a_open, "href")
                .ok_or_else(|| ScrapeError::structure(url, "vote link without href"))?;
            let link = url::resolve(url, &href);
            if !seen.insert(link.clone()) {
                continue;
            }

            // Nearest named anchor before this link, container-wide.
            let stenolink = match nearest_before(&anchors, p_s + a_s) {
                Some(name) => url::resolve(url, &format!("#{name}")),
                None => s!(url),
            };

            let (resultlink, result) = load_vote(fetch, &link)?;
            votes.push(VoteInfo {
                context: context.snapshot(window),
                doclinks: scope.links.clone(),
                order: votes.len() as u32 + 1,
                result,
                resultlink,
                stenolink,
                topic: scope.topic.clone(),
            });
            context.reset();
        }
    }

    debug!("senate session {url}: {} votes", votes.len());
    Ok(votes)
}

/// Parse one ballot page. Returns the URL that was actually parsed: when
/// the link lands on a single-result search page, the one candidate link
/// is followed and becomes the authoritative result URL.
pub fn load_vote(fetch: &dyn Fetch, url: &str) -> Result<(String, VoteResult), ScrapeError> {
    let mut target = s!(url);
    for _ in 0..MAX_HOPS {
        let doc = fetch.fetch(&target)?;
        if !any_with_class_ci(&doc, "openingText") {
            target = search_page_candidate(&doc, &target)?;
            continue;
        }
        let result = parse_ballot(&doc, &target)?;
        return Ok((target, result));
    }
    Err(ScrapeError::structure(url, "result search pages form a loop"))
}

/* ---------------- helpers ---------------- */

/// The single a.hand candidate on a search page.
fn search_page_candidate(doc: &str, url: &str) -> Result<String, ScrapeError> {
    let mut candidates: Vec<String> = Vec::new();
    for (t_s, t_e) in class_blocks_ci(doc, "table", "PE_zebra") {
        let table = &doc[t_s..t_e];
        let mut pos = 0usize;
        while let Some((a_s, a_e)) = next_open_tag_ci(table, "a", pos) {
            let a_open = &table[a_s..a_e];
            pos = a_e;
            if has_class(a_open, "hand") {
                if let Some(href) = attr(a_open, "href") {
                    candidates.push(url::resolve(url, &href));
                }
            }
        }
    }
    if candidates.len() != 1 {
        return Err(ScrapeError::structure(
            url,
            &format!("expected one result candidate link, found {}", candidates.len()),
        ));
    }
    Ok(candidates.remove(0))
}

/// Categorize the coded ballot cells of a direct result page.
fn parse_ballot(doc: &str, url: &str) -> Result<VoteResult, ScrapeError> {
    let main = match class_blocks_ci(doc, "div", "mainFull").first() {
        Some(&(s, e)) => &doc[s..e],
        None => return Err(ScrapeError::structure(url, "missing .mainFull result block")),
    };
    let tables = class_blocks_ci(main, "table", "PE_zebra");
    if tables.is_empty() {
        return Err(ScrapeError::structure(url, "missing result table"));
    }

    let mut result = VoteResult::default();
    for (t_s, t_e) in tables {
        let table = &main[t_s..t_e];
        let mut pos = 0usize;
        while let Some((c_s, c_e)) = next_elem_ci(table, "td", pos) {
            let cell = strip_tags(normalize_entities(&table[c_s..c_e]));
            pos = c_e;

            let mut chars = cell.chars();
            // Layout-padding cells are empty; skip them.
            let Some(first) = chars.next() else { continue };
            let category = match first.to_ascii_uppercase() {
                'A' => Category::Yes,
                'N' => Category::No,
                '0' => Category::Absent,
                'X' => Category::Abstain,
                'T' => Category::Secret,
                code => return Err(ScrapeError::UnknownVoteCode { url: s!(url), code }),
            };
            result.push(category, s!(chars.as_str().trim()));
        }
    }
    Ok(result)
}

/// All (title, url) pairs linked from a header paragraph.
fn doc_links(block: &str, url: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some((a_s, a_e)) = next_elem_ci(block, "a", pos) {
        let a_block = &block[a_s..a_e];
        pos = a_e;
        if let Some(href) = attr(a_block, "href") {
            out.push((strip_tags(normalize_entities(a_block)), url::resolve(url, &href)));
        }
    }
    out
}

/// Named anchors in container order, by byte offset.
fn named_anchors(container: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some((a_s, a_e)) = next_open_tag_ci(container, "a", pos) {
        let open = &container[a_s..a_e];
        pos = a_e;
        if let Some(name) = attr(open, "name") {
            out.push((a_s, name));
        }
    }
    out
}

fn nearest_before<'a>(anchors: &'a [(usize, String)], pos: usize) -> Option<&'a str> {
    anchors.iter().rev().find(|(o, _)| *o < pos).map(|(_, n)| n.as_str())
}

fn covered(spans: &[(usize, usize)], pos: usize) -> bool {
    spans.iter().any(|&(s, e)| pos >= s && pos < e)
}
