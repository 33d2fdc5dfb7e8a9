// src/core/html.rs
//
// Hand-rolled tag scanning over the raw markup string. No tree is ever
// built; every consumer walks (start, end) byte spans instead.

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii() {
                c.to_ascii_lowercase()
            } else {
                c
            }
        })
        .collect()
}

/// Next opening tag of `name` at or after `from`. Returns the span of the
/// `<name …>` opener only. Matches element boundaries, so searching for
/// "a" will not hit "<abbr".
pub fn next_open_tag_ci(s: &str, name: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let pat = format!("<{}", to_lower(name));
    let mut pos = from;
    loop {
        let i = lc.get(pos..)?.find(&pat)? + pos;
        match lc.as_bytes().get(i + pat.len()) {
            Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => {
                let end = s[i..].find('>')? + i + 1;
                return Some((i, end));
            }
            _ => pos = i + pat.len(),
        }
    }
}

/// Next `<name …>…</name>` block at or after `from`, for tags that do not
/// nest (p, a, td, table). Self-closing openers count as a whole element.
pub fn next_elem_ci(s: &str, name: &str, from: usize) -> Option<(usize, usize)> {
    let (start, open_end) = next_open_tag_ci(s, name, from)?;
    if s[..open_end].ends_with("/>") {
        return Some((start, open_end));
    }
    let lc = to_lower(s);
    let close_pat = format!("</{}", to_lower(name));
    let close = lc[open_end..].find(&close_pat)? + open_end;
    let end = s[close..].find('>')? + close + 1;
    Some((start, end))
}

/// Like next_elem_ci but depth-balanced, for tags that nest (div). `from`
/// may point at or before the opener.
pub fn balanced_elem_ci(s: &str, name: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let close_pat = format!("</{}", to_lower(name));
    let (start, open_end) = next_open_tag_ci(s, name, from)?;
    let mut depth = 1usize;
    let mut cur = open_end;
    while depth > 0 {
        let next_open = next_open_tag_ci(s, name, cur);
        let next_close = lc[cur..].find(&close_pat).map(|i| i + cur);
        match (next_open, next_close) {
            (Some((o_s, o_e)), Some(c)) if o_s < c => {
                depth += 1;
                cur = o_e;
            }
            (_, Some(c)) => {
                depth -= 1;
                cur = s[c..].find('>')? + c + 1;
            }
            _ => return None,
        }
    }
    Some((start, cur))
}

/// Attribute value from a tag (block or opener; only the part up to the
/// first '>' is inspected). Tolerates single quotes, double quotes and
/// unquoted values.
pub fn attr(tag: &str, name: &str) -> Option<String> {
    let opener = &tag[..tag.find('>').unwrap_or(tag.len())];
    let lc = to_lower(opener);
    let pat = format!("{}=", to_lower(name));
    let mut from = 0usize;
    loop {
        let i = lc.get(from..)?.find(&pat)? + from;
        // Attribute names are preceded by whitespace; this also stops
        // e.g. "data-name=" from matching "name=".
        if i == 0 || !lc.as_bytes()[i - 1].is_ascii_whitespace() {
            from = i + pat.len();
            continue;
        }
        let val = &opener[i + pat.len()..];
        let (quote, start) = match val.as_bytes().first() {
            Some(b'"') => ('"', 1),
            Some(b'\'') => ('\'', 1),
            _ => ('\0', 0),
        };
        let end = if quote != '\0' {
            val[start..].find(quote).map(|e| start + e).unwrap_or(val.len())
        } else {
            val[start..]
                .find(|c: char| c.is_ascii_whitespace())
                .map(|e| start + e)
                .unwrap_or(val.len())
        };
        return Some(val[start..end].to_string());
    }
}

pub fn class_list(tag: &str) -> Vec<String> {
    attr(tag, "class")
        .map(|c| c.split_whitespace().map(|t| t.to_string()).collect())
        .unwrap_or_default()
}

pub fn has_class(tag: &str, class: &str) -> bool {
    class_list(tag).iter().any(|c| c.eq_ignore_ascii_case(class))
}

/// Balanced blocks of `name` whose opening tag carries `class`, in
/// document order.
pub fn class_blocks_ci(s: &str, name: &str, class: &str) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some((o_s, o_e)) = next_open_tag_ci(s, name, pos) {
        let open = &s[o_s..o_e];
        pos = o_e;
        if !has_class(open, class) {
            continue;
        }
        if let Some(span) = balanced_elem_ci(s, name, o_s) {
            out.push(span);
        }
    }
    out
}

/// Does any tag in the document carry `class`? Used for page-kind markers.
pub fn any_with_class_ci(s: &str, class: &str) -> bool {
    let mut pos = 0usize;
    while let Some(i) = s[pos..].find('<').map(|i| i + pos) {
        let end = match s[i..].find('>') {
            Some(e) => i + e + 1,
            None => return false,
        };
        if has_class(&s[i..end], class) {
            return true;
        }
        pos = end;
    }
    false
}

/// Markup stripped, entities left alone, whitespace collapsed.
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    super::sanitize::normalize_ws(&out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_tag_respects_element_boundary() {
        let s = "<abbr>x</abbr> <a href=\"y\">z</a>";
        let (o_s, o_e) = next_open_tag_ci(s, "a", 0).unwrap();
        assert_eq!(&s[o_s..o_e], "<a href=\"y\">");
    }

    #[test]
    fn elem_block_and_text() {
        let s = "<P Align=justify>Hello <b>world</b></P>";
        let (b_s, b_e) = next_elem_ci(s, "p", 0).unwrap();
        assert_eq!(strip_tags(&s[b_s..b_e]), "Hello world");
        assert_eq!(attr(&s[b_s..b_e], "align").as_deref(), Some("justify"));
    }

    #[test]
    fn balanced_div_spans_nested_divs() {
        let s = "<div id=outer>a<div>b</div>c</div><div>tail</div>";
        let (b_s, b_e) = balanced_elem_ci(s, "div", 0).unwrap();
        assert_eq!(&s[b_s..b_e], "<div id=outer>a<div>b</div>c</div>");
    }

    #[test]
    fn attr_quoting_variants() {
        assert_eq!(attr("<a href='x y'>", "href").as_deref(), Some("x y"));
        assert_eq!(attr("<a href=plain>", "href").as_deref(), Some("plain"));
        assert_eq!(attr("<a data-href=no href=\"yes\">", "href").as_deref(), Some("yes"));
        assert_eq!(attr("<a id=h123>", "name"), None);
    }

    #[test]
    fn class_probes() {
        assert!(has_class("<span class=\"flag yes\">", "flag"));
        assert!(!has_class("<span class=\"flagged\">", "flag"));
        assert!(any_with_class_ci("<p>x</p><div class='openingText'>y</div>", "openingtext"));
        assert!(!any_with_class_ci("<p>x</p>", "openingText"));
    }

    #[test]
    fn class_blocks_in_order() {
        let s = "<table class=PE_zebra><td>1</td></table><table><td>2</td></table>\
                 <table class=\"PE_zebra wide\"><td>3</td></table>";
        let blocks = class_blocks_ci(s, "table", "PE_zebra");
        assert_eq!(blocks.len(), 2);
        assert!(s[blocks[0].0..blocks[0].1].contains(">1<"));
        assert!(s[blocks[1].0..blocks[1].1].contains(">3<"));
    }
}
