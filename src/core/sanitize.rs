// src/core/sanitize.rs

pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", "\u{a0}")
        .replace("&#160;", "\u{a0}")
        .replace("&amp;", "&")
}

/// Collapse runs of whitespace (including non-breaking spaces) to a single
/// space and trim the ends.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nbsp_collapses_to_plain_space() {
        assert_eq!(normalize_ws("X\u{a0}Petr  Svoboda"), "X Petr Svoboda");
        assert_eq!(normalize_ws(&normalize_entities("Jan&nbsp;Novák")), "Jan Novák");
    }

    #[test]
    fn newlines_collapse() {
        assert_eq!(normalize_ws(" a \n  b\t c "), "a b c");
    }
}
