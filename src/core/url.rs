// src/core/url.rs
//
// Absolute-URL resolution for the handful of link shapes the transcript
// sites actually emit: absolute, scheme-relative, root-relative, relative
// with ./ and ../, fragment-only, query-only.

pub fn resolve(base: &str, rel: &str) -> String {
    if rel.is_empty() {
        return s!(base);
    }
    if rel.starts_with("http://") || rel.starts_with("https://") {
        return s!(rel);
    }
    if let Some(frag) = rel.strip_prefix('#') {
        let stem = base.split('#').next().unwrap_or(base);
        return format!("{stem}#{frag}");
    }
    if let Some(query) = rel.strip_prefix('?') {
        let stem = base.split(['#', '?']).next().unwrap_or(base);
        return format!("{stem}?{query}");
    }

    let (scheme, rest) = match base.find("://") {
        Some(i) => (&base[..i + 3], &base[i + 3..]),
        None => ("", base),
    };
    let host = rest.split(['/', '#', '?']).next().unwrap_or(rest);

    if let Some(tail) = rel.strip_prefix("//") {
        return format!("{scheme}{tail}");
    }
    if rel.starts_with('/') {
        return format!("{scheme}{host}{}", normalize_path(rel));
    }

    // Relative path: resolve against the base directory.
    let stem = base.split(['#', '?']).next().unwrap_or(base);
    let path = &stem[scheme.len() + host.len()..];
    let dir = match path.rfind('/') {
        Some(i) => &path[..i + 1],
        None => "/",
    };
    format!("{scheme}{host}{}", normalize_path(&format!("{dir}{rel}")))
}

fn normalize_path(path: &str) -> String {
    let trailing = path.ends_with('/');
    let mut segs: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                segs.pop();
            }
            other => segs.push(other),
        }
    }
    let mut out = s!("/");
    out.push_str(&segs.join("/"));
    if trailing && !segs.is_empty() {
        out.push('/');
    }
    out
}
