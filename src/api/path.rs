use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes left as-is in a path segment; everything else is percent-encoded,
/// `@`, `/` and space included.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Join host, base path and segments into one request URL.
///
/// Redundant slashes at every boundary are trimmed and blank segments are
/// skipped. Without a host the result is root-relative (`/base/...`).
pub fn api_url(host: &str, base: &str, parts: &[&str]) -> String {
    let host = host.trim().trim_end_matches('/');
    let base = base.trim().trim_matches('/');

    let path = parts
        .iter()
        .map(|p| p.trim().trim_matches('/'))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    let full = [host, base, path.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if !host.is_empty() {
        return full;
    }

    collapse_slashes(&format!("/{full}"))
}

/// Percent-encode a value used as a single path segment (e-mails, role codes).
pub fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

fn collapse_slashes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_slash = false;
    for c in s.chars() {
        if c == '/' {
            if !prev_slash {
                out.push(c);
            }
            prev_slash = true;
        } else {
            out.push(c);
            prev_slash = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "impronta/studentesca/official/api";

    #[test]
    fn joins_host_base_and_segments() {
        let url = api_url("http://localhost:8080/", BASE, &["public", "dipartimenti", "all"]);
        assert_eq!(
            url,
            "http://localhost:8080/impronta/studentesca/official/api/public/dipartimenti/all"
        );
    }

    #[test]
    fn trims_redundant_slashes_and_skips_blank_parts() {
        let url = api_url("http://h", "/base/", &["/admin/", "", "  ", "corso/"]);
        assert_eq!(url, "http://h/base/admin/corso");
    }

    #[test]
    fn without_host_is_root_relative() {
        assert_eq!(api_url("", "/base//", &["auth", "login"]), "/base/auth/login");
        assert_eq!(api_url("", "", &["staff", "all"]), "/staff/all");
    }

    #[test]
    fn encodes_email_segment() {
        assert_eq!(encode_segment("mario.rossi@uni.it"), "mario.rossi%40uni.it");
    }

    #[test]
    fn encodes_spaces_and_slashes_for_paths() {
        assert_eq!(encode_segment("anna maria@uni.it"), "anna%20maria%40uni.it");
        assert_eq!(encode_segment("a/b+c"), "a%2Fb%2Bc");
    }
}
