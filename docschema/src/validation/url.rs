use regex::Regex;
use std::sync::OnceLock;

/// Longest URL accepted, matching common browser limits.
pub const MAX_URL_LENGTH: usize = 2083;

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?P<scheme>[A-Za-z][A-Za-z0-9+.\-]*)://(?:(?P<userinfo>[^\s/?#@]+)@)?(?P<host>\[[0-9A-Fa-f:.]+\]|[^\s/?#:@\[\]]+)(?::(?P<port>[0-9]{1,5}))?(?P<rest>[/?#]\S*)?$",
        )
        .expect("static regex must compile")
    })
}

/// Check that `input` is an absolute http(s) URL and return its normal form.
///
/// Scheme and host are lower-cased, a default port is dropped, and an empty
/// path becomes `/`. Normalizing an already-normal URL returns it unchanged.
pub fn normalize_http_url(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() || input.len() > MAX_URL_LENGTH {
        return None;
    }

    let caps = url_pattern().captures(input)?;
    let scheme = caps["scheme"].to_ascii_lowercase();
    let default_port = match scheme.as_str() {
        "http" => 80,
        "https" => 443,
        _ => return None,
    };

    let host = caps["host"].to_ascii_lowercase();
    if !host.starts_with('[') && host.split('.').any(|label| label.is_empty()) {
        return None;
    }

    let port = match caps.name("port") {
        Some(p) => Some(p.as_str().parse::<u16>().ok()?),
        None => None,
    };

    let mut out = format!("{scheme}://");
    if let Some(userinfo) = caps.name("userinfo") {
        out.push_str(userinfo.as_str());
        out.push('@');
    }
    out.push_str(&host);
    if let Some(port) = port.filter(|p| *p != default_port) {
        out.push_str(&format!(":{port}"));
    }
    match caps.name("rest").map(|r| r.as_str()) {
        Some(rest) if rest.starts_with('/') => out.push_str(rest),
        Some(rest) => {
            out.push('/');
            out.push_str(rest);
        }
        None => out.push('/'),
    }

    // Normalizing can lengthen the URL, so the limit applies to the result.
    if out.len() > MAX_URL_LENGTH {
        return None;
    }

    Some(out)
}
