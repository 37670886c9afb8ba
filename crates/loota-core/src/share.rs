//! Shareable hunt links.
//!
//! Places a hunt token in the `pins` query parameter of a link and pulls it
//! back out. Only the characters of the base64 alphabet that are unsafe in
//! a query value are escaped.

/// Query parameter that carries the hunt token.
pub const PINS_PARAM: &str = "pins";

/// `{base_url}/hunt?pins={token}` with the token percent-encoded.
pub fn hunt_link(base_url: &str, token: &str) -> String {
    format!(
        "{}/hunt?{PINS_PARAM}={}",
        base_url.trim_end_matches('/'),
        escape_token(token)
    )
}

/// Extract and unescape the hunt token from a link, if it carries one.
pub fn token_from_link(link: &str) -> Option<String> {
    let (_, query) = link.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key == PINS_PARAM {
            unescape_token(value)
        } else {
            None
        }
    })
}

pub fn escape_token(token: &str) -> String {
    let mut out = String::with_capacity(token.len() + 8);
    for c in token.chars() {
        match c {
            '+' => out.push_str("%2B"),
            '/' => out.push_str("%2F"),
            '=' => out.push_str("%3D"),
            '%' => out.push_str("%25"),
            _ => out.push(c),
        }
    }
    out
}

/// Reverse percent-encoding. A space is read back as `+`, since form
/// decoding turns an unescaped `+` into a space.
pub fn unescape_token(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = bytes.get(i + 1..i + 3)?;
                if !hex.iter().all(u8::is_ascii_hexdigit) {
                    return None;
                }
                let hex = std::str::from_utf8(hex).ok()?;
                out.push(u8::from_str_radix(hex, 16).ok()?);
                i += 3;
            }
            b' ' => {
                out.push(b'+');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8(out).ok()
}
