use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Opaque credential cookies, name -> value
pub type Cookies = BTreeMap<String, String>;

/// Load credential cookies from a `name=value` file.
///
/// Pairs are separated by newlines and/or `;` so a copied `Cookie:` header works as-is.
pub fn load_cookies(path: &Path) -> Result<Cookies> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read cookie file {}", path.display()))?;
    Ok(parse_cookies(&text))
}

pub fn parse_cookies(text: &str) -> Cookies {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Render as a `Cookie` header value, `None` when there is nothing to send
pub fn cookie_header(cookies: &Cookies) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }
    let header = cookies
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("; ");
    Some(header)
}
