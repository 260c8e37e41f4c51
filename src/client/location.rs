//! URL query parameters and history snapshots.
//!
//! The reader's deep-link state is two query parameters, `article` and
//! `lang`. Everything else in the query string is carried through untouched
//! so pushing a new history entry never drops unrelated parameters.

use serde::{Deserialize, Serialize};

pub const ARTICLE_PARAM: &str = "article";
pub const LANG_PARAM: &str = "lang";

/// Snapshot attached to a history entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

/// Parsed query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParams {
    pub article: Option<String>,
    pub lang: Option<String>,
    /// Unrelated parameters, in original order.
    pub extra: Vec<(String, String)>,
}

impl UrlParams {
    /// Parse `?a=1&b=2` or `a=1&b=2`. Empty values count as absent.
    pub fn parse(query: &str) -> Self {
        let mut params = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = percent_decode(key);
            let value = percent_decode(value);
            match key.as_str() {
                ARTICLE_PARAM => params.article = Some(value).filter(|v| !v.is_empty()),
                LANG_PARAM => params.lang = Some(value).filter(|v| !v.is_empty()),
                _ => params.extra.push((key, value)),
            }
        }
        params
    }

    /// Serialize back to a query string with a leading `?`, or `""` when empty.
    pub fn to_query(&self) -> String {
        let mut pairs: Vec<String> = self
            .extra
            .iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect();
        if let Some(article) = &self.article {
            pairs.push(format!("{ARTICLE_PARAM}={}", percent_encode(article)));
        }
        if let Some(lang) = &self.lang {
            pairs.push(format!("{LANG_PARAM}={}", percent_encode(lang)));
        }
        if pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", pairs.join("&"))
        }
    }
}

fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

/// `+` is a space; malformed escapes are kept literally.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3])
                    .ok()
                    .and_then(|h| u8::from_str_radix(h, 16).ok());
                match hex {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                        continue;
                    }
                    None => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
