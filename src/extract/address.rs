use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~.-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*$",
    )
    .expect("address pattern must compile")
});

/// One entry of an address header: optional display name plus the raw address text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mailbox {
    pub name: String,
    pub address: String,
}

impl Mailbox {
    /// Lower-cased domain of a syntactically valid address.
    pub fn domain(&self) -> Option<String> {
        address_domain(&self.address)
    }

    pub fn is_valid(&self) -> bool {
        is_valid_address(&self.address)
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "<{}>", self.address)
        } else {
            write!(f, "\"{}\" <{}>", self.name, self.address)
        }
    }
}

pub fn is_valid_address(address: &str) -> bool {
    ADDRESS_RE.is_match(address)
}

pub fn address_domain(address: &str) -> Option<String> {
    if !is_valid_address(address) {
        return None;
    }
    address
        .rsplit_once('@')
        .map(|(_, domain)| domain.to_ascii_lowercase())
}

/// Splits a header value on commas that sit outside quotes, angle brackets and comments.
pub fn parse_address_list(value: &str) -> Vec<Mailbox> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut angle = 0usize;
    let mut paren = 0usize;
    let mut escaped = false;

    for ch in value.chars() {
        if escaped {
            current.push(ch);
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_quotes => {
                current.push(ch);
                escaped = true;
                continue;
            }
            '"' => in_quotes = !in_quotes,
            '<' if !in_quotes => angle += 1,
            '>' if !in_quotes => angle = angle.saturating_sub(1),
            '(' if !in_quotes => paren += 1,
            ')' if !in_quotes => paren = paren.saturating_sub(1),
            ',' if !in_quotes && angle == 0 && paren == 0 => {
                push_entry(&mut out, &current);
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    push_entry(&mut out, &current);
    out
}

fn push_entry(out: &mut Vec<Mailbox>, raw: &str) {
    let raw = raw.trim();
    if !raw.is_empty() {
        out.push(parse_mailbox(raw));
    }
}

/// `Name <local@domain>`, `<local@domain>`, `local@domain (Name)` or a bare address.
pub fn parse_mailbox(raw: &str) -> Mailbox {
    let raw = raw.trim();
    if let Some(open) = raw.rfind('<') {
        if let Some(len) = raw[open..].find('>') {
            return Mailbox {
                name: clean_display_name(&raw[..open]),
                address: raw[open + 1..open + len].trim().to_string(),
            };
        }
    }
    if let (Some(open), Some(close)) = (raw.find('('), raw.rfind(')')) {
        if open < close {
            let address = format!("{}{}", &raw[..open], &raw[close + 1..]);
            return Mailbox {
                name: clean_display_name(&raw[open + 1..close]),
                address: address.trim().to_string(),
            };
        }
    }
    Mailbox {
        name: String::new(),
        address: raw.to_string(),
    }
}

fn clean_display_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    unquoted.replace("\\\"", "\"").trim().to_string()
}

/// Message-IDs share the addr-spec shape once the angle brackets are gone.
pub fn message_id_domain(value: &str) -> Option<String> {
    let trimmed = value.trim();
    let inner = trimmed
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(trimmed);
    address_domain(inner.trim())
}
