use crate::extract::ExtractError;

/// Message header fields in file order. Names keep their original case; lookups ignore it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: Vec<(String, String)>,
}

impl Headers {
    /// First value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Value of `name`, treating a blank field like a missing one.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.trim().is_empty())
    }
}

/// Parses the header block of a message. Parsing stops at the first empty line; the body is
/// never read.
///
/// Continuation lines (leading space or tab) are unfolded into the previous field. A leading
/// mbox `From ` envelope line is skipped. Lines that are neither fields nor continuations are
/// ignored.
pub fn parse_headers(raw: &str) -> Result<Headers, ExtractError> {
    let mut fields: Vec<(String, String)> = Vec::new();
    let mut skipped = 0usize;

    for (idx, line) in raw.lines().enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            break;
        }
        if idx == 0 && line.starts_with("From ") {
            continue;
        }
        if line.starts_with(' ') || line.starts_with('\t') {
            match fields.last_mut() {
                Some((_, value)) => {
                    value.push(' ');
                    value.push_str(line.trim());
                }
                None => skipped += 1,
            }
            continue;
        }
        match line.split_once(':') {
            Some((name, value)) if is_field_name(name) => {
                fields.push((name.to_string(), value.trim().to_string()));
            }
            _ => skipped += 1,
        }
    }

    if fields.is_empty() {
        return Err(ExtractError::NoHeaders);
    }
    if skipped > 0 {
        tracing::debug!(skipped, "ignored malformed header lines");
    }
    Ok(Headers { fields })
}

fn is_field_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| (33..=126).contains(&b) && b != b':')
}
