use serde::Serialize;

use crate::extract::address::{Mailbox, message_id_domain, parse_address_list, parse_mailbox};
use crate::extract::headers::Headers;

const TITLES: [&str; 5] = ["mr.", "mrs.", "ms.", "prof.", "dr."];

/// Header-derived features of one message. Serialised keys are the column names of the
/// training tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Featureset {
    #[serde(rename = "Content_Transfer_Encoding_field")]
    pub content_transfer_encoding_field: bool,
    #[serde(rename = "Content_Type")]
    pub content_type: String,
    #[serde(rename = "Received_SPF")]
    pub received_spf: String,
    #[serde(rename = "DKIM")]
    pub dkim: String,
    #[serde(rename = "X_Mailer_exists")]
    pub x_mailer_exists: bool,

    #[serde(rename = "From_count_addresses")]
    pub from_count_addresses: usize,
    #[serde(rename = "From_header_missing")]
    pub from_header_missing: Vec<bool>,
    #[serde(rename = "From_has_title")]
    pub from_has_title: Vec<bool>,
    #[serde(rename = "From_dn_exists")]
    pub from_dn_exists: Vec<bool>,
    #[serde(rename = "From_DN_whitespaces")]
    pub from_dn_whitespaces: Vec<usize>,
    #[serde(rename = "FROM_DOMAIN_EQUAL_MESSAGEID_DOMAIN")]
    pub from_domain_equal_messageid_domain: Vec<bool>,
    #[serde(rename = "FROM_DOMAIN_EQUAL_TO_DOMAIN")]
    pub from_domain_equal_to_domain: Vec<bool>,
    #[serde(rename = "From_DN_has_nonascii")]
    pub from_dn_has_nonascii: Vec<bool>,
    #[serde(rename = "From_address_equal_to_address")]
    pub from_address_equal_to_address: Vec<bool>,
    #[serde(rename = "From_address_equal_reply_address")]
    pub from_address_equal_reply_address: Vec<bool>,
    #[serde(rename = "From_DN_count_special_chars")]
    pub from_dn_count_special_chars: Vec<usize>,

    #[serde(rename = "Reply_TO_empty")]
    pub reply_to_empty: bool,
    #[serde(rename = "Reply_TO_questionmark")]
    pub reply_to_questionmark: bool,

    #[serde(rename = "To_count_addresses")]
    pub to_count_addresses: usize,
    #[serde(rename = "To_undisclosed")]
    pub to_undisclosed: bool,
    #[serde(rename = "To_empty")]
    pub to_empty: bool,
    #[serde(rename = "BCC_count_recepients")]
    pub bcc_count_recepients: usize,

    pub subject_special_chars: bool,
    pub total_emailadresses: usize,
}

pub fn extract_features(headers: &Headers) -> Featureset {
    let to = address_field(headers, "To");
    let bcc = address_field(headers, "Bcc");
    let reply_to = headers
        .non_empty("Reply-To")
        .and_then(|v| parse_address_list(v).into_iter().next());
    let return_path = headers
        .non_empty("Return-Path")
        .map(parse_mailbox)
        .filter(|m| !m.address.is_empty());

    let mut features = Featureset {
        content_transfer_encoding_field: headers.non_empty("Content-Transfer-Encoding").is_some(),
        content_type: media_type(headers.get("Content-Type").unwrap_or_default()),
        received_spf: spf_verdict(headers.get("Received-SPF").unwrap_or_default()).to_string(),
        dkim: dkim_verdict(headers.get("Authentication-Results")).to_string(),
        x_mailer_exists: headers.non_empty("X-Mailer").is_some(),
        reply_to_empty: reply_to.is_none(),
        reply_to_questionmark: reply_to
            .as_ref()
            .is_some_and(|m| m.to_string().contains('?')),
        to_count_addresses: to.len(),
        to_undisclosed: to.len() == 1 && to[0].to_string().to_lowercase().contains("undisclosed"),
        to_empty: to.is_empty(),
        bcc_count_recepients: bcc.len(),
        subject_special_chars: headers
            .get("Subject")
            .is_some_and(|s| s.contains('?') || s.contains('=')),
        ..Featureset::default()
    };

    let senders = sender_mailboxes(headers, return_path.as_ref());
    let message_domain = headers.get("Message-ID").and_then(message_id_domain);
    let mut seen: Vec<&str> = Vec::new();
    for from in &senders {
        let Some(from_domain) = from.domain() else {
            tracing::debug!(address = %from.address, "skipping unparseable sender address");
            continue;
        };
        if !seen.contains(&from.address.as_str()) {
            seen.push(&from.address);
            features.from_count_addresses += 1;
        }

        let name = from.name.to_lowercase();
        features.from_header_missing.push(from.address.is_empty());
        features
            .from_has_title
            .push(TITLES.iter().any(|t| name.contains(t)));
        features.from_dn_exists.push(!name.trim().is_empty());
        features
            .from_dn_whitespaces
            .push(name.chars().filter(|&c| c == ' ').count());

        let rendered = from.to_string();
        features.from_dn_count_special_chars.push(
            rendered
                .chars()
                .filter(|c| matches!(c, '?' | '!' | '<' | '>'))
                .count(),
        );

        features
            .from_domain_equal_messageid_domain
            .push(message_domain.as_deref() == Some(from_domain.as_str()));
        for recipient in &to {
            if let Some(to_domain) = recipient.domain() {
                features
                    .from_domain_equal_to_domain
                    .push(to_domain == from_domain);
            }
        }
        features.from_dn_has_nonascii.push(!from.name.is_ascii());

        let reply_address = reply_to
            .as_ref()
            .or(return_path.as_ref())
            .map_or(from.address.as_str(), |m| m.address.as_str());
        features
            .from_address_equal_reply_address
            .push(from.address.eq_ignore_ascii_case(reply_address));
        for recipient in &to {
            features
                .from_address_equal_to_address
                .push(from.address.eq_ignore_ascii_case(&recipient.address));
        }
    }

    features.total_emailadresses =
        features.from_count_addresses + features.bcc_count_recepients + features.to_count_addresses;
    features
}

/// From mailboxes, with Return-Path standing in when From carries no valid address.
fn sender_mailboxes(headers: &Headers, return_path: Option<&Mailbox>) -> Vec<Mailbox> {
    let mut from = address_field(headers, "From");
    if from.iter().any(Mailbox::is_valid) {
        return from;
    }
    match return_path {
        Some(rp) if from.is_empty() => vec![rp.clone()],
        Some(rp) => {
            from[0] = rp.clone();
            from
        }
        None => Vec::new(),
    }
}

fn address_field(headers: &Headers, name: &str) -> Vec<Mailbox> {
    headers.get_all(name).flat_map(parse_address_list).collect()
}

/// `text/html; charset=utf-8` -> `text/html`
pub fn media_type(value: &str) -> String {
    value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

pub fn spf_verdict(value: &str) -> &'static str {
    let value = value.trim().to_ascii_lowercase();
    if value.starts_with("pass") {
        "pass"
    } else if value.starts_with("fail") {
        "fail"
    } else if value.starts_with("bad") {
        "bad"
    } else if value.starts_with("softfail") {
        "softfail"
    } else {
        "ok"
    }
}

pub fn dkim_verdict(value: Option<&str>) -> &'static str {
    let Some(value) = value else {
        return "non-existent";
    };
    let value = value.to_ascii_lowercase();
    if value.contains("dkim=fail") || value.contains("dkim=softfail") {
        "fail"
    } else if value.contains("dkim=pass") {
        "pass"
    } else {
        "unknown"
    }
}

/// Column names of [`flatten`], in order.
pub const TABLE_COLUMNS: [&str; 23] = [
    "Content_Transfer_Encoding_field",
    "Content_Type",
    "Received_SPF",
    "DKIM",
    "X_Mailer_exists",
    "From_count_addresses",
    "From_header_missing",
    "From_has_title",
    "From_dn_exists",
    "From_DN_whitespaces",
    "FROM_DOMAIN_EQUAL_MESSAGEID_DOMAIN",
    "FROM_DOMAIN_EQUAL_TO_DOMAIN",
    "From_DN_has_nonascii",
    "From_address_equal_to_address",
    "From_address_equal_reply_address",
    "From_DN_count_special_chars",
    "Reply_TO_empty",
    "Reply_TO_questionmark",
    "To_count_addresses",
    "To_undisclosed",
    "To_empty",
    "BCC_count_recepients",
    "subject_special_chars",
];

/// One table row: per-sender lists collapse to "any" (flags) or "sum" (counts).
pub fn flatten(f: &Featureset) -> Vec<String> {
    let any = |v: &[bool]| v.iter().any(|&b| b).to_string();
    let sum = |v: &[usize]| v.iter().sum::<usize>().to_string();
    vec![
        f.content_transfer_encoding_field.to_string(),
        f.content_type.clone(),
        f.received_spf.clone(),
        f.dkim.clone(),
        f.x_mailer_exists.to_string(),
        f.from_count_addresses.to_string(),
        any(&f.from_header_missing),
        any(&f.from_has_title),
        any(&f.from_dn_exists),
        sum(&f.from_dn_whitespaces),
        any(&f.from_domain_equal_messageid_domain),
        any(&f.from_domain_equal_to_domain),
        any(&f.from_dn_has_nonascii),
        any(&f.from_address_equal_to_address),
        any(&f.from_address_equal_reply_address),
        sum(&f.from_dn_count_special_chars),
        f.reply_to_empty.to_string(),
        f.reply_to_questionmark.to_string(),
        f.to_count_addresses.to_string(),
        f.to_undisclosed.to_string(),
        f.to_empty.to_string(),
        f.bcc_count_recepients.to_string(),
        f.subject_special_chars.to_string(),
    ]
}
