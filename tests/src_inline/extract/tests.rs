use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::address::{is_valid_address, message_id_domain, parse_address_list, parse_mailbox};
use super::features::{TABLE_COLUMNS, dkim_verdict, flatten, media_type, spf_verdict};
use super::headers::parse_headers;
use super::*;
use crate::input::encode::encode_features;
use crate::input::read_table;
use crate::model::metrics::SPAM;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("hamspam_eval_extract_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

const PHISH: &str = "From bounce@mailer.example  Mon Jul 29 11:28:02 2002\r
Return-Path: <bounce@mailer.example>\r
From: \"Dr. John  Smith\" <john@Bank.example>\r
To: alice@corp.example,\r
 \"Bob, Jr.\" <bob@bank.example>\r
Bcc: hidden@corp.example\r
Reply-To: <claims?id=1@other.example>\r
Subject: =?utf-8?q?Urgent?=\r
Message-ID: <123.456@bank.example>\r
Content-Type: text/HTML; charset=\"utf-8\"\r
Content-Transfer-Encoding: quoted-printable\r
Received-SPF: softfail (domain of transitioning)\r
Authentication-Results: mx.example;\r
\tdkim=pass header.d=bank.example\r
\r
Body: not a header\r
";

#[test]
fn test_parse_headers_unfolds() {
    let headers = parse_headers(PHISH).unwrap();
    assert_eq!(headers.get("to"), Some("alice@corp.example, \"Bob, Jr.\" <bob@bank.example>"));
    assert_eq!(
        headers.get("AUTHENTICATION-RESULTS"),
        Some("mx.example; dkim=pass header.d=bank.example")
    );
    assert!(headers.get("Body").is_none());
    assert!(headers.get("From").is_some());
}

#[test]
fn test_parse_headers_rejects_headerless() {
    assert!(matches!(parse_headers(""), Err(ExtractError::NoHeaders)));
    assert!(matches!(
        parse_headers("just some text\nwithout fields\n"),
        Err(ExtractError::NoHeaders)
    ));
}

#[test]
fn test_address_list_respects_quotes() {
    let list = parse_address_list("alice@corp.example, \"Bob, Jr.\" <bob@bank.example>, (x) ");
    assert_eq!(list.len(), 3);
    assert_eq!(list[0].address, "alice@corp.example");
    assert_eq!(list[1].name, "Bob, Jr.");
    assert_eq!(list[1].address, "bob@bank.example");

    let commented = parse_mailbox("carol@corp.example (Carol C)");
    assert_eq!(commented.name, "Carol C");
    assert_eq!(commented.address, "carol@corp.example");
}

#[test]
fn test_address_validation() {
    assert!(is_valid_address("john.smith+tag@mail.example.org"));
    assert!(!is_valid_address("john smith@example.org"));
    assert!(!is_valid_address("no-at-sign"));
    assert!(!is_valid_address("a@-bad.example"));
    assert_eq!(message_id_domain("<1.2@Bank.Example>"), Some("bank.example".to_string()));
    assert_eq!(message_id_domain("no id"), None);
}

#[test]
fn test_verdicts() {
    assert_eq!(spf_verdict("Pass (sender permitted)"), "pass");
    assert_eq!(spf_verdict("softfail"), "softfail");
    assert_eq!(spf_verdict("neutral"), "ok");
    assert_eq!(spf_verdict(""), "ok");
    assert_eq!(dkim_verdict(None), "non-existent");
    assert_eq!(dkim_verdict(Some("x; DKIM=softfail")), "fail");
    assert_eq!(dkim_verdict(Some("x; spf=pass")), "unknown");
    assert_eq!(media_type("Multipart/Alternative; boundary=x"), "multipart/alternative");
}

#[test]
fn test_extract_features_phish() {
    let f = extract_features(&parse_headers(PHISH).unwrap());
    assert!(f.content_transfer_encoding_field);
    assert_eq!(f.content_type, "text/html");
    assert_eq!(f.received_spf, "softfail");
    assert_eq!(f.dkim, "pass");
    assert!(!f.x_mailer_exists);

    assert_eq!(f.from_count_addresses, 1);
    assert_eq!(f.from_header_missing, vec![false]);
    assert_eq!(f.from_has_title, vec![true]);
    assert_eq!(f.from_dn_exists, vec![true]);
    assert_eq!(f.from_dn_whitespaces, vec![3]);
    assert_eq!(f.from_dn_count_special_chars, vec![2]);
    assert_eq!(f.from_domain_equal_messageid_domain, vec![true]);
    assert_eq!(f.from_domain_equal_to_domain, vec![false, true]);
    assert_eq!(f.from_dn_has_nonascii, vec![false]);
    assert_eq!(f.from_address_equal_to_address, vec![false, false]);
    assert_eq!(f.from_address_equal_reply_address, vec![false]);

    assert!(!f.reply_to_empty);
    assert!(f.reply_to_questionmark);
    assert_eq!(f.to_count_addresses, 2);
    assert!(!f.to_undisclosed);
    assert!(!f.to_empty);
    assert_eq!(f.bcc_count_recepients, 1);
    assert!(f.subject_special_chars);
    assert_eq!(f.total_emailadresses, 4);
}

#[test]
fn test_return_path_substitutes_for_from() {
    let raw = "From: Mailer Daemon\nReturn-Path: <daemon@relay.example>\nTo: undisclosed-recipients:;\nSubject: hi\n\n";
    let f = extract_features(&parse_headers(raw).unwrap());
    assert_eq!(f.from_count_addresses, 1);
    assert_eq!(f.from_address_equal_reply_address, vec![true]);
    assert_eq!(f.from_dn_exists, vec![false]);
    assert!(f.to_undisclosed);
    assert!(f.reply_to_empty);
    assert!(!f.subject_special_chars);
    assert_eq!(f.dkim, "non-existent");
}

#[test]
fn test_no_sender_leaves_lists_empty() {
    let f = extract_features(&parse_headers("Subject: hello\n\n").unwrap());
    assert_eq!(f.from_count_addresses, 0);
    assert!(f.from_has_title.is_empty());
    assert!(f.to_empty);
    assert_eq!(f.total_emailadresses, 0);
}

#[test]
fn test_features_json_keys() {
    let f = extract_features(&parse_headers(PHISH).unwrap());
    let value = serde_json::to_value(&f).unwrap();
    for key in TABLE_COLUMNS {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert_eq!(value["total_emailadresses"], 4);
    assert_eq!(flatten(&f).len(), TABLE_COLUMNS.len());
}

#[test]
fn test_run_extract_directory() {
    let dir = make_temp_dir();
    let msgs = dir.join("msgs");
    fs::create_dir_all(&msgs).unwrap();
    fs::write(msgs.join("a.eml"), PHISH).unwrap();
    fs::write(msgs.join("b.eml"), "From: <x@y.example>\nTo: z@y.example\n\nbody\n").unwrap();
    fs::write(msgs.join("c.eml"), "\n\nonly a body\n").unwrap();
    let table = dir.join("spam.csv");

    let stats = run_extract(&ExtractParams {
        input: &msgs,
        table: Some(&table),
        label: SPAM,
    })
    .unwrap();
    assert_eq!(
        stats,
        ExtractStats {
            messages: 3,
            extracted: 2,
            skipped: 1,
        }
    );
    assert!(features_path(&msgs.join("a.eml")).is_file());
    assert!(!features_path(&msgs.join("c.eml")).exists());

    // Feature files from this run are not picked up as messages on the next one.
    assert_eq!(list_messages(&msgs).unwrap().len(), 3);

    let loaded = read_table(&table).unwrap();
    assert_eq!(loaded.columns.len(), TABLE_COLUMNS.len() + 2);
    assert_eq!(loaded.rows[0][0], "a.eml");
    assert_eq!(loaded.rows[1][TABLE_COLUMNS.len() + 1], "1");
    let matrix = encode_features(&loaded, "Label", &["Fname".to_string()]).unwrap();
    assert_eq!(matrix.feature_names.len(), TABLE_COLUMNS.len());
    assert_eq!(matrix.class_counts(), (0, 2));
}

#[test]
fn test_run_extract_missing_input() {
    let dir = make_temp_dir();
    let err = run_extract(&ExtractParams {
        input: &dir.join("nope"),
        table: None,
        label: SPAM,
    })
    .unwrap_err();
    assert!(matches!(err, ExtractError::MissingInput(_)));
}
