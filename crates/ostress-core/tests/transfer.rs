//! Transfer-and-validate against a local object server.

mod common;

use common::object_server::{refused_url, Canned, ObjectServer};
use ostress_core::transfer::{
    part_path, transfer, TransferOptions, TransferOutcome, TransferRequest, TransferStatus,
};
use std::time::Duration;
use tempfile::tempdir;

fn fixture_body(len: usize) -> Vec<u8> {
    (0u8..251).cycle().take(len).collect()
}

fn options(expected_size: Option<u64>) -> TransferOptions {
    TransferOptions {
        timeout: Duration::from_secs(10),
        connect_timeout: Duration::from_secs(5),
        transport_retries: 1,
        expected_size,
    }
}

#[test]
fn ok_writes_body_byte_for_byte() {
    let body = fixture_body(256 * 1024);
    let server = ObjectServer::start(Canned::ok(body.clone()));
    let dir = tempdir().unwrap();
    let dest = dir.path().join("AG100.v003.h5");

    let outcome = transfer(
        &TransferRequest::new(server.url("AG100.003/AG100.v003.h5"), &dest),
        &options(Some(body.len() as u64)),
    );

    let report = match outcome {
        TransferOutcome::Ok(report) => report,
        other => panic!("expected Ok, got {other:?}"),
    };
    assert_eq!(report.file_size, body.len() as u64);
    assert_eq!(report.content_length, body.len() as u64);
    assert_eq!(report.set_cookie.as_deref(), Some("RGWSESSION=stress; Path=/"));
    assert_eq!(std::fs::read(&dest).unwrap(), body);
    assert!(!part_path(&dest).exists());
    assert_eq!(server.paths(), ["/AG100.003/AG100.v003.h5"]);
}

#[test]
fn ok_overwrites_existing_destination() {
    let body = fixture_body(1000);
    let server = ObjectServer::start(Canned::ok(body.clone()));
    let dir = tempdir().unwrap();
    let dest = dir.path().join("f.h5");
    std::fs::write(&dest, vec![0xffu8; 5000]).unwrap();

    let outcome = transfer(&TransferRequest::new(server.url("f.h5"), &dest), &options(None));

    assert!(outcome.is_ok(), "{outcome:?}");
    assert_eq!(std::fs::read(&dest).unwrap(), body);
}

#[test]
fn missing_cookie_is_not_a_failure() {
    let mut canned = Canned::ok(fixture_body(10));
    canned.set_cookie = None;
    let server = ObjectServer::start(canned);
    let dir = tempdir().unwrap();
    let dest = dir.path().join("f.h5");

    match transfer(&TransferRequest::new(server.url("f.h5"), &dest), &options(Some(10))) {
        TransferOutcome::Ok(report) => assert!(report.set_cookie.is_none()),
        other => panic!("expected Ok, got {other:?}"),
    }
}

#[test]
fn not_found_writes_no_file() {
    let server = ObjectServer::start(Canned::status(404));
    let dir = tempdir().unwrap();
    let dest = dir.path().join("missing.h5");

    let outcome = transfer(&TransferRequest::new(server.url("missing.h5"), &dest), &options(None));

    assert_eq!(outcome, TransferOutcome::NotFound);
    assert_eq!(outcome.status(), TransferStatus::NotFound);
    assert!(!dest.exists());
    assert!(!part_path(&dest).exists());
}

#[test]
fn service_unavailable_is_http_status_without_file() {
    let server = ObjectServer::start(Canned::status(503));
    let dir = tempdir().unwrap();
    let dest = dir.path().join("busy.h5");

    let outcome = transfer(&TransferRequest::new(server.url("busy.h5"), &dest), &options(None));

    assert_eq!(outcome, TransferOutcome::HttpStatus(503));
    assert_eq!(outcome.status(), TransferStatus::ServiceUnavailable);
    assert!(!dest.exists());
    // Statuses are not retried at the transport layer.
    assert_eq!(server.requests().len(), 1);
}

#[test]
fn size_other_than_expected_is_invalid_and_file_kept() {
    let body = fixture_body(4096);
    let server = ObjectServer::start(Canned::ok(body.clone()));
    let dir = tempdir().unwrap();
    let dest = dir.path().join("short.h5");

    let outcome = transfer(
        &TransferRequest::new(server.url("short.h5"), &dest),
        &options(Some(44_042_064)),
    );

    match &outcome {
        TransferOutcome::Invalid(m) => {
            assert_eq!(m.content_length, Some(4096));
            assert_eq!(m.file_size, 4096);
            assert_eq!(m.expected_size, Some(44_042_064));
        }
        other => panic!("expected Invalid, got {other:?}"),
    }
    assert_eq!(outcome.status(), TransferStatus::ServiceUnavailable);
    assert!(outcome.wrote_destination());
    assert_eq!(std::fs::read(&dest).unwrap(), body);
}

#[test]
fn body_shorter_than_content_length_is_invalid_and_file_kept() {
    let body = fixture_body(1000);
    let mut canned = Canned::ok(body.clone());
    canned.content_length = Some(2000);
    let server = ObjectServer::start(canned);
    let dir = tempdir().unwrap();
    let dest = dir.path().join("truncated.h5");

    let opts = TransferOptions {
        transport_retries: 0,
        ..options(None)
    };
    let outcome = transfer(&TransferRequest::new(server.url("truncated.h5"), &dest), &opts);

    match &outcome {
        TransferOutcome::Invalid(m) => {
            assert_eq!(m.content_length, Some(2000));
            assert_eq!(m.file_size, 1000);
            assert_eq!(m.expected_size, None);
        }
        other => panic!("expected Invalid, got {other:?}"),
    }
    assert!(!outcome.is_ok());
    assert_eq!(outcome.status(), TransferStatus::ServiceUnavailable);
    assert_eq!(std::fs::read(&dest).unwrap(), body);
    assert!(!part_path(&dest).exists());
}

#[test]
fn connection_refused_is_transport_after_retries() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("none.h5");

    let outcome = transfer(&TransferRequest::new(refused_url(), &dest), &options(None));

    assert!(matches!(outcome, TransferOutcome::Transport(_)), "{outcome:?}");
    assert_eq!(outcome.status(), TransferStatus::ServiceUnavailable);
    assert!(!dest.exists());
}

#[test]
fn custom_headers_are_sent() {
    let server = ObjectServer::start(Canned::ok(fixture_body(8)));
    let dir = tempdir().unwrap();
    let dest = dir.path().join("h.h5");

    let request = TransferRequest::new(server.url("h.h5"), &dest).with_header("X-Stress-Run", "42");
    assert!(transfer(&request, &options(Some(8))).is_ok());

    let heads = server.requests();
    assert_eq!(heads.len(), 1);
    assert!(heads[0].contains("X-Stress-Run: 42"), "{}", heads[0]);
}
