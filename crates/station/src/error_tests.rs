// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn admission_denied_names_destination_and_period() {
    let err = Error::AdmissionDenied {
        destination: "Nurse".into(),
        period: "3".into(),
        limit: 4,
    };
    assert_eq!(err.to_string(), "Nurse (Period 3): limit of 4 reached");
}

#[test]
fn admin_request_rejected_names_state() {
    let err = Error::AdminRequestRejected {
        action: "unlock",
        state: "unset",
    };
    assert_eq!(err.to_string(), "cannot unlock while admin is unset");
}

#[test]
fn core_errors_keep_their_message() {
    let core = hp_core::Error::InvalidPeriod("9".into());
    let expected = core.to_string();
    let err: Error = core.into();
    assert_eq!(err.to_string(), expected);
}

#[test]
fn import_headers_has_hint() {
    let err = Error::ImportHeaders {
        missing: "period".into(),
    };
    let msg = err.to_string();
    assert!(msg.starts_with("CSV needs: studentId, firstName, lastName, period"));
    assert!(msg.contains("hint: missing period"));
}
