// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn acquire_writes_the_current_pid() {
    let dir = tempfile::tempdir().unwrap();
    let pidfile = PidFile::acquire(dir.path()).unwrap();

    let contents = std::fs::read_to_string(pidfile.path()).unwrap();
    assert_eq!(contents, std::process::id().to_string());
}

#[test]
fn a_second_acquire_on_the_same_directory_fails_while_the_first_is_held() {
    let dir = tempfile::tempdir().unwrap();
    let _first = PidFile::acquire(dir.path()).unwrap();

    let second = PidFile::acquire(dir.path());

    assert!(second.is_err());
}

#[test]
fn dropping_the_pidfile_releases_the_lock_for_a_subsequent_acquire() {
    let dir = tempfile::tempdir().unwrap();
    {
        let _first = PidFile::acquire(dir.path()).unwrap();
    }

    let second = PidFile::acquire(dir.path());

    assert!(second.is_ok());
}
