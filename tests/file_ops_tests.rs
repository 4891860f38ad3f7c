// tests/file_ops_tests.rs
mod common;

use std::fs;

use common::{password, setup, wrong_password};
use sealed_vault::consts::MIN_PACKET_LEN;
use sealed_vault::file_ops::*;
use sealed_vault::CoreError;
use tempfile::tempdir;

#[test]
fn test_in_place_roundtrip_of_repeated_bytes() {
    setup();
    let dir = tempdir().unwrap();
    let path = dir.path().join("blob.bin");
    let original = vec![0x5Au8; 10_000];
    fs::write(&path, &original).unwrap();

    assert_eq!(encrypt_file_in_place(&path, &password()).unwrap(), 10_000);
    let sealed = fs::read(&path).unwrap();
    assert_eq!(sealed.len(), MIN_PACKET_LEN + 10_000);
    assert_ne!(&sealed[MIN_PACKET_LEN..], original.as_slice());

    assert_eq!(decrypt_file_in_place(&path, &password()).unwrap(), 10_000);
    assert_eq!(fs::read(&path).unwrap(), original);
}

#[test]
fn test_corrupted_middle_byte_fails_and_leaves_file_alone() {
    setup();
    let dir = tempdir().unwrap();
    let path = dir.path().join("blob.bin");
    fs::write(&path, vec![0x5Au8; 10_000]).unwrap();
    encrypt_file_in_place(&path, &password()).unwrap();

    let mut sealed = fs::read(&path).unwrap();
    let mid = sealed.len() / 2;
    sealed[mid] ^= 0xFF;
    fs::write(&path, &sealed).unwrap();

    let err = decrypt_file_in_place(&path, &password()).unwrap_err();
    assert!(matches!(err, CoreError::Authentication));
    assert_eq!(fs::read(&path).unwrap(), sealed);
}

#[test]
fn test_separate_output_and_wrong_password() {
    setup();
    let dir = tempdir().unwrap();
    let plain = dir.path().join("a.txt");
    let sealed = dir.path().join("a.txt.sage");
    let restored = dir.path().join("restored.txt");
    fs::write(&plain, b"hello file").unwrap();

    assert_eq!(encrypt_file(&plain, &sealed, &password()).unwrap(), 10);
    assert!(matches!(
        decrypt_file(&sealed, &restored, &wrong_password()),
        Err(CoreError::Authentication)
    ));
    assert!(!restored.exists());

    decrypt_file(&sealed, &restored, &password()).unwrap();
    assert_eq!(fs::read(&restored).unwrap(), b"hello file");
}

#[test]
fn test_empty_file_roundtrip() {
    setup();
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty");
    fs::write(&path, b"").unwrap();

    encrypt_file_in_place(&path, &password()).unwrap();
    assert_eq!(fs::metadata(&path).unwrap().len(), MIN_PACKET_LEN as u64);
    decrypt_file_in_place(&path, &password()).unwrap();
    assert!(fs::read(&path).unwrap().is_empty());
}

#[test]
fn test_short_file_is_format_error() {
    setup();
    let dir = tempdir().unwrap();
    let path = dir.path().join("tiny.sage");
    fs::write(&path, b"too short").unwrap();
    assert!(matches!(
        decrypt_file_in_place(&path, &password()),
        Err(CoreError::Format(_))
    ));
}

#[test]
fn test_process_path_toggles() {
    setup();
    let dir = tempdir().unwrap();
    let plain = dir.path().join("notes.md");
    fs::write(&plain, b"# notes").unwrap();

    let sealed = process_path(&plain, &password()).unwrap();
    assert_eq!(sealed, dir.path().join("notes.md.sage"));
    assert!(!plain.exists());

    let back = process_path(&sealed, &password()).unwrap();
    assert_eq!(back, plain);
    assert_eq!(fs::read(&plain).unwrap(), b"# notes");
}

#[test]
fn test_directory_batch_skips_executables() {
    setup();
    let dir = tempdir().unwrap();
    let nested = dir.path().join("sub");
    fs::create_dir(&nested).unwrap();
    fs::write(dir.path().join("a.txt"), b"a").unwrap();
    fs::write(nested.join("b.txt"), b"b").unwrap();
    fs::write(nested.join("tool.exe"), b"MZ").unwrap();

    let report = encrypt_directory(dir.path(), &password()).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.succeeded.len(), 2);
    assert_eq!(report.skipped, vec![nested.join("tool.exe")]);
    assert!(nested.join("b.txt.sage").exists());
    assert!(!nested.join("b.txt").exists());

    let again = encrypt_directory(dir.path(), &password()).unwrap();
    assert!(again.succeeded.is_empty());

    let report = decrypt_directory(dir.path(), &password()).unwrap();
    assert_eq!(report.succeeded.len(), 2);
    assert_eq!(fs::read(nested.join("b.txt")).unwrap(), b"b");
    assert_eq!(fs::read(nested.join("tool.exe")).unwrap(), b"MZ");
}

#[test]
fn test_directory_batch_collects_failures() {
    setup();
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("good.txt"), b"good").unwrap();
    encrypt_directory(dir.path(), &password()).unwrap();
    fs::write(dir.path().join("junk.sage"), b"not a packet").unwrap();

    let report = decrypt_directory(dir.path(), &password()).unwrap();
    assert_eq!(report.succeeded, vec![dir.path().join("good.txt")]);
    assert_eq!(report.failed.len(), 1);
    assert!(matches!(report.failed[0].1, CoreError::Format(_)));
    assert!(dir.path().join("junk.sage").exists());
}

#[test]
fn test_missing_directory_is_not_found() {
    setup();
    let dir = tempdir().unwrap();
    assert!(matches!(
        encrypt_directory(dir.path().join("nope"), &password()),
        Err(CoreError::NotFound(_))
    ));
}
