#![cfg(feature = "cli")]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use common::CompoundFileBuilder;
use std::process::Command;

const OLECLI_EXE: &str = env!("CARGO_BIN_EXE_olecli");

fn write_fixture(path: &str) {
    CompoundFileBuilder::new()
        .stream("WordDocument", b"Hello, OLE!\x00\x01")
        .stream("\u{5}SummaryInformation", &[0xFE, 0xFF, 0x00, 0x00])
        .stream("ObjectPool/_1/Contents", &(0u8..20).collect::<Vec<_>>())
        .write_to(path)
        .expect("Failed to write fixture");
}

#[test]
fn test_olecli_shows_help() {
    for arg in ["--help", "help", "-h"] {
        // Act
        let output = Command::new(OLECLI_EXE)
            .arg(arg)
            .output()
            .expect("Failed to run olecli");

        // Assert
        assert!(
            output.status.success(),
            "command failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(
            stdout.contains("Usage"),
            "stdout did not look like help text:\n{stdout}"
        );
    }
}

#[test]
fn test_olecli_no_args_fails() {
    let output = Command::new(OLECLI_EXE)
        .output()
        .expect("Failed to run olecli");
    assert!(!output.status.success());
}

#[test]
fn test_olecli_info() {
    // Arrange
    let path = "build/cli1/doc.ole";
    write_fixture(path);

    // Act
    let output = Command::new(OLECLI_EXE)
        .args(["info", path])
        .output()
        .expect("Failed to run olecli");

    // Assert
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("512 byte sectors"), "{stdout}");
    assert!(stdout.contains("Streams:      3"), "{stdout}");
}

#[test]
fn test_olecli_ls() {
    // Arrange
    let path = "build/cli2/doc.ole";
    write_fixture(path);

    // Act
    let output = Command::new(OLECLI_EXE)
        .args(["ls", path])
        .output()
        .expect("Failed to run olecli");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "{stdout}");
    assert!(lines[0].ends_with("WordDocument"));
    assert!(lines[1].ends_with("\\x05SummaryInformation"));
    assert!(lines[2].trim_start().starts_with("20"));
    assert!(lines[2].ends_with("ObjectPool/_1/Contents"));
}

#[test]
fn test_olecli_dump_hex_and_text() {
    // Arrange
    let path = "build/cli3/doc.ole";
    write_fixture(path);

    // Act
    let output = Command::new(OLECLI_EXE)
        .args(["dump", path, "ObjectPool/_1/Contents"])
        .output()
        .expect("Failed to run olecli");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2, "{stdout}");
    assert!(lines[0].starts_with("0000h 00 01 02 03"));
    assert!(lines[1].starts_with("0010h 10 11 12 13"));

    // Act
    let output = Command::new(OLECLI_EXE)
        .args(["dump", path, "worddocument", "--text"])
        .output()
        .expect("Failed to run olecli");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim_end(), "Hello, OLE!..");
}

#[test]
fn test_olecli_errors() {
    // Arrange
    let path = "build/cli4/doc.ole";
    let text_path = "build/cli4/notes.txt";
    write_fixture(path);
    std::fs::write(text_path, "plain text").expect("Failed to write text file");

    let cases: [&[&str]; 4] = [
        &["info", "build/cli4/missing.ole"],
        &["info", text_path],
        &["dump", path, "NoSuchStream"],
        &["dump", path, "ObjectPool"],
    ];

    for args in cases {
        // Act
        let output = Command::new(OLECLI_EXE)
            .args(args)
            .output()
            .expect("Failed to run olecli");

        // Assert
        assert!(!output.status.success(), "expected failure for {args:?}");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.starts_with("Error: "), "{stderr}");
    }
}
