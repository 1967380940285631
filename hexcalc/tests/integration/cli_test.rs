use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CAUSE: &str = "0 cause\n11\n16 addr\n1 addr_valid\n4 errcode\n0\n";

/// Builds a calculator command which keeps its line history inside `dir`.
fn hexcalc(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("hexcalc").unwrap();
    cmd.arg("-i").arg(dir.join("history")).args(args);
    cmd
}

#[test]
fn cli_prints_intro_and_quits() {
    let dir = TempDir::new().unwrap();
    hexcalc(dir.path(), &[])
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Think of this calculator"));
}

#[test]
fn cli_end_of_input_quits() {
    let dir = TempDir::new().unwrap();
    hexcalc(dir.path(), &[])
        .write_stdin("p\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("decimal: 0"));
}

#[test]
fn cli_invert_and_variable_width() {
    let dir = TempDir::new().unwrap();
    hexcalc(dir.path(), &[])
        .write_stdin("ff\ni 0 7\nw 0\nw\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("decimal: 255"))
        .stdout(predicate::str::contains("    bin: 0000 0000 0000 0000 0000 0000 0000 0000"))
        .stdout(predicate::str::contains("    hex:    0\n"))
        .stdout(predicate::str::contains("variable"));
}

#[test]
fn cli_reports_errors_and_continues() {
    let dir = TempDir::new().unwrap();
    hexcalc(dir.path(), &[])
        .write_stdin("i 40\nw -1\nxyz\n= 1\n'd12\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "error: inversion limits 40..40 are out of range for 32 bits",
        ))
        .stdout(predicate::str::contains("error: argument(s) must be positive integer(s)"))
        .stdout(predicate::str::contains(
            "error: hexadecimal string 'xyz' contains illegal characters",
        ))
        .stdout(predicate::str::contains("error: no permanently highlighted bits"))
        .stdout(predicate::str::contains("decimal: 12"));
}

#[test]
fn cli_undo_history() {
    let dir = TempDir::new().unwrap();
    hexcalc(dir.path(), &[])
        .write_stdin("1\n2\nH\nU 3\nU\nu\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "undo history:\n   00000000  wd(8)  idx\n   00000001  wd(8)  idx\n\
             -> 00000002  wd(8)  idx",
        ))
        .stdout(predicate::str::contains("undo history capacity set to 3\n"))
        .stdout(predicate::str::contains("error: no more undo history"));
}

#[test]
fn cli_highlighting() {
    let dir = TempDir::new().unwrap();
    hexcalc(dir.path(), &["-w", "2"])
        .write_stdin("2f\nl 5 2\nL 3 0\n= 'b1\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("highlighted bin: 1011"))
        .stdout(predicate::str::contains("highlighted hex: 1"))
        .stdout(predicate::str::contains("decimal: 33"));
}

#[test]
fn cli_autoloads_specs_file() {
    let dir = TempDir::new().unwrap();
    let specs = dir.path().join("regs.txt");
    fs::write(&specs, CAUSE).unwrap();

    hexcalc(dir.path(), &[specs.to_str().unwrap()])
        .write_stdin("7\ns cause\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Autoloading specs file"))
        .stdout(predicate::str::contains("available register definitions:\n    cause"))
        .stdout(predicate::str::contains("   errcode [ 3.. 0] = 0111"));
}

#[test]
fn cli_bad_specs_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let specs = dir.path().join("bad.txt");
    fs::write(&specs, "0 a\n3 x\n0\n").unwrap();

    hexcalc(dir.path(), &[specs.to_str().unwrap()])
        .write_stdin("s\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Failed to load specs file"))
        .stdout(predicate::str::contains("is not divisible by 4"))
        .stdout(predicate::str::contains("error: need to load register specs first"));
}

#[test]
fn cli_saves_line_history() {
    let dir = TempDir::new().unwrap();
    hexcalc(dir.path(), &[])
        .write_stdin("ff\ni 0 3\nq\n")
        .assert()
        .success();

    let history = fs::read_to_string(dir.path().join("history")).unwrap();
    assert!(history.contains("i 0 3"));
}

#[test]
fn cli_rejects_unsupported_width() {
    let dir = TempDir::new().unwrap();
    hexcalc(dir.path(), &["-w", "17"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("width 17 is not supported"));
}
