use std::io::Write;
use std::process::{Command, Output, Stdio};

fn run(bin: &str, args: &[&str], stdin: &[u8]) -> Output {
    let mut child = Command::new(bin)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(stdin).unwrap();
    child.wait_with_output().unwrap()
}

fn split_bin(args: &[&str], stdin: &[u8]) -> Output {
    run(env!("CARGO_BIN_EXE_shamir-split"), args, stdin)
}

fn combine_bin(args: &[&str], stdin: &[u8]) -> Output {
    run(env!("CARGO_BIN_EXE_shamir-combine"), args, stdin)
}

#[test]
fn split_then_combine() {
    let out = split_bin(
        &["-t", "3", "-n", "5", "-w", "cli", "-q", "--random", "/dev/urandom"],
        b"password\n",
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let text = String::from_utf8(out.stdout).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines.iter().all(|l| l.starts_with("cli-")));

    // extra lines after the threshold are never read
    let input = format!("{}\n{}\n{}\nnot a share\n", lines[4], lines[0], lines[2]);
    let out = combine_bin(&["-t", "3", "-q"], input.as_bytes());
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "password\n");
}

#[test]
fn unreadable_share_line_is_reported() {
    let out = combine_bin(&["-t", "2", "-q"], b"1-41\n\xff\xfe-47\n");
    assert!(!out.status.success());
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("reading shares"), "{}", err);
    assert!(!err.contains("missing share"), "{}", err);
}

#[test]
fn short_input_reports_missing_share() {
    let out = combine_bin(&["-t", "3", "-D", "-q"], b"1-41\n2-47\n");
    assert!(!out.status.success());
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("missing share 3 of 3"), "{}", err);
}
