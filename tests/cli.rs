use slice_oracle::cache::AnswerRecord;
use slice_oracle::pipeline::EncodedBlob;
use slice_oracle::MetaReport;
use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::tempdir;

fn oracle_command() -> Command {
    Command::new(env!("CARGO_BIN_EXE_slice-oracle"))
}

fn run(args: &[&str]) -> Result<Output, Box<dyn Error>> {
    Ok(oracle_command().args(args).output()?)
}

fn run_with_stdin(args: &[&str], input: &[u8]) -> Result<Output, Box<dyn Error>> {
    let mut child = oracle_command()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    child.stdin.take().ok_or("stdin not captured")?.write_all(input)?;
    Ok(child.wait_with_output()?)
}

fn write_table(path: &Path) -> Result<(), Box<dyn Error>> {
    let records = vec![
        AnswerRecord::for_input("1 2\n", Some("3\n".into())),
        AnswerRecord::for_input("delegate\n", None),
    ];
    fs::write(path, serde_json::to_vec(&records)?)?;
    Ok(())
}

fn build_manifest(table: &Path, output: &Path, mode_args: &[&str]) -> Result<(), Box<dyn Error>> {
    let mut args = vec!["manifest", table.to_str().unwrap(), output.to_str().unwrap()];
    args.extend_from_slice(mode_args);
    let out = run(&args)?;
    assert!(
        out.status.success(),
        "manifest command failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    Ok(())
}

#[test]
fn version_flag_prints_build_information() -> Result<(), Box<dyn Error>> {
    let output = run(&["--version"])?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.starts_with("slice-oracle "), "unexpected version line: {}", stdout);
    assert!(stdout.contains("build"), "version output should include build value: {}", stdout);
    Ok(())
}

#[test]
fn running_without_subcommand_displays_help() -> Result<(), Box<dyn Error>> {
    let output = run(&[])?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Usage: slice-oracle"), "help output missing usage: {}", stdout);
    assert!(stdout.contains("Commands:"), "help output missing command list: {}", stdout);
    Ok(())
}

#[test]
fn run_answers_known_input_verbatim() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let table = dir.path().join("answers.json");
    let manifest = dir.path().join("chunk-0.json");
    write_table(&table)?;
    build_manifest(&table, &manifest, &["--offset", "0"])?;

    let output = run_with_stdin(&["run", manifest.to_str().unwrap()], b"1 2\n")?;
    assert!(output.status.success());
    assert_eq!(output.stdout, b"3\n");

    // Delegate with no solver configured prints nothing and no window
    let output = run_with_stdin(&["run", manifest.to_str().unwrap()], b"delegate\n")?;
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    Ok(())
}

#[cfg(unix)]
#[test]
fn run_delegates_to_solver_command() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let table = dir.path().join("answers.json");
    let manifest = dir.path().join("chunk-0.json");
    write_table(&table)?;
    build_manifest(&table, &manifest, &["--offset", "0", "--solver", "tr", "a-z", "A-Z"])?;

    let output = run_with_stdin(&["run", manifest.to_str().unwrap()], b"delegate\n")?;
    assert!(
        output.status.success(),
        "run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(output.stdout, b"DELEGATE\n");
    Ok(())
}

#[test]
fn run_emits_windows_for_unknown_input() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let table = dir.path().join("answers.json");
    write_table(&table)?;

    let input = "hello\n";
    let blob = EncodedBlob::from_input(input, Default::default())?;

    let first = dir.path().join("chunk-0.json");
    build_manifest(&table, &first, &["--offset", "0", "--size", "10"])?;
    let output = run_with_stdin(&["run", first.to_str().unwrap()], input.as_bytes())?;
    assert_eq!(String::from_utf8(output.stdout)?, &blob.encoded[..10]);

    let beyond = dir.path().join("chunk-500.json");
    build_manifest(&table, &beyond, &["--offset", "500"])?;
    let output = run_with_stdin(&["run", beyond.to_str().unwrap()], input.as_bytes())?;
    assert!(output.status.success());
    assert!(output.stdout.is_empty(), "window past the end must be empty");
    Ok(())
}

#[test]
fn meta_plan_assemble_end_to_end() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let table = dir.path().join("answers.json");
    write_table(&table)?;
    let input = "4\n10 20 30 40\nsome trailing text that is not cached\n".repeat(8);
    let size = 24;

    // Meta instance
    let meta_manifest = dir.path().join("meta.json");
    build_manifest(&table, &meta_manifest, &["--meta"])?;
    let meta = run_with_stdin(&["run", meta_manifest.to_str().unwrap()], input.as_bytes())?;
    assert!(meta.status.success());
    let meta_out = dir.path().join("meta.out");
    fs::write(&meta_out, &meta.stdout)?;
    let report = MetaReport::parse(&String::from_utf8(meta.stdout)?)?;
    assert!(report.is_consistent());

    // Plan offsets from the meta output
    let size_arg = size.to_string();
    let plan = run(&["plan", meta_out.to_str().unwrap(), "--size", &size_arg])?;
    assert!(plan.status.success());
    let offsets: Vec<usize> = String::from_utf8(plan.stdout)?
        .lines()
        .map(|l| l.parse())
        .collect::<Result<_, _>>()?;
    assert_eq!(offsets.len(), report.encoded_length.div_ceil(size));

    // One chunk instance per offset
    let mut chunk_args = Vec::new();
    for offset in &offsets {
        let manifest = dir.path().join(format!("chunk-{}.json", offset));
        let offset_arg = offset.to_string();
        build_manifest(&table, &manifest, &["--offset", &offset_arg, "--size", &size_arg])?;
        let output = run_with_stdin(&["run", manifest.to_str().unwrap()], input.as_bytes())?;
        let saved = dir.path().join(format!("chunk-{}.out", offset));
        fs::write(&saved, &output.stdout)?;
        chunk_args.push(format!("{}:{}", offset, saved.display()));
    }

    let recovered = dir.path().join("recovered.txt");
    let mut args = vec![
        "assemble".to_string(),
        meta_out.display().to_string(),
        recovered.display().to_string(),
    ];
    for chunk in &chunk_args {
        args.push("--chunk".into());
        args.push(chunk.clone());
    }
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let assemble = run(&args)?;
    assert!(
        assemble.status.success(),
        "assemble failed: {}",
        String::from_utf8_lossy(&assemble.stderr)
    );
    assert_eq!(fs::read_to_string(&recovered)?, input);
    Ok(())
}

#[test]
fn assemble_reports_missing_windows() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = "incomplete\n";
    let blob = EncodedBlob::from_input(input, Default::default())?;
    let meta_out = dir.path().join("meta.out");
    fs::write(&meta_out, MetaReport::from_blob(input, &blob).render())?;
    let chunk = dir.path().join("chunk-0.out");
    fs::write(&chunk, &blob.encoded[..8])?;

    let chunk_arg = format!("0:{}", chunk.display());
    let recovered = dir.path().join("recovered.txt");
    let output = run(&[
        "assemble",
        meta_out.to_str().unwrap(),
        recovered.to_str().unwrap(),
        "--chunk",
        &chunk_arg,
    ])?;
    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr)?.contains("not covered"));
    assert!(!recovered.exists());
    Ok(())
}

#[test]
fn inspect_reports_sizes() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("input.txt");
    fs::write(&input, b"hello\n")?;

    let output = run(&["inspect", input.to_str().unwrap()])?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Input length: 6 chars"));
    assert!(stdout.contains(
        "Fingerprint (hex): 5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03"
    ));
    Ok(())
}

#[test]
fn manifest_requires_offset_or_meta() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let table = dir.path().join("answers.json");
    write_table(&table)?;
    let output = run(&[
        "manifest",
        table.to_str().unwrap(),
        dir.path().join("out.json").to_str().unwrap(),
    ])?;
    assert!(!output.status.success());
    Ok(())
}

#[test]
fn run_accepts_non_utf8_input() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let table = dir.path().join("answers.json");
    write_table(&table)?;
    let manifest = dir.path().join("chunk-0.json");
    build_manifest(&table, &manifest, &["--offset", "0"])?;

    let output = run_with_stdin(&["run", manifest.to_str().unwrap()], b"caf\xe9\n")?;
    assert!(output.status.success());
    let blob = EncodedBlob::from_input("caf\u{FFFD}\n", Default::default())?;
    assert_eq!(String::from_utf8(output.stdout)?, blob.encoded);
    Ok(())
}

#[test]
fn assemble_rejects_corrupt_meta() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let meta_out = dir.path().join("meta.out");
    fs::write(&meta_out, "1\n18446744073709551615\n3\nabc=\n")?;
    let chunk = dir.path().join("chunk-0.out");
    fs::write(&chunk, "AAAA")?;

    let chunk_arg = format!("0:{}", chunk.display());
    let recovered = dir.path().join("recovered.txt");
    let output = run(&[
        "assemble",
        meta_out.to_str().unwrap(),
        recovered.to_str().unwrap(),
        "--chunk",
        &chunk_arg,
    ])?;
    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr)?.contains("inconsistent"));
    assert!(!recovered.exists());
    Ok(())
}

#[test]
fn record_moves_meta_round_to_next_input() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let table = dir.path().join("answers.json");
    write_table(&table)?;
    let catalogue = dir.path().join("catalogue.json");
    let meta_manifest = dir.path().join("meta.json");
    build_manifest(&table, &meta_manifest, &["--meta"])?;

    let first = "first hidden input\n";
    let second = "second hidden input\n";

    let meta = run_with_stdin(&["run", meta_manifest.to_str().unwrap()], first.as_bytes())?;
    let meta_out = dir.path().join("meta-1.out");
    fs::write(&meta_out, &meta.stdout)?;

    let recovered = dir.path().join("first.in");
    fs::write(&recovered, first)?;
    let output = run(&[
        "record",
        catalogue.to_str().unwrap(),
        meta_out.to_str().unwrap(),
        "--input",
        recovered.to_str().unwrap(),
        "--table",
        table.to_str().unwrap(),
    ])?;
    assert!(
        output.status.success(),
        "record failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8(output.stdout)?.contains("Wrote 3 answers"));

    // Rebuilt instances delegate the recorded input and report the next one
    build_manifest(&table, &meta_manifest, &["--meta"])?;
    let known = run_with_stdin(&["run", meta_manifest.to_str().unwrap()], first.as_bytes())?;
    assert!(known.status.success());
    assert!(known.stdout.is_empty());
    let next = run_with_stdin(&["run", meta_manifest.to_str().unwrap()], second.as_bytes())?;
    let report = MetaReport::parse(&String::from_utf8(next.stdout)?)?;
    assert_eq!(report.fingerprint, slice_oracle::fingerprint(second));
    Ok(())
}
