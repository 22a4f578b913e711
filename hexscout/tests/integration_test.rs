use anyhow::Result;
use hexscout::{
    pattern::check_all, run, search, ByteBuffer, MatchSpan, ResultReport, SearchConfig,
    SearchError,
};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn workers(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

fn write_inputs(dir: &TempDir, binary: &[u8], patterns: &str) -> Result<(PathBuf, PathBuf)> {
    let bin = dir.path().join("target.bin");
    let pat = dir.path().join("patterns.json");
    fs::write(&bin, binary)?;
    fs::write(&pat, patterns)?;
    Ok((bin, pat))
}

fn spans(report: &ResultReport, pattern: &str) -> Vec<(usize, usize)> {
    report
        .get(pattern)
        .unwrap_or_default()
        .iter()
        .map(|s| (s.start, s.end))
        .collect()
}

fn search_files(bin: &Path, pat: &Path, threads: usize) -> hexscout::SearchResult<ResultReport> {
    let mut config = SearchConfig::new(bin, pat);
    config.worker_count = workers(threads);
    search(&config)
}

#[test]
fn test_literal_pattern() -> Result<()> {
    let report = run(&["AABB"], &[0xAA, 0xBB, 0xCC, 0xAA, 0xBB], workers(2))?;
    assert_eq!(spans(&report, "AABB"), vec![(0, 2), (3, 5)]);
    Ok(())
}

#[test]
fn test_group_repetition() -> Result<()> {
    let report = run(&["AA(BB)+"], &[0xAA, 0xBB, 0xBB, 0xCC], workers(2))?;
    assert_eq!(spans(&report, "AA(BB)+"), vec![(0, 3)]);
    Ok(())
}

#[test]
fn test_bounded_repeat() -> Result<()> {
    let report = run(&["AA{2,3}"], &[0xAA, 0xAA, 0xAA, 0xAA], workers(2))?;
    assert_eq!(spans(&report, "AA{2,3}"), vec![(0, 3)]);
    Ok(())
}

#[test]
fn test_non_hex_pattern_rejected() {
    let err = run(&["ZZ"], &[0x00], workers(1)).unwrap_err();
    assert!(matches!(err, SearchError::InvalidFormat(ref p) if p == "ZZ"));
}

#[test]
fn test_empty_pattern_list_from_file() -> Result<()> {
    let dir = tempdir()?;
    let (bin, pat) = write_inputs(&dir, &[0xAA, 0xBB], "[]")?;
    let report = search_files(&bin, &pat, 4)?;
    assert!(report.is_empty());
    assert_eq!(report.to_json()?, "{}");
    Ok(())
}

#[test]
fn test_full_pipeline_json() -> Result<()> {
    let dir = tempdir()?;
    let mut binary = vec![0u8; 64];
    binary[0x10..0x14].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
    binary[0x30..0x34].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
    let (bin, pat) = write_inputs(&dir, &binary, r#"["DEADBEEF", "CAFE", "ADBE?EF"]"#)?;

    let report = search_files(&bin, &pat, 2)?;
    assert_eq!(
        report.to_json()?,
        r#"{"DEADBEEF":[["0x10","0x14"],["0x30","0x34"]],"ADBE?EF":[["0x11","0x14"],["0x31","0x34"]]}"#
    );
    assert_eq!(report.patterns_searched, 3);
    assert_eq!(report.bytes_scanned, 64);
    Ok(())
}

#[test]
fn test_pipeline_is_idempotent() -> Result<()> {
    let dir = tempdir()?;
    let binary: Vec<u8> = (0..50_000u32).map(|i| (i % 253) as u8 ^ (i >> 8) as u8).collect();
    let (bin, pat) = write_inputs(
        &dir,
        &binary,
        r#"["0001", "(10,11)+", "[FEFD]{2}", "7F?80", "^00"]"#,
    )?;

    let first = search_files(&bin, &pat, 4)?;
    let second = search_files(&bin, &pat, 4)?;
    assert_eq!(first.as_map(), second.as_map());
    Ok(())
}

#[test]
fn test_worker_count_does_not_change_results() -> Result<()> {
    let binary: Vec<u8> = (0..100_000u32).map(|i| (i.wrapping_mul(2654435761) >> 24) as u8).collect();
    let buffer = ByteBuffer::from(binary);
    let patterns: Vec<String> = (0..64u32).map(|i| format!("{:02X}[00FF]?", i * 4)).collect();

    let single = run(&patterns, &buffer, workers(1))?;
    let many = run(&patterns, &buffer, workers(16))?;
    assert_eq!(single.as_map(), many.as_map());
    assert_eq!(single.total_matches, many.total_matches);
    Ok(())
}

#[test]
fn test_fail_fast_on_invalid_pattern() -> Result<()> {
    let dir = tempdir()?;
    let (bin, pat) = write_inputs(&dir, &[0xAA], r#"["AA", "AA(", "ZZ"]"#)?;
    let err = search_files(&bin, &pat, 2).unwrap_err();
    assert!(matches!(err, SearchError::InvalidRegexSyntax { ref pattern, .. } if pattern == "AA("));
    Ok(())
}

#[test]
fn test_check_all_reports_each_invalid_pattern() {
    let errors = check_all(&["AA", "AA(", "ZZ", "B"]);
    assert_eq!(errors.len(), 3);
}

#[test]
fn test_container_errors() -> Result<()> {
    let dir = tempdir()?;
    let (bin, pat) = write_inputs(&dir, &[0xAA], r#"{"AA": "label"}"#)?;
    let err = search_files(&bin, &pat, 1).unwrap_err();
    assert!(matches!(err, SearchError::InvalidContainerFormat(_)));

    fs::write(&pat, "not json")?;
    let err = search_files(&bin, &pat, 1).unwrap_err();
    assert!(matches!(err, SearchError::JsonError(_)));
    Ok(())
}

#[test]
fn test_missing_inputs() -> Result<()> {
    let dir = tempdir()?;
    let (bin, pat) = write_inputs(&dir, &[0xAA], r#"["AA"]"#)?;

    let err = search_files(&dir.path().join("nope.bin"), &pat, 1).unwrap_err();
    assert!(matches!(err, SearchError::FileNotFound(_)));

    let err = search_files(&bin, &dir.path().join("nope.json"), 1).unwrap_err();
    assert!(matches!(err, SearchError::FileNotFound(_)));
    Ok(())
}

#[test]
fn test_high_bytes_are_not_utf8_decoded() -> Result<()> {
    // "é" is C3 A9; searching for A9 alone must still hit.
    let report = run(&["A9", "C3A9"], "café".as_bytes(), workers(2))?;
    assert_eq!(report.get("A9"), Some(&[MatchSpan::new(4, 5)][..]));
    assert_eq!(report.get("C3A9"), Some(&[MatchSpan::new(3, 5)][..]));
    Ok(())
}
