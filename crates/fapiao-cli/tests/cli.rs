use assert_cmd::Command;
use predicates::prelude::*;

const SAMPLE_TEXT: &str = "\
电子发票（普通发票）
发票号码：25339527
开票日期：2025年03月20日
销售方名称：北京快快科技有限公司 统一社会信用代码/纳税人识别号：91110108MA01E8JU7C
*餐饮服务*餐饮服务 390.38 413.80 6% 23.42
价税合计（大写）☒肆佰壹拾叁圆捌角整 (小写)￥413.80";

#[test]
fn parse_outputs_json_record() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("invoice.txt");
    std::fs::write(&input, SAMPLE_TEXT).unwrap();

    let mut cmd = Command::cargo_bin("fapiao").unwrap();
    cmd.arg("parse").arg(&input);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("25339527"))
        .stdout(predicate::str::contains("2025-03-20"))
        .stdout(predicate::str::contains("ELECTRONIC"));
}

#[test]
fn parse_fields_override_text() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("invoice.txt");
    let fields = dir.path().join("invoice.fields.json");
    std::fs::write(&input, SAMPLE_TEXT).unwrap();
    std::fs::write(
        &fields,
        r#"{"InvoiceNum": "99999999", "InvoiceType": "增值税专用发票"}"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("fapiao").unwrap();
    cmd.arg("parse").arg(&input).arg("--fields").arg(&fields);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("99999999"))
        .stdout(predicate::str::contains("VAT_SPECIAL"));
}

#[test]
fn parse_missing_file_fails() {
    let mut cmd = Command::cargo_bin("fapiao").unwrap();
    cmd.arg("parse").arg("/nonexistent/invoice.txt");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn batch_writes_summary_with_duplicate_status() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    std::fs::write(dir.path().join("a.txt"), SAMPLE_TEXT).unwrap();
    std::fs::write(dir.path().join("b.txt"), SAMPLE_TEXT).unwrap();

    let mut cmd = Command::cargo_bin("fapiao").unwrap();
    cmd.arg("batch")
        .arg(format!("{}/*.txt", dir.path().display()))
        .arg("--output-dir")
        .arg(&out)
        .arg("--summary");
    cmd.assert().success();

    let summary = std::fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.contains("success"));
    assert!(summary.contains("duplicate"));
}
