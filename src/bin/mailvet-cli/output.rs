use anyhow::Result;
use mailvet::{ValidationResult, VerdictStatus};

/// Dispatch d'un lot de résultats vers le format demandé.
pub fn emit(rows: &[ValidationResult], format: &str, out: Option<&str>) -> Result<()> {
    match format {
        "human" => emit_human(rows, out),
        "json" => emit_json(rows, out),
        "ndjson" => emit_ndjson(rows, out),
        "csv" => emit_csv(rows, out),
        other => anyhow::bail!("format inconnu '{other}' (attendu: human|json|ndjson|csv)"),
    }
}

fn emit_human(rows: &[ValidationResult], out: Option<&str>) -> Result<()> {
    let mut report = String::new();
    for row in rows {
        match row.status {
            VerdictStatus::Valid => report.push_str(&format!("[OK]      {}\n", row.address)),
            status => {
                let label = status.to_string().to_uppercase();
                report.push_str(&format!("[{label}] {} :: {}\n", row.address, row.reason));
            }
        }
    }
    write_or_print(report.as_bytes(), out, false)
}

#[cfg(feature = "with-serde")]
fn emit_json(rows: &[ValidationResult], out: Option<&str>) -> Result<()> {
    let payload = serde_json::to_string_pretty(rows)?;
    write_or_print(payload.as_bytes(), out, true)
}

#[cfg(not(feature = "with-serde"))]
fn emit_json(_rows: &[ValidationResult], _out: Option<&str>) -> Result<()> {
    anyhow::bail!("format=json nécessite la feature 'with-serde'")
}

#[cfg(feature = "with-serde")]
fn emit_ndjson(rows: &[ValidationResult], out: Option<&str>) -> Result<()> {
    let mut payload = String::new();
    for row in rows {
        payload.push_str(&serde_json::to_string(row)?);
        payload.push('\n');
    }
    write_or_print(payload.as_bytes(), out, false)
}

#[cfg(not(feature = "with-serde"))]
fn emit_ndjson(_rows: &[ValidationResult], _out: Option<&str>) -> Result<()> {
    anyhow::bail!("format=ndjson nécessite la feature 'with-serde'")
}

#[cfg(feature = "with-csv")]
fn emit_csv(rows: &[ValidationResult], out: Option<&str>) -> Result<()> {
    let payload = csv_bytes(rows)?;
    write_or_print(&payload, out, false)
}

#[cfg(not(feature = "with-csv"))]
fn emit_csv(_rows: &[ValidationResult], _out: Option<&str>) -> Result<()> {
    anyhow::bail!("format=csv nécessite la feature 'with-csv'")
}

#[cfg(feature = "with-csv")]
fn csv_bytes(rows: &[ValidationResult]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Email", "Status", "Message"])?;
    for row in rows {
        let status = row.status.to_string();
        writer.write_record([row.address.as_str(), status.as_str(), row.reason.as_str()])?;
    }
    Ok(writer.into_inner()?)
}

fn write_or_print(bytes: &[u8], out: Option<&str>, add_newline: bool) -> Result<()> {
    match out {
        Some(path) => write_all_atomically(path, bytes),
        None => {
            use std::io::Write;
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(bytes)?;
            if add_newline {
                handle.write_all(b"\n")?;
            }
            Ok(())
        }
    }
}

/// Écriture atomique : fichier temporaire, sync, puis rename.
fn write_all_atomically(path: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;

    let tmp = format!("{path}.tmp");
    {
        let mut file = std::fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(feature = "with-auth-records")]
pub fn describe_spf(status: &mailvet::SpfStatus) -> String {
    use mailvet::SpfStatus;

    match status {
        SpfStatus::Missing => "missing".to_string(),
        SpfStatus::MultipleRecords { records } => {
            format!("{} conflicting records", records.len())
        }
        SpfStatus::Invalid { record, .. } => format!("invalid ({record})"),
        SpfStatus::Delegated { target, .. } => format!("delegated to {target}"),
        SpfStatus::Weak { record, .. } => format!("weak ({record})"),
        SpfStatus::Compliant { record, .. } => format!("ok ({record})"),
    }
}

#[cfg(feature = "with-auth-records")]
pub fn describe_dmarc(status: &mailvet::DmarcStatus) -> String {
    use mailvet::DmarcStatus;

    match status {
        DmarcStatus::Missing => "missing".to_string(),
        DmarcStatus::MultipleRecords { records } => {
            format!("{} conflicting records", records.len())
        }
        DmarcStatus::Invalid { record, .. } => format!("invalid ({record})"),
        DmarcStatus::Weak { record, .. } => format!("weak ({record})"),
        DmarcStatus::Compliant { record, .. } => format!("ok ({record})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "with-csv")]
    fn sample_rows() -> Vec<ValidationResult> {
        vec![
            row("good@example.com", VerdictStatus::Valid, "Email is valid and domain is active."),
            row(
                "gone@example.com",
                VerdictStatus::Invalid,
                "Recipient rejected (550 5.1.1 User unknown, mailbox unavailable)",
            ),
            row("spam@blacklisted.test", VerdictStatus::Blacklisted, "Domain is blacklisted."),
        ]
    }

    #[cfg(feature = "with-csv")]
    fn row(address: &str, status: VerdictStatus, reason: &str) -> ValidationResult {
        ValidationResult {
            address: address.to_string(),
            status,
            reason: reason.to_string(),
        }
    }

    #[cfg(feature = "with-csv")]
    #[test]
    fn csv_report_layout_is_stable() {
        let bytes = csv_bytes(&sample_rows()).expect("csv encoding");
        let report = String::from_utf8(bytes).expect("utf-8");
        insta::assert_snapshot!(report, @r###"
        Email,Status,Message
        good@example.com,Valid,Email is valid and domain is active.
        gone@example.com,Invalid,"Recipient rejected (550 5.1.1 User unknown, mailbox unavailable)"
        spam@blacklisted.test,Blacklisted,Domain is blacklisted.
        "###);
    }

    #[test]
    fn atomic_write_replaces_the_target() {
        let dir = std::env::temp_dir().join("mailvet-cli-test");
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("report.txt");
        let path_str = path.to_str().expect("utf-8 path");

        write_all_atomically(path_str, b"first").expect("first write");
        write_all_atomically(path_str, b"second").expect("second write");

        let content = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(content, "second");
        assert!(!dir.join("report.txt.tmp").exists());

        std::fs::remove_file(&path).ok();
    }
}
