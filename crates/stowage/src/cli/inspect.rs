//! Sweep and list command handlers.

use std::time::SystemTime;
use stowage::{AssetStore, ListedEntry, Stowage, StowageResult, SweepReport};

/// Run one sweep over `namespace`, or over every namespace.
pub async fn sweep_now(stowage: &Stowage, namespace: Option<&str>) -> StowageResult<()> {
    let reports = match namespace {
        Some(name) => vec![stowage.sweeper(name)?.sweep().await?],
        None => stowage.sweep_all().await?,
    };

    for report in &reports {
        print_report(report);
    }
    Ok(())
}

fn print_report(report: &SweepReport) {
    if *report.namespace_absent() {
        println!("{}: namespace does not exist yet", report.namespace());
        return;
    }

    println!(
        "{}: scanned {}, deleted {}, kept {}, reclaimed {} bytes",
        report.namespace(),
        report.scanned(),
        report.deleted().len(),
        report.retained(),
        report.bytes_reclaimed()
    );
    for name in report.deleted() {
        println!("  deleted {}", name);
    }
    for failure in report.failures() {
        println!("  failed  {}: {}", failure.file_name(), failure.error());
    }
}

/// Print the assets of `namespace` with their owner, size and age.
pub async fn list_assets(stowage: &Stowage, namespace: &str) -> StowageResult<()> {
    let ns = stowage.pipeline(namespace)?.namespace();
    let Some(entries) = stowage.store().list(ns).await? else {
        println!("{}: namespace does not exist yet", ns);
        return Ok(());
    };

    let now = SystemTime::now();
    println!("{:<48} {:<24} {:>10} {:>10}", "NAME", "OWNER", "BYTES", "AGE (s)");
    for entry in entries {
        match entry {
            ListedEntry::Asset(record) => println!(
                "{:<48} {:<24} {:>10} {:>10}",
                record.file_name(),
                record.owner().map(|o| o.as_str()).unwrap_or("-"),
                record.size_bytes(),
                record.age_at(now).as_secs()
            ),
            ListedEntry::Unreadable { file_name, error } => {
                println!("{:<48} unreadable: {}", file_name, error)
            }
        }
    }
    Ok(())
}
