use colored::Colorize;
use std::path::Path;
use thirteenf_spider as spider;
use thirteenf_spider::fs::write_json_atomic;
use thirteenf_spider::{FetchConfig, FundList, HoldingsDocument, SnapshotStatus};
use tracing::{debug, error, info, warn};

/// Fetch every tracked fund, then write the holdings document and overlap report.
///
/// Fails only when no fund has holdings or the output cannot be written; in the
/// former case the previous document is left in place.
pub(crate) async fn fetch(output: &Path, overlap: &Path, tui: bool) -> anyhow::Result<()> {
    let time = std::time::Instant::now();
    let config = FetchConfig::from_env()?;
    let funds = FundList::tracked();

    let document = match spider::fetch(&funds, &config, tui).await {
        Ok(document) => document,
        Err(partial) => {
            warn!("{partial}");
            partial.into_document()
        }
    };

    print_summary(&document);
    publish(&document, output, overlap).await?;

    info!(
        "{}/{} funds written, time elapsed: {:?}",
        document.populated_count(),
        document.len(),
        time.elapsed()
    );

    Ok(())
}

/// Write the holdings document and overlap report, unless no fund has holdings.
///
/// An all-empty or all-failed run leaves the previous document in place and errors.
async fn publish(document: &HoldingsDocument, output: &Path, overlap: &Path) -> anyhow::Result<()> {
    if document.populated_count() == 0 {
        error!("no fund holdings retrieved; {} left untouched", output.display());
        anyhow::bail!("no fund holdings retrieved from EDGAR");
    }

    write_json_atomic(document, output).await.map_err(|err| {
        error!("failed to write holdings document, error({err})");
        err
    })?;
    debug!("holdings document written to {}", output.display());

    let overlaps = spider::overlap::overlap(document);
    write_json_atomic(&overlaps, overlap).await.map_err(|err| {
        error!("failed to write overlap report, error({err})");
        err
    })?;
    debug!(
        "{} overlapping positions written to {}",
        overlaps.len(),
        overlap.display()
    );

    Ok(())
}

/// Inject the holdings document into the dashboard template.
pub(crate) async fn inject(data: &Path, template: &Path, output: &Path, tui: bool) -> anyhow::Result<()> {
    spider::template::inject_file(data, template, output)
        .await
        .map_err(|err| {
            error!("failed to build dashboard, error({err})");
            err
        })?;

    if tui {
        println!("dashboard written to {}", output.display());
    }

    Ok(())
}

fn print_summary(document: &HoldingsDocument) {
    println!(
        "{bar}\n{name:^60}\n{bar}",
        bar = "=".repeat(60),
        name = "SUMMARY"
    );
    println!(
        "retrieved: {}/{}",
        document.retrieved_count(),
        document.len()
    );

    for snapshot in document.snapshots() {
        let fund = &snapshot.fund;
        let line = match snapshot.status {
            SnapshotStatus::Ok => {
                let period = snapshot.period.map(|p| p.to_string()).unwrap_or_default();
                let text = format!(
                    "  ✅ {} {}: {} holdings, period {period}",
                    fund.emoji, fund.name, snapshot.num_holdings
                );
                text.as_str().green()
            }
            SnapshotStatus::Empty => {
                let text = format!("  ⚪ {} {}: no 13F-HR on file", fund.emoji, fund.name);
                text.as_str().yellow()
            }
            SnapshotStatus::Failed => {
                let error = snapshot.error.as_deref().unwrap_or("unknown error");
                let text = format!("  ❌ {} {}: {error}", fund.emoji, fund.name);
                text.as_str().red()
            }
        };
        println!("{line}");
    }
}
