use anyhow::{Context, Result};
use std::io::{self, Write};
use std::time::Instant;
use tracing::info;

use crate::aggregate::{count_categories, summarize_cashback, CashbackClassifier};
use crate::dataset::{load_dataset, Dataset};
use crate::stats::{AnalysisResult, CashbackBucket, CountCheck, FrequencyTable};
use crate::utils::format_count;
use crate::validate::{check_counts, validate_campaigns};
use crate::Args;

pub fn analyze_campaign_file(args: &Args) -> Result<AnalysisResult> {
    let total_start_time = Instant::now();
    info!(action = "start", component = "analysis", "Starting campaign dataset analysis");

    let dataset = load_dataset(&args.file)?;
    let result = analyze_dataset(&dataset)?;

    info!(
        action = "complete",
        component = "analysis",
        error_count = result.errors.len(),
        duration_ms = total_start_time.elapsed().as_millis(),
        "Analysis completed successfully"
    );
    Ok(result)
}

pub fn analyze_dataset(dataset: &Dataset) -> Result<AnalysisResult> {
    let classifier = CashbackClassifier::new().context("Failed to compile cashback rules")?;

    Ok(AnalysisResult {
        scraped_at: dataset.scraped_at.clone(),
        declared_total: dataset.total_campaigns,
        actual_total: dataset.campaigns.len(),
        categories: count_categories(&dataset.campaigns),
        cashback: summarize_cashback(&dataset.campaigns, &classifier),
        errors: validate_campaigns(&dataset.campaigns),
        count_check: check_counts(dataset),
    })
}

fn write_table<W: Write>(out: &mut W, entries: &[(&String, usize)]) -> io::Result<()> {
    for (key, count) in entries {
        writeln!(out, "{}: {}", key, format_count(*count))?;
    }
    Ok(())
}

fn write_top_values<W: Write>(
    out: &mut W,
    title: &str,
    values: &FrequencyTable<String>,
    top: usize,
) -> io::Result<()> {
    if values.is_empty() {
        return Ok(());
    }
    writeln!(out, "=== {}の詳細（上位{}件） ===", title, top)?;
    write_table(out, &values.top(top))?;
    writeln!(out)
}

pub fn write_analysis_results<W: Write>(
    out: &mut W,
    result: &AnalysisResult,
    args: &Args,
) -> io::Result<()> {
    writeln!(out, "=== 基本情報 ===")?;
    writeln!(out, "スクレイピング日時: {}", result.scraped_at)?;
    writeln!(out, "総案件数: {}", result.declared_total)?;
    writeln!(out)?;

    writeln!(out, "=== カテゴリー別案件数 ===")?;
    write_table(out, &result.categories.sorted_desc())?;
    writeln!(out)?;

    writeln!(out, "=== 還元率タイプ別集計 ===")?;
    for bucket in CashbackBucket::ALL {
        writeln!(out, "{}: {}", bucket, format_count(result.cashback.count(bucket)))?;
    }
    writeln!(out)?;

    write_top_values(
        out,
        CashbackBucket::Percent.label(),
        &result.cashback.percent_values,
        args.top,
    )?;
    write_top_values(
        out,
        CashbackBucket::Point.label(),
        &result.cashback.point_values,
        args.top,
    )?;

    writeln!(out, "=== データ整合性チェック ===")?;
    if result.errors.is_empty() {
        writeln!(out, "エラーは検出されませんでした")?;
    } else {
        writeln!(out, "エラー数: {}", result.errors.len())?;
        for error in result.errors.iter().take(args.max_errors) {
            writeln!(out, "  - {}", error)?;
        }
        if result.errors.len() > args.max_errors {
            writeln!(
                out,
                "  ... 他 {} 件のエラー",
                result.errors.len() - args.max_errors
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "=== データ整合性確認 ===")?;
    writeln!(out, "total_campaignsフィールドの値: {}", result.declared_total)?;
    writeln!(out, "実際のcampaigns配列の長さ: {}", result.actual_total)?;
    match result.count_check {
        CountCheck::Match => writeln!(out, "データ件数は一致しています")?,
        CountCheck::Mismatch { .. } => writeln!(out, "警告: データ件数が一致していません")?,
    }
    Ok(())
}

pub fn print_analysis_results(result: &AnalysisResult, args: &Args) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_analysis_results(&mut out, result, args)?;
    out.flush()
}
