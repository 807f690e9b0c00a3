//! Writers for extracted transactions and monthly rows.

use anyhow::{Context, Result};
use clap::ValueEnum;
use ledgerscan_core::TransactionRecord;
use ledgerscan_finance::MonthlySummary;
use serde::{Deserialize, Serialize};
use std::io::Write;

pub const TRANSACTION_COLUMNS: [&str; 7] = [
    "date",
    "description",
    "debit",
    "credit",
    "balance",
    "page",
    "source_file",
];

pub const SUMMARY_COLUMNS: [&str; 9] = [
    "period",
    "total_debit",
    "total_credit",
    "lowest_balance",
    "highest_balance",
    "ending_balance",
    "transaction_count",
    "net_flow",
    "source_files",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
    /// ASCII table
    #[default]
    Table,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    transactions: &'a [TransactionRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    monthly_summary: Option<&'a [MonthlySummary]>,
}

fn money(v: f64) -> String {
    format!("{:.2}", v)
}

fn opt_money(v: Option<f64>) -> String {
    v.map(money).unwrap_or_default()
}

pub fn transaction_rows(txns: &[TransactionRecord]) -> Vec<Vec<String>> {
    txns.iter()
        .map(|t| {
            vec![
                t.date.to_string(),
                t.description.clone(),
                money(t.debit),
                money(t.credit),
                opt_money(t.balance),
                t.page.to_string(),
                t.source_file.clone(),
            ]
        })
        .collect()
}

pub fn summary_rows(rows: &[MonthlySummary]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| {
            vec![
                r.period(),
                money(r.total_debit),
                money(r.total_credit),
                opt_money(r.lowest_balance),
                opt_money(r.highest_balance),
                opt_money(r.ending_balance),
                r.transaction_count.to_string(),
                money(r.net_flow()),
                r.source_files.iter().cloned().collect::<Vec<_>>().join(";"),
            ]
        })
        .collect()
}

/// Fixed-width table with `+---+` rules, every cell left-aligned.
pub fn render_ascii_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let rule = format!(
        "+{}+",
        widths.iter().map(|w| "-".repeat(w + 2)).collect::<Vec<_>>().join("+")
    );
    let mut out = vec![
        rule.clone(),
        table_line(headers.iter().copied(), &widths),
        rule.clone(),
    ];
    for row in rows {
        out.push(table_line(row.iter().map(String::as_str), &widths));
    }
    out.push(rule);
    out.join("\n")
}

fn table_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(c, w)| format!(" {:<width$} ", c, width = *w))
        .collect();
    format!("|{}|", padded.join("|"))
}

fn write_csv<W: Write>(w: &mut W, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);
    wtr.write_record(headers)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush().context("flush csv")?;
    Ok(())
}

/// Transactions, plus monthly rows when `summary` is given.
pub fn write_report<W: Write>(
    w: &mut W,
    format: OutputFormat,
    txns: &[TransactionRecord],
    summary: Option<&[MonthlySummary]>,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let report = JsonReport {
                transactions: txns,
                monthly_summary: summary,
            };
            serde_json::to_writer_pretty(&mut *w, &report).context("serialize json")?;
            writeln!(w)?;
        }
        OutputFormat::Csv => {
            write_csv(w, &TRANSACTION_COLUMNS, &transaction_rows(txns))?;
            if let Some(rows) = summary {
                writeln!(w)?;
                write_csv(w, &SUMMARY_COLUMNS, &summary_rows(rows))?;
            }
        }
        OutputFormat::Table => {
            writeln!(w, "{}", render_ascii_table(&TRANSACTION_COLUMNS, &transaction_rows(txns)))?;
            if let Some(rows) = summary {
                writeln!(w, "\nMonthly summary")?;
                writeln!(w, "{}", render_ascii_table(&SUMMARY_COLUMNS, &summary_rows(rows)))?;
            }
        }
    }
    Ok(())
}

/// Monthly rows only.
pub fn write_summary<W: Write>(w: &mut W, format: OutputFormat, rows: &[MonthlySummary]) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *w, rows).context("serialize json")?;
            writeln!(w)?;
        }
        OutputFormat::Csv => write_csv(w, &SUMMARY_COLUMNS, &summary_rows(rows))?,
        OutputFormat::Table => {
            writeln!(w, "{}", render_ascii_table(&SUMMARY_COLUMNS, &summary_rows(rows)))?
        }
    }
    Ok(())
}
