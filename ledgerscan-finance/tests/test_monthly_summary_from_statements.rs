use ledgerscan_finance::{batch_totals, summarize_by_month};
use ledgerscan_ingest::{InMemoryDocument, Pipeline, PipelineOptions, YearScope};

const PAGE_1: &str = r#"
MALAYAN BANKING BERHAD
STATEMENT DATE : 31/12/24
ENTRY DATE  TRANSACTION DESCRIPTION      TRANSACTION AMOUNT   STATEMENT BALANCE
BEGINNING BALANCE                                                 900.00
20/12     SALARY DEC                          1,000.00+       1,900.00
30/12     RENT                                  800.00-       1,100.00
"#;

const PAGE_2: &str = r#"
MALAYAN BANKING BERHAD
05/01     GROCER                                 100.25-        999.75
20/01     TRANSFER IN                            200.00+      1,199.75
21/01     COFFEE                                   9.75-      1,190.00
"#;

/// End-to-end: statement text -> records -> monthly rows.
#[test]
fn test_monthly_rows_from_maybank_statement() {
    let doc = InMemoryDocument::from_texts("maybank-jan25.pdf", [PAGE_1, PAGE_2]);
    let pipeline = Pipeline::with_standard_formats(PipelineOptions {
        hint: "auto".parse().unwrap(),
        fallback_year: Some(2019),
        year_scope: YearScope::Document,
    });
    let outcome = pipeline.extract(&[doc]);
    assert_eq!(outcome.transactions.len(), 5);

    let rows = summarize_by_month(&outcome.transactions);
    let periods: Vec<_> = rows.iter().map(|r| r.period()).collect();
    // declared year beats the fallback; January rolls over into 2025
    assert_eq!(periods, vec!["2024-12", "2025-01"]);

    let dec = &rows[0];
    assert_eq!(dec.total_credit, 1000.0);
    assert_eq!(dec.total_debit, 800.0);
    assert_eq!(dec.ending_balance, Some(1100.0));

    let jan = &rows[1];
    assert_eq!(jan.transaction_count, 3);
    assert_eq!(jan.total_debit, 110.0);
    assert_eq!(jan.lowest_balance, Some(999.75));
    assert_eq!(jan.highest_balance, Some(1199.75));
    assert_eq!(jan.ending_balance, Some(1190.0));
    assert!(jan.source_files.contains("maybank-jan25.pdf"));

    let totals = batch_totals(&outcome.transactions);
    assert_eq!(totals.transaction_count, 5);
    assert_eq!(totals.total_credit, 1200.0);
}

#[test]
fn test_summary_rows_serialize_with_stable_names() {
    let doc = InMemoryDocument::from_texts("p.pdf", [PAGE_2]);
    let pipeline = Pipeline::with_standard_formats(PipelineOptions {
        fallback_year: Some(2025),
        ..Default::default()
    });
    let rows = summarize_by_month(&pipeline.extract(&[doc]).transactions);
    let json = serde_json::to_value(&rows).unwrap();
    let row = &json[0];
    for key in [
        "year",
        "month",
        "total_debit",
        "total_credit",
        "lowest_balance",
        "highest_balance",
        "ending_balance",
        "transaction_count",
        "source_files",
    ] {
        assert!(row.get(key).is_some(), "missing {key}");
    }
    assert_eq!(row["transaction_count"], 3);
}
