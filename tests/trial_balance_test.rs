mod common;

use anyhow::Result;
use common::{parse_date, tenant, test_service, SampleJournal};
use khata::application::ReportFilter;
use khata::domain::JournalEntry;

#[tokio::test]
async fn test_trial_balance_balanced_book() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let tenant_id = tenant();

    SampleJournal::seed_balanced(&service, tenant_id).await?;

    let report = service
        .trial_balance(tenant_id, &ReportFilter::default())
        .await?;

    assert_eq!(report.ledgers.len(), 4);
    assert_eq!(report.total_debit, 125000.0);
    assert_eq!(report.total_credit, 125000.0);
    assert!(report.is_balanced);

    let cash = report
        .ledgers
        .iter()
        .find(|l| l.ledger_name == "Cash")
        .unwrap();
    assert_eq!(cash.debit, 50000.0);
    assert_eq!(cash.credit, 0.0);

    Ok(())
}

#[tokio::test]
async fn test_trial_balance_groups_by_ledger() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let tenant_id = tenant();

    let entries = vec![
        JournalEntry::new(tenant_id, "Cash", 100.0, 0.0, parse_date("2025-01-01")),
        JournalEntry::new(tenant_id, "Cash", 250.0, 0.0, parse_date("2025-01-02")),
        JournalEntry::new(tenant_id, "Cash", 0.0, 80.0, parse_date("2025-01-03")),
        JournalEntry::new(tenant_id, "Sales", 0.0, 270.0, parse_date("2025-01-03")),
    ];
    service.record_journal_entries(&entries).await?;

    let report = service
        .trial_balance(tenant_id, &ReportFilter::default())
        .await?;

    assert_eq!(report.ledgers.len(), 2);
    let cash = &report.ledgers[0];
    assert_eq!(cash.ledger_name, "Cash");
    assert_eq!(cash.debit, 350.0);
    assert_eq!(cash.credit, 80.0);

    Ok(())
}

#[tokio::test]
async fn test_trial_balance_unbalanced_book() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let tenant_id = tenant();

    SampleJournal::seed_balanced(&service, tenant_id).await?;
    service
        .record_journal_entry(&JournalEntry::new(
            tenant_id,
            "Suspense",
            10.0,
            0.0,
            parse_date("2025-01-20"),
        ))
        .await?;

    let report = service
        .trial_balance(tenant_id, &ReportFilter::default())
        .await?;

    assert!(!report.is_balanced);
    assert_eq!(report.total_debit - report.total_credit, 10.0);

    Ok(())
}

#[tokio::test]
async fn test_trial_balance_respects_date_range() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let tenant_id = tenant();

    SampleJournal::seed_balanced(&service, tenant_id).await?;
    // February entry outside the filter window
    service
        .record_journal_entry(&JournalEntry::new(
            tenant_id,
            "Cash",
            999.0,
            0.0,
            parse_date("2025-02-10"),
        ))
        .await?;

    let filter = ReportFilter {
        from_date: Some(parse_date("2025-01-01")),
        to_date: Some(parse_date("2025-01-31")),
        period: Some("Q1_2025".to_string()),
    };
    let report = service.trial_balance(tenant_id, &filter).await?;

    assert_eq!(report.total_debit, 125000.0);
    assert!(report.is_balanced);
    assert_eq!(report.period.as_deref(), Some("Q1_2025"));

    Ok(())
}

#[tokio::test]
async fn test_trial_balance_is_tenant_scoped() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let tenant_a = tenant();
    let tenant_b = tenant();

    SampleJournal::seed_balanced(&service, tenant_a).await?;

    let report = service
        .trial_balance(tenant_b, &ReportFilter::default())
        .await?;
    assert!(report.ledgers.is_empty());
    assert_eq!(report.total_debit, 0.0);

    Ok(())
}

#[tokio::test]
async fn test_trial_balance_rejects_inverted_range() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let filter = ReportFilter {
        from_date: Some(parse_date("2025-02-01")),
        to_date: Some(parse_date("2025-01-01")),
        period: None,
    };
    let result = service.trial_balance(tenant(), &filter).await;
    assert!(result.is_err());

    Ok(())
}

#[tokio::test]
async fn test_trial_balance_falls_back_to_account_code() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let tenant_id = tenant();

    let entry = JournalEntry::new(tenant_id, "", 500.0, 0.0, parse_date("2025-01-08"))
        .with_account_code("1001");
    service.record_journal_entry(&entry).await?;

    let report = service
        .trial_balance(tenant_id, &ReportFilter::default())
        .await?;
    assert_eq!(report.ledgers.len(), 1);
    assert_eq!(report.ledgers[0].ledger_name, "1001");

    Ok(())
}
