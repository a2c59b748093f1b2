use anyhow::Result;
use tempfile::tempdir;

use bluesdr::leads::{append_analysis, parse_response, GENERATION_SENTINEL};
use bluesdr::storage::{Database, PaymentMethod, PaymentRecord, PaymentStatus};

#[test]
fn appended_lead_round_trips_through_the_ledger() -> Result<()> {
    let tmp = tempdir()?;
    let db_path = tmp.path().join("bluesdr.db");

    let analysis = parse_response("Ana|Instagram|Hot|Price|Send case study|Hi Ana!")?;
    let record = append_analysis(
        &Database::open_path(&db_path)?,
        &analysis,
        "12/03/2025 14:05".to_string(),
    )?;
    assert!(record.id > 0);

    // Reopen to make sure the row was persisted.
    let db = Database::open_path(&db_path)?;
    let leads = db.all_leads()?;
    assert_eq!(leads.len(), 1);
    assert_eq!(
        leads[0].columns(),
        [
            "12/03/2025 14:05",
            "Ana",
            "Instagram",
            "Hot",
            "Price",
            "Send case study",
            "Origin: Instagram. Pain: Price. Suggested reply: Hi Ana!",
        ]
    );

    Ok(())
}

#[test]
fn appending_the_same_analysis_twice_yields_two_rows() -> Result<()> {
    let tmp = tempdir()?;
    let db = Database::open_path(&tmp.path().join("bluesdr.db"))?;
    let analysis = parse_response("Bruno|Referral|Warm|Time|800|Talk soon")?;

    let first = append_analysis(&db, &analysis, "01/01/2025 09:00".to_string())?;
    let second = append_analysis(&db, &analysis, "01/01/2025 09:00".to_string())?;

    assert_ne!(first.id, second.id);
    assert_eq!(db.all_leads()?.len(), 2);
    assert_eq!(db.get_stats()?.total_leads, 2);

    Ok(())
}

#[test]
fn newest_leads_are_listed_first() -> Result<()> {
    let tmp = tempdir()?;
    let db = Database::open_path(&tmp.path().join("bluesdr.db"))?;

    for name in ["Ana", "Bruno", "Carla"] {
        let analysis = parse_response(&format!("{name}|Instagram|Cold|-|0|Hi"))?;
        append_analysis(&db, &analysis, "01/01/2025 09:00".to_string())?;
    }

    let recent: Vec<_> = db.list_leads(2)?.into_iter().map(|l| l.name).collect();
    assert_eq!(recent, vec!["Carla", "Bruno"]);

    Ok(())
}

#[test]
fn sentinel_analysis_is_stored_like_any_other() -> Result<()> {
    let tmp = tempdir()?;
    let db = Database::open_path(&tmp.path().join("bluesdr.db"))?;

    let analysis = parse_response(GENERATION_SENTINEL)?;
    assert!(analysis.is_sentinel());

    let record = append_analysis(&db, &analysis, "01/01/2025 09:00".to_string())?;
    assert_eq!(record.name, "Error");
    assert_eq!(record.status, "Error");

    Ok(())
}

#[test]
fn payments_ledger_keeps_document_reference() -> Result<()> {
    let tmp = tempdir()?;
    let db = Database::open_path(&tmp.path().join("bluesdr.db"))?;

    let mut payment = PaymentRecord::new(
        "02/02/2025 10:00".to_string(),
        "Ana".to_string(),
        "Mentoria".to_string(),
        1500.0,
        PaymentStatus::Pending,
        PaymentMethod::CreditCard,
    );
    payment.document_ref = Some("NF-0042".to_string());
    db.insert_payment(&payment)?;

    let payments = db.all_payments()?;
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].method, PaymentMethod::CreditCard);
    assert_eq!(payments[0].status, PaymentStatus::Pending);
    assert_eq!(payments[0].document_ref.as_deref(), Some("NF-0042"));

    Ok(())
}
