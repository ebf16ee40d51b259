//! Integration tests for expense-engine

use bigdecimal::BigDecimal;
use expense_engine::{
    compute_derived, first_error_section, utils::MemoryExpenseStore, validate, EngineConfig,
    EngineError, ExpenseDraft, ExpenseEdit, ExpenseEngine, ExpenseFinancialInput, ExpenseRegister,
    ExpenseStore, FormSection, PaymentStatus, TaxType,
};
use pretty_assertions::assert_eq;
use uuid::Uuid;

fn scenario_a() -> ExpenseFinancialInput {
    ExpenseFinancialInput {
        entered_amount: BigDecimal::from(1000),
        tax_inclusive: false,
        tax_type: TaxType::Gst,
        tax_percentage: BigDecimal::from(18),
        ..Default::default()
    }
}

fn scenario_c() -> ExpenseFinancialInput {
    ExpenseFinancialInput {
        tds_applicable: true,
        tds_percentage: BigDecimal::from(10),
        ..scenario_a()
    }
}

#[test]
fn test_exclusive_gst() {
    let derived = compute_derived(&scenario_a());

    assert_eq!(derived.taxable_base, BigDecimal::from(1000));
    assert_eq!(derived.tax_amount, BigDecimal::from(180));
    assert_eq!(derived.total_amount, BigDecimal::from(1180));
}

#[test]
fn test_inclusive_gst() {
    let input = ExpenseFinancialInput {
        entered_amount: BigDecimal::from(1180),
        tax_inclusive: true,
        ..scenario_a()
    };
    let derived = compute_derived(&input);

    assert_eq!(derived.taxable_base, BigDecimal::from(1000));
    assert_eq!(derived.tax_amount, BigDecimal::from(180));
    assert_eq!(derived.total_amount, BigDecimal::from(1180));
}

#[test]
fn test_tds_on_exclusive_gst() {
    let derived = compute_derived(&scenario_c());

    assert_eq!(derived.tds_amount, BigDecimal::from(100));
    assert_eq!(derived.payable_amount, BigDecimal::from(1080));
}

#[test]
fn test_full_payment_transitions_to_paid() {
    let engine = ExpenseEngine::new();
    let result = engine.apply_edit(&scenario_c(), ExpenseEdit::PaidAmount(BigDecimal::from(1080)));

    assert_eq!(result.input.payment_status, PaymentStatus::Paid);
    assert_eq!(result.derived.due_amount, BigDecimal::from(0));

    // the same snapshot recomputed without edit information agrees
    let input = ExpenseFinancialInput {
        paid_amount: BigDecimal::from(1080),
        ..scenario_c()
    };
    assert_eq!(engine.recompute(input).input.payment_status, PaymentStatus::Paid);
}

#[test]
fn test_partial_payment_requires_profile() {
    let engine = ExpenseEngine::new();
    let result = engine.apply_edit(&scenario_c(), ExpenseEdit::PaidAmount(BigDecimal::from(500)));

    assert_eq!(result.input.payment_status, PaymentStatus::PartiallyPaid);
    assert_eq!(result.derived.due_amount, BigDecimal::from(580));
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].field, "paymentProfileId");
    assert_eq!(first_error_section(&result.errors), Some(FormSection::Payment));

    let with_profile = engine.apply_edit(
        &result.input,
        ExpenseEdit::PaymentProfile(Some(Uuid::new_v4())),
    );
    assert!(with_profile.is_valid());
    assert_eq!(with_profile.input.payment_status, PaymentStatus::PartiallyPaid);
}

#[test]
fn test_cgst_sgst_default_split() {
    let config = EngineConfig::from_toml_str("[default_rates]\nCGST_SGST = \"18\"").unwrap();
    let engine = ExpenseEngine::with_config(config).unwrap();

    let result = engine.apply_edit(
        &ExpenseFinancialInput::default(),
        ExpenseEdit::TaxType(TaxType::CgstSgst),
    );

    assert_eq!(result.input.cgst_percentage, BigDecimal::from(9));
    assert_eq!(result.input.sgst_percentage, BigDecimal::from(9));
    assert_eq!(result.input.tax_percentage, BigDecimal::from(18));
}

#[test]
fn test_changing_tax_after_tds_recomputes_everything() {
    let engine = ExpenseEngine::new();
    let mut draft = ExpenseDraft::new(&engine);

    draft.apply(&engine, ExpenseEdit::EnteredAmount(BigDecimal::from(1000)));
    draft.apply(&engine, ExpenseEdit::TdsApplicable(true));
    draft.apply(&engine, ExpenseEdit::TdsPercentage(BigDecimal::from(10)));
    draft.apply(&engine, ExpenseEdit::TaxType(TaxType::Igst));

    let derived = draft.derived();
    assert_eq!(derived.total_amount, BigDecimal::from(1180));
    assert_eq!(derived.tds_amount, BigDecimal::from(100));
    assert_eq!(derived.payable_amount, BigDecimal::from(1080));

    draft.apply(&engine, ExpenseEdit::TaxInclusive(true));
    let derived = draft.derived();
    assert_eq!(derived.total_amount, BigDecimal::from(1000));
    assert_eq!(
        derived.tds_amount,
        (&derived.taxable_base * BigDecimal::from(10)) / BigDecimal::from(100)
    );
}

#[test]
fn test_partial_payment_promoted_when_payable_drops() {
    let engine = ExpenseEngine::new();
    let mut draft = ExpenseDraft::new(&engine);

    draft.apply(&engine, ExpenseEdit::EnteredAmount(BigDecimal::from(1000)));
    draft.apply(&engine, ExpenseEdit::PaidAmount(BigDecimal::from(800)));
    draft.apply(&engine, ExpenseEdit::PaymentProfile(Some(Uuid::new_v4())));
    assert_eq!(draft.input().payment_status, PaymentStatus::PartiallyPaid);

    draft.apply(&engine, ExpenseEdit::EnteredAmount(BigDecimal::from(600)));

    assert_eq!(draft.input().payment_status, PaymentStatus::Paid);
    assert_eq!(draft.input().paid_amount, BigDecimal::from(600));
    assert_eq!(draft.derived().due_amount, BigDecimal::from(0));
    assert!(draft.errors().is_empty());
}

fn error_fields(errors: &[expense_engine::FieldError]) -> Vec<&str> {
    errors.iter().map(|e| e.field.as_str()).collect()
}

#[test]
fn test_compute_and_validate_full_payment() {
    let input = ExpenseFinancialInput {
        paid_amount: BigDecimal::from(1080),
        ..scenario_c()
    };
    let derived = compute_derived(&input);

    assert_eq!(derived.due_amount, BigDecimal::from(0));
    assert_eq!(error_fields(&validate(&input, &derived)), vec!["paymentProfileId"]);

    let input = ExpenseFinancialInput {
        payment_profile_id: Some(Uuid::new_v4()),
        ..input
    };
    assert!(validate(&input, &compute_derived(&input)).is_empty());
}

#[test]
fn test_compute_and_validate_partial_payment() {
    let input = ExpenseFinancialInput {
        paid_amount: BigDecimal::from(500),
        ..scenario_c()
    };
    let derived = compute_derived(&input);
    let errors = validate(&input, &derived);

    assert_eq!(derived.due_amount, BigDecimal::from(580));
    assert_eq!(error_fields(&errors), vec!["paymentProfileId"]);
    assert_eq!(first_error_section(&errors), Some(FormSection::Payment));
}

#[test]
fn test_compute_and_validate_partial_amount_above_payable() {
    let input = ExpenseFinancialInput {
        payment_status: PaymentStatus::PartiallyPaid,
        paid_amount: BigDecimal::from(5000),
        payment_profile_id: Some(Uuid::new_v4()),
        ..scenario_c()
    };
    let derived = compute_derived(&input);

    assert_eq!(derived.due_amount, BigDecimal::from(0));
    assert!(validate(&input, &derived).is_empty());
}

#[test]
fn test_validate_raw_snapshot() {
    let input = ExpenseFinancialInput {
        entered_amount: BigDecimal::from(-5),
        tax_type: TaxType::Cgst,
        cgst_percentage: BigDecimal::from(101),
        ..Default::default()
    };
    let derived = compute_derived(&input);
    let errors = validate(&input, &derived);

    assert_eq!(derived.taxable_base, BigDecimal::from(0));
    assert_eq!(
        errors.iter().map(|e| e.field.as_str()).collect::<Vec<_>>(),
        vec!["taxableAmount", "cgstPercentage"]
    );
}

#[tokio::test]
async fn test_submit_and_edit_expense() {
    let mut register = ExpenseRegister::new(MemoryExpenseStore::new());
    let profile = Uuid::new_v4();

    let mut draft = register.open_draft();
    let engine = register.engine();
    draft.apply(engine, ExpenseEdit::EnteredAmount(BigDecimal::from(1000)));
    draft.apply(engine, ExpenseEdit::TaxType(TaxType::Gst));
    draft.apply(engine, ExpenseEdit::PaymentStatus(PaymentStatus::Paid));
    draft.apply(engine, ExpenseEdit::PaymentProfile(Some(profile)));

    let record = register.submit(&draft).await.unwrap();
    assert_eq!(record.payload.derived.payable_amount, BigDecimal::from(1180));
    assert_eq!(record.payload.input.paid_amount, BigDecimal::from(1180));

    // reopen, add TDS, resubmit under the same id
    let mut draft = register.open_expense(&record.id).await.unwrap();
    assert_eq!(draft.expense_id(), Some(record.id));
    let engine = register.engine();
    draft.apply(engine, ExpenseEdit::TdsApplicable(true));
    draft.apply(engine, ExpenseEdit::TdsPercentage(BigDecimal::from(2)));

    let updated = register.submit(&draft).await.unwrap();
    assert_eq!(updated.id, record.id);
    assert_eq!(updated.payload.derived.tds_amount, BigDecimal::from(20));
    assert_eq!(updated.payload.input.paid_amount, BigDecimal::from(1160));

    let paid = register.list_expenses(Some(PaymentStatus::Paid)).await.unwrap();
    assert_eq!(paid.len(), 1);
    assert!(register
        .list_expenses(Some(PaymentStatus::Unpaid))
        .await
        .unwrap()
        .is_empty());

    register.delete_expense(&record.id).await.unwrap();
    assert!(register.get_expense(&record.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_invalid_draft_is_not_stored() {
    let store = MemoryExpenseStore::new();
    let mut register = ExpenseRegister::new(store.clone());

    let draft = register.open_draft();
    let result = register.submit(&draft).await;

    match result {
        Err(EngineError::Validation(errors)) => {
            assert_eq!(errors[0].section, FormSection::Basic);
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(store.is_empty().unwrap());
}

#[tokio::test]
async fn test_missing_expense() {
    let mut register = ExpenseRegister::new(MemoryExpenseStore::new());
    let missing = Uuid::new_v4();

    assert!(matches!(
        register.open_expense(&missing).await,
        Err(EngineError::ExpenseNotFound(id)) if id == missing
    ));
    assert!(matches!(
        register.delete_expense(&missing).await,
        Err(EngineError::ExpenseNotFound(_))
    ));
}

#[tokio::test]
async fn test_payload_uses_flat_field_names() {
    let store = MemoryExpenseStore::new();
    let mut register = ExpenseRegister::new(store.clone());

    let mut draft = register.open_draft();
    let engine = register.engine();
    draft.apply(engine, ExpenseEdit::EnteredAmount(BigDecimal::from(1000)));
    draft.apply(engine, ExpenseEdit::TaxType(TaxType::CgstSgst));
    let record = register.submit(&draft).await.unwrap();

    let json = serde_json::to_value(&record).unwrap();
    let object = json.as_object().unwrap();
    for key in [
        "id",
        "submittedAt",
        "enteredAmount",
        "taxInclusive",
        "taxType",
        "taxPercentage",
        "cgstPercentage",
        "sgstPercentage",
        "tdsApplicable",
        "tdsPercentage",
        "paymentStatus",
        "paidAmount",
        "paymentProfileId",
        "taxableBase",
        "taxAmount",
        "totalAmount",
        "tdsAmount",
        "payableAmount",
        "dueAmount",
    ] {
        assert!(object.contains_key(key), "missing {}", key);
    }
    assert_eq!(object["taxType"], "CGST_SGST");
    assert_eq!(object["paymentStatus"], "UNPAID");

    let stored = store.get_expense(&record.id).await.unwrap().unwrap();
    let parsed: expense_engine::ExpenseRecord = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, stored);

    store.clear().unwrap();
    assert!(store.is_empty().unwrap());
}
