//! Expense entry walkthrough: tax, TDS, payment status and submission

use bigdecimal::BigDecimal;
use expense_engine::utils::MemoryExpenseStore;
use expense_engine::{
    compute_derived, first_error_section, validate, ExpenseEdit, ExpenseFinancialDerived,
    ExpenseFinancialInput, ExpenseRegister, PaymentStatus, TaxType,
};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

fn print_derived(derived: &ExpenseFinancialDerived) {
    println!("  Taxable base: ₹{}", derived.taxable_base.round(2));
    println!("  Tax:          ₹{}", derived.tax_amount.round(2));
    println!("  Total:        ₹{}", derived.total_amount.round(2));
    println!("  TDS:          ₹{}", derived.tds_amount.round(2));
    println!("  Payable:      ₹{}", derived.payable_amount.round(2));
    println!("  Due:          ₹{}", derived.due_amount.round(2));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("🧾 Expense Engine - Expense Scenarios\n");

    // 1. One-shot computation of a raw snapshot
    println!("📊 ₹1000 + GST 18% (exclusive), TDS 10%:");
    let input = ExpenseFinancialInput {
        entered_amount: BigDecimal::from(1000),
        tax_type: TaxType::Gst,
        tax_percentage: BigDecimal::from(18),
        tds_applicable: true,
        tds_percentage: BigDecimal::from(10),
        ..Default::default()
    };
    let derived = compute_derived(&input);
    print_derived(&derived);
    println!();

    // 2. The same snapshot with ₹500 already paid
    println!("💳 ₹500 paid, no payment profile yet:");
    let partly_paid = ExpenseFinancialInput {
        paid_amount: BigDecimal::from(500),
        ..input
    };
    let derived = compute_derived(&partly_paid);
    let errors = validate(&partly_paid, &derived);
    print_derived(&derived);
    for error in &errors {
        println!("  ✗ {}", error);
    }
    println!("  First section to fix: {:?}", first_error_section(&errors));
    println!();

    // 3. Editing a draft field by field
    println!("🏢 Intra-state draft (CGST + SGST):");
    let store = MemoryExpenseStore::new();
    let mut register = ExpenseRegister::new(store);
    let engine = register.engine();

    let mut draft = register.open_draft();
    draft.apply(engine, ExpenseEdit::EnteredAmount(BigDecimal::from(2360)));
    draft.apply(engine, ExpenseEdit::TaxInclusive(true));
    draft.apply(engine, ExpenseEdit::TaxType(TaxType::CgstSgst));
    println!(
        "  CGST {}% + SGST {}% = {}%",
        draft.input().cgst_percentage,
        draft.input().sgst_percentage,
        draft.input().tax_percentage
    );
    print_derived(draft.derived());

    draft.apply(engine, ExpenseEdit::PaymentStatus(PaymentStatus::Paid));
    draft.apply(engine, ExpenseEdit::PaymentProfile(Some(Uuid::new_v4())));
    println!(
        "  Status: {:?}, paid ₹{}",
        draft.input().payment_status,
        draft.input().paid_amount.round(2)
    );
    println!();

    // 4. Submitting and listing
    println!("💾 Submitting:");
    let record = register.submit(&draft).await?;
    println!("  ✓ Stored expense {}", record.id);

    let paid = register.list_expenses(Some(PaymentStatus::Paid)).await?;
    println!("  Paid expenses on file: {}", paid.len());

    Ok(())
}
