// src/services/installments.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{
    common::format::round_cents,
    models::contract::{Installment, PaymentType},
};

/// Percentuais de cada parcela. Sempre somam 100; a divisão em três usa
/// 33,33 / 33,33 / 33,34.
pub fn split_percentages(payment_type: PaymentType) -> Vec<Decimal> {
    let pct = |units: i64, scale: u32| Decimal::new(units, scale);
    match payment_type {
        PaymentType::AVista | PaymentType::ByAgreement => vec![pct(100, 0)],
        PaymentType::FiftyFifty => vec![pct(50, 0), pct(50, 0)],
        PaymentType::ThirtySeventy => vec![pct(30, 0), pct(70, 0)],
        PaymentType::ThreeInstallments => vec![pct(3333, 2), pct(3333, 2), pct(3334, 2)],
        PaymentType::FourInstallments => vec![pct(25, 0); 4],
    }
}

/// Deriva as parcelas do valor total. Cada parcela é arredondada para
/// centavos e a última absorve a diferença, então a soma bate com o valor.
pub fn derive_installments(
    value: Decimal,
    payment_type: PaymentType,
    due_dates: &[Option<NaiveDate>],
) -> Vec<Installment> {
    let percentages = split_percentages(payment_type);
    let total = round_cents(value);
    let last = percentages.len() - 1;
    let mut allocated = Decimal::ZERO;

    percentages
        .into_iter()
        .enumerate()
        .map(|(i, percentage)| {
            let amount = if i == last {
                total - allocated
            } else {
                round_cents(total * percentage / Decimal::ONE_HUNDRED)
            };
            allocated += amount;
            Installment {
                number: i as u32 + 1,
                percentage,
                amount,
                due_date: due_dates.get(i).copied().flatten(),
            }
        })
        .collect()
}
