// src/services/pricing.rs

use rust_decimal::{Decimal, RoundingStrategy};

// Uma linha (quantidade, preço unitário) para o cálculo de totais.
#[derive(Debug, Clone, Copy)]
pub struct LineAmount {
    pub quantity: i64,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

// Arredondamento comercial (meio para longe do zero), duas casas.
fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn line_total(quantity: i64, unit_price: Decimal) -> Decimal {
    round2(Decimal::from(quantity) * unit_price)
}

/// Função pura: subtotal = soma das linhas, imposto = alíquota sobre o
/// subtotal, total = subtotal + imposto. Tudo em Decimal; float nunca entra
/// em conta de dinheiro.
pub fn compute_totals(items: &[LineAmount], tax_rate: Decimal) -> Totals {
    let subtotal: Decimal = items
        .iter()
        .map(|item| line_total(item.quantity, item.unit_price))
        .sum();
    let tax_amount = round2(subtotal * tax_rate);
    let total_amount = subtotal + tax_amount;

    Totals {
        subtotal,
        tax_amount,
        total_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: i64, scale: u32) -> Decimal {
        Decimal::new(value, scale)
    }

    #[test]
    fn totals_without_tax() {
        let items = [
            LineAmount { quantity: 3, unit_price: dec(1050, 2) }, // 3 x 10,50
            LineAmount { quantity: 1, unit_price: dec(499, 2) },  // 1 x 4,99
        ];
        let totals = compute_totals(&items, Decimal::ZERO);
        assert_eq!(totals.subtotal, dec(3649, 2));
        assert_eq!(totals.tax_amount, Decimal::ZERO.round_dp(2));
        assert_eq!(totals.total_amount, dec(3649, 2));
    }

    #[test]
    fn totals_with_tax_round_half_away_from_zero() {
        // 10,05 * 5% = 0,5025 -> 0,50
        let items = [LineAmount { quantity: 1, unit_price: dec(1005, 2) }];
        let totals = compute_totals(&items, dec(5, 2));
        assert_eq!(totals.tax_amount, dec(50, 2));
        assert_eq!(totals.total_amount, dec(1055, 2));

        // 10,10 * 7,5% = 0,7575 -> 0,76 (meio sobe, não banker's rounding)
        let items = [LineAmount { quantity: 1, unit_price: dec(1010, 2) }];
        let totals = compute_totals(&items, dec(75, 3));
        assert_eq!(totals.tax_amount, dec(76, 2));
    }

    #[test]
    fn total_is_exactly_subtotal_plus_tax() {
        let items = [
            LineAmount { quantity: 7, unit_price: dec(333, 2) },
            LineAmount { quantity: 2, unit_price: dec(12999, 2) },
        ];
        let totals = compute_totals(&items, dec(18, 2));
        assert_eq!(totals.total_amount, totals.subtotal + totals.tax_amount);
    }

    #[test]
    fn recompute_is_stable() {
        // Sem deriva de arredondamento: recalcular N vezes dá sempre o mesmo
        // resultado exato.
        let items = [
            LineAmount { quantity: 3, unit_price: dec(1099, 2) },
            LineAmount { quantity: 5, unit_price: dec(1, 2) },
        ];
        let first = compute_totals(&items, dec(12, 2));
        for _ in 0..100 {
            assert_eq!(compute_totals(&items, dec(12, 2)), first);
        }
    }

    #[test]
    fn empty_items_give_zero() {
        let totals = compute_totals(&[], dec(18, 2));
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.total_amount, Decimal::ZERO);
    }
}
