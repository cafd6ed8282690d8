//! Table rendering for the API results.

use comfy_table::Cell;
use rust_decimal::Decimal;

use super::ui;
use crate::providers::payload::{CodeTable, RateSeries, Rates};

pub fn code_table(title: &str, codes: &CodeTable) -> String {
    let mut table = ui::new_styled_table();
    let columns: Vec<&String> = {
        let mut columns: Vec<&String> = codes.values().flat_map(|fields| fields.keys()).collect();
        columns.sort();
        columns.dedup();
        columns
    };

    let mut header = vec![ui::header_cell("Code")];
    header.extend(columns.iter().map(|c| ui::header_cell(c)));
    table.set_header(header);

    for (code, fields) in codes {
        let mut row = vec![Cell::new(code)];
        row.extend(
            columns
                .iter()
                .map(|c| Cell::new(fields.get(*c).map(String::as_str).unwrap_or(""))),
        );
        table.add_row(row);
    }

    format!("{}\n{table}", ui::style_text(title, ui::StyleType::Title))
}

pub fn rates_table(title: &str, rates: &Rates) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Symbol"), ui::header_cell("Rate")]);
    for (symbol, rate) in rates {
        table.add_row(vec![Cell::new(symbol), ui::rate_cell(rate)]);
    }
    format!("{}\n{table}", ui::style_text(title, ui::StyleType::Title))
}

/// One row per outer key (date or symbol), one column per inner key.
pub fn series_table(title: &str, key_label: &str, series: &RateSeries) -> String {
    let mut table = ui::new_styled_table();
    let columns: Vec<&String> = {
        let mut columns: Vec<&String> = series.values().flat_map(|rates| rates.keys()).collect();
        columns.sort();
        columns.dedup();
        columns
    };

    let mut header = vec![ui::header_cell(key_label)];
    header.extend(columns.iter().map(|c| ui::header_cell(c)));
    table.set_header(header);

    for (key, rates) in series {
        let mut row = vec![Cell::new(key)];
        row.extend(columns.iter().map(|c| match rates.get(*c) {
            Some(value) if c.ends_with("_pct") => ui::change_cell(value),
            Some(value) => ui::rate_cell(value),
            None => Cell::new("N/A"),
        }));
        table.add_row(row);
    }

    format!("{}\n{table}", ui::style_text(title, ui::StyleType::Title))
}

/// Amounts below one are not sent, the API then converts a single unit.
pub fn conversion_line(amount: i64, from: &str, result: &Decimal, to: &str) -> String {
    format!("{} {from} = {} {to}", amount.max(1), result.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    #[test]
    fn test_rates_table_lists_every_symbol() {
        let rates = Rates::from([("EUR".to_string(), dec!(0.93)), ("GBP".to_string(), dec!(0.8))]);
        let rendered = rates_table("Latest", &rates);
        assert!(rendered.contains("Latest"));
        assert!(rendered.contains("EUR"));
        assert!(rendered.contains("0.93"));
        assert!(rendered.contains("GBP"));
        assert!(rendered.contains("0.8"));
    }

    #[test]
    fn test_series_table_fills_missing_cells() {
        let series = RateSeries::from([
            (
                "2020-01-01".to_string(),
                Rates::from([("EUR".to_string(), dec!(0.89)), ("GBP".to_string(), dec!(0.75))]),
            ),
            (
                "2020-01-02".to_string(),
                Rates::from([("EUR".to_string(), dec!(0.9))]),
            ),
        ]);
        let rendered = series_table("Series", "Date", &series);
        assert!(rendered.contains("2020-01-02"));
        assert!(rendered.contains("N/A"));
    }

    #[test]
    fn test_code_table_columns() {
        let codes = CodeTable::from([(
            "EUR".to_string(),
            BTreeMap::from([
                ("code".to_string(), "EUR".to_string()),
                ("description".to_string(), "Euro".to_string()),
            ]),
        )]);
        let rendered = code_table("Symbols", &codes);
        assert!(rendered.contains("description"));
        assert!(rendered.contains("Euro"));
    }

    #[test]
    fn test_conversion_line() {
        assert_eq!(
            conversion_line(10, "USD", &dec!(9.3000), "EUR"),
            "10 USD = 9.3 EUR"
        );
    }

    #[test]
    fn test_conversion_line_shows_single_unit_for_small_amounts() {
        assert_eq!(
            conversion_line(0, "USD", &dec!(0.93), "EUR"),
            "1 USD = 0.93 EUR"
        );
        assert_eq!(
            conversion_line(-5, "USD", &dec!(0.93), "EUR"),
            "1 USD = 0.93 EUR"
        );
    }
}
