use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use rust_decimal::Decimal;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Error,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Error => style(text).red(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned cell showing a rate exactly as received.
pub fn rate_cell(rate: &Decimal) -> Cell {
    Cell::new(rate.normalize().to_string()).set_alignment(CellAlignment::Right)
}

/// Creates a cell for a percentage change with color coding.
pub fn change_cell(change: &Decimal) -> Cell {
    let text = format!("{:.4}%", change);
    let color = if change.is_sign_negative() {
        Color::Red
    } else {
        Color::Green
    };
    Cell::new(text).fg(color).set_alignment(CellAlignment::Right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_style_text_keeps_text() {
        assert!(style_text("Latest rates", StyleType::Title).contains("Latest rates"));
        assert!(style_text("Error: boom", StyleType::Error).contains("Error: boom"));
    }

    #[test]
    fn test_rate_cell_drops_trailing_zeros() {
        let mut table = new_styled_table();
        table.add_row(vec![rate_cell(&dec!(1.2500))]);
        let rendered = table.to_string();
        assert!(rendered.contains("1.25"));
        assert!(!rendered.contains("1.2500"));
    }

    #[test]
    fn test_change_cell_formats_percentage() {
        let mut table = new_styled_table();
        table.add_row(vec![change_cell(&dec!(-0.25))]);
        assert!(table.to_string().contains("-0.2500%"));
    }
}
