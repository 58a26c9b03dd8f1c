//! Plain-text rendering of lookup results.

use crate::types::SaleRow;

/// Minimum column widths for the title, shop name, and price columns.
pub const TITLE_WIDTH: usize = 43;
pub const SHOP_WIDTH: usize = 12;
pub const PRICE_WIDTH: usize = 8;

/// Render a price the way Python's `repr(float)` does: the shortest decimal
/// that round-trips, keeping at least one fractional digit (`10.0`, `9.99`).
/// Magnitudes below 1e-4 or from 1e16 up switch to exponent form with a
/// signed two-digit exponent (`1e-05`, `1.5e+16`).
pub fn format_price(price: f64) -> String {
    if price.is_nan() {
        return "nan".to_string();
    }
    if price.is_infinite() {
        return if price > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let sci = format!("{:e}", price);
    if let Some((mantissa, exp)) = sci.split_once('e') {
        if let Ok(exp) = exp.parse::<i32>() {
            if price != 0.0 && !(-4..16).contains(&exp) {
                let sign = if exp < 0 { '-' } else { '+' };
                return format!("{}e{}{:02}", mantissa, sign, exp.abs());
            }
        }
    }

    let s = price.to_string();
    if s.contains('.') { s } else { format!("{}.0", s) }
}

/// Render one result line:
/// `title | shop | price | DD-MM-YYYY`, with the first three columns
/// left-justified and padded to their minimum widths.
pub fn format_sale_line(row: &SaleRow) -> String {
    format!(
        "{:<tw$} | {:<sw$} | {:<pw$} | {}",
        row.book_title,
        row.shop_name,
        format_price(row.price),
        row.date_sale.format("%d-%m-%Y"),
        tw = TITLE_WIDTH,
        sw = SHOP_WIDTH,
        pw = PRICE_WIDTH,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(title: &str, shop: &str, price: f64) -> SaleRow {
        SaleRow {
            sale_id: 1,
            book_title: title.to_string(),
            shop_name: shop.to_string(),
            price,
            date_sale: NaiveDate::from_ymd_opt(2023, 5, 1).unwrap(),
        }
    }

    #[test]
    fn price_keeps_one_fractional_digit() {
        assert_eq!(format_price(9.99), "9.99");
        assert_eq!(format_price(10.0), "10.0");
        assert_eq!(format_price(50.05), "50.05");
        assert_eq!(format_price(0.0), "0.0");
    }

    #[test]
    fn price_switches_to_exponent_form_at_extremes() {
        assert_eq!(format_price(1e16), "1e+16");
        assert_eq!(format_price(1.5e16), "1.5e+16");
        assert_eq!(format_price(1e-5), "1e-05");
        assert_eq!(format_price(2.5e-7), "2.5e-07");
        assert_eq!(format_price(1e100), "1e+100");
        assert_eq!(format_price(-1e-5), "-1e-05");
    }

    #[test]
    fn price_stays_decimal_inside_the_plain_range() {
        assert_eq!(format_price(1e15), "1000000000000000.0");
        assert_eq!(format_price(0.0001), "0.0001");
        assert_eq!(format_price(9999999999999998.0), "9999999999999998.0");
        assert_eq!(format_price(f64::INFINITY), "inf");
        assert_eq!(format_price(f64::NAN), "nan");
    }

    #[test]
    fn line_pads_columns_and_formats_date() {
        let line = format_sale_line(&row("Dune", "CityBooks", 9.99));
        let expected = format!(
            "{}{} | CityBooks    | 9.99     | 01-05-2023",
            "Dune",
            " ".repeat(TITLE_WIDTH - 4)
        );
        assert_eq!(line, expected);
    }

    #[test]
    fn long_values_are_not_truncated() {
        let title = "A".repeat(60);
        let line = format_sale_line(&row(&title, "An Unusually Long Shop", 1234567.5));
        assert!(line.starts_with(&format!("{} | An Unusually Long Shop | 1234567.5 | ", title)));
    }

    #[test]
    fn padding_counts_characters_not_bytes() {
        let line = format_sale_line(&row("Мастер и Маргарита", "Лабиринт", 5.0));
        let title_col = line.split(" | ").next().unwrap();
        assert_eq!(title_col.chars().count(), TITLE_WIDTH);
    }
}
