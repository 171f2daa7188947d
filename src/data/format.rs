/// Sub-dollar prices keep six decimals so small caps stay readable.
pub fn format_price(price: f64) -> String {
    if price < 1.0 {
        format!("${price:.6}")
    } else {
        format!("${price:.2}")
    }
}

pub fn format_percentage(change: f64) -> String {
    let sign = if change >= 0.0 { '+' } else { '-' };
    format!("{sign}{:.2}%", change.abs())
}
