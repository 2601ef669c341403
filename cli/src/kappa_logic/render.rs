use colored::*;
use lib_kappa::apis::models::PriceDataItem;
use serde_json::Value;

/// Pretty JSON for stdout.
pub fn json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Fixed-width quote table, change column colored by sign.
pub fn price_table(items: &[PriceDataItem]) -> String {
    let mut out = format!(
        "{:<8} {:<24} {:>4} {:>12} {:>10} {:>9} {:>12} {:>12} {:>14} {:<8}\n",
        "SYMBOL", "NAME", "CCY", "PRICE", "CHANGE", "CHANGE%", "DAY HIGH", "DAY LOW", "VOLUME", "STATE"
    );

    for item in items {
        let change = format!("{:>10.2}", item.market_change);
        let change = if item.market_change < 0.0 { change.red() } else { change.green() };
        out.push_str(&format!(
            "{:<8} {:<24} {:>4} {:>12.2} {} {:>9} {:>12.2} {:>12.2} {:>14.0} {:<8}\n",
            item.symbol,
            truncate(&item.short_name, 24),
            item.currency,
            item.market_price,
            change,
            item.change_percent,
            item.day_high,
            item.day_low,
            item.market_volume,
            item.market_state,
        ));
    }

    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
