/// Renders amounts as `$150.000.000` or `$1.250,50`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceFormatter {
    pub symbol: String,
}

impl Default for PriceFormatter {
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
        }
    }
}

impl PriceFormatter {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    pub fn format(&self, amount: f64) -> String {
        if !amount.is_finite() {
            return format!("{}-", self.symbol);
        }

        let sign = if amount < 0.0 { "-" } else { "" };
        let cents = (amount.abs() * 100.0).round() as u64;
        let whole = group_thousands(cents / 100);
        match cents % 100 {
            0 => format!("{sign}{}{whole}", self.symbol),
            fraction => format!("{sign}{}{whole},{fraction:02}", self.symbol),
        }
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    grouped
}
