use serde::Serialize;

use crate::cli::OutputFormat;

/// Print `data` as pretty JSON, or run `text` for the human-readable form.
pub fn output<T: Serialize>(
    output_format: OutputFormat,
    data: &T,
    text: impl FnOnce(&T),
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
        OutputFormat::Text => text(data),
    }
    Ok(())
}

/// Format an amount with two decimals.
pub fn money(value: f64) -> String {
    format!("{:.2}", value)
}

/// Render an optional cell for tables; null prints as `-`.
pub fn or_dash<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_values() {
        assert_eq!(money(1234.5), "1234.50");
        assert_eq!(or_dash(Some(3)), "3");
        assert_eq!(or_dash::<i32>(None), "-");
    }
}
