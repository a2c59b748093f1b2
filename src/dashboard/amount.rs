/// Read a money amount written by a model or an operator.
///
/// Accepts plain numbers, a currency prefix, and either `1.500,00` or
/// `1,500.00` grouping. Repeated dots are grouping, and so is a single dot
/// followed by three digits after an `R$` prefix (`R$ 1.500`). Anything
/// unreadable counts as zero.
pub fn coerce_amount(text: &str) -> f64 {
    let text = text.trim();
    let reais = text.starts_with("R$");
    let cleaned: String = text
        .trim_start_matches("R$")
        .trim_start_matches('$')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(comma), None) => {
            let decimals = cleaned.len() - comma - 1;
            if cleaned.matches(',').count() == 1 && decimals <= 2 {
                cleaned.replace(',', ".")
            } else {
                cleaned.replace(',', "")
            }
        }
        (None, Some(dot)) => {
            let decimals = cleaned.len() - dot - 1;
            if cleaned.matches('.').count() > 1 || (reais && decimals == 3) {
                cleaned.replace('.', "")
            } else {
                cleaned
            }
        }
        (None, None) => cleaned,
    };

    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}
