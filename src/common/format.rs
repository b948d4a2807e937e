// src/common/format.rs
//
// Máscaras e formatação (moeda, datas, CPF/CNPJ, telefone, URLs).
// Funções puras, sem estado.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const MONTHS_PT: [&str; 12] = [
    "janeiro", "fevereiro", "março", "abril", "maio", "junho",
    "julho", "agosto", "setembro", "outubro", "novembro", "dezembro",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum DateFormat {
    #[default]
    #[serde(rename = "dd/mm/yyyy")]
    DayMonthYear,
    #[serde(rename = "mm/dd/yyyy")]
    MonthDayYear,
    #[serde(rename = "yyyy-mm-dd")]
    Iso,
}

/// Arredonda para centavos (meio para cima, como o `toFixed(2)` do front).
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `R$ 1.234,56`
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_cents(value);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("{}R$ {},{}", if negative { "-" } else { "" }, grouped, frac_part)
}

/// `12,5%`, `100%`
pub fn format_percent(value: Decimal) -> String {
    format!("{}%", round_cents(value).normalize()).replace('.', ",")
}

pub fn format_date(date: NaiveDate, format: DateFormat) -> String {
    match format {
        DateFormat::DayMonthYear => date.format("%d/%m/%Y").to_string(),
        DateFormat::MonthDayYear => date.format("%m/%d/%Y").to_string(),
        DateFormat::Iso => date.format("%Y-%m-%d").to_string(),
    }
}

/// `17 de outubro de 2026`
pub fn format_date_long(date: NaiveDate) -> String {
    format!(
        "{} de {} de {}",
        date.day(),
        MONTHS_PT[date.month0() as usize],
        date.year()
    )
}

pub fn only_digits(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn apply_mask(digits: &str, mask: &str) -> String {
    let mut out = String::with_capacity(mask.len());
    let mut chars = digits.chars();
    for m in mask.chars() {
        if m == '#' {
            match chars.next() {
                Some(d) => out.push(d),
                None => break,
            }
        } else {
            out.push(m);
        }
    }
    out
}

pub fn mask_cpf(input: &str) -> String {
    apply_mask(&only_digits(input), "###.###.###-##")
}

pub fn mask_cnpj(input: &str) -> String {
    apply_mask(&only_digits(input), "##.###.###/####-##")
}

/// Escolhe a máscara pelo número de dígitos (11 = CPF, 14 = CNPJ).
pub fn mask_tax_document(input: &str) -> String {
    match only_digits(input).len() {
        11 => mask_cpf(input),
        14 => mask_cnpj(input),
        _ => input.trim().to_string(),
    }
}

fn all_same_digit(digits: &[u32]) -> bool {
    digits.windows(2).all(|w| w[0] == w[1])
}

fn to_digit_vec(input: &str) -> Vec<u32> {
    only_digits(input).chars().filter_map(|c| c.to_digit(10)).collect()
}

pub fn is_valid_cpf(input: &str) -> bool {
    let d = to_digit_vec(input);
    if d.len() != 11 || all_same_digit(&d) {
        return false;
    }

    let check = |len: usize| -> u32 {
        let sum: u32 = d[..len]
            .iter()
            .enumerate()
            .map(|(i, v)| v * (len as u32 + 1 - i as u32))
            .sum();
        let rest = (sum * 10) % 11;
        if rest == 10 { 0 } else { rest }
    };

    check(9) == d[9] && check(10) == d[10]
}

pub fn is_valid_cnpj(input: &str) -> bool {
    let d = to_digit_vec(input);
    if d.len() != 14 || all_same_digit(&d) {
        return false;
    }

    const W1: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    const W2: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

    let check = |weights: &[u32]| -> u32 {
        let sum: u32 = weights.iter().zip(d.iter()).map(|(w, v)| w * v).sum();
        let rest = sum % 11;
        if rest < 2 { 0 } else { 11 - rest }
    };

    check(&W1) == d[12] && check(&W2) == d[13]
}

/// CPF (11 dígitos) ou CNPJ (14 dígitos) com dígitos verificadores válidos.
pub fn is_valid_tax_document(input: &str) -> bool {
    match only_digits(input).len() {
        11 => is_valid_cpf(input),
        14 => is_valid_cnpj(input),
        _ => false,
    }
}

/// `(11) 98765-4321` ou `(11) 3456-7890`
pub fn mask_phone(input: &str) -> String {
    let digits = only_digits(input);
    match digits.len() {
        11 => apply_mask(&digits, "(##) #####-####"),
        10 => apply_mask(&digits, "(##) ####-####"),
        _ => input.trim().to_string(),
    }
}

/// Link `wa.me` a partir de um telefone brasileiro (DDI 55 adicionado se faltar).
pub fn whatsapp_link(phone: &str) -> Option<String> {
    let digits = only_digits(phone);
    if digits.len() < 10 {
        return None;
    }
    let full = if digits.starts_with("55") && digits.len() >= 12 {
        digits
    } else {
        format!("55{}", digits)
    };
    Some(format!("https://wa.me/{}", full))
}

pub fn normalize_url(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Some(trimmed.to_string())
    } else {
        Some(format!("https://{}", trimmed))
    }
}

/// Converte links do YouTube/Vimeo para a URL de incorporação.
pub fn video_embed_url(input: &str) -> Option<String> {
    let url = normalize_url(input)?;
    let without_scheme = url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.")
        .trim_start_matches("m.");

    let youtube_id = if let Some(rest) = without_scheme.strip_prefix("youtu.be/") {
        Some(rest)
    } else if let Some(rest) = without_scheme.strip_prefix("youtube.com/shorts/") {
        Some(rest)
    } else if let Some(rest) = without_scheme.strip_prefix("youtube.com/embed/") {
        Some(rest)
    } else if let Some(query) = without_scheme.strip_prefix("youtube.com/watch?") {
        query.split('&').find_map(|kv| kv.strip_prefix("v="))
    } else {
        None
    };

    if let Some(id) = youtube_id {
        let id: String = id
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        if !id.is_empty() {
            return Some(format!("https://www.youtube.com/embed/{}", id));
        }
    }

    if let Some(rest) = without_scheme.strip_prefix("vimeo.com/") {
        let id = only_digits(rest.split('/').next().unwrap_or_default());
        if !id.is_empty() {
            return Some(format!("https://player.vimeo.com/video/{}", id));
        }
    }

    Some(url)
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// `Some("  ")` conta como ausente.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
