use unicode_normalization::UnicodeNormalization;

use crate::models::Tables;

/// Canonical comparable form of a free-text name: lower-cased, accents
/// decomposed and dropped, ASCII only. Missing input stays missing.
pub fn normalize_string(value: Option<&str>) -> Option<String> {
    let value = value?;
    Some(
        value
            .to_lowercase()
            .nfkd()
            .filter(char::is_ascii)
            // NFKD can surface upper-case ASCII from compatibility forms (e.g. ℌ)
            .map(|c| c.to_ascii_lowercase())
            .collect(),
    )
}

/// Strip `.`, `/` and `-` from a CNPJ/CPF. Anything else is left alone.
pub fn canonical_tax_id(raw: &str) -> String {
    raw.chars().filter(|c| !matches!(c, '.' | '/' | '-')).collect()
}

/// Join key for congressperson identifiers. Float-typed exports write
/// `1234.0` where the deputies table has `1234`.
pub fn canonical_id(raw: &str) -> String {
    let raw = raw.trim();
    raw.strip_suffix(".0").unwrap_or(raw).to_string()
}

fn normalize_in_place(field: &mut Option<String>) {
    *field = normalize_string(field.as_deref());
}

/// One-time normalization pass over every column that takes part in a
/// comparison. Running it twice leaves the tables unchanged.
pub fn normalize_tables(tables: &mut Tables) {
    for r in &mut tables.reimbursements {
        normalize_in_place(&mut r.congressperson_name);
        normalize_in_place(&mut r.supplier);
    }
    for d in &mut tables.deputies {
        normalize_in_place(&mut d.civil_name);
    }
    for c in &mut tables.companies {
        normalize_in_place(&mut c.name);
        normalize_in_place(&mut c.trade_name);
        if let Some(cnpj) = c.cnpj.as_mut() {
            *cnpj = canonical_tax_id(cnpj);
        }
    }
    tracing::debug!(
        reimbursements = tables.reimbursements.len(),
        companies = tables.companies.len(),
        deputies = tables.deputies.len(),
        "normalized tables"
    );
}
