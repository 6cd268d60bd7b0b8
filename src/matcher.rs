use std::collections::{BTreeSet, HashMap};

use regex::{Regex, RegexBuilder};

use crate::error::Result;
use crate::models::{Company, Deputy, EnrichedRow, Tables};
use crate::normalize::{canonical_id, canonical_tax_id, normalize_string};

/// `legal_entity` code prefix for EMPRESARIO (INDIVIDUAL).
pub const SOLE_PROPRIETORSHIP: &str = "213-5";

// ---------------------------------------------------------------------------
// Reference names
// ---------------------------------------------------------------------------

/// Normalized civil names of every deputy. Missing and blank names are left
/// out: a blank alternative would match every supplier in a substring scan.
#[derive(Debug, Clone, Default)]
pub struct NameSet {
    names: BTreeSet<String>,
}

impl NameSet {
    pub fn from_deputies(deputies: &[Deputy]) -> Self {
        Self::from_names(deputies.iter().filter_map(|d| d.civil_name.as_deref()))
    }

    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let names = names
            .into_iter()
            .filter(|n| !n.trim().is_empty())
            .map(str::to_string)
            .collect();
        Self { names }
    }

    pub fn contains(&self, value: Option<&str>) -> bool {
        value.map_or(false, |v| self.names.contains(v))
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Exact membership
// ---------------------------------------------------------------------------

/// Flag every value that equals some reference name. Plain set membership:
/// both sides must already be normalized. Missing values never match.
pub fn exact_mask<'a>(values: impl IntoIterator<Item = Option<&'a str>>, names: &NameSet) -> Vec<bool> {
    let mask: Vec<bool> = values.into_iter().map(|v| names.contains(v)).collect();
    tracing::debug!(matched = count(&mask), rows = mask.len(), "exact membership");
    mask
}

// ---------------------------------------------------------------------------
// Substring scan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatternMode {
    /// Each name is escaped and matched literally.
    #[default]
    Literal,
    /// Names are joined into the alternation as written, so regex
    /// metacharacters inside a name change what it matches.
    Raw,
}

/// A single alternation over every reference name, searched anywhere in the
/// target string.
#[derive(Debug)]
pub struct SubstringScanner {
    regex: Option<Regex>,
}

impl SubstringScanner {
    pub fn new(names: &NameSet, mode: PatternMode) -> Result<Self> {
        if names.is_empty() {
            return Ok(Self { regex: None });
        }
        let alternatives: Vec<String> = names
            .iter()
            .map(|n| match mode {
                PatternMode::Literal => regex::escape(n),
                PatternMode::Raw => n.to_string(),
            })
            .collect();
        let pattern = format!("(?:{})", alternatives.join("|"));
        let regex = RegexBuilder::new(&pattern)
            .size_limit(64 * (1 << 20))
            .build()?;
        Ok(Self { regex: Some(regex) })
    }

    pub fn is_match(&self, value: Option<&str>) -> bool {
        match (&self.regex, value) {
            (Some(re), Some(v)) => re.is_match(v),
            _ => false,
        }
    }

    pub fn mask<'a>(&self, values: impl IntoIterator<Item = Option<&'a str>>) -> Vec<bool> {
        let mask: Vec<bool> = values.into_iter().map(|v| self.is_match(v)).collect();
        tracing::debug!(matched = count(&mask), rows = mask.len(), "substring scan");
        mask
    }
}

// ---------------------------------------------------------------------------
// Enrichment join
// ---------------------------------------------------------------------------

/// Left-join reimbursements to companies on the canonical tax ID and to
/// deputies on the congressperson ID. Every reimbursement appears at least
/// once; a right-hand key shared by several rows yields one output row per
/// partner. Missing keys never match.
pub fn enrich(tables: &Tables) -> Vec<EnrichedRow> {
    let mut companies_by_cnpj: HashMap<String, Vec<&Company>> = HashMap::new();
    for company in &tables.companies {
        if let Some(cnpj) = company.cnpj.as_deref() {
            companies_by_cnpj
                .entry(canonical_tax_id(cnpj))
                .or_default()
                .push(company);
        }
    }

    let mut deputies_by_id: HashMap<String, Vec<&Deputy>> = HashMap::new();
    for deputy in &tables.deputies {
        if let Some(id) = deputy.congressperson_id.as_deref() {
            deputies_by_id.entry(canonical_id(id)).or_default().push(deputy);
        }
    }

    let mut rows = Vec::with_capacity(tables.reimbursements.len());
    for reimbursement in &tables.reimbursements {
        let companies: Vec<Option<&Company>> = reimbursement
            .cnpj_cpf
            .as_deref()
            .and_then(|key| companies_by_cnpj.get(&canonical_tax_id(key)))
            .map(|found| found.iter().map(|c| Some(*c)).collect())
            .unwrap_or_else(|| vec![None]);
        let deputies: Vec<Option<&Deputy>> = reimbursement
            .congressperson_id
            .as_deref()
            .and_then(|key| deputies_by_id.get(&canonical_id(key)))
            .map(|found| found.iter().map(|d| Some(*d)).collect())
            .unwrap_or_else(|| vec![None]);

        for company in &companies {
            for deputy in &deputies {
                rows.push(EnrichedRow {
                    reimbursement: reimbursement.clone(),
                    company: company.cloned(),
                    civil_name: deputy.and_then(|d| d.civil_name.clone()),
                });
            }
        }
    }
    tracing::debug!(
        reimbursements = tables.reimbursements.len(),
        rows = rows.len(),
        "enriched reimbursements"
    );
    rows
}

// ---------------------------------------------------------------------------
// Derived queries
// ---------------------------------------------------------------------------

/// Supplier, company name or company trade name is exactly a deputy's name.
pub fn suspect_mask(rows: &[EnrichedRow], names: &NameSet) -> Vec<bool> {
    let mask: Vec<bool> = rows
        .iter()
        .map(|row| {
            let company = row.company.as_ref();
            names.contains(row.reimbursement.supplier.as_deref())
                || names.contains(company.and_then(|c| c.name.as_deref()))
                || names.contains(company.and_then(|c| c.trade_name.as_deref()))
        })
        .collect();
    tracing::debug!(matched = count(&mask), rows = mask.len(), "suspect rows");
    mask
}

/// Supplier equals the claimant's own civil name or the name on the form.
pub fn self_named_mask(rows: &[EnrichedRow]) -> Vec<bool> {
    rows.iter()
        .map(|row| {
            let Some(supplier) = row.reimbursement.supplier.as_deref() else {
                return false;
            };
            row.civil_name.as_deref() == Some(supplier)
                || row.reimbursement.congressperson_name.as_deref() == Some(supplier)
        })
        .collect()
}

pub fn is_sole_proprietor(row: &EnrichedRow) -> bool {
    row.company
        .as_ref()
        .and_then(|c| c.legal_entity.as_deref())
        .map_or(false, |code| code.trim_start().starts_with(SOLE_PROPRIETORSHIP))
}

/// Deputies whose normalized civil name equals the normalized query.
pub fn find_deputies<'a>(deputies: &'a [Deputy], query: &str) -> Vec<&'a Deputy> {
    let Some(query) = normalize_string(Some(query)) else {
        return Vec::new();
    };
    deputies
        .iter()
        .filter(|d| d.civil_name.as_deref() == Some(query.as_str()))
        .collect()
}

pub fn count(mask: &[bool]) -> usize {
    mask.iter().filter(|m| **m).count()
}
