use std::collections::HashSet;

use crate::error::Result;
use crate::matcher::{
    enrich, exact_mask, is_sole_proprietor, self_named_mask, suspect_mask, NameSet,
    PatternMode, SubstringScanner,
};
use crate::models::{EnrichedRow, Reimbursement, ReportRow, Tables};

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

pub struct Report {
    pub key: &'static str,
    pub title: String,
    pub rows: Vec<ReportRow>,
    pub with_legal_entity: bool,
}

impl ReportRow {
    fn from_reimbursement(r: &Reimbursement) -> Self {
        Self {
            issue_date: r.issue_date.clone(),
            congressperson_name: r.congressperson_name.clone(),
            supplier: r.supplier.clone(),
            subquota_description: r.subquota_description.clone(),
            cnpj_cpf: r.cnpj_cpf.clone(),
            document_id: r.document_id.clone(),
            total_net_value: r.total_net_value,
            legal_entity: None,
        }
    }

    fn from_enriched(row: &EnrichedRow) -> Self {
        Self {
            legal_entity: row.company.as_ref().and_then(|c| c.legal_entity.clone()),
            ..Self::from_reimbursement(&row.reimbursement)
        }
    }
}

/// Selected reimbursements, in input order, restricted to the reporting columns.
pub fn project(reimbursements: &[Reimbursement], mask: &[bool]) -> Vec<ReportRow> {
    reimbursements
        .iter()
        .zip(mask)
        .filter(|(_, keep)| **keep)
        .map(|(r, _)| ReportRow::from_reimbursement(r))
        .collect()
}

pub fn project_enriched(rows: &[EnrichedRow], mask: &[bool]) -> Vec<ReportRow> {
    rows.iter()
        .zip(mask)
        .filter(|(_, keep)| **keep)
        .map(|(r, _)| ReportRow::from_enriched(r))
        .collect()
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Suppliers whose name is exactly some deputy's civil name.
pub fn exact_supplier_matches(tables: &Tables, names: &NameSet) -> Report {
    let mask = exact_mask(
        tables.reimbursements.iter().map(|r| r.supplier.as_deref()),
        names,
    );
    Report {
        key: "exact",
        title: "Suppliers named after a congressperson".to_string(),
        rows: project(&tables.reimbursements, &mask),
        with_legal_entity: false,
    }
}

/// Supplier, company name or trade name matches a deputy's civil name.
pub fn suspect_companies(enriched: &[EnrichedRow], names: &NameSet, sole_proprietors: bool) -> Report {
    let mut mask = suspect_mask(enriched, names);
    if sole_proprietors {
        for (keep, row) in mask.iter_mut().zip(enriched) {
            *keep = *keep && is_sole_proprietor(row);
        }
    }
    let title = if sole_proprietors {
        "Sole proprietorships named after a congressperson"
    } else {
        "Companies named after a congressperson"
    };
    Report {
        key: "suspects",
        title: title.to_string(),
        rows: project_enriched(enriched, &mask),
        with_legal_entity: true,
    }
}

/// Suppliers containing a deputy's civil name anywhere in the string.
pub fn substring_supplier_matches(tables: &Tables, names: &NameSet, mode: PatternMode) -> Result<Report> {
    let scanner = SubstringScanner::new(names, mode)?;
    let mask = scanner.mask(tables.reimbursements.iter().map(|r| r.supplier.as_deref()));
    Ok(Report {
        key: "scan",
        title: "Suppliers containing a congressperson's name".to_string(),
        rows: project(&tables.reimbursements, &mask),
        with_legal_entity: false,
    })
}

/// Reimbursements paid to the claimant's own name.
pub fn self_named(enriched: &[EnrichedRow]) -> Report {
    let mask = self_named_mask(enriched);
    Report {
        key: "self-named",
        title: "Reimbursements paid to the congressperson's own name".to_string(),
        rows: project_enriched(enriched, &mask),
        with_legal_entity: false,
    }
}

/// Every analysis in order, sharing one enrichment pass.
pub fn full_run(tables: &Tables, mode: PatternMode) -> Result<Vec<Report>> {
    let names = NameSet::from_deputies(&tables.deputies);
    let enriched = enrich(tables);
    Ok(vec![
        exact_supplier_matches(tables, &names),
        suspect_companies(&enriched, &names, false),
        substring_supplier_matches(tables, &names, mode)?,
        self_named(&enriched),
    ])
}

// ---------------------------------------------------------------------------
// Dataset summary
// ---------------------------------------------------------------------------

pub struct NameSummary {
    pub unique_suppliers: usize,
    pub unique_congresspeople: usize,
    pub reference_names: usize,
}

fn unique<'a>(values: impl Iterator<Item = Option<&'a str>>) -> usize {
    values.flatten().collect::<HashSet<_>>().len()
}

pub fn name_summary(tables: &Tables) -> NameSummary {
    NameSummary {
        unique_suppliers: unique(tables.reimbursements.iter().map(|r| r.supplier.as_deref())),
        unique_congresspeople: unique(
            tables
                .reimbursements
                .iter()
                .map(|r| r.congressperson_name.as_deref()),
        ),
        reference_names: NameSet::from_deputies(&tables.deputies).len(),
    }
}

pub fn total_value(rows: &[ReportRow]) -> f64 {
    rows.iter().filter_map(|r| r.total_net_value).sum()
}
