use serde::{Deserialize, Serialize};

/// One expense claim filed by a congressperson.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Reimbursement {
    pub issue_date: Option<String>,
    pub congressperson_id: Option<String>,
    pub congressperson_name: Option<String>,
    pub supplier: Option<String>,
    pub subquota_description: Option<String>,
    pub cnpj_cpf: Option<String>,
    pub document_id: Option<String>,
    pub total_net_value: Option<f64>,
}

/// One registered legal entity.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Company {
    pub cnpj: Option<String>,
    pub name: Option<String>,
    pub trade_name: Option<String>,
    pub legal_entity: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Deputy {
    pub congressperson_id: Option<String>,
    pub civil_name: Option<String>,
}

/// The three datasets held in memory for one run.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub reimbursements: Vec<Reimbursement>,
    pub companies: Vec<Company>,
    pub deputies: Vec<Deputy>,
}

/// A reimbursement with its matching company and deputy attached.
/// Either side is `None` when the left join found no partner.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRow {
    pub reimbursement: Reimbursement,
    pub company: Option<Company>,
    pub civil_name: Option<String>,
}

/// Fixed reporting projection of a matched row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub issue_date: Option<String>,
    pub congressperson_name: Option<String>,
    pub supplier: Option<String>,
    pub subquota_description: Option<String>,
    pub cnpj_cpf: Option<String>,
    pub document_id: Option<String>,
    pub total_net_value: Option<f64>,
    pub legal_entity: Option<String>,
}
