use std::io::Write;

use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::fmt::{issue_date, money};
use crate::models::ReportRow;
use crate::reports::{total_value, Report};

const COLUMNS: &[&str] = &[
    "issue_date",
    "congressperson_name",
    "supplier",
    "subquota_description",
    "cnpj_cpf",
    "document_id",
    "total_net_value",
];

fn columns(with_legal_entity: bool) -> Vec<&'static str> {
    let mut cols = COLUMNS.to_vec();
    if with_legal_entity {
        cols.push("legal_entity");
    }
    cols
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn raw_fields(row: &ReportRow, with_legal_entity: bool) -> Vec<String> {
    let mut fields = vec![
        text(&row.issue_date).to_string(),
        text(&row.congressperson_name).to_string(),
        text(&row.supplier).to_string(),
        text(&row.subquota_description).to_string(),
        text(&row.cnpj_cpf).to_string(),
        text(&row.document_id).to_string(),
        row.total_net_value.map(|v| v.to_string()).unwrap_or_default(),
    ];
    if with_legal_entity {
        fields.push(text(&row.legal_entity).to_string());
    }
    fields
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

fn write_table(report: &Report, out: &mut dyn Write) -> Result<()> {
    let heading = format!("{} ({})", report.title, report.rows.len());
    if report.rows.is_empty() {
        writeln!(out, "{}\nNo matching reimbursements.", heading.bold())?;
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(columns(report.with_legal_entity));
    for row in &report.rows {
        let mut cells = vec![
            Cell::new(row.issue_date.as_deref().map(issue_date).unwrap_or_default()),
            Cell::new(text(&row.congressperson_name)),
            Cell::new(text(&row.supplier)),
            Cell::new(text(&row.subquota_description)),
            Cell::new(text(&row.cnpj_cpf)),
            Cell::new(text(&row.document_id)),
            Cell::new(row.total_net_value.map(money).unwrap_or_default())
                .set_alignment(CellAlignment::Right),
        ];
        if report.with_legal_entity {
            cells.push(Cell::new(text(&row.legal_entity)));
        }
        table.add_row(cells);
    }
    writeln!(out, "{}\n{table}", heading.bold())?;
    writeln!(out, "Total: {}", money(total_value(&report.rows)))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV / JSON
// ---------------------------------------------------------------------------

fn write_csv(reports: &[Report], out: &mut dyn Write) -> Result<()> {
    let sectioned = reports.len() > 1;
    let with_legal_entity = reports.iter().any(|r| r.with_legal_entity);

    let mut wtr = csv::Writer::from_writer(out);
    let mut header = Vec::new();
    if sectioned {
        header.push("report");
    }
    header.extend(columns(with_legal_entity));
    wtr.write_record(&header)?;

    for report in reports {
        for row in &report.rows {
            let mut record = Vec::new();
            if sectioned {
                record.push(report.key.to_string());
            }
            record.extend(raw_fields(row, with_legal_entity));
            wtr.write_record(&record)?;
        }
    }
    wtr.flush()?;
    Ok(())
}

fn report_json(report: &Report) -> Result<serde_json::Value> {
    let mut rows = serde_json::to_value(&report.rows)?;
    if !report.with_legal_entity {
        if let Some(items) = rows.as_array_mut() {
            for item in items {
                if let Some(obj) = item.as_object_mut() {
                    obj.remove("legal_entity");
                }
            }
        }
    }
    Ok(serde_json::json!({
        "report": report.key,
        "title": report.title,
        "count": report.rows.len(),
        "rows": rows,
    }))
}

fn write_json(reports: &[Report], out: &mut dyn Write) -> Result<()> {
    let value = if let [single] = reports {
        report_json(single)?
    } else {
        serde_json::Value::Array(reports.iter().map(report_json).collect::<Result<Vec<_>>>()?)
    };
    serde_json::to_writer_pretty(&mut *out, &value)?;
    writeln!(out)?;
    Ok(())
}

/// Write one or more reports to `out` in the requested format.
pub fn render(reports: &[Report], format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    match format {
        OutputFormat::Table => {
            for (i, report) in reports.iter().enumerate() {
                if i > 0 {
                    writeln!(out)?;
                }
                write_table(report, out)?;
            }
            Ok(())
        }
        OutputFormat::Csv => write_csv(reports, out),
        OutputFormat::Json => write_json(reports, out),
    }
}

pub fn print(reports: &[Report], format: OutputFormat) -> Result<()> {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    render(reports, format, &mut lock)
}
