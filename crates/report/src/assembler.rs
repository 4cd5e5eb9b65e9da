//! RIPD report assembly.
//!
//! Lays out a [`Project`] into the fixed nine-section document and hands it
//! to the PDF writer. Layout never fails: missing values render as
//! placeholders and empty collections as a single explanatory line. The only
//! error source is the output sink.
//!
//! Risks and actions are rendered in the order the project holds them. Use
//! [`sort_risks_for_report`] and [`sort_actions_for_report`] (or
//! `Project::sort_for_report`) first when the caller has not sorted them.

use std::io::Write;

use chrono::{NaiveDate, Utc};

use ripd_core::action::{self, Action};
use ripd_core::labels::data_category_label;
use ripd_core::maturity::format_maturity;
use ripd_core::project::Project;
use ripd_core::risk::{self, summarize, Risk, RiskLevel};

use crate::error::ReportError;
use crate::layout::{
    centered_text, line_count, truncate, Align, Color, Document, DocumentBuilder, Run,
    TextStyle, CONTENT_LEFT, CONTENT_RIGHT, CONTENT_WIDTH, MARGIN, PAGE_HEIGHT,
};
use crate::pdf::{write_pdf, DocumentInfo};

/// Product name printed in the footer and the document metadata.
pub const DEFAULT_PRODUCT_NAME: &str = "RIPD Manager";

pub const NO_RISKS_PLACEHOLDER: &str = "Nenhum risco identificado.";
pub const NO_ACTIONS_PLACEHOLDER: &str = "Nenhuma ação definida.";
const NOT_INFORMED: &str = "Não informado";
const EMPTY_SIGNATURE: &str = "_______________________________";

const SECTION_COLOR: Color = Color::rgb(0x1e, 0x40, 0xaf);

// ---------------------------------------------------------------------------
// Risk table geometry
// ---------------------------------------------------------------------------

/// Column left edges and widths: description, source, I, P, value, level.
const RISK_COLUMNS: [(f32, f32); 6] = [
    (50.0, 180.0),
    (235.0, 100.0),
    (340.0, 25.0),
    (365.0, 25.0),
    (390.0, 35.0),
    (430.0, 60.0),
];
const RISK_HEADERS: [&str; 6] = ["Descrição", "Fonte", "I", "P", "Valor", "Nível"];
const RISK_HEADER_RULE_OFFSET: f32 = 15.0;
const RISK_FIRST_ROW_OFFSET: f32 = 20.0;
const RISK_ROW_STEP: f32 = 18.0;
/// A row starting below this `y` moves to a new page.
const RISK_ROW_LIMIT: f32 = 750.0;
const RISK_DESCRIPTION_CHARS: usize = 40;
const RISK_SOURCE_CHARS: usize = 20;

const FOOTER_OFFSET: f32 = 30.0;

/// Render-time options.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Date printed in the footer and written as the creation date.
    pub generated_on: NaiveDate,
    pub product_name: String,
}

impl ReportOptions {
    pub fn new(generated_on: NaiveDate) -> Self {
        Self {
            generated_on,
            product_name: DEFAULT_PRODUCT_NAME.to_string(),
        }
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::new(Utc::now().date_naive())
    }
}

/// Render the report for `project` into an in-memory PDF.
pub fn render_report(project: &Project, options: &ReportOptions) -> Result<Vec<u8>, ReportError> {
    let mut buffer = Vec::new();
    render_report_to(project, options, &mut buffer)?;
    Ok(buffer)
}

/// Render the report for `project` into `out`.
pub fn render_report_to<W: Write>(
    project: &Project,
    options: &ReportOptions,
    out: W,
) -> Result<(), ReportError> {
    let document = layout_report(project, options);
    let info = DocumentInfo {
        title: format!("RIPD - {}", project.details.name),
        producer: options.product_name.clone(),
        creation_date: options.generated_on.format("D:%Y%m%d000000").to_string(),
    };
    write_pdf(&document, &info, out)?;

    tracing::info!(
        project_id = %project.id,
        pages = document.page_count(),
        risks = project.risks().len(),
        actions = project.actions().len(),
        "Rendered RIPD report"
    );
    Ok(())
}

/// Sort risks by critical value, highest first.
pub fn sort_risks_for_report(risks: &mut [Risk]) {
    risk::sort_by_criticality(risks);
}

/// Sort actions by status, then by priority, highest first.
pub fn sort_actions_for_report(actions: &mut [Action]) {
    action::sort_for_report(actions);
}

/// Lay out every section of the report, stamping footers last.
pub fn layout_report(project: &Project, options: &ReportOptions) -> Document {
    let mut doc = DocumentBuilder::new();

    title_block(&mut doc);
    identification(&mut doc, project);
    operators(&mut doc, project);
    treatment_nature(&mut doc, project);
    data_categories(&mut doc, project);
    international_transfer(&mut doc, project);

    doc.add_page();
    risk_matrix(&mut doc, project.risks());

    doc.add_page();
    action_plan(&mut doc, project.actions());
    retention(&mut doc, project);

    doc.add_page();
    approvals(&mut doc, project);

    let footer_style = TextStyle::regular(8.0);
    let generated = options.generated_on.format("%d/%m/%Y").to_string();
    doc.stamp_pages(|page, number, total| {
        let text = format!(
            "{} - Gerado em {generated} - Página {number} de {total}",
            options.product_name
        );
        page.ops
            .push(centered_text(PAGE_HEIGHT - FOOTER_OFFSET, &text, footer_style));
    });

    let document = doc.finish();
    tracing::debug!(project_id = %project.id, pages = document.page_count(), "Laid out report");
    document
}

// ---------------------------------------------------------------------------
// Building blocks
// ---------------------------------------------------------------------------

fn body() -> TextStyle {
    TextStyle::regular(10.0)
}

fn section(doc: &mut DocumentBuilder, title: &str) {
    doc.text(title, TextStyle::bold(12.0).with_color(SECTION_COLOR));
    doc.rule(CONTENT_LEFT, CONTENT_RIGHT, SECTION_COLOR);
    doc.move_down(0.5);
}

fn field(doc: &mut DocumentBuilder, label: &str, value: &str) {
    let value = if value.trim().is_empty() { "N/A" } else { value };
    let label = format!("{label}: ");
    doc.paragraph(
        &[
            Run::new(&label, TextStyle::bold(10.0)),
            Run::new(value, body()),
        ],
        Align::Left,
    );
}

fn or_not_informed(value: Option<&str>) -> &str {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(NOT_INFORMED)
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn title_block(doc: &mut DocumentBuilder) {
    let title = TextStyle::bold(20.0);
    doc.text_aligned("RELATÓRIO DE IMPACTO À", title, Align::Center);
    doc.text_aligned("PROTEÇÃO DE DADOS PESSOAIS", title, Align::Center);
    doc.move_down(1.0);
    doc.text_aligned(
        "Modelo 2.0 SGD - Lei 14.790/2023",
        TextStyle::regular(14.0),
        Align::Center,
    );
    doc.move_down(2.0);
}

fn identification(doc: &mut DocumentBuilder, project: &Project) {
    let details = &project.details;
    section(doc, "1. IDENTIFICAÇÃO DO PROJETO");
    field(doc, "Nome do Projeto", &details.name);
    field(doc, "Descrição", or_not_informed(details.description.as_deref()));
    field(doc, "Controlador", &details.controller);
    field(doc, "DPO Responsável", &details.dpo_name);
    field(doc, "Email do DPO", or_not_informed(details.dpo_email.as_deref()));
    field(doc, "Status", details.status.label());
    field(doc, "Maturidade", &format_maturity(project.maturity_score()));
    doc.move_down(1.0);
}

fn operators(doc: &mut DocumentBuilder, project: &Project) {
    let operators = project.operators();
    if !operators.is_empty() {
        section(doc, "2. OPERADORES DE DADOS");
        for (index, operator) in operators.iter().enumerate() {
            let name = format!("{}. {}", index + 1, operator.name);
            let detail = match operator.country.as_deref().filter(|c| !c.is_empty()) {
                Some(country) => format!(" ({} - {country})", operator.operator_type),
                None => format!(" ({})", operator.operator_type),
            };
            doc.paragraph(
                &[
                    Run::new(&name, TextStyle::bold(10.0)),
                    Run::new(&detail, body()),
                ],
                Align::Left,
            );
        }
    }
    doc.move_down(1.0);
}

fn treatment_nature(doc: &mut DocumentBuilder, project: &Project) {
    section(doc, "3. NATUREZA DO TRATAMENTO");
    for (label, checked) in project.details.flags.checklist() {
        doc.checkbox(checked, label, body());
    }
    doc.move_down(1.0);
}

fn data_categories(doc: &mut DocumentBuilder, project: &Project) {
    let details = &project.details;
    section(doc, "4. CATEGORIAS DE DADOS");
    if details.data_categories.is_empty() {
        doc.text("Nenhuma categoria informada", body());
    } else {
        let categories = details
            .data_categories
            .iter()
            .map(|c| data_category_label(c))
            .collect::<Vec<_>>()
            .join(", ");
        doc.text(&categories, body());
    }
    field(
        doc,
        "Método de Coleta",
        or_not_informed(details.collection_method.as_deref()),
    );
}

fn international_transfer(doc: &mut DocumentBuilder, project: &Project) {
    let transfer = &project.details.transfer;
    if !transfer.enabled {
        return;
    }
    doc.move_down(1.0);
    section(doc, "5. TRANSFERÊNCIA INTERNACIONAL");
    let countries = transfer.countries.join(", ");
    field(doc, "Países", or_not_informed(Some(countries.as_str())));
    field(doc, "Mecanismo", or_not_informed(transfer.mechanism.as_deref()));
}

fn risk_matrix(doc: &mut DocumentBuilder, risks: &[Risk]) {
    section(doc, "6. MATRIZ DE RISCOS");
    if risks.is_empty() {
        doc.text(NO_RISKS_PLACEHOLDER, body());
        return;
    }

    let summary = summarize(risks);
    doc.text(&format!("Total de Riscos: {}", summary.total), body());
    doc.text(
        &format!("Média de Criticidade: {:.2}", summary.average_critical_value),
        body(),
    );
    doc.text(
        &format!(
            "Críticos: {} | Altos: {} | Médios: {} | Baixos: {}",
            summary.by_level.get(RiskLevel::Critical),
            summary.by_level.get(RiskLevel::High),
            summary.by_level.get(RiskLevel::Medium),
            summary.by_level.get(RiskLevel::Low),
        ),
        body(),
    );
    doc.move_down(1.0);

    let table_top = doc.y();
    let mut row_y = risk_table_header(doc, table_top);
    let cell = TextStyle::regular(8.0);
    for risk in risks {
        if row_y > RISK_ROW_LIMIT {
            doc.add_page();
            row_y = risk_table_header(doc, MARGIN);
        }

        let level_color = Color::from_hex(risk.level().color()).unwrap_or(Color::BLACK);
        let cells = [
            (truncate(&risk.description, RISK_DESCRIPTION_CHARS), Align::Left, cell),
            (truncate(&risk.source, RISK_SOURCE_CHARS), Align::Left, cell),
            (risk.impact().to_string(), Align::Center, cell),
            (risk.probability().to_string(), Align::Center, cell),
            (risk.critical_value().to_string(), Align::Center, cell),
            (
                risk.level().label().to_string(),
                Align::Left,
                cell.with_color(level_color),
            ),
        ];
        for ((text, align, style), (x, width)) in cells.iter().zip(RISK_COLUMNS) {
            doc.text_at(x, row_y, width, *align, text, *style);
        }
        row_y += RISK_ROW_STEP;
    }
    doc.set_y(row_y);
}

/// Draw the column header at `top` and return the `y` of the first row.
fn risk_table_header(doc: &mut DocumentBuilder, top: f32) -> f32 {
    let style = TextStyle::bold(9.0);
    for (index, (header, (x, width))) in RISK_HEADERS.iter().zip(RISK_COLUMNS).enumerate() {
        let align = if (2..=4).contains(&index) {
            Align::Center
        } else {
            Align::Left
        };
        doc.text_at(x, top, width, align, header, style);
    }
    doc.hline(
        CONTENT_LEFT,
        CONTENT_RIGHT,
        top + RISK_HEADER_RULE_OFFSET,
        Color::BLACK,
    );
    top + RISK_FIRST_ROW_OFFSET
}

fn action_plan(doc: &mut DocumentBuilder, actions: &[Action]) {
    section(doc, "7. PLANO DE AÇÃO");
    if actions.is_empty() {
        doc.text(NO_ACTIONS_PLACEHOLDER, body());
        return;
    }

    let detail = TextStyle::regular(9.0);
    let indent = 12.0;
    for (index, action) in actions.iter().enumerate() {
        let measure = if action.measure.trim().is_empty() {
            "Medida sem nome"
        } else {
            action.measure.as_str()
        };
        doc.text(&format!("{}. {measure}", index + 1), TextStyle::bold(10.0));

        let deadline = action
            .deadline
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "Não definido".to_string());
        doc.text_indented(
            &format!("Responsável: {}", or_not_informed(action.responsible.as_deref())),
            detail,
            indent,
        );
        doc.text_indented(&format!("Prazo: {deadline}"), detail, indent);
        doc.text_indented(
            &format!("Status: {}", action.status.label()),
            detail,
            indent,
        );
        if let Some(description) = action.description.as_deref().filter(|d| !d.is_empty()) {
            doc.text_indented(&format!("Descrição: {description}"), detail, indent);
        }
        doc.move_down(0.5);
    }
}

fn retention(doc: &mut DocumentBuilder, project: &Project) {
    let retention = &project.details.retention;
    let Some(months) = retention.period() else {
        return;
    };
    doc.move_down(1.0);
    section(doc, "8. RETENÇÃO DE DADOS");
    field(doc, "Período", &format!("{months} meses"));
    let justification = retention
        .justification
        .as_deref()
        .filter(|j| !j.trim().is_empty())
        .unwrap_or("Não informada");
    field(doc, "Justificativa", justification);
}

fn approvals(doc: &mut DocumentBuilder, project: &Project) {
    section(doc, "9. APROVAÇÕES E ASSINATURAS");
    doc.move_down(1.0);
    doc.text(
        "Os responsáveis abaixo declaram ciência e aprovação do conteúdo deste \
         Relatório de Impacto à Proteção de Dados.",
        body(),
    );
    doc.move_down(2.0);

    let signatures = &project.details.signatures;
    let blocks = [
        SignatureBlock {
            title: "Responsável pela Elaboração",
            name: signatures.preparer_name.as_deref(),
            role: signatures.preparer_role.as_deref(),
        },
        SignatureBlock {
            title: "Gestor da Área de Negócio",
            name: signatures.manager_name.as_deref(),
            role: signatures.manager_role.as_deref(),
        },
        SignatureBlock {
            title: "Encarregado pelo Tratamento de Dados Pessoais (DPO)",
            name: Some(project.details.dpo_name.as_str()),
            role: Some("DPO / Encarregado"),
        },
    ];
    for block in &blocks {
        block.render(doc);
    }
}

/// One approval block: title, space to sign, a rule, the name and the role.
/// A block never spans two pages.
struct SignatureBlock<'a> {
    title: &'a str,
    name: Option<&'a str>,
    role: Option<&'a str>,
}

impl SignatureBlock<'_> {
    const SIGNING_LINES: f32 = 2.0;
    const RULE_END: f32 = 300.0;

    fn name(&self) -> &str {
        self.name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(EMPTY_SIGNATURE)
    }

    fn role(&self) -> Option<&str> {
        self.role.filter(|r| !r.trim().is_empty())
    }

    fn role_style() -> TextStyle {
        TextStyle::regular(9.0).with_color(Color::GREY)
    }

    /// Total vertical space the block takes, including the gaps around it.
    fn height(&self) -> f32 {
        let line = body().line_height();
        let title_lines = line_count(self.title, TextStyle::bold(10.0), CONTENT_WIDTH);
        let name_lines = line_count(self.name(), body(), CONTENT_WIDTH);
        let role_height = self
            .role()
            .map(|role| {
                let style = Self::role_style();
                line_count(role, style, CONTENT_WIDTH) as f32 * style.line_height()
            })
            .unwrap_or(0.0);
        line + title_lines as f32 * line
            + Self::SIGNING_LINES * line
            + 0.5 * line
            + name_lines as f32 * line
            + role_height
            + line
    }

    fn render(&self, doc: &mut DocumentBuilder) {
        if doc.remaining() < self.height() && doc.y() > MARGIN {
            doc.add_page();
        }
        let line = body().line_height();
        doc.space(line);
        doc.text(self.title, TextStyle::bold(10.0));
        doc.space(Self::SIGNING_LINES * line);
        doc.rule(CONTENT_LEFT, Self::RULE_END, Color::BLACK);
        doc.space(0.5 * line);
        doc.text(self.name(), body());
        if let Some(role) = self.role() {
            doc.text(role, Self::role_style());
        }
        doc.space(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{DrawOp, CONTENT_BOTTOM};
    use ripd_core::action::{ActionStatus, NewAction};
    use ripd_core::project::{ProjectDetails, ProjectStatus, Retention};
    use ripd_core::risk::NewRisk;

    fn options() -> ReportOptions {
        ReportOptions::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    }

    fn project() -> Project {
        Project::new(
            "p-1".into(),
            ProjectDetails {
                name: "Cadastro de apostadores".into(),
                controller: "Bet Co".into(),
                dpo_name: "Ana Souza".into(),
                ..Default::default()
            },
        )
    }

    fn new_risk(description: &str, impact: u8, probability: u8) -> NewRisk {
        NewRisk {
            description: description.into(),
            source: "Sistema".into(),
            impact,
            probability,
            mitigation: None,
        }
    }

    fn page_with(document: &Document, needle: &str) -> Option<usize> {
        document.pages.iter().position(|p| p.contains_text(needle))
    }

    #[test]
    fn test_sections_follow_fixed_order() {
        let mut project = project();
        project.details.transfer.enabled = true;
        project.details.retention = Retention {
            period_months: Some(24),
            justification: None,
        };
        let document = layout_report(&project, &options());
        let all: Vec<&str> = document.pages.iter().flat_map(|p| p.texts()).collect();
        let position = |needle: &str| all.iter().position(|t| t.contains(needle)).unwrap();

        let order = [
            "1. IDENTIFICAÇÃO DO PROJETO",
            "3. NATUREZA DO TRATAMENTO",
            "4. CATEGORIAS DE DADOS",
            "5. TRANSFERÊNCIA INTERNACIONAL",
            "6. MATRIZ DE RISCOS",
            "7. PLANO DE AÇÃO",
            "8. RETENÇÃO DE DADOS",
            "9. APROVAÇÕES E ASSINATURAS",
        ];
        for pair in order.windows(2) {
            assert!(position(pair[0]) < position(pair[1]), "{pair:?}");
        }
    }

    #[test]
    fn test_optional_sections_are_omitted() {
        let document = layout_report(&project(), &options());
        assert!(page_with(&document, "2. OPERADORES DE DADOS").is_none());
        assert!(page_with(&document, "5. TRANSFERÊNCIA INTERNACIONAL").is_none());
        assert!(page_with(&document, "8. RETENÇÃO DE DADOS").is_none());
    }

    #[test]
    fn test_risk_action_and_approval_sections_start_new_pages() {
        let document = layout_report(&project(), &options());
        let risks = page_with(&document, "6. MATRIZ DE RISCOS").unwrap();
        let actions = page_with(&document, "7. PLANO DE AÇÃO").unwrap();
        let approvals = page_with(&document, "9. APROVAÇÕES").unwrap();
        assert_eq!(risks, 1);
        assert_eq!(actions, 2);
        assert_eq!(approvals, 3);
    }

    #[test]
    fn test_identification_fields_and_labels() {
        let mut project = project();
        project.details.status = ProjectStatus::InReview;
        project.add_action(NewAction {
            measure: "MFA".into(),
            description: None,
            responsible: None,
            deadline: None,
            priority: 5,
            status: ActionStatus::Completed,
        });
        let document = layout_report(&project, &options());
        let first = &document.pages[0];
        assert!(first.contains_text("Em Análise"));
        assert!(first.contains_text("5.00/5.00"));
        assert!(first.contains_text(NOT_INFORMED));
    }

    #[test]
    fn test_summary_and_levels_in_risk_page() {
        let mut project = project();
        project.add_risks([new_risk("Vazamento", 5, 4), new_risk("Indisponibilidade", 2, 5)]);
        let document = layout_report(&project, &options());
        let page = &document.pages[page_with(&document, "6. MATRIZ").unwrap()];
        assert!(page.contains_text("Total de Riscos: 2"));
        assert!(page.contains_text("Média de Criticidade: 15.00"));
        assert!(page.contains_text("Críticos: 1 | Altos: 0 | Médios: 1 | Baixos: 0"));
        assert!(page.contains_text("Crítico"));
    }

    #[test]
    fn test_level_cell_uses_level_color() {
        let mut project = project();
        project.add_risk(new_risk("Vazamento", 5, 5));
        let document = layout_report(&project, &options());
        let page = &document.pages[page_with(&document, "6. MATRIZ").unwrap()];
        let color = page.ops.iter().find_map(|op| match op {
            DrawOp::Text { style, text, .. } if text == "Crítico" => Some(style.color),
            _ => None,
        });
        assert_eq!(color, Color::from_hex("#ef4444"));
    }

    #[test]
    fn test_long_descriptions_are_truncated() {
        let mut project = project();
        let description = "a".repeat(60);
        project.add_risk(new_risk(&description, 3, 3));
        let document = layout_report(&project, &options());
        let expected = format!("{}...", "a".repeat(37));
        assert!(page_with(&document, &expected).is_some());
        assert!(page_with(&document, &description).is_none());
    }

    #[test]
    fn test_action_plan_lines() {
        let mut project = project();
        project.add_action(NewAction {
            measure: "".into(),
            description: Some("Revisão trimestral".into()),
            responsible: Some("TI".into()),
            deadline: NaiveDate::from_ymd_opt(2024, 4, 14),
            priority: 4,
            status: ActionStatus::InProgress,
        });
        let document = layout_report(&project, &options());
        let page = &document.pages[page_with(&document, "7. PLANO").unwrap()];
        assert!(page.contains_text("1. Medida sem nome"));
        assert!(page.contains_text("Responsável: TI"));
        assert!(page.contains_text("Prazo: 14/04/2024"));
        assert!(page.contains_text("Status: Em Andamento"));
        assert!(page.contains_text("Descrição: Revisão trimestral"));
    }

    #[test]
    fn test_missing_deadline_placeholder() {
        let mut project = project();
        project.add_action(NewAction {
            measure: "Treinamento".into(),
            description: None,
            responsible: None,
            deadline: None,
            priority: 3,
            status: ActionStatus::Pending,
        });
        let document = layout_report(&project, &options());
        let page = &document.pages[page_with(&document, "7. PLANO").unwrap()];
        let plan: Vec<&str> = page
            .texts()
            .skip_while(|t| !t.starts_with("7. PLANO"))
            .take_while(|t| !t.starts_with("8. "))
            .collect();
        assert!(plan.contains(&"Prazo: Não definido"));
        assert!(plan.iter().all(|t| !t.starts_with("Descrição")));
    }

    #[test]
    fn test_multiline_justification_keeps_line_breaks() {
        let mut project = project();
        project.details.retention = Retention {
            period_months: Some(12),
            justification: Some("Linha um\nLinha dois".into()),
        };
        let document = layout_report(&project, &options());
        let page = &document.pages[page_with(&document, "8. RETENÇÃO").unwrap()];
        let y_of = |needle: &str| {
            page.ops.iter().find_map(|op| match op {
                DrawOp::Text { y, text, .. } if text == needle => Some(*y),
                _ => None,
            })
        };
        let first = y_of("Linha um").unwrap();
        let second = y_of("Linha dois").unwrap();
        assert!(second > first);
        assert!(!page.contains_text("Linha um Linha dois"));
    }

    #[test]
    fn test_empty_signatures_render_blank_lines() {
        let document = layout_report(&project(), &options());
        let page = document.pages.last().unwrap();
        assert_eq!(page.texts().filter(|t| *t == EMPTY_SIGNATURE).count(), 2);
        assert!(page.contains_text("Ana Souza"));
        assert!(page.contains_text("DPO / Encarregado"));
    }

    #[test]
    fn test_footer_on_every_page() {
        let document = layout_report(&project(), &options());
        let total = document.page_count();
        for (index, page) in document.pages.iter().enumerate() {
            let footer = format!(
                "RIPD Manager - Gerado em 15/03/2024 - Página {} de {total}",
                index + 1
            );
            assert!(page.contains_text(&footer), "missing footer on page {}", index + 1);
        }
    }

    #[test]
    fn test_risk_rows_stay_above_bottom_margin() {
        let mut project = project();
        project.add_risks((0..120).map(|i| new_risk(&format!("Risco {i}"), 3, 4)));
        let document = layout_report(&project, &options());
        for page in &document.pages {
            for op in &page.ops {
                if let DrawOp::Text { y, style, text, .. } = op {
                    if text.starts_with("RIPD Manager") {
                        continue;
                    }
                    assert!(y + style.line_height() <= CONTENT_BOTTOM + 0.01, "{text} at {y}");
                }
            }
        }
    }

    #[test]
    fn test_sort_helpers_apply_report_order() {
        let mut project = project();
        project.add_risks([new_risk("baixo", 1, 2), new_risk("alto", 5, 5)]);
        let mut risks = project.risks().to_vec();
        sort_risks_for_report(&mut risks);
        assert_eq!(risks[0].description, "alto");
    }
}
