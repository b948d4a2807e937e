// src/documents/preview.rs

use crate::{
    common::format::{
        escape_html, format_currency, format_date, format_percent, mask_phone, mask_tax_document, non_empty,
    },
    documents::contract_text::deadline_description,
    models::{
        contract::{Contract, PersonType},
        freelancer::Freelancer,
        proposal::Proposal,
        settings::UserSettings,
    },
};

/// Documento a pré-visualizar.
#[derive(Debug, Clone, Copy)]
pub enum DocumentRef<'a> {
    Proposal(&'a Proposal),
    Contract(&'a Contract),
}

/// Dados de quem emite o documento e preferências de exibição.
#[derive(Debug, Clone, Copy)]
pub struct PreviewContext<'a> {
    pub freelancer: Option<&'a Freelancer>,
    pub settings: &'a UserSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Field { label: String, value: String },
    Paragraph(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub class: &'static str,
    pub heading: String,
    pub blocks: Vec<Block>,
}

impl Section {
    fn new(class: &'static str, heading: &str) -> Self {
        Self { class, heading: heading.to_string(), blocks: Vec::new() }
    }

    fn field(&mut self, label: &str, value: impl Into<String>) -> &mut Self {
        self.blocks.push(Block::Field { label: label.to_string(), value: value.into() });
        self
    }

    // Campo opcional: vazio não gera rótulo
    fn optional(&mut self, label: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.field(label, v);
        }
        self
    }

    fn paragraph(&mut self, text: impl Into<String>) -> &mut Self {
        self.blocks.push(Block::Paragraph(text.into()));
        self
    }
}

/// Layout neutro usado tanto pelo HTML quanto pelo PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintableDocument {
    pub kind: &'static str,
    pub title: String,
    pub subtitle: Option<String>,
    pub sections: Vec<Section>,
    pub status: &'static str,
    pub status_label: &'static str,
    pub footer: Vec<String>,
}

pub fn printable(doc: DocumentRef<'_>, ctx: &PreviewContext<'_>) -> PrintableDocument {
    match doc {
        DocumentRef::Proposal(p) => proposal_layout(p, ctx),
        DocumentRef::Contract(c) => contract_layout(c, ctx),
    }
}

fn issuer_subtitle(ctx: &PreviewContext<'_>) -> Option<String> {
    let f = ctx.freelancer?;
    Some(match f.specialty.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(specialty) => format!("{} · {}", f.name, specialty),
        None => f.name.clone(),
    })
}

fn footer_lines(ctx: &PreviewContext<'_>) -> Vec<String> {
    let Some(f) = ctx.freelancer else {
        return Vec::new();
    };
    let mut lines = vec![f.name.clone(), f.email.clone()];
    if let Some(phone) = non_empty(&f.phone) {
        lines.push(mask_phone(phone));
    }
    lines
}

fn proposal_layout(p: &Proposal, ctx: &PreviewContext<'_>) -> PrintableDocument {
    let date_format = ctx.settings.date_format;

    let mut client = Section::new("client", "Cliente");
    client
        .field("Nome", p.client_name.trim())
        .optional("E-mail", non_empty(&p.client_email))
        .optional("Telefone", non_empty(&p.client_phone).map(mask_phone).as_deref());

    let mut service = Section::new("service", "Serviço");
    service.field("Serviço", p.service.trim());
    if let Some(scope) = non_empty(&p.scope) {
        service.paragraph(scope);
    }
    service.optional("Prazo", non_empty(&p.deadline));

    let mut value = Section::new("value", "Investimento");
    value
        .field("Valor", format_currency(p.value))
        .optional("Forma de pagamento", non_empty(&p.payment_method))
        .field("Validade da proposta", ctx.settings.validity_text());

    let mut footer = footer_lines(ctx);
    footer.push(format!("Emitida em {}", format_date(p.created_at.date_naive(), date_format)));

    PrintableDocument {
        kind: "proposal",
        title: "PROPOSTA COMERCIAL".to_string(),
        subtitle: issuer_subtitle(ctx),
        sections: vec![client, service, value],
        status: p.status.as_str(),
        status_label: p.status.label(),
        footer,
    }
}

fn contract_address(c: &Contract) -> Option<String> {
    let parts: Vec<&str> = [non_empty(&c.client_address), non_empty(&c.client_city), non_empty(&c.client_state)]
        .into_iter()
        .flatten()
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

fn contract_layout(c: &Contract, ctx: &PreviewContext<'_>) -> PrintableDocument {
    let date_format = ctx.settings.date_format;

    let mut client = Section::new("client", "Contratante");
    match c.person_type {
        PersonType::Individual => {
            client
                .field("Nome", c.client_name.trim())
                .optional("CPF", non_empty(&c.client_document).map(mask_tax_document).as_deref())
                .optional("RG", non_empty(&c.client_rg));
        }
        PersonType::Company => {
            client
                .optional("Razão social", non_empty(&c.client_company_name))
                .optional("CNPJ", non_empty(&c.client_document).map(mask_tax_document).as_deref())
                .field("Representante", c.client_name.trim());
        }
    }
    client
        .optional("Endereço", contract_address(c).as_deref())
        .optional("Telefone", non_empty(&c.client_phone).map(mask_phone).as_deref())
        .optional("E-mail", non_empty(&c.client_email));

    let mut service = Section::new("service", "Serviço");
    service
        .field("Serviço", c.service_name.trim())
        .optional("Escopo", non_empty(&c.service_scope))
        .optional("Entregas", non_empty(&c.deliverables));
    let deadline = deadline_description(c);
    service.optional("Prazo", Some(deadline.as_str()));

    let mut value = Section::new("value", "Pagamento");
    value
        .field("Valor", format_currency(c.value))
        .field("Forma de pagamento", c.payment_type.label());
    if c.installments.len() > 1 {
        for i in &c.installments {
            let mut line = format!(
                "{}ª parcela: {} ({})",
                i.number,
                format_currency(i.amount),
                format_percent(i.percentage)
            );
            if let Some(due) = i.due_date {
                line.push_str(&format!(", vencimento {}", format_date(due, date_format)));
            }
            value.paragraph(line);
        }
    }
    value.optional("Observações", non_empty(&c.payment_notes));

    let mut sections = vec![client, service, value];

    if !c.contract_text.trim().is_empty() {
        let mut terms = Section::new("terms", "Termos do contrato");
        for line in c.contract_text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            terms.paragraph(line);
        }
        sections.push(terms);
    }

    let mut footer = footer_lines(ctx);
    footer.push(format!("Emitido em {}", format_date(c.created_at.date_naive(), date_format)));

    PrintableDocument {
        kind: "contract",
        title: "CONTRATO DE PRESTAÇÃO DE SERVIÇOS".to_string(),
        subtitle: issuer_subtitle(ctx),
        sections,
        status: c.status.as_str(),
        status_label: c.status.label(),
        footer,
    }
}

pub fn render_layout_html(doc: &PrintableDocument) -> String {
    let mut html = String::new();
    html.push_str(&format!("<article class=\"document document--{}\">\n", doc.kind));

    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape_html(&doc.title)));
    if let Some(subtitle) = &doc.subtitle {
        html.push_str(&format!("<p class=\"subtitle\">{}</p>\n", escape_html(subtitle)));
    }
    html.push_str(&format!(
        "<span class=\"status status--{}\">{}</span>\n",
        doc.status,
        escape_html(doc.status_label)
    ));
    html.push_str("</header>\n");

    for section in &doc.sections {
        html.push_str(&format!("<section class=\"{}\">\n", section.class));
        html.push_str(&format!("<h2>{}</h2>\n", escape_html(&section.heading)));
        for block in &section.blocks {
            match block {
                Block::Field { label, value } => html.push_str(&format!(
                    "<p><strong>{}:</strong> {}</p>\n",
                    escape_html(label),
                    escape_html(value)
                )),
                Block::Paragraph(text) => html.push_str(&format!("<p>{}</p>\n", escape_html(text))),
            }
        }
        html.push_str("</section>\n");
    }

    if !doc.footer.is_empty() {
        html.push_str("<footer>\n");
        for line in &doc.footer {
            html.push_str(&format!("<p>{}</p>\n", escape_html(line)));
        }
        html.push_str("</footer>\n");
    }

    html.push_str("</article>");
    html
}

/// Fragmento HTML da pré-visualização. Campos opcionais ausentes somem do
/// documento em vez de aparecer com rótulo vazio.
pub fn render_preview_html(doc: DocumentRef<'_>, ctx: &PreviewContext<'_>) -> String {
    render_layout_html(&printable(doc, ctx))
}
