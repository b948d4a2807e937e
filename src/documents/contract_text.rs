// src/documents/contract_text.rs
//
// Texto jurídico do contrato de prestação de serviços.
//
// As cláusulas formam uma lista declarativa; as opcionais (escopo, entregas,
// revisões) têm um predicado de inclusão. Os ordinais são atribuídos numa
// única passada sobre a lista já filtrada, então a numeração das cláusulas
// seguintes muda conforme os campos opcionais preenchidos.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::{
    common::format::{
        format_currency, format_date, format_date_long, format_percent, mask_tax_document, non_empty,
        DateFormat,
    },
    models::{
        contract::{Contract, DayCountKind, DeadlineMode, PaymentType, PersonType},
        freelancer::Freelancer,
    },
};

const ORDINALS: [&str; 30] = [
    "PRIMEIRA", "SEGUNDA", "TERCEIRA", "QUARTA", "QUINTA",
    "SEXTA", "SÉTIMA", "OITAVA", "NONA", "DÉCIMA",
    "DÉCIMA PRIMEIRA", "DÉCIMA SEGUNDA", "DÉCIMA TERCEIRA", "DÉCIMA QUARTA", "DÉCIMA QUINTA",
    "DÉCIMA SEXTA", "DÉCIMA SÉTIMA", "DÉCIMA OITAVA", "DÉCIMA NONA", "VIGÉSIMA",
    "VIGÉSIMA PRIMEIRA", "VIGÉSIMA SEGUNDA", "VIGÉSIMA TERCEIRA", "VIGÉSIMA QUARTA", "VIGÉSIMA QUINTA",
    "VIGÉSIMA SEXTA", "VIGÉSIMA SÉTIMA", "VIGÉSIMA OITAVA", "VIGÉSIMA NONA", "TRIGÉSIMA",
];

/// Ordinal por extenso (1 = PRIMEIRA). Acima de 30 vira `31ª`.
pub fn clause_ordinal(n: usize) -> String {
    match n.checked_sub(1).and_then(|i| ORDINALS.get(i)) {
        Some(label) => (*label).to_string(),
        None => format!("{}ª", n),
    }
}

/// Valores fixos embutidos nas cláusulas. Configuráveis, não calculados.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContractPolicy {
    pub revision_rounds: u32,
    pub revision_window_business_days: u32,
    pub support_days: u32,
    pub late_fee_percent: Decimal,
    pub monthly_interest_percent: Decimal,
    pub suspension_after_days: u32,
    pub termination_notice_days: u32,
    pub confidentiality_years: u32,
}

impl Default for ContractPolicy {
    fn default() -> Self {
        Self {
            revision_rounds: 2,
            revision_window_business_days: 5,
            support_days: 30,
            late_fee_percent: Decimal::from(2),
            monthly_interest_percent: Decimal::from(1),
            suspension_after_days: 10,
            termination_notice_days: 15,
            confidentiality_years: 2,
        }
    }
}

/// Dados do CONTRATADO (o freelancer).
#[derive(Debug, Clone, Default)]
pub struct ContractorParty {
    pub name: String,
    pub document: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl From<&Freelancer> for ContractorParty {
    fn from(f: &Freelancer) -> Self {
        Self {
            name: f.name.clone(),
            document: f.document.clone(),
            address: f.address.clone(),
            city: f.city.clone(),
            state: f.state.clone(),
        }
    }
}

struct Terms<'a> {
    contract: &'a Contract,
    contractor: &'a ContractorParty,
    policy: &'a ContractPolicy,
}

struct ClauseSpec {
    title: &'static str,
    include: fn(&Terms) -> bool,
    body: fn(&Terms) -> String,
}

fn always(_: &Terms) -> bool {
    true
}

fn has_scope(t: &Terms) -> bool {
    non_empty(&t.contract.service_scope).is_some()
}

fn has_deliverables(t: &Terms) -> bool {
    non_empty(&t.contract.deliverables).is_some()
}

// Ordem fixa. Não reordenar: a numeração impressa depende dela.
static CLAUSES: [ClauseSpec; 24] = [
    ClauseSpec { title: "DO OBJETO", include: always, body: clause_object },
    ClauseSpec { title: "DO ESCOPO", include: has_scope, body: clause_scope },
    ClauseSpec { title: "DAS ENTREGAS", include: has_deliverables, body: clause_deliverables },
    ClauseSpec { title: "DAS REVISÕES", include: has_deliverables, body: clause_revisions },
    ClauseSpec { title: "DO VALOR E DA FORMA DE PAGAMENTO", include: always, body: clause_payment },
    ClauseSpec { title: "DO PRAZO", include: always, body: clause_deadline },
    ClauseSpec { title: "DAS OBRIGAÇÕES DO CONTRATANTE", include: always, body: clause_client_duties },
    ClauseSpec { title: "DA RESPONSABILIDADE SOBRE O CONTEÚDO", include: always, body: clause_content_liability },
    ClauseSpec { title: "DAS OBRIGAÇÕES DO CONTRATADO", include: always, body: clause_contractor_duties },
    ClauseSpec { title: "DA PROPRIEDADE INTELECTUAL", include: always, body: clause_intellectual_property },
    ClauseSpec { title: "DA CONFIDENCIALIDADE", include: always, body: clause_confidentiality },
    ClauseSpec { title: "DA PROTEÇÃO DE DADOS", include: always, body: clause_data_protection },
    ClauseSpec { title: "DA RESCISÃO", include: always, body: clause_termination },
    ClauseSpec { title: "DA NÃO VINCULAÇÃO EMPREGATÍCIA", include: always, body: clause_no_employment },
    ClauseSpec { title: "DA RESPONSABILIDADE", include: always, body: clause_liability },
    ClauseSpec { title: "DA NÃO GARANTIA DE RESULTADOS", include: always, body: clause_no_guarantee },
    ClauseSpec { title: "DA ALTERAÇÃO DE ESCOPO", include: always, body: clause_scope_change },
    ClauseSpec { title: "DO SUPORTE", include: always, body: clause_support },
    ClauseSpec { title: "DA SUSPENSÃO DOS SERVIÇOS", include: always, body: clause_suspension },
    ClauseSpec { title: "DO ACEITE ELETRÔNICO", include: always, body: clause_electronic_acceptance },
    ClauseSpec { title: "DAS COMUNICAÇÕES", include: always, body: clause_communications },
    ClauseSpec { title: "DAS DISPOSIÇÕES GERAIS", include: always, body: clause_general },
    ClauseSpec { title: "DA SOLUÇÃO AMIGÁVEL", include: always, body: clause_amicable },
    ClauseSpec { title: "DO FORO", include: always, body: clause_jurisdiction },
];

// --- Trechos reutilizados ---

fn location(address: Option<&str>, city: Option<&str>, state: Option<&str>) -> Option<String> {
    let city_state = match (city, state) {
        (Some(c), Some(s)) => Some(format!("{}/{}", c, s)),
        (Some(c), None) => Some(c.to_string()),
        (None, Some(s)) => Some(s.to_string()),
        (None, None) => None,
    };
    match (address, city_state) {
        (Some(a), Some(cs)) => Some(format!("{}, {}", a, cs)),
        (Some(a), None) => Some(a.to_string()),
        (None, Some(cs)) => Some(cs),
        (None, None) => None,
    }
}

/// Qualificação do CONTRATANTE conforme pessoa física/jurídica.
pub fn client_qualification(contract: &Contract) -> String {
    let c = contract;
    let mut out = String::new();

    match c.person_type {
        PersonType::Individual => {
            out.push_str(c.client_name.trim());
            if let Some(doc) = non_empty(&c.client_document) {
                let _ = write!(out, ", CPF n. {}", mask_tax_document(doc));
            }
            if let Some(rg) = non_empty(&c.client_rg) {
                let _ = write!(out, ", RG {}", rg);
            }
        }
        PersonType::Company => {
            let company = non_empty(&c.client_company_name).unwrap_or(c.client_name.trim());
            out.push_str(company);
            if let Some(doc) = non_empty(&c.client_document) {
                let _ = write!(out, ", CNPJ n. {}", mask_tax_document(doc));
            }
            let _ = write!(out, ", representada por {}", c.client_name.trim());
        }
    }

    let place = location(
        non_empty(&c.client_address),
        non_empty(&c.client_city),
        non_empty(&c.client_state),
    );
    if let Some(place) = place {
        let verb = match c.person_type {
            PersonType::Individual => "residente e domiciliado(a) em",
            PersonType::Company => "com sede em",
        };
        let _ = write!(out, ", {} {}", verb, place);
    }
    if let Some(email) = non_empty(&c.client_email) {
        let _ = write!(out, ", e-mail {}", email);
    }
    out
}

fn contractor_qualification(p: &ContractorParty) -> String {
    let mut out = p.name.trim().to_string();
    if let Some(doc) = non_empty(&p.document) {
        let _ = write!(out, ", CPF/CNPJ n. {}", mask_tax_document(doc));
    }
    if let Some(place) = location(non_empty(&p.address), non_empty(&p.city), non_empty(&p.state)) {
        let _ = write!(out, ", com endereço em {}", place);
    }
    out
}

/// Texto da forma de pagamento.
pub fn payment_description(contract: &Contract) -> String {
    if contract.payment_type == PaymentType::ByAgreement {
        return "conforme acordo entre as partes".to_string();
    }

    match contract.installments.as_slice() {
        [] => format!("à vista, no valor de {}", format_currency(contract.value)),
        [single] => {
            let mut out = format!("à vista, no valor de {}", format_currency(single.amount));
            if let Some(due) = single.due_date {
                let _ = write!(out, ", com vencimento em {}", format_date(due, DateFormat::DayMonthYear));
            }
            out
        }
        many => many
            .iter()
            .map(|i| {
                let mut line = format!(
                    "{}ª parcela: {} do valor, correspondente a {}",
                    i.number,
                    format_percent(i.percentage),
                    format_currency(i.amount)
                );
                if let Some(due) = i.due_date {
                    let _ = write!(line, ", com vencimento em {}", format_date(due, DateFormat::DayMonthYear));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// `"30 dias úteis"`, `"até 15/03/2027"` ou vazio.
pub fn deadline_description(contract: &Contract) -> String {
    match contract.deadline_mode {
        DeadlineMode::Days => match contract.deadline_days {
            Some(days) => {
                let kind = match (contract.deadline_day_kind, days == 1) {
                    (DayCountKind::Business, true) => "dia útil",
                    (DayCountKind::Business, false) => "dias úteis",
                    (DayCountKind::Calendar, true) => "dia corrido",
                    (DayCountKind::Calendar, false) => "dias corridos",
                };
                format!("{} {}", days, kind)
            }
            None => String::new(),
        },
        DeadlineMode::Date => contract
            .deadline_date
            .map(|d| format!("até {}", format_date(d, DateFormat::DayMonthYear)))
            .unwrap_or_default(),
    }
}

// --- Corpos das cláusulas ---

fn clause_object(t: &Terms) -> String {
    format!(
        "O presente contrato tem como objeto a prestação, pelo CONTRATADO ao CONTRATANTE, dos serviços de {}, nos termos e condições aqui estabelecidos.",
        t.contract.service_name.trim()
    )
}

fn clause_scope(t: &Terms) -> String {
    format!(
        "O escopo dos serviços compreende:\n{}\nQualquer atividade não descrita acima não integra o presente contrato.",
        non_empty(&t.contract.service_scope).unwrap_or_default()
    )
}

fn clause_deliverables(t: &Terms) -> String {
    format!(
        "Serão entregues ao CONTRATANTE:\n{}",
        non_empty(&t.contract.deliverables).unwrap_or_default()
    )
}

fn clause_revisions(t: &Terms) -> String {
    format!(
        "Estão incluídas até {} rodadas de revisão para cada entrega. O CONTRATANTE deverá solicitar os ajustes em até {} dias úteis após o recebimento de cada entrega; decorrido esse prazo sem manifestação, a entrega será considerada aprovada. Revisões adicionais serão orçadas à parte.",
        t.policy.revision_rounds, t.policy.revision_window_business_days
    )
}

fn clause_payment(t: &Terms) -> String {
    let c = t.contract;
    let payment = payment_description(c);
    let mut out = if payment.contains('\n') {
        format!(
            "Pelos serviços, o CONTRATANTE pagará ao CONTRATADO o valor total de {}, da seguinte forma:\n{}",
            format_currency(c.value),
            payment
        )
    } else {
        format!(
            "Pelos serviços, o CONTRATANTE pagará ao CONTRATADO o valor total de {}, {}.",
            format_currency(c.value),
            payment
        )
    };
    if let Some(notes) = non_empty(&c.payment_notes) {
        let _ = write!(out, "\nObservações sobre o pagamento: {}", notes);
    }
    let _ = write!(
        out,
        "\nO atraso no pagamento sujeitará o CONTRATANTE à multa de {}% sobre o valor devido, acrescida de juros de {}% ao mês.",
        t.policy.late_fee_percent.normalize(),
        t.policy.monthly_interest_percent.normalize()
    );
    out
}

fn clause_deadline(t: &Terms) -> String {
    let deadline = deadline_description(t.contract);
    let first = if deadline.is_empty() {
        "O prazo para a execução dos serviços será definido de comum acordo entre as partes.".to_string()
    } else {
        match t.contract.deadline_mode {
            DeadlineMode::Days => format!(
                "Os serviços serão executados no prazo de {}, contados a partir da assinatura deste contrato.",
                deadline
            ),
            DeadlineMode::Date => format!("Os serviços serão executados {}.", deadline),
        }
    };
    format!(
        "{}\nO prazo será prorrogado pelo período equivalente a eventuais atrasos no envio de materiais, informações ou aprovações de responsabilidade do CONTRATANTE.",
        first
    )
}

fn clause_client_duties(_: &Terms) -> String {
    "São obrigações do CONTRATANTE: fornecer, em tempo hábil, todas as informações, materiais e acessos necessários à execução dos serviços; efetuar os pagamentos nas datas acordadas; e manifestar-se sobre as entregas dentro dos prazos previstos neste contrato.".to_string()
}

fn clause_content_liability(_: &Terms) -> String {
    "O CONTRATANTE é o único responsável pelo conteúdo, textos, imagens, marcas e demais materiais fornecidos ao CONTRATADO, declarando possuir os direitos necessários à sua utilização e isentando o CONTRATADO de qualquer responsabilidade perante terceiros.".to_string()
}

fn clause_contractor_duties(_: &Terms) -> String {
    "São obrigações do CONTRATADO: executar os serviços com zelo, qualidade técnica e dentro dos prazos acordados; manter o CONTRATANTE informado sobre o andamento dos trabalhos; e comunicar prontamente qualquer fato que possa comprometer a execução do contrato.".to_string()
}

fn clause_intellectual_property(_: &Terms) -> String {
    "Após a quitação integral do valor deste contrato, os direitos patrimoniais sobre o material final entregue serão transferidos ao CONTRATANTE. O CONTRATADO poderá utilizar o trabalho realizado em seu portfólio, salvo disposição expressa em contrário. Arquivos de trabalho, rascunhos e alternativas não aprovadas permanecem de propriedade do CONTRATADO.".to_string()
}

fn clause_confidentiality(t: &Terms) -> String {
    format!(
        "As partes comprometem-se a manter sigilo sobre todas as informações confidenciais a que tiverem acesso em razão deste contrato. Esta obrigação subsistirá por {} anos após o término da relação contratual.",
        t.policy.confidentiality_years
    )
}

fn clause_data_protection(_: &Terms) -> String {
    "As partes tratarão os dados pessoais eventualmente compartilhados exclusivamente para a execução deste contrato, em conformidade com a Lei n. 13.709/2018 (Lei Geral de Proteção de Dados Pessoais).".to_string()
}

fn clause_termination(t: &Terms) -> String {
    format!(
        "Este contrato poderá ser rescindido por qualquer das partes, mediante aviso prévio por escrito de {} dias. Em caso de rescisão, serão devidos ao CONTRATADO os valores correspondentes aos serviços já executados até a data da rescisão. O descumprimento de qualquer cláusula autoriza a rescisão imediata pela parte prejudicada.",
        t.policy.termination_notice_days
    )
}

fn clause_no_employment(_: &Terms) -> String {
    "O presente contrato não gera vínculo empregatício, societário ou de subordinação entre as partes, atuando o CONTRATADO com plena autonomia técnica e de horários.".to_string()
}

fn clause_liability(_: &Terms) -> String {
    "A responsabilidade do CONTRATADO por eventuais danos decorrentes da execução deste contrato fica limitada ao valor efetivamente recebido por ele em razão deste instrumento, não respondendo por lucros cessantes ou danos indiretos.".to_string()
}

fn clause_no_guarantee(_: &Terms) -> String {
    "O CONTRATADO compromete-se com a boa execução dos serviços, não garantindo, contudo, resultados comerciais, de vendas, de audiência ou de qualquer outra natureza que dependam de fatores alheios ao seu controle.".to_string()
}

fn clause_scope_change(_: &Terms) -> String {
    "Qualquer alteração ou ampliação do escopo contratado deverá ser formalizada por escrito e poderá implicar revisão de valores e prazos, mediante novo orçamento aprovado pelo CONTRATANTE.".to_string()
}

fn clause_support(t: &Terms) -> String {
    format!(
        "O CONTRATADO prestará suporte para correção de falhas relacionadas aos serviços entregues pelo período de {} dias após a entrega final. Solicitações após esse período ou que não configurem falha serão orçadas à parte.",
        t.policy.support_days
    )
}

fn clause_suspension(t: &Terms) -> String {
    format!(
        "O atraso no pagamento por período superior a {} dias autoriza o CONTRATADO a suspender a execução dos serviços até a regularização, com prorrogação dos prazos pelo período da suspensão.",
        t.policy.suspension_after_days
    )
}

fn clause_electronic_acceptance(_: &Terms) -> String {
    "As partes reconhecem a validade da assinatura e do aceite deste contrato por meios eletrônicos, inclusive por troca de mensagens ou plataformas de assinatura digital, nos termos da legislação vigente.".to_string()
}

fn clause_communications(_: &Terms) -> String {
    "As comunicações entre as partes serão realizadas preferencialmente por escrito, pelos e-mails e telefones informados neste contrato, considerando-se válidas as mensagens enviadas a esses endereços.".to_string()
}

fn clause_general(_: &Terms) -> String {
    "A tolerância de qualquer das partes quanto ao descumprimento de cláusulas deste contrato não implicará novação ou renúncia de direitos. Este contrato obriga as partes e seus sucessores a qualquer título.".to_string()
}

fn clause_amicable(_: &Terms) -> String {
    "As partes comprometem-se a buscar, de boa-fé, a solução amigável de quaisquer divergências decorrentes deste contrato antes de recorrer às vias judiciais.".to_string()
}

fn clause_jurisdiction(t: &Terms) -> String {
    let city = non_empty(&t.contractor.city).or_else(|| non_empty(&t.contract.client_city));
    let state = non_empty(&t.contractor.state).or_else(|| non_empty(&t.contract.client_state));
    let forum = match (city, state) {
        (Some(c), Some(s)) => format!("o foro da comarca de {}/{}", c, s),
        (Some(c), None) => format!("o foro da comarca de {}", c),
        _ => "o foro do domicílio do CONTRATADO".to_string(),
    };
    format!(
        "Fica eleito {} para dirimir quaisquer questões oriundas deste contrato, com renúncia a qualquer outro, por mais privilegiado que seja.",
        forum
    )
}

/// Monta o texto final do contrato.
///
/// `today` é a data impressa no fecho; é o único dado de "relógio" usado,
/// então a mesma entrada com a mesma data gera sempre o mesmo texto.
pub fn render_contract_text(
    contract: &Contract,
    contractor: &ContractorParty,
    policy: &ContractPolicy,
    today: NaiveDate,
) -> String {
    let terms = Terms { contract, contractor, policy };
    let mut out = String::new();

    out.push_str("CONTRATO DE PRESTAÇÃO DE SERVIÇOS\n\n");
    let _ = writeln!(out, "CONTRATANTE: {}.\n", client_qualification(contract));
    let _ = writeln!(out, "CONTRATADO(A): {}.\n", contractor_qualification(contractor));
    out.push_str(
        "As partes acima identificadas têm, entre si, justo e acertado o presente Contrato de Prestação de Serviços, que se regerá pelas cláusulas seguintes.\n\n",
    );

    let included = CLAUSES.iter().filter(|clause| (clause.include)(&terms));
    for (index, clause) in included.enumerate() {
        let _ = writeln!(out, "CLÁUSULA {} - {}", clause_ordinal(index + 1), clause.title);
        let _ = writeln!(out, "{}\n", (clause.body)(&terms));
    }

    out.push_str(
        "E, por estarem assim justas e contratadas, as partes assinam o presente instrumento em duas vias de igual teor e forma, na presença das testemunhas abaixo.\n\n",
    );

    let place = non_empty(&contractor.city).or_else(|| non_empty(&contract.client_city));
    match place {
        Some(city) => {
            let _ = writeln!(out, "{}, {}.\n\n", city, format_date_long(today));
        }
        None => {
            let _ = writeln!(out, "{}.\n\n", format_date_long(today));
        }
    }

    let client_signature = match contract.person_type {
        PersonType::Individual => contract.client_name.trim(),
        PersonType::Company => non_empty(&contract.client_company_name).unwrap_or(contract.client_name.trim()),
    };

    out.push_str("_______________________________________\n");
    let _ = writeln!(out, "CONTRATANTE: {}\n\n", client_signature);
    out.push_str("_______________________________________\n");
    let _ = writeln!(out, "CONTRATADO(A): {}\n\n", contractor.name.trim());
    out.push_str("TESTEMUNHAS:\n\n");
    out.push_str("1. _______________________________________\nNome:\nCPF:\n\n");
    out.push_str("2. _______________________________________\nNome:\nCPF:\n");

    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        contract::{Contract, Installment},
        status::ContractStatus,
    };
    use chrono::Utc;
    use uuid::Uuid;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn base_contract() -> Contract {
        Contract {
            id: Uuid::nil(),
            owner_id: Uuid::nil(),
            proposal_id: None,
            client_id: None,
            person_type: PersonType::Individual,
            client_name: "Maria da Silva".into(),
            client_document: Some("52998224725".into()),
            client_rg: Some("12.345.678-9".into()),
            client_company_name: None,
            client_address: Some("Rua das Flores, 123".into()),
            client_city: Some("Campinas".into()),
            client_state: Some("SP".into()),
            client_phone: None,
            client_email: None,
            service_name: "Desenvolvimento de site institucional".into(),
            service_scope: None,
            deliverables: None,
            value: d("1000"),
            deadline_mode: DeadlineMode::Days,
            deadline_days: Some(30),
            deadline_day_kind: DayCountKind::Business,
            deadline_date: None,
            payment_type: PaymentType::AVista,
            installments: vec![Installment {
                number: 1,
                percentage: d("100"),
                amount: d("1000"),
                due_date: None,
            }],
            payment_notes: None,
            status: ContractStatus::Draft,
            contract_text: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn contractor() -> ContractorParty {
        ContractorParty {
            name: "João Pereira".into(),
            document: Some("11222333000181".into()),
            address: None,
            city: Some("São Paulo".into()),
            state: Some("SP".into()),
        }
    }

    fn render(c: &Contract) -> String {
        render_contract_text(c, &contractor(), &ContractPolicy::default(), today())
    }

    #[test]
    fn ordinals_fall_back_after_thirtieth() {
        assert_eq!(clause_ordinal(1), "PRIMEIRA");
        assert_eq!(clause_ordinal(11), "DÉCIMA PRIMEIRA");
        assert_eq!(clause_ordinal(30), "TRIGÉSIMA");
        assert_eq!(clause_ordinal(31), "31ª");
    }

    #[test]
    fn rendering_is_deterministic_for_fixed_date() {
        let c = base_contract();
        assert_eq!(render(&c), render(&c));
    }

    #[test]
    fn optional_clauses_shift_numbering() {
        let minimal = render(&base_contract());
        assert!(minimal.contains("CLÁUSULA SEGUNDA - DO VALOR E DA FORMA DE PAGAMENTO"));
        assert!(minimal.contains("CLÁUSULA QUARTA - DAS OBRIGAÇÕES DO CONTRATANTE"));
        assert!(!minimal.contains("DO ESCOPO"));
        assert!(!minimal.contains("DAS REVISÕES"));

        let mut full = base_contract();
        full.service_scope = Some("Layout, desenvolvimento e publicação".into());
        full.deliverables = Some("Site publicado e arquivos-fonte".into());
        let text = render(&full);
        assert!(text.contains("CLÁUSULA SEGUNDA - DO ESCOPO"));
        assert!(text.contains("CLÁUSULA TERCEIRA - DAS ENTREGAS"));
        assert!(text.contains("CLÁUSULA QUARTA - DAS REVISÕES"));
        assert!(text.contains("CLÁUSULA SÉTIMA - DAS OBRIGAÇÕES DO CONTRATANTE"));
        assert!(text.contains("CLÁUSULA VIGÉSIMA TERCEIRA - DA SOLUÇÃO AMIGÁVEL"));
        assert!(text.contains("CLÁUSULA VIGÉSIMA QUARTA - DO FORO"));
    }

    #[test]
    fn scope_alone_does_not_add_revisions() {
        let mut c = base_contract();
        c.service_scope = Some("Apenas o layout".into());
        let text = render(&c);
        assert!(text.contains("CLÁUSULA SEGUNDA - DO ESCOPO"));
        assert!(!text.contains("DAS REVISÕES"));
        assert!(text.contains("CLÁUSULA TERCEIRA - DO VALOR E DA FORMA DE PAGAMENTO"));
    }

    #[test]
    fn clauses_appear_in_fixed_order() {
        let mut c = base_contract();
        c.service_scope = Some("x".into());
        c.deliverables = Some("y".into());
        let text = render(&c);
        let titles: Vec<&str> = CLAUSES.iter().map(|clause| clause.title).collect();
        let mut last = 0;
        for title in titles {
            let pos = text.find(&format!("- {}\n", title)).unwrap_or_else(|| panic!("missing {}", title));
            assert!(pos > last, "{} out of order", title);
            last = pos;
        }
    }

    #[test]
    fn individual_and_company_qualification() {
        let c = base_contract();
        let q = client_qualification(&c);
        assert!(q.starts_with("Maria da Silva, CPF n. 529.982.247-25, RG 12.345.678-9"));

        let mut company = base_contract();
        company.person_type = PersonType::Company;
        company.client_company_name = Some("Silva Design Ltda".into());
        company.client_document = Some("11222333000181".into());
        let q = client_qualification(&company);
        assert!(q.starts_with("Silva Design Ltda, CNPJ n. 11.222.333/0001-81, representada por Maria da Silva"));
        assert!(q.contains("com sede em"));
    }

    #[test]
    fn missing_documents_are_omitted() {
        let mut c = base_contract();
        c.client_document = None;
        c.client_rg = Some("   ".into());
        c.client_address = None;
        c.client_city = None;
        c.client_state = None;
        assert_eq!(client_qualification(&c), "Maria da Silva");
    }

    #[test]
    fn payment_text_branches_on_installments() {
        let mut c = base_contract();
        c.installments[0].due_date = NaiveDate::from_ymd_opt(2026, 11, 1);
        assert_eq!(
            payment_description(&c),
            "à vista, no valor de R$ 1.000,00, com vencimento em 01/11/2026"
        );

        c.payment_type = PaymentType::FiftyFifty;
        c.installments = vec![
            Installment { number: 1, percentage: d("50"), amount: d("500"), due_date: None },
            Installment {
                number: 2,
                percentage: d("50"),
                amount: d("500"),
                due_date: NaiveDate::from_ymd_opt(2026, 12, 1),
            },
        ];
        assert_eq!(
            payment_description(&c),
            "1ª parcela: 50% do valor, correspondente a R$ 500,00\n2ª parcela: 50% do valor, correspondente a R$ 500,00, com vencimento em 01/12/2026"
        );

        c.payment_type = PaymentType::ByAgreement;
        assert_eq!(payment_description(&c), "conforme acordo entre as partes");
    }

    #[test]
    fn deadline_text_branches_on_mode() {
        let mut c = base_contract();
        assert_eq!(deadline_description(&c), "30 dias úteis");
        c.deadline_day_kind = DayCountKind::Calendar;
        assert_eq!(deadline_description(&c), "30 dias corridos");

        c.deadline_mode = DeadlineMode::Date;
        assert_eq!(deadline_description(&c), "");
        c.deadline_date = NaiveDate::from_ymd_opt(2027, 3, 15);
        assert_eq!(deadline_description(&c), "até 15/03/2027");
    }

    #[test]
    fn embeds_policy_defaults() {
        let mut c = base_contract();
        c.deliverables = Some("Site".into());
        let text = render(&c);
        assert!(text.contains("até 2 rodadas de revisão"));
        assert!(text.contains("em até 5 dias úteis"));
        assert!(text.contains("multa de 2%"));
        assert!(text.contains("juros de 1% ao mês"));
        assert!(text.contains("superior a 10 dias"));
        assert!(text.contains("aviso prévio por escrito de 15 dias"));
        assert!(text.contains("pelo período de 30 dias"));
        assert!(text.contains("por 2 anos após"));
    }

    #[test]
    fn ends_with_signatures_and_witnesses() {
        let text = render(&base_contract());
        assert!(text.contains("São Paulo, 17 de outubro de 2026."));
        assert!(text.contains("CONTRATANTE: Maria da Silva\n"));
        assert!(text.contains("CONTRATADO(A): João Pereira\n"));
        assert!(text.contains("1. ____"));
        assert!(text.ends_with("2. _______________________________________\nNome:\nCPF:"));
        assert_eq!(text, text.trim());
    }
}
