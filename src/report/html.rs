//! Standalone printable HTML for a quote.
//!
//! Every piece of user text goes through [`escape_html`] before it is placed
//! in the markup.

use super::snapshot::{CategoryGroup, ReportSnapshot};
use crate::config::Config;
use crate::quote::CurrencyFormatter;

const NOT_INFORMED: &str = "Não informado";
const DATE_NOT_INFORMED: &str = "Não informada";
const NO_SERVICES: &str = "Nenhum serviço principal selecionado para orçamento.";
const NO_ITEMS: &str = "Nenhum item adicional (peça, material) incluído.";

/// Focus and print once the browser reports the page fully loaded
const AUTO_PRINT_SCRIPT: &str = r#"
    <script>
        window.addEventListener("load", function () {
            window.focus();
            window.print();
        });
    </script>"#;

const STYLESHEET: &str = r#"
        :root {
            --primary: #007bff;
            --surface: #f8f9fa;
            --total: #28a745;
            --text: #343a40;
            --border: #dee2e6;
        }
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            margin: 0;
            padding: 0;
            color: var(--text);
            background-color: #fff;
        }
        .document-container {
            width: 210mm;
            min-height: 297mm;
            margin: 0 auto;
            padding: 5mm;
            box-sizing: border-box;
            display: flex;
            flex-direction: column;
        }
        header {
            margin-bottom: 5px;
            border-bottom: 2px solid var(--primary);
            padding-bottom: 5px;
        }
        header h1 { color: var(--primary); margin: 0 0 5px 0; font-size: 2.2em; }
        header p { margin: 0; font-size: 0.9em; color: #6c757d; }
        main { flex: 1; }
        .section-container, .category-box {
            border: 1px solid var(--border);
            border-radius: 8px;
            margin-bottom: 5px;
            overflow: hidden;
        }
        .category-title, .section-title {
            background-color: var(--surface);
            padding: 5px;
            margin: 0;
            font-size: 1.2em;
            color: var(--primary);
            border-bottom: 1px solid var(--border);
        }
        .section-content, .info-grid { padding: 5px; }
        .info-grid {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(250px, 1fr));
            gap: 10px;
        }
        .info-item p { margin: 0; line-height: 1.4; }
        .info-split { display: flex; justify-content: space-between; flex-wrap: wrap; }
        .services-list { list-style: none; padding: 0 5px 5px 5px; margin: 0; }
        .service-item { padding: 10px 0; border-bottom: 1px dashed var(--border); }
        .service-item:last-child { border-bottom: none; }
        .service-header {
            display: flex;
            justify-content: space-between;
            font-weight: 600;
            font-size: 1.05em;
        }
        .service-amount { font-weight: 700; }
        .service-detail { margin-top: 5px; font-size: 0.9em; color: #6c757d; padding-left: 15px; }
        .service-detail span { font-style: italic; white-space: pre-wrap; }
        .items-table { width: 100%; border-collapse: collapse; margin: -1px; }
        .items-table th, .items-table td {
            border: 1px solid var(--border);
            padding: 10px;
            text-align: left;
        }
        .items-table th { background-color: var(--primary); color: white; font-weight: 400; }
        .items-table tr:nth-child(even) { background-color: var(--surface); }
        .items-table .amount-col { text-align: right; width: 120px; font-weight: 600; }
        .items-table .no-items { font-style: italic; color: #999; text-align: center; }
        .total-box {
            text-align: right;
            margin-top: 25px;
            padding-top: 15px;
            border-top: 2px solid var(--primary);
        }
        .total-display {
            display: inline-block;
            background-color: var(--total);
            color: white;
            padding: 10px 20px;
            font-size: 1.8em;
            font-weight: bold;
            border-radius: 6px;
        }
        .notes-box p { margin: 0; line-height: 1.6; font-size: 0.95em; padding: 0 15px 15px 15px; white-space: pre-wrap; }
        footer {
            margin-top: 30px;
            padding-top: 15px;
            border-top: 1px solid #ccc;
            font-size: 0.85em;
            color: #6c757d;
            text-align: center;
        }
        .validity { margin-bottom: 10px; font-style: italic; }
        .contact-info { font-weight: bold; color: var(--primary); }
        .contact-info p { margin: 2px 0; }
        @media print {
            @page { size: A4; margin: 0; }
            body { -webkit-print-color-adjust: exact; print-color-adjust: exact; }
            .document-container { padding: 15mm; min-height: 270mm; }
            .info-grid { display: block; }
            .info-item { margin-bottom: 10px; }
            .section-container, .category-box, .total-box, footer { page-break-inside: avoid; }
            * { color: #000 !important; }
            header h1, .contact-info, .service-amount, .category-title { color: var(--primary) !important; }
            .total-display {
                background-color: #e9ecef !important;
                color: #000 !important;
                border: 1px solid var(--total);
            }
            .items-table th { background-color: var(--primary) !important; color: white !important; }
        }
"#;

/// Escape HTML special characters
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

fn render_services(categories: &[CategoryGroup], fmt: &CurrencyFormatter) -> String {
    if categories.is_empty() {
        return format!("<p>{NO_SERVICES}</p>");
    }

    let mut html = String::new();
    for group in categories {
        html.push_str(&format!(
            r#"
                <div class="category-box">
                    <h3 class="category-title">{}</h3>
                    <ul class="services-list">"#,
            escape_html(&group.category)
        ));
        for service in &group.services {
            html.push_str(&format!(
                r#"
                        <li class="service-item">
                            <div class="service-header">
                                <span class="service-name">{}</span>
                                <span class="service-amount">{}</span>
                            </div>"#,
                escape_html(&service.label),
                fmt.format(service.amount)
            ));
            if let Some(detail) = &service.detail {
                html.push_str(&format!(
                    r#"
                            <div class="service-detail">Detalhes: <span>{}</span></div>"#,
                    escape_html(detail)
                ));
            }
            html.push_str("\n                        </li>");
        }
        html.push_str("\n                    </ul>\n                </div>");
    }
    html
}

fn render_items(snapshot: &ReportSnapshot, fmt: &CurrencyFormatter) -> String {
    let mut html = String::from(
        r#"<table class="items-table"><thead><tr><th>Descrição</th><th class="amount-col">Valor</th></tr></thead><tbody>"#,
    );
    if snapshot.items.is_empty() {
        html.push_str(&format!(
            r#"<tr><td colspan="2" class="no-items">{NO_ITEMS}</td></tr>"#
        ));
    } else {
        for item in &snapshot.items {
            html.push_str(&format!(
                r#"<tr><td>{}</td><td class="amount-col">{}</td></tr>"#,
                escape_html(&item.description),
                fmt.format(item.amount)
            ));
        }
    }
    html.push_str("</tbody></table>");
    html
}

fn render_notes(notes: Option<&str>) -> String {
    match notes {
        Some(notes) => format!(
            r#"
                <div class="category-box">
                    <h3 class="category-title">Observações Adicionais</h3>
                    <div class="notes-box">
                        <p>{}</p>
                    </div>
                </div>"#,
            escape_html(notes)
        ),
        None => String::new(),
    }
}

/// Render the complete printable document
pub fn render_html(snapshot: &ReportSnapshot, fmt: &CurrencyFormatter, config: &Config) -> String {
    let client = &snapshot.client;
    let date = snapshot
        .date_display()
        .unwrap_or_else(|| DATE_NOT_INFORMED.to_string());
    let company = &config.company;
    let auto_print = if config.quote.auto_print {
        AUTO_PRINT_SCRIPT
    } else {
        ""
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <title>Orçamento - {title}</title>
    <style>{STYLESHEET}    </style>
</head>
<body>
    <div class="document-container">
        <header>
            <h1>ORÇAMENTO DE SERVIÇOS</h1>
            <p>{subtitle}</p>
        </header>

        <main>
            <div class="section-container">
                <h3 class="section-title">Dados do Cliente</h3>
                <div class="info-grid">
                    <div class="info-item">
                        <p><strong>Cliente:</strong> {name}</p>
                    </div>
                    <div class="info-item">
                        <p><strong>Endereço:</strong> {address}</p>
                    </div>
                    <div class="info-item info-split">
                        <p><strong>Contato:</strong> {phone}</p>
                        <p><strong>Data:</strong> {date}</p>
                    </div>
                </div>
            </div>

            {services}

            <div class="category-box">
                <h3 class="category-title">Itens Adicionais (Materiais/Peças)</h3>
                {items}
            </div>

            <div class="category-box">
                <h3 class="category-title">Custos Adicionais</h3>
                <div class="section-content">
                    <div class="info-item">
                        <p>Deslocamento/Taxas/Outros Custos: <strong>{misc}</strong></p>
                    </div>
                </div>
            </div>
            {notes}
        </main>

        <div class="total-box">
            <span class="total-display">TOTAL: {total}</span>
        </div>

        <footer>
            <div class="validity">
                Orçamento válido por {validity} dias, sujeito à aprovação final do escopo.
            </div>
            <div class="contact-info">
                <p>-- {company_name} --</p>
                <p>{company_phone} // Att. {attendant}</p>
            </div>
        </footer>
    </div>{auto_print}
</body>
</html>
"#,
        title = escape_html(&client.name),
        subtitle = escape_html(&company.subtitle),
        name = escape_html(or_placeholder(&client.name, NOT_INFORMED)),
        address = escape_html(or_placeholder(&client.address, NOT_INFORMED)),
        phone = escape_html(or_placeholder(&client.phone, NOT_INFORMED)),
        date = date,
        services = render_services(&snapshot.categories, fmt),
        items = render_items(snapshot, fmt),
        misc = fmt.format(snapshot.misc_cost),
        notes = render_notes(snapshot.notes.as_deref()),
        total = escape_html(&snapshot.total_display),
        validity = config.quote.validity_days,
        company_name = escape_html(&company.name),
        company_phone = escape_html(&company.phone),
        attendant = escape_html(&company.attendant),
    )
}
