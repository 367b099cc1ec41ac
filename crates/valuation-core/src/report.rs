//! Presentation view model for one analysis
//!
//! [`Report`] holds everything a front end displays for a ticker, already
//! localized and formatted. [`render_text`] draws it for a terminal.

use crate::analysis::Analysis;
use crate::contract::DividendPayment;
use crate::engine::{Diagnosis, Signal, signal, upside};
use crate::language::Language;
use crate::prompts::DIVIDEND_HISTORY_LEN;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use serde::Serialize;
use std::fmt::Write as _;

const BAR_WIDTH: usize = 32;

/// Width of a fair-value gauge, in percent of its track
pub fn gauge_width(fair_price: f64, current_price: f64) -> f64 {
    (fair_price / current_price * 50.0).clamp(5.0, 100.0)
}

/// Accuracy warning shown under every report
pub fn disclaimer(language: Language) -> &'static str {
    language.pick(
        "Disclaimer: this tool is an analytical aid. The data comes from search engines and AI \
         and may contain inaccuracies. Always check the official investor relations documents \
         of the companies mentioned.",
        "Aviso: Este aplicativo é uma ferramenta de auxílio analítico. Os dados são provenientes \
         de mecanismos de busca e IA, podendo conter imprecisões. Valide sempre com os documentos \
         oficiais de RI (Relações com Investidores) das empresas citadas.",
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DividendMonitor {
    pub next_payment: String,
    pub frequency: String,
    pub recent: Vec<DividendPayment>,
    /// Shown instead of the table when there are no recent payments
    pub empty_note: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorCard {
    pub title: &'static str,
    pub formula: &'static str,
    pub description: String,
    pub fair_price: f64,
    pub upside: f64,
    pub signal: Signal,
    pub gauge_width: f64,
}

impl IndicatorCard {
    fn new(
        title: &'static str,
        formula: &'static str,
        description: String,
        fair_price: f64,
        current_price: f64,
    ) -> Self {
        Self {
            title,
            formula,
            description,
            fair_price,
            upside: upside(fair_price, current_price),
            signal: signal(fair_price, current_price),
            gauge_width: gauge_width(fair_price, current_price),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub label: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceLink {
    pub label: String,
    pub uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub language: Language,
    pub ticker: String,
    pub name: String,
    pub region: Option<String>,
    pub currency: String,
    pub current_price: f64,
    pub last_updated: Option<String>,
    pub metrics: Vec<Metric>,
    pub dividends: DividendMonitor,
    pub indicators: [IndicatorCard; 2],
    pub price_chart: Vec<ChartBar>,
    pub dividend_chart: Vec<ChartBar>,
    pub diagnosis: Diagnosis,
    pub diagnosis_title: &'static str,
    pub diagnosis_text: String,
    pub sources: Vec<SourceLink>,
    pub disclaimer: &'static str,
}

impl Report {
    pub fn from_analysis(analysis: &Analysis, language: Language) -> Self {
        let record = &analysis.record;
        let valuation = &analysis.valuation;
        let lang = language;
        let price = record.current_price;

        let metrics = vec![
            Metric {
                label: lang.pick("Current yield", "Yield atual"),
                value: record
                    .dividend_yield
                    .map_or_else(|| "N/A".to_string(), |y| format!("{y:.2}%")),
            },
            Metric {
                label: lang.pick("EPS", "LPA (Lucro)"),
                value: format!("{:.2}", record.eps),
            },
            Metric {
                label: lang.pick("BVPS", "VPA (Patrimônio)"),
                value: format!("{:.2}", record.bvps),
            },
            Metric {
                label: lang.pick("Average (5 years)", "Média (5 anos)"),
                value: format!("{:.2}", record.avg_dividend_5_years),
            },
        ];

        let recent = record.recent_dividends(DIVIDEND_HISTORY_LEN).to_vec();
        let dividends = DividendMonitor {
            next_payment: record
                .next_dividend_date
                .clone()
                .unwrap_or_else(|| lang.pick("To be announced", "A anunciar").to_string()),
            frequency: record
                .payout_frequency
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            empty_note: recent.is_empty().then(|| {
                lang.pick(
                    "No recent data found by the search engines.",
                    "Nenhum dado recente encontrado nos buscadores.",
                )
            }),
            recent,
        };

        let bazin_description = match lang {
            Language::English => format!(
                "Uses the average payout of the last 5 years ({} {:.2}) and finds the price at \
                 which it would be a 6% yield.",
                record.currency, record.avg_dividend_5_years
            ),
            Language::Portuguese => format!(
                "Calculado usando a média de proventos dos últimos 5 anos ({} {:.2}). Encontra o \
                 preço onde esse valor seria um yield de 6%.",
                record.currency, record.avg_dividend_5_years
            ),
        };
        let indicators = [
            IndicatorCard::new(
                "Valuation Bazin",
                lang.pick("Average (5Y) / 0.06", "Média (5A) / 0.06"),
                bazin_description,
                valuation.bazin_fair_price,
                price,
            ),
            IndicatorCard::new(
                lang.pick("Graham formula", "Fórmula de Graham"),
                lang.pick("√(22.5 × EPS × BVPS)", "√(22.5 * LPA * VPA)"),
                lang.pick(
                    "Conservative intrinsic value based on earnings per share and book value per share.",
                    "Valor intrínseco conservador baseado no lucro por ação e valor patrimonial por ação.",
                )
                .to_string(),
                valuation.graham_or_zero(),
                price,
            ),
        ];

        let price_chart = vec![
            ChartBar {
                label: lang.pick("Market", "Mercado"),
                value: price,
            },
            ChartBar {
                label: lang.pick("Fair (Bazin)", "Justo (Bazin)"),
                value: valuation.bazin_fair_price,
            },
            ChartBar {
                label: lang.pick("Fair (Graham)", "Justo (Graham)"),
                value: valuation.graham_or_zero(),
            },
        ];

        let mut dividend_chart = vec![ChartBar {
            label: lang.pick("Average (5 years)", "Média (5 anos)"),
            value: record.avg_dividend_5_years,
        }];
        if let Some(current) = record.estimated_current_dividend() {
            dividend_chart.push(ChartBar {
                label: lang.pick("Current (est.)", "Atual (est.)"),
                value: current,
            });
        }

        let sources = analysis
            .sources
            .iter()
            .filter_map(|s| {
                s.label().map(|label| SourceLink {
                    label,
                    uri: s.uri.clone(),
                })
            })
            .collect();

        Self {
            language,
            ticker: record.ticker.clone(),
            name: record.name.clone(),
            region: record.region.clone(),
            currency: record.currency.clone(),
            current_price: price,
            last_updated: record.last_updated.clone(),
            metrics,
            dividends,
            indicators,
            price_chart,
            dividend_chart,
            diagnosis: analysis.diagnosis,
            diagnosis_title: lang.pick("Diagnosis", "Diagnóstico"),
            diagnosis_text: analysis.diagnosis.narrative(
                &record.ticker,
                &record.currency,
                record.avg_dividend_5_years,
                language,
            ),
            sources,
            disclaimer: disclaimer(language),
        }
    }
}

/// Draw a report as plain terminal text
pub fn render_text(report: &Report) -> String {
    let lang = report.language;
    let cur = &report.currency;
    let mut out = String::new();

    let region = report
        .region
        .as_deref()
        .map(|r| format!(" · {r}"))
        .unwrap_or_default();
    let _ = writeln!(out, "{} ({}){region}", report.name, report.ticker);
    let _ = writeln!(
        out,
        "{}: {cur} {:.2}",
        lang.pick("Current price", "Preço atual"),
        report.current_price
    );
    if let Some(updated) = &report.last_updated {
        let _ = writeln!(out, "{}: {updated}", lang.pick("Updated", "Atualizado"));
    }
    out.push('\n');

    let mut metrics = new_table();
    metrics.set_header(report.metrics.iter().map(|m| m.label));
    metrics.add_row(report.metrics.iter().map(|m| m.value.as_str()));
    let _ = writeln!(out, "{metrics}\n");

    let _ = writeln!(out, "{}", lang.pick("Dividend monitor", "Monitor de dividendos"));
    let _ = writeln!(
        out,
        "  {}: {} ({})",
        lang.pick("Next payment", "Próximo pagamento"),
        report.dividends.next_payment,
        report.dividends.frequency
    );
    if let Some(note) = report.dividends.empty_note {
        let _ = writeln!(out, "  {note}");
    } else {
        let mut history = new_table();
        history.set_header(vec![
            lang.pick("Date", "Data"),
            lang.pick("Type", "Tipo"),
            lang.pick("Amount", "Valor"),
        ]);
        for payment in &report.dividends.recent {
            history.add_row(vec![
                payment.date.clone(),
                payment.kind.clone().unwrap_or_default(),
                format!("{cur} {:.2}", payment.amount),
            ]);
        }
        let _ = writeln!(out, "{history}");
    }
    out.push('\n');

    let mut cards = new_table();
    cards.set_header(vec![
        "",
        lang.pick("Formula", "Fórmula"),
        lang.pick("Fair price", "Preço justo"),
        lang.pick("Margin of safety", "Margem de segurança"),
        "",
    ]);
    for card in &report.indicators {
        let color = match card.signal {
            Signal::Opportunity => Color::Green,
            Signal::Overvalued => Color::Red,
        };
        cards.add_row(vec![
            Cell::new(card.title),
            Cell::new(card.formula),
            Cell::new(format!("{cur} {:.2}", card.fair_price)),
            Cell::new(format!("{:.2}%", card.upside)).fg(color),
            Cell::new(card.signal.label(lang)).fg(color),
        ]);
    }
    let _ = writeln!(out, "{cards}");
    for card in &report.indicators {
        let _ = writeln!(
            out,
            "  {:<18} {}",
            card.title,
            bar(card.gauge_width / 100.0)
        );
    }
    out.push('\n');

    let _ = writeln!(out, "{}", lang.pick("Price comparison", "Comparativo de preços"));
    write_chart(&mut out, &report.price_chart, cur);
    let _ = writeln!(
        out,
        "{}",
        lang.pick("Dividend comparison", "Comparativo de dividendos")
    );
    write_chart(&mut out, &report.dividend_chart, cur);
    out.push('\n');

    let _ = writeln!(
        out,
        "{}: {}",
        report.diagnosis_title,
        report.diagnosis.headline(lang)
    );
    let _ = writeln!(out, "  {}\n", report.diagnosis_text);

    if !report.sources.is_empty() {
        let _ = writeln!(out, "{}", lang.pick("Sources", "Fontes"));
        for source in &report.sources {
            match &source.uri {
                Some(uri) if *uri != source.label => {
                    let _ = writeln!(out, "  - {} <{uri}>", source.label);
                }
                _ => {
                    let _ = writeln!(out, "  - {}", source.label);
                }
            }
        }
        out.push('\n');
    }

    let _ = writeln!(out, "{}", report.disclaimer);
    out
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn write_chart(out: &mut String, bars: &[ChartBar], currency: &str) {
    let max = bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);
    for b in bars {
        let ratio = if max > 0.0 { b.value / max } else { 0.0 };
        let _ = writeln!(
            out,
            "  {:<18} {} {currency} {:.2}",
            b.label,
            bar(ratio),
            b.value
        );
    }
}

fn bar(ratio: f64) -> String {
    let filled = (ratio.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}
