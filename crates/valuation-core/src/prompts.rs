//! Prompt templates for financial data acquisition

use crate::language::Language;
use minijinja::{Environment, context};

/// Number of recent dividend payments requested from the provider
pub const DIVIDEND_HISTORY_LEN: usize = 3;

const SYSTEM_EN: &str = "You are a financial data assistant. Answer with a single JSON object \
that follows the provided schema. Use null for any value you cannot find; never invent numbers.";

const SYSTEM_PT: &str = "Você é um assistente de dados financeiros. Responda com um único objeto \
JSON que siga o schema fornecido. Use null para qualquer valor que não encontrar; nunca invente números.";

const USER_EN: &str = r"Provide detailed, up-to-date financial data for the ticker: {{ ticker }}.
I need:
1. Current price, EPS, BVPS and current dividend yield (%).
2. Average annual dividend paid over the last 5 years.
3. Company name, currency and region{% if region_hint %} ({{ region_hint }}){% endif %}.
4. DIVIDEND MONITOR:
   - Date of the next expected payment or the most recent ex-date (if any).
   - Payment frequency (e.g. Monthly, Quarterly, Semiannual).
   - The last {{ history_len }} payments (date, amount and type such as 'Dividend' or 'Interest on equity').

Return accurate data based on current market information.";

const USER_PT: &str = r"Forneça dados financeiros detalhados e em tempo real para o ticker: {{ ticker }}.
Preciso de:
1. Preço Atual, LPA (EPS), VPA (BVPS), Dividend Yield atual (%).
2. Média de dividendos anuais pagos nos últimos 5 anos.
3. Nome da Empresa, Moeda e Região{% if region_hint %} ({{ region_hint }}){% endif %}.
4. MONITOR DE DIVIDENDOS:
   - Data do próximo pagamento previsto ou data ex recente (se houver).
   - Frequência de pagamento (ex: Mensal, Trimestral, Semestral).
   - Histórico dos últimos {{ history_len }} pagamentos (data, valor e tipo como 'Dividendo' ou 'JCP').

Retorne os dados com precisão baseando-se nas informações atuais do mercado.";

/// Acquisition prompts in every supported language
///
/// Templates are compiled once at construction so a syntax error surfaces
/// immediately instead of on the first lookup.
pub struct AcquisitionPrompt {
    env: Environment<'static>,
}

impl AcquisitionPrompt {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("user.en", USER_EN)?;
        env.add_template("user.pt", USER_PT)?;
        Ok(Self { env })
    }

    /// System instruction for the given language
    pub fn system(&self, language: Language) -> &'static str {
        language.pick(SYSTEM_EN, SYSTEM_PT)
    }

    /// Render the user instruction for one ticker
    pub fn user(&self, ticker: &str, language: Language) -> Result<String, minijinja::Error> {
        let template = self.env.get_template(&format!("user.{}", language.code()))?;
        template.render(context! {
            ticker => ticker,
            history_len => DIVIDEND_HISTORY_LEN,
            region_hint => region_hint(ticker, language),
        })
    }
}

/// Market hint from the exchange suffix, if it is one we recognise
fn region_hint(ticker: &str, language: Language) -> Option<&'static str> {
    let (_, suffix) = ticker.rsplit_once('.')?;
    match suffix {
        "SA" => Some(language.pick("Brazil, B3", "Brasil, B3")),
        "PA" | "AS" | "DE" | "MC" | "MI" | "L" | "SW" | "BR" | "LS" => {
            Some(language.pick("Europe", "Europa"))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_english() {
        let prompts = AcquisitionPrompt::new().unwrap();
        let text = prompts.user("ASML.AS", Language::English).unwrap();
        assert!(text.contains("for the ticker: ASML.AS"));
        assert!(text.contains("The last 3 payments"));
        assert!(text.contains("region (Europe)"));
    }

    #[test]
    fn test_render_portuguese() {
        let prompts = AcquisitionPrompt::new().unwrap();
        let text = prompts.user("PETR4.SA", Language::Portuguese).unwrap();
        assert!(text.starts_with("Forneça dados financeiros"));
        assert!(text.contains("Região (Brasil, B3)"));
        assert!(text.contains("últimos 3 pagamentos"));
    }

    #[test]
    fn test_no_hint_for_unknown_market() {
        let prompts = AcquisitionPrompt::new().unwrap();
        let text = prompts.user("AAPL", Language::English).unwrap();
        assert!(text.contains("currency and region.\n"));
    }

    #[test]
    fn test_system_prompt_language() {
        let prompts = AcquisitionPrompt::new().unwrap();
        assert!(prompts.system(Language::English).contains("JSON object"));
        assert!(prompts.system(Language::Portuguese).contains("objeto"));
    }
}
