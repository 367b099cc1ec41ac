//! Interactive lookup loop
//!
//! Lookups run as background tasks so a new ticker can be typed while an
//! older one is still loading. Finished lookups come back over a channel and
//! go through [`LookupController::complete`], which drops stale answers.

use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;
use valuation_core::{
    AcquisitionError, Analysis, Analyzer, FinancialDataSource, Language, LookupController,
    LookupState, POPULAR_TICKERS, Report, RequestId, normalize_ticker, render_text,
};

type Completion = (RequestId, Result<Analysis, AcquisitionError>);

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Lookup(String),
    Retry,
    Home,
    Help,
    Exit,
}

impl Command {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        match input.to_lowercase().as_str() {
            "" => Self::Empty,
            "/retry" | "/r" => Self::Retry,
            "/home" | "/back" => Self::Home,
            "/help" | "/h" | "?" => Self::Help,
            "/exit" | "/quit" | "/q" => Self::Exit,
            _ => {
                let pick = input
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| POPULAR_TICKERS.get(i));
                match pick {
                    Some(ticker) => Self::Lookup((*ticker).to_string()),
                    None => Self::Lookup(input.to_string()),
                }
            }
        }
    }
}

pub async fn run<S>(analyzer: Arc<Analyzer<S>>, language: Language) -> anyhow::Result<()>
where
    S: FinancialDataSource + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();
    let mut lookup = LookupController::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_home(language);
    print_prompt()?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    println!();
                    break;
                };
                match Command::parse(&line) {
                    Command::Empty => {}
                    Command::Exit => break,
                    Command::Help => print_help(language),
                    Command::Home => {
                        lookup.reset();
                        print_home(language);
                    }
                    Command::Retry => match lookup.retry() {
                        Some((request, ticker)) => {
                            spawn_lookup(&analyzer, &tx, request, ticker);
                            print_state(&lookup, language);
                        }
                        None => println!("{}", language.pick("Nothing to retry.", "Nada para tentar novamente.")),
                    },
                    Command::Lookup(input) => match normalize_ticker(&input) {
                        Ok(ticker) => {
                            let request = lookup.begin(ticker.clone());
                            spawn_lookup(&analyzer, &tx, request, ticker);
                            print_state(&lookup, language);
                        }
                        Err(err) => println!("{err}"),
                    },
                }
            }
            Some((request, result)) = rx.recv() => {
                if !lookup.complete(request, result) {
                    continue;
                }
                print_state(&lookup, language);
            }
        }
        print_prompt()?;
    }

    println!("{}", language.pick("Goodbye!", "Até logo!"));
    Ok(())
}

fn spawn_lookup<S>(
    analyzer: &Arc<Analyzer<S>>,
    tx: &mpsc::UnboundedSender<Completion>,
    request: RequestId,
    ticker: String,
) where
    S: FinancialDataSource + 'static,
{
    let analyzer = Arc::clone(analyzer);
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = analyzer.analyze(&ticker).await;
        if tx.send((request, result)).is_err() {
            debug!(%request, "Lookup finished after the loop exited");
        }
    });
}

fn print_prompt() -> std::io::Result<()> {
    print!("> ");
    std::io::stdout().flush()
}

fn print_state(lookup: &LookupController, language: Language) {
    match lookup.state() {
        LookupState::Idle => print_home(language),
        LookupState::Loading { ticker, .. } => {
            println!(
                "{} {ticker}...",
                language.pick(
                    "Searching financial data for",
                    "Buscando dados financeiros de"
                )
            );
        }
        LookupState::Loaded(analysis) => {
            println!("\n{}", render_text(&Report::from_analysis(analysis, language)));
        }
        LookupState::Failed { ticker, error } => {
            println!(
                "\n{} {ticker}\n{}\n",
                language.pick("Error analyzing", "Erro ao analisar"),
                error.message
            );
            println!(
                "{}",
                language.pick(
                    "Type /retry to try again or /home to go back.",
                    "Digite /retry para tentar novamente ou /home para voltar."
                )
            );
        }
    }
}

fn print_home(language: Language) {
    println!(
        "\n{}\n",
        language.pick(
            "Stock valuation: Bazin and Graham fair prices",
            "Valuation de ações: preço justo por Bazin e Graham"
        )
    );
    println!("{}", language.pick("Popular tickers:", "Tickers populares:"));
    for (i, ticker) in POPULAR_TICKERS.iter().enumerate() {
        println!("  {}. {ticker}", i + 1);
    }
    println!(
        "\n{}",
        language.pick(
            "Type a ticker (e.g. BBAS3.SA, MC.PA) or a number. /help for commands.",
            "Digite um ticker (ex: BBAS3.SA, MC.PA) ou um número. /help para comandos."
        )
    );
}

fn print_help(language: Language) {
    println!(
        "{}",
        language.pick(
            "Commands:\n  <ticker>  Analyze a ticker\n  <n>       Analyze popular ticker n\n  \
             /retry    Retry the failed lookup\n  /home     Back to the home view\n  \
             /exit     Exit",
            "Comandos:\n  <ticker>  Analisar um ticker\n  <n>       Analisar o ticker popular n\n  \
             /retry    Tentar novamente\n  /home     Voltar ao início\n  /exit     Sair",
        )
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("   "), Command::Empty);
        assert_eq!(Command::parse("/retry"), Command::Retry);
        assert_eq!(Command::parse("/HOME"), Command::Home);
        assert_eq!(Command::parse("/quit"), Command::Exit);
        assert_eq!(Command::parse("?"), Command::Help);
    }

    #[test]
    fn test_parse_ticker() {
        assert_eq!(Command::parse(" petr4.sa "), Command::Lookup("petr4.sa".to_string()));
    }

    #[test]
    fn test_parse_popular_number() {
        assert_eq!(Command::parse("1"), Command::Lookup("PETR4.SA".to_string()));
        assert_eq!(Command::parse("8"), Command::Lookup("LVMH.PA".to_string()));
        assert_eq!(Command::parse("0"), Command::Lookup("0".to_string()));
        assert_eq!(Command::parse("9"), Command::Lookup("9".to_string()));
    }
}
