//! The `lettura study` command.
//!
//! Reads commands from stdin: a sentence number toggles its translation,
//! `q` starts the quiz, `x` exits.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use lettura_core::model::Language;
use lettura_core::scorer::ScoreResult;
use lettura_core::traits::ArticleSource;
use lettura_core::{FetchError, SessionError, StudySession};
use lettura_providers::config::load_config_from;
use lettura_providers::{create_translator, FileSource, LaStampaSource};
use lettura_store::JsonFileStore;

type Input = Lines<BufReader<Stdin>>;

const TRANSLATION_UNAVAILABLE: &str = "translation unavailable";

pub async fn execute(
    user: String,
    article_path: Option<PathBuf>,
    store_path: Option<PathBuf>,
    seed: Option<u64>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(!user.trim().is_empty(), "user must not be empty");

    let config = load_config_from(config_path.as_deref())?;
    let translator = create_translator(&config.translator)?;
    let store = JsonFileStore::new(store_path.unwrap_or_else(|| config.store_path.clone()));

    let source: Box<dyn ArticleSource> = match article_path {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(LaStampaSource::new(config.news.clone())?),
    };
    tracing::debug!(source = source.name(), translator = translator.name(), "starting study session");

    let article = match source.fetch_article().await {
        Ok(article) => article,
        Err(FetchError::NotFound) => {
            println!("No qualifying article found, try again later.");
            return Ok(());
        }
        Err(e) => return Err(anyhow::Error::new(e).context("failed to fetch article")),
    };

    let mut session = StudySession::new(user, config.session_settings());
    session.load_article(article, translator.as_ref()).await;
    print_article(&session);

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let today = chrono::Local::now().date_naive();
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt("> ")?;
        let Some(line) = input.next_line().await? else {
            break;
        };

        match line.trim() {
            "" => continue,
            "x" => break,
            "q" => {
                match session.start_quiz(&store, today, &mut rng).await {
                    Ok(_) => {}
                    Err(e) if e.is_warning() => {
                        println!("Warning: {e}");
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                }

                if !collect_answers(&mut session, &mut input, config.target_language).await? {
                    println!("\nInput ended before the quiz was finished; nothing was saved.");
                    return Ok(());
                }

                match session.submit(translator.as_ref(), &store, today).await {
                    Ok(result) => print_result(result),
                    Err(SessionError::Store {
                        source,
                        result: Some(result),
                    }) => {
                        print_result(&result);
                        return Err(anyhow::Error::new(source).context("failed to save quiz result"));
                    }
                    Err(e) => return Err(e.into()),
                }
                break;
            }
            other => match other.parse::<usize>() {
                Ok(index) => match session.toggle_sentence(index, translator.as_ref()).await {
                    Ok(Some(translation)) => println!("  {index}. {translation}"),
                    Ok(None) => println!("  {index}. (translation hidden)"),
                    Err(e @ SessionError::SentenceOutOfRange { .. }) => println!("{e}"),
                    Err(SessionError::Translation(e)) => {
                        println!("Translation unavailable: {e}")
                    }
                    Err(e) => return Err(e.into()),
                },
                Err(_) => println!(
                    "Unknown command {other:?}: type a sentence number, q for the quiz, x to exit."
                ),
            },
        }
    }

    Ok(())
}

fn prompt(text: &str) -> Result<()> {
    print!("{text}");
    std::io::stdout().flush().context("failed to flush stdout")
}

fn print_article(session: &StudySession) {
    let Some(article) = session.article() else {
        return;
    };
    println!("{}", article.title);
    if let Some(title) = session.title_translation() {
        println!("({title})");
    }
    println!();
    for sentence in session.sentences() {
        println!("{}. {}", sentence.index, sentence.text);
    }
    println!("\nType a sentence number to toggle its translation, q to start the quiz, x to exit.");
}

/// Prompt for every quiz word. Returns `false` if stdin ends first.
async fn collect_answers(
    session: &mut StudySession,
    input: &mut Input,
    target: Language,
) -> Result<bool> {
    let words: Vec<String> = session
        .quiz()
        .attempt()
        .map(|attempt| attempt.words().map(String::from).collect())
        .unwrap_or_default();

    println!("\nTranslate each word into {target}:");
    for word in &words {
        prompt(&format!("{word}: "))?;
        let Some(answer) = input.next_line().await? else {
            return Ok(false);
        };
        session.answer(word, &answer)?;
    }
    Ok(true)
}

fn print_result(result: &ScoreResult) {
    let mut table = Table::new();
    table.set_header(vec!["Word", "Your answer", "Translation", "Result"]);
    for outcome in result.per_word() {
        let (translation, verdict) = match (&outcome.reference_translation, outcome.is_correct) {
            (None, _) => (TRANSLATION_UNAVAILABLE, "not scored"),
            (Some(reference), true) => (reference.as_str(), "correct"),
            (Some(reference), false) => (reference.as_str(), "wrong"),
        };
        table.add_row(vec![
            Cell::new(&outcome.word),
            Cell::new(&outcome.user_answer),
            Cell::new(translation),
            Cell::new(verdict),
        ]);
    }
    println!("\n{table}");
    println!(
        "Score: {}/{}",
        result.correct_count(),
        result.scored_count()
    );
}
