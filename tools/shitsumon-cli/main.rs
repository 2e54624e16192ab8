use ahash::AHashMap;
use chrono::Utc;
use clap::{Parser, Subcommand};
use shitsumon::error::TransportError;
use shitsumon::graph::connection_summary;
use shitsumon::prelude::*;
use shitsumon::storage::draft_key;
use shitsumon::transport::Receipt;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Explore, check and run branching questionnaires from the command line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Optional TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the questions visible for a set of answers, and why
    Visible { flow: PathBuf, answers: PathBuf },
    /// List visible required questions that are still unanswered
    Validate { flow: PathBuf, answers: PathBuf },
    /// Show where each answer of each question leads
    Connections { flow: PathBuf },
    /// Report structural problems such as dangling edges
    Check { flow: PathBuf },
    /// Answer a questionnaire interactively, with drafts kept on disk
    Run {
        flow: PathBuf,
        /// Respondent name
        #[arg(short, long)]
        user: Option<String>,
        /// Directory for drafts and submissions
        #[arg(long)]
        storage_dir: Option<PathBuf>,
    },
}

/// Stores submissions next to the drafts, one file per attempt.
struct Outbox<'a> {
    store: &'a mut FileStore,
}

impl SubmissionTransport for Outbox<'_> {
    fn submit(&mut self, submission: &Submission) -> Result<Receipt, TransportError> {
        let key = format!(
            "submission_{}_{}_{}",
            submission.questionnaire_id(),
            submission.user().storage_key(),
            submission.attempt_number()
        );
        let json = serde_json::to_string_pretty(submission)
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        self.store
            .put(&key, &json)
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        Ok(Receipt {
            id: Some(key),
            message: Some("Submission stored".to_string()),
        })
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => EngineConfig::default(),
    };

    match cli.command {
        Command::Visible { flow, answers } => {
            let questionnaire = load_questionnaire(&flow);
            let answers = load_answers(&answers);
            let visibility = VisibilityResolver::with_root(&questionnaire, &config.root_node_id)
                .resolve(&answers);
            println!("Visible questions ({}):", visibility.len());
            for id in visibility.ordered() {
                if let Some(node) = questionnaire.node(id) {
                    let answer = answers
                        .get(id)
                        .map_or("-".to_string(), |a| format!("\"{}\"", a));
                    println!("  [{}] {} -> {}", node.id, node.question, answer);
                }
            }
            println!("\nRoute:");
            println!("{}", TraceFormatter::format_route(&visibility, &questionnaire));
        }
        Command::Validate { flow, answers } => {
            let questionnaire = load_questionnaire(&flow);
            let answers = load_answers(&answers);
            let visibility = VisibilityResolver::with_root(&questionnaire, &config.root_node_id)
                .resolve(&answers);
            let missing = validate_required(&questionnaire, &visibility, &answers);
            if missing.is_empty() {
                println!("All visible required questions are answered.");
            } else {
                println!("{} required questions remaining:", missing.len());
                for id in missing {
                    let question = questionnaire.node(&id).map_or("", |n| n.question.as_str());
                    println!("  [{}] {}", id, question);
                }
                std::process::exit(2);
            }
        }
        Command::Connections { flow } => {
            let questionnaire = load_questionnaire(&flow);
            for summary in connection_summary(&questionnaire) {
                println!("[{}] {}", summary.source_id, summary.question);
                for (label, targets) in summary.branches {
                    let targets: Vec<String> = targets
                        .iter()
                        .map(|(id, question)| format!("[{}] {}", id, question))
                        .collect();
                    println!("  {} -> {}", label, targets.join(", "));
                }
            }
        }
        Command::Check { flow } => {
            let questionnaire = load_questionnaire(&flow);
            let issues = questionnaire.check(&config.root_node_id);
            if issues.is_empty() {
                println!("No structural issues found.");
            } else {
                for issue in &issues {
                    println!("  - {}", issue);
                }
                println!("{} issue(s) found.", issues.len());
            }
        }
        Command::Run {
            flow,
            user,
            storage_dir,
        } => {
            if let Some(dir) = storage_dir {
                config.storage_dir = dir;
            }
            let user = user.unwrap_or_else(|| prompt_for_input("Enter your name", None));
            run_interactive(&flow, &user, &config);
        }
    }
}

/// Walks the respondent through the visible questions one at a time.
fn run_interactive(flow: &Path, user_name: &str, config: &EngineConfig) {
    let questionnaire = load_questionnaire(flow);
    let user = UserIdentity::new(user_name).unwrap_or_else(|e| exit_with_error(&e.to_string()));
    let store = FileStore::open(&config.storage_dir)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to open storage: {}", e)));
    let mut session = AssessmentSession::start(questionnaire, user, store, config)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));

    println!("--- {} ---", session.questionnaire().name);
    if let Some(draft) = session.pending_draft() {
        println!(
            "A draft from {} with {} answers was found.",
            draft.saved_at.format("%Y-%m-%d %H:%M"),
            draft.answers.len()
        );
        let choice = prompt_for_input("Continue from the draft? (y/n)", Some("y"));
        let choice = if choice.eq_ignore_ascii_case("n") {
            DraftChoice::StartNew
        } else {
            DraftChoice::Continue
        };
        session.resume(choice);
    }
    println!("Commands: :n next, :p previous, :s save, :submit, :q save and quit\n");

    loop {
        let Some(node) = session.current().cloned() else {
            println!("This questionnaire has no questions.");
            return;
        };
        let (position, total) = session.progress();
        let marker = if node.required { " *" } else { "" };
        println!("Question {} of {}: {}{}", position, total, node.question, marker);
        let options = node.kind.options();
        for (i, option) in options.iter().enumerate() {
            println!("  {}: {}", i + 1, option);
        }
        if let Some(answer) = session.answers().get(&node.id) {
            println!("  (current answer: {})", answer);
        }

        let input = prompt_for_input("Answer", None);
        // the previous answer has settled while the respondent was typing
        if let Err(e) = session.tick(Instant::now(), Utc::now()) {
            println!("Warning: draft not saved ({})", e);
        }
        match input.as_str() {
            ":n" => {
                session.next();
            }
            ":p" => {
                session.previous();
            }
            ":s" => save(&mut session),
            ":q" => {
                save(&mut session);
                return;
            }
            ":submit" => {
                let store_dir = config.storage_dir.clone();
                let result = {
                    let mut outbox_store = FileStore::open(&store_dir).unwrap_or_else(|e| {
                        exit_with_error(&format!("Failed to open storage: {}", e))
                    });
                    let mut outbox = Outbox {
                        store: &mut outbox_store,
                    };
                    session.submit(&mut outbox, Utc::now())
                };
                match result {
                    Ok(receipt) => {
                        println!("Submitted. {}", receipt.id.unwrap_or_default());
                        return;
                    }
                    Err(e) => println!("{}", e),
                }
            }
            _ => {
                let Some(answer) = parse_answer(&node, &options, &input) else {
                    println!("Could not understand that answer.");
                    continue;
                };
                match session.answer(&node.id, answer, Instant::now()) {
                    Ok(dropped) if !dropped.is_empty() => {
                        println!("Answers no longer needed were removed: {}", dropped.join(", "));
                        session.next();
                    }
                    Ok(_) => {
                        session.next();
                    }
                    Err(e) => println!("{}", e),
                }
                if let Err(e) = session.tick(Instant::now(), Utc::now()) {
                    println!("Warning: draft not saved ({})", e);
                }
            }
        }
    }
}

fn save(session: &mut AssessmentSession<FileStore>) {
    match session.save_draft(Utc::now()) {
        Ok(()) => {
            let key = draft_key(&session.questionnaire().id, session.user());
            info!(key = %key, "draft written");
            println!("Draft saved.");
        }
        Err(e) => println!("Warning: draft not saved ({})", e),
    }
}

/// Reads a typed answer: an option number or label for choice questions,
/// comma-separated numbers or labels for checkboxes, free text otherwise.
fn parse_answer(node: &QuestionNode, options: &[String], input: &str) -> Option<Answer> {
    let pick = |token: &str| -> Option<String> {
        let token = token.trim();
        match token.parse::<usize>() {
            Ok(n) if n >= 1 && n <= options.len() => Some(options[n - 1].clone()),
            _ => options
                .iter()
                .find(|o| o.eq_ignore_ascii_case(token))
                .cloned(),
        }
    };
    match &node.kind {
        QuestionKind::TextInput => Some(Answer::text(input)),
        QuestionKind::Checkbox { .. } => {
            if input.is_empty() {
                return Some(Answer::Choices(Vec::new()));
            }
            let picked: Option<Vec<String>> = input.split(',').map(pick).collect();
            picked.map(Answer::Choices)
        }
        _ => pick(input).map(Answer::Text),
    }
}

fn load_questionnaire(path: &Path) -> Questionnaire {
    let graph = load_from_file(path).unwrap_or_else(|e| exit_with_error(&e.to_string()));
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "questionnaire".to_string());
    Questionnaire::new(name.clone(), name, Utc::now()).with_graph(graph.nodes, graph.edges)
}

fn load_answers(path: &Path) -> AnswerStore {
    let json = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read answers file '{}': {}", path.display(), e))
    });
    let answers: AHashMap<String, Answer> = serde_json::from_str(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse answers JSON: {}", e)));
    AnswerStore::from_parts(answers, Vec::new())
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    if io::stdout().flush().is_err() {
        exit_with_error("Failed to write to the terminal");
    }
    match read_trimmed_line(&mut io::stdin().lock(), default) {
        Ok(Some(line)) => line,
        Ok(None) => exit_with_error("Input closed"),
        Err(_) => exit_with_error("Failed to read from the terminal"),
    }
}

/// Reads one line, falling back to `default` when it is blank. `None` at end of input.
fn read_trimmed_line(
    reader: &mut impl BufRead,
    default: Option<&str>,
) -> io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Ok(Some(default.unwrap_or("").to_string()))
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_trimmed_line() {
        let mut input = io::Cursor::new("  yes \n\n");
        assert_eq!(read_trimmed_line(&mut input, None).unwrap().as_deref(), Some("yes"));
        assert_eq!(read_trimmed_line(&mut input, Some("y")).unwrap().as_deref(), Some("y"));
        assert_eq!(read_trimmed_line(&mut input, Some("y")).unwrap(), None);
    }
}
