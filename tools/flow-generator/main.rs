use clap::Parser;
use rand::Rng;
use rand::rngs::ThreadRng;
use shitsumon::builder::{EditorCommand, QuestionDraft, QuestionnaireEditor};
use shitsumon::questionnaire::{QuestionKind, save_to_file};

/// A CLI tool to generate random questionnaires in the editor's JSON format
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_flow.json")]
    output: String,

    /// Number of questions to generate
    #[arg(short, long, default_value_t = 25)]
    questions: usize,

    /// Maximum number of outgoing edges per question
    #[arg(long, default_value_t = 3)]
    max_fan_out: usize,

    /// Also draw edges back to earlier questions, creating cycles
    #[arg(long)]
    cycles: bool,
}

const TOPICS: [&str; 8] = [
    "sleep",
    "diet",
    "exercise",
    "stress",
    "smoking",
    "alcohol",
    "medication",
    "family history",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.questions == 0 {
        eprintln!("Error: --questions must be at least 1");
        std::process::exit(1);
    }

    println!(
        "Generating a questionnaire with {} questions (fan-out up to {}, cycles: {})...",
        cli.questions, cli.max_fan_out, cli.cycles
    );

    let mut editor = QuestionnaireEditor::new();
    for i in 0..cli.questions {
        let draft = QuestionDraft::new(random_question(&mut rng, i), random_kind(&mut rng));
        let draft = if rng.random_bool(0.3) { draft.required() } else { draft };
        editor.apply(EditorCommand::AddQuestion(draft))?;
    }

    let mut connections = 0;
    for source in 1..=cli.questions {
        let node = &editor.graph().nodes[source - 1];
        let handles = handles_for(&node.kind);
        let fan_out = rng.random_range(0..=cli.max_fan_out.min(handles.len()));
        for _ in 0..fan_out {
            let target = if cli.cycles && source > 1 && rng.random_bool(0.15) {
                rng.random_range(1..source)
            } else if source < cli.questions {
                rng.random_range(source + 1..=cli.questions)
            } else {
                continue;
            };
            let handle = handles[rng.random_range(0..handles.len())].clone();
            editor.apply(EditorCommand::Connect {
                source: source.to_string(),
                target: target.to_string(),
                source_handle: handle,
            })?;
            connections += 1;
        }
    }
    println!("-> Generated {} connections.", connections);

    save_to_file(editor.graph(), &cli.output)?;
    println!("Successfully generated and saved questionnaire to '{}'", cli.output);

    Ok(())
}

fn random_question(rng: &mut ThreadRng, index: usize) -> String {
    let topic = TOPICS[rng.random_range(0..TOPICS.len())];
    format!("Q{}: Tell us about your {}", index + 1, topic)
}

fn random_kind(rng: &mut ThreadRng) -> QuestionKind {
    let options = |rng: &mut ThreadRng| -> Vec<String> {
        let count = rng.random_range(2..=5);
        (1..=count).map(|n| format!("Option {}", n)).collect()
    };
    match rng.random_range(0..5) {
        0 => QuestionKind::YesNo,
        1 => QuestionKind::TextInput,
        2 => QuestionKind::Radio { options: options(rng) },
        3 => QuestionKind::Checkbox { options: options(rng) },
        _ => QuestionKind::MultipleChoice { options: options(rng) },
    }
}

/// Every handle a question of `kind` can be connected from.
fn handles_for(kind: &QuestionKind) -> Vec<Option<String>> {
    match kind {
        QuestionKind::TextInput => vec![Some("text-output".to_string())],
        QuestionKind::YesNo => vec![Some("yes".to_string()), Some("no".to_string())],
        QuestionKind::Checkbox { options } => {
            let mut handles: Vec<Option<String>> =
                (0..options.len()).map(|i| Some(format!("option-{}", i))).collect();
            handles.push(Some("multi-2plus".to_string()));
            handles.push(Some("multi-all".to_string()));
            handles
        }
        QuestionKind::MultipleChoice { options } | QuestionKind::Radio { options } => {
            (0..options.len()).map(|i| Some(format!("option-{}", i))).collect()
        }
    }
}
