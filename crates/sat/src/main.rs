#![forbid(unsafe_code)]

use std::io::{self, BufRead, Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use satlab_core::chat::{ChatMessage, ChatRequest};
use satlab_core::config::LabConfig;
use satlab_core::prompt::Section;
use satlab_core::traits::PersonaStore;
use satlab_core::types::{BuildAnswers, Field, ModelId};
use satlab_engine::interview::{questions, Step};
use satlab_engine::session::{BuildSession, BuiltPersona};
use satlab_engine::store::JsonDirStore;
use satlab_engine::stream::DeltaStream;

const DEFAULT_STORE: &str = ".satlab/personas";
const DEFAULT_SESSION: &str = "local";

#[derive(Parser)]
#[command(
    name = "sat",
    version,
    about = "Build AI personas by interview, then route them to a model."
)]
struct Cli {
    /// Config file (default: .satlab/config.json if present).
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print the six interview questions.
    Questions,

    /// Run the interview over stdin, one answer per line.
    Interview {
        /// Print the transcript and finished persona as JSON.
        #[arg(long)]
        json: bool,

        /// Save the finished persona into this store directory.
        #[arg(long)]
        save: Option<String>,

        #[arg(long, default_value = DEFAULT_SESSION)]
        session: String,
    },

    /// Show the follow-up the interview would ask for an answer.
    Clarify {
        /// personality, topics, or tone (others never clarify).
        #[arg(long)]
        field: Field,

        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Render the persona document for an answers file.
    Synth {
        /// Path to answers .json (or "-" / omit for stdin).
        #[arg(default_value = "-")]
        file: String,

        /// Include only these sections (comma-separated).
        #[arg(long, value_delimiter = ',')]
        sections: Vec<Section>,

        /// Output the document fields as JSON.
        #[arg(long)]
        json: bool,

        /// Revision note to carry into the document (repeatable).
        #[arg(long)]
        notes: Vec<String>,
    },

    /// Pick the upstream model for an answers file.
    Route {
        #[arg(default_value = "-")]
        file: String,

        #[arg(long)]
        json: bool,
    },

    /// List the models the router can pick.
    Models,

    /// Describe a model identifier.
    Describe { id: String },

    /// List built-in preset personas.
    Presets,

    /// Print one preset persona as JSON.
    Preset { slug: String },

    /// Validate an answers file: schema plus lint.
    Check {
        file: String,

        /// Output structured JSON report.
        #[arg(long)]
        json: bool,

        /// Fail on warnings (not just errors).
        #[arg(long)]
        strict: bool,
    },

    /// Save a persona built from an answers file.
    Save {
        file: String,

        #[arg(long, default_value = DEFAULT_STORE)]
        store: String,

        #[arg(long, default_value = DEFAULT_SESSION)]
        session: String,

        /// Revision note (repeatable).
        #[arg(long)]
        notes: Vec<String>,
    },

    /// Summarize saved personas as a table.
    List {
        #[arg(long, default_value = DEFAULT_STORE)]
        store: String,

        #[arg(long, default_value = DEFAULT_SESSION)]
        session: String,

        #[arg(long)]
        json: bool,
    },

    /// Print a saved persona's document.
    Show {
        id: String,

        #[arg(long, default_value = DEFAULT_STORE)]
        store: String,

        #[arg(long, default_value = DEFAULT_SESSION)]
        session: String,

        #[arg(long)]
        json: bool,
    },

    /// Print the chat-completion request body for an answers file.
    Request {
        #[arg(default_value = "-")]
        file: String,

        /// JSON array of prior {role, content} messages.
        #[arg(long)]
        history: Option<String>,

        /// Address the builder instead of the persona.
        #[arg(long)]
        builder: bool,
    },

    /// Decode a server-sent-event stream on stdin and print its text.
    Stream,

    /// Write default configuration to .satlab/config.json.
    Init {
        /// Overwrite an existing config.
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.cmd {
        Cmd::Questions => cmd_questions(),

        Cmd::Interview {
            json,
            save,
            session,
        } => cmd_interview(&config, json, save.as_deref(), &session),

        Cmd::Clarify { field, text } => cmd_clarify(&config, field, &text.join(" ")),

        Cmd::Synth {
            file,
            sections,
            json,
            notes,
        } => cmd_synth(&file, &sections, json, &notes),

        Cmd::Route { file, json } => cmd_route(&file, json),

        Cmd::Models => cmd_models(),

        Cmd::Describe { id } => {
            println!("{}", satlab_core::router::describe_model(&id));
            Ok(())
        }

        Cmd::Presets => cmd_presets(),

        Cmd::Preset { slug } => cmd_preset(&slug),

        Cmd::Check { file, json, strict } => cmd_check(&config, &file, json, strict),

        Cmd::Save {
            file,
            store,
            session,
            notes,
        } => cmd_save(&file, &store, &session, notes),

        Cmd::List {
            store,
            session,
            json,
        } => cmd_list(&store, &session, json),

        Cmd::Show {
            id,
            store,
            session,
            json,
        } => cmd_show(&id, &store, &session, json),

        Cmd::Request {
            file,
            history,
            builder,
        } => cmd_request(&config, &file, history.as_deref(), builder),

        Cmd::Stream => cmd_stream(),

        Cmd::Init { force } => cmd_init(force),
    }
}

/// Logs go to stderr so stdout stays machine-readable. Filter via `SAT_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("SAT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .init();
}

fn load_config(path: Option<&str>) -> Result<LabConfig> {
    match path {
        Some(p) => {
            tracing::debug!(path = p, "using config from --config");
            LabConfig::load(Path::new(p))
        }
        None => LabConfig::discover(Path::new(".")),
    }
}

fn read_answers(file: &str) -> Result<BuildAnswers> {
    if file == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("cannot read answers from stdin")?;
        let data: serde_json::Value =
            serde_json::from_str(&buf).context("stdin: invalid JSON")?;
        satlab_core::schema::parse_answers(&data)
    } else {
        satlab_core::schema::load_answers(file)
    }
}

fn cmd_questions() -> Result<()> {
    for (field, q) in questions::all() {
        println!("{}. [{field}] {q}", field.index() + 1);
    }
    Ok(())
}

fn cmd_interview(config: &LabConfig, json_out: bool, save: Option<&str>, session: &str) -> Result<()> {
    let mut build = BuildSession::new(config.clarify.clone());
    let opening = build.start();
    if !json_out {
        println!("{opening}\n");
    }

    let stdin = io::stdin();
    let mut built: Option<BuiltPersona> = None;
    for line in stdin.lock().lines() {
        let line = line.context("cannot read answer from stdin")?;
        let answer = line.trim();
        if answer.is_empty() {
            continue;
        }
        let step = build.submit(answer)?;
        if !json_out {
            println!("{}\n", step.message());
        }
        if let Step::Complete(persona) = step {
            built = Some(*persona);
            break;
        }
    }

    let Some(persona) = built else {
        let waiting = build
            .interview()
            .awaiting()
            .map(|f| f.to_string())
            .unwrap_or_else(|| "-".into());
        bail!("input ended before the interview finished (waiting on {waiting})");
    };

    if let Some(dir) = save {
        let saved = persona.to_saved();
        JsonDirStore::new(dir).save(session, &saved)?;
        eprintln!("saved {} to {dir}/{session}", saved.id);
    }

    if json_out {
        let out = serde_json::json!({
            "transcript": build.transcript(),
            "persona": persona,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", persona.document.text());
        println!("\nmodel: {} ({})", persona.selection.id, persona.selection.description);
        println!("{}", persona.greeting());
    }
    Ok(())
}

fn cmd_clarify(config: &LabConfig, field: Field, text: &str) -> Result<()> {
    if let Some(q) = satlab_engine::interview::clarify::follow_up(field, text, &config.clarify) {
        println!("{q}");
    }
    Ok(())
}

fn cmd_synth(file: &str, sections: &[Section], json_out: bool, notes: &[String]) -> Result<()> {
    let answers = read_answers(file)?;
    let doc = satlab_core::synth::synthesize_with_notes(&answers, notes);
    if json_out {
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        print!("{}", doc.render_sections(sections));
    }
    Ok(())
}

fn cmd_route(file: &str, json_out: bool) -> Result<()> {
    let answers = read_answers(file)?;
    let selection = satlab_core::router::route(&answers);
    if json_out {
        println!("{}", serde_json::to_string_pretty(&selection)?);
    } else {
        println!("{}\t{}", selection.id, selection.description);
    }
    Ok(())
}

fn cmd_models() -> Result<()> {
    for id in ModelId::ALL {
        println!("{:<44}  {}", id.as_str(), id.description());
    }
    Ok(())
}

fn cmd_presets() -> Result<()> {
    for p in satlab_core::presets::list_presets() {
        println!("{:<22}  {:<22}  {}", p.slug, p.name, p.description);
    }
    Ok(())
}

fn cmd_preset(slug: &str) -> Result<()> {
    let preset = satlab_core::presets::find_preset(slug).ok_or_else(|| {
        let available: Vec<_> = satlab_core::presets::list_presets()
            .iter()
            .map(|p| p.slug)
            .collect();
        anyhow::anyhow!(
            "unknown preset \"{slug}\". available: {}",
            available.join(", ")
        )
    })?;
    println!("{}", serde_json::to_string_pretty(preset)?);
    Ok(())
}

fn cmd_check(config: &LabConfig, file: &str, json_out: bool, strict: bool) -> Result<()> {
    let content = std::fs::read_to_string(file).with_context(|| format!("cannot read {file}"))?;
    let data: serde_json::Value =
        serde_json::from_str(&content).with_context(|| format!("{file}: invalid JSON"))?;

    let report = satlab_core::schema::check(&data, file, strict, &config.clarify);

    if json_out {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        eprintln!("  {} {file}", if report.pass { "ok  " } else { "FAIL" });
        for e in &report.errors {
            eprintln!("  error {}: {} {}", e.code, e.message, e.path.as_deref().unwrap_or(""));
        }
        for w in &report.warnings {
            eprintln!("  warn  {}: {} {}", w.code, w.message, w.path.as_deref().unwrap_or(""));
        }
    }

    if !report.pass {
        bail!("check failed for {file}");
    }
    Ok(())
}

fn cmd_save(file: &str, store: &str, session: &str, notes: Vec<String>) -> Result<()> {
    let answers = read_answers(file)?;
    let saved = satlab_core::saved::SavedPersona::new(answers, notes);
    JsonDirStore::new(store).save(session, &saved)?;
    eprintln!("saved {} to {store}/{session}", saved.id);
    println!("{}", saved.id);
    Ok(())
}

fn cmd_list(store: &str, session: &str, json_out: bool) -> Result<()> {
    let personas = JsonDirStore::new(store).list(session)?;
    if json_out {
        println!("{}", serde_json::to_string_pretty(&personas)?);
    } else {
        satlab_core::list::print_table(&satlab_core::list::rows(&personas));
    }
    Ok(())
}

fn cmd_show(id: &str, store: &str, session: &str, json_out: bool) -> Result<()> {
    let saved = JsonDirStore::new(store).require(session, id)?;
    if !saved.is_current() {
        eprintln!("  warn  {id}: document differs from the one saved ({})", saved.fingerprint);
    }
    if json_out {
        println!("{}", serde_json::to_string_pretty(&saved)?);
    } else {
        print!("{}", saved.document().text());
    }
    Ok(())
}

fn cmd_request(config: &LabConfig, file: &str, history: Option<&str>, builder: bool) -> Result<()> {
    let history: Vec<ChatMessage> = match history {
        Some(path) => {
            let content =
                std::fs::read_to_string(path).with_context(|| format!("cannot read {path}"))?;
            serde_json::from_str(&content)
                .with_context(|| format!("{path}: expected a JSON array of messages"))?
        }
        None => Vec::new(),
    };

    let request = if builder {
        ChatRequest::builder_mode(&history, &config.chat)
    } else {
        let built = BuiltPersona::new(read_answers(file)?);
        built.chat_request(&history, &config.chat)
    };
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}

fn cmd_stream() -> Result<()> {
    let mut read_error = None;
    {
        let mut input = io::stdin().lock();
        let chunks = std::iter::from_fn(|| {
            let mut buf = vec![0u8; 4096];
            match input.read(&mut buf) {
                Ok(0) => None,
                Ok(n) => {
                    buf.truncate(n);
                    Some(buf)
                }
                Err(e) => {
                    read_error = Some(e);
                    None
                }
            }
        });

        let mut out = io::stdout().lock();
        for delta in DeltaStream::new(chunks) {
            write!(out, "{delta}")?;
            out.flush()?;
        }
        writeln!(out)?;
    }
    if let Some(e) = read_error {
        return Err(e).context("cannot read stream from stdin");
    }
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let path = LabConfig::default_path(Path::new("."));
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(&LabConfig::default())?;
    std::fs::write(&path, format!("{json}\n"))
        .with_context(|| format!("cannot write {}", path.display()))?;
    eprintln!("created {}", path.display());
    Ok(())
}
