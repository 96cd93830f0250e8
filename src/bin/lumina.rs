use std::fs::File;
use std::io::{BufReader, Write as _};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use lumina::{
    AcceptRecommended, Answers, DesignSession, EngineOpts, PayloadForm, RooflineConfiguration,
};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "lumina", version)]
struct Cli {
    /// Log pipeline decisions to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse text into a design intent.
    Parse(DesignArgs),
    /// Parse, then check the intent against a roofline.
    Check(DesignArgs),
    /// Print the clarification questions for a design.
    Questions(DesignArgs),
    /// Parse, check, apply answers and emit a controller payload.
    Compile(CompileArgs),
}

#[derive(Args, Debug)]
struct DesignArgs {
    /// Lighting instruction.
    #[arg(long)]
    text: String,

    /// Roofline configuration JSON.
    #[arg(long)]
    roofline: Option<PathBuf>,

    /// Engine options JSON; missing fields keep their defaults.
    #[arg(long)]
    opts: Option<PathBuf>,

    /// Write JSON here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CompileArgs {
    #[command(flatten)]
    design: DesignArgs,

    /// Answers JSON: question id to an option id, or to `{"option": .., "value": ..}` when a
    /// value is entered by hand.
    #[arg(long)]
    answers: Option<PathBuf>,

    /// Answer whatever is still open with the recommended option.
    #[arg(long, default_value_t = false)]
    accept_recommended: bool,

    /// Payload form.
    #[arg(long, value_enum, default_value_t = Form::Pixels)]
    form: Form,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Form {
    Pixels,
    Segment,
}

impl From<Form> for PayloadForm {
    fn from(f: Form) -> Self {
        match f {
            Form::Pixels => PayloadForm::Pixels,
            Form::Segment => PayloadForm::Segment,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Parse(args) => cmd_parse(args),
        Command::Check(args) => cmd_check(args),
        Command::Questions(args) => cmd_questions(args),
        Command::Compile(args) => cmd_compile(args),
    }
}

fn open_session(args: &DesignArgs) -> anyhow::Result<DesignSession> {
    let opts = match &args.opts {
        Some(p) => EngineOpts::from_path(p)
            .with_context(|| format!("load engine options '{}'", p.display()))?,
        None => EngineOpts::default(),
    };
    let config = match &args.roofline {
        Some(p) => Some(
            RooflineConfiguration::from_path(p)
                .with_context(|| format!("load roofline '{}'", p.display()))?,
        ),
        None => None,
    };
    let mut session = DesignSession::new(config, opts);
    session.parse(&args.text);
    Ok(session)
}

fn cmd_parse(args: DesignArgs) -> anyhow::Result<()> {
    let session = open_session(&args)?;
    emit(args.out.as_deref(), &session.intent())
}

fn cmd_check(args: DesignArgs) -> anyhow::Result<()> {
    let mut session = open_session(&args)?;
    let report = session.check().context("check design")?;

    #[derive(Serialize)]
    struct CheckOutput<'a> {
        report: &'a lumina::SolveReport,
        intent: Option<&'a lumina::DesignIntent>,
    }
    emit(
        args.out.as_deref(),
        &CheckOutput {
            report: &report,
            intent: session.intent(),
        },
    )
}

fn cmd_questions(args: DesignArgs) -> anyhow::Result<()> {
    let mut session = open_session(&args)?;
    if session.config().is_some() {
        session.check().context("check design")?;
    }
    emit(args.out.as_deref(), &session.questions())
}

fn cmd_compile(args: CompileArgs) -> anyhow::Result<()> {
    let mut session = open_session(&args.design)?;
    session.check().context("check design")?;

    if let Some(path) = &args.answers {
        let answers = read_answers(path)?;
        session.answer(&answers)?;
    }
    if args.accept_recommended {
        let outcome = session.resolve_with(&mut AcceptRecommended)?;
        tracing::debug!(?outcome, "accepted recommendations");
    }
    if let Some(intent) = session.intent()
        && !intent.is_resolved()
    {
        tracing::warn!(
            remaining = intent.ambiguities().len(),
            confidence = intent.confidence(),
            "compiling with unresolved ambiguities"
        );
    }

    let payload = session.payload(args.form.into())?;
    emit(args.design.out.as_deref(), &payload)
}

fn read_answers(path: &Path) -> anyhow::Result<Answers> {
    let f = File::open(path).with_context(|| format!("open answers '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse answers '{}'", path.display()))
}

fn emit<T: Serialize>(out: Option<&Path>, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize output")?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(path, json).with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("write stdout")?;
        }
    }
    Ok(())
}
