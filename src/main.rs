use std::fs;
use std::io;

use clap::{Args, Parser, Subcommand};
use serde_json::{Value, json};
use tracing::info;

use drawlines::config::{GradingConfig, GradingSettings};
use drawlines::coords::parse_line_response;
use drawlines::grading::{classify_response, num_parts_right, summarise_response, validation_error};
use drawlines::{ConfigurationError, Dimensions, FormatError, GradeMethod, Line, LineType, Question, QuestionForm, Response, Zone};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigurationError),
    #[error("invalid coordinates: {0}")]
    Format(#[from] FormatError),
}

#[derive(Parser, Debug)]
#[command(name = "drawlines", about = "Grade and inspect drag-the-line image questions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Grade one response against a question.
    Grade(GradeArgs),
    /// Grade a sequence of tries with the multi-try penalty.
    FinalGrade(FinalGradeArgs),
    /// Check an authoring form and report problems per field.
    Validate(ValidateArgs),
    /// Print the response that grades fully right.
    Correct(QuestionArg),
    /// Project a line through two points to the image border.
    Project(ProjectArgs),
}

#[derive(Args, Debug)]
struct QuestionArg {
    #[arg(long, help = "Question JSON file, or - for stdin")]
    question: String,
}

#[derive(Args, Debug)]
struct GradeArgs {
    #[command(flatten)]
    question: QuestionArg,

    #[arg(long, help = "Response JSON file, or - for stdin")]
    response: String,

    #[arg(long, help = "Grading method (partial|allnone); defaults to DRAWLINES_GRADE_METHOD, else the question's")]
    method: Option<String>,
}

#[derive(Args, Debug)]
struct FinalGradeArgs {
    #[command(flatten)]
    question: QuestionArg,

    #[arg(long, help = "JSON array of responses, one per try")]
    responses: String,

    #[arg(long, help = "Grading method (partial|allnone); defaults to DRAWLINES_GRADE_METHOD, else the question's")]
    method: Option<String>,

    #[arg(long, help = "Penalty per wrong try; defaults to DRAWLINES_PENALTY, else the question's")]
    penalty: Option<f64>,

    #[arg(long, help = "Total tries; defaults to DRAWLINES_TOTAL_TRIES, else one per hint plus one")]
    tries: Option<usize>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    #[arg(long, help = "Authoring form JSON file, or - for stdin")]
    form: String,

    #[arg(long, requires = "height")]
    width: Option<u32>,

    #[arg(long, requires = "width")]
    height: Option<u32>,
}

#[derive(Args, Debug)]
struct ProjectArgs {
    #[arg(help = "Two points, e.g. \"10,20 30,40\"")]
    coords: String,

    #[arg(long)]
    width: u32,

    #[arg(long)]
    height: u32,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Grade(args) => run_grade(args),
        Command::FinalGrade(args) => run_final_grade(args),
        Command::Validate(args) => run_validate(args),
        Command::Correct(args) => run_correct(args),
        Command::Project(args) => run_project(args),
    }
}

fn run_grade(args: GradeArgs) -> Result<(), CliError> {
    let question = load_question(&args.question)?;
    let response: Response = serde_json::from_str(&read_input(&args.response)?)?;
    let method = settings(&question, args.method.as_deref(), None, None)?.grade_method;

    let (fraction, state) = drawlines::grading::grade_response(&question.lines, &response, method);
    let (right, total) = num_parts_right(&question.lines, &response);
    info!(fraction, ?state, "graded response");

    print_json(&json!({
        "fraction": fraction,
        "state": state,
        "gradeMethod": method.as_str(),
        "partsRight": right,
        "partsTotal": total,
        "complete": question.is_complete_response(&response),
        "error": validation_error(&question.lines, &response).map(|e| e.to_string()),
        "summary": summarise_response(&question.lines, &response),
        "lines": classify_response(&question.lines, &response, method),
    }))
}

fn run_final_grade(args: FinalGradeArgs) -> Result<(), CliError> {
    let question = load_question(&args.question)?;
    let responses: Vec<Response> = serde_json::from_str(&read_input(&args.responses)?)?;
    let GradingSettings { grade_method, penalty, total_tries } =
        settings(&question, args.method.as_deref(), args.penalty, args.tries)?;
    let grade =
        drawlines::grading::compute_final_grade(&question.lines, grade_method, &responses, penalty, total_tries);

    print_json(&json!({
        "grade": grade,
        "gradeMethod": grade_method.as_str(),
        "penalty": penalty,
        "tries": total_tries,
    }))
}

fn run_validate(args: ValidateArgs) -> Result<(), CliError> {
    let form: QuestionForm = serde_json::from_str(&read_input(&args.form)?)?;
    let dims = args.width.zip(args.height).map(|(w, h)| Dimensions::new(w, h));
    let issues = form.validate(dims);
    print_json(&json!({ "valid": issues.is_empty(), "issues": issues }))
}

fn run_correct(args: QuestionArg) -> Result<(), CliError> {
    let question = load_question(&args)?;
    print_json(&serde_json::to_value(question.correct_response())?)
}

fn run_project(args: ProjectArgs) -> Result<(), CliError> {
    let (start, end) = parse_line_response(LineType::LineSegment, &args.coords)?;
    let dims = Dimensions::new(args.width, args.height);
    let line = Line::new(1, LineType::LineInfinite, Zone::new(start, 0.0), Zone::new(end, 0.0));
    let [a, b] = line.infinite_projection(dims.max_x(), dims.max_y());
    print_json(&json!({
        "projection": [a.to_string(), b.to_string()],
        "response": line.response_coordinates(dims),
    }))
}

/// Flags first, then `DRAWLINES_*` variables, then the question itself.
fn settings(
    question: &Question,
    method: Option<&str>,
    penalty: Option<f64>,
    tries: Option<usize>,
) -> Result<GradingSettings, CliError> {
    let flags = GradingConfig {
        grade_method: method.map(str::parse::<GradeMethod>).transpose()?,
        penalty,
        total_tries: tries,
    };
    let settings = flags.or(GradingConfig::from_env()?).resolve(question);
    info!(method = settings.grade_method.as_str(), settings.penalty, settings.total_tries, "grading settings");
    Ok(settings)
}

fn load_question(arg: &QuestionArg) -> Result<Question, CliError> {
    let question: Question = serde_json::from_str(&read_input(&arg.question)?)?;
    info!(lines = question.lines.len(), method = question.grade_method.as_str(), "question loaded");
    Ok(question)
}

fn read_input(path: &str) -> Result<String, CliError> {
    let result = if path == "-" { io::read_to_string(io::stdin()) } else { fs::read_to_string(path) };
    result.map_err(|source| CliError::Io { path: path.to_string(), source })
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
