use clap::Args;
use std::sync::Arc;
use tracing::info;
use tuition_board::board::catalog::{is_known_class_level, is_known_subject, CLASS_LEVELS, SUBJECTS};
use tuition_board::board::{
    BoardApi, BoardSession, BoardView, FilterCriteria, Gender, HttpBoardApi, PostId, ViewerId,
};
use tuition_board::config::AppConfig;
use tuition_board::error::AppError;
use tuition_board::telemetry;

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct FilterArgs {
    /// Free-text search over class, subject, location, and requirements
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Exact class level, e.g. "Class-8" or "HSC Candidate"
    #[arg(long = "class")]
    pub(crate) class_level: Option<String>,
    /// Exact subject, e.g. "Mathematics"
    #[arg(long)]
    pub(crate) subject: Option<String>,
    /// Location substring, case-insensitive
    #[arg(long)]
    pub(crate) location: Option<String>,
    /// Preferred tutor gender: Male, Female, or Any
    #[arg(long, value_parser = crate::infra::parse_gender)]
    pub(crate) gender: Option<Gender>,
}

impl FilterArgs {
    pub(crate) fn into_criteria(self) -> FilterCriteria {
        if let Some(class_level) = self.class_level.as_deref() {
            if !class_level.is_empty() && !is_known_class_level(class_level) {
                eprintln!("note: '{class_level}' is not a listed class level; matching exactly");
            }
        }
        if let Some(subject) = self.subject.as_deref() {
            if !subject.is_empty() && !is_known_subject(subject) {
                eprintln!("note: '{subject}' is not a listed subject; matching exactly");
            }
        }

        FilterCriteria {
            search: self.search,
            class_level: self.class_level,
            subject: self.subject,
            location: self.location,
            gender: self.gender,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct PostsArgs {
    #[command(flatten)]
    pub(crate) filters: FilterArgs,
    /// View the board as this signed-in user
    #[arg(long)]
    pub(crate) viewer: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ApplyArgs {
    /// Post to apply to
    pub(crate) post_id: String,
    /// Applicant user id
    #[arg(long)]
    pub(crate) viewer: String,
    /// Message sent to the guardian
    #[arg(long, default_value = "")]
    pub(crate) message: String,
}

fn backend_from_env() -> Result<Arc<HttpBoardApi>, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    info!(backend = %config.backend.base_url, "using marketplace backend");
    Ok(Arc::new(HttpBoardApi::from_config(&config.backend)?))
}

pub(crate) async fn run_posts(args: PostsArgs) -> Result<(), AppError> {
    let api = backend_from_env()?;
    let view = board_view(api, args.viewer.map(ViewerId::new), args.filters.into_criteria()).await;
    render_board(&view);
    Ok(())
}

pub(crate) async fn run_apply(args: ApplyArgs) -> Result<(), AppError> {
    let api = backend_from_env()?;
    let mut session = BoardSession::with_identity(api, Some(ViewerId::new(args.viewer)));
    session.load().await;

    if let Some(banner) = session.banner() {
        println!("{banner}");
    }

    let confirmation = session.apply(&PostId::new(args.post_id), &args.message).await?;
    println!("{}", confirmation.message);
    Ok(())
}

pub(crate) fn run_catalog() {
    println!("Class levels");
    for level in CLASS_LEVELS {
        println!("- {level}");
    }
    println!("\nSubjects");
    for subject in SUBJECTS {
        println!("- {subject}");
    }
    println!("\nGenders: Male, Female, Any");
}

pub(crate) async fn board_view<A>(
    api: Arc<A>,
    viewer: Option<ViewerId>,
    criteria: FilterCriteria,
) -> BoardView
where
    A: BoardApi + 'static,
{
    let mut session = BoardSession::with_identity(api, viewer);
    session.load().await;
    session.set_criteria(criteria);
    session.view()
}

pub(crate) fn render_board(view: &BoardView) {
    if let Some(banner) = &view.banner {
        println!("! {banner}");
    }
    for warning in &view.warnings {
        println!("warning: {}", warning.summary());
    }

    println!("{}", view.summary);
    if view.is_empty() {
        println!("No posts found.");
        return;
    }

    for card in &view.posts {
        println!(
            "\n[{}] {} | {} | {}",
            card.id, card.class_level, card.gender, card.apply.label
        );
        println!("  Group: {}", card.group);
        println!("  Salary: {}", card.salary);
        println!("  Subject: {}", card.subject);
        println!("  Location: {}", card.location);
        if let Some(requirement) = &card.requirement {
            println!("  Requirements: {requirement}");
        }
        println!("  Posted: {}", card.posted_on);
    }
}
