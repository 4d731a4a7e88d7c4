use crate::commands::{render_board, FilterArgs};
use crate::infra::{demo_posts, DEMO_GUARDIAN, DEMO_TUTOR};
use chrono::Utc;
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;
use tuition_board::board::{
    BoardSession, ClickAction, EligibilityState, InMemoryBoardApi, PostId, ViewerId,
};
use tuition_board::error::AppError;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    #[command(flatten)]
    pub(crate) filters: FilterArgs,
    /// Log in as the sample guardian instead of the sample tutor.
    #[arg(long)]
    pub(crate) as_guardian: bool,
    /// Skip the application portion of the demo.
    #[arg(long)]
    pub(crate) skip_apply: bool,
    /// Message attached to the demo application.
    #[arg(
        long,
        default_value = "I have three years of experience teaching this syllabus."
    )]
    pub(crate) message: String,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let api = Arc::new(seeded_backend());
    let identity = if args.as_guardian {
        DEMO_GUARDIAN
    } else {
        DEMO_TUTOR
    };

    let mut session = BoardSession::new(api.clone());
    session.load().await;
    session.set_criteria(args.filters.into_criteria());

    println!("== Browsing as a visitor ==");
    render_board(&session.view());

    let (auth_tx, auth_rx) = watch::channel(None);
    auth_tx.send_replace(Some(ViewerId::new(identity)));
    drop(auth_tx);
    session.follow_auth(auth_rx).await;

    println!("\n== Signed in as {identity} ({}) ==", session.viewer().role.label());
    render_board(&session.view());

    if args.skip_apply {
        return Ok(());
    }

    println!("\n== Applying ==");
    let Some(target) = first_applicable(&session) else {
        let blocked = session
            .visible_posts()
            .first()
            .map(|post| post.id.clone());
        match blocked.map(|post_id| session.click_apply(&post_id)) {
            Some(Ok(ClickAction::Blocked(notice))) | Some(Ok(ClickAction::PromptLogin(notice))) => {
                println!("{notice}");
            }
            _ => println!("No post on the board is open to this viewer."),
        }
        return Ok(());
    };

    let confirmation = session.apply(&target, &args.message).await?;
    println!("post {}: {}", confirmation.post_id, confirmation.message);

    match session.apply(&target, &args.message).await {
        Ok(_) => println!("post {target}: unexpectedly accepted a second application"),
        Err(err) => println!("post {target}: {}", err.user_message()),
    }

    println!("\nApplications recorded by the backend:");
    for application in api.applications() {
        println!(
            "- {} -> post {}: {}",
            application.applicant, application.post_id, application.message
        );
    }

    Ok(())
}

fn seeded_backend() -> InMemoryBoardApi {
    let api = InMemoryBoardApi::with_posts(demo_posts(Utc::now()));
    api.register_profile(ViewerId::new(DEMO_TUTOR), "tutor");
    api.register_profile(ViewerId::new(DEMO_GUARDIAN), "guardian");
    api
}

fn first_applicable(session: &BoardSession<InMemoryBoardApi>) -> Option<PostId> {
    session
        .visible_posts()
        .into_iter()
        .find(|post| {
            session
                .eligibility_for(&post.id)
                .is_some_and(|eligibility| eligibility.state == EligibilityState::Applicable)
        })
        .map(|post| post.id.clone())
}
