use clap::{Parser, Subcommand};

use crate::{
    error::{DeskError, DeskResult},
    service::{GateDecision, PaymentOutcome},
    state::AppState,
    view::SubscriptionList,
};

#[derive(Parser, Debug)]
#[command(name = "creator-desk", version, about = "Sora Clean creator desk")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account
    Register {
        email: String,
        #[arg(long, env = "DESK_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        username: Option<String>,
    },
    /// Sign in and store the session credential
    Login {
        email: String,
        #[arg(long, env = "DESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Confirm an email address with the token from the verification mail
    Verify { token: String },
    /// Send the verification mail again
    Resend { email: String },
    /// Forget the stored credential
    Logout,
    /// Credits, packs, plans and subscriptions
    Dashboard,
    /// Buy a pack or plan by slug
    Buy { slug: String },
    /// Cancel a subscription by id
    Cancel { id: i64 },
    /// Recent uploads
    Generate {
        /// Number of pages to fetch
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    /// Start processing a video by URL
    Upload { url: String },
}

pub async fn run(cli: Cli, state: &AppState) -> DeskResult<()> {
    let services = &state.services;

    match cli.command {
        Command::Register {
            email,
            password,
            username,
        } => {
            let outcome = services.auth.register(&email, &password, username.as_deref()).await?;
            if outcome.verification_required {
                println!("Account created. Check {} for a verification link.", email);
            } else if outcome.signed_in {
                println!("Account created and signed in.");
            }
        }
        Command::Login { email, password } => match services.auth.login(&email, &password).await {
            Ok(outcome) if outcome.signed_in => println!("Signed in."),
            Ok(_) => println!("Check {} for a verification link before signing in.", email),
            Err(e) if e.can_resend_verification() => {
                eprintln!("Run `creator-desk resend {}` to get a new verification link.", email);
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        },
        Command::Verify { token } => {
            services.auth.verify_email(&token).await?;
            println!("Email verified. You can sign in now.");
        }
        Command::Resend { email } => {
            services.auth.resend_verification(&email).await?;
            println!("Verification email sent to {}.", email);
        }
        Command::Logout => {
            services.auth.logout()?;
            println!("Signed out.");
        }
        Command::Dashboard => {
            let view = state.dashboard();
            if view.activate() == GateDecision::Redirected {
                return Ok(());
            }
            view.settle().await;
            print!("{}", view.render().await);
        }
        Command::Buy { slug } => {
            if state.gate().check() == GateDecision::Redirected {
                return Ok(());
            }
            let outcome = state.dashboard().buy(&slug).await;
            if let Some(message) = services.payment.snapshot().await.message {
                println!("{}", message);
            }
            match outcome {
                PaymentOutcome::Redirected { url, transaction_id } => {
                    println!("Transaction {}: {}", transaction_id, url);
                }
                PaymentOutcome::Created { transaction_id } => println!("Transaction {}", transaction_id),
                PaymentOutcome::Skipped => {}
                PaymentOutcome::Failed(message) => return Err(DeskError::Surfaced(message)),
            }
        }
        Command::Cancel { id } => {
            if !services.subscriptions.is_enabled() {
                println!("Subscriptions are disabled.");
                return Ok(());
            }
            if state.gate().check() == GateDecision::Redirected {
                return Ok(());
            }
            state.dashboard().cancel(id).await;
            let subscriptions = services.subscriptions.snapshot().await;
            print!("{}", SubscriptionList(subscriptions.rows()));
            if let Some(message) = subscriptions.error {
                return Err(DeskError::Surfaced(message));
            }
        }
        Command::Generate { pages } => {
            let view = state.generate();
            if view.activate() == GateDecision::Redirected {
                return Ok(());
            }
            view.settle().await;
            for _ in 1..pages {
                if !view.load_more().await {
                    break;
                }
            }
            print!("{}", view.render().await);
        }
        Command::Upload { url } => {
            if state.gate().check() == GateDecision::Redirected {
                return Ok(());
            }
            let view = state.generate();
            let receipt = view.submit(&url).await?;
            debug!("Upload {} accepted", receipt.upload_id);
            print!("{}", view.render().await);
        }
    }

    Ok(())
}
