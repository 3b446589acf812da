//! CLI commands

use anyhow::{Context, Result, bail};
use clap::{Subcommand, ValueEnum};
use raiser_http::types::{RegisterRequest, Role, SubmissionStatus};
use raiser_session::pages::{
    AdminIssuesPage, DashboardPage, IssueStatus, MySubmissionsPage, ProblemPage, ProfilePage,
};
use raiser_session::{AuthConfig, AuthContext, TokenRefresher};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::render;

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account and sign in with it
    Register {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long, env = "RAISER_PASSWORD", hide_env_values = true)]
        password: String,

        /// Account role (server default is user)
        #[arg(long)]
        role: Option<RoleArg>,
    },

    /// Sign in with a username or email
    Login {
        /// Username or email
        #[arg(long)]
        username: String,

        #[arg(long, env = "RAISER_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out of this session
    Logout,

    /// Sign out of every session of this account
    LogoutAll,

    /// Show the signed-in user
    Whoami,

    /// Show local session state
    Status,

    /// Change the password of the signed-in account
    ChangePassword {
        #[arg(long, env = "RAISER_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
    },

    /// Check whether an email address is registered
    VerifyEmail {
        #[arg(long)]
        email: String,
    },

    /// List your submissions
    Submissions {
        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: u32,

        /// Only show submissions with this verdict
        #[arg(long)]
        status: Option<String>,
    },

    /// Show one problem with its sample test cases
    Problem {
        /// Problem id
        id: i64,
    },

    /// Overview of recent activity
    Dashboard,

    /// Show the profile of the signed-in user
    Profile,

    /// List reported problem issues
    Issues {
        #[arg(long)]
        status: Option<IssueStatusArg>,
    },

    /// Sign in and keep the access token fresh until interrupted
    Session {
        /// Username or email
        #[arg(long)]
        username: String,

        #[arg(long, env = "RAISER_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum RoleArg {
    User,
    ProblemSetter,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::User => Self::User,
            RoleArg::ProblemSetter => Self::ProblemSetter,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum IssueStatusArg {
    Open,
    InReview,
    Resolved,
}

impl From<IssueStatusArg> for IssueStatus {
    fn from(status: IssueStatusArg) -> Self {
        match status {
            IssueStatusArg::Open => Self::Open,
            IssueStatusArg::InReview => Self::InReview,
            IssueStatusArg::Resolved => Self::Resolved,
        }
    }
}

impl Commands {
    /// Whether the command runs until interrupted
    pub const fn is_long_running(&self) -> bool {
        matches!(self, Self::Session { .. })
    }

    pub async fn execute(self, context: AuthContext) -> Result<()> {
        context.initialize().await;

        match self {
            Self::Register {
                username,
                email,
                password,
                role,
            } => {
                let request = RegisterRequest {
                    username,
                    email,
                    password,
                    role: role.map(Role::from),
                };
                let user = context.register(request).await?;
                println!("Registered and signed in as {}", user.username);
                Ok(())
            }
            Self::Login { username, password } => {
                let user = context.login(&username, &password).await?;
                println!("Signed in as {}", user.username);
                Ok(())
            }
            Self::Logout => {
                context.logout().await?;
                println!("Signed out");
                Ok(())
            }
            Self::LogoutAll => {
                context.logout_all().await?;
                println!("Signed out of all sessions");
                Ok(())
            }
            Self::Whoami => {
                let user = context.user().context("Not signed in")?;
                render::user(&user);
                Ok(())
            }
            Self::Status => {
                status(&context);
                Ok(())
            }
            Self::ChangePassword { new_password } => {
                let mut page = ProfilePage::new(&context);
                page.load().await?;
                page.change_password(&new_password).await?;
                render::profile(&page.view());
                Ok(())
            }
            Self::VerifyEmail { email } => {
                let response = context.service().verify_email(&email).await?;
                println!("{}", response.message);
                Ok(())
            }
            Self::Submissions { page, status } => submissions(&context, page, status).await,
            Self::Problem { id } => {
                let mut page = ProblemPage::new(&context, id);
                let result = page.load().await;
                render::problem(&page.view());
                result.map_err(Into::into)
            }
            Self::Dashboard => {
                let mut page = DashboardPage::new(&context);
                let result = page.load().await;
                render::dashboard(&page.view());
                result.map_err(Into::into)
            }
            Self::Profile => {
                let mut page = ProfilePage::new(&context);
                let result = page.load().await;
                render::profile(&page.view());
                result.map_err(Into::into)
            }
            Self::Issues { status } => {
                let mut page = AdminIssuesPage::new();
                page.set_status_filter(status.map(IssueStatus::from));
                page.load();
                render::issues(&page.view());
                Ok(())
            }
            Self::Session { username, password } => {
                keep_alive(&context, &username, &password).await
            }
        }
    }
}

fn status(context: &AuthContext) {
    let service = context.service();
    let refresher = TokenRefresher::new(service.clone());

    if !service.is_authenticated() {
        println!("Not signed in");
        return;
    }

    match context.user() {
        Some(user) => println!("Signed in as {}", user.username),
        None => println!("Signed in"),
    }
    if let Some(expiry) = service.get_access_token_expiry() {
        println!("Access token expires at {expiry} (unix)");
    }
    if refresher.is_token_expiring_soon() {
        println!("Access token is about to expire; the next request refreshes it");
    }
}

async fn submissions(context: &AuthContext, page: u32, status: Option<String>) -> Result<()> {
    if page == 0 {
        bail!("Page numbers start at 1");
    }

    let mut listing = MySubmissionsPage::new(context);
    listing.set_status_filter(status.map(SubmissionStatus::from));

    let mut result = listing.load().await;
    // Walk forward until the requested page or the last one
    while result.is_ok() && listing.pagination().page() < page {
        match listing.next_page().await {
            Ok(true) => {}
            Ok(false) => {
                warn!(
                    requested = page,
                    last = listing.pagination().page(),
                    "Requested page is past the end"
                );
                break;
            }
            Err(err) => result = Err(err),
        }
    }

    render::submissions(&listing.view());
    result.map_err(Into::into)
}

async fn keep_alive(context: &AuthContext, username: &str, password: &str) -> Result<()> {
    let user = context.login(username, password).await?;
    println!("Signed in as {}; refreshing until interrupted", user.username);

    let cancel = CancellationToken::new();
    let refresher = TokenRefresher::new(context.service().clone());
    let mut task =
        refresher.spawn_refresh_task(AuthConfig::TOKEN_REFRESH_INTERVAL, cancel.clone());

    let interrupted = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            true
        }
        joined = &mut task => {
            joined.context("Refresh task failed")?;
            false
        }
    };

    if !interrupted {
        bail!("Session ended; sign in again");
    }

    info!("Interrupted, stopping refresh task");
    cancel.cancel();
    task.await.context("Refresh task failed")?;
    Ok(())
}
