use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use learnhub::cli::{create_super_admin, set_user_role};
use learnhub::learnhub_auth::Role;
use learnhub::learnhub_config::DatabaseConfig;
use learnhub::learnhub_db::init_db_pool;

#[derive(Parser)]
#[command(name = "learnhub-cli")]
#[command(about = "LearnHub CLI - administrative tools for LearnHub", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a SUPER_ADMIN account
    CreateSuperAdmin {
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        #[arg(short = 'l', long)]
        last_name: Option<String>,

        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Assign a role to an existing user
    SetRole {
        #[arg(short = 'e', long)]
        email: String,

        /// One of USER, CEO, ADMIN, SUPER_ADMIN
        #[arg(short = 'r', long)]
        role: Role,
    },
}

fn prompt(label: &str, value: Option<String>) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Input::new()
            .with_prompt(label)
            .interact_text()
            .with_context(|| format!("Failed to read {}", label.to_lowercase())),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let database = DatabaseConfig::from_env()?;
    let pool = init_db_pool(&database)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::CreateSuperAdmin {
            first_name,
            last_name,
            email,
            password,
        } => {
            let first_name = prompt("First name", first_name)?;
            let last_name = prompt("Last name", last_name)?;
            let email = prompt("Email address", email)?;
            let password = match password {
                Some(password) => password,
                None => Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords don't match")
                    .interact()
                    .context("Failed to read password")?,
            };

            let id = create_super_admin(&pool, &first_name, &last_name, &email, &password).await?;
            println!("\n✅ Super admin created (id {})", id);
            println!("   Email: {}", email.to_lowercase());
            println!("   Name: {} {}", first_name, last_name);
        }
        Commands::SetRole { email, role } => {
            set_user_role(&pool, &email, role).await?;
            println!("✅ {} is now {}", email, role);
        }
    }

    Ok(())
}
