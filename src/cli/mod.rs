use clap::{Parser, Subcommand};

use crate::auth::{hash_password, PgCredentialProvider, NOTES_USER};
use crate::config;
use crate::database::manager;

#[derive(Parser)]
#[command(name = "notes-admin")]
#[command(about = "Administration for the Simple Notes API database")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply pending schema migrations")]
    Migrate,

    #[command(about = "Create a user, or reset an existing user's password and roles")]
    AddUser {
        #[arg(help = "Login name; becomes the owner of the user's notes")]
        username: String,

        #[arg(long, help = "Plaintext password, stored as an Argon2id hash")]
        password: String,

        #[arg(long = "role", help = "Role to grant; repeatable", default_value = NOTES_USER)]
        roles: Vec<String>,
    },

    #[command(about = "Print an Argon2id hash for a password")]
    HashPassword {
        #[arg(help = "Plaintext password")]
        password: String,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Migrate => {
            let pool = manager::connect(&config::config().database).await?;
            manager::run_migrations(&pool).await?;
            println!("Migrations applied");
        }
        Commands::AddUser {
            username,
            password,
            roles,
        } => {
            let max_owner = config::config().notes.max_owner_length;
            if username.is_empty() || username.chars().count() > max_owner {
                anyhow::bail!("username must be 1 to {} characters", max_owner);
            }

            let pool = manager::connect(&config::config().database).await?;
            PgCredentialProvider::new(pool)
                .upsert_user(&username, &password, &roles)
                .await?;
            println!("User '{}' saved with roles {}", username, roles.join(", "));
        }
        Commands::HashPassword { password } => {
            println!("{}", hash_password(&password)?);
        }
    }

    Ok(())
}
