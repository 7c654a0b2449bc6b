use clap::{arg, Parser, Subcommand};
use crep_server::shared::util::config;
use crep_server::shared::handlers::postgres_handler::PostgresHandler as SharedPostgresHandler;

#[derive(Parser)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new user
    Add {
        id: String,
        name: String,
        email: String,
        #[arg(value_parser = validate_password)]
        password: String,
        /// Group membership, repeat for several groups
        #[arg(long = "group")]
        groups: Vec<String>,
    },
    /// Delete a user
    Delete { id: String },
    /// Reset a user's password
    Password {
        id: String,
        #[arg(value_parser = validate_password)]
        password: String,
    },
    /// Replace a user's groups
    Groups {
        id: String,
        #[arg(long = "group")]
        groups: Vec<String>,
    },
}

fn validate_password(password: &str) -> Result<String, String> {
    let count = config::get_config().count;
    if password.len() < count.min_password_length || password.len() > count.max_password_length {
        return Err(format!("Password must be {} - {} characters (inclusive) in length",
            count.min_password_length, count.max_password_length));
    }
    Ok(password.to_string())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let postgres_handler = match SharedPostgresHandler::new().await {
        Ok(handler) => handler,
        Err(err) => { eprintln!("Error: {}", err); std::process::exit(1); }
    };
    if let Err(err) = postgres_handler.init().await {
        eprintln!("Error: could not prepare users table: {}", err);
        std::process::exit(1);
    }

    match &cli.command {
        Commands::Add { id, name, email, password, groups } => match postgres_handler.get_user(id).await {
            Ok(_) => println!("Error: User with id `{id}` and name `{name}` already exists"),
            Err(_) => match postgres_handler.create_account(id, name, email, password, groups).await {
                Ok(_) => println!("Successfully created account"),
                Err(err) => println!("db error: {}", err),
            },
        },
        Commands::Delete { id } => match postgres_handler.delete_account(id).await {
            Ok(_) => println!("Successfully deleted account"),
            Err(err) => println!("db error: {}", err),
        },
        Commands::Password { id, password } => match postgres_handler.get_user(id).await {
            Ok(_) => match postgres_handler.change_password(id, password).await {
                Ok(_) => println!("Successfully changed password"),
                Err(err) => println!("db error: {}", err),
            },
            Err(_) => println!("Error: User with id `{id}` does not exist"),
        },
        Commands::Groups { id, groups } => match postgres_handler.get_user(id).await {
            Ok(_) => match postgres_handler.set_groups(id, groups).await {
                Ok(_) => println!("Successfully updated groups"),
                Err(err) => println!("db error: {}", err),
            },
            Err(_) => println!("Error: User with id `{id}` does not exist"),
        },
    }
}
