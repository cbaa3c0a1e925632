//! `galaxy-admin`: command-line driver for the Galaxy customer admin
//! client.
//!
//! Each invocation plays the role of a page load: customer commands run
//! `check_auth` first and refuse to proceed without a valid session.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use galaxy_admin::auth::{AuthManager, AuthService, Credentials, SessionStore, UserDirectory};
use galaxy_admin::config::ApiConfig;
use galaxy_admin::customers::api::CustomerApi;
use galaxy_admin::customers::{Customer, CustomerDraft};

#[derive(Parser)]
#[command(
    name = "galaxy-admin",
    version,
    about = "Customer administration client for the Galaxy mock API"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and persist a session
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Keep the session across restarts (30-day lifetime instead of 24h)
        #[arg(long)]
        remember: bool,
    },
    /// Drop the current session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Manage customer records
    #[command(subcommand)]
    Customer(CustomerCommand),
}

#[derive(Subcommand)]
enum CustomerCommand {
    /// List all customers
    List,
    /// Show one customer
    Get { id: String },
    /// Create a customer
    Add(CustomerArgs),
    /// Update a customer; omitted fields keep their current value
    Edit {
        id: String,
        #[command(flatten)]
        patch: CustomerPatch,
    },
    /// Delete a customer
    Rm { id: String },
}

#[derive(Args)]
struct CustomerArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    lastname: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    user: String,
    #[arg(long)]
    password: String,
}

#[derive(Args)]
struct CustomerPatch {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    lastname: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    user: Option<String>,
    #[arg(long)]
    password: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = ApiConfig::from_env()
        .context("set GALAXY_API_TOKEN (mockapi.io project token) or GALAXY_API_URL")?;

    let store_path =
        SessionStore::default_db_path().context("could not determine a data directory")?;
    let store = SessionStore::open(&store_path)?;
    let service = AuthService::new(UserDirectory::new(config.clone())?);
    let mut manager = AuthManager::new(service, store);

    match cli.command {
        Command::Login { email, remember } => login(&mut manager, email, remember).await,
        Command::Logout => {
            manager.logout().await;
            println!("Signed out.");
            Ok(())
        }
        Command::Whoami => {
            manager.check_auth().await;
            match &manager.state().user {
                Some(user) => {
                    println!("{} {} <{}>", user.name, user.lastname, user.email);
                    Ok(())
                }
                None => bail!("not signed in"),
            }
        }
        Command::Customer(command) => {
            manager.check_auth().await;
            if !manager.is_authenticated() {
                bail!("not signed in; run `galaxy-admin login` first");
            }
            run_customer(command, &CustomerApi::new(config)?).await
        }
    }
}

async fn login(manager: &mut AuthManager, email: Option<String>, remember: bool) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => dialoguer::Input::new()
            .with_prompt("Email")
            .interact_text()?,
    };
    let password = dialoguer::Password::new()
        .with_prompt("Password")
        .interact()?;

    let credentials = Credentials {
        email,
        password,
        remember_me: remember,
    };
    manager.login(&credentials).await?;

    if let Some(user) = &manager.state().user {
        println!("Signed in as {} {} <{}>", user.name, user.lastname, user.email);
    }
    if !remember {
        println!("Session is scoped to this process; pass --remember to keep it.");
    }
    Ok(())
}

async fn run_customer(command: CustomerCommand, api: &CustomerApi) -> Result<()> {
    match command {
        CustomerCommand::List => {
            let customers = api.list().await?;
            for customer in &customers {
                print_row(customer);
            }
            println!("{} customer(s)", customers.len());
        }
        CustomerCommand::Get { id } => {
            let customer = api.get(&id).await?;
            print_row(&customer);
        }
        CustomerCommand::Add(args) => {
            let draft = CustomerDraft {
                name: args.name,
                lastname: args.lastname,
                email: args.email,
                phone: args.phone,
                user: args.user,
                password: args.password,
            }
            .validated()?;

            let created = api.create(&draft).await?;
            println!("Created customer {}", created.id);
        }
        CustomerCommand::Edit { id, patch } => {
            let current = api.get(&id).await?;
            let draft = CustomerDraft {
                name: patch.name.unwrap_or(current.name),
                lastname: patch.lastname.unwrap_or(current.lastname),
                email: patch.email.unwrap_or(current.email),
                phone: patch.phone.unwrap_or(current.phone),
                user: patch.user.unwrap_or(current.user),
                password: patch.password.unwrap_or(current.password),
            }
            .validated()?;

            let updated = api.update(&id, &draft).await?;
            println!("Updated customer {}", updated.id);
        }
        CustomerCommand::Rm { id } => {
            let deleted = api.delete(&id).await?;
            if deleted {
                println!("Deleted customer {id}");
            } else {
                bail!("customer {id} was not deleted");
            }
        }
    }
    Ok(())
}

fn print_row(customer: &Customer) {
    println!(
        "{:<6} {:<12} {:<14} {:<26} {}",
        customer.id, customer.name, customer.lastname, customer.email, customer.phone
    );
}
