//! `todo-admin`: the todo administration client on the command line.
//!
//! Every command goes through the same [`AdminSystem`] the library exposes,
//! so notifications, the delete confirmation and the token file behave as
//! they would behind any other front-end.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use todo_admin::config::AppConfig;
use todo_admin::confirm::StdinPrompt;
use todo_admin::debounce::Debouncer;
use todo_admin::framework::{ConsoleNotifier, FileUpload};
use todo_admin::model::{
    day_name, long_date, today, DateFilter, LoginRequest, Priority, ProfileUpdate,
    SignupRequest, Todo, TodoDraft, TodoId, TodoQuery,
};
use todo_admin::runtime::{setup_tracing, AdminSystem};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, Instrument};

/// Todo admin CLI.
#[derive(Parser, Debug)]
#[command(name = "todo-admin", about = "Todo administration client")]
struct Cli {
    /// Path to the config file (default: ~/.todo-admin/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and store the access token.
    Login {
        email: String,
        #[arg(long)]
        password: String,
        /// Keep the session for 30 days instead of 1.
        #[arg(long)]
        remember: bool,
    },

    /// Forget the stored token.
    Logout,

    /// Create an account.
    Signup {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },

    /// Send a password reset link.
    ResetPassword { email: String },

    /// Show the signed-in user.
    Me,

    /// Update the signed-in user's profile. Omitted fields keep their values.
    Profile {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        contact_number: Option<String>,
        #[arg(long)]
        birthday: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        /// Image file to upload as the profile picture.
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Todo management.
    Todos {
        #[command(subcommand)]
        action: TodoAction,
    },

    /// Type search terms line by line and watch the list follow.
    Watch {
        /// Quiet period before a search is sent.
        #[arg(long, default_value_t = 300)]
        debounce_ms: u64,
        /// all, today, or a number of days such as 5d.
        #[arg(long, default_value = "all")]
        filter: DateFilter,
    },
}

#[derive(Subcommand, Debug)]
enum TodoAction {
    /// List todos.
    List {
        #[arg(long, default_value = "")]
        search: String,
        /// all, today, or a number of days such as 5d.
        #[arg(long, default_value = "all")]
        filter: DateFilter,
    },

    /// Create a todo.
    Create {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Due date, YYYY-MM-DD.
        #[arg(long, default_value = "")]
        date: String,
        /// extreme, moderate or low.
        #[arg(long, default_value = "")]
        priority: String,
    },

    /// Edit a todo. Omitted fields keep their values.
    Update {
        id: TodoId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        priority: Option<String>,
    },

    /// Delete a todo (asks first).
    Delete { id: TodoId },
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();
    let cli = Cli::parse();

    let config = AppConfig::resolve(cli.config.as_deref()).map_err(|e| e.to_string())?;
    info!(base_api = %config.base_api, "Configuration loaded");

    let system = AdminSystem::from_config(
        &config,
        Arc::new(ConsoleNotifier),
        Arc::new(StdinPrompt),
    )
    .map_err(|e| e.to_string())?;

    let span = tracing::info_span!("command");
    let result = run(&system, cli.command).instrument(span).await;

    // Failures were already shown by the notifier; shut down either way.
    system.shutdown().await?;
    result
}

async fn run(system: &AdminSystem, command: Commands) -> Result<(), String> {
    match command {
        Commands::Login {
            email,
            password,
            remember,
        } => {
            system
                .auth_client
                .login(&LoginRequest::new(email, password), remember)
                .await
                .map_err(|e| e.to_string())?;
        }
        Commands::Logout => {
            system.auth_client.logout().map_err(|e| e.to_string())?;
            println!("Logged out.");
        }
        Commands::Signup {
            first_name,
            last_name,
            email,
            password,
            confirm_password,
        } => {
            let request = SignupRequest {
                first_name,
                last_name,
                email,
                password,
                confirm_password,
            };
            system
                .auth_client
                .signup(&request)
                .await
                .map_err(|e| e.to_string())?;
        }
        Commands::ResetPassword { email } => {
            system
                .auth_client
                .reset_password(&email)
                .await
                .map_err(|e| e.to_string())?;
        }
        Commands::Me => match system.user_client.me().await.map_err(|e| e.to_string())? {
            Some(user) => {
                println!("{} <{}>", user.full_name(), user.email);
                for (label, value) in [
                    ("Address", &user.address),
                    ("Contact", &user.contact_number),
                    ("Birthday", &user.birthday),
                    ("Bio", &user.bio),
                ] {
                    if let Some(value) = value {
                        println!("  {label}: {value}");
                    }
                }
            }
            None => println!("Not logged in."),
        },
        Commands::Profile {
            first_name,
            last_name,
            email,
            address,
            contact_number,
            birthday,
            bio,
            image,
        } => {
            let user = system
                .user_client
                .me()
                .await
                .map_err(|e| e.to_string())?
                .ok_or_else(|| "Not logged in.".to_string())?;

            let mut update = ProfileUpdate::from_user(&user);
            for (field, value) in [
                (&mut update.first_name, first_name),
                (&mut update.last_name, last_name),
                (&mut update.email, email),
                (&mut update.address, address),
                (&mut update.contact_number, contact_number),
                (&mut update.birthday, birthday),
                (&mut update.bio, bio),
            ] {
                if let Some(value) = value {
                    *field = value;
                }
            }
            if let Some(path) = image {
                update.profile_image = Some(FileUpload::from_path(&path).map_err(|e| {
                    format!("cannot read {}: {e}", path.display())
                })?);
            }

            system
                .user_client
                .update_profile(&update)
                .await
                .map_err(|e| e.to_string())?;
        }
        Commands::Todos { action } => run_todos(system, action).await?,
        Commands::Watch {
            debounce_ms,
            filter,
        } => watch(system, Duration::from_millis(debounce_ms), filter).await?,
    }
    Ok(())
}

async fn run_todos(system: &AdminSystem, action: TodoAction) -> Result<(), String> {
    let todos = &system.todo_client;
    match action {
        TodoAction::List { search, filter } => {
            let list = todos
                .list(&TodoQuery::new(search, filter))
                .await
                .map_err(|e| e.to_string())?;
            print_list(filter, &list);
        }
        TodoAction::Create {
            title,
            description,
            date,
            priority,
        } => {
            let draft = TodoDraft {
                title,
                description,
                todo_date: date,
                priority: Priority::from(priority),
            };
            if let Some(todo) = todos.create(&draft).await.map_err(|e| e.to_string())? {
                print_todo(&todo);
            }
        }
        TodoAction::Update {
            id,
            title,
            description,
            date,
            priority,
        } => {
            let current = todos.find(id).await.map_err(|e| e.to_string())?;
            let mut draft = TodoDraft::from_todo(&current);
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(date) = date {
                draft.todo_date = date;
            }
            if let Some(priority) = priority {
                draft.priority = Priority::from(priority);
            }
            if let Some(todo) = todos.update(id, &draft).await.map_err(|e| e.to_string())? {
                print_todo(&todo);
            }
        }
        TodoAction::Delete { id } => {
            if !todos.delete(id).await.map_err(|e| e.to_string())? {
                println!("Kept todo {id}.");
            }
        }
    }
    Ok(())
}

/// Each stdin line becomes the search term; the list reprints once typing settles.
async fn watch(system: &AdminSystem, delay: Duration, filter: DateFilter) -> Result<(), String> {
    let (search, settled) = Debouncer::new(TodoQuery::new("", filter), delay);
    let feed = system.todo_feed(settled);
    let mut updates = feed.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Type to search, Ctrl-D to stop.");
    loop {
        tokio::select! {
            line = lines.next_line() => match line.map_err(|e| e.to_string())? {
                Some(line) => search.set(TodoQuery::new(line.trim(), filter)),
                None => break,
            },
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                if !state.loading {
                    println!("--- \"{}\"", state.query.search);
                    print_list(filter, &state.todos);
                }
            }
        }
    }

    // The feed holds a client clone; it must go before shutdown.
    drop(feed);
    drop(search);
    Ok(())
}

fn print_list(filter: DateFilter, todos: &[Todo]) {
    let date = today();
    println!("{} | {}, {}", filter.label(), day_name(date), long_date(date));
    if todos.is_empty() {
        println!("No todos found.");
    }
    for todo in todos {
        print_todo(todo);
    }
}

fn print_todo(todo: &Todo) {
    let done = if todo.is_completed { "x" } else { " " };
    let due = todo
        .due_label()
        .map(|label| format!(" (due {label})"))
        .unwrap_or_default();
    println!("[{done}] #{} {} [{}]{due}", todo.id, todo.title, todo.priority);
}
