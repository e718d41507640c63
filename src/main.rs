//! Terminal driver for the myFlix client.
//!
//! Builds the [`AppContext`] once, guards the requested route, drives the
//! matching view model and prints it as plain text.
//!
//! # Configuration Order
//!
//! 1. Built-in defaults
//! 2. `--config <file>` (or `MYFLIX_CONFIG`)
//! 3. `MYFLIX_*` environment variables
//! 4. Command-line flags

#![allow(clippy::multiple_crate_versions)]

use clap::{Args, Parser, Subcommand};
use myflix::app::{account, CatalogView, FavoritesView, GenreView, MovieDetailView, ProfileView};
use myflix::infrastructure::{display_path, expand_tilde};
use myflix::observability::init_tracing;
use myflix::{
    AppContext, Config, Credentials, MovieRecord, MyflixError, Registration, Result, Route,
    UserPatch,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "myflix", version, about = "Browse the myFlix catalog and curate favorites")]
struct Cli {
    /// TOML config file.
    #[arg(long, global = true, env = "MYFLIX_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the myFlix API.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory for the session and log files.
    #[arg(long, global = true)]
    data_dir: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log level (`trace`, `debug`, `info`, `warn`, `error`).
    #[arg(long, global = true)]
    trace_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and remember the session.
    Login(LoginArgs),
    /// Forget the session.
    Logout,
    /// Create an account.
    Register(RegisterArgs),
    /// Show the logged-in user.
    Whoami,
    /// List the catalog.
    Movies {
        /// Only movies whose name contains this text.
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one movie.
    Movie { name: String },
    /// List genres with their movie counts.
    Genres,
    /// List favorite movies.
    Favorites,
    /// Add or remove a movie from the favorites.
    Toggle { name: String },
    /// Show or update the profile.
    Profile(ProfileArgs),
    /// Delete the account and log out.
    DeleteAccount {
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
struct LoginArgs {
    #[arg(long)]
    user: String,
    #[arg(long, env = "MYFLIX_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Args)]
struct RegisterArgs {
    #[arg(long)]
    user: String,
    #[arg(long, env = "MYFLIX_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    /// Birthday as `YYYY-MM-DD`.
    #[arg(long)]
    birthday: Option<String>,
}

#[derive(Args)]
struct ProfileArgs {
    #[arg(long)]
    user_name: Option<String>,
    #[arg(long)]
    password: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    birthday: Option<String>,
}

impl ProfileArgs {
    fn into_patch(self) -> UserPatch {
        UserPatch {
            user_name: self.user_name,
            password: self.password,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            birthday: self.birthday,
        }
    }
}

impl Command {
    /// The client route this command displays.
    fn route(&self) -> Route {
        match self {
            Self::Login(_) | Self::Logout | Self::Whoami => Route::Login,
            Self::Register(_) => Route::Registration,
            Self::Movies { .. } => Route::Movies,
            Self::Movie { name } | Self::Toggle { name } => Route::Movie(name.clone()),
            Self::Genres => Route::Genres,
            Self::Favorites => Route::Favorites,
            Self::Profile(_) | Self::DeleteAccount { .. } => Route::Profile,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(config, cli.command)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let base = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let mut config = base.apply_env();

    if let Some(api_url) = &cli.api_url {
        config.api_url.clone_from(api_url);
    }
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = expand_tilde(data_dir);
    }
    if let Some(timeout) = cli.timeout.filter(|secs| *secs > 0) {
        config.timeout_secs = timeout;
    }
    if cli.trace_level.is_some() {
        config.trace_level.clone_from(&cli.trace_level);
    }
    Ok(config)
}

async fn run(config: Config, command: Command) -> Result<()> {
    let ctx = AppContext::new(config)?;

    let requested = command.route();
    if requested.clone().guard(&ctx.session) != requested {
        return Err(MyflixError::Unauthenticated);
    }
    tracing::debug!(route = %requested, "running command");

    match command {
        Command::Login(args) => {
            let user = account::login(&ctx, &Credentials::new(args.user, args.password)).await?;
            println!("Logged in as {}", user.user_name);
        }
        Command::Logout => {
            account::logout(&ctx);
            println!("Logged out");
        }
        Command::Register(args) => {
            let registration = Registration {
                user_name: args.user,
                password: args.password,
                email: args.email,
                first_name: args.first_name,
                last_name: args.last_name,
                birthday: args.birthday,
            };
            let user = account::register(&ctx, &registration).await?;
            println!("Created account {}; log in to continue", user.user_name);
        }
        Command::Whoami => {
            match ctx.current_user() {
                Ok(user) => println!("{user}"),
                Err(_) => println!("not logged in"),
            }
            println!("session: {}", display_path(&ctx.config.session_path()));
        }
        Command::Movies { search } => {
            let mut view = CatalogView::new(&ctx)?;
            view.activate().await?;
            if let Some(term) = search {
                ctx.search.set_term(&term);
            }
            for movie in view.visible_movies() {
                let marker = if view.is_favorite(&movie.id) { '*' } else { ' ' };
                println!(
                    "{marker} {}  [{}]{}",
                    movie.name,
                    view.genre_name(&movie),
                    year_suffix(&movie)
                );
            }
        }
        Command::Movie { name } => {
            let mut view = MovieDetailView::new(&ctx, name)?;
            view.activate().await?;
            if let Some(movie) = view.movie() {
                println!("{}{}", movie.name, year_suffix(movie));
                println!("genre:    {}", view.genre_name().unwrap_or_default());
                println!("director: {}", view.director_name().unwrap_or("unknown"));
                println!("favorite: {}", if view.is_favorite() { "yes" } else { "no" });
                if !movie.description.is_empty() {
                    println!("\n{}", movie.description);
                }
            }
        }
        Command::Genres => {
            let mut view = GenreView::new(&ctx);
            view.activate().await?;
            for card in view.cards() {
                println!("{}  ({} movies)", card.genre.name, card.movie_count);
            }
        }
        Command::Favorites => {
            let mut view = FavoritesView::new(&ctx)?;
            view.activate().await?;
            if view.displayed().is_empty() {
                println!("no favorites yet");
            }
            for movie in view.displayed() {
                println!("{}{}", movie.name, year_suffix(movie));
            }
        }
        Command::Toggle { name } => {
            let mut view = MovieDetailView::new(&ctx, name.as_str())?;
            view.activate().await?;
            let now_favorite = view.toggle_favorite().await?;
            let verb = if now_favorite { "Added" } else { "Removed" };
            println!("{verb} {name}");
        }
        Command::Profile(args) => {
            let mut view = ProfileView::new(&ctx)?;
            let patch = args.into_patch();
            if patch.is_empty() {
                view.activate().await?;
            } else {
                view.update(&patch).await?;
                println!("Profile updated");
            }
            if let Some(user) = view.user() {
                println!("user:      {}", user.user_name);
                println!("email:     {}", user.email);
                println!("birthday:  {}", user.birthday.as_deref().unwrap_or("-"));
                println!("favorites: {}", user.favorite_movie_ids.len());
            }
        }
        Command::DeleteAccount { yes } => {
            if !yes {
                return Err(MyflixError::InvalidState(
                    "refusing to delete the account without --yes".to_string(),
                ));
            }
            let mut view = ProfileView::new(&ctx)?;
            view.delete_account().await?;
            println!("Account deleted");
        }
    }

    Ok(())
}

fn year_suffix(movie: &MovieRecord) -> String {
    movie
        .release_year()
        .map(|year| format!(" ({year})"))
        .unwrap_or_default()
}
