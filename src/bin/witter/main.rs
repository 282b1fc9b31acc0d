//! Command line front end: loads a CSV dataset into memory and answers one
//! query against it.
#![forbid(unsafe_code)]

mod config;
mod ui;

use std::error::Error;
use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand, ValueEnum};
use time::Date;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};
use witter::cli::{load_dataset, parse_date, parse_timestamp, DatasetPaths};
use witter::{Post, SocialStore, Timestamp, User, UserId, WitterError};

use config::{default_config_path, CliConfig};
use ui::Ui;

#[derive(Parser, Debug)]
#[command(
    name = "witter",
    version,
    about = "Query an in-memory social graph loaded from CSV files",
    disable_help_subcommand = true
)]
struct Cli {
    #[command(flatten)]
    data: DataArgs,

    #[arg(
        long,
        global = true,
        env = "WITTER_CONFIG",
        value_name = "FILE",
        help = "Config file (defaults to <config dir>/witter/config.toml)"
    )]
    config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Output format for query results"
    )]
    format: OutputFormat,

    #[arg(short, long, global = true, action = ArgAction::SetTrue, help = "Log debug events to stderr")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct DataArgs {
    #[arg(long, global = true, value_name = "FILE", help = "CSV of users (id,name,joined)")]
    users: Option<PathBuf>,

    #[arg(long, global = true, value_name = "FILE", help = "CSV of follows (follower,followed,at)")]
    follows: Option<PathBuf>,

    #[arg(long, global = true, value_name = "FILE", help = "CSV of weets (id,author,message,at)")]
    weets: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Show dataset counts and index occupancy")]
    Stats,
    #[command(about = "Show one user")]
    User {
        #[arg(allow_negative_numbers = true)]
        id: UserId,
    },
    #[command(about = "List users, most recently joined first")]
    Users {
        #[arg(long, value_name = "TEXT", help = "Only names containing TEXT (any case)")]
        containing: Option<String>,
        #[arg(long, value_name = "TIMESTAMP", value_parser = timestamp_arg, help = "Only users who joined before TIMESTAMP")]
        before: Option<Timestamp>,
    },
    #[command(about = "Followers of a user, most recent first")]
    Followers {
        #[arg(allow_negative_numbers = true)]
        id: UserId,
    },
    #[command(about = "Users a user follows, most recent first")]
    Following {
        #[arg(allow_negative_numbers = true)]
        id: UserId,
    },
    #[command(about = "Check whether A follows B")]
    IsFollowing {
        #[arg(allow_negative_numbers = true)]
        a: UserId,
        #[arg(allow_negative_numbers = true)]
        b: UserId,
    },
    #[command(about = "Users following both A and B")]
    MutualFollowers {
        #[arg(allow_negative_numbers = true)]
        a: UserId,
        #[arg(allow_negative_numbers = true)]
        b: UserId,
    },
    #[command(about = "Users followed by both A and B")]
    MutualFollowing {
        #[arg(allow_negative_numbers = true)]
        a: UserId,
        #[arg(allow_negative_numbers = true)]
        b: UserId,
    },
    #[command(about = "Users ranked by follower count")]
    TopUsers {
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },
    #[command(about = "Show one weet")]
    Weet {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
    #[command(about = "List weets, newest first")]
    Weets(WeetsCmd),
    #[command(about = "Most used hashtags")]
    Trending {
        #[arg(long, value_name = "N", help = "Number of tags (defaults to the configured limit)")]
        limit: Option<usize>,
    },
    #[command(about = "Print the config file location")]
    ConfigPath,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("filter").multiple(false)))]
struct WeetsCmd {
    #[arg(long, group = "filter", value_name = "ID", allow_negative_numbers = true)]
    author: Option<UserId>,
    #[arg(long, group = "filter", value_name = "TEXT", help = "Only messages containing TEXT (any case)")]
    containing: Option<String>,
    #[arg(long, group = "filter", value_name = "TIMESTAMP", value_parser = timestamp_arg)]
    before: Option<Timestamp>,
    #[arg(long, group = "filter", value_name = "DATE", value_parser = date_arg, help = "Only weets posted on DATE (UTC)")]
    on: Option<Date>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn timestamp_arg(value: &str) -> Result<Timestamp, String> {
    parse_timestamp(value).map_err(|err| err.to_string())
}

fn date_arg(value: &str) -> Result<Date, String> {
    parse_date(value).map_err(|err| err.to_string())
}

fn main() {
    let cli = Cli::parse();
    install_tracing_subscriber(cli.verbose);
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn install_tracing_subscriber(verbose: bool) {
    let fallback = if verbose { "witter=debug" } else { "witter=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Command::ConfigPath = cli.command {
        let path = cli.config.clone().or_else(default_config_path);
        match path {
            Some(path) => println!("{}", path.display()),
            None => return Err("no config directory available on this platform".into()),
        }
        return Ok(());
    }

    let config = CliConfig::load(cli.config.clone())?;
    debug!(path = ?config.path(), "cli.config.loaded");
    let paths = merge_paths(config.dataset(), &cli.data);
    if paths.is_empty() {
        return Err("no dataset given: pass --users, --follows or --weets, or set [dataset] in the config".into());
    }

    let mut store = SocialStore::open(config.store_options())?;
    let summary = load_dataset(&mut store, &paths)?;
    debug!(?summary, "cli.dataset.ready");

    let ui = Ui::new();
    let format = cli.format;
    match cli.command {
        Command::Stats => {
            let stats = store.stats();
            emit(format, &stats, || {
                ui.section(
                    "Dataset",
                    [
                        ("users", stats.users),
                        ("users in graph", stats.related_users),
                        ("follows", stats.follows),
                        ("weets", stats.posts),
                        ("authors", stats.authors),
                        ("tags", stats.tags),
                    ],
                );
                for (title, index) in [
                    ("Relationship index", stats.relation_index),
                    ("Author index", stats.content_index),
                ] {
                    ui.section(
                        title,
                        [
                            ("buckets", index.buckets),
                            ("occupied", index.occupied),
                            ("longest chain", index.longest_chain),
                            ("entries", index.entries),
                        ],
                    );
                }
            })?;
        }
        Command::User { id } => {
            let user = store.user(id).ok_or(WitterError::NotFound("user"))?;
            let followers = store.follower_count(id);
            let following = store.following_count(id);
            emit(format, &user, || print_user(&ui, &user, followers, following))?;
        }
        Command::Users { containing, before } => {
            let users = match (&containing, before) {
                (Some(query), Some(before)) => {
                    let mut users = store.users_containing(query);
                    users.retain(|user| user.joined < before);
                    users
                }
                (Some(query), None) => store.users_containing(query),
                (None, Some(before)) => store.users_joined_before(before),
                (None, None) => store.all_users(),
            };
            emit(format, &users, || {
                ui.list("Users", users.iter().map(describe_user));
            })?;
        }
        Command::Followers { id } => {
            let ids = store.followers(id);
            emit(format, &ids, || {
                ui.list(&format!("Followers of {id}"), ids.iter().map(i64::to_string));
            })?;
        }
        Command::Following { id } => {
            let ids = store.following(id);
            emit(format, &ids, || {
                ui.list(&format!("Followed by {id}"), ids.iter().map(i64::to_string));
            })?;
        }
        Command::IsFollowing { a, b } => {
            let yes = store.is_following(a, b);
            emit(format, &yes, || {
                let verb = if yes { "follows" } else { "does not follow" };
                ui.answer(yes, &format!("{a} {verb} {b}"));
            })?;
        }
        Command::MutualFollowers { a, b } => {
            let ids = store.mutual_followers(a, b);
            emit(format, &ids, || {
                ui.list(&format!("Following both {a} and {b}"), ids.iter().map(i64::to_string));
            })?;
        }
        Command::MutualFollowing { a, b } => {
            let ids = store.mutual_following(a, b);
            emit(format, &ids, || {
                ui.list(&format!("Followed by both {a} and {b}"), ids.iter().map(i64::to_string));
            })?;
        }
        Command::TopUsers { limit } => {
            let mut ranked = store.rank_by_follower_count();
            if let Some(limit) = limit {
                ranked.truncate(limit);
            }
            let rows: Vec<RankedUser> = ranked
                .into_iter()
                .map(|id| RankedUser {
                    id,
                    followers: store.follower_count(id),
                })
                .collect();
            emit(format, &rows, || {
                ui.list(
                    "Most followed",
                    rows.iter().enumerate().map(|(pos, row)| {
                        format!("{}. {} ({} followers)", pos + 1, row.id, row.followers)
                    }),
                );
            })?;
        }
        Command::Weet { id } => {
            let post = store.post(id).ok_or(WitterError::NotFound("weet"))?;
            emit(format, &post, || print_post(&ui, &post))?;
        }
        Command::Weets(cmd) => {
            let posts = if let Some(author) = cmd.author {
                store.posts_by_author(author)
            } else if let Some(query) = &cmd.containing {
                store.posts_containing(query)
            } else if let Some(before) = cmd.before {
                store.posts_before(before)
            } else if let Some(day) = cmd.on {
                store.posts_on(day)
            } else {
                store.posts()
            };
            emit(format, &posts, || {
                ui.list("Weets", posts.iter().map(describe_post));
            })?;
        }
        Command::Trending { limit } => {
            let limit = limit.unwrap_or(store.options().trending_limit);
            let tags = store.trending(limit);
            emit(format, &tags, || {
                ui.list(
                    "Trending",
                    tags.iter().map(|entry| format!("{} ({})", entry.tag, entry.count)),
                );
            })?;
        }
        Command::ConfigPath => {}
    }
    Ok(())
}

#[derive(Debug, serde::Serialize)]
struct RankedUser {
    id: UserId,
    followers: usize,
}

/// Command-line paths win over the config file, file by file.
fn merge_paths(from_config: DatasetPaths, args: &DataArgs) -> DatasetPaths {
    DatasetPaths {
        users: args.users.clone().or(from_config.users),
        follows: args.follows.clone().or(from_config.follows),
        weets: args.weets.clone().or(from_config.weets),
    }
}

fn emit<T, F>(format: OutputFormat, value: &T, printer: F) -> Result<(), Box<dyn Error>>
where
    T: serde::Serialize,
    F: FnOnce(),
{
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)?;
            println!("{json}");
        }
        OutputFormat::Text => printer(),
    }
    Ok(())
}

fn print_user(ui: &Ui, user: &User, followers: usize, following: usize) {
    ui.section(
        &format!("User {}", user.id),
        [
            ("name", user.name.clone()),
            ("joined", format_time(user.joined)),
            ("followers", followers.to_string()),
            ("following", following.to_string()),
        ],
    );
}

fn print_post(ui: &Ui, post: &Post) {
    ui.section(
        &format!("Weet {}", post.id),
        [
            ("author", post.author.to_string()),
            ("at", format_time(post.posted_at)),
            ("message", post.message.clone()),
        ],
    );
}

fn describe_user(user: &User) -> String {
    format!("{} {} (joined {})", user.id, user.name, format_time(user.joined))
}

fn describe_post(post: &Post) -> String {
    format!(
        "[{}] {} by {}: {}",
        format_time(post.posted_at),
        post.id,
        post.author,
        post.message
    )
}

fn format_time(at: Timestamp) -> String {
    at.format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| at.to_string())
}
