pub mod api_client;
mod commands;
pub mod error;
pub mod utils;

use std::io;
use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use miette::Result;

use crate::cli::api_client::ApiClient;
use crate::cli::commands::{PageParams, ensure_admin};

#[derive(Parser)]
#[command(name = "gyanrich")]
#[command(author, version, about = "Gyan Rich site backend and admin CLI", long_about = None)]
pub struct Cli {
    /// Override the API URL (default: GYANRICH_API_URL env or http://localhost:3000)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Admin password for protected commands (default: GYANRICH_ADMIN_PASSWORD env)
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Output format (table or json)
    #[arg(long, global = true, default_value = "table")]
    pub format: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    #[command(alias = "api")]
    Serve {
        /// Host address to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: IpAddr,
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
        /// Database file (default: GYANRICH_DB or ~/.local/share/gyanrich/gyanrich.db)
        #[arg(long)]
        db: Option<PathBuf>,
        /// Serve static site files from this directory (default: GYANRICH_PUBLIC_DIR)
        #[arg(long)]
        public_dir: Option<PathBuf>,
        /// Mark the session cookie Secure (default: GYANRICH_COOKIE_SECURE)
        #[arg(long)]
        cookie_secure: bool,
        /// Serve the OpenAPI UI at /docs
        #[arg(long)]
        docs: bool,
        /// Increase log verbosity (-v debug, -vv trace)
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbose: u8,
    },
    /// Admin account commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
    /// Blog post commands
    Blog {
        #[command(subcommand)]
        command: BlogCommands,
    },
    /// Contact form lead commands
    Lead {
        #[command(subcommand)]
        command: LeadCommands,
    },
    /// School registration commands
    School {
        #[command(subcommand)]
        command: SchoolCommands,
    },
    /// Voice agent commands
    Voice {
        #[command(subcommand)]
        command: VoiceCommands,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Print a hash for GYANRICH_ADMIN_PASSWORD_HASH (reads stdin when no password given)
    HashPassword { password: Option<String> },
    /// Check that the admin password is accepted
    Status,
}

#[derive(Args)]
struct PageArgs {
    #[arg(long)]
    limit: Option<u32>,
    #[arg(long)]
    offset: Option<u32>,
    /// Sort field (e.g. created_at, title)
    #[arg(long)]
    sort: Option<String>,
    /// Sort order (asc or desc)
    #[arg(long)]
    order: Option<String>,
}

impl PageArgs {
    fn params(&self) -> PageParams<'_> {
        PageParams {
            limit: self.limit,
            offset: self.offset,
            sort: self.sort.as_deref(),
            order: self.order.as_deref(),
        }
    }
}

#[derive(Subcommand)]
enum BlogCommands {
    /// List posts (published only unless --all)
    List {
        /// Include drafts (requires admin password)
        #[arg(long)]
        all: bool,
        #[arg(long)]
        category: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show a post
    Get { id: String },
    /// Create a post
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        excerpt: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        image: Option<String>,
        /// Publish immediately instead of saving a draft
        #[arg(long)]
        publish: bool,
    },
    /// Publish a draft
    Publish {
        id: String,
        /// Revert to draft instead
        #[arg(long)]
        undo: bool,
    },
    /// Delete a post
    Delete {
        id: String,
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum LeadCommands {
    /// List leads
    List {
        #[arg(long)]
        status: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Submit a lead as the contact form would
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        school_name: Option<String>,
        #[arg(long)]
        message: Option<String>,
    },
    /// Set a lead's status
    Status { id: String, status: String },
}

#[derive(Subcommand)]
enum SchoolCommands {
    /// List registered schools
    List {
        #[arg(long)]
        status: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Register a school
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        website: Option<String>,
    },
    /// Set a school's status
    Status { id: String, status: String },
}

#[derive(Subcommand)]
enum VoiceCommands {
    /// Print the agent's reply to a typed utterance (offline)
    Reply {
        text: String,
        /// Recognizer language code (en, hi); detected from the text when omitted
        #[arg(long)]
        language: Option<String>,
    },
    /// Hold a conversation over a recorded 8-bit mono WAV or raw PCM file
    Converse {
        input: PathBuf,
        /// Directory for reply audio
        #[arg(long, default_value = "replies")]
        out: PathBuf,
        /// Deepgram access token (default: DEEPGRAM_ACCESS_TOKEN)
        #[arg(long)]
        token: Option<String>,
        /// Deepgram API base URL
        #[arg(long)]
        deepgram_url: Option<String>,
        #[arg(long)]
        max_turns: Option<usize>,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let password = cli
        .password
        .or_else(|| std::env::var("GYANRICH_ADMIN_PASSWORD").ok());
    let password = password.as_deref();
    let format = cli.format.as_str();

    let Some(command) = cli.command else {
        // Show help when no command provided
        let _ = Cli::parse_from(["gyanrich", "--help"]);
        return Ok(());
    };

    let mut api_client = ApiClient::new(cli.api_url);
    let client = &mut api_client;

    let output = match command {
        Commands::Serve {
            host,
            port,
            db,
            public_dir,
            cookie_secure,
            docs,
            verbose,
        } => {
            return commands::serve::run(commands::serve::ServeOptions {
                host,
                port,
                db,
                public_dir,
                cookie_secure,
                verbosity: verbose,
                enable_docs: docs,
            })
            .await;
        }
        Commands::Admin { command } => match command {
            AdminCommands::HashPassword { password } => {
                commands::admin::hash_password(password, io::stdin().lock())?
            }
            AdminCommands::Status => {
                ensure_admin(client, password).await?;
                commands::admin::session_status(client).await?
            }
        },
        Commands::Blog { command } => match command {
            BlogCommands::List {
                all,
                category,
                page,
            } => {
                if all {
                    ensure_admin(client, password).await?;
                }
                commands::blog::list_posts(client, all, category.as_deref(), page.params(), format)
                    .await?
            }
            BlogCommands::Get { id } => {
                // Drafts are only visible to admins.
                if password.is_some() {
                    ensure_admin(client, password).await?;
                }
                commands::blog::get_post(client, &id, format).await?
            }
            BlogCommands::Create {
                title,
                excerpt,
                content,
                author,
                category,
                image,
                publish,
            } => {
                ensure_admin(client, password).await?;
                let request = commands::blog::CreatePostRequest {
                    title,
                    excerpt,
                    content,
                    author,
                    category,
                    published: publish,
                    image,
                };
                commands::blog::create_post(client, request).await?
            }
            BlogCommands::Publish { id, undo } => {
                ensure_admin(client, password).await?;
                commands::blog::set_published(client, &id, !undo).await?
            }
            BlogCommands::Delete { id, force } => {
                ensure_admin(client, password).await?;
                commands::blog::delete_post(client, &id, force).await?
            }
        },
        Commands::Lead { command } => match command {
            LeadCommands::List { status, page } => {
                ensure_admin(client, password).await?;
                commands::lead::list_leads(client, status.as_deref(), page.params(), format)
                    .await?
            }
            LeadCommands::Create {
                name,
                email,
                phone,
                school_name,
                message,
            } => {
                let request = commands::lead::CreateLeadRequest {
                    name,
                    email,
                    phone,
                    school_name,
                    message,
                };
                commands::lead::create_lead(client, request).await?
            }
            LeadCommands::Status { id, status } => {
                ensure_admin(client, password).await?;
                commands::lead::set_status(client, &id, &status).await?
            }
        },
        Commands::School { command } => match command {
            SchoolCommands::List { status, page } => {
                ensure_admin(client, password).await?;
                commands::school::list_schools(client, status.as_deref(), page.params(), format)
                    .await?
            }
            SchoolCommands::Create {
                name,
                email,
                phone,
                address,
                website,
            } => {
                let request = commands::school::CreateSchoolRequest {
                    name,
                    email,
                    phone,
                    address,
                    website,
                };
                commands::school::create_school(client, request).await?
            }
            SchoolCommands::Status { id, status } => {
                ensure_admin(client, password).await?;
                commands::school::set_status(client, &id, &status).await?
            }
        },
        Commands::Voice { command } => match command {
            VoiceCommands::Reply { text, language } => {
                commands::voice::reply(&text, language.as_deref(), format)?
            }
            VoiceCommands::Converse {
                input,
                out,
                token,
                deepgram_url,
                max_turns,
            } => {
                let options = commands::voice::ConverseOptions {
                    input: &input,
                    out_dir: &out,
                    token,
                    base_url: deepgram_url,
                    max_turns,
                };
                commands::voice::converse(options, format).await?
            }
        },
    };

    println!("{}", output);
    Ok(())
}

#[cfg(test)]
mod api_client_test;
