//! Command-line surface for `atelier-cli`.

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "atelier-cli", version, about = "Atelier content service CLI", long_about = None)]
pub struct Cli {
    /// Admin API base URL, e.g. <http://127.0.0.1:3001>
    #[arg(long, env = "ATELIER_SITE_URL")]
    pub site: Option<String>,

    /// Service account email
    #[arg(long, env = "ATELIER_ADMIN_EMAIL")]
    pub email: Option<String>,

    /// Service account password (env recommended to avoid shell history leaks)
    #[arg(hide = true, env = "ATELIER_ADMIN_PASSWORD")]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit a blog post
    Submit(SubmitCmd),
}

#[derive(Parser, Debug)]
pub struct SubmitCmd {
    /// Post title
    #[arg(long)]
    pub title: String,

    /// Short summary; falls back to the title when omitted
    #[arg(long)]
    pub excerpt: Option<String>,

    /// Markdown body
    #[arg(long, conflicts_with = "content_file")]
    pub content: Option<String>,

    /// Read the markdown body from a file
    #[arg(long, value_name = "PATH")]
    pub content_file: Option<PathBuf>,

    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,

    /// Author name; the studio default applies when omitted
    #[arg(long)]
    pub author: Option<String>,

    /// Publish flag; the server default applies when omitted
    #[arg(long)]
    pub published: Option<bool>,
}
