#![deny(clippy::all, clippy::pedantic)]

use std::fs;

use serde_json::json;

use crate::args::SubmitCmd;
use crate::client::{CliError, Ctx};

pub async fn handle(ctx: &Ctx, cmd: SubmitCmd) -> Result<(), CliError> {
    let body = build_body(cmd)?;

    let token = ctx.sign_in().await?;
    let post = ctx.create_post(&token, &body).await?;

    println!("Post created: {} ({})", post.id, post.title);
    Ok(())
}

/// Assemble the creation payload, preserving the submission script's
/// defaults: a missing excerpt falls back to the title, missing tags mean an
/// empty list.
pub fn build_body(cmd: SubmitCmd) -> Result<serde_json::Value, CliError> {
    let content = read_content(&cmd)?;
    if content.trim().is_empty() {
        return Err(CliError::InvalidInput(
            "content is required (use --content or --content-file)".into(),
        ));
    }

    let excerpt = match cmd.excerpt {
        Some(value) if !value.trim().is_empty() => value,
        _ => cmd.title.clone(),
    };

    let mut body = json!({
        "title": cmd.title,
        "excerpt": excerpt,
        "content_markdown": content,
        "tags": cmd.tags.unwrap_or_default(),
    });

    if let Some(author) = cmd.author {
        body["author"] = json!(author);
    }
    if let Some(published) = cmd.published {
        body["published"] = json!(published);
    }

    Ok(body)
}

fn read_content(cmd: &SubmitCmd) -> Result<String, CliError> {
    if let Some(path) = cmd.content_file.as_ref() {
        return fs::read_to_string(path).map_err(|source| CliError::InputFile {
            path: path.display().to_string(),
            source,
        });
    }

    Ok(cmd.content.clone().unwrap_or_default())
}
