use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::utils::{output_success, output_value, preview};
use crate::cli::Context;
use crate::database::models::{CommentWithAuthor, Post, PostDetail, PostSummary};

#[derive(Subcommand)]
pub enum PostCommands {
    #[command(about = "List the feed, newest first")]
    List {
        #[arg(long, help = "Only posts in this category")]
        category: Option<String>,
    },

    #[command(about = "Show one post with its comments")]
    Show {
        #[arg(help = "Post id")]
        id: i64,
    },

    #[command(about = "Publish a post")]
    Create {
        #[arg(help = "Title")]
        title: String,
        #[arg(help = "Body text")]
        content: String,
        #[arg(long, help = "Category, e.g. \"Student Life\"")]
        category: Option<String>,
        #[arg(long, help = "Image URL or data URI")]
        image_url: Option<String>,
    },

    #[command(about = "Delete one of your posts")]
    Delete {
        #[arg(help = "Post id")]
        id: i64,
    },

    #[command(about = "Comment on a post")]
    Comment {
        #[arg(help = "Post id")]
        id: i64,
        #[arg(help = "Comment text")]
        content: String,
    },
}

pub async fn handle(cmd: PostCommands, ctx: &Context) -> anyhow::Result<()> {
    match cmd {
        PostCommands::List { category } => {
            let mut posts: Vec<PostSummary> = ctx.client()?.get("api/posts").await?;
            if let Some(category) = category {
                posts.retain(|p| p.post.category.as_deref() == Some(category.as_str()));
            }

            output_value(&ctx.output, &posts, |posts| {
                if posts.is_empty() {
                    println!("No posts yet");
                }
                for p in posts {
                    println!(
                        "#{:<4} {}  by {}  [{}]  {} comment(s)",
                        p.post.id,
                        p.post.title,
                        p.author.name,
                        p.post.category.as_deref().unwrap_or("General"),
                        p.comments.len()
                    );
                }
            })
        }
        PostCommands::Show { id } => {
            let detail: PostDetail = ctx.client()?.get(&format!("api/posts/{}", id)).await?;
            output_value(&ctx.output, &detail, |d| {
                println!("{}", d.post.title);
                println!("by {} on {}", d.author.name, d.post.created_at.format("%Y-%m-%d %H:%M"));
                println!();
                println!("{}", d.post.content);
                if !d.comments.is_empty() {
                    println!();
                    println!("Comments:");
                    for c in &d.comments {
                        println!("  {}: {}", c.author.name, preview(&c.comment.content, 100));
                    }
                }
            })
        }
        PostCommands::Create {
            title,
            content,
            category,
            image_url,
        } => {
            let body = json!({
                "title": title,
                "content": content,
                "category": category,
                "imageUrl": image_url,
            });
            let post: Post = ctx.authed_client()?.post("api/posts", &body).await?;
            output_success(
                &ctx.output,
                &format!("Created post #{}", post.id),
                Some(json!({ "post": post })),
            )
        }
        PostCommands::Delete { id } => {
            let response: Value = ctx.authed_client()?.delete(&format!("api/posts/{}", id)).await?;
            let message = response["message"].as_str().unwrap_or("Post deleted");
            output_success(&ctx.output, message, Some(json!({ "id": id })))
        }
        PostCommands::Comment { id, content } => {
            let comment: CommentWithAuthor = ctx
                .authed_client()?
                .post(&format!("api/posts/{}/comments", id), &json!({ "content": content }))
                .await?;
            output_success(
                &ctx.output,
                &format!("Commented on post #{}", id),
                Some(json!({ "comment": comment })),
            )
        }
    }
}
