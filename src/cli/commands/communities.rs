use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_success, output_value, preview};
use crate::cli::Context;
use crate::database::models::{Community, CommunityWithMembers};
use crate::handlers::protected::communities::MembershipResponse;

#[derive(Subcommand)]
pub enum CommunityCommands {
    #[command(about = "List communities with member counts")]
    List,

    #[command(about = "Create a community (you join it automatically)")]
    Create {
        #[arg(help = "Unique community name")]
        name: String,
        #[arg(long, help = "Short description")]
        description: Option<String>,
        #[arg(long, help = "Image URL or data URI")]
        image_url: Option<String>,
    },

    #[command(about = "Join a community")]
    Join {
        #[arg(help = "Community id")]
        id: i64,
    },

    #[command(about = "Leave a community")]
    Leave {
        #[arg(help = "Community id")]
        id: i64,
    },
}

pub async fn handle(cmd: CommunityCommands, ctx: &Context) -> anyhow::Result<()> {
    match cmd {
        CommunityCommands::List => {
            let communities: Vec<CommunityWithMembers> = ctx.client()?.get("api/communities").await?;
            let me = ctx.session.as_ref().map(|s| s.user.id);

            output_value(&ctx.output, &communities, |communities| {
                if communities.is_empty() {
                    println!("No communities yet");
                }
                for c in communities {
                    let joined = me.map_or(false, |id| c.members.iter().any(|m| m.id == id));
                    println!(
                        "#{:<4} {}{}  ({} member(s), created by {})",
                        c.community.id,
                        c.community.name,
                        if joined { " *" } else { "" },
                        c.member_count,
                        c.creator.name
                    );
                    if !c.community.description.is_empty() {
                        println!("      {}", preview(&c.community.description, 80));
                    }
                }
            })
        }
        CommunityCommands::Create {
            name,
            description,
            image_url,
        } => {
            let body = json!({ "name": name, "description": description, "imageUrl": image_url });
            let community: Community = ctx.authed_client()?.post("api/communities", &body).await?;
            output_success(
                &ctx.output,
                &format!("Created community #{} {}", community.id, community.name),
                Some(json!({ "community": community })),
            )
        }
        CommunityCommands::Join { id } => set_membership(ctx, id, true).await,
        CommunityCommands::Leave { id } => set_membership(ctx, id, false).await,
    }
}

async fn set_membership(ctx: &Context, id: i64, member: bool) -> anyhow::Result<()> {
    let response: MembershipResponse = ctx
        .authed_client()?
        .put(&format!("api/communities/{}/membership", id), &json!({ "member": member }))
        .await?;

    output_success(
        &ctx.output,
        &format!("{} ({} member(s))", response.message, response.member_count),
        Some(json!({ "member": response.member, "memberCount": response.member_count })),
    )
}
