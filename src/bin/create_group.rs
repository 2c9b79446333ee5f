use std::sync::Arc;

use pickem_app::domain::{
    GroupId, TournamentId,
    group::{Group, GroupRepository, GroupStatePatch},
};
use pickem_persistence_sea_orm::groups::GroupRepositoryImpl;

/// Seeds a competition group. Groups start closed; `--open` makes the new
/// group the active one through `set_state`, which demotes whatever was
/// active before.
#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let open = args.iter().any(|a| a == "--open");
    let positional: Vec<&String> = args
        .iter()
        .skip(1)
        .filter(|a| !a.starts_with("--"))
        .collect();
    let [tournament, name] = positional.as_slice() else {
        eprintln!("Usage: create_group <tournament-uuid> <name> [--open]");
        std::process::exit(1);
    };
    let tournament_id = uuid::Uuid::parse_str(tournament)
        .map(TournamentId)
        .expect("tournament id must be a UUID");

    let group = Group {
        group_id: GroupId::new(),
        tournament_id,
        name: name.to_string(),
        joinable: false,
        finished: false,
        created_at: chrono::Utc::now(),
    };
    let group_id = group.group_id;

    let groups = Arc::new(GroupRepositoryImpl::new().await);
    groups
        .insert_group(group)
        .await
        .expect("Failed to insert group");

    if open {
        groups
            .set_state(
                group_id,
                GroupStatePatch {
                    joinable: Some(true),
                    finished: None,
                },
            )
            .await
            .expect("Failed to open group");
    }

    println!("Created group {} (open: {})", group_id, open);
}
