use rand::Rng;
use serde_json::json;

use bookshelf_core::library::CreateAuthor;

use crate::{services::Result, state::AppState};

/// Number of demo authors created by [`seed_demo_data`].
pub const DEMO_AUTHORS: usize = 10;
/// Number of demo books created by [`seed_demo_data`].
pub const DEMO_BOOKS: usize = 20;

/// Seeds demo authors, then demo books each linked to a random demo author.
///
/// Goes through the services so the data is validated and the caches are
/// invalidated exactly like for API writes.
pub async fn seed_demo_data(state: &AppState) -> Result<()> {
    let mut author_ids = Vec::with_capacity(DEMO_AUTHORS);
    for i in 1..=DEMO_AUTHORS {
        let author = state
            .authors
            .create(CreateAuthor {
                first_name: Some(format!("First name {i}")),
                last_name: Some(format!("Last name {i}")),
            })
            .await?;
        author_ids.push(author.id);
    }

    let picks: Vec<i64> = {
        let mut rng = rand::rng();
        (0..DEMO_BOOKS)
            .map(|_| author_ids[rng.random_range(0..author_ids.len())])
            .collect()
    };

    for (i, author_id) in picks.into_iter().enumerate() {
        let n = i + 1;
        state
            .books
            .create(json!({
                "title": format!("Book {n}"),
                "coverText": format!("Back cover text number {n}"),
                "author": author_id,
            }))
            .await?;
    }

    tracing::info!(
        authors = DEMO_AUTHORS,
        books = DEMO_BOOKS,
        "Seeded demo data"
    );
    Ok(())
}
