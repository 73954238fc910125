use chrono::NaiveDate;
use serde::Deserialize;

use crate::db::{self, InsertArticle};

#[derive(Debug, Deserialize)]
pub struct SeedRecord {
    pub author: String,
    #[serde(default, rename = "authorUrl")]
    pub author_url: Option<String>,
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "publishedOn")]
    pub published_on: Option<NaiveDate>,
    pub body: String,
}

/// Load the fixture at `file` into the database.
///
/// Safe to run on every startup: author inserts are no-ops for known names,
/// and articles are only loaded while the article table is empty.
pub async fn run(db: &mut db::Helper, file: &str) -> std::io::Result<()> {
    let json = std::fs::read_to_string(file)?;
    let records =
        parse(&json).map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    apply(db, &records)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
}

fn parse(json: &str) -> serde_json::Result<Vec<SeedRecord>> {
    serde_json::from_str(json)
}

/// Authors first, articles second: the article pass resolves each record's
/// author by name and needs the rows from the first pass committed.
async fn apply(db: &mut db::Helper, records: &[SeedRecord]) -> Result<(), db::Error> {
    load_authors(db, records).await?;
    load_articles(db, records).await
}

async fn load_authors(db: &mut db::Helper, records: &[SeedRecord]) -> Result<(), db::Error> {
    for record in records {
        db.upsert_author(record.author.clone(), record.author_url.clone())
            .await?;
    }

    Ok(())
}

async fn load_articles(db: &mut db::Helper, records: &[SeedRecord]) -> Result<(), db::Error> {
    if db.count_articles().await? > 0 {
        log::debug!("Articles already present, not seeding");
        return Ok(());
    }

    let mut seeded = 0;
    for record in records {
        match db.find_author_id(record.author.clone()).await? {
            Some(author_id) => {
                db.insert_article(InsertArticle {
                    author_id,
                    title: record.title.clone(),
                    category: record.category.clone(),
                    published_on: record.published_on,
                    body: record.body.clone(),
                })
                .await?;

                seeded += 1;
            }
            None => log::warn!(
                "No author {:?} for seed article {:?}",
                record.author,
                record.title
            ),
        }
    }

    log::info!("Seeded {} articles", seeded);

    Ok(())
}
