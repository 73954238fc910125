use actix_web::dev::HttpServiceFactory;
use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::appdata::AppData;
use crate::db::models::{Article, ArticleDraft, ArticleUpdate, Author};
use crate::extract::JsonOrForm;

pub fn service() -> impl HttpServiceFactory {
    web::scope("/articles")
        .route("", web::get().to(list))
        .route("", web::post().to(create))
        .route("", web::delete().to(delete_all))
        .route("/{id}", web::put().to(update))
        .route("/{id}", web::delete().to(delete_one))
}


/// One row of the list view: article columns flattened with the author's.
#[derive(Debug, Serialize)]
struct JoinedArticle<'a> {
    article_id: i32,
    author_id: i32,
    title: &'a str,
    category: Option<&'a str>,
    #[serde(rename = "publishedOn")]
    published_on: Option<NaiveDate>,
    body: &'a str,
    author: &'a str,
    #[serde(rename = "authorUrl", skip_serializing_if = "Option::is_none")]
    author_url: Option<&'a str>,
}

impl<'a> JoinedArticle<'a> {
    fn new((article, author): &'a (Article, Author)) -> Self {
        JoinedArticle {
            article_id: article.article_id,
            author_id: article.author_id,
            title: &article.title,
            category: article.category.as_deref(),
            published_on: article.published_on,
            body: &article.body,
            author: &author.author,
            author_url: author.author_url.as_deref(),
        }
    }
}

async fn list(data: web::Data<AppData>) -> actix_web::Result<HttpResponse> {
    let rows = data.db.clone().list_articles().await?;
    let joined: Vec<JoinedArticle> = rows.iter().map(JoinedArticle::new).collect();

    Ok(HttpResponse::Ok().json(joined))
}


// HTML forms submit optional fields as empty strings.
fn empty_as_none<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(de)?.filter(|s| !s.is_empty()))
}

fn date_or_empty<'de, D>(de: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(de)?.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Deserialize)]
struct CreateData {
    author: String,
    #[serde(default, rename = "authorUrl", deserialize_with = "empty_as_none")]
    author_url: Option<String>,
    title: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    category: Option<String>,
    #[serde(default, rename = "publishedOn", deserialize_with = "date_or_empty")]
    published_on: Option<NaiveDate>,
    body: String,
}

async fn create(
    data: web::Data<AppData>,
    payload: JsonOrForm<CreateData>,
) -> actix_web::Result<HttpResponse> {
    let form = payload.into_inner();
    let mut db = data.db.clone();

    db.create_article(ArticleDraft {
        author: form.author,
        author_url: form.author_url,
        title: form.title,
        category: form.category,
        published_on: form.published_on,
        body: form.body,
    })
    .await?;

    Ok(HttpResponse::Ok().body("insert complete"))
}


#[derive(Debug, Deserialize)]
struct UpdateData {
    author_id: i32,
    author: String,
    #[serde(default, rename = "authorUrl", deserialize_with = "empty_as_none")]
    author_url: Option<String>,
    title: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    category: Option<String>,
    #[serde(default, rename = "publishedOn", deserialize_with = "date_or_empty")]
    published_on: Option<NaiveDate>,
    body: String,
}

// The path id only names the route; the write is scoped by the body's
// author_id and covers every article by that author.
async fn update(
    data: web::Data<AppData>,
    _id: web::Path<i32>,
    payload: JsonOrForm<UpdateData>,
) -> actix_web::Result<HttpResponse> {
    let form = payload.into_inner();
    let mut db = data.db.clone();

    db.update_articles(ArticleUpdate {
        author_id: form.author_id,
        author: form.author,
        author_url: form.author_url,
        title: form.title,
        category: form.category,
        published_on: form.published_on,
        body: form.body,
    })
    .await?;

    Ok(HttpResponse::Ok().body("Update complete"))
}


async fn delete_one(
    data: web::Data<AppData>,
    path: web::Path<i32>,
) -> actix_web::Result<HttpResponse> {
    data.db.clone().delete_article(path.into_inner()).await?;

    Ok(HttpResponse::Ok().body("Delete complete"))
}

async fn delete_all(data: web::Data<AppData>) -> actix_web::Result<HttpResponse> {
    data.db.clone().delete_all_articles().await?;

    Ok(HttpResponse::Ok().body("Delete complete"))
}
