use chrono::NaiveDate;
use serde::Serialize;

use super::schema::*;

#[derive(Debug, Serialize, Queryable)]
pub struct Author {
    pub author_id: i32,
    pub author: String,
    pub author_url: Option<String>,
}

#[derive(Debug, Insertable)]
#[table_name = "authors"]
pub struct NewAuthor<'a> {
    pub author: &'a str,
    pub author_url: Option<&'a str>,
}

#[derive(Debug, Serialize, Queryable)]
pub struct Article {
    pub article_id: i32,
    pub author_id: i32,
    pub title: String,
    pub category: Option<String>,
    pub published_on: Option<NaiveDate>,
    pub body: String,
}

#[derive(Debug, Insertable)]
#[table_name = "articles"]
pub struct NewArticle<'a> {
    pub author_id: i32,
    pub title: &'a str,
    pub category: Option<&'a str>,
    pub published_on: Option<NaiveDate>,
    pub body: &'a str,
}

/// Everything needed to create an article, author included.
///
/// The author is resolved (and created when missing) during the write, so the
/// caller only knows the natural key, never an id.
#[derive(Debug, Clone)]
pub struct ArticleDraft {
    pub author: String,
    pub author_url: Option<String>,
    pub title: String,
    pub category: Option<String>,
    pub published_on: Option<NaiveDate>,
    pub body: String,
}

/// Replacement fields for an author and all of that author's articles.
#[derive(Debug, Clone)]
pub struct ArticleUpdate {
    pub author_id: i32,
    pub author: String,
    pub author_url: Option<String>,
    pub title: String,
    pub category: Option<String>,
    pub published_on: Option<NaiveDate>,
    pub body: String,
}
