use actix::prelude::*;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt::{self, Display};

use super::executor::*;
use super::models::*;

#[derive(Debug)]
pub enum Error {
    Mailbox(MailboxError),
    Database(diesel::result::Error),
    NotFound(&'static str),
    Validation(&'static str),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Mailbox(e) => write!(f, "MailboxError: {}", e),
            Self::Database(e) => write!(f, "DatabaseError: {}", e),
            Self::NotFound(what) => write!(f, "{} not found", what),
            Self::Validation(field) => write!(f, "{} must not be blank", field),
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Database(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
            | Self::Database(DieselError::DatabaseError(
                DatabaseErrorKind::ForeignKeyViolation,
                _,
            )) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Mailbox(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        log::error!("{}", self);

        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}

fn required(field: &'static str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        Err(Error::Validation(field))
    } else {
        Ok(())
    }
}


/// Cloneable async facade over the [`Executor`] actor.
///
/// Multi-step writes are awaited sequences of single-query messages. There is
/// no transaction around them; each method documents what a partial failure
/// leaves behind.
#[derive(Clone)]
pub struct Helper {
    executor: Addr<Executor>,
}

impl Helper {
    pub fn new(executor: Addr<Executor>) -> Self {
        Helper { executor }
    }

    async fn send<M, T>(&mut self, msg: M) -> Result<T, Error>
    where
        M: Message<Result = diesel::QueryResult<T>> + Send + 'static,
        T: Send + 'static,
        Executor: Handler<M>,
    {
        match self.executor.send(msg).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(Error::Database(e)),
            Err(e) => Err(Error::Mailbox(e)),
        }
    }

    pub async fn ensure_schema(&mut self) -> Result<(), Error> {
        self.send(EnsureSchema).await
    }

    pub async fn upsert_author(
        &mut self,
        author: String,
        author_url: Option<String>,
    ) -> Result<(), Error> {
        self.send(UpsertAuthor { author, author_url }).await.map(|_| ())
    }

    pub async fn find_author_id(&mut self, author: String) -> Result<Option<i32>, Error> {
        self.send(FindAuthorId { author }).await
    }

    pub async fn insert_article(&mut self, article: InsertArticle) -> Result<(), Error> {
        self.send(article).await.map(|_| ())
    }

    /// Create an article, creating its author on the way when needed.
    ///
    /// Three sequential statements: author upsert (no-op on a known name),
    /// author id lookup, article insert. Not a transaction: failing after the
    /// upsert leaves the author row in place with no article, which is
    /// harmless since the upsert is idempotent.
    pub async fn create_article(&mut self, draft: ArticleDraft) -> Result<(), Error> {
        required("author", &draft.author)?;
        required("title", &draft.title)?;
        required("body", &draft.body)?;

        self.send(UpsertAuthor {
            author: draft.author.clone(),
            author_url: draft.author_url.clone(),
        })
        .await?;

        let author_id = self
            .send(FindAuthorId {
                author: draft.author.clone(),
            })
            .await?
            .ok_or(Error::NotFound("author"))?;

        self.send(InsertArticle {
            author_id,
            title: draft.title,
            category: draft.category,
            published_on: draft.published_on,
            body: draft.body,
        })
        .await
        .map(|_| ())
    }

    /// Update an author and the content of every article by that author.
    ///
    /// Two sequential writes scoped by `author_id`; the second one touches all
    /// of the author's articles. The author update is not rolled back if the
    /// article update fails.
    pub async fn update_articles(&mut self, update: ArticleUpdate) -> Result<(), Error> {
        required("author", &update.author)?;
        required("title", &update.title)?;
        required("body", &update.body)?;

        let matched = self
            .send(UpdateAuthor {
                author_id: update.author_id,
                author: update.author,
                author_url: update.author_url,
            })
            .await?;

        if matched == 0 {
            return Err(Error::NotFound("author"));
        }

        self.send(UpdateAuthorArticles {
            author_id: update.author_id,
            title: update.title,
            category: update.category,
            published_on: update.published_on,
            body: update.body,
        })
        .await
        .map(|_| ())
    }

    pub async fn list_articles(&mut self) -> Result<Vec<(Article, Author)>, Error> {
        self.send(ListArticles).await
    }

    pub async fn count_articles(&mut self) -> Result<i64, Error> {
        self.send(CountArticles).await
    }

    /// Deleting an id with no matching row is a success, not an error.
    pub async fn delete_article(&mut self, article_id: i32) -> Result<(), Error> {
        self.send(DeleteArticle(article_id)).await.map(|_| ())
    }

    pub async fn delete_all_articles(&mut self) -> Result<(), Error> {
        self.send(DeleteAllArticles).await.map(|_| ())
    }
}
