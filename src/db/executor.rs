use actix::prelude::*;
use chrono::NaiveDate;
use diesel::prelude::*;

use super::models::*;
use super::schema;

/// Owns the SQLite connection. Runs on a `SyncArbiter` with a single thread so
/// queries execute in mailbox order over one shared connection.
pub struct Executor {
    conn: SqliteConnection,
}

impl Executor {
    pub fn connect(connspec: &str) -> ConnectionResult<Self> {
        let conn = SqliteConnection::establish(connspec)?;

        // SQLite does not enforce foreign keys unless asked per connection.
        conn.execute("PRAGMA foreign_keys = ON")
            .map_err(diesel::result::ConnectionError::CouldntSetupConfiguration)?;

        Ok(Executor { conn })
    }

    fn ensure_schema(&self) -> QueryResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS authors (
                author_id INTEGER PRIMARY KEY AUTOINCREMENT,
                author TEXT NOT NULL UNIQUE,
                author_url TEXT
            )",
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS articles (
                article_id INTEGER PRIMARY KEY AUTOINCREMENT,
                author_id INTEGER NOT NULL REFERENCES authors (author_id),
                title TEXT NOT NULL,
                category TEXT,
                published_on DATE,
                body TEXT NOT NULL
            )",
        )?;

        Ok(())
    }

    fn upsert_author(&self, name: &str, url: Option<&str>) -> QueryResult<usize> {
        use schema::authors::dsl::*;

        diesel::insert_or_ignore_into(authors)
            .values(&NewAuthor {
                author: name,
                author_url: url,
            })
            .execute(&self.conn)
    }

    fn find_author_id(&self, name: &str) -> QueryResult<Option<i32>> {
        use schema::authors::dsl::*;

        authors
            .select(author_id)
            .filter(author.eq(name))
            .first(&self.conn)
            .optional()
    }

    fn insert_article(&self, article: &NewArticle) -> QueryResult<usize> {
        use schema::articles::dsl::*;

        diesel::insert_into(articles)
            .values(article)
            .execute(&self.conn)
    }

    fn list_articles(&self) -> QueryResult<Vec<(Article, Author)>> {
        use schema::{articles, authors};

        articles::table.inner_join(authors::table).load(&self.conn)
    }

    fn count_articles(&self) -> QueryResult<i64> {
        use schema::articles::dsl::*;

        articles.count().get_result(&self.conn)
    }

    fn update_author(&self, id: i32, name: &str, url: Option<&str>) -> QueryResult<usize> {
        use schema::authors::dsl::*;

        diesel::update(authors.filter(author_id.eq(id)))
            .set((author.eq(name), author_url.eq(url)))
            .execute(&self.conn)
    }

    fn update_author_articles(
        &self,
        id: i32,
        new_title: &str,
        new_category: Option<&str>,
        new_published_on: Option<NaiveDate>,
        new_body: &str,
    ) -> QueryResult<usize> {
        use schema::articles::dsl::*;

        diesel::update(articles.filter(author_id.eq(id)))
            .set((
                title.eq(new_title),
                category.eq(new_category),
                published_on.eq(new_published_on),
                body.eq(new_body),
            ))
            .execute(&self.conn)
    }

    fn delete_article(&self, id: i32) -> QueryResult<usize> {
        use schema::articles::dsl::*;

        diesel::delete(articles.find(id)).execute(&self.conn)
    }

    fn delete_all_articles(&self) -> QueryResult<usize> {
        use schema::articles::dsl::*;

        diesel::delete(articles).execute(&self.conn)
    }
}

impl Actor for Executor {
    type Context = SyncContext<Self>;
}


pub struct EnsureSchema;

impl Message for EnsureSchema {
    type Result = diesel::QueryResult<()>;
}

impl Handler<EnsureSchema> for Executor {
    type Result = <EnsureSchema as Message>::Result;

    fn handle(&mut self, _: EnsureSchema, _: &mut Self::Context) -> Self::Result {
        self.ensure_schema()
    }
}


pub struct UpsertAuthor {
    pub author: String,
    pub author_url: Option<String>,
}

impl Message for UpsertAuthor {
    type Result = diesel::QueryResult<usize>;
}

impl Handler<UpsertAuthor> for Executor {
    type Result = <UpsertAuthor as Message>::Result;

    fn handle(&mut self, msg: UpsertAuthor, _: &mut Self::Context) -> Self::Result {
        self.upsert_author(&msg.author, msg.author_url.as_deref())
    }
}


pub struct FindAuthorId {
    pub author: String,
}

impl Message for FindAuthorId {
    type Result = diesel::QueryResult<Option<i32>>;
}

impl Handler<FindAuthorId> for Executor {
    type Result = <FindAuthorId as Message>::Result;

    fn handle(&mut self, msg: FindAuthorId, _: &mut Self::Context) -> Self::Result {
        self.find_author_id(&msg.author)
    }
}


pub struct InsertArticle {
    pub author_id: i32,
    pub title: String,
    pub category: Option<String>,
    pub published_on: Option<NaiveDate>,
    pub body: String,
}

impl Message for InsertArticle {
    type Result = diesel::QueryResult<usize>;
}

impl Handler<InsertArticle> for Executor {
    type Result = <InsertArticle as Message>::Result;

    fn handle(&mut self, msg: InsertArticle, _: &mut Self::Context) -> Self::Result {
        self.insert_article(&NewArticle {
            author_id: msg.author_id,
            title: &msg.title,
            category: msg.category.as_deref(),
            published_on: msg.published_on,
            body: &msg.body,
        })
    }
}


pub struct ListArticles;

impl Message for ListArticles {
    type Result = diesel::QueryResult<Vec<(Article, Author)>>;
}

impl Handler<ListArticles> for Executor {
    type Result = <ListArticles as Message>::Result;

    fn handle(&mut self, _: ListArticles, _: &mut Self::Context) -> Self::Result {
        self.list_articles()
    }
}


pub struct CountArticles;

impl Message for CountArticles {
    type Result = diesel::QueryResult<i64>;
}

impl Handler<CountArticles> for Executor {
    type Result = <CountArticles as Message>::Result;

    fn handle(&mut self, _: CountArticles, _: &mut Self::Context) -> Self::Result {
        self.count_articles()
    }
}


pub struct UpdateAuthor {
    pub author_id: i32,
    pub author: String,
    pub author_url: Option<String>,
}

impl Message for UpdateAuthor {
    type Result = diesel::QueryResult<usize>;
}

impl Handler<UpdateAuthor> for Executor {
    type Result = <UpdateAuthor as Message>::Result;

    fn handle(&mut self, msg: UpdateAuthor, _: &mut Self::Context) -> Self::Result {
        self.update_author(msg.author_id, &msg.author, msg.author_url.as_deref())
    }
}


/// Rewrites the content fields of every article belonging to one author.
pub struct UpdateAuthorArticles {
    pub author_id: i32,
    pub title: String,
    pub category: Option<String>,
    pub published_on: Option<NaiveDate>,
    pub body: String,
}

impl Message for UpdateAuthorArticles {
    type Result = diesel::QueryResult<usize>;
}

impl Handler<UpdateAuthorArticles> for Executor {
    type Result = <UpdateAuthorArticles as Message>::Result;

    fn handle(&mut self, msg: UpdateAuthorArticles, _: &mut Self::Context) -> Self::Result {
        self.update_author_articles(
            msg.author_id,
            &msg.title,
            msg.category.as_deref(),
            msg.published_on,
            &msg.body,
        )
    }
}


pub struct DeleteArticle(pub i32);

impl Message for DeleteArticle {
    type Result = diesel::QueryResult<usize>;
}

impl Handler<DeleteArticle> for Executor {
    type Result = <DeleteArticle as Message>::Result;

    fn handle(&mut self, msg: DeleteArticle, _: &mut Self::Context) -> Self::Result {
        self.delete_article(msg.0)
    }
}


pub struct DeleteAllArticles;

impl Message for DeleteAllArticles {
    type Result = diesel::QueryResult<usize>;
}

impl Handler<DeleteAllArticles> for Executor {
    type Result = <DeleteAllArticles as Message>::Result;

    fn handle(&mut self, _: DeleteAllArticles, _: &mut Self::Context) -> Self::Result {
        self.delete_all_articles()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn executor() -> Executor {
        let exec = Executor::connect(":memory:").unwrap();
        exec.ensure_schema().unwrap();
        exec
    }

    fn authors_in(exec: &Executor) -> Vec<Author> {
        use schema::authors::dsl::*;

        authors.load(&exec.conn).unwrap()
    }

    fn add_article(exec: &Executor, name: &str, article_title: &str) -> i32 {
        exec.upsert_author(name, None).unwrap();
        let id = exec.find_author_id(name).unwrap().unwrap();
        exec.insert_article(&NewArticle {
            author_id: id,
            title: article_title,
            category: None,
            published_on: None,
            body: "body",
        })
        .unwrap();
        id
    }

    #[test]
    fn schema_creation_is_idempotent() {
        let exec = executor();
        add_article(&exec, "Ada Lovelace", "Notes on the engine");

        exec.ensure_schema().unwrap();

        assert_eq!(exec.count_articles().unwrap(), 1);
    }

    #[test]
    fn duplicate_author_insert_is_a_no_op() {
        let exec = executor();

        assert_eq!(exec.upsert_author("Ada Lovelace", Some("http://a")).unwrap(), 1);
        assert_eq!(exec.upsert_author("Ada Lovelace", Some("http://b")).unwrap(), 0);

        let rows = authors_in(&exec);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].author_url.as_deref(), Some("http://a"));
    }

    #[test]
    fn article_insert_requires_an_existing_author() {
        let exec = executor();

        let result = exec.insert_article(&NewArticle {
            author_id: 42,
            title: "Orphan",
            category: None,
            published_on: None,
            body: "body",
        });

        assert!(result.is_err());
        assert_eq!(exec.count_articles().unwrap(), 0);
    }

    #[test]
    fn repeated_creates_share_one_author_row() {
        let exec = executor();

        let first = add_article(&exec, "Ada Lovelace", "First");
        let second = add_article(&exec, "Ada Lovelace", "Second");

        assert_eq!(first, second);
        assert_eq!(exec.count_articles().unwrap(), 2);
        assert_eq!(authors_in(&exec).len(), 1);
    }

    #[test]
    fn list_joins_author_fields_and_round_trips_values() {
        let exec = executor();
        let published = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        exec.upsert_author("Ada Lovelace", Some("http://a")).unwrap();
        let id = exec.find_author_id("Ada Lovelace").unwrap().unwrap();
        exec.insert_article(&NewArticle {
            author_id: id,
            title: "Notes on the engine",
            category: Some("tech"),
            published_on: Some(published),
            body: "A body of text.",
        })
        .unwrap();

        let rows = exec.list_articles().unwrap();
        assert_eq!(rows.len(), 1);

        let (article, author) = &rows[0];
        assert_eq!(article.author_id, author.author_id);
        assert_eq!(article.title, "Notes on the engine");
        assert_eq!(article.category.as_deref(), Some("tech"));
        assert_eq!(article.published_on, Some(published));
        assert_eq!(article.body, "A body of text.");
        assert_eq!(author.author, "Ada Lovelace");
        assert_eq!(author.author_url.as_deref(), Some("http://a"));
    }

    #[test]
    fn update_touches_every_article_by_the_author() {
        let exec = executor();
        let ada = add_article(&exec, "Ada Lovelace", "First");
        add_article(&exec, "Ada Lovelace", "Second");
        add_article(&exec, "Grace Hopper", "Other");

        assert_eq!(exec.update_author(ada, "Ada L.", Some("http://l")).unwrap(), 1);
        assert_eq!(
            exec.update_author_articles(ada, "Revised", Some("news"), None, "new body")
                .unwrap(),
            2
        );

        for (article, author) in exec.list_articles().unwrap() {
            if article.author_id == ada {
                assert_eq!(article.title, "Revised");
                assert_eq!(article.body, "new body");
                assert_eq!(author.author, "Ada L.");
            } else {
                assert_eq!(article.title, "Other");
                assert_eq!(author.author, "Grace Hopper");
            }
        }
    }

    #[test]
    fn updating_a_missing_author_matches_zero_rows() {
        let exec = executor();

        assert_eq!(exec.update_author(99, "Nobody", None).unwrap(), 0);
    }

    #[test]
    fn deleting_a_missing_article_is_a_no_op() {
        let exec = executor();
        add_article(&exec, "Ada Lovelace", "Kept");

        assert_eq!(exec.delete_article(999).unwrap(), 0);
        assert_eq!(exec.count_articles().unwrap(), 1);
    }

    #[test]
    fn delete_all_preserves_authors() {
        let exec = executor();
        add_article(&exec, "Ada Lovelace", "First");
        add_article(&exec, "Grace Hopper", "Second");

        assert_eq!(exec.delete_all_articles().unwrap(), 2);
        assert_eq!(exec.count_articles().unwrap(), 0);
        assert_eq!(authors_in(&exec).len(), 2);
    }
}
