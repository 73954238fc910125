table! {
    authors (author_id) {
        author_id -> Integer,
        author -> Text,
        author_url -> Nullable<Text>,
    }
}

table! {
    articles (article_id) {
        article_id -> Integer,
        author_id -> Integer,
        title -> Text,
        category -> Nullable<Text>,
        published_on -> Nullable<Date>,
        body -> Text,
    }
}

joinable!(articles -> authors (author_id));

allow_tables_to_appear_in_same_query!(
    articles,
    authors,
);
