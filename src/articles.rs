use chrono::Utc;
use sqlx::{Executor, QueryBuilder, Result, Sqlite};

use crate::model::{Article, ArticleFilter, CountByName, NewArticle, PagedResult, Statistics};
use crate::Pool;

const ARTICLE_COLUMNS: &str = r#"
        SELECT id,
               title,
               url,
               summary,
               content,
               source,
               category,
               author,
               publication_date,
               scraped_date,
               image_url
        FROM articles
        WHERE 1 = 1
"#;

/// Take the database write lock for the rest of the transaction, as `BEGIN IMMEDIATE` would.
/// Other writers are waited for up to the busy timeout.
#[tracing::instrument(skip(db), level = "debug")]
pub async fn lock_for_writing<'e, E>(db: E) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    // Deletes nothing, but a write statement is enough to hold the lock until commit
    sqlx::query("DELETE FROM articles WHERE 0").execute(db).await?;

    Ok(())
}

/// Tell if an article with exactly this url is already stored.
#[tracing::instrument(skip(db), level = "debug")]
pub async fn article_exists<'e, E>(db: E, url: &str) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles WHERE url = ?")
        .bind(url)
        .fetch_one(db)
        .await?;

    Ok(count > 0)
}

/// Insert an article and return its id. The scraped date is set here, once and for all.
#[tracing::instrument(skip(db, article), fields(url = %article.url), level = "debug")]
pub async fn insert_article<'e, E>(db: E, article: &NewArticle) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO articles (title, url, summary, content, source, category, author, publication_date, scraped_date, image_url)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&article.title)
    .bind(&article.url)
    .bind(&article.summary)
    .bind(&article.content)
    .bind(&article.source)
    .bind(&article.category)
    .bind(&article.author)
    .bind(article.publication_date)
    .bind(Utc::now())
    .bind(&article.image_url)
    .execute(db)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Return one article by its id
#[tracing::instrument(skip(db))]
pub async fn get_article(db: &Pool, id: i64) -> Result<Option<Article>> {
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(ARTICLE_COLUMNS);
    query.push(" AND id = ").push_bind(id);

    query.build_query_as().fetch_optional(db).await
}

/// Return a page of articles matching the filter, the most recently published first.
#[tracing::instrument(skip(db))]
pub async fn get_articles(
    db: &Pool,
    filter: &ArticleFilter,
    page_number: u64,
    page_size: u64,
) -> Result<PagedResult<Article>> {
    let page_number = page_number.max(1);

    let mut page_query: QueryBuilder<Sqlite> = QueryBuilder::new(ARTICLE_COLUMNS);
    add_filters(&mut page_query, filter);
    page_query.push(" ORDER BY publication_date DESC, id DESC");
    // Pages past the end are empty, however far they are
    let offset = (page_number - 1).saturating_mul(page_size);
    page_query.push(" LIMIT ");
    page_query.push_bind(i64::try_from(page_size).unwrap_or(i64::MAX));
    page_query.push(" OFFSET ");
    page_query.push_bind(i64::try_from(offset).unwrap_or(i64::MAX));

    let mut count_query: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT COUNT(*) FROM articles WHERE 1 = 1");
    add_filters(&mut count_query, filter);

    let content: Vec<Article> = page_query.build_query_as().fetch_all(db).await?;
    let total_items: i64 = count_query.build_query_scalar().fetch_one(db).await?;

    Ok(PagedResult::new(
        content,
        total_items as u64,
        page_size,
        page_number,
    ))
}

/// Free text search over title, summary and content. An empty query lists everything.
#[tracing::instrument(skip(db))]
pub async fn search_articles(
    db: &Pool,
    text: &str,
    page_number: u64,
    page_size: u64,
) -> Result<PagedResult<Article>> {
    let filter = ArticleFilter {
        text: Some(text.to_owned()),
        ..ArticleFilter::default()
    };

    get_articles(db, &filter, page_number, page_size).await
}

/// Count the articles, in total, by source and by category
#[tracing::instrument(skip(db))]
pub async fn get_statistics(db: &Pool) -> Result<Statistics> {
    let total_articles: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
        .fetch_one(db)
        .await?;

    Ok(Statistics {
        total_articles,
        sources: count_by(db, GroupBy::Source).await?,
        categories: count_by(db, GroupBy::Category).await?,
    })
}

#[derive(Debug, Clone, Copy)]
enum GroupBy {
    Source,
    Category,
}

impl GroupBy {
    fn column(&self) -> &'static str {
        match self {
            GroupBy::Source => "source",
            GroupBy::Category => "category",
        }
    }
}

async fn count_by(db: &Pool, group: GroupBy) -> Result<Vec<CountByName>> {
    let column = group.column();
    let query = format!(
        "SELECT {column} AS name, COUNT(*) AS count FROM articles GROUP BY {column} ORDER BY count DESC, name ASC"
    );

    sqlx::query_as(&query).fetch_all(db).await
}

fn add_filters(query: &mut QueryBuilder<Sqlite>, filter: &ArticleFilter) {
    if let Some(category) = non_blank(&filter.category) {
        query.push(" AND category LIKE ");
        query.push_bind(like_pattern(category));
        query.push(" ESCAPE '\\'");
    }

    if let Some(source) = non_blank(&filter.source) {
        query.push(" AND source LIKE ");
        query.push_bind(like_pattern(source));
        query.push(" ESCAPE '\\'");
    }

    if let Some(text) = non_blank(&filter.text) {
        let pattern = like_pattern(text);
        query.push(" AND (title LIKE ");
        query.push_bind(pattern.clone());
        query.push(" ESCAPE '\\' OR summary LIKE ");
        query.push_bind(pattern.clone());
        query.push(" ESCAPE '\\' OR content LIKE ");
        query.push_bind(pattern);
        query.push(" ESCAPE '\\')");
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Substring pattern for LIKE, with the wildcards of the value escaped.
///
/// SQLite's LIKE ignores case for ASCII letters only, other characters must match exactly.
fn like_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");

    format!("%{escaped}%")
}
