//! Tests for SqliteBlogPostRepository.

use crate::db::{
    BlogCategory, BlogPost, BlogPostQuery, BlogPostRepository, Database, DbError, PageSort,
    SortOrder, SqliteDatabase,
};

async fn setup_db() -> SqliteDatabase {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");
    db
}

fn make_post(title: &str, category: BlogCategory, published: bool) -> BlogPost {
    BlogPost {
        id: String::new(),
        title: title.to_string(),
        excerpt: format!("{title} excerpt"),
        content: format!("<p>{title} body</p>"),
        author: "Gyan Rich".to_string(),
        category,
        published,
        image: None,
        created_at: String::new(),
        updated_at: String::new(),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn blog_post_create_and_get() {
    let db = setup_db().await;
    let posts = db.blog_posts();

    let mut post = make_post("Choosing a stream", BlogCategory::Career, true);
    post.image = Some("/api/v1/images/1-abc123-cover.png".to_string());

    let created = posts.create(&post).await.expect("Create should succeed");
    assert_eq!(created.id.len(), 8);
    assert!(!created.created_at.is_empty());
    assert_eq!(created.created_at, created.updated_at);

    let retrieved = posts.get(&created.id).await.expect("Get should succeed");
    assert_eq!(retrieved, created);
    assert_eq!(retrieved.category, BlogCategory::Career);
    assert_eq!(retrieved.image.as_deref(), Some("/api/v1/images/1-abc123-cover.png"));
}

#[tokio::test(flavor = "multi_thread")]
async fn blog_post_get_nonexistent_returns_not_found() {
    let db = setup_db().await;

    let result = db.blog_posts().get("nonexist").await;
    assert!(matches!(result, Err(DbError::NotFound { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn blog_post_list_filters_by_published_and_category() {
    let db = setup_db().await;
    let posts = db.blog_posts();

    posts
        .create(&make_post("Draft", BlogCategory::Education, false))
        .await
        .unwrap();
    posts
        .create(&make_post("Live career", BlogCategory::Career, true))
        .await
        .unwrap();
    posts
        .create(&make_post("Live tips", BlogCategory::StudyTips, true))
        .await
        .unwrap();

    let all = posts.list(None).await.unwrap();
    assert_eq!(all.total, 3);

    let published = posts
        .list(Some(&BlogPostQuery {
            published: Some(true),
            ..Default::default()
        }))
        .await
        .unwrap();
    assert_eq!(published.total, 2);
    assert!(published.items.iter().all(|p| p.published));

    let tips = posts
        .list(Some(&BlogPostQuery {
            published: Some(true),
            category: Some(BlogCategory::StudyTips),
            ..Default::default()
        }))
        .await
        .unwrap();
    assert_eq!(tips.items.len(), 1);
    assert_eq!(tips.items[0].title, "Live tips");
}

#[tokio::test(flavor = "multi_thread")]
async fn blog_post_list_is_newest_first_and_paginates() {
    let db = setup_db().await;
    let posts = db.blog_posts();

    for title in ["one", "two", "three"] {
        posts
            .create(&make_post(title, BlogCategory::General, true))
            .await
            .unwrap();
    }

    let newest_first = posts.list(None).await.unwrap();
    let titles: Vec<_> = newest_first.items.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["three", "two", "one"]);

    let page = posts
        .list(Some(&BlogPostQuery {
            page: PageSort {
                limit: Some(1),
                offset: Some(1),
                sort_by: Some("title".to_string()),
                sort_order: Some(SortOrder::Asc),
            },
            ..Default::default()
        }))
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].title, "three");
}

#[tokio::test(flavor = "multi_thread")]
async fn blog_post_update_preserves_created_at() {
    let db = setup_db().await;
    let posts = db.blog_posts();

    let created = posts
        .create(&make_post("Original", BlogCategory::General, false))
        .await
        .unwrap();

    let mut changed = created.clone();
    changed.title = "Renamed".to_string();
    changed.published = true;
    changed.category = BlogCategory::Mentorship;

    let updated = posts.update(&changed).await.expect("Update should succeed");
    assert_eq!(updated.title, "Renamed");
    assert!(updated.published);
    assert_eq!(updated.category, BlogCategory::Mentorship);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test(flavor = "multi_thread")]
async fn blog_post_update_nonexistent_returns_not_found() {
    let db = setup_db().await;

    let mut ghost = make_post("Ghost", BlogCategory::General, false);
    ghost.id = "deadbeef".to_string();

    let result = db.blog_posts().update(&ghost).await;
    assert!(matches!(result, Err(DbError::NotFound { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn blog_post_delete_removes_from_list() {
    let db = setup_db().await;
    let posts = db.blog_posts();

    let created = posts
        .create(&make_post("Short lived", BlogCategory::General, true))
        .await
        .unwrap();
    assert_eq!(posts.list(None).await.unwrap().total, 1);

    posts.delete(&created.id).await.expect("Delete should succeed");
    assert_eq!(posts.list(None).await.unwrap().total, 0);

    let again = posts.delete(&created.id).await;
    assert!(matches!(again, Err(DbError::NotFound { .. })));
}
