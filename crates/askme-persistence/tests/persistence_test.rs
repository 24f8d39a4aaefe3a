//! Persistence tests against an in-memory SQLite database

use askme_common::{AskError, LikeTarget};
use askme_migration::{Migrator, MigratorTrait};
use askme_persistence::sea_orm::{ConnectOptions, Database};
use askme_persistence::{
    AnswerPersistence, ExternalDbPersistService, LikePersistence, NewQuestion, NewUser,
    PersistenceService, ProfileUpdate, QuestionFilter, QuestionPersistence, QuestionSort,
    QuestionUpdate, TagPersistence, TagSort, TokenPersistence, UserPersistence, UserSort,
};
use chrono::{Duration, Utc};

async fn setup() -> ExternalDbPersistService {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    ExternalDbPersistService::new(db)
}

async fn create_user(service: &ExternalDbPersistService, username: &str) -> i32 {
    service
        .user_create(NewUser {
            username: username.to_string(),
            email: Some(format!("{}@example.com", username)),
            password_hash: "$2b$04$hash".to_string(),
            is_staff: false,
        })
        .await
        .unwrap()
        .id
}

async fn create_question(
    service: &ExternalDbPersistService,
    author_id: i32,
    title: &str,
    tags: &[&str],
) -> i32 {
    service
        .question_create(
            author_id,
            NewQuestion {
                title: title.to_string(),
                long_text: format!("{} body", title),
                tags: tags.iter().map(|t| t.to_string()).collect(),
            },
        )
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_health_check() {
    let service = setup().await;
    assert!(service.health_check().await.is_ok());
}

#[tokio::test]
async fn test_duplicate_username_rejected() {
    let service = setup().await;
    create_user(&service, "alice").await;

    let err = service
        .user_create(NewUser {
            username: "alice".to_string(),
            password_hash: "x".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<AskError>(),
        Some(AskError::UserAlreadyExist(_))
    ));
    assert_eq!(service.user_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_profile_update() {
    let service = setup().await;
    let id = create_user(&service, "bob").await;

    let user = service
        .user_update_profile(
            id,
            ProfileUpdate {
                email: Some("new@example.com".to_string()),
                avatar: Some(Some("https://img.example.com/bob.png".to_string())),
            },
        )
        .await
        .unwrap();
    assert_eq!(user.email.as_deref(), Some("new@example.com"));
    assert!(user.avatar.is_some());

    let user = service
        .user_update_profile(
            id,
            ProfileUpdate {
                email: None,
                avatar: Some(None),
            },
        )
        .await
        .unwrap();
    assert_eq!(user.email.as_deref(), Some("new@example.com"));
    assert!(user.avatar.is_none());

    let err = service
        .user_update_profile(999, ProfileUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AskError>(),
        Some(AskError::UserNotExist(_))
    ));
}

#[tokio::test]
async fn test_tokens_expire_and_revoke() {
    let service = setup().await;
    let id = create_user(&service, "carol").await;
    let now = Utc::now();

    service
        .token_create(id, "live", now + Duration::hours(1))
        .await
        .unwrap();
    service
        .token_create(id, "stale", now - Duration::hours(1))
        .await
        .unwrap();

    assert!(service.token_find_valid("live", now).await.unwrap().is_some());
    assert!(service.token_find_valid("stale", now).await.unwrap().is_none());

    assert_eq!(service.token_purge_expired(now).await.unwrap(), 1);

    service
        .token_create(id, "second", now + Duration::hours(1))
        .await
        .unwrap();
    let mut revoked = service.token_delete_by_user(id).await.unwrap();
    revoked.sort();
    assert_eq!(revoked, vec!["live".to_string(), "second".to_string()]);
    assert!(!service.token_delete("live").await.unwrap());
}

#[tokio::test]
async fn test_question_tags_and_tag_rating() {
    let service = setup().await;
    let author = create_user(&service, "dave").await;

    let q1 = create_question(&service, author, "first", &["rust", "sql", "rust"]).await;
    create_question(&service, author, "second", &["rust"]).await;

    let question = service.question_find_by_id(q1).await.unwrap().unwrap();
    assert_eq!(question.tags, vec!["rust", "sql"]);
    assert_eq!(question.author, "dave");

    let rust = service.tag_find_by_name("rust").await.unwrap().unwrap();
    assert_eq!(rust.rating, 2);

    // attaching an existing link leaves the rating alone
    let tag = service.question_add_tag(q1, "rust").await.unwrap();
    assert_eq!(tag.rating, 2);

    service
        .question_update(
            q1,
            QuestionUpdate {
                tags: Some(vec!["async".to_string()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let rust = service.tag_find_by_name("rust").await.unwrap().unwrap();
    assert_eq!(rust.rating, 1);
    let sql = service.tag_find_by_name("sql").await.unwrap().unwrap();
    assert_eq!(sql.rating, 0);

    let top = service.tag_top(TagSort::Rating, 10).await.unwrap();
    assert_eq!(top[0].rating, 1);

    let tags = service.tag_find_by_question(q1).await.unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "async");
}

#[tokio::test]
async fn test_question_listing_filters_and_sorts() {
    let service = setup().await;
    let alice = create_user(&service, "alice").await;
    let bob = create_user(&service, "bob").await;

    let q1 = create_question(&service, alice, "one", &["rust"]).await;
    let q2 = create_question(&service, bob, "two", &["go"]).await;
    create_question(&service, bob, "three", &["rust"]).await;

    service
        .like_toggle(alice, LikeTarget::Question(q2))
        .await
        .unwrap();

    let page = service
        .question_find_page(
            QuestionFilter::default(),
            Some(QuestionSort::Rating),
            1,
            2,
        )
        .await
        .unwrap();
    assert_eq!(page.total_count, 3);
    assert_eq!(page.pages_available, 2);
    assert_eq!(page.page_items[0].id, q2);

    let rust = service.tag_find_by_name("rust").await.unwrap().unwrap();
    let page = service
        .question_find_page(
            QuestionFilter {
                tag_id: Some(rust.id),
                author_id: None,
            },
            None,
            1,
            20,
        )
        .await
        .unwrap();
    assert_eq!(page.total_count, 2);

    let page = service
        .question_find_page(
            QuestionFilter {
                tag_id: None,
                author_id: Some(alice),
            },
            None,
            1,
            20,
        )
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.page_items[0].id, q1);
}

#[tokio::test]
async fn test_answers_track_count() {
    let service = setup().await;
    let author = create_user(&service, "erin").await;
    let q = create_question(&service, author, "question", &[]).await;

    let a1 = service.answer_create(q, author, "first").await.unwrap();
    service.answer_create(q, author, "second").await.unwrap();

    let question = service.question_find_by_id(q).await.unwrap().unwrap();
    assert_eq!(question.count_answers, 2);

    let marked = service.answer_mark_right(a1.id).await.unwrap();
    assert!(marked.right_answer);

    let edited = service.answer_update_text(a1.id, "edited").await.unwrap();
    assert_eq!(edited.text, "edited");

    assert!(service.answer_delete(a1.id).await.unwrap());
    assert!(!service.answer_delete(a1.id).await.unwrap());

    let question = service.question_find_by_id(q).await.unwrap().unwrap();
    assert_eq!(question.count_answers, 1);

    let err = service.answer_create(999, author, "lost").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AskError>(),
        Some(AskError::QuestionNotExist(999))
    ));
}

#[tokio::test]
async fn test_like_toggle_moves_both_ratings() {
    let service = setup().await;
    let author = create_user(&service, "frank").await;
    let fan = create_user(&service, "grace").await;
    let q = create_question(&service, author, "likeable", &[]).await;
    let answer = service.answer_create(q, author, "answer").await.unwrap();

    let outcome = service
        .like_toggle(fan, LikeTarget::Question(q))
        .await
        .unwrap();
    assert!(outcome.liked);
    assert_eq!(outcome.rating, 1);

    service
        .like_toggle(fan, LikeTarget::Answer(answer.id))
        .await
        .unwrap();

    let user = service.user_find_by_id(author).await.unwrap().unwrap();
    assert_eq!(user.rating, 2);
    assert!(
        service
            .like_exists(fan, LikeTarget::Question(q))
            .await
            .unwrap()
    );

    let outcome = service
        .like_toggle(fan, LikeTarget::Question(q))
        .await
        .unwrap();
    assert!(!outcome.liked);
    assert_eq!(outcome.rating, 0);

    let user = service.user_find_by_id(author).await.unwrap().unwrap();
    assert_eq!(user.rating, 1);

    let top = service.user_top(UserSort::Rating, 1).await.unwrap();
    assert_eq!(top[0].id, author);

    let err = service
        .like_toggle(fan, LikeTarget::Answer(999))
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AskError>(),
        Some(AskError::AnswerNotExist(999))
    ));
}

#[tokio::test]
async fn test_concurrent_toggles_keep_counters_consistent() {
    let service = setup().await;
    let author = create_user(&service, "ivan").await;
    let fan = create_user(&service, "judy").await;
    let other = create_user(&service, "ken").await;
    let q = create_question(&service, author, "double click", &[]).await;

    service
        .like_toggle(other, LikeTarget::Question(q))
        .await
        .unwrap();

    let (first, second) = tokio::join!(
        service.like_toggle(fan, LikeTarget::Question(q)),
        service.like_toggle(fan, LikeTarget::Question(q)),
    );
    let (first, second) = (first.unwrap(), second.unwrap());
    assert_ne!(first.liked, second.liked);

    let question = service.question_find_by_id(q).await.unwrap().unwrap();
    assert_eq!(question.rating, 1);
    assert_eq!(first.rating.max(second.rating), 2);
    assert_eq!(first.rating.min(second.rating), 1);

    let user = service.user_find_by_id(author).await.unwrap().unwrap();
    assert_eq!(user.rating, 1);
    assert!(
        !service
            .like_exists(fan, LikeTarget::Question(q))
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_question_delete_cleans_up() {
    let service = setup().await;
    let author = create_user(&service, "heidi").await;
    let q = create_question(&service, author, "doomed", &["temp"]).await;
    service.answer_create(q, author, "reply").await.unwrap();
    service
        .like_toggle(author, LikeTarget::Question(q))
        .await
        .unwrap();

    assert!(service.question_delete(q).await.unwrap());
    assert!(service.question_find_by_id(q).await.unwrap().is_none());
    assert!(
        !service
            .like_exists(author, LikeTarget::Question(q))
            .await
            .unwrap()
    );

    let tag = service.tag_find_by_name("temp").await.unwrap().unwrap();
    assert_eq!(tag.rating, 0);

    let answers = service.answer_find_page(Some(q), 1, 20).await.unwrap();
    assert_eq!(answers.total_count, 0);
}

#[tokio::test]
async fn test_user_delete_refunds_given_likes() {
    let service = setup().await;
    let author = create_user(&service, "ivan").await;
    let fan = create_user(&service, "judy").await;
    let q = create_question(&service, author, "liked", &[]).await;
    create_question(&service, fan, "fan question", &["gone"]).await;

    service
        .like_toggle(fan, LikeTarget::Question(q))
        .await
        .unwrap();

    let expiry = Utc::now() + Duration::hours(1);
    service
        .token_create(fan, "fan-key", expiry)
        .await
        .unwrap();

    let revoked = service.user_delete(fan).await.unwrap();
    assert_eq!(revoked, Some(vec!["fan-key".to_string()]));
    assert!(service.user_find_by_id(fan).await.unwrap().is_none());
    assert!(
        service
            .token_find_valid("fan-key", Utc::now())
            .await
            .unwrap()
            .is_none()
    );

    let question = service.question_find_by_id(q).await.unwrap().unwrap();
    assert_eq!(question.rating, 0);
    let user = service.user_find_by_id(author).await.unwrap().unwrap();
    assert_eq!(user.rating, 0);

    let page = service
        .question_find_page(QuestionFilter::default(), None, 1, 20)
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);

    assert!(service.user_delete(fan).await.unwrap().is_none());
}

#[tokio::test]
async fn test_tag_create_conflict() {
    let service = setup().await;
    service.tag_create("rust").await.unwrap();

    let err = service.tag_create("rust").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AskError>(),
        Some(AskError::TagAlreadyExist(_))
    ));

    let page = service.tag_find_page(1, 20).await.unwrap();
    assert_eq!(page.total_count, 1);
}
