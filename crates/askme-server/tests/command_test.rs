//! Administrative subcommands

mod common;

use rand::SeedableRng;
use rand::rngs::StdRng;

use askme_common::AskError;
use askme_persistence::{QuestionFilter, TagSort};
use askme_server::command::{GenerateCounts, create_superuser, generate_data};

#[tokio::test]
async fn test_create_superuser() {
    let state = common::app_state().await;
    let persistence = state.persistence();

    let user = create_superuser(persistence, "root", "change-me-now", None, 4)
        .await
        .unwrap();
    assert!(user.is_staff);

    let err = create_superuser(persistence, "root", "change-me-now", None, 4)
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AskError>(),
        Some(AskError::UserAlreadyExist(_))
    ));

    let err = create_superuser(persistence, "admin", "short", None, 4)
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AskError>(),
        Some(AskError::IllegalArgument(_))
    ));
}

#[tokio::test]
async fn test_generate_data_keeps_counters_consistent() {
    let state = common::app_state().await;
    let persistence = state.persistence();
    let mut rng = StdRng::seed_from_u64(42);

    let counts = GenerateCounts {
        users: 5,
        tags: 4,
        questions: 8,
        answers: 20,
        likes: 30,
    };
    let report = generate_data(persistence, counts, 4, &mut rng).await.unwrap();
    assert!(report.users > 0);
    assert_eq!(report.tags, 4);
    assert_eq!(report.questions, 8);
    assert_eq!(report.answers, 20);
    assert!(report.likes <= 30);

    let questions = persistence
        .question_find_page(QuestionFilter::default(), None, 1, 100)
        .await
        .unwrap();
    assert_eq!(questions.total_count, 8);

    let answer_total: i32 = questions.page_items.iter().map(|q| q.count_answers).sum();
    assert_eq!(answer_total, 20);

    let answers = persistence.answer_find_page(None, 1, 100).await.unwrap();
    let content_rating: i32 = questions.page_items.iter().map(|q| q.rating).sum::<i32>()
        + answers.page_items.iter().map(|a| a.rating).sum::<i32>();
    assert_eq!(content_rating, report.likes as i32);

    let users = persistence.user_find_page(1, 100).await.unwrap();
    let user_rating: i32 = users.page_items.iter().map(|u| u.rating).sum();
    assert_eq!(user_rating, report.likes as i32);

    let tag_rating: i32 = persistence
        .tag_top(TagSort::Rating, 100)
        .await
        .unwrap()
        .iter()
        .map(|t| t.rating)
        .sum();
    let tag_links: usize = questions.page_items.iter().map(|q| q.tags.len()).sum();
    assert_eq!(tag_rating as usize, tag_links);
}
