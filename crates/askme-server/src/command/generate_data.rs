//! Random demo content
//!
//! Everything goes through the persistence layer, so ratings and answer
//! counters match the generated likes and answers.

use rand::Rng;
use rand::seq::IndexedRandom;

use askme_auth::service::password;
use askme_common::{AskError, LikeTarget};
use askme_persistence::{NewQuestion, NewUser, PersistenceService};

const DEMO_PASSWORD: &str = "askme-demo-password";

const WORDS: &[&str] = &[
    "rust", "borrow", "lifetime", "trait", "async", "tokio", "thread", "memory", "vector",
    "string", "compile", "error", "macro", "closure", "iterator", "pattern", "module", "crate",
    "server", "query", "index", "cache", "socket", "buffer", "parser", "token", "stack", "heap",
];

const TAG_NAMES: &[&str] = &[
    "rust", "python", "sql", "linux", "docker", "git", "http", "json", "async", "testing",
    "networking", "security", "algorithms", "databases", "c++", "go", "wasm", "cli",
];

#[derive(Debug, Clone, Copy)]
pub struct GenerateCounts {
    pub users: u32,
    pub tags: u32,
    pub questions: u32,
    pub answers: u32,
    pub likes: u32,
}

/// What was actually created; duplicates are skipped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub users: u32,
    pub tags: u32,
    pub questions: u32,
    pub answers: u32,
    pub likes: u32,
}

fn sentence<R: Rng>(rng: &mut R, min_words: usize, max_words: usize) -> String {
    let count = rng.random_range(min_words..=max_words);
    let mut words: Vec<&str> = (0..count)
        .filter_map(|_| WORDS.choose(rng).copied())
        .collect();
    if words.is_empty() {
        words.push("question");
    }

    let mut text = words.join(" ");
    if let Some(first) = text.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    text
}

fn is_duplicate(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<AskError>(),
        Some(AskError::UserAlreadyExist(_)) | Some(AskError::TagAlreadyExist(_))
    )
}

pub async fn generate_data<R: Rng>(
    persistence: &dyn PersistenceService,
    counts: GenerateCounts,
    bcrypt_cost: u32,
    rng: &mut R,
) -> anyhow::Result<GenerateReport> {
    let mut report = GenerateReport::default();

    // One hash for every demo account keeps generation fast
    let password_hash = password::hash_password(DEMO_PASSWORD, bcrypt_cost)?;
    let mut user_ids = Vec::new();
    for _ in 0..counts.users {
        let username = format!("user_{:06}", rng.random_range(0..1_000_000));
        let new_user = NewUser {
            email: Some(format!("{}@example.com", username)),
            username,
            password_hash: password_hash.clone(),
            is_staff: false,
        };
        match persistence.user_create(new_user).await {
            Ok(user) => {
                user_ids.push(user.id);
                report.users += 1;
            }
            Err(e) if is_duplicate(&e) => continue,
            Err(e) => return Err(e),
        }
    }

    if user_ids.is_empty() {
        tracing::warn!("no users were created, skipping questions, answers and likes");
        return Ok(report);
    }

    let mut tag_names: Vec<String> = Vec::new();
    for i in 0..counts.tags {
        let name = match TAG_NAMES.get(i as usize) {
            Some(name) => name.to_string(),
            None => format!("topic{}", i),
        };
        match persistence.tag_create(&name).await {
            Ok(_) => report.tags += 1,
            Err(e) if is_duplicate(&e) => {}
            Err(e) => return Err(e),
        }
        tag_names.push(name);
    }

    let mut question_ids = Vec::new();
    for _ in 0..counts.questions {
        let Some(&author_id) = user_ids.choose(rng) else {
            break;
        };
        let tag_count = rng.random_range(0..=3.min(tag_names.len()));
        let tags: Vec<String> = tag_names
            .choose_multiple(rng, tag_count)
            .cloned()
            .collect();

        let question = persistence
            .question_create(
                author_id,
                NewQuestion {
                    title: format!("{}?", sentence(rng, 3, 8)),
                    long_text: (0..rng.random_range(1..=4))
                        .map(|_| format!("{}.", sentence(rng, 6, 16)))
                        .collect::<Vec<_>>()
                        .join(" "),
                    tags,
                },
            )
            .await?;
        question_ids.push(question.id);
        report.questions += 1;
    }

    let mut answer_ids = Vec::new();
    if !question_ids.is_empty() {
        for _ in 0..counts.answers {
            let (Some(&question_id), Some(&author_id)) =
                (question_ids.choose(rng), user_ids.choose(rng))
            else {
                break;
            };
            let text = format!("{}.", sentence(rng, 5, 20));
            let answer = persistence
                .answer_create(question_id, author_id, &text)
                .await?;
            answer_ids.push(answer.id);
            report.answers += 1;
        }
    }

    for _ in 0..counts.likes {
        let Some(&user_id) = user_ids.choose(rng) else {
            break;
        };
        let target = if rng.random_bool(0.5) {
            question_ids.choose(rng).map(|&id| LikeTarget::Question(id))
        } else {
            answer_ids.choose(rng).map(|&id| LikeTarget::Answer(id))
        };
        let Some(target) = target else {
            continue;
        };

        // Toggling an existing like would remove it
        if persistence.like_exists(user_id, target).await? {
            continue;
        }
        persistence.like_toggle(user_id, target).await?;
        report.likes += 1;
    }

    tracing::info!(
        users = report.users,
        tags = report.tags,
        questions = report.questions,
        answers = report.answers,
        likes = report.likes,
        "demo data generated"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_sentence_is_capitalized() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let text = sentence(&mut rng, 2, 6);
            assert!(!text.is_empty());
            assert!(text.chars().next().is_some_and(|c| c.is_ascii_uppercase()));
            assert!(text.split(' ').count() <= 6);
        }
    }
}
