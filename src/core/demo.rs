// demo data - a teacher, three students, two groups with some history
// every demo account logs in with password "demo"

use chrono::{Duration, Utc};
use tracing::info;

use super::classify::ResponseType;
use super::models::{
    MessageType, NewExchange, NewGroup, ROLE_STUDENT, ROLE_TEACHER, StudyGroup, User,
};
use super::store::Store;
use crate::Error;

pub const DEMO_PASSWORD: &str = "demo";

const MATH_MESSAGES: [&str; 7] = [
    "Welcome to our {group}! 🎉",
    "Hi everyone! Looking forward to studying together",
    "Can someone explain the chain rule?",
    "The chain rule is used for composite functions: d/dx[f(g(x))] = f'(g(x)) * g'(x)",
    "Thanks! That makes sense now",
    "Don't forget about the practice problems due Friday",
    "I created a study guide for the midterm - check the files section",
];

const CODING_MESSAGES: [&str; 6] = [
    "Let's build a full-stack app together!",
    "I'm working on the React frontend - anyone want to pair program?",
    "The backend is running smoothly",
    "Check out this cool animation I implemented",
    "Has anyone deployed to production before?",
    "We should add authentication next week",
];

const TUTOR_HISTORY: [(&str, &str); 3] = [
    (
        "Explain the fundamental theorem of calculus",
        "The fundamental theorem connects differentiation and integration...",
    ),
    (
        "What's the difference between derivatives and integrals?",
        "Derivatives measure instantaneous rate of change, while integrals...",
    ),
    (
        "Give me a real-world application of limits",
        "Limits are used in engineering for stability analysis...",
    ),
];

/// Throw away everything in the store and load the demo data set.
pub async fn seed(store: &Store) -> Result<(), Error> {
    store.clear().await?;

    let teacher = store
        .create_user("professor@university.edu", "Dr. Smith", ROLE_TEACHER, DEMO_PASSWORD)
        .await?;
    let alex = store
        .create_user("alex@student.edu", "Alex Johnson", ROLE_STUDENT, DEMO_PASSWORD)
        .await?;
    let sarah = store
        .create_user("sarah@student.edu", "Sarah Chen", ROLE_STUDENT, DEMO_PASSWORD)
        .await?;
    let mike = store
        .create_user("mike@student.edu", "Mike Rodriguez", ROLE_STUDENT, DEMO_PASSWORD)
        .await?;

    let math = store
        .create_group(
            NewGroup {
                name: "Advanced Calculus Study Group".to_string(),
                description: "Master derivatives, integrals, and limits together".to_string(),
                subject: "Mathematics".to_string(),
                is_public: true,
            },
            &teacher,
        )
        .await?;
    for member in [&alex, &sarah, &mike] {
        store.add_member(math.id, member.id).await?;
    }

    let coding = store
        .create_group(
            NewGroup {
                name: "Web Development Club".to_string(),
                description: "Learn React, backend services, and full-stack development"
                    .to_string(),
                subject: "Computer Science".to_string(),
                is_public: true,
            },
            &alex,
        )
        .await?;
    for member in [&sarah, &mike] {
        store.add_member(coding.id, member.id).await?;
    }

    // same speaking order in both groups
    let senders = [&teacher, &alex, &sarah, &mike, &alex, &teacher, &sarah];
    add_messages(store, &math, &MATH_MESSAGES, &senders).await?;
    add_messages(store, &coding, &CODING_MESSAGES, &senders).await?;

    let now = Utc::now();
    let days = TUTOR_HISTORY.len() as i64;
    for (i, (question, answer)) in TUTOR_HISTORY.iter().enumerate() {
        store
            .record_exchange(NewExchange {
                user_id: alex.id,
                group_id: Some(math.id),
                user_message: question.to_string(),
                context: math.subject.clone(),
                ai_response: answer.to_string(),
                response_type: ResponseType::Explanation,
                created_at: now - Duration::days(days - i as i64),
            })
            .await?;
    }

    info!(users = 4, groups = 2, "demo data created");
    Ok(())
}

// one message per hour, ending an hour ago
async fn add_messages(
    store: &Store,
    group: &StudyGroup,
    lines: &[&str],
    senders: &[&User],
) -> Result<(), Error> {
    let now = Utc::now();
    let count = lines.len() as i64;

    for (i, line) in lines.iter().enumerate() {
        let sender = senders[i % senders.len()];
        let content = line.replace("{group}", &group.name);
        let sent_at = now - Duration::hours(count - i as i64);

        store
            .add_message(group.id, sender.id, &content, MessageType::Text, sent_at)
            .await?;
    }

    Ok(())
}
