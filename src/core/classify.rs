// response classification - tags tutor answers so the ui can style them
// keyword heuristics only, first match wins

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum ResponseType {
    Explanation,
    Example,
    Hint,
    Question,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Explanation => "EXPLANATION",
            Self::Example => "EXAMPLE",
            Self::Hint => "HINT",
            Self::Question => "QUESTION",
        }
    }
}

impl std::fmt::Display for ResponseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify(text: Option<&str>) -> ResponseType {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return ResponseType::Explanation;
    };

    let lower = text.to_lowercase();

    // checked in order, earlier rows win
    let keywords = [
        (["example", "for instance"], ResponseType::Example),
        (["hint", "try thinking"], ResponseType::Hint),
    ];

    for (patterns, kind) in keywords {
        if patterns.iter().any(|p| lower.contains(p)) {
            return kind;
        }
    }

    if text.contains('?') && question_segments(text) > 2 {
        return ResponseType::Question;
    }

    ResponseType::Explanation
}

// pieces left after splitting on '?', trailing empty pieces dropped
// so "a? b?" counts 2 and "a? b? c" counts 3
fn question_segments(text: &str) -> usize {
    let mut segments: Vec<&str> = text.split('?').collect();
    while segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }
    segments.len()
}

