use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WORD_LIMIT: u32 = 650;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EssayStatus {
    NotStarted,
    InProgress,
    Complete,
}

impl EssayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Complete => "complete",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "not_started" => Some(Self::NotStarted),
            "in_progress" => Some(Self::InProgress),
            "complete" => Some(Self::Complete),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NotStarted => "Not started",
            Self::InProgress => "In progress",
            Self::Complete => "Complete",
        }
    }

    /// Status implied by a draft's length: empty drafts are not started, drafts
    /// within the last 10% of the limit (and not over it) are complete.
    pub fn for_word_count(word_count: u32, word_limit: u32) -> Self {
        if word_count == 0 {
            return Self::NotStarted;
        }
        let threshold = (u64::from(word_limit) * 9).div_ceil(10);
        if u64::from(word_count) >= threshold && word_count <= word_limit {
            Self::Complete
        } else {
            Self::InProgress
        }
    }
}

pub fn count_words(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Essay {
    pub id: String,
    pub title: String,
    pub prompt: String,
    pub content: String,
    pub word_limit: u32,
    pub word_count: u32,
    pub status: EssayStatus,
    pub last_edited: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub college_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub college_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_doc_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Essay {
    pub fn is_general(&self) -> bool {
        self.college_id.is_none()
    }

    /// Recompute word count and derived status after the content or limit changed.
    pub fn refresh_counts(&mut self) {
        self.word_count = count_words(&self.content);
        self.status = EssayStatus::for_word_count(self.word_count, self.word_limit);
    }

    pub fn words_over_limit(&self) -> u32 {
        self.word_count.saturating_sub(self.word_limit)
    }

    pub fn reading_minutes(&self) -> u32 {
        self.word_count.div_ceil(200)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    Structure,
    Content,
    Tone,
    Grammar,
    Clarity,
    PromptAlignment,
}

impl SuggestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structure => "structure",
            Self::Content => "content",
            Self::Tone => "tone",
            Self::Grammar => "grammar",
            Self::Clarity => "clarity",
            Self::PromptAlignment => "prompt_alignment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionPriority {
    High,
    Medium,
    Low,
}

impl SuggestionPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

// The backend answers in snake_case while older clients cached camelCase,
// so both spellings are accepted on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EssaySuggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionType,
    pub priority: SuggestionPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, alias = "currentText", skip_serializing_if = "Option::is_none")]
    pub current_text: Option<String>,
    #[serde(default, alias = "suggestedText", skip_serializing_if = "Option::is_none")]
    pub suggested_text: Option<String>,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EssayAnalysis {
    pub id: String,
    #[serde(alias = "essayId")]
    pub essay_id: String,
    #[serde(alias = "overallScore")]
    pub overall_score: f64,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(alias = "structureScore")]
    pub structure_score: f64,
    #[serde(alias = "contentScore")]
    pub content_score: f64,
    #[serde(alias = "toneScore")]
    pub tone_score: f64,
    #[serde(alias = "promptAlignmentScore")]
    pub prompt_alignment_score: f64,
    #[serde(alias = "readabilityScore")]
    pub readability_score: f64,
    #[serde(alias = "wordCount")]
    pub word_count: u32,
    #[serde(default, alias = "targetWordCount", skip_serializing_if = "Option::is_none")]
    pub target_word_count: Option<u32>,
    #[serde(default)]
    pub suggestions: Vec<EssaySuggestion>,
    #[serde(alias = "createdAt")]
    pub created_at: String,
}

/// Request body of `POST /essays/analyze-text`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeEssayRequest {
    pub essay_text: String,
    pub prompt_text: Option<String>,
    pub target_word_count: Option<u32>,
    pub essay_id: Option<String>,
}

pub fn score_label(score: f64) -> &'static str {
    if score >= 8.0 {
        "Excellent"
    } else if score >= 6.0 {
        "Good"
    } else if score >= 4.0 {
        "Fair"
    } else {
        "Needs work"
    }
}

pub fn readability_label(flesch: f64) -> &'static str {
    if flesch >= 60.0 {
        "Easy to read"
    } else if flesch >= 30.0 {
        "Moderate difficulty"
    } else {
        "Difficult to read"
    }
}
