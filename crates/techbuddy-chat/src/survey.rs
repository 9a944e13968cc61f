//! Feedback survey pipeline.
//!
//! A fixed, strictly linear sequence:
//! Satisfaction -> Improvement -> Resolution -> (complete)
//! Each stage owns its prompt, its accepted answers and its successor.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stage of the feedback survey currently awaiting an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyKind {
    /// 1-5 rating of the service.
    Satisfaction,
    /// 1-4 choice of the area to improve.
    Improvement,
    /// yes/no on whether the issue was resolved.
    Resolution,
}

impl fmt::Display for SurveyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurveyKind::Satisfaction => write!(f, "satisfaction"),
            SurveyKind::Improvement => write!(f, "improvement"),
            SurveyKind::Resolution => write!(f, "resolution"),
        }
    }
}

impl SurveyKind {
    /// The question shown to the user for this stage.
    pub fn prompt(&self) -> &'static str {
        match self {
            SurveyKind::Satisfaction => "How satisfied are you with our service? (1-5)",
            SurveyKind::Improvement => {
                "What area should we improve? (Type the number)\n1. Response Time\n2. Answer Quality\n3. User Interface\n4. Other"
            }
            SurveyKind::Resolution => "Was your issue resolved? (yes/no)",
        }
    }

    /// Validate `input` against this stage's accepted set.
    ///
    /// Numeric stages require exact membership ("3" is accepted, " 3" and
    /// "03" are not). The yes/no stage is case-insensitive.
    pub fn parse_answer(&self, input: &str) -> Option<SurveyAnswer> {
        match self {
            SurveyKind::Satisfaction => match input {
                "1" | "2" | "3" | "4" | "5" => input.parse().ok().map(SurveyAnswer::Rating),
                _ => None,
            },
            SurveyKind::Improvement => match input {
                "1" => Some(SurveyAnswer::Area(ImprovementArea::ResponseTime)),
                "2" => Some(SurveyAnswer::Area(ImprovementArea::AnswerQuality)),
                "3" => Some(SurveyAnswer::Area(ImprovementArea::UserInterface)),
                "4" => Some(SurveyAnswer::Area(ImprovementArea::Other)),
                _ => None,
            },
            SurveyKind::Resolution => match input.to_lowercase().as_str() {
                "yes" => Some(SurveyAnswer::Resolved(true)),
                "no" => Some(SurveyAnswer::Resolved(false)),
                _ => None,
            },
        }
    }

    /// The stage that follows this one, or `None` when the survey is complete.
    pub fn next(&self) -> Option<SurveyKind> {
        match self {
            SurveyKind::Satisfaction => Some(SurveyKind::Improvement),
            SurveyKind::Improvement => Some(SurveyKind::Resolution),
            SurveyKind::Resolution => None,
        }
    }
}

/// Area the user asked us to improve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImprovementArea {
    ResponseTime,
    AnswerQuality,
    UserInterface,
    Other,
}

impl ImprovementArea {
    pub fn label(&self) -> &'static str {
        match self {
            ImprovementArea::ResponseTime => "Response Time",
            ImprovementArea::AnswerQuality => "Answer Quality",
            ImprovementArea::UserInterface => "User Interface",
            ImprovementArea::Other => "Other",
        }
    }
}

impl fmt::Display for ImprovementArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated survey answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyAnswer {
    Rating(u8),
    Area(ImprovementArea),
    Resolved(bool),
}

impl SurveyAnswer {
    /// Text thanking the user for this answer.
    pub fn acknowledgement(&self) -> String {
        match self {
            SurveyAnswer::Rating(_) => {
                "Thank you for your feedback! Would you like to share what we could improve?"
                    .to_string()
            }
            SurveyAnswer::Area(area) => {
                format!("Thank you for suggesting we improve our {}.", area)
            }
            SurveyAnswer::Resolved(_) => SURVEY_COMPLETE_MESSAGE.to_string(),
        }
    }
}

/// Closing text once the last stage is answered.
pub const SURVEY_COMPLETE_MESSAGE: &str =
    "Thank you for your feedback! Your input helps us improve our service.";
