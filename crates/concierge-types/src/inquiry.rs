//! Contact inquiry types for Concierge.
//!
//! An inquiry is what a visitor leaves through the contact form: who they
//! are, how to reach them, and which service they are interested in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// The service a visitor is asking about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectType {
    #[default]
    #[serde(rename = "AI Automation")]
    AiAutomation,
    #[serde(rename = "Marketing")]
    Marketing,
    #[serde(rename = "Ad Creatives")]
    AdCreatives,
    #[serde(rename = "App Dev")]
    AppDev,
    #[serde(rename = "Consulting")]
    Consulting,
    #[serde(rename = "Other")]
    Other,
}

impl ProjectType {
    /// Every project type, in the order the contact form lists them.
    pub const ALL: [ProjectType; 6] = [
        ProjectType::AiAutomation,
        ProjectType::Marketing,
        ProjectType::AdCreatives,
        ProjectType::AppDev,
        ProjectType::Consulting,
        ProjectType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::AiAutomation => "AI Automation",
            ProjectType::Marketing => "Marketing",
            ProjectType::AdCreatives => "Ad Creatives",
            ProjectType::AppDev => "App Dev",
            ProjectType::Consulting => "Consulting",
            ProjectType::Other => "Other",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = String;

    /// Accepts the display label ("App Dev") or a slug ("app-dev", "app_dev").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "aiautomation" => Ok(ProjectType::AiAutomation),
            "marketing" => Ok(ProjectType::Marketing),
            "adcreatives" => Ok(ProjectType::AdCreatives),
            "appdev" => Ok(ProjectType::AppDev),
            "consulting" => Ok(ProjectType::Consulting),
            "other" => Ok(ProjectType::Other),
            _ => Err(format!("invalid project type: '{s}'")),
        }
    }
}

/// A stored contact inquiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub project_type: ProjectType,
    pub created_at: DateTime<Utc>,
}

/// Contact form input before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewInquiry {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default)]
    pub project_type: ProjectType,
}
