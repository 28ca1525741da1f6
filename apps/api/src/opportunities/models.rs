use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Research,
    Startup,
    Nonprofit,
    StudentOrg,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 4] = [
        Category::Research,
        Category::Startup,
        Category::Nonprofit,
        Category::StudentOrg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Research => "research",
            Category::Startup => "startup",
            Category::Nonprofit => "nonprofit",
            Category::StudentOrg => "student-org",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Research => "Research",
            Category::Startup => "Startups",
            Category::Nonprofit => "Nonprofits",
            Category::StudentOrg => "Student Organizations",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant {
                kind: "category",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Compensation {
    Paid,
    Stipend,
    AcademicCredit,
    Unpaid,
    Unspecified,
}

impl Compensation {
    pub const ALL: [Compensation; 5] = [
        Compensation::Paid,
        Compensation::Stipend,
        Compensation::AcademicCredit,
        Compensation::Unpaid,
        Compensation::Unspecified,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Compensation::Paid => "paid",
            Compensation::Stipend => "stipend",
            Compensation::AcademicCredit => "academic-credit",
            Compensation::Unpaid => "unpaid",
            Compensation::Unspecified => "unspecified",
        }
    }
}

impl FromStr for Compensation {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Compensation::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant {
                kind: "compensation",
                value: s.to_string(),
            })
    }
}

/// A single discoverable opportunity, normalized to one shape regardless of
/// which source produced it. Never mutated once a source hands it over.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub title: String,
    pub description: String,
    pub organization: String,
    pub category: Category,
    pub location: Option<String>,
    pub is_remote: bool,
    pub compensation: Compensation,
    pub requirements: Vec<String>,
    pub skills: Vec<String>,
    pub tags: Vec<String>,
    pub application_url: Option<String>,
    pub contact_email: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub source: String,
    pub estimated_hours: Option<u32>,
    pub duration: String,
}

impl Opportunity {
    /// Starts a record with the required fields; everything else is empty,
    /// on-site and `unspecified` until the builder methods say otherwise.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        organization: impl Into<String>,
        category: Category,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            organization: organization.into(),
            category,
            location: None,
            is_remote: false,
            compensation: Compensation::Unspecified,
            requirements: Vec::new(),
            skills: Vec::new(),
            tags: Vec::new(),
            application_url: None,
            contact_email: None,
            deadline: None,
            source: source.into(),
            estimated_hours: None,
            duration: String::new(),
        }
    }

    pub fn located(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn remote(mut self) -> Self {
        self.is_remote = true;
        self
    }

    pub fn compensated(mut self, compensation: Compensation) -> Self {
        self.compensation = compensation;
        self
    }

    pub fn requirements(mut self, items: &[&str]) -> Self {
        self.requirements = items.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn skills(mut self, items: &[&str]) -> Self {
        self.skills = items.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn tags(mut self, items: &[&str]) -> Self {
        self.tags = items.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn apply_at(mut self, url: impl Into<String>) -> Self {
        self.application_url = Some(url.into());
        self
    }

    pub fn contact(mut self, email: impl Into<String>) -> Self {
        self.contact_email = Some(email.into());
        self
    }

    pub fn deadline(mut self, deadline: Option<DateTime<Utc>>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn hours(mut self, hours: u32) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    pub fn lasting(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    /// Duplicate-detection key: `lowercase(title)-lowercase(organization)`.
    /// Location, category and deadline are deliberately not part of it.
    pub fn dedup_key(&self) -> String {
        format!(
            "{}-{}",
            self.title.to_lowercase(),
            self.organization.to_lowercase()
        )
    }

    /// Checks the fields every record must carry.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is empty".to_string());
        }
        if self.description.trim().is_empty() {
            return Err(format!("'{}' has an empty description", self.title));
        }
        if self.organization.trim().is_empty() {
            return Err(format!("'{}' has an empty organization", self.title));
        }
        if self.estimated_hours == Some(0) {
            return Err(format!("'{}' has zero estimated hours", self.title));
        }
        Ok(())
    }
}

/// Midnight UTC on the given date, or `None` for an impossible date.
pub fn deadline_on(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub name: Category,
    pub label: String,
    pub count: usize,
}
