//! Initial data for a fresh installation

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{
    About, BusinessInfo, Contact, ROLE_ADMIN, Socials, Stat, TimelineItem, ValueItem, WorkingHours,
};
use crate::db::repository::{BusinessInfoRepository, RepoResult, UserRepository};

/// What a seed run changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOutcome {
    /// `false` when the admin existed and only its password was reset
    pub admin_created: bool,
    /// `false` when business info already existed and was left untouched
    pub info_created: bool,
}

/// Create or refresh the admin account and seed business info when absent
pub async fn seed(db: &Surreal<Db>, username: &str, password: &str) -> RepoResult<SeedOutcome> {
    let (_, admin_created) = UserRepository::new(db.clone())
        .ensure(username, password, ROLE_ADMIN)
        .await?;

    let info_repo = BusinessInfoRepository::new(db.clone());
    let info_created = match info_repo.get().await? {
        Some(_) => false,
        None => {
            info_repo.create(default_business_info()).await?;
            true
        }
    };

    tracing::info!(admin_created, info_created, "Seed finished");
    Ok(SeedOutcome {
        admin_created,
        info_created,
    })
}

fn stat(label: &str, value: f64) -> Stat {
    Stat {
        label: label.into(),
        value,
        suffix: "+".into(),
    }
}

fn hours(day: &str, time: &str) -> WorkingHours {
    WorkingHours {
        day: day.into(),
        is_open: !time.is_empty(),
        time: time.into(),
    }
}

fn value(icon: &str, label: &str) -> ValueItem {
    ValueItem {
        icon: icon.into(),
        label: label.into(),
    }
}

fn milestone(year: &str, title: &str, description: &str) -> TimelineItem {
    TimelineItem {
        year: year.into(),
        title: title.into(),
        description: description.into(),
    }
}

/// Placeholder business info shown until the admin edits it
pub fn default_business_info() -> BusinessInfo {
    BusinessInfo {
        id: None,
        stats: vec![
            stat("Years of Experience", 16.0),
            stat("Projects Completed", 450.0),
            stat("Happy Clients", 300.0),
        ],
        contact: Contact {
            phone: Some("+00 000 0000000".into()),
            email: Some("info@example.com".into()),
            address: Some("Industrial Area".into()),
            whatsapp: Some("+000000000000".into()),
            socials: Socials::default(),
        },
        working_hours: vec![
            hours("Monday", "9:00 AM - 6:00 PM"),
            hours("Tuesday", "9:00 AM - 6:00 PM"),
            hours("Wednesday", "9:00 AM - 6:00 PM"),
            hours("Thursday", "9:00 AM - 6:00 PM"),
            hours("Friday", "9:00 AM - 1:00 PM"),
            hours("Sunday", ""),
        ],
        about: About {
            years_experience: Some(16),
            projects_completed: Some(450),
            values: vec![
                value("Award", "Quality Certified"),
                value("Users", "Expert Team"),
                value("TrendingUp", "Modern Tech"),
                value("Clock", "On-time Delivery"),
            ],
            timeline: vec![
                milestone("2009", "Foundation", "Started as a small workshop."),
                milestone("2014", "Expansion", "Moved to a larger facility."),
                milestone("2019", "Modernization", "Imported new machinery."),
                milestone("2023", "Nationwide", "Serving clients across the country."),
            ],
            ..About::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_info_has_no_images() {
        let info = default_business_info();
        assert!(info.about.shop_images.is_empty());
        assert!(info.about.ceo_image.is_none());
        assert_eq!(info.about.story_title, "Our Story");
        assert!(!info.working_hours.last().unwrap().is_open);
    }
}
