//! Assembly of the public portfolio from the seven content tables.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::repository::{
    Achievement, AchievementRow, Education, EducationRow, Experience, ExperienceRow, Profile,
    ProfileRow, Project, ProjectRow, Repository, Skill, SkillRow, SocialLinks, SocialLinksRow,
    Table, store,
};

/// Message shown to visitors whenever any part of the content cannot be loaded.
pub const LOAD_FAILED: &str = "Failed to load portfolio data";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Read(#[from] store::Error),
    #[error("`{0}` has no row")]
    Missing(Table),
}

/// Everything the public view renders. Built only when every table was read successfully.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioContent {
    pub profile: Profile,
    pub about: String,
    pub skills: Vec<Skill>,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
    pub achievements: Vec<Achievement>,
    pub social: SocialLinks,
}

/// Read all seven tables concurrently and assemble them. Nothing partial is ever returned.
pub async fn load(repo: &Repository) -> Result<PortfolioContent, LoadError> {
    load_inner(repo)
        .await
        .inspect_err(|err| error!("Failed to load portfolio content: {err}"))
}

async fn load_inner(repo: &Repository) -> Result<PortfolioContent, LoadError> {
    debug!("Loading portfolio content");

    let (profile, skills, education, experience, projects, achievements, social) = tokio::join!(
        repo.single::<ProfileRow>(),
        repo.list::<SkillRow>(),
        repo.list::<EducationRow>(),
        repo.list::<ExperienceRow>(),
        repo.list::<ProjectRow>(),
        repo.list::<AchievementRow>(),
        repo.single::<SocialLinksRow>(),
    );

    let profile = profile?.ok_or(LoadError::Missing(Table::Profile))?;
    let social = social?.ok_or(LoadError::Missing(Table::SocialLinks))?;

    Ok(PortfolioContent {
        profile: Profile::from(&profile),
        about: profile.about,
        skills: skills?.iter().map(Skill::from).collect(),
        education: education?.iter().map(Education::from).collect(),
        experience: experience?.iter().map(Experience::from).collect(),
        projects: projects?.iter().map(Project::from).collect(),
        achievements: achievements?.iter().map(Achievement::from).collect(),
        social: SocialLinks::from(&social),
    })
}
