use std::{fmt::Write, io};

use colored::Colorize;
use levelfolio_lib::{
    PortfolioContent, Result, content,
    display::{Meter, ProjectCard, SKILL_MAX, guild_label, level_gain_label, level_label},
    repository::Repository,
};

pub async fn handle(repo: &Repository, json: bool) -> Result<()> {
    let content = content::load(repo).await?;

    if json {
        let out = serde_json::to_string_pretty(&content).map_err(io::Error::from)?;
        println!("{out}");
    } else {
        print!("{}", render(&content));
    }

    Ok(())
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", title.bold().cyan());
}

/// Plain text rendering of the portfolio with every bar fully revealed.
pub fn render(content: &PortfolioContent) -> String {
    let mut out = String::new();
    let profile = &content.profile;

    let _ = writeln!(
        out,
        "{}  {}",
        profile.name.bold(),
        level_label(profile.level).yellow()
    );
    let _ = writeln!(out, "{}", profile.title);
    let hp = Meter::shown(profile.hp, profile.max_hp);
    let _ = writeln!(out, "HP {} ({}%)", hp.label().green(), hp.percent());

    heading(&mut out, "ABOUT ME // HUNTER PROFILE");
    let _ = writeln!(out, "{}", content.about);

    heading(&mut out, "ABILITIES // SKILL TREE");
    for skill in &content.skills {
        let level = Meter::shown(skill.level, SKILL_MAX);
        let _ = writeln!(out, "{:<24} {}", skill.name, level.label());
    }

    heading(&mut out, "KNOWLEDGE UNLOCKED // EDUCATION");
    for entry in &content.education {
        let _ = writeln!(out, "{} - {} ({})", entry.degree.bold(), entry.institution, entry.years);
        if let Some(gain) = entry.level_gain {
            let _ = writeln!(out, "  {}", level_gain_label(gain).green());
        }
    }

    heading(&mut out, "QUEST LOG // WORK EXPERIENCE");
    for entry in &content.experience {
        let _ = writeln!(out, "{} @{} ({})", entry.title.bold(), entry.company, entry.period);
        if let Some(description) = &entry.description {
            let _ = writeln!(out, "  {description}");
        }
        let _ = writeln!(out, "  {}", guild_label(&entry.title).green());
    }

    heading(&mut out, "DUNGEON RAIDS // PROJECTS");
    for project in &content.projects {
        let card = ProjectCard::new(project);
        let badge = if card.is_completed() {
            card.badge().green()
        } else {
            card.badge().yellow()
        };
        let _ = writeln!(out, "{} [{badge}] {}", project.title.bold(), card.progress_label());
        if let Some(role) = &project.role {
            let _ = writeln!(out, "  Role: {role}");
        }
        let _ = writeln!(out, "  {}", project.description);
        if !project.tech_stack.is_empty() {
            let _ = writeln!(out, "  {}", project.tech_stack.join(" | ").dimmed());
        }
    }

    heading(&mut out, "TITLES EARNED // ACHIEVEMENTS");
    for achievement in &content.achievements {
        let _ = writeln!(out, "{}: {}", achievement.title.bold(), achievement.description);
    }

    let social = &content.social;
    let _ = writeln!(
        out,
        "\n{}  {}  {}\n{}",
        social.linkedin,
        social.github,
        social.email,
        "SYSTEM INTERFACE v1.0 // PORTFOLIO".dimmed()
    );

    out
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use levelfolio_lib::repository::{MemoryStore, seed};

    use super::*;

    #[tokio::test]
    async fn test_render_sections() {
        colored::control::set_override(false);
        let store = MemoryStore::new();
        seed::seed(&store);
        let content = content::load(&Repository::new(Arc::new(store)))
            .await
            .unwrap();

        let out = render(&content);

        assert!(out.contains("ALEX RIVERA  LV. 24"));
        assert!(out.contains("HP 870/1000 (87%)"));
        assert!(out.contains(&format!("{:<24} 90/100", "Python")));
        assert!(!out.contains(" 0/100"));
        assert!(out.contains("DUNGEON RAIDS // PROJECTS"));
        assert!(out.contains("STREAMING LEDGER [Ongoing] 60%"));
        assert!(out.contains("SYSTEM INTERFACE v1.0 // PORTFOLIO"));
    }
}
