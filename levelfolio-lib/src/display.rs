//! Presentation helpers for the public portfolio that do not depend on a GUI toolkit.

use std::time::Duration;

use crate::repository::{Project, ProjectStatus};

/// Delay before the hit-point bar fills.
pub const HP_REVEAL_DELAY: Duration = Duration::from_millis(500);
/// Delay before the skill bars fill.
pub const SKILL_REVEAL_DELAY: Duration = Duration::from_millis(300);

pub const SKILL_MAX: i32 = 100;

/// `value` as a percentage of `max`, clamped to `0..=100`. A zero `max` yields 0.
pub fn percent(value: i32, max: i32) -> u8 {
    let scaled = i64::from(value).saturating_mul(100);
    let percent = scaled.checked_div(i64::from(max)).unwrap_or(0).clamp(0, 100);

    u8::try_from(percent).unwrap_or(0)
}

/// A bar that shows zero until revealed and then its target, once.
///
/// There is no way back to zero: a new animation needs a new [`Meter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meter {
    target: i32,
    max: i32,
    revealed: bool,
}

impl Meter {
    pub fn new(target: i32, max: i32) -> Self {
        Self {
            target,
            max,
            revealed: false,
        }
    }

    /// A meter that starts out revealed, for bars that are not animated.
    pub fn shown(target: i32, max: i32) -> Self {
        Self {
            revealed: true,
            ..Self::new(target, max)
        }
    }

    pub fn hp(hp: i32, max_hp: i32) -> Self {
        Self::new(hp, max_hp)
    }

    pub fn skill(level: i32) -> Self {
        Self::new(level, SKILL_MAX)
    }

    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn value(&self) -> i32 {
        if self.revealed { self.target } else { 0 }
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn percent(&self) -> u8 {
        percent(self.value(), self.max)
    }

    /// Fill ratio in `0.0..=1.0`.
    pub fn fill(&self) -> f32 {
        f32::from(self.percent()) / 100.0
    }

    /// "value/max", unclamped.
    pub fn label(&self) -> String {
        format!("{}/{}", self.value(), self.max)
    }
}

/// Render-ready view of a project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectCard<'a> {
    pub project: &'a Project,
    pub progress: Meter,
}

impl<'a> ProjectCard<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self {
            project,
            progress: Meter::shown(project.progress, 100),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.project.status == ProjectStatus::Completed
    }

    pub fn badge(&self) -> String {
        self.project.status.to_string()
    }

    pub fn progress_label(&self) -> String {
        format!("{}%", self.project.progress)
    }
}

/// Up to two initials for the portrait placeholder, e.g. "AR" for "ALEX RIVERA".
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

pub fn level_label(level: i32) -> String {
    format!("LV. {level}")
}

pub fn level_gain_label(level_gain: i32) -> String {
    format!("Level Cap Increased! (+{level_gain} LV)")
}

pub fn guild_label(title: &str) -> String {
    format!("Joined Guild! (+{title})")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_percent() {
        assert_eq!(percent(870, 1000), 87);
        assert_eq!(percent(1500, 1000), 100);
        assert_eq!(percent(-5, 100), 0);
        assert_eq!(percent(10, 0), 0);
        assert_eq!(percent(i32::MAX, 1), 100);
    }

    #[test]
    fn test_meter_reveal() {
        let mut meter = Meter::hp(870, 1000);
        assert_eq!(meter.value(), 0);
        assert_eq!(meter.label(), "0/1000");

        meter.reveal();
        meter.reveal();

        assert_eq!(meter.value(), 870);
        assert_eq!(meter.label(), "870/1000");
        assert!((meter.fill() - 0.87).abs() < f32::EPSILON);
    }

    #[test]
    fn test_overfull_hp_label_is_raw() {
        let mut meter = Meter::hp(1200, 1000);
        meter.reveal();

        assert_eq!(meter.label(), "1200/1000");
        assert_eq!(meter.percent(), 100);
    }

    #[test]
    fn test_project_card() {
        let project = Project {
            title: "LEDGER".into(),
            description: String::new(),
            tech_stack: vec!["Rust".into()],
            status: ProjectStatus::Completed,
            progress: 100,
            role: None,
        };
        let card = ProjectCard::new(&project);

        assert!(card.is_completed());
        assert_eq!(card.badge(), "Completed");
        assert_eq!(card.progress_label(), "100%");
        assert_eq!(card.progress.percent(), 100);
    }

    #[test]
    fn test_labels() {
        assert_eq!(level_label(24), "LV. 24");
        assert_eq!(level_gain_label(15), "Level Cap Increased! (+15 LV)");
        assert_eq!(guild_label("Data Engineer"), "Joined Guild! (+Data Engineer)");
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("ALEX RIVERA"), "AR");
        assert_eq!(initials("  ada  lovelace byron"), "AL");
        assert_eq!(initials(""), "");
    }
}
