use iced::{
    Theme,
    widget::{Svg, svg},
};
use include_dir::{Dir, include_dir};
use tracing::warn;

static ICONS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/assets/icons");

const ICON_SIZE: f32 = 18.0;

/// An embedded icon from `assets/icons`, tinted with the theme's text color.
pub fn icon<'a>(name: &str) -> Svg<'a> {
    let handle = match ICONS.get_file(format!("{name}.svg")) {
        Some(file) => svg::Handle::from_memory(file.contents()),
        None => {
            warn!("Missing icon `{name}`");
            svg::Handle::from_memory(Vec::<u8>::new())
        }
    };

    svg(handle)
        .width(ICON_SIZE)
        .height(ICON_SIZE)
        .style(|theme: &Theme, _status| svg::Style {
            color: Some(theme.palette().text),
        })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_icons_embedded() {
        for name in [
            "sun", "moon", "arrow-left", "arrow-right", "shield", "log-out", "plus", "trash",
            "save", "x", "user", "mail", "send", "sword", "trophy", "book", "briefcase", "code",
            "link",
        ] {
            assert!(
                ICONS.get_file(format!("{name}.svg")).is_some(),
                "{name} is missing"
            );
        }
    }
}
