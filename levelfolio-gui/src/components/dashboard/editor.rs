use std::{collections::HashMap, fmt, sync::Arc, time::Duration};

use derive_more::{Deref, DerefMut};
use iced::{
    Element, Length, Task,
    widget::{
        Column, Row, button, column, container, pick_list, row, rule, scrollable, space, text,
        text_editor, text_input,
    },
};
use levelfolio_lib::{
    Edit, Editor, Record,
    editor::{self, Banner, Phase},
    repository::{
        Repository,
        entities::{FieldSpec, FieldValue, InputKind, fields::spec_for},
        store,
    },
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::icons::icon;

/// How long a success banner stays up.
const BANNER_DURATION: Duration = Duration::from_secs(3);

type Failure = Arc<store::Error>;

#[derive(Debug, Clone)]
pub enum Message<R: Record> {
    Loaded(Result<Vec<R>, Failure>),
    FieldInput {
        id: Uuid,
        field: R::Field,
        input: String,
    },
    LongTextEdited {
        id: Uuid,
        field: R::Field,
        action: text_editor::Action,
    },
    ItemInput {
        id: Uuid,
        field: R::Field,
        input: String,
    },
    ItemPushed {
        id: Uuid,
        field: R::Field,
    },
    ItemRemoved {
        id: Uuid,
        field: R::Field,
        index: usize,
    },
    AddPressed,
    DeletePressed(Uuid),
    Deleted(Uuid, Result<(), Failure>),
    SavePressed,
    Saved(Result<Vec<R>, Failure>),
    BannerExpired,
}

/// Form over every row of one table, generated from the record's field specs.
#[derive(Deref, DerefMut)]
pub struct RecordEditor<R: Record> {
    repo: Repository,
    #[deref]
    #[deref_mut]
    editor: Editor<R>,
    /// Raw text of numeric inputs, which may not parse while being typed
    drafts: HashMap<(Uuid, R::Field), String>,
    /// Text of the "add item" input of list fields
    pending_items: HashMap<(Uuid, R::Field), String>,
    /// Multi-line editors of long text fields, kept in step with the rows
    long_texts: HashMap<(Uuid, R::Field), text_editor::Content>,
}

impl<R: Record> fmt::Debug for RecordEditor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordEditor")
            .field("editor", &self.editor)
            .field("drafts", &self.drafts)
            .field("pending_items", &self.pending_items)
            .finish_non_exhaustive()
    }
}

impl<R: Record> RecordEditor<R> {
    pub fn new(repo: Repository) -> (Self, Task<Message<R>>) {
        (
            Self {
                repo: repo.clone(),
                editor: Editor::new(),
                drafts: HashMap::new(),
                pending_items: HashMap::new(),
                long_texts: HashMap::new(),
            },
            load(repo),
        )
    }

    pub fn update(&mut self, message: Message<R>) -> Task<Message<R>> {
        match message {
            Message::Loaded(result) => {
                self.drafts.clear();
                self.long_texts.clear();
                self.editor.loaded(result);
                self.sync_long_texts();
            }
            Message::FieldInput { id, field, input } => self.input(id, field, input),
            Message::LongTextEdited { id, field, action } => {
                let Some(content) = self.long_texts.get_mut(&(id, field)) else {
                    debug!("No editor for {field} of row {id}");
                    return Task::none();
                };
                let edited = action.is_edit();
                content.perform(action);
                if edited {
                    let input = content.text();
                    self.input(id, field, input);
                }
            }
            Message::ItemInput { id, field, input } => {
                self.pending_items.insert((id, field), input);
            }
            Message::ItemPushed { id, field } => {
                let item = self.pending_items.remove(&(id, field)).unwrap_or_default();
                if let Err(err) = self.editor.edit(id, Edit::Push(field, item)) {
                    warn!("Could not add item to {field}: {err}");
                }
            }
            Message::ItemRemoved { id, field, index } => {
                if let Err(err) = self.editor.edit(id, Edit::Remove(field, index)) {
                    warn!("Could not remove item from {field}: {err}");
                }
            }
            Message::AddPressed => {
                if let Err(err) = self.editor.add() {
                    warn!("Could not add {}: {err}", R::LABEL);
                }
                self.sync_long_texts();
            }
            Message::DeletePressed(id) => match self.editor.begin_delete(id) {
                Ok(()) => {
                    return Task::perform(editor::remove::<R>(self.repo.clone(), id), move |r| {
                        Message::Deleted(id, r.map(|_| ()).map_err(Arc::new))
                    });
                }
                Err(err) => warn!("Could not delete {} row {id}: {err}", R::LABEL),
            },
            Message::Deleted(id, result) => {
                // Failures are already reported through the banner
                let _ = self.editor.deleted(id, result);
                self.sync_long_texts();
            }
            Message::SavePressed => match self.editor.begin_save() {
                Ok(rows) => {
                    return Task::perform(editor::commit(self.repo.clone(), rows), |r| {
                        Message::Saved(r.map_err(Arc::new))
                    });
                }
                Err(err) => debug!("Ignoring save of {}: {err}", R::LABEL),
            },
            Message::Saved(result) => {
                self.drafts.clear();
                let saved = self.editor.saved(result).is_ok();
                if saved {
                    self.long_texts.clear();
                }
                self.sync_long_texts();
                if saved {
                    return Task::perform(
                        async { tokio::time::sleep(BANNER_DURATION).await },
                        |()| Message::BannerExpired,
                    );
                }
            }
            Message::BannerExpired => {
                if matches!(self.editor.banner(), Some(Banner::Saved(_))) {
                    self.editor.clear_banner();
                }
            }
        }

        Task::none()
    }

    /// Give every long text field of every row an editor holding its current value, and drop
    /// the editors of rows that are gone.
    fn sync_long_texts(&mut self) {
        let mut synced = HashMap::new();
        for record in self.editor.rows() {
            let id = record.id();
            for spec in R::FIELDS.iter().filter(|s| s.kind == InputKind::LongText) {
                let key = (id, spec.field);
                let content = self.long_texts.remove(&key).unwrap_or_else(|| {
                    text_editor::Content::with_text(&record.get(spec.field).to_string())
                });
                synced.insert(key, content);
            }
        }
        self.long_texts = synced;
    }

    fn input(&mut self, id: Uuid, field: R::Field, input: String) {
        let Some(spec) = spec_for::<R>(field) else {
            warn!("No field `{field}` on {}", R::LABEL);
            return;
        };

        if matches!(spec.kind, InputKind::Integer | InputKind::OptionalInteger) {
            self.drafts.insert((id, field), input.clone());
        }

        // Input that does not parse is rejected and the row keeps its value
        let edit = FieldValue::parse(&field.to_string(), spec.kind, &input)
            .map(|value| Edit::Set(field, value));

        match edit {
            Ok(edit) => {
                if let Err(err) = self.editor.edit(id, edit) {
                    warn!("Rejected edit of {field}: {err}");
                }
            }
            Err(err) => debug!("Rejected input for {field}: {err}"),
        }
    }

    pub fn view(&self) -> Element<'_, Message<R>> {
        if self.editor.phase() == Phase::Loading {
            return container(text("Loading...")).padding(20).into();
        }
        if let Some(missing) = self.editor.missing() {
            return container(text(missing)).padding(20).into();
        }

        let mut header = row![text(format!("Manage {}", title(R::LABEL))).size(22)]
            .spacing(8)
            .align_y(iced::Alignment::Center);
        header = header.push(space::horizontal());
        if !R::TABLE.is_singleton() {
            header = header.push(
                button(row![icon("plus"), text(" Add")])
                    .style(button::secondary)
                    .on_press(Message::AddPressed),
            );
        }

        let rows = Column::with_children(self.editor.rows().iter().map(|r| self.record_card(r)))
            .spacing(12);

        let saving = self.editor.phase() == Phase::Saving;
        let save_button = button(row![
            icon("save"),
            text(if saving { " Saving..." } else { " Save Changes" })
        ])
        .style(button::primary)
        .on_press_maybe((!saving).then_some(Message::SavePressed));

        let mut content = column![header, rule::horizontal(1)].spacing(12);
        if let Some(banner) = self.editor.banner() {
            content = content.push(banner_view(banner));
        }

        content
            .push(scrollable(rows).height(Length::Fill))
            .push(row![space::horizontal(), save_button])
            .padding(16)
            .into()
    }

    fn record_card<'a>(&'a self, record: &'a R) -> Element<'a, Message<R>> {
        let id = record.id();

        let fields = Column::with_children(
            R::FIELDS
                .iter()
                .map(|spec| self.field_view(id, record, spec)),
        )
        .spacing(8);

        let mut card = column![fields].spacing(8);
        if !R::TABLE.is_singleton() {
            let deleting = self.editor.is_deleting(id);
            card = card.push(row![
                space::horizontal(),
                button(row![icon("trash"), text(" Delete")])
                    .style(button::danger)
                    .on_press_maybe((!deleting).then_some(Message::DeletePressed(id)))
            ]);
        }

        container(card)
            .padding(12)
            .width(Length::Fill)
            .style(container::bordered_box)
            .into()
    }

    fn field_view<'a>(
        &'a self,
        id: Uuid,
        record: &'a R,
        spec: &'static FieldSpec<R::Field>,
    ) -> Element<'a, Message<R>> {
        let field = spec.field;
        let label = match &spec.range {
            Some(range) => format!("{} ({}-{})", spec.label, range.start(), range.end()),
            None => spec.label.to_string(),
        };
        let value = record.get(field);

        let input: Element<'a, Message<R>> = match spec.kind {
            InputKind::Choice(options) => {
                let current = value.to_string();
                let selected = options.iter().copied().find(|option| *option == current);

                pick_list(options, selected, move |choice: &'static str| {
                    Message::FieldInput {
                        id,
                        field,
                        input: choice.to_string(),
                    }
                })
                .into()
            }
            InputKind::List => self.list_view(id, field, spec.placeholder, value),
            InputKind::Integer | InputKind::OptionalInteger => {
                let shown = self
                    .drafts
                    .get(&(id, field))
                    .cloned()
                    .unwrap_or_else(|| value.to_string());

                text_input(spec.placeholder, &shown)
                    .on_input(move |input| Message::FieldInput { id, field, input })
                    .width(Length::Fixed(160.0))
                    .into()
            }
            InputKind::LongText => match self.long_texts.get(&(id, field)) {
                Some(content) => text_editor(content)
                    .placeholder(spec.placeholder)
                    .height(120)
                    .on_action(move |action| Message::LongTextEdited { id, field, action })
                    .into(),
                None => text_input(spec.placeholder, &value.to_string())
                    .on_input(move |input| Message::FieldInput { id, field, input })
                    .into(),
            },
            InputKind::Text | InputKind::OptionalText => {
                text_input(spec.placeholder, &value.to_string())
                    .on_input(move |input| Message::FieldInput { id, field, input })
                    .into()
            }
        };

        column![text(label).size(13), input].spacing(4).into()
    }

    fn list_view<'a>(
        &'a self,
        id: Uuid,
        field: R::Field,
        placeholder: &'static str,
        value: FieldValue,
    ) -> Element<'a, Message<R>> {
        let items = match value {
            FieldValue::List(items) => items,
            _ => Vec::new(),
        };

        let badges = Row::with_children(items.into_iter().enumerate().map(|(index, item)| {
            container(
                row![
                    text(item),
                    button(icon("x"))
                        .style(button::text)
                        .padding(0)
                        .on_press(Message::ItemRemoved { id, field, index })
                ]
                .spacing(4)
                .align_y(iced::Alignment::Center),
            )
            .padding([2, 8])
            .style(container::rounded_box)
            .into()
        }))
        .spacing(6);

        let pending = self
            .pending_items
            .get(&(id, field))
            .map(String::as_str)
            .unwrap_or_default();

        column![
            badges,
            row![
                text_input(placeholder, pending)
                    .on_input(move |input| Message::ItemInput { id, field, input })
                    .on_submit(Message::ItemPushed { id, field }),
                button(icon("plus"))
                    .style(button::secondary)
                    .on_press(Message::ItemPushed { id, field })
            ]
            .spacing(6)
        ]
        .spacing(6)
        .into()
    }
}

fn load<R: Record>(repo: Repository) -> Task<Message<R>> {
    Task::perform(editor::fetch::<R>(repo), |r| {
        Message::Loaded(r.map_err(Arc::new))
    })
}

fn banner_view<'a, M: 'a>(banner: &'a Banner) -> Element<'a, M> {
    let style = if banner.is_error() {
        text::danger
    } else {
        text::success
    };

    container(text(banner.text()).style(style))
        .padding(10)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}

/// "social links" -> "Social Links"
fn title(label: &str) -> String {
    label
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod test {
    use levelfolio_lib::repository::{
        MemoryStore, ProjectRow, SkillRow, entities::ProjectField, seed,
    };

    use super::*;

    fn repo() -> Repository {
        let store = MemoryStore::new();
        seed::seed(&store);
        Repository::new(Arc::new(store))
    }

    fn loaded<R: Record>() -> RecordEditor<R> {
        let (mut editor, _) = RecordEditor::<R>::new(repo());
        editor.editor.loaded::<store::Error>(Ok(R::blank(1).into_iter().collect()));
        editor
    }

    #[test]
    fn test_title() {
        assert_eq!(title("social links"), "Social Links");
        assert_eq!(title("skills"), "Skills");
    }

    #[test]
    fn test_invalid_integer_keeps_value() {
        let mut editor = loaded::<SkillRow>();
        let skill = editor.rows().first().unwrap().clone();
        let field = levelfolio_lib::repository::entities::SkillField::Level;

        let _ = editor.update(Message::FieldInput {
            id: skill.id,
            field,
            input: "9x".into(),
        });

        assert_eq!(editor.row(skill.id).unwrap().level, skill.level);
        assert_eq!(editor.drafts.get(&(skill.id, field)).unwrap(), "9x");

        let _ = editor.update(Message::FieldInput {
            id: skill.id,
            field,
            input: "75".into(),
        });
        assert_eq!(editor.row(skill.id).unwrap().level, 75);
    }

    #[test]
    fn test_push_pending_item() {
        let mut editor = loaded::<ProjectRow>();
        let id = editor.rows().first().unwrap().id;
        let field = levelfolio_lib::repository::entities::ProjectField::TechStack;

        let _ = editor.update(Message::ItemInput {
            id,
            field,
            input: "Rust".into(),
        });
        let _ = editor.update(Message::ItemPushed { id, field });

        assert_eq!(editor.row(id).unwrap().tech_stack, ["Rust"]);
        assert!(!editor.pending_items.contains_key(&(id, field)));
    }

    #[test]
    fn test_long_text_uses_multiline_editor() {
        let (mut editor, _) = RecordEditor::<ProjectRow>::new(repo());
        let _ = editor.update(Message::Loaded(Ok(ProjectRow::blank(1).into_iter().collect())));
        let id = editor.rows().first().unwrap().id;
        let field = ProjectField::Description;
        assert!(editor.long_texts.contains_key(&(id, field)));

        let _ = editor.update(Message::LongTextEdited {
            id,
            field,
            action: text_editor::Action::Edit(text_editor::Edit::Paste(Arc::new(
                "First line\nSecond line".into(),
            ))),
        });

        assert_eq!(editor.row(id).unwrap().description, "First line\nSecond line");

        let _ = editor.update(Message::AddPressed);
        assert_eq!(editor.long_texts.len(), 2);
    }

    #[test]
    fn test_only_success_banner_expires() {
        let mut editor = loaded::<SkillRow>();
        editor.editor.begin_save().unwrap();
        let _ = editor.editor.saved(Err("offline"));

        let _ = editor.update(Message::BannerExpired);

        assert!(editor.banner().is_some_and(Banner::is_error));
    }
}
