use super::field_editor::FieldEditor;
use super::state::{add_field, add_section, blank_template, move_section, remove_section, rename_section, Direction};
use crate::shared::api_utils::{fetch_one, save_one};
use crate::shared::components::ErrorBox;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use contracts::domain::a006_form_template::{FieldKind, FormTemplate, FormTemplateDto};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

#[component]
pub fn TemplateBuilder(
    id: Option<String>,
    on_saved: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let form = RwSignal::new(blank_template());
    let version = RwSignal::new(None::<u32>);
    let error = RwSignal::new(None::<String>);
    let saving = RwSignal::new(false);
    let new_field_type = RwSignal::new("text".to_string());

    if let Some(id) = id {
        spawn_local(async move {
            match fetch_one::<FormTemplate>(&id).await {
                Ok(t) => {
                    version.set(Some(t.version));
                    form.set(FormTemplateDto::from(t));
                }
                Err(e) => error.set(Some(e.message)),
            }
        });
    }

    let save = move |_| {
        let mut dto = form.get_untracked();
        dto.name = dto.name.trim().to_string();
        if let Err(msg) = dto.validate() {
            error.set(Some(msg));
            return;
        }
        saving.set(true);
        error.set(None);
        spawn_local(async move {
            match save_one::<FormTemplate, _>(dto.id.as_deref(), &dto).await {
                Ok(_) => on_saved.run(()),
                Err(e) => error.set(Some(e.message)),
            }
            saving.set(false);
        });
    };

    let section_ids = move || form.with(|f| f.sections.iter().map(|s| s.id.clone()).collect::<Vec<_>>());

    view! {
        <PageFrame page_id="a006_form_template--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">
                        {move || if form.with(|f| f.id.is_some()) { "Edit form template" } else { "New form template" }}
                    </h1>
                    {move || version.get().map(|v| view! {
                        <Badge appearance=BadgeAppearance::Outline>{format!("v{}", v)}</Badge>
                    })}
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=save
                        disabled=Signal::derive(move || saving.get())
                    >
                        {move || if saving.get() { "Saving..." } else { "Save" }}
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_cancel.run(())>
                        "Cancel"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <ErrorBox error=error />

                <div class="form__group">
                    <label class="form__label">"Name"</label>
                    <input
                        class="form__input"
                        prop:value=move || form.with(|f| f.name.clone())
                        on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                    />
                </div>
                <div class="form__group">
                    <label class="form__label">"Description"</label>
                    <textarea
                        class="form__textarea"
                        rows="2"
                        prop:value=move || form.with(|f| f.description.clone().unwrap_or_default())
                        on:input=move |ev| {
                            let v = event_target_value(&ev);
                            form.update(|f| f.description = (!v.trim().is_empty()).then_some(v));
                        }
                    />
                </div>

                <For
                    each=section_ids
                    key=|id| id.clone()
                    children=move |section_id| {
                        let sid = StoredValue::new(section_id);
                        let field_ids = move || form.with(|f| {
                            f.sections
                                .iter()
                                .find(|s| s.id == sid.get_value())
                                .map(|s| s.fields.iter().map(|x| x.id.clone()).collect::<Vec<_>>())
                                .unwrap_or_default()
                        });
                        view! {
                            <Card class="builder-section">
                                <Flex gap=FlexGap::Small align=FlexAlign::Center>
                                    <input
                                        class="form__input builder-section__title"
                                        prop:value=move || form.with(|f| {
                                            f.sections.iter().find(|s| s.id == sid.get_value()).map(|s| s.title.clone()).unwrap_or_default()
                                        })
                                        on:input=move |ev| {
                                            let v = event_target_value(&ev);
                                            form.update(|f| rename_section(f, &sid.get_value(), v));
                                        }
                                    />
                                    <Button appearance=ButtonAppearance::Subtle size=ButtonSize::Small
                                        on_click=move |_| form.update(|f| move_section(f, &sid.get_value(), Direction::Up))>
                                        "↑"
                                    </Button>
                                    <Button appearance=ButtonAppearance::Subtle size=ButtonSize::Small
                                        on_click=move |_| form.update(|f| move_section(f, &sid.get_value(), Direction::Down))>
                                        "↓"
                                    </Button>
                                    <Button appearance=ButtonAppearance::Subtle size=ButtonSize::Small
                                        on_click=move |_| form.update(|f| remove_section(f, &sid.get_value()))>
                                        {icon("delete")}
                                    </Button>
                                </Flex>

                                <For
                                    each=field_ids
                                    key=|id| id.clone()
                                    children=move |field_id| view! { <FieldEditor field_id=field_id form=form /> }
                                />

                                <Flex gap=FlexGap::Small>
                                    <select
                                        class="form__select"
                                        on:change=move |ev| new_field_type.set(event_target_value(&ev))
                                    >
                                        {FieldKind::TYPE_NAMES
                                            .iter()
                                            .filter_map(|name| FieldKind::from_type_name(name).map(|k| (*name, k.label())))
                                            .map(|(name, label)| view! {
                                                <option value=name selected=move || new_field_type.get() == name>{label}</option>
                                            })
                                            .collect_view()}
                                    </select>
                                    <Button
                                        appearance=ButtonAppearance::Secondary
                                        size=ButtonSize::Small
                                        on_click=move |_| {
                                            let kind = new_field_type.get_untracked();
                                            form.update(|f| {
                                                add_field(f, &sid.get_value(), &kind);
                                            });
                                        }
                                    >
                                        {icon("plus")}
                                        " Add field"
                                    </Button>
                                </Flex>
                            </Card>
                        }
                    }
                />

                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| form.update(|f| {
                        add_section(f);
                    })
                >
                    {icon("plus")}
                    " Add section"
                </Button>
            </div>
        </PageFrame>
    }
}
