use super::state::{change_field_type, move_field, parse_options, remove_field, update_field, Direction};
use crate::shared::icons::icon;
use crate::shared::number_utils::parse_quantity;
use contracts::domain::a006_form_template::{FieldKind, FormField, FormTemplateDto};
use leptos::prelude::*;
use thaw::*;

fn read_field<R>(form: RwSignal<FormTemplateDto>, id: &str, f: impl FnOnce(&FormField) -> R) -> Option<R> {
    form.with(|dto| {
        dto.sections
            .iter()
            .flat_map(|s| s.fields.iter())
            .find(|field| field.id == id)
            .map(f)
    })
}

fn min_text(f: &FormField) -> String {
    match f.kind {
        FieldKind::Number { min: Some(v), .. } => v.to_string(),
        _ => String::new(),
    }
}

fn max_text(f: &FormField) -> String {
    match f.kind {
        FieldKind::Number { max: Some(v), .. } => v.to_string(),
        _ => String::new(),
    }
}

/// One field row of the builder, reading and writing through `form`
#[component]
pub fn FieldEditor(field_id: String, form: RwSignal<FormTemplateDto>) -> impl IntoView {
    let id = StoredValue::new(field_id);
    let get = move |f: fn(&FormField) -> String| {
        move || read_field(form, &id.get_value(), f).unwrap_or_default()
    };
    let edit = move |f: Box<dyn FnOnce(&mut FormField)>| {
        form.update(|dto| update_field(dto, &id.get_value(), f));
    };
    let kind_name = move || get(|f| f.kind.type_name().to_string())();

    view! {
        <div class="builder-field">
            <Flex gap=FlexGap::Small align=FlexAlign::End>
                <input
                    class="form__input builder-field__label"
                    placeholder="Label"
                    prop:value=get(|f| f.label.clone())
                    on:input=move |ev| {
                        let v = event_target_value(&ev);
                        edit(Box::new(move |f| f.label = v));
                    }
                />
                <select
                    class="form__select"
                    prop:value=kind_name
                    on:change=move |ev| {
                        let v = event_target_value(&ev);
                        form.update(|dto| change_field_type(dto, &id.get_value(), &v));
                    }
                >
                    {FieldKind::TYPE_NAMES
                        .iter()
                        .filter_map(|name| FieldKind::from_type_name(name).map(|k| (*name, k.label())))
                        .map(|(name, label)| view! {
                            <option value=name selected=move || kind_name() == name>{label}</option>
                        })
                        .collect_view()}
                </select>
                <label class="checkbox-list__item">
                    <input
                        type="checkbox"
                        prop:checked=move || read_field(form, &id.get_value(), |f| f.required).unwrap_or(false)
                        on:change=move |ev| {
                            let v = event_target_checked(&ev);
                            edit(Box::new(move |f| f.required = v));
                        }
                    />
                    "Required"
                </label>
                <Button appearance=ButtonAppearance::Subtle size=ButtonSize::Small
                    on_click=move |_| form.update(|dto| move_field(dto, &id.get_value(), Direction::Up))>
                    "↑"
                </Button>
                <Button appearance=ButtonAppearance::Subtle size=ButtonSize::Small
                    on_click=move |_| form.update(|dto| move_field(dto, &id.get_value(), Direction::Down))>
                    "↓"
                </Button>
                <Button appearance=ButtonAppearance::Subtle size=ButtonSize::Small
                    on_click=move |_| form.update(|dto| remove_field(dto, &id.get_value()))>
                    {icon("delete")}
                </Button>
            </Flex>

            <input
                class="form__input builder-field__help"
                placeholder="Help text (optional)"
                prop:value=get(|f| f.help_text.clone().unwrap_or_default())
                on:input=move |ev| {
                    let v = event_target_value(&ev);
                    edit(Box::new(move |f| f.help_text = (!v.trim().is_empty()).then_some(v)));
                }
            />

            {move || match kind_name().as_str() {
                "select" => view! {
                    <textarea
                        class="form__textarea"
                        rows="3"
                        placeholder="One option per line"
                        prop:value=get(|f| match &f.kind {
                            FieldKind::Select { options } => options.join("\n"),
                            _ => String::new(),
                        })
                        on:change=move |ev| {
                            let options = parse_options(&event_target_value(&ev));
                            edit(Box::new(move |f| f.kind = FieldKind::Select { options }));
                        }
                    />
                }
                .into_any(),
                "number" => {
                    let bound = move |is_min: bool| get(if is_min { min_text } else { max_text });
                    let set_bound = move |is_min: bool, raw: String| {
                        let value = parse_quantity(&raw);
                        edit(Box::new(move |f| {
                            if let FieldKind::Number { min, max } = &mut f.kind {
                                if is_min { *min = value } else { *max = value }
                            }
                        }));
                    };
                    view! {
                        <Flex gap=FlexGap::Small>
                            <input class="form__input" placeholder="Min" prop:value=bound(true)
                                on:change=move |ev| set_bound(true, event_target_value(&ev)) />
                            <input class="form__input" placeholder="Max" prop:value=bound(false)
                                on:change=move |ev| set_bound(false, event_target_value(&ev)) />
                        </Flex>
                    }
                    .into_any()
                }
                "text" => view! {
                    <label class="checkbox-list__item">
                        <input
                            type="checkbox"
                            prop:checked=move || read_field(form, &id.get_value(), |f| matches!(f.kind, FieldKind::Text { multiline: true, .. })).unwrap_or(false)
                            on:change=move |ev| {
                                let v = event_target_checked(&ev);
                                edit(Box::new(move |f| {
                                    if let FieldKind::Text { multiline, .. } = &mut f.kind {
                                        *multiline = v;
                                    }
                                }));
                            }
                        />
                        "Multi-line"
                    </label>
                }
                .into_any(),
                _ => ().into_any(),
            }}
        </div>
    }
}
