//! Filling a security form from a template.

use crate::domain::a007_security_form::api;
use crate::shared::api_utils::{fetch_all, fetch_one};
use crate::shared::components::{ErrorBox, SelectField};
use crate::shared::number_utils::parse_quantity;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use contracts::domain::a001_crew::Crew;
use contracts::domain::a006_form_template::{FieldKind, FormField, FormTemplate};
use contracts::domain::a007_security_form::{
    validate_answers, AnswerValue, FieldAnswer, FieldError, SubmitFormDto,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::HashMap;
use thaw::*;

/// Turn raw input strings into typed answers. Blank inputs are left out;
/// a number that does not parse stays text so validation reports it.
pub fn collect_answers(template: &FormTemplate, raw: &HashMap<String, String>) -> Vec<FieldAnswer> {
    template
        .fields()
        .filter_map(|field| {
            let input = raw.get(&field.id)?.trim();
            let value = match &field.kind {
                FieldKind::Checkbox => AnswerValue::Bool(input == "true"),
                _ if input.is_empty() => return None,
                FieldKind::Number { .. } => parse_quantity(input)
                    .map(AnswerValue::Number)
                    .unwrap_or_else(|| AnswerValue::Text(input.to_string())),
                _ => AnswerValue::Text(input.to_string()),
            };
            Some(FieldAnswer {
                field_id: field.id.clone(),
                value,
            })
        })
        .collect()
}

fn field_input(field: FormField, raw: RwSignal<HashMap<String, String>>) -> AnyView {
    let id = StoredValue::new(field.id.clone());
    let value = move || raw.with(|r| r.get(&id.get_value()).cloned().unwrap_or_default());
    let set = move |v: String| raw.update(|r| {
        r.insert(id.get_value(), v);
    });

    match field.kind {
        FieldKind::Checkbox => view! {
            <input
                type="checkbox"
                prop:checked=move || value() == "true"
                on:change=move |ev| set(event_target_checked(&ev).to_string())
            />
        }
        .into_any(),
        FieldKind::Select { options } => view! {
            <select class="form__select" prop:value=value on:change=move |ev| set(event_target_value(&ev))>
                <option value="">"—"</option>
                {options.into_iter().map(|o| view! { <option value=o.clone()>{o.clone()}</option> }).collect_view()}
            </select>
        }
        .into_any(),
        FieldKind::Text { multiline: true, max_length } => view! {
            <textarea
                class="form__textarea"
                rows="3"
                maxlength=max_length.map(|m| m.to_string())
                prop:value=value
                on:input=move |ev| set(event_target_value(&ev))
            />
        }
        .into_any(),
        FieldKind::Number { min, max } => view! {
            <input
                type="number"
                class="form__input"
                min=min.map(|m| m.to_string())
                max=max.map(|m| m.to_string())
                prop:value=value
                on:input=move |ev| set(event_target_value(&ev))
            />
        }
        .into_any(),
        FieldKind::Date => view! {
            <input type="date" class="form__input" prop:value=value on:change=move |ev| set(event_target_value(&ev)) />
        }
        .into_any(),
        FieldKind::Signature | FieldKind::Photo => view! {
            <input
                class="form__input"
                placeholder="File reference"
                prop:value=value
                on:input=move |ev| set(event_target_value(&ev))
            />
        }
        .into_any(),
        FieldKind::Text { max_length, .. } => view! {
            <input
                class="form__input"
                maxlength=max_length.map(|m| m.to_string())
                prop:value=value
                on:input=move |ev| set(event_target_value(&ev))
            />
        }
        .into_any(),
    }
}

#[component]
pub fn FormFiller(
    template_id: String,
    on_submitted: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let template = RwSignal::new(None::<FormTemplate>);
    let raw = RwSignal::new(HashMap::<String, String>::new());
    let crews = RwSignal::new(Vec::<(String, String)>::new());
    let crew_id = RwSignal::new(String::new());
    let order_id = RwSignal::new(String::new());
    let field_errors = RwSignal::new(Vec::<FieldError>::new());
    let error = RwSignal::new(None::<String>);
    let submitting = RwSignal::new(false);

    spawn_local(async move {
        match fetch_one::<FormTemplate>(&template_id).await {
            Ok(t) => template.set(Some(t)),
            Err(e) => error.set(Some(e.message)),
        }
        if let Ok(v) = fetch_all::<Crew>().await {
            crews.set(v.into_iter().map(|c| (c.id, c.name)).collect());
        }
    });

    let submit = move |_| {
        let Some(t) = template.get_untracked() else { return };
        let answers = raw.with_untracked(|r| collect_answers(&t, r));
        let errors = validate_answers(&t, &answers);
        if !errors.is_empty() {
            error.set(Some(format!("{} field(s) need attention", errors.len())));
            field_errors.set(errors);
            return;
        }
        field_errors.set(Vec::new());
        let non_empty = |s: String| (!s.trim().is_empty()).then(|| s.trim().to_string());
        let dto = SubmitFormDto {
            template_id: t.id.clone(),
            order_id: non_empty(order_id.get_untracked()),
            crew_id: non_empty(crew_id.get_untracked()),
            answers,
        };
        submitting.set(true);
        error.set(None);
        spawn_local(async move {
            match api::submit(&dto).await {
                Ok(_) => on_submitted.run(()),
                Err(e) => error.set(Some(e.message)),
            }
            submitting.set(false);
        });
    };

    let error_for = move |field_id: String| {
        move || {
            field_errors.with(|errs| {
                errs.iter()
                    .find(|e| e.field_id == field_id)
                    .map(|e| view! { <div class="form__error">{e.message.clone()}</div> })
            })
        }
    };

    view! {
        <PageFrame page_id="a007_security_form--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">
                        {move || template.with(|t| t.as_ref().map(|t| t.name.clone()).unwrap_or_else(|| "Security form".into()))}
                    </h1>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=submit
                        disabled=Signal::derive(move || submitting.get() || template.with(|t| t.is_none()))
                    >
                        {move || if submitting.get() { "Submitting..." } else { "Submit" }}
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_cancel.run(())>
                        "Cancel"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <ErrorBox error=error />
                <Flex gap=FlexGap::Medium>
                    <SelectField label="Crew".to_string() value=crew_id options=crews placeholder="—".to_string() />
                    <Flex vertical=true gap=FlexGap::Small>
                        <Label>"Order id"</Label>
                        <Input value=order_id />
                    </Flex>
                </Flex>

                {move || template.with(|t| t.as_ref().and_then(|t| t.description.clone()))
                    .map(|d| view! { <p class="form__description">{d}</p> })}

                {move || template.get().map(|t| {
                    t.sections.into_iter().map(|section| view! {
                        <Card class="form-section">
                            <h3>{section.title.clone()}</h3>
                            {section.fields.into_iter().map(|field| {
                                let label = field.label.clone();
                                let required = field.required;
                                let help = field.help_text.clone();
                                let errors = error_for(field.id.clone());
                                view! {
                                    <div class="form__group">
                                        <label class="form__label">
                                            {label}
                                            {required.then_some(" *")}
                                        </label>
                                        {field_input(field, raw)}
                                        {help.map(|h| view! { <div class="form__help">{h}</div> })}
                                        {errors}
                                    </div>
                                }
                            }).collect_view()}
                        </Card>
                    }).collect_view()
                })}
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a006_form_template::FormSection;

    fn template() -> FormTemplate {
        let mut section = FormSection::new("Checks");
        let mut gas = FormField::new("Gas level", FieldKind::Number { min: Some(0.0), max: Some(5.0) });
        gas.id = "gas".into();
        gas.required = true;
        let mut ok = FormField::new("Area clear", FieldKind::Checkbox);
        ok.id = "clear".into();
        let mut note = FormField::new("Note", FieldKind::Text { max_length: None, multiline: true });
        note.id = "note".into();
        section.fields = vec![gas, ok, note];
        FormTemplate {
            id: "t1".into(),
            name: "Confined space".into(),
            description: None,
            is_active: true,
            version: 1,
            sections: vec![section],
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_collect_answers_types_values() {
        let raw = HashMap::from([
            ("gas".to_string(), "2,5".to_string()),
            ("clear".to_string(), "true".to_string()),
            ("note".to_string(), "   ".to_string()),
        ]);
        let answers = collect_answers(&template(), &raw);
        assert_eq!(answers.len(), 2);
        assert_eq!(answers[0].value, AnswerValue::Number(2.5));
        assert_eq!(answers[1].value, AnswerValue::Bool(true));
        assert!(validate_answers(&template(), &answers).is_empty());
    }

    #[test]
    fn test_unparsable_number_fails_validation() {
        let raw = HashMap::from([("gas".to_string(), "lots".to_string())]);
        let answers = collect_answers(&template(), &raw);
        assert_eq!(answers[0].value, AnswerValue::Text("lots".into()));
        let errors = validate_answers(&template(), &answers);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field_id, "gas");
    }

    #[test]
    fn test_missing_required_reported() {
        let errors = validate_answers(&template(), &collect_answers(&template(), &HashMap::new()));
        assert_eq!(errors.len(), 1);
    }
}
