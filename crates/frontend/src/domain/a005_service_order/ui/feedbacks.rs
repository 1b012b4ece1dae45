use crate::domain::a005_service_order::api;
use crate::shared::components::SelectField;
use crate::shared::date_utils::format_datetime_opt;
use crate::shared::number_utils::format_quantity_unit;
use contracts::domain::a005_service_order::{
    decode_body, encode_body, CreateFeedbackDto, FeedbackBody, FeedbackType, OrderFeedback,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

/// Feedback with its body decoded; `body` is None when it could not be read
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackEntry {
    pub feedback: OrderFeedback,
    pub body: Option<FeedbackBody>,
}

/// Decode every body, logging and dropping the unreadable ones' content
pub fn decode_feedbacks(feedbacks: Vec<OrderFeedback>) -> Vec<FeedbackEntry> {
    feedbacks
        .into_iter()
        .map(|feedback| {
            let body = match decode_body(feedback.feedback_type, &feedback.body) {
                Ok(body) => Some(body),
                Err(e) => {
                    log::warn!("feedback {} ignored: {}", feedback.id, e);
                    None
                }
            };
            FeedbackEntry { feedback, body }
        })
        .collect()
}

fn render_body(body: Option<FeedbackBody>) -> AnyView {
    match body {
        Some(FeedbackBody::Text(text)) => view! { <p class="feedback__text">{text}</p> }.into_any(),
        Some(FeedbackBody::MaterialUsage(record)) => view! {
            <ul class="feedback__usage">
                {record.items.into_iter().map(|i| {
                    let name = if i.material_name.is_empty() { i.material_id.clone() } else { i.material_name.clone() };
                    view! { <li>{name}": "{format_quantity_unit(i.quantity, &i.unit)}</li> }
                }).collect_view()}
            </ul>
        }
        .into_any(),
        None => view! { <p class="feedback__text feedback__text--muted">"(unreadable content)"</p> }.into_any(),
    }
}

#[component]
pub fn OrderFeedbacks(
    order_id: String,
    entries: RwSignal<Vec<FeedbackEntry>>,
    error: RwSignal<Option<String>>,
) -> impl IntoView {
    let order_id = StoredValue::new(order_id);
    let text = RwSignal::new(String::new());
    let kind = RwSignal::new("NOTE".to_string());
    let sending = RwSignal::new(false);

    let kind_options = Signal::derive(|| {
        vec![
            ("NOTE".to_string(), FeedbackType::Note.label().to_string()),
            ("ISSUE".to_string(), FeedbackType::Issue.label().to_string()),
        ]
    });

    let send = move |_| {
        let content = text.get_untracked().trim().to_string();
        if content.is_empty() {
            return;
        }
        let feedback_type = if kind.get_untracked() == "ISSUE" {
            FeedbackType::Issue
        } else {
            FeedbackType::Note
        };
        let body = match encode_body(&FeedbackBody::Text(content)) {
            Ok(body) => body,
            Err(e) => {
                error.set(Some(e.to_string()));
                return;
            }
        };
        let dto = CreateFeedbackDto { feedback_type, body };
        sending.set(true);
        spawn_local(async move {
            match api::add_feedback(&order_id.get_value(), &dto).await {
                Ok(created) => {
                    text.set(String::new());
                    entries.update(|v| v.extend(decode_feedbacks(vec![created])));
                }
                Err(e) => error.set(Some(e.message)),
            }
            sending.set(false);
        });
    };

    view! {
        <Card>
            <div class="order-feedbacks">
                <h4>"Feedback"</h4>
                <For
                    each=move || entries.get()
                    key=|e| e.feedback.id.clone()
                    children=|entry| {
                        let f = entry.feedback;
                        view! {
                            <div class="feedback">
                                <div class="feedback__meta">
                                    <Badge appearance=BadgeAppearance::Outline>{f.feedback_type.label()}</Badge>
                                    " "{f.author.clone().unwrap_or_default()}
                                    " · "{format_datetime_opt(f.created_at.as_ref())}
                                </div>
                                {render_body(entry.body)}
                            </div>
                        }
                    }
                />
                <Flex gap=FlexGap::Small align=FlexAlign::End>
                    <SelectField value=kind options=kind_options />
                    <Textarea value=text attr:rows=2 placeholder="Add a note..." />
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=send
                        disabled=Signal::derive(move || sending.get() || text.with(|t| t.trim().is_empty()))
                    >
                        "Send"
                    </Button>
                </Flex>
            </div>
        </Card>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feedback(id: &str, t: FeedbackType, body: &str) -> OrderFeedback {
        OrderFeedback {
            id: id.into(),
            order_id: "o1".into(),
            feedback_type: t,
            body: body.into(),
            author: None,
            created_at: None,
        }
    }

    #[test]
    fn test_malformed_usage_is_kept_without_body() {
        let entries = decode_feedbacks(vec![
            feedback("1", FeedbackType::Note, "all good"),
            feedback("2", FeedbackType::MaterialUsage, "{not json"),
            feedback(
                "3",
                FeedbackType::MaterialUsage,
                r#"{"locationId":"l1","items":[{"materialId":"m1","quantity":2}]}"#,
            ),
        ]);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].body, Some(FeedbackBody::Text("all good".into())));
        assert_eq!(entries[1].body, None);
        assert!(matches!(entries[2].body, Some(FeedbackBody::MaterialUsage(_))));
    }
}
