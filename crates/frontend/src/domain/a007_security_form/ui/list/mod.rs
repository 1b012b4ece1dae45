use crate::domain::a007_security_form::api;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::detail_tab_label;
use crate::shared::api_utils::fetch_all;
use crate::shared::components::{ErrorBox, SelectField};
use crate::shared::date_utils::format_datetime_opt;
use crate::shared::icons::icon;
use crate::shared::list_utils::{contains_ci, filter_list, SearchInput, Searchable};
use crate::shared::modal_stack::ModalStackService;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use contracts::domain::a001_crew::Crew;
use contracts::domain::a006_form_template::FormTemplate;
use contracts::domain::a007_security_form::FormSubmission;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::HashMap;
use thaw::*;

/// Submission flattened for display, names resolved against the catalogues
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRow {
    pub id: String,
    pub template_id: String,
    pub template_name: String,
    pub crew_name: String,
    pub order_id: String,
    pub submitted_by: String,
    pub submitted_at: String,
    pub answers: usize,
}

impl SubmissionRow {
    pub fn build(
        s: &FormSubmission,
        templates: &HashMap<String, String>,
        crews: &HashMap<String, String>,
    ) -> Self {
        let template_name = s
            .template_name
            .clone()
            .or_else(|| templates.get(&s.template_id).cloned())
            .unwrap_or_else(|| s.template_id.clone());
        let crew_name = s
            .crew_id
            .as_ref()
            .map(|id| crews.get(id).cloned().unwrap_or_else(|| id.clone()))
            .unwrap_or_default();
        Self {
            id: s.id.clone(),
            template_id: s.template_id.clone(),
            template_name,
            crew_name,
            order_id: s.order_id.clone().unwrap_or_default(),
            submitted_by: s.submitted_by.clone().unwrap_or_default(),
            submitted_at: format_datetime_opt(s.submitted_at.as_ref()),
            answers: s.answers.len(),
        }
    }
}

impl Searchable for SubmissionRow {
    fn matches_filter(&self, filter: &str) -> bool {
        contains_ci(&self.template_name, filter)
            || contains_ci(&self.crew_name, filter)
            || contains_ci(&self.order_id, filter)
            || contains_ci(&self.submitted_by, filter)
    }
}

#[component]
fn SubmissionAnswers(submission: FormSubmission, template: Option<FormTemplate>, on_close: Callback<()>) -> impl IntoView {
    let rows: Vec<(String, String)> = submission
        .answers
        .iter()
        .map(|a| {
            let label = template
                .as_ref()
                .and_then(|t| t.field(&a.field_id))
                .map(|f| f.label.clone())
                .unwrap_or_else(|| a.field_id.clone());
            (label, a.value.display())
        })
        .collect();

    view! {
        <div class="details-container">
            <div class="modal-header">
                <h3 class="modal-title">
                    {submission.template_name.clone().unwrap_or_else(|| submission.template_id.clone())}
                </h3>
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                    "Close"
                </Button>
            </div>
            <Table>
                <TableBody>
                    {rows.into_iter().map(|(label, value)| view! {
                        <TableRow>
                            <TableCell>{label}</TableCell>
                            <TableCell>{value}</TableCell>
                        </TableRow>
                    }).collect_view()}
                </TableBody>
            </Table>
        </div>
    }
}

#[component]
pub fn SubmissionList() -> impl IntoView {
    let modal_stack = use_context::<ModalStackService>().expect("ModalStackService not found");
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    let submissions = RwSignal::new(Vec::<FormSubmission>::new());
    let templates = RwSignal::new(Vec::<FormTemplate>::new());
    let crew_names = RwSignal::new(HashMap::<String, String>::new());
    let template_filter = RwSignal::new(String::new());
    let new_template = RwSignal::new(String::new());
    let filter = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let loading = RwSignal::new(false);

    let load = move || {
        loading.set(true);
        spawn_local(async move {
            match fetch_all::<FormSubmission>().await {
                Ok(mut v) => {
                    v.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
                    submissions.set(v);
                    error.set(None);
                }
                Err(e) => error.set(Some(e.message)),
            }
            loading.set(false);
        });
    };

    Effect::new(move |_| {
        load();
        spawn_local(async move {
            match fetch_all::<FormTemplate>().await {
                Ok(v) => templates.set(v),
                Err(e) => log::warn!("templates not loaded: {}", e),
            }
            if let Ok(v) = fetch_all::<Crew>().await {
                crew_names.set(v.into_iter().map(|c| (c.id, c.name)).collect());
            }
        });
    });

    let template_options = Signal::derive(move || {
        templates.with(|t| t.iter().map(|t| (t.id.clone(), t.name.clone())).collect::<Vec<_>>())
    });
    let active_template_options = Signal::derive(move || {
        templates.with(|t| {
            t.iter()
                .filter(|t| t.is_active)
                .map(|t| (t.id.clone(), t.name.clone()))
                .collect::<Vec<_>>()
        })
    });

    let visible = Memo::new(move |_| {
        let template_names: HashMap<String, String> = template_options.get().into_iter().collect();
        let selected = template_filter.get();
        let rows: Vec<SubmissionRow> = crew_names.with(|crews| {
            submissions.with(|items| {
                items
                    .iter()
                    .filter(|s| selected.is_empty() || s.template_id == selected)
                    .map(|s| SubmissionRow::build(s, &template_names, crews))
                    .collect()
            })
        });
        filter_list(rows, &filter.get())
    });

    let fill_form = move |_| {
        let id = new_template.get_untracked();
        let Some(name) = active_template_options
            .get_untracked()
            .into_iter()
            .find(|(tid, _)| *tid == id)
            .map(|(_, name)| name)
        else {
            return;
        };
        tabs_store.open_tab(
            &format!("a007_security_form_fill_{}", id),
            &detail_tab_label("Fill", &name),
        );
    };

    let show_answers = move |id: String| {
        let Some(submission) = submissions.with_untracked(|v| v.iter().find(|s| s.id == id).cloned()) else {
            return;
        };
        let template = templates.with_untracked(|v| v.iter().find(|t| t.id == submission.template_id).cloned());
        modal_stack.push_with_frame(
            Some("max-width: min(640px, 95vw); width: min(640px, 95vw);".to_string()),
            Some("security-form-answers-modal".to_string()),
            move |handle| {
                let on_close = Callback::new(move |_: ()| handle.close());
                view! {
                    <SubmissionAnswers submission=submission.clone() template=template.clone() on_close=on_close />
                }
                .into_any()
            },
        );
    };

    let export_pdf = move |id: String| {
        spawn_local(async move {
            if let Err(e) = api::export_pdf(&id).await {
                error.set(Some(e.message));
            }
        });
    };

    view! {
        <PageFrame page_id="a007_security_form--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Security forms"</h1>
                </div>
                <div class="page__header-right">
                    <SelectField value=new_template options=active_template_options placeholder="Template...".to_string() />
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=fill_form
                        disabled=Signal::derive(move || new_template.with(|t| t.is_empty()))
                    >
                        {icon("plus")}
                        " Fill form"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load()
                        disabled=Signal::derive(move || loading.get())
                    >
                        {icon("refresh")}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <Flex gap=FlexGap::Medium align=FlexAlign::End>
                    <SelectField
                        label="Template".to_string()
                        value=template_filter
                        options=template_options
                        placeholder="All templates".to_string()
                    />
                    <SearchInput placeholder="Template, crew, order or author..." on_change=Callback::new(move |v| filter.set(v)) />
                </Flex>
                <ErrorBox error=error />

                {move || loading.get().then(|| view! { <Spinner /> })}

                <Table>
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell>"Submitted"</TableHeaderCell>
                            <TableHeaderCell>"Template"</TableHeaderCell>
                            <TableHeaderCell>"Crew"</TableHeaderCell>
                            <TableHeaderCell>"Order"</TableHeaderCell>
                            <TableHeaderCell>"By"</TableHeaderCell>
                            <TableHeaderCell>"Answers"</TableHeaderCell>
                            <TableHeaderCell>""</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        {move || visible.get().into_iter().map(|row| {
                            let id = row.id.clone();
                            let id_for_pdf = row.id.clone();
                            view! {
                                <TableRow>
                                    <TableCell>
                                        <a
                                            href="#"
                                            class="table__link"
                                            on:click=move |ev| {
                                                ev.prevent_default();
                                                show_answers(id.clone());
                                            }
                                        >
                                            {row.submitted_at.clone()}
                                        </a>
                                    </TableCell>
                                    <TableCell>
                                        <TableCellLayout truncate=true>{row.template_name.clone()}</TableCellLayout>
                                    </TableCell>
                                    <TableCell>{row.crew_name.clone()}</TableCell>
                                    <TableCell>{row.order_id.clone()}</TableCell>
                                    <TableCell>{row.submitted_by.clone()}</TableCell>
                                    <TableCell>{row.answers}</TableCell>
                                    <TableCell>
                                        <Button
                                            appearance=ButtonAppearance::Subtle
                                            size=ButtonSize::Small
                                            on_click=move |_| export_pdf(id_for_pdf.clone())
                                        >
                                            {icon("download")}
                                            " PDF"
                                        </Button>
                                    </TableCell>
                                </TableRow>
                            }
                        }).collect_view()}
                    </TableBody>
                </Table>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(template_name: Option<&str>, crew_id: Option<&str>) -> FormSubmission {
        FormSubmission {
            id: "s1".into(),
            template_id: "t1".into(),
            template_name: template_name.map(str::to_string),
            order_id: Some("OS-17".into()),
            crew_id: crew_id.map(str::to_string),
            answers: vec![],
            submitted_at: None,
            submitted_by: Some("ana".into()),
        }
    }

    #[test]
    fn test_row_resolves_names() {
        let templates = HashMap::from([("t1".to_string(), "Work at height".to_string())]);
        let crews = HashMap::from([("c1".to_string(), "North".to_string())]);

        let row = SubmissionRow::build(&submission(None, Some("c1")), &templates, &crews);
        assert_eq!(row.template_name, "Work at height");
        assert_eq!(row.crew_name, "North");

        let row = SubmissionRow::build(&submission(Some("Hot work"), Some("c9")), &templates, &crews);
        assert_eq!(row.template_name, "Hot work");
        assert_eq!(row.crew_name, "c9");
    }

    #[test]
    fn test_search_on_order_and_author() {
        let row = SubmissionRow::build(&submission(None, None), &HashMap::new(), &HashMap::new());
        assert_eq!(row.crew_name, "");
        assert_eq!(filter_list(vec![row.clone()], "os-1").len(), 1);
        assert_eq!(filter_list(vec![row], "ANA").len(), 1);
    }
}
