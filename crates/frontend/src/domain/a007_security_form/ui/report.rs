//! Submission counts per template and crew.

use crate::domain::a007_security_form::api;
use crate::shared::api_utils::fetch_all;
use crate::shared::components::{ErrorBox, SelectField, StatCard};
use crate::shared::date_utils::format_datetime_opt;
use crate::shared::export::{export_csv, CsvExportable};
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_USECASE;
use chrono::NaiveDate;
use contracts::domain::a001_crew::Crew;
use contracts::domain::a006_form_template::FormTemplate;
use contracts::domain::a007_security_form::{FormReport, FormReportQuery, FormReportRow};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

impl CsvExportable for FormReportRow {
    fn headers() -> Vec<&'static str> {
        vec!["Template", "Crew", "Submissions", "Last submitted"]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.template_name.clone(),
            self.crew_name.clone().or_else(|| self.crew_id.clone()).unwrap_or_default(),
            self.submissions.to_string(),
            format_datetime_opt(self.last_submitted_at.as_ref()),
        ]
    }
}

/// Build the report query from the raw filter inputs
pub fn build_query(template_id: &str, crew_id: &str, from: &str, to: &str) -> Result<FormReportQuery, String> {
    let non_empty = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());
    let date = |s: &str, what: &str| -> Result<Option<NaiveDate>, String> {
        match non_empty(s) {
            None => Ok(None),
            Some(v) => NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| format!("Invalid {} date", what)),
        }
    };
    let query = FormReportQuery {
        template_id: non_empty(template_id),
        crew_id: non_empty(crew_id),
        date_from: date(from, "start")?,
        date_to: date(to, "end")?,
    };
    query.validate()?;
    Ok(query)
}

#[component]
pub fn FormReportPage() -> impl IntoView {
    let templates = RwSignal::new(Vec::<(String, String)>::new());
    let crews = RwSignal::new(Vec::<(String, String)>::new());
    let template_id = RwSignal::new(String::new());
    let crew_id = RwSignal::new(String::new());
    let date_from = RwSignal::new(String::new());
    let date_to = RwSignal::new(String::new());
    let report = RwSignal::new(None::<FormReport>);
    let error = RwSignal::new(None::<String>);
    let loading = RwSignal::new(false);

    let run = move || {
        let query = match build_query(
            &template_id.get_untracked(),
            &crew_id.get_untracked(),
            &date_from.get_untracked(),
            &date_to.get_untracked(),
        ) {
            Ok(q) => q,
            Err(e) => {
                error.set(Some(e));
                return;
            }
        };
        loading.set(true);
        spawn_local(async move {
            match api::report(&query).await {
                Ok(r) => {
                    if r.total_submissions != r.recomputed_total() {
                        log::warn!(
                            "report total {} differs from row sum {}",
                            r.total_submissions,
                            r.recomputed_total()
                        );
                    }
                    report.set(Some(r));
                    error.set(None);
                }
                Err(e) => error.set(Some(e.message)),
            }
            loading.set(false);
        });
    };

    Effect::new(move |_| {
        run();
        spawn_local(async move {
            if let Ok(v) = fetch_all::<FormTemplate>().await {
                templates.set(v.into_iter().map(|t| (t.id, t.name)).collect());
            }
            if let Ok(v) = fetch_all::<Crew>().await {
                crews.set(v.into_iter().map(|c| (c.id, c.name)).collect());
            }
        });
    });

    let reset = move |_| {
        template_id.set(String::new());
        crew_id.set(String::new());
        date_from.set(String::new());
        date_to.set(String::new());
        run();
    };

    let rows = Signal::derive(move || report.with(|r| r.as_ref().map(|r| r.rows.clone()).unwrap_or_default()));
    let total = Signal::derive(move || report.with(|r| r.as_ref().map(|r| r.total_submissions.to_string())));
    let template_count = Signal::derive(move || {
        report.with(|r| {
            r.as_ref().map(|r| {
                let mut ids: Vec<&str> = r.rows.iter().map(|row| row.template_id.as_str()).collect();
                ids.sort_unstable();
                ids.dedup();
                ids.len().to_string()
            })
        })
    });
    let crew_count = Signal::derive(move || {
        report.with(|r| {
            r.as_ref().map(|r| {
                let mut ids: Vec<&str> = r.rows.iter().filter_map(|row| row.crew_id.as_deref()).collect();
                ids.sort_unstable();
                ids.dedup();
                ids.len().to_string()
            })
        })
    });

    view! {
        <PageFrame page_id="a007_security_form_report--usecase" category=PAGE_CAT_USECASE>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Security form report"</h1>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| {
                            if let Err(e) = export_csv(&rows.get_untracked(), "security-form-report.csv") {
                                log::warn!("export failed: {}", e);
                            }
                        }
                        disabled=Signal::derive(move || rows.with(|r| r.is_empty()))
                    >
                        {icon("download")}
                        " CSV"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <div class="stat-cards">
                    <StatCard label="Submissions".to_string() icon_name="forms" value=total />
                    <StatCard label="Templates".to_string() icon_name="report" value=template_count />
                    <StatCard label="Crews".to_string() icon_name="crews" value=crew_count />
                </div>

                <Flex gap=FlexGap::Medium align=FlexAlign::End>
                    <SelectField label="Template".to_string() value=template_id options=templates placeholder="All".to_string() />
                    <SelectField label="Crew".to_string() value=crew_id options=crews placeholder="All".to_string() />
                    <div class="form__group">
                        <label class="form__label">"From"</label>
                        <input
                            type="date"
                            class="form__input"
                            prop:value=move || date_from.get()
                            on:change=move |ev| date_from.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form__group">
                        <label class="form__label">"To"</label>
                        <input
                            type="date"
                            class="form__input"
                            prop:value=move || date_to.get()
                            on:change=move |ev| date_to.set(event_target_value(&ev))
                        />
                    </div>
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| run() disabled=Signal::derive(move || loading.get())>
                        "Apply"
                    </Button>
                    <Button appearance=ButtonAppearance::Subtle on_click=reset>
                        "Reset"
                    </Button>
                </Flex>

                <ErrorBox error=error />

                <Table>
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell>"Template"</TableHeaderCell>
                            <TableHeaderCell>"Crew"</TableHeaderCell>
                            <TableHeaderCell>"Submissions"</TableHeaderCell>
                            <TableHeaderCell>"Last submitted"</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        {move || rows.get().into_iter().map(|row| {
                            let cells = row.to_csv_row();
                            view! {
                                <TableRow>
                                    {cells.into_iter().map(|c| view! { <TableCell>{c}</TableCell> }).collect_view()}
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

    #[test]
    fn test_build_query_blank_inputs() {
        let q = build_query("", "  ", "", "").unwrap();
        assert_eq!(q, FormReportQuery::default());
    }

    #[test]
    fn test_build_query_dates() {
        let q = build_query("t1", "c1", "2024-03-01", "2024-03-31").unwrap();
        assert_eq!(q.template_id.as_deref(), Some("t1"));
        assert_eq!(q.date_to, NaiveDate::from_ymd_opt(2024, 3, 31));

        assert!(build_query("", "", "2024-04-01", "2024-03-01").is_err());
        assert_eq!(build_query("", "", "03/01/2024", "").unwrap_err(), "Invalid start date");
    }

    #[test]
    fn test_csv_row_falls_back_to_crew_id() {
        let row = FormReportRow {
            template_id: "t1".into(),
            template_name: "Hot work".into(),
            crew_id: Some("c7".into()),
            crew_name: None,
            submissions: 4,
            last_submitted_at: None,
        };
        assert_eq!(row.to_csv_row()[1], "c7");
        assert_eq!(row.to_csv_row()[2], "4");
    }
}
