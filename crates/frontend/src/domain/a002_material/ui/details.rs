use crate::shared::api_utils::{fetch_one, save_one};
use crate::shared::components::ErrorBox;
use contracts::domain::a002_material::{Material, MaterialDto};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

#[component]
pub fn MaterialDetails(
    id: Option<String>,
    on_saved: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let is_edit = id.is_some();
    let form = RwSignal::new(MaterialDto {
        is_active: true,
        ..Default::default()
    });
    let error = RwSignal::new(None::<String>);
    let saving = RwSignal::new(false);

    let code = RwSignal::new(String::new());
    let name = RwSignal::new(String::new());
    let unit = RwSignal::new(String::new());
    let category = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let is_active = RwSignal::new(true);

    if let Some(id) = id {
        spawn_local(async move {
            match fetch_one::<Material>(&id).await {
                Ok(m) => {
                    let dto = MaterialDto::from(m);
                    code.set(dto.code.clone());
                    name.set(dto.name.clone());
                    unit.set(dto.unit.clone());
                    category.set(dto.category.clone().unwrap_or_default());
                    description.set(dto.description.clone().unwrap_or_default());
                    is_active.set(dto.is_active);
                    form.set(dto);
                }
                Err(e) => error.set(Some(e.message)),
            }
        });
    }

    let non_empty = |s: String| {
        let s = s.trim().to_string();
        (!s.is_empty()).then_some(s)
    };

    let save = move |_| {
        let dto = MaterialDto {
            id: form.with_untracked(|f| f.id.clone()),
            code: code.get_untracked().trim().to_string(),
            name: name.get_untracked().trim().to_string(),
            description: non_empty(description.get_untracked()),
            unit: unit.get_untracked().trim().to_string(),
            category: non_empty(category.get_untracked()),
            is_active: is_active.get_untracked(),
        };
        if let Err(msg) = dto.validate() {
            error.set(Some(msg));
            return;
        }
        saving.set(true);
        error.set(None);
        spawn_local(async move {
            match save_one::<Material, _>(dto.id.as_deref(), &dto).await {
                Ok(_) => on_saved.run(()),
                Err(e) => error.set(Some(e.message)),
            }
            saving.set(false);
        });
    };

    view! {
        <div class="details-container material-details">
            <div class="details-header">
                <h3>{if is_edit { "Edit material" } else { "New material" }}</h3>
            </div>
            <ErrorBox error=error />
            <div class="details-form">
                <Flex vertical=true gap=FlexGap::Small>
                    <Label>"Code"</Label>
                    <Input value=code placeholder="CB-01" />
                    <Label>"Name"</Label>
                    <Input value=name />
                    <Label>"Unit"</Label>
                    <Input value=unit placeholder="m, pcs, kg" />
                    <Label>"Category"</Label>
                    <Input value=category />
                    <Label>"Description"</Label>
                    <Textarea value=description attr:rows=3 />
                    <Checkbox checked=is_active label="Active" />
                </Flex>
            </div>
            <div class="details-actions">
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
    }
}
