use crate::shared::icons::icon;
use leptos::prelude::*;

/// Small figure card used above list screens (movement stats, report totals)
#[component]
pub fn StatCard(
    label: String,
    /// Icon name from the icon() helper
    icon_name: &'static str,
    /// Already formatted value; None while loading
    #[prop(into)]
    value: Signal<Option<String>>,
    #[prop(into, optional)] subtitle: Signal<Option<String>>,
) -> impl IntoView {
    view! {
        <div class="stat-card">
            <div class="stat-card__icon">{icon(icon_name)}</div>
            <div class="stat-card__content">
                <div class="stat-card__label">{label}</div>
                <div class="stat-card__value">
                    {move || value.get().unwrap_or_else(|| "—".to_string())}
                </div>
                {move || subtitle.get().map(|s| view! { <div class="stat-card__subtitle">{s}</div> })}
            </div>
        </div>
    }
}
