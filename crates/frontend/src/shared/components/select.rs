use leptos::prelude::*;

/// Native `<select>` bound to a string signal. An empty value is the
/// "nothing selected" option when `placeholder` is given.
#[component]
pub fn SelectField(
    #[prop(optional, into)] label: MaybeProp<String>,
    value: RwSignal<String>,
    /// (value, label) pairs
    #[prop(into)]
    options: Signal<Vec<(String, String)>>,
    #[prop(optional, into)] placeholder: Option<String>,
    #[prop(optional, into)] disabled: Signal<bool>,
) -> impl IntoView {
    view! {
        <div class="form__group">
            {move || label.get().map(|l| view! { <label class="form__label">{l}</label> })}
            <select
                class="form__select"
                disabled=move || disabled.get()
                on:change=move |ev| value.set(event_target_value(&ev))
                prop:value=move || value.get()
            >
                {placeholder.map(|p| view! { <option value="">{p}</option> })}
                <For
                    each=move || options.get()
                    key=|(val, label)| (val.clone(), label.clone())
                    children=move |(val, label)| {
                        let current = val.clone();
                        view! {
                            <option value=val selected=move || value.get() == current>
                                {label}
                            </option>
                        }
                    }
                />
            </select>
        </div>
    }
}
