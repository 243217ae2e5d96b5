//! AI 诊断对话

use crate::auth::use_app;
use crate::components::feedback::Spinner;
use crate::components::layout::DashboardShell;
use crate::components::page::Page;
use leptos::prelude::*;
use repairhub::controller::{ChatMessage, ChatRole, DiagnosisController, DiagnosisMode};
use repairhub::gate::Access;

#[component]
pub fn DiagnosisPage(access: Access) -> impl IntoView {
    let hub = use_app().hub();
    let page = Page::mount(DiagnosisController::new(&hub, &access), hub.config.notice_ttl());
    page.spawn(|ctrl| async move {
        ctrl.load().await;
    });

    let (draft, set_draft) = signal(String::new());
    let busy = move || page.state().submission.submitting;

    let on_send = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = draft.get_untracked();
        set_draft.set(String::new());
        page.spawn(move |ctrl| async move {
            ctrl.send(&text).await;
        });
    };

    let vehicle_options = move || {
        let state = page.state();
        let selected = state.selected_vehicle.clone();
        state
            .vehicles
            .into_iter()
            .map(|v| {
                let is_selected = selected.as_deref() == Some(v.id.as_str());
                view! {
                    <option value=v.id.clone() selected=is_selected>
                        {v.display_name()}
                    </option>
                }
            })
            .collect_view()
    };

    let status = move || match page.state().available {
        None => view! { <span class="badge badge-ghost">"Checking..."</span> }.into_any(),
        Some(true) => view! { <span class="badge badge-success">"Online"</span> }.into_any(),
        Some(false) => view! { <span class="badge badge-error">"Unavailable"</span> }.into_any(),
    };

    let messages = move || {
        page.state()
            .messages
            .into_iter()
            .map(chat_bubble)
            .collect_view()
    };

    view! {
        <DashboardShell access=access>
            <div class="flex flex-wrap gap-2 items-center">
                {status}
                <select
                    class="select select-bordered select-sm"
                    disabled=move || page.state().mode == DiagnosisMode::Quick
                    on:change=move |ev| {
                        let id = event_target_value(&ev);
                        page.act(|c| c.select_vehicle(Some(id.as_str()).filter(|v| !v.is_empty())));
                    }
                >
                    <option value="">"No vehicle"</option>
                    {vehicle_options}
                </select>
                <label class="label cursor-pointer gap-2">
                    <span class="label-text">"Quick answer"</span>
                    <input
                        type="checkbox"
                        class="toggle toggle-sm"
                        prop:checked=move || page.state().mode == DiagnosisMode::Quick
                        on:change=move |ev| {
                            let mode = if event_target_checked(&ev) {
                                DiagnosisMode::Quick
                            } else {
                                DiagnosisMode::Full
                            };
                            page.act(|c| c.set_mode(mode));
                        }
                    />
                </label>
                <button class="btn btn-sm btn-ghost ml-auto" on:click=move |_| page.act(|c| c.clear())>
                    "Clear chat"
                </button>
            </div>
            <div class="card bg-base-100 shadow-sm">
                <div class="card-body space-y-2 max-h-[60vh] overflow-y-auto">
                    {messages}
                    <Show when=busy>
                        <Spinner />
                    </Show>
                </div>
            </div>
            <form class="flex gap-2" on:submit=on_send>
                <input
                    class="input input-bordered flex-1"
                    placeholder="e.g. Grinding noise when braking"
                    prop:value=draft
                    on:input=move |ev| set_draft.set(event_target_value(&ev))
                />
                <button class="btn btn-primary" type="submit" disabled=busy>
                    "Send"
                </button>
            </form>
        </DashboardShell>
    }
}

fn chat_bubble(message: ChatMessage) -> impl IntoView {
    let (side, bubble) = match message.role {
        ChatRole::User => ("chat chat-end", "chat-bubble chat-bubble-primary"),
        ChatRole::Assistant => ("chat chat-start", "chat-bubble"),
        ChatRole::System => ("chat chat-start", "chat-bubble chat-bubble-error"),
    };
    let details = message.diagnosis.map(|d| {
        let list = |items: Vec<String>| {
            items
                .into_iter()
                .map(|i| view! { <li>{i}</li> })
                .collect_view()
        };
        view! {
            <div class="mt-2 text-sm space-y-1">
                {(!d.possible_causes.is_empty())
                    .then(|| view! { <p class="font-semibold">"Possible causes"</p> })}
                <ul class="list-disc ml-4">{list(d.possible_causes)}</ul>
                {(!d.recommended_actions.is_empty())
                    .then(|| view! { <p class="font-semibold">"Recommended"</p> })}
                <ul class="list-disc ml-4">{list(d.recommended_actions)}</ul>
                {d.estimated_cost.map(|c| view! { <p>"Estimated cost: " {c}</p> })}
                {d.urgency.map(|u| view! { <span class=u.badge()>{u.as_str()}</span> })}
            </div>
        }
    });

    view! {
        <div class=side>
            <div class="chat-header text-xs opacity-60">
                {message.sent_at.format("%H:%M").to_string()}
            </div>
            <div class=bubble>
                <p class="whitespace-pre-wrap">{message.text}</p>
                {details}
            </div>
        </div>
    }
}
