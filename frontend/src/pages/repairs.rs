//! 维修历史：统计、保养提醒、筛选、日期区间、详情弹窗

use crate::auth::use_app;
use crate::components::feedback::{SubmissionFeedback, render_list};
use crate::components::format::{mileage, money, or_dash};
use crate::components::layout::DashboardShell;
use crate::components::page::Page;
use crate::web::dialog::confirm;
use leptos::prelude::*;
use repairhub::controller::RepairsController;
use repairhub::gate::Access;
use repairhub::shared::Repair;

/// `open` 为 `Some` 时（`/dashboard/repairs/:id`）加载后直接打开该记录
#[component]
pub fn RepairsPage(access: Access, #[prop(optional)] open: Option<String>) -> impl IntoView {
    let hub = use_app().hub();
    let page = Page::mount(RepairsController::new(&hub, &access), hub.config.notice_ttl());
    page.spawn(move |ctrl| async move {
        ctrl.load().await;
        if let Some(id) = open {
            ctrl.open(&id).await;
        }
    });

    let submission = Signal::derive(move || page.state().list.submission);
    let (start, set_start) = signal(String::new());
    let (end, set_end) = signal(String::new());

    let stats = move || {
        page.state().stats.map(|s| {
            view! {
                <div class="stats stats-vertical md:stats-horizontal w-full shadow-sm">
                    <div class="stat">
                        <div class="stat-title">"Repairs"</div>
                        <div class="stat-value text-2xl">{s.total_repairs}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Total"</div>
                        <div class="stat-value text-2xl">{money(s.total_cost)}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Average"</div>
                        <div class="stat-value text-2xl">{money(s.average_cost)}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"This year"</div>
                        <div class="stat-value text-2xl">{money(s.this_year_cost)}</div>
                    </div>
                </div>
            }
        })
    };

    let reminders = move || {
        let reminders = page.state().reminders;
        (!reminders.is_empty()).then(|| {
            let items = reminders
                .into_iter()
                .map(|r| {
                    let text = r.message.clone().unwrap_or_else(|| r.service_type.clone());
                    view! {
                        <div role="alert" class="alert alert-info py-2">
                            <span>{text}</span>
                            <span class="text-xs">
                                {r.due_date.clone().unwrap_or_else(|| mileage(r.due_mileage))}
                            </span>
                        </div>
                    }
                })
                .collect_view();
            view! { <div class="space-y-2">{items}</div> }
        })
    };

    let service_options = move || {
        page.read(|c| c.service_types())
            .into_iter()
            .map(|t| view! { <option value=t.clone()>{t}</option> })
            .collect_view()
    };

    let apply_range = move |_| {
        let (start, end) = (start.get_untracked(), end.get_untracked());
        page.spawn(move |ctrl| async move {
            ctrl.load_range(&start, &end).await;
        });
    };
    let clear_range = move |_| {
        set_start.set(String::new());
        set_end.set(String::new());
        page.spawn(|ctrl| async move {
            ctrl.clear_range().await;
        });
    };

    let rows = move || {
        render_list(page.read(|c| c.view()), "repairs", move |repair: Repair| {
            let id = StoredValue::new(repair.id.clone());
            view! {
                <tr
                    class="hover cursor-pointer"
                    on:click=move |_| {
                        let id = id.get_value();
                        page.spawn(move |ctrl| async move {
                            ctrl.open(&id).await;
                        });
                    }
                >
                    <td>{repair.service_date}</td>
                    <td>{repair.service_type}</td>
                    <td>{or_dash(repair.shop_name.as_deref())}</td>
                    <td class="text-right">{money(repair.cost)}</td>
                </tr>
            }
        })
    };

    view! {
        <DashboardShell access=access>
            <SubmissionFeedback submission=submission />
            {stats}
            {reminders}
            <div class="flex flex-wrap gap-2 items-end">
                <input
                    type="search"
                    placeholder="Search repairs"
                    class="input input-bordered"
                    on:input=move |ev| page.act(|c| c.set_search(&event_target_value(&ev)))
                />
                <select
                    class="select select-bordered"
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        page.act(|c| c.set_service_type(Some(value.as_str()).filter(|v| !v.is_empty())));
                    }
                >
                    <option value="">"All services"</option>
                    {service_options}
                </select>
                <input
                    type="date"
                    class="input input-bordered"
                    prop:value=start
                    on:input=move |ev| set_start.set(event_target_value(&ev))
                />
                <input
                    type="date"
                    class="input input-bordered"
                    prop:value=end
                    on:input=move |ev| set_end.set(event_target_value(&ev))
                />
                <button class="btn btn-outline" on:click=apply_range>"Apply range"</button>
                <Show when=move || page.state().range.is_some()>
                    <button class="btn btn-ghost" on:click=clear_range>"Clear"</button>
                </Show>
            </div>
            <div class="card bg-base-100 shadow-sm overflow-x-auto">
                <table class="table">
                    <thead>
                        <tr>
                            <th>"Date"</th>
                            <th>"Service"</th>
                            <th>"Shop"</th>
                            <th class="text-right">"Cost"</th>
                        </tr>
                    </thead>
                    <tbody>{rows}</tbody>
                </table>
            </div>
            {move || page.state().selected.map(|repair| view! { <RepairModal repair=repair page=page /> })}
        </DashboardShell>
    }
}

#[component]
fn RepairModal(repair: Repair, page: Page<RepairsController>) -> impl IntoView {
    let id = StoredValue::new(repair.id.clone());
    let on_delete = move |_| {
        let id = id.get_value();
        let confirmed = confirm("Delete this repair record?");
        page.spawn(move |ctrl| async move {
            ctrl.delete(&id, confirmed).await;
        });
    };
    let parts = repair.parts.join(", ");
    let photos = repair
        .photos
        .iter()
        .map(|src| view! { <img src=src.clone() class="h-24 rounded object-cover" /> })
        .collect_view();

    view! {
        <div class="modal modal-open">
            <div class="modal-box max-w-2xl">
                <h3 class="font-bold text-lg">{repair.service_type.clone()}</h3>
                <p class="text-sm text-base-content/60">
                    {format!("{} · {}", repair.service_date, or_dash(repair.shop_name.as_deref()))}
                </p>
                <p class="py-2">{or_dash(repair.description.as_deref())}</p>
                <div class="grid grid-cols-2 gap-1 text-sm">
                    <span>"Cost"</span>
                    <span>{money(repair.cost)}</span>
                    <span>"Mileage"</span>
                    <span>{mileage(repair.mileage)}</span>
                    <span>"Parts"</span>
                    <span>{if parts.is_empty() { "—".to_string() } else { parts }}</span>
                    <span>"Insurance claim"</span>
                    <span>{or_dash(repair.insurance_claim.as_deref())}</span>
                </div>
                <div class="flex gap-2 flex-wrap mt-2">{photos}</div>
                <div class="modal-action">
                    <button class="btn btn-error btn-outline" on:click=on_delete>"Delete"</button>
                    <button class="btn" on:click=move |_| page.act(|c| c.close())>"Close"</button>
                </div>
            </div>
        </div>
    }
}
