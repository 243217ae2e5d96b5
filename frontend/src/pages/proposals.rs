use crate::auth::use_app;
use crate::components::feedback::render_list;
use crate::components::format::{money, or_dash};
use crate::components::layout::DashboardShell;
use crate::components::page::Page;
use leptos::prelude::*;
use repairhub::controller::{ProposalsController, StatusFilter};
use repairhub::gate::Access;
use repairhub::shared::{Proposal, ProposalStatus};

/// 店主已提交的报价，按状态分 tab
#[component]
pub fn ProposalsPage(access: Access) -> impl IntoView {
    let hub = use_app().hub();
    let page = Page::mount(ProposalsController::new(&hub, &access), hub.config.notice_ttl());
    page.spawn(|ctrl| async move {
        ctrl.load().await;
    });

    let tab = move |filter: StatusFilter| {
        let label = move || match filter {
            StatusFilter::All => format!("All ({})", page.state().list.entities.len()),
            StatusFilter::Only(status) => {
                format!("{} ({})", status.as_str(), page.read(|c| c.count(status)))
            }
        };
        view! {
            <a
                role="tab"
                class=move || if page.state().filter == filter { "tab tab-active" } else { "tab" }
                on:click=move |_| page.act(|c| c.set_filter(filter))
            >
                {label}
            </a>
        }
    };
    let tabs = std::iter::once(tab(StatusFilter::All))
        .chain(ProposalStatus::ALL.into_iter().map(|s| tab(StatusFilter::Only(s))))
        .collect_view();

    let rows = move || render_list(page.read(|c| c.view()), "proposals", proposal_row);

    view! {
        <DashboardShell access=access>
            <div role="tablist" class="tabs tabs-boxed w-fit capitalize">{tabs}</div>
            <div class="card bg-base-100 shadow-sm overflow-x-auto">
                <table class="table">
                    <thead>
                        <tr>
                            <th>"Lead"</th>
                            <th>"Message"</th>
                            <th>"Duration"</th>
                            <th class="text-right">"Estimate"</th>
                            <th>"Status"</th>
                        </tr>
                    </thead>
                    <tbody>{rows}</tbody>
                </table>
            </div>
        </DashboardShell>
    }
}

fn proposal_row(p: Proposal) -> impl IntoView {
    view! {
        <tr>
            <td>{format!("#{}", p.lead_id)}</td>
            <td class="max-w-md truncate">{p.message}</td>
            <td>{or_dash(p.estimated_duration.as_deref())}</td>
            <td class="text-right">{money(p.estimated_cost)}</td>
            <td>
                <span class=p.status.badge()>{p.status.as_str()}</span>
            </td>
        </tr>
    }
}
