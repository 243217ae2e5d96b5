//! 车主查看维修需求及收到的报价，接受或拒绝

use crate::auth::use_app;
use crate::components::feedback::{EmptyState, Spinner, SubmissionFeedback};
use crate::components::format::{money, or_dash};
use crate::components::layout::DashboardShell;
use crate::components::lightbox::LightboxView;
use crate::components::page::Page;
use leptos::prelude::*;
use repairhub::controller::RequestDetailController;
use repairhub::gate::Access;
use repairhub::shared::{Proposal, ProposalStatus};

#[component]
pub fn RequestDetailPage(access: Access, lead_id: String) -> impl IntoView {
    let hub = use_app().hub();
    let page = Page::mount(
        RequestDetailController::new(&hub, &access, &lead_id),
        hub.config.notice_ttl(),
    );
    page.spawn(|ctrl| async move {
        ctrl.load().await;
    });

    let submission = Signal::derive(move || page.state().submission);
    let lightbox = Signal::derive(move || page.state().lightbox);

    let body = move || {
        let state = page.state();
        if state.loading {
            return view! { <Spinner /> }.into_any();
        }
        let Some(lead) = state.lead else {
            return view! { <EmptyState message="Request not found" /> }.into_any();
        };
        let thumbs = lead
            .images
            .iter()
            .enumerate()
            .map(|(index, src)| {
                view! {
                    <img
                        src=src.clone()
                        class="h-20 w-20 rounded object-cover cursor-pointer"
                        on:click=move |_| page.act(|c| c.open_image(index))
                    />
                }
            })
            .collect_view();
        let proposals = if lead.proposals.is_empty() {
            view! { <EmptyState message="No proposals yet" /> }.into_any()
        } else {
            lead.proposals
                .into_iter()
                .map(|p| view! { <ProposalCard proposal=p page=page /> })
                .collect_view()
                .into_any()
        };

        view! {
            <div class="card bg-base-100 shadow-sm">
                <div class="card-body">
                    <div class="flex items-start justify-between">
                        <h2 class="card-title text-2xl">{lead.title}</h2>
                        <span class=lead.urgency.badge()>{lead.urgency.as_str()}</span>
                    </div>
                    <p>{lead.description}</p>
                    <div class="flex gap-2 flex-wrap">{thumbs}</div>
                </div>
            </div>
            <h3 class="text-xl font-semibold">"Proposals"</h3>
            <div class="grid gap-4 md:grid-cols-2">{proposals}</div>
        }
        .into_any()
    };

    view! {
        <DashboardShell access=access>
            <SubmissionFeedback submission=submission />
            {body}
            <LightboxView
                lightbox=lightbox
                on_prev=Callback::new(move |_| page.act(|c| c.prev_image()))
                on_next=Callback::new(move |_| page.act(|c| c.next_image()))
                on_close=Callback::new(move |_| page.act(|c| c.close_image()))
            />
        </DashboardShell>
    }
}

#[component]
fn ProposalCard(proposal: Proposal, page: Page<RequestDetailController>) -> impl IntoView {
    let id = StoredValue::new(proposal.id.clone());
    let busy = move || page.state().submission.submitting;
    let can_accept = move || page.read(|c| c.can_accept(&id.get_value()));
    let pending = proposal.status == ProposalStatus::Pending;

    let on_accept = move |_| {
        let id = id.get_value();
        page.spawn(move |ctrl| async move {
            ctrl.accept(&id).await;
        });
    };
    let on_reject = move |_| {
        let id = id.get_value();
        page.spawn(move |ctrl| async move {
            ctrl.reject(&id).await;
        });
    };

    view! {
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body">
                <div class="flex items-start justify-between">
                    <h4 class="card-title">{or_dash(proposal.shop_name.as_deref())}</h4>
                    <span class=proposal.status.badge()>{proposal.status.as_str()}</span>
                </div>
                <p>{proposal.message.clone()}</p>
                <div class="grid grid-cols-2 gap-1 text-sm text-base-content/70">
                    <span>"Estimate"</span>
                    <span>{money(proposal.estimated_cost)}</span>
                    <span>"Duration"</span>
                    <span>{or_dash(proposal.estimated_duration.as_deref())}</span>
                    <span>"Warranty"</span>
                    <span>{or_dash(proposal.warranty.as_deref())}</span>
                </div>
                {pending
                    .then(|| {
                        view! {
                            <div class="card-actions justify-end mt-2">
                                <button class="btn btn-sm btn-ghost" disabled=busy on:click=on_reject>
                                    "Reject"
                                </button>
                                <button
                                    class="btn btn-sm btn-success"
                                    disabled=move || busy() || !can_accept()
                                    on:click=on_accept
                                >
                                    "Accept"
                                </button>
                            </div>
                        }
                    })}
            </div>
        </div>
    }
}
